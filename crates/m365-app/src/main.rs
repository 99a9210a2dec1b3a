//! M365 Desktop shell
//!
//! Wraps the Microsoft 365 web apps in native windows. The event loop owns
//! every window; WebView callbacks run the navigation policy and post the
//! resulting work back onto the loop as user events.

#![cfg_attr(all(not(debug_assertions), windows), windows_subsystem = "windows")]

mod connectivity;
mod icons;
mod launcher;
mod menus;
mod platform;
mod state;
mod tray;
mod updater;

use anyhow::Context;
use m365_core::{NavigationDecision, NavigationRequest};
use m365_settings::keys;
use m365_shield::{AdBlocker, ResourceType};
use state::{AppState, PageTracker, SharedState};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tao::dpi::PhysicalSize;
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy, EventLoopWindowTarget};
use tao::window::{Window, WindowBuilder, WindowId};
use url::Url;
use wry::{PageLoadEvent, WebView, WebViewBuilder};

/// Work posted from WebView callbacks and helper threads onto the loop
#[derive(Debug)]
enum UserEvent {
    Menu(muda::MenuEvent),
    Tray(tray_icon::TrayIconEvent),
    Navigate(String),
    OpenWindow { url: String, width: u32, height: u32 },
    OpenExternal(String),
    TitleChanged { window: WindowId, title: String },
    PageLoaded { window: WindowId, url: String },
    UpdateCheck { update: Option<updater::UpdateInfo>, manual: bool },
}

fn init_logging() -> anyhow::Result<()> {
    tracing_log::LogTracer::init().context("failed to bridge log records")?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    log::info!("M365 Desktop {} starting", env!("CARGO_PKG_VERSION"));

    let state = AppState::initialize();

    connectivity::warn_if_offline();
    if state
        .lock()
        .map(|s| s.shield.is_enabled())
        .unwrap_or(false)
    {
        spawn_shield_upgrade(&state);
    }

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    if state
        .lock()
        .map(|s| s.settings.bool_or(keys::AUTO_UPDATER, true))
        .unwrap_or(true)
    {
        spawn_update_check(proxy.clone(), false);
    }

    let main_window = WindowBuilder::new()
        .with_title("Microsoft 365")
        .build(&event_loop)
        .context("failed to create the main window")?;

    // Size the window from the monitor it landed on.
    if let Some(monitor) = main_window.current_monitor() {
        let screen = monitor.size();
        if let Ok(mut s) = state.lock() {
            s.set_screen(screen.width, screen.height);
            let config = s.settings.policy_config();
            main_window.set_inner_size(PhysicalSize::new(
                (screen.width as f64 * config.window_width_fraction).round() as u32,
                (screen.height as f64 * config.window_height_fraction).round() as u32,
            ));
        }
    }
    main_window.set_window_icon(icons::window_icon(None));

    let app_menu = menus::AppMenu::build(
        &state
            .lock()
            .map_err(|_| anyhow::anyhow!("state poisoned during startup"))?
            .settings,
    );
    let autohide_menubar = state
        .lock()
        .map(|s| s.settings.bool_or(keys::AUTOHIDE_MENUBAR, false))
        .unwrap_or(false);
    if !autohide_menubar {
        app_menu.init_for_window(&main_window);
    }

    let start_url = state
        .lock()
        .map(|s| s.start_url())
        .unwrap_or_else(|_| launcher::start_url("", "?auth=1"));
    let main_webview = build_webview(&main_window, &start_url, &state, &proxy)
        .context("failed to create the main WebView")?;

    forward_menu_events(proxy.clone());
    forward_tray_events(proxy.clone());
    let mut tray_handle = tray::build();

    let mut windows: HashMap<WindowId, (Window, WebView)> = HashMap::new();
    let mut tracker: PageTracker<WindowId> = PageTracker::new();
    tracker.page_loaded(main_window.id(), start_url);
    let mut quitting = false;

    event_loop.run(move |event, target, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                window_id,
                event: WindowEvent::CloseRequested,
                ..
            } => {
                if window_id == main_window.id() {
                    // With a tray present, closing hides; the tray stays as
                    // the way back in.
                    if tray_handle.is_some() && !quitting {
                        main_window.set_visible(false);
                    } else {
                        *control_flow = ControlFlow::Exit;
                    }
                } else {
                    windows.remove(&window_id);
                    tracker.window_closed(&window_id);
                }
            }

            Event::UserEvent(user_event) => match user_event {
                UserEvent::Menu(menu_event) => {
                    let id = menu_event.id().as_ref().to_string();

                    if id == tray::SHOW_ID {
                        main_window.set_visible(true);
                        main_window.set_focus();
                    } else if id == tray::QUIT_ID {
                        quitting = true;
                        shutdown(&state, &mut tray_handle);
                        *control_flow = ControlFlow::Exit;
                    } else if let Some(workload) = launcher::Workload::from_menu_id(&id) {
                        open_workload(workload, &state, &proxy);
                    } else if let Some(action) = app_menu.action_for(&menu_event) {
                        match action {
                            menus::MenuAction::Quit => {
                                quitting = true;
                                shutdown(&state, &mut tray_handle);
                                *control_flow = ControlFlow::Exit;
                            }
                            menus::MenuAction::CheckForUpdates => {
                                spawn_update_check(proxy.clone(), true);
                            }
                            menus::MenuAction::Toggle { key, checked } => {
                                if let Ok(mut s) = state.lock() {
                                    s.toggle(&key, checked);
                                }
                            }
                            menus::MenuAction::SetAccountMode(mode) => {
                                let url = state.lock().ok().map(|mut s| {
                                    s.settings.set(keys::ACCOUNT_MODE, mode.into());
                                    s.start_url()
                                });
                                if let Some(url) = url {
                                    let _ = proxy.send_event(UserEvent::Navigate(url));
                                }
                            }
                        }
                    }
                }

                UserEvent::Tray(tray_event) => {
                    if let tray_icon::TrayIconEvent::Click {
                        button: tray_icon::MouseButton::Left,
                        ..
                    } = tray_event
                    {
                        main_window.set_visible(true);
                        main_window.set_focus();
                    }
                }

                UserEvent::Navigate(url) => {
                    tracker.page_loaded(main_window.id(), url.clone());
                    if let Err(e) = main_webview.load_url(&url) {
                        log::error!("Failed to navigate to {}: {}", url, e);
                    }
                    main_window.set_visible(true);
                    main_window.set_focus();
                }

                UserEvent::OpenWindow { url, width, height } => {
                    match spawn_window(target, &url, width, height, &state, &proxy) {
                        Ok((window, webview)) => {
                            windows.insert(window.id(), (window, webview));
                        }
                        Err(e) => log::error!("Failed to open window for {}: {}", url, e),
                    }
                }

                UserEvent::OpenExternal(url) => {
                    if let Err(e) = platform::open_external(&url) {
                        log::warn!("{}", e);
                    }
                }

                UserEvent::PageLoaded { window, url } => {
                    tracker.page_loaded(window, url);
                }

                UserEvent::TitleChanged { window, title } => {
                    let target_window = if window == main_window.id() {
                        Some(&main_window)
                    } else {
                        windows.get(&window).map(|(w, _)| w)
                    };
                    if let Ok(s) = state.lock() {
                        s.report_title(&title);
                        if s.settings.bool_or(keys::DYNAMIC_ICONS, true) {
                            if let Some(w) = target_window {
                                let kind = tracker.icon_for_title(&window, &title);
                                w.set_window_icon(icons::window_icon(kind));
                            }
                        }
                    }
                    if let Some(w) = target_window {
                        w.set_title(&title);
                    }
                }

                UserEvent::UpdateCheck { update, manual } => {
                    notify_update_result(update, manual);
                }
            },

            _ => {}
        }
    });
}

/// Main-frame navigation gate: web schemes only, shield consulted
fn navigation_gate(state: SharedState) -> impl Fn(String) -> bool {
    move |url: String| {
        if !url.starts_with("https://") && !url.starts_with("http://") {
            log::info!("Blocked non-web navigation: {}", url);
            return false;
        }
        let blocked = state
            .lock()
            .map(|s| s.should_block(&url, &url, ResourceType::Document))
            .unwrap_or(false);
        !blocked
    }
}

/// Popup gate: run the window-open policy and post the outcome to the loop.
///
/// Only download requests proceed in place (returning `true` lets the
/// engine's own download machinery take over); every other allowed outcome
/// is re-dispatched as a user event.
fn popup_gate(
    state: SharedState,
    proxy: EventLoopProxy<UserEvent>,
    origin: m365_core::WindowId,
) -> impl Fn(String) -> bool {
    move |url: String| {
        let request = NavigationRequest::new(url.clone(), origin);
        let decision = match state.lock() {
            Ok(s) => s.decide(&request),
            Err(_) => return false,
        };
        log::debug!("Popup {} -> {:?}", url, decision);

        match decision {
            NavigationDecision::AllowInPlace => {
                let is_download = Url::parse(&url)
                    .map(|u| m365_policy::is_download_intent(&u))
                    .unwrap_or(false);
                if is_download {
                    true
                } else {
                    let _ = proxy.send_event(UserEvent::Navigate(url));
                    false
                }
            }
            NavigationDecision::AllowNewWindow { width, height } => {
                let _ = proxy.send_event(UserEvent::OpenWindow { url, width, height });
                false
            }
            NavigationDecision::Deny => false,
            NavigationDecision::DenyDeferToExternalBrowser => {
                let _ = proxy.send_event(UserEvent::OpenExternal(url));
                false
            }
        }
    }
}

fn download_started(url: String, dest: &mut PathBuf) -> bool {
    let suggested = dest
        .file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .or_else(|| {
            Url::parse(&url)
                .ok()
                .and_then(|u| u.path_segments().and_then(|s| s.last().map(String::from)))
        })
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "download".to_string());

    match rfd::FileDialog::new().set_file_name(&suggested).save_file() {
        Some(path) => {
            log::info!("Downloading {} to {:?}", url, path);
            *dest = path;
            true
        }
        None => {
            log::info!("Download of {} cancelled", url);
            false
        }
    }
}

fn download_completed(url: String, path: Option<PathBuf>, success: bool) {
    if success {
        log::info!("Download finished: {} -> {:?}", url, path);
    } else {
        log::warn!("Download failed: {}", url);
        thread::spawn(move || {
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Warning)
                .set_title("Download failed")
                .set_description(format!("The download from {} did not complete.", url))
                .show();
        });
    }
}

fn build_webview(
    window: &Window,
    url: &str,
    state: &SharedState,
    proxy: &EventLoopProxy<UserEvent>,
) -> anyhow::Result<WebView> {
    let window_id = window.id();
    let title_proxy = proxy.clone();
    let load_proxy = proxy.clone();

    let builder = WebViewBuilder::new()
        .with_url(url)
        .with_navigation_handler(navigation_gate(Arc::clone(state)))
        .with_new_window_req_handler(popup_gate(
            Arc::clone(state),
            proxy.clone(),
            m365_core::WindowId::new(),
        ))
        .with_download_started_handler(download_started)
        .with_download_completed_handler(download_completed)
        .with_document_title_changed_handler(move |title| {
            let _ = title_proxy.send_event(UserEvent::TitleChanged {
                window: window_id,
                title,
            });
        })
        .with_on_page_load_handler(move |event, url| {
            if matches!(event, PageLoadEvent::Finished) {
                let _ = load_proxy.send_event(UserEvent::PageLoaded {
                    window: window_id,
                    url,
                });
            }
        });

    #[cfg(not(target_os = "linux"))]
    let webview = builder.build(window)?;
    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window
            .default_vbox()
            .ok_or_else(|| anyhow::anyhow!("no GTK container for the WebView"))?;
        builder.build_gtk(vbox)?
    };

    Ok(webview)
}

/// Create a secondary window at the size the policy handed back
fn spawn_window(
    target: &EventLoopWindowTarget<UserEvent>,
    url: &str,
    width: u32,
    height: u32,
    state: &SharedState,
    proxy: &EventLoopProxy<UserEvent>,
) -> anyhow::Result<(Window, WebView)> {
    let window = WindowBuilder::new()
        .with_title("Microsoft 365")
        .with_inner_size(PhysicalSize::new(width, height))
        .build(target)
        .context("failed to create window")?;
    window.set_window_icon(icons::window_icon(None));

    let webview = build_webview(&window, url, state, proxy)?;
    Ok((window, webview))
}

/// Route a tray workload launch through the same policy as any popup
fn open_workload(
    workload: launcher::Workload,
    state: &SharedState,
    proxy: &EventLoopProxy<UserEvent>,
) {
    let Ok(s) = state.lock() else { return };
    let url = workload.launch_url(&s.account_mode());
    if let Some(presence) = &s.presence {
        presence.activity(format!("On {}", workload.label()));
    }

    let request = NavigationRequest::new(url.clone(), m365_core::WindowId::new());
    match s.decide(&request) {
        NavigationDecision::AllowNewWindow { width, height } => {
            let _ = proxy.send_event(UserEvent::OpenWindow { url, width, height });
        }
        NavigationDecision::DenyDeferToExternalBrowser => {
            let _ = proxy.send_event(UserEvent::OpenExternal(url));
        }
        NavigationDecision::AllowInPlace => {
            let _ = proxy.send_event(UserEvent::Navigate(url));
        }
        NavigationDecision::Deny => {
            log::warn!("Launch URL unexpectedly denied: {}", url);
        }
    }
}

/// Swap the starter rules for the full filter lists off-thread
fn spawn_shield_upgrade(state: &SharedState) {
    let state = Arc::clone(state);
    thread::Builder::new()
        .name("shield-init".to_string())
        .spawn(move || {
            let mut full = AdBlocker::with_filter_lists();
            if let Ok(mut s) = state.lock() {
                full.set_enabled(s.shield.is_enabled());
                s.shield = full;
                log::info!("Shield upgraded to full filter lists");
            }
        })
        .map(|_| ())
        .unwrap_or_else(|e| log::error!("Failed to spawn shield init: {}", e));
}

fn spawn_update_check(proxy: EventLoopProxy<UserEvent>, manual: bool) {
    thread::Builder::new()
        .name("updater".to_string())
        .spawn(move || match updater::check_for_updates(env!("CARGO_PKG_VERSION")) {
            Ok(update) => {
                let _ = proxy.send_event(UserEvent::UpdateCheck { update, manual });
            }
            Err(e) => {
                log::warn!("Update check failed: {}", e);
                if manual {
                    let _ = proxy.send_event(UserEvent::UpdateCheck {
                        update: None,
                        manual,
                    });
                }
            }
        })
        .map(|_| ())
        .unwrap_or_else(|e| log::error!("Failed to spawn update check: {}", e));
}

/// Show the update outcome without blocking the event loop
fn notify_update_result(update: Option<updater::UpdateInfo>, manual: bool) {
    thread::spawn(move || match update {
        Some(info) => {
            let view = "View release".to_string();
            let choice = rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Info)
                .set_title("Update available")
                .set_description(format!("Version {} is available.", info.version))
                .set_buttons(rfd::MessageButtons::OkCancelCustom(
                    view.clone(),
                    "Later".to_string(),
                ))
                .show();
            if choice == rfd::MessageDialogResult::Custom(view) {
                if let Err(e) = platform::open_external(&info.url) {
                    log::warn!("{}", e);
                }
            }
        }
        None if manual => {
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Info)
                .set_title("Up to date")
                .set_description("You are running the latest version.")
                .show();
        }
        None => {}
    });
}

fn shutdown(state: &SharedState, tray_handle: &mut Option<tray_icon::TrayIcon>) {
    if let Ok(s) = state.lock() {
        if let Some(presence) = &s.presence {
            presence.clear();
        }
    }
    tray_handle.take();
    log::info!("Shutting down");
}

fn forward_menu_events(proxy: EventLoopProxy<UserEvent>) {
    thread::Builder::new()
        .name("menu-events".to_string())
        .spawn(move || {
            while let Ok(event) = muda::MenuEvent::receiver().recv() {
                if proxy.send_event(UserEvent::Menu(event)).is_err() {
                    break;
                }
            }
        })
        .map(|_| ())
        .unwrap_or_else(|e| log::error!("Failed to spawn menu event pump: {}", e));
}

fn forward_tray_events(proxy: EventLoopProxy<UserEvent>) {
    thread::Builder::new()
        .name("tray-events".to_string())
        .spawn(move || {
            while let Ok(event) = tray_icon::TrayIconEvent::receiver().recv() {
                if proxy.send_event(UserEvent::Tray(event)).is_err() {
                    break;
                }
            }
        })
        .map(|_| ())
        .unwrap_or_else(|e| log::error!("Failed to spawn tray event pump: {}", e));
}

//! Procedural window and tray icons
//!
//! Icons are generated as RGBA pixels at startup instead of shipping image
//! assets: a brand-colored tile with a white glyph band per workload.

use m365_core::IconKind;

const ICON_SIZE: u32 = 32;

/// Brand color for each workload tile
fn brand_color(kind: Option<IconKind>) -> [u8; 3] {
    match kind {
        Some(IconKind::Word) => [24, 90, 189],
        Some(IconKind::Excel) => [16, 124, 65],
        Some(IconKind::PowerPoint) => [196, 62, 28],
        Some(IconKind::Outlook) => [15, 108, 189],
        Some(IconKind::OneDrive) => [0, 120, 212],
        Some(IconKind::Teams) => [80, 89, 201],
        Some(IconKind::OneNote) => [119, 25, 170],
        None => [216, 59, 1],
    }
}

/// Render a 32x32 RGBA tile: brand background, white band across the
/// middle third, one pixel of transparent border so the tile reads as
/// rounded against dark taskbars.
fn render_tile(kind: Option<IconKind>) -> Vec<u8> {
    let [r, g, b] = brand_color(kind);
    let size = ICON_SIZE as usize;
    let mut rgba = vec![0u8; size * size * 4];

    for y in 0..size {
        for x in 0..size {
            let i = (y * size + x) * 4;
            if x == 0 || y == 0 || x == size - 1 || y == size - 1 {
                continue; // transparent border
            }
            let in_band = y >= size / 3 && y < 2 * size / 3 && x >= 4 && x < size - 4;
            let (pr, pg, pb) = if in_band { (255, 255, 255) } else { (r, g, b) };
            rgba[i] = pr;
            rgba[i + 1] = pg;
            rgba[i + 2] = pb;
            rgba[i + 3] = 255;
        }
    }
    rgba
}

/// Window icon for the given workload, falling back to the app tile
pub fn window_icon(kind: Option<IconKind>) -> Option<tao::window::Icon> {
    match tao::window::Icon::from_rgba(render_tile(kind), ICON_SIZE, ICON_SIZE) {
        Ok(icon) => Some(icon),
        Err(e) => {
            log::warn!("Failed to build window icon: {}", e);
            None
        }
    }
}

/// Tray icon (always the app tile)
pub fn tray_app_icon() -> Option<tray_icon::Icon> {
    match tray_icon::Icon::from_rgba(render_tile(None), ICON_SIZE, ICON_SIZE) {
        Ok(icon) => Some(icon),
        Err(e) => {
            log::warn!("Failed to build tray icon: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_is_fully_populated() {
        let rgba = render_tile(Some(IconKind::Word));
        assert_eq!(rgba.len(), (ICON_SIZE * ICON_SIZE * 4) as usize);
        // Interior pixels are opaque, border pixels transparent.
        let center = ((ICON_SIZE / 2 * ICON_SIZE + ICON_SIZE / 2) * 4 + 3) as usize;
        assert_eq!(rgba[center], 255);
        assert_eq!(rgba[3], 0);
    }

    #[test]
    fn test_workloads_get_distinct_colors() {
        let word = render_tile(Some(IconKind::Word));
        let excel = render_tile(Some(IconKind::Excel));
        assert_ne!(word, excel);
    }
}

//! M365 Desktop Core Library
//!
//! This crate provides shared types, errors, and configuration for M365 Desktop.

pub mod config;
pub mod error;
pub mod types;

pub use config::PolicyConfig;
pub use error::{M365Error, M365Result};
pub use types::{IconKind, NavigationDecision, NavigationRequest, ScreenMetrics, WindowId};

//! Terminal presentation layer for SkyCast.
//!
//! The UI thread owns every piece of on-screen state. Network work runs on
//! the shared tokio runtime in [`app_services`]; results come back over an
//! mpsc channel drained once per frame by [`runner`].

pub mod app_services;
pub mod error_mapping;
pub mod format;
pub mod icons;
pub mod models;
pub mod runner;
pub mod services;
pub mod theme;
pub mod view;

pub use app_services::{AppServices, RequestTicket};
pub use runner::{run, RunOptions};

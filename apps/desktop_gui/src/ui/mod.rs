//! UI layer: app shell, the three views, modal windows, and small widgets.

pub mod app;
mod modals;
mod views;
mod widgets;

pub use app::TrackerApp;

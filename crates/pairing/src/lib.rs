//! adb-pair
//!
//! Terminal pairing screen for Android wireless debugging: enter the
//! device's pairing IP, port and code, and the confirmed request is handed
//! to the application shell. The theme follows the OS light/dark preference.

pub mod config;
pub mod theme;
pub mod tui;

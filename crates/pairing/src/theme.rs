//! Light/dark theme selection following the OS color-scheme preference
//!
//! The [`ThemeController`] is owned by the application shell. Starting it
//! reads the current preference from a [`ColorSchemeSource`] and applies it
//! to the shell's [`RootClasses`]; a background watcher then re-reads the
//! preference every poll interval and reports changes back to the owner,
//! which re-applies them on the UI loop. Exactly one of the two marker
//! classes is present on the root once a preference has been applied.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

/// Marker class present on the root while the dark theme is applied
pub const DARK_THEME_CLASS: &str = "theme-dark";

/// Marker class present on the root while the light theme is applied
pub const LIGHT_THEME_CLASS: &str = "theme-light";

/// OS color-scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Dark,
    Light,
}

impl ColorScheme {
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            ColorScheme::Dark
        } else {
            ColorScheme::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == ColorScheme::Dark
    }
}

/// Configured theme behaviour
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Follow the OS preference
    #[default]
    Auto,
    /// Always dark
    Dark,
    /// Always light
    Light,
}

/// Class list of the UI root, read by the renderer to pick a palette
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootClasses {
    classes: BTreeSet<String>,
}

impl RootClasses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the class when `force` is true, remove it otherwise
    pub fn toggle(&mut self, class: &str, force: bool) {
        if force {
            self.classes.insert(class.to_string());
        } else {
            self.classes.remove(class);
        }
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// The scheme selected by the marker classes, if one is applied
    pub fn color_scheme(&self) -> Option<ColorScheme> {
        match (
            self.contains(DARK_THEME_CLASS),
            self.contains(LIGHT_THEME_CLASS),
        ) {
            (true, false) => Some(ColorScheme::Dark),
            (false, true) => Some(ColorScheme::Light),
            _ => None,
        }
    }
}

/// Where the color-scheme preference comes from
///
/// `query` returns `None` when the environment cannot report a preference.
pub trait ColorSchemeSource: Send + Sync {
    fn query(&self) -> Option<ColorScheme>;
}

/// OS preference as reported by the desktop environment
#[derive(Debug, Default, Clone, Copy)]
pub struct OsColorScheme;

impl ColorSchemeSource for OsColorScheme {
    fn query(&self) -> Option<ColorScheme> {
        match dark_light::detect() {
            Ok(dark_light::Mode::Dark) => Some(ColorScheme::Dark),
            Ok(dark_light::Mode::Light) => Some(ColorScheme::Light),
            Ok(_) => None,
            Err(e) => {
                trace!("Color scheme detection unavailable: {:?}", e);
                None
            }
        }
    }
}

/// A preference that never changes, used for pinned themes and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedSource(pub Option<ColorScheme>);

impl ColorSchemeSource for FixedSource {
    fn query(&self) -> Option<ColorScheme> {
        self.0
    }
}

/// Pick the source matching the configured mode
pub fn source_for_mode(mode: ThemeMode) -> Arc<dyn ColorSchemeSource> {
    match mode {
        ThemeMode::Auto => Arc::new(OsColorScheme),
        ThemeMode::Dark => Arc::new(FixedSource(Some(ColorScheme::Dark))),
        ThemeMode::Light => Arc::new(FixedSource(Some(ColorScheme::Light))),
    }
}

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeState {
    /// Not started, stopped, or no preference capability
    Stopped,
    LightApplied,
    DarkApplied,
}

/// Background task re-reading the preference
struct ThemeWatcher {
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

/// Applies the OS color-scheme preference to the root class list
pub struct ThemeController {
    source: Arc<dyn ColorSchemeSource>,
    poll_interval: Duration,
    state: ThemeState,
    watcher: Option<ThemeWatcher>,
}

impl ThemeController {
    /// Create a stopped controller
    pub fn new(source: Arc<dyn ColorSchemeSource>, poll_interval: Duration) -> Self {
        Self {
            source,
            poll_interval: poll_interval.max(Duration::from_millis(1)),
            state: ThemeState::Stopped,
            watcher: None,
        }
    }

    pub fn state(&self) -> ThemeState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }

    /// Apply the current preference and start watching for changes
    ///
    /// `on_change` is called from the watcher task with each newly observed
    /// scheme; the owner is expected to pass it back to [`handle_change`].
    /// Returns false, leaving the root untouched, when the source has no
    /// preference to report. Must be called within a tokio runtime. Calling
    /// it again while running does nothing.
    ///
    /// [`handle_change`]: ThemeController::handle_change
    pub fn start<F>(&mut self, root: &mut RootClasses, on_change: F) -> bool
    where
        F: Fn(ColorScheme) + Send + 'static,
    {
        if self.is_running() {
            return true;
        }

        let Some(initial) = self.source.query() else {
            debug!("No color scheme preference available, keeping default theme");
            return false;
        };

        self.apply(initial, root);
        info!("Theme controller started with {:?} scheme", initial);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(watch_preference(
            self.source.clone(),
            self.poll_interval,
            initial,
            shutdown_rx,
            on_change,
        ));
        self.watcher = Some(ThemeWatcher {
            shutdown: Some(shutdown_tx),
            handle,
        });
        true
    }

    /// Re-apply a scheme reported by the watcher
    ///
    /// Ignored once the controller has been stopped.
    pub fn handle_change(&mut self, scheme: ColorScheme, root: &mut RootClasses) {
        if self.state == ThemeState::Stopped {
            trace!("Ignoring {:?} notification, controller stopped", scheme);
            return;
        }
        info!("OS color scheme changed to {:?}", scheme);
        self.apply(scheme, root);
    }

    /// Project a scheme onto the two marker classes
    pub fn apply(&mut self, scheme: ColorScheme, root: &mut RootClasses) {
        let dark = scheme.is_dark();
        root.toggle(DARK_THEME_CLASS, dark);
        root.toggle(LIGHT_THEME_CLASS, !dark);
        self.state = if dark {
            ThemeState::DarkApplied
        } else {
            ThemeState::LightApplied
        };
    }

    /// Stop watching; safe to call more than once
    pub fn stop(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            if let Some(shutdown) = watcher.shutdown.take() {
                let _ = shutdown.send(());
            }
            watcher.handle.abort();
            debug!("Theme controller stopped");
        }
        self.state = ThemeState::Stopped;
    }
}

impl Drop for ThemeController {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn watch_preference<F>(
    source: Arc<dyn ColorSchemeSource>,
    poll_interval: Duration,
    mut last: ColorScheme,
    mut shutdown: oneshot::Receiver<()>,
    on_change: F,
) where
    F: Fn(ColorScheme) + Send + 'static,
{
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        let query_source = source.clone();
        let observed = match tokio::task::spawn_blocking(move || query_source.query()).await {
            Ok(observed) => observed,
            Err(e) => {
                trace!("Color scheme query task failed: {}", e);
                None
            }
        };

        if let Some(scheme) = observed {
            if scheme != last {
                last = scheme;
                on_change(scheme);
            }
        }
    }

    trace!("Theme watcher exiting");
}

//! Terminal User Interface
//!
//! Provides the interactive pairing screen.
//!
//! # Layout
//!
//! - **Top**: tab bar with the "Pairing" and "Connect" tabs
//! - **Center**: the active tab; the pairing form or the connect placeholder
//! - **Bottom**: help bar with context-sensitive keybindings and status
//!
//! # Keybindings
//!
//! - `Tab` / `Shift+Tab`: Move between fields and buttons
//! - `Enter`: Submit the form (in a field) / press the focused button
//! - `Ctrl+U`: Clear the focused field
//! - `Ctrl+Left` / `Ctrl+Right` / `F2`: Switch tabs
//! - `Alt+1` / `Alt+2`: Jump to a tab
//! - `F1`: Show help
//! - `Esc`: Quit (with confirmation), `Ctrl+C` quits immediately

pub mod app;
pub mod events;
pub mod input;
pub mod panel;
pub mod ui;

use anyhow::{Context, Result};
use common::{SubmissionReceiver, create_submission_channel};
use crossterm::{
    event::Event,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::PairingConfig;
use crate::theme::{ColorScheme, ThemeController, source_for_mode};

pub use app::{App, AppAction, InputMode, PairingHandler, Tab};
pub use events::EventHandler;
pub use panel::{PairingPanel, PanelButton, PanelFocus, PanelOutcome};

/// Messages sent from background tasks to the TUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiMessage {
    /// The OS color scheme changed
    ThemeChanged(ColorScheme),
}

/// Owns the UI state, its channels and the theme controller
///
/// Everything here runs on the UI loop; terminal handling lives in
/// [`TuiRunner`].
pub struct Shell {
    /// Application state
    pub app: App,
    /// Theme controller
    pub theme: ThemeController,
    /// Receiving end of the panel's submission port
    submissions: SubmissionReceiver,
    /// Channel for receiving messages from background tasks
    message_rx: mpsc::Receiver<TuiMessage>,
    /// Channel for sending messages from background tasks
    message_tx: mpsc::Sender<TuiMessage>,
}

impl Shell {
    /// Build the shell: panel with its submission port, theme controller
    pub fn new(config: &PairingConfig, theme: ThemeController) -> Self {
        let (submission_tx, submissions) = create_submission_channel();
        let (message_tx, message_rx) = mpsc::channel(100);

        Self {
            app: App::new(&config.pairing, submission_tx),
            theme,
            submissions,
            message_rx,
            message_tx,
        }
    }

    /// Start the theme controller against the root class list
    ///
    /// Must be called within a tokio runtime.
    pub fn start_theme(&mut self) -> bool {
        let tx = self.message_tx.clone();
        self.theme.start(&mut self.app.root, move |scheme| {
            if let Err(e) = tx.try_send(TuiMessage::ThemeChanged(scheme)) {
                warn!("Dropped theme notification: {}", e);
            }
        })
    }

    /// Stop the theme controller
    pub fn stop_theme(&mut self) {
        self.theme.stop();
    }

    /// Process everything queued by the panel and background tasks
    pub fn process_pending(&mut self) {
        while let Ok(msg) = self.message_rx.try_recv() {
            self.handle_message(msg);
        }

        for submission in self.submissions.drain() {
            self.app.handle_submission(submission);
        }
    }

    /// Handle TUI message from a background task
    fn handle_message(&mut self, msg: TuiMessage) {
        match msg {
            TuiMessage::ThemeChanged(scheme) => {
                self.theme.handle_change(scheme, &mut self.app.root);
            }
        }
    }
}

/// TUI runner that manages the terminal and event loop
pub struct TuiRunner {
    /// Terminal instance
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// UI state and channels
    shell: Shell,
    /// Event handler
    event_handler: EventHandler,
}

impl TuiRunner {
    /// Create a new TUI runner
    pub fn new(config: &PairingConfig) -> Result<Self> {
        let theme = ThemeController::new(
            source_for_mode(config.theme.mode),
            config.theme.poll_interval(),
        );
        let shell = Shell::new(config, theme);

        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        Ok(Self {
            terminal,
            shell,
            event_handler: EventHandler::with_tick_rate(config.ui.tick_rate()),
        })
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting TUI");

        if !self.shell.start_theme() {
            debug!("Theme follows terminal defaults");
        }

        // Initial render
        self.terminal.draw(|f| ui::render(f, &self.shell.app))?;

        loop {
            self.shell.process_pending();

            // Poll for terminal events
            if let Some(event) = self.event_handler.poll()? {
                let action = match event {
                    Event::Key(key) => self.event_handler.handle_key(&mut self.shell.app, key),
                    Event::Resize(_, _) => {
                        // Terminal will re-render on next draw
                        AppAction::None
                    }
                    _ => AppAction::None,
                };

                if action == AppAction::Quit {
                    self.shell.app.confirm_quit();
                }
            }

            // Pick up a submission sent by this key press before drawing
            self.shell.process_pending();

            if self.shell.app.should_quit {
                break;
            }

            self.terminal.draw(|f| ui::render(f, &self.shell.app))?;
        }

        self.shell.stop_theme();
        info!(
            "TUI shutting down after {} pairing request(s)",
            self.shell.app.submissions_handled
        );
        Ok(())
    }
}

impl Drop for TuiRunner {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the TUI application
///
/// This is the main entry point for TUI mode. It creates a TuiRunner
/// and runs the main event loop.
///
/// # Example
/// ```no_run
/// use pairing::config::PairingConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = PairingConfig::default();
///     pairing::tui::run(&config).await
/// }
/// ```
pub async fn run(config: &PairingConfig) -> Result<()> {
    let mut runner = TuiRunner::new(config)?;
    runner.run().await
}

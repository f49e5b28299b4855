//! TUI application state
//!
//! The application shell: tab bar, the pairing panel, the root class list
//! the theme is applied to, overlays, and the handler for submissions.

use common::{PairingSubmission, SubmissionSender};
use tracing::info;

use super::panel::{PairingPanel, PanelButton, PanelOutcome};
use crate::config::PairingSettings;
use crate::theme::{ColorScheme, RootClasses};

/// Tabs of the shell, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Hosts the pairing panel
    Pairing,
    /// Placeholder for connecting to an already paired device
    Connect,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Pairing, Tab::Connect];

    /// Panel name
    pub fn name(self) -> &'static str {
        match self {
            Tab::Pairing => "pairing",
            Tab::Connect => "connect",
        }
    }

    /// Tab label
    pub fn title(self) -> &'static str {
        match self {
            Tab::Pairing => "Pairing",
            Tab::Connect => "Connect",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Pairing => 0,
            Tab::Connect => 1,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys go to the active tab
    Normal,
    /// Showing help overlay
    Help,
    /// Confirm quit dialog
    ConfirmQuit,
}

/// User action to be processed by the main loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// No action
    None,
    /// Quit the application
    Quit,
}

/// Receives confirmed pairing requests
///
/// A pairing client would implement this; until then the shell records
/// what it receives.
pub trait PairingHandler {
    fn on_submit(&mut self, submission: &PairingSubmission);
}

/// Handler that only logs and remembers what was submitted
#[derive(Debug, Default)]
pub struct DiagnosticHandler {
    /// Number of submissions seen
    pub count: usize,
    /// Most recent submission
    pub last: Option<PairingSubmission>,
}

impl PairingHandler for DiagnosticHandler {
    fn on_submit(&mut self, submission: &PairingSubmission) {
        info!(addr = %submission.addr, "Pairing request received");
        self.count += 1;
        self.last = Some(submission.clone());
    }
}

/// Main application state
pub struct App {
    /// Pairing tab content
    pub panel: PairingPanel,
    /// Currently shown tab
    pub active_tab: Tab,
    /// Marker classes of the UI root
    pub root: RootClasses,
    /// Submission handler
    pub handler: Box<dyn PairingHandler + Send>,
    /// Submissions handled so far
    pub submissions_handled: usize,
    /// Current input mode
    pub input_mode: InputMode,
    /// Status message to display
    pub status_message: Option<String>,
    /// Should quit flag
    pub should_quit: bool,
}

impl App {
    /// Create a new application state
    ///
    /// `submissions` is handed to the pairing panel; the caller keeps the
    /// receiving end and passes what arrives to [`App::handle_submission`].
    pub fn new(settings: &PairingSettings, submissions: SubmissionSender) -> Self {
        Self::with_handler(settings, submissions, Box::new(DiagnosticHandler::default()))
    }

    /// Create the application state with a custom submission handler
    pub fn with_handler(
        settings: &PairingSettings,
        submissions: SubmissionSender,
        handler: Box<dyn PairingHandler + Send>,
    ) -> Self {
        Self {
            panel: PairingPanel::new(settings, submissions),
            active_tab: Tab::Pairing,
            root: RootClasses::new(),
            handler,
            submissions_handled: 0,
            input_mode: InputMode::Normal,
            status_message: None,
            should_quit: false,
        }
    }

    /// Scheme currently applied to the root, if any
    pub fn color_scheme(&self) -> Option<ColorScheme> {
        self.root.color_scheme()
    }

    pub fn next_tab(&mut self) {
        self.active_tab = self.active_tab.next();
    }

    pub fn prev_tab(&mut self) {
        self.active_tab = self.active_tab.prev();
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Pass a submission to the handler
    pub fn handle_submission(&mut self, submission: PairingSubmission) {
        self.handler.on_submit(&submission);
        self.submissions_handled += 1;
        self.set_status(format!("Pairing request for {}", submission));
    }

    /// Reflect what the panel did in the status line
    pub fn handle_panel_outcome(&mut self, outcome: PanelOutcome) {
        match outcome {
            // A stale status goes away once the user keeps editing
            PanelOutcome::Handled => self.clear_status(),
            // The shell reports it once the submission is handled
            PanelOutcome::Submitted(_) => {}
            PanelOutcome::Rejected(errors) => {
                if let Some(first) = errors.first() {
                    self.set_status(format!("Cannot pair: {}", first));
                }
            }
            PanelOutcome::Button(button) => self.handle_button(button),
            PanelOutcome::Dropped(reason) => {
                self.set_status(format!("Pairing request not delivered: {}", reason));
            }
        }
    }

    /// Buttons have no behaviour yet
    fn handle_button(&mut self, button: PanelButton) {
        info!("'{}' pressed, not implemented", button.label());
        self.set_status(format!("'{}' is not available yet", button.label()));
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    /// Show quit confirmation
    pub fn show_quit_confirm(&mut self) {
        self.input_mode = InputMode::ConfirmQuit;
    }

    /// Cancel current overlay
    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Confirm quit
    pub fn confirm_quit(&mut self) {
        self.should_quit = true;
    }

    /// Set status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

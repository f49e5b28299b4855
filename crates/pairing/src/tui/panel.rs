//! Pairing panel: IP, port and pairing code inputs with Pair/Skip buttons
//!
//! The panel owns its three inputs from construction on. Enter pressed
//! while one of the inputs has focus composes a [`PairingSubmission`] and
//! sends it through the [`SubmissionSender`] handed to [`PairingPanel::new`].
//! The buttons take focus but have no behaviour of their own yet; pressing
//! one is reported to the caller as [`PanelOutcome::Button`].

use common::address::{PAIRING_CODE_LEN, PORT_MAX_LEN, validate_form};
use common::{AddressJoin, Field, FieldError, PairingSubmission, SubmissionSender};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::input::TextInput;
use crate::config::PairingSettings;

/// Focusable elements in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    Ip,
    Port,
    PairingCode,
    Skip,
    Pair,
}

impl PanelFocus {
    const ORDER: [PanelFocus; 5] = [
        PanelFocus::Ip,
        PanelFocus::Port,
        PanelFocus::PairingCode,
        PanelFocus::Skip,
        PanelFocus::Pair,
    ];

    fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|f| *f == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// Whether this element sits inside the input container
    pub fn is_input(self) -> bool {
        matches!(
            self,
            PanelFocus::Ip | PanelFocus::Port | PanelFocus::PairingCode
        )
    }

    fn field(self) -> Option<Field> {
        match self {
            PanelFocus::Ip => Some(Field::Ip),
            PanelFocus::Port => Some(Field::Port),
            PanelFocus::PairingCode => Some(Field::PairingCode),
            PanelFocus::Skip | PanelFocus::Pair => None,
        }
    }
}

/// Action buttons under the inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelButton {
    /// "Paired? Skip"
    Skip,
    /// "Pair"
    Pair,
}

impl PanelButton {
    pub fn label(self) -> &'static str {
        match self {
            PanelButton::Skip => "Paired? Skip",
            PanelButton::Pair => "Pair",
        }
    }
}

/// Result of feeding a key to the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelOutcome {
    /// Key consumed (or ignored) with nothing to report
    Handled,
    /// A submission was sent through the port
    Submitted(PairingSubmission),
    /// Enter was pressed but some fields were rejected
    Rejected(Vec<FieldError>),
    /// A button was pressed
    Button(PanelButton),
    /// The submission could not be delivered
    Dropped(String),
}

/// Pairing form state
pub struct PairingPanel {
    ip: TextInput,
    port: TextInput,
    pairing_code: TextInput,
    focus: PanelFocus,
    address_join: AddressJoin,
    validate: bool,
    errors: HashMap<Field, FieldError>,
    port_tx: SubmissionSender,
}

impl PairingPanel {
    /// Create the panel with its inputs and the port submissions go to
    pub fn new(settings: &PairingSettings, port_tx: SubmissionSender) -> Self {
        let mut port = TextInput::with_max_len(PORT_MAX_LEN);
        port.set_value(&settings.default_port);

        Self {
            ip: TextInput::new(),
            port,
            pairing_code: TextInput::with_max_len(PAIRING_CODE_LEN),
            focus: PanelFocus::Ip,
            address_join: settings.address_join,
            validate: settings.validate,
            errors: HashMap::new(),
            port_tx,
        }
    }

    pub fn ip(&self) -> &TextInput {
        &self.ip
    }

    pub fn port(&self) -> &TextInput {
        &self.port
    }

    pub fn pairing_code(&self) -> &TextInput {
        &self.pairing_code
    }

    pub fn focus(&self) -> PanelFocus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: PanelFocus) {
        self.focus = focus;
    }

    pub fn address_join(&self) -> AddressJoin {
        self.address_join
    }

    /// Validation error shown under a field, if any
    pub fn error_for(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            PanelFocus::Ip => Some(&mut self.ip),
            PanelFocus::Port => Some(&mut self.port),
            PanelFocus::PairingCode => Some(&mut self.pairing_code),
            PanelFocus::Skip | PanelFocus::Pair => None,
        }
    }

    /// Editing a field clears its stale error
    fn touch_focused(&mut self) {
        if let Some(field) = self.focus.field() {
            self.errors.remove(&field);
        }
    }

    /// Feed a key press to the panel
    pub fn handle_key(&mut self, key: KeyEvent) -> PanelOutcome {
        match key.code {
            KeyCode::Enter => self.handle_enter(),
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                PanelOutcome::Handled
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                PanelOutcome::Handled
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.touch_focused();
                if let Some(input) = self.focused_input() {
                    input.clear();
                }
                PanelOutcome::Handled
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.touch_focused();
                if let Some(input) = self.focused_input() {
                    input.insert(c);
                }
                PanelOutcome::Handled
            }
            KeyCode::Backspace => {
                self.touch_focused();
                if let Some(input) = self.focused_input() {
                    input.backspace();
                }
                PanelOutcome::Handled
            }
            KeyCode::Delete => {
                self.touch_focused();
                if let Some(input) = self.focused_input() {
                    input.delete();
                }
                PanelOutcome::Handled
            }
            KeyCode::Left => {
                match self.focused_input() {
                    Some(input) => input.move_left(),
                    None => self.focus = PanelFocus::Skip,
                }
                PanelOutcome::Handled
            }
            KeyCode::Right => {
                match self.focused_input() {
                    Some(input) => input.move_right(),
                    None => self.focus = PanelFocus::Pair,
                }
                PanelOutcome::Handled
            }
            KeyCode::Home => {
                if let Some(input) = self.focused_input() {
                    input.move_home();
                }
                PanelOutcome::Handled
            }
            KeyCode::End => {
                if let Some(input) = self.focused_input() {
                    input.move_end();
                }
                PanelOutcome::Handled
            }
            _ => PanelOutcome::Handled,
        }
    }

    fn handle_enter(&mut self) -> PanelOutcome {
        match self.focus {
            PanelFocus::Skip => PanelOutcome::Button(PanelButton::Skip),
            PanelFocus::Pair => PanelOutcome::Button(PanelButton::Pair),
            PanelFocus::Ip | PanelFocus::Port | PanelFocus::PairingCode => self.submit(),
        }
    }

    /// Read all three inputs and send one submission
    fn submit(&mut self) -> PanelOutcome {
        let ip = self.ip.value();
        let port = self.port.value();
        let pairing_code = self.pairing_code.value();

        let submission = if self.validate {
            match validate_form(ip, port, pairing_code) {
                Ok(form) => {
                    self.errors.clear();
                    PairingSubmission::new(
                        self.address_join.join_validated(&form),
                        form.pairing_code,
                    )
                }
                Err(errors) => {
                    debug!("Pairing form rejected: {} invalid field(s)", errors.len());
                    self.errors = errors.iter().map(|e| (e.field(), e.clone())).collect();
                    if let Some(first) = errors.first().and_then(|e| focus_for(e.field())) {
                        self.focus = first;
                    }
                    return PanelOutcome::Rejected(errors);
                }
            }
        } else {
            PairingSubmission::new(self.address_join.join(ip, port), pairing_code)
        };

        match self.port_tx.submit(submission.clone()) {
            Ok(()) => {
                debug!("Pairing form submitted for {}", submission.addr);
                PanelOutcome::Submitted(submission)
            }
            Err(e) => {
                warn!("Failed to deliver pairing submission: {}", e);
                PanelOutcome::Dropped(e.to_string())
            }
        }
    }
}

fn focus_for(field: Field) -> Option<PanelFocus> {
    PanelFocus::ORDER
        .into_iter()
        .find(|f| f.field() == Some(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{SubmissionReceiver, create_submission_channel};
    use std::net::SocketAddr;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(panel: &mut PairingPanel, text: &str) {
        for c in text.chars() {
            panel.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn panel_with(join: AddressJoin, validate: bool) -> (PairingPanel, SubmissionReceiver) {
        let (tx, rx) = create_submission_channel();
        let settings = PairingSettings {
            address_join: join,
            validate,
            default_port: String::new(),
        };
        (PairingPanel::new(&settings, tx), rx)
    }

    /// Type ip, tab, port, tab, code; focus ends on the code field
    fn fill(panel: &mut PairingPanel, ip: &str, port: &str, code: &str) {
        type_text(panel, ip);
        panel.handle_key(key(KeyCode::Tab));
        type_text(panel, port);
        panel.handle_key(key(KeyCode::Tab));
        type_text(panel, code);
    }

    #[test]
    fn test_literal_join_reproduces_concatenation() {
        let (mut panel, rx) = panel_with(AddressJoin::Literal, false);
        fill(&mut panel, "192.168.1.5", "8080", "123456");

        let outcome = panel.handle_key(key(KeyCode::Enter));
        let expected = PairingSubmission::new("192.168.1.58080", "123456");
        assert_eq!(outcome, PanelOutcome::Submitted(expected.clone()));
        assert_eq!(rx.drain(), vec![expected]);
    }

    #[test]
    fn test_separator_join() {
        let (mut panel, rx) = panel_with(AddressJoin::Separator, true);
        fill(&mut panel, "192.168.1.5", "8080", "123456");

        panel.handle_key(key(KeyCode::Enter));
        let submissions = rx.drain();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].addr, "192.168.1.5:8080");
        assert_eq!(submissions[0].pairing_code, "123456");
    }

    #[test]
    fn test_enter_from_any_input_submits() {
        let (mut panel, rx) = panel_with(AddressJoin::Separator, true);
        fill(&mut panel, "10.0.0.7", "37199", "654321");

        for focus in [PanelFocus::Ip, PanelFocus::Port, PanelFocus::PairingCode] {
            panel.set_focus(focus);
            panel.handle_key(key(KeyCode::Enter));
        }
        assert_eq!(rx.drain().len(), 3);
    }

    #[test]
    fn test_other_keys_never_submit() {
        let (mut panel, rx) = panel_with(AddressJoin::Literal, false);
        fill(&mut panel, "192.168.1.5", "8080", "123456");

        for code in [
            KeyCode::Tab,
            KeyCode::BackTab,
            KeyCode::Left,
            KeyCode::Right,
            KeyCode::Home,
            KeyCode::End,
            KeyCode::Esc,
            KeyCode::F(5),
            KeyCode::Char('x'),
            KeyCode::Backspace,
        ] {
            panel.handle_key(key(code));
        }
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_buttons_do_not_submit() {
        let (mut panel, rx) = panel_with(AddressJoin::Separator, true);
        fill(&mut panel, "192.168.1.5", "8080", "123456");

        panel.handle_key(key(KeyCode::Tab));
        assert_eq!(panel.focus(), PanelFocus::Skip);
        assert_eq!(
            panel.handle_key(key(KeyCode::Enter)),
            PanelOutcome::Button(PanelButton::Skip)
        );

        panel.handle_key(key(KeyCode::Right));
        assert_eq!(panel.focus(), PanelFocus::Pair);
        assert_eq!(
            panel.handle_key(key(KeyCode::Enter)),
            PanelOutcome::Button(PanelButton::Pair)
        );

        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_validation_blocks_submission() {
        let (mut panel, rx) = panel_with(AddressJoin::Separator, true);
        fill(&mut panel, "192.168.1", "8080", "12345");

        let outcome = panel.handle_key(key(KeyCode::Enter));
        match outcome {
            PanelOutcome::Rejected(errors) => assert_eq!(errors.len(), 2),
            other => panic!("Expected rejection, got {:?}", other),
        }
        assert!(rx.drain().is_empty());
        assert!(panel.error_for(Field::Ip).is_some());
        assert!(panel.error_for(Field::Port).is_none());
        assert_eq!(
            panel.error_for(Field::PairingCode),
            Some(&FieldError::InvalidPairingCode)
        );
        // Focus jumps to the first bad field
        assert_eq!(panel.focus(), PanelFocus::Ip);

        // Editing clears that field's error
        type_text(&mut panel, ".5");
        assert!(panel.error_for(Field::Ip).is_none());
        assert!(panel.has_errors());
    }

    #[test]
    fn test_bracketed_ipv6_host_composes_socket_address() {
        for host in ["[fe80::1]", "fe80::1", " [::1] "] {
            let (mut panel, rx) = panel_with(AddressJoin::Separator, true);
            fill(&mut panel, host, "5555", "123456");

            assert!(matches!(
                panel.handle_key(key(KeyCode::Enter)),
                PanelOutcome::Submitted(_)
            ));
            let submissions = rx.drain();
            assert_eq!(submissions.len(), 1);
            assert!(
                submissions[0].addr.parse::<SocketAddr>().is_ok(),
                "{}",
                submissions[0].addr
            );
        }
    }

    #[test]
    fn test_malformed_ipv6_host_is_rejected() {
        for host in ["[fe80::1", "fe80::1]", "[10.0.0.1]", "fe80:::1", "[fe80::1]:5555"] {
            let (mut panel, rx) = panel_with(AddressJoin::Separator, true);
            fill(&mut panel, host, "5555", "123456");

            assert_eq!(
                panel.handle_key(key(KeyCode::Enter)),
                PanelOutcome::Rejected(vec![FieldError::InvalidIp(host.to_string())])
            );
            assert!(rx.drain().is_empty());
            assert_eq!(panel.focus(), PanelFocus::Ip);
        }
    }

    #[test]
    fn test_empty_form_passes_through_without_validation() {
        let (mut panel, rx) = panel_with(AddressJoin::Literal, false);
        let outcome = panel.handle_key(key(KeyCode::Enter));
        assert_eq!(
            outcome,
            PanelOutcome::Submitted(PairingSubmission::new("", ""))
        );
        assert_eq!(rx.drain().len(), 1);
    }

    #[test]
    fn test_field_length_caps() {
        let (mut panel, _rx) = panel_with(AddressJoin::Literal, false);
        fill(&mut panel, "192.168.100.200", "1234567", "12345678");

        assert_eq!(panel.ip().value(), "192.168.100.200");
        assert_eq!(panel.port().value(), "12345");
        assert_eq!(panel.pairing_code().value(), "123456");
    }

    #[test]
    fn test_ctrl_u_clears_focused_field() {
        let (mut panel, _rx) = panel_with(AddressJoin::Literal, false);
        fill(&mut panel, "10.0.0.1", "5555", "111111");

        panel.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert!(panel.pairing_code().is_empty());
        assert_eq!(panel.port().value(), "5555");
    }

    #[test]
    fn test_focus_cycles() {
        let mut focus = PanelFocus::Ip;
        for _ in 0..5 {
            focus = focus.next();
        }
        assert_eq!(focus, PanelFocus::Ip);
        assert_eq!(PanelFocus::Ip.prev(), PanelFocus::Pair);
    }

    #[test]
    fn test_default_port_prefill() {
        let (tx, _rx) = create_submission_channel();
        let settings = PairingSettings {
            default_port: "5555".to_string(),
            ..PairingSettings::default()
        };
        let panel = PairingPanel::new(&settings, tx);
        assert_eq!(panel.port().value(), "5555");
    }

    #[test]
    fn test_dropped_receiver_is_reported() {
        let (mut panel, rx) = panel_with(AddressJoin::Literal, false);
        drop(rx);
        assert!(matches!(
            panel.handle_key(key(KeyCode::Enter)),
            PanelOutcome::Dropped(_)
        ));
    }
}

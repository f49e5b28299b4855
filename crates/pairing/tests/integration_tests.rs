//! Pairing Integration Tests
//!
//! Exercises the pairing crate through its public API:
//! - Configuration save/load round trips
//! - Form submission through the shell's key handling
//! - Theme markers driven by the controller
//!
//! Run with: `cargo test -p pairing --test integration_tests`

use common::{AddressJoin, PairingSubmission, SubmissionReceiver, create_submission_channel};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pairing::config::{PairingConfig, PairingSettings};
use pairing::theme::{
    ColorScheme, DARK_THEME_CLASS, FixedSource, LIGHT_THEME_CLASS, RootClasses, ThemeController,
    ThemeMode,
};
use pairing::tui::{App, EventHandler};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn press(handler: &EventHandler, app: &mut App, code: KeyCode) {
    handler.handle_key(app, KeyEvent::new(code, KeyModifiers::empty()));
}

fn type_text(handler: &EventHandler, app: &mut App, text: &str) {
    for c in text.chars() {
        press(handler, app, KeyCode::Char(c));
    }
}

fn app_with(join: AddressJoin, validate: bool) -> (App, SubmissionReceiver) {
    let (tx, rx) = create_submission_channel();
    let settings = PairingSettings {
        address_join: join,
        validate,
        default_port: String::new(),
    };
    (App::new(&settings, tx), rx)
}

fn fill_and_submit(app: &mut App, ip: &str, port: &str, code: &str) {
    let handler = EventHandler::new();
    type_text(&handler, app, ip);
    press(&handler, app, KeyCode::Tab);
    type_text(&handler, app, port);
    press(&handler, app, KeyCode::Tab);
    type_text(&handler, app, code);
    press(&handler, app, KeyCode::Enter);
}

// ============================================================================
// Configuration
// ============================================================================

mod config {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = PairingConfig::default();
        config.theme.mode = ThemeMode::Light;
        config.pairing.address_join = AddressJoin::Literal;
        config.pairing.default_port = "37000".to_string();
        config.save(&path).unwrap();

        let loaded = PairingConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.theme.mode, ThemeMode::Light);
        assert_eq!(loaded.pairing.address_join, AddressJoin::Literal);
        assert_eq!(loaded.pairing.default_port, "37000");
        assert!(loaded.pairing.validate);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nlog_level = \"chatty\"\n").unwrap();

        assert!(PairingConfig::load(Some(path)).is_err());
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pairing\nvalidate = ").unwrap();

        assert!(PairingConfig::load(Some(path)).is_err());
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(PairingConfig::load(Some(dir.path().join("absent.toml"))).is_err());
    }
}

// ============================================================================
// Form submission
// ============================================================================

mod submission {
    use super::*;

    #[test]
    fn test_example_scenario_literal() {
        let (mut app, rx) = app_with(AddressJoin::Literal, false);
        fill_and_submit(&mut app, "192.168.1.5", "8080", "123456");

        assert_eq!(
            rx.drain(),
            vec![PairingSubmission::new("192.168.1.58080", "123456")]
        );
    }

    #[test]
    fn test_example_scenario_separator() {
        let (mut app, rx) = app_with(AddressJoin::Separator, true);
        fill_and_submit(&mut app, "192.168.1.5", "8080", "123456");

        assert_eq!(
            rx.drain(),
            vec![PairingSubmission::new("192.168.1.5:8080", "123456")]
        );
    }

    #[test]
    fn test_ipv6_host_is_bracketed() {
        let (mut app, rx) = app_with(AddressJoin::Separator, true);
        fill_and_submit(&mut app, "fe80::1", "5555", "000111");

        let submissions = rx.drain();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].addr, "[fe80::1]:5555");
    }

    #[test]
    fn test_invalid_form_is_not_submitted() {
        let (mut app, rx) = app_with(AddressJoin::Separator, true);
        fill_and_submit(&mut app, "", "", "");

        assert!(rx.drain().is_empty());
        assert!(app.panel.has_errors());
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_shell_handles_each_submission_once() {
        let (mut app, rx) = app_with(AddressJoin::Separator, true);
        fill_and_submit(&mut app, "10.0.0.9", "41000", "246810");

        for submission in rx.drain() {
            app.handle_submission(submission);
        }
        assert_eq!(app.submissions_handled, 1);
        assert!(rx.drain().is_empty());
    }

    /// Field content a user could type: printable, no whitespace-only edits
    fn field(max: usize) -> impl Strategy<Value = String> {
        proptest::collection::vec(proptest::char::range('!', '~'), 0..=max)
            .prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_enter_emits_literal_concatenation(
            ip in field(20),
            port in field(5),
            code in field(6),
        ) {
            let (mut app, rx) = app_with(AddressJoin::Literal, false);
            fill_and_submit(&mut app, &ip, &port, &code);

            let submissions = rx.drain();
            prop_assert_eq!(submissions.len(), 1);
            prop_assert_eq!(&submissions[0].addr, &format!("{}{}", ip, port));
            prop_assert_eq!(&submissions[0].pairing_code, &code);
        }

        #[test]
        fn prop_non_enter_keys_never_emit(
            text in field(12),
        ) {
            let (mut app, rx) = app_with(AddressJoin::Literal, false);
            let handler = EventHandler::new();
            type_text(&handler, &mut app, &text);
            for code in [KeyCode::Tab, KeyCode::Backspace, KeyCode::Left, KeyCode::Home] {
                press(&handler, &mut app, code);
            }
            prop_assert!(rx.drain().is_empty());
        }
    }
}

// ============================================================================
// Theme markers
// ============================================================================

mod theme {
    use super::*;

    fn controller(scheme: Option<ColorScheme>) -> ThemeController {
        ThemeController::new(Arc::new(FixedSource(scheme)), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_dark_preference_sets_only_dark_marker() {
        let mut root = RootClasses::new();
        let mut controller = controller(Some(ColorScheme::Dark));
        controller.start(&mut root, |_| {});

        assert!(root.contains(DARK_THEME_CLASS));
        assert!(!root.contains(LIGHT_THEME_CLASS));

        controller.handle_change(ColorScheme::Dark, &mut root);
        assert!(root.contains(DARK_THEME_CLASS));
        assert!(!root.contains(LIGHT_THEME_CLASS));
        controller.stop();
    }

    #[tokio::test]
    async fn test_light_preference_sets_only_light_marker() {
        let mut root = RootClasses::new();
        let mut controller = controller(Some(ColorScheme::Light));
        controller.start(&mut root, |_| {});

        assert!(root.contains(LIGHT_THEME_CLASS));
        assert!(!root.contains(DARK_THEME_CLASS));

        controller.handle_change(ColorScheme::Light, &mut root);
        assert!(root.contains(LIGHT_THEME_CLASS));
        assert!(!root.contains(DARK_THEME_CLASS));
        controller.stop();
    }

    #[tokio::test]
    async fn test_absent_capability_adds_nothing() {
        let mut root = RootClasses::new();
        let mut controller = controller(None);

        assert!(!controller.start(&mut root, |_| {}));
        assert!(root.is_empty());
    }
}

//! TUI rendering with ratatui
//!
//! Renders the tab bar, the active tab, the status/help bar and overlays.
//! Colors come from the [`Palette`] matching the theme marker on the root.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};

use super::app::{App, InputMode, Tab};
use super::input::TextInput;
use super::panel::{PairingPanel, PanelButton, PanelFocus};
use crate::theme::ColorScheme;
use common::Field;

/// Colors used in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub muted: Color,
    pub accent: Color,
    pub active_border: Color,
    pub inactive_border: Color,
    pub input_bg: Color,
    pub error: Color,
    pub status_bar_bg: Color,
    pub primary_button_fg: Color,
    pub primary_button_bg: Color,
}

impl Palette {
    pub const DARK: Palette = Palette {
        fg: Color::Rgb(228, 228, 231),
        bg: Color::Rgb(24, 24, 27),
        muted: Color::Rgb(161, 161, 170),
        accent: Color::Rgb(56, 189, 248),
        active_border: Color::Rgb(56, 189, 248),
        inactive_border: Color::Rgb(82, 82, 91),
        input_bg: Color::Rgb(39, 39, 42),
        error: Color::Rgb(248, 113, 113),
        status_bar_bg: Color::Rgb(39, 39, 42),
        primary_button_fg: Color::Rgb(24, 24, 27),
        primary_button_bg: Color::Rgb(56, 189, 248),
    };

    pub const LIGHT: Palette = Palette {
        fg: Color::Rgb(24, 24, 27),
        bg: Color::Rgb(250, 250, 250),
        muted: Color::Rgb(113, 113, 122),
        accent: Color::Rgb(2, 132, 199),
        active_border: Color::Rgb(2, 132, 199),
        inactive_border: Color::Rgb(212, 212, 216),
        input_bg: Color::Rgb(244, 244, 245),
        error: Color::Rgb(220, 38, 38),
        status_bar_bg: Color::Rgb(228, 228, 231),
        primary_button_fg: Color::Rgb(255, 255, 255),
        primary_button_bg: Color::Rgb(2, 132, 199),
    };

    /// Terminal colors, used until a theme marker is applied
    pub const TERMINAL: Palette = Palette {
        fg: Color::Reset,
        bg: Color::Reset,
        muted: Color::DarkGray,
        accent: Color::Cyan,
        active_border: Color::Cyan,
        inactive_border: Color::Gray,
        input_bg: Color::Reset,
        error: Color::Red,
        status_bar_bg: Color::Blue,
        primary_button_fg: Color::Black,
        primary_button_bg: Color::Cyan,
    };

    pub fn for_scheme(scheme: Option<ColorScheme>) -> Palette {
        match scheme {
            Some(ColorScheme::Dark) => Palette::DARK,
            Some(ColorScheme::Light) => Palette::LIGHT,
            None => Palette::TERMINAL,
        }
    }
}

/// Width of the port input box, borders included
const PORT_BOX_WIDTH: u16 = 11;

/// Render the complete UI
pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::for_scheme(app.color_scheme());

    frame.render_widget(
        Block::default().style(Style::default().fg(palette.fg).bg(palette.bg)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(10),   // Active tab
            Constraint::Length(1), // Status / help bar
        ])
        .split(frame.area());

    render_tab_bar(frame, app, &palette, chunks[0]);
    match app.active_tab {
        Tab::Pairing => render_pairing_tab(frame, &app.panel, &palette, chunks[1]),
        Tab::Connect => render_connect_tab(frame, &palette, chunks[1]),
    }
    render_status_bar(frame, app, &palette, chunks[2]);

    match app.input_mode {
        InputMode::Help => render_help_overlay(frame, &palette),
        InputMode::ConfirmQuit => render_quit_dialog(frame, &palette),
        InputMode::Normal => {}
    }
}

/// Render the tab bar
fn render_tab_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.active_tab.index())
        .style(Style::default().fg(palette.muted))
        .highlight_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(palette.inactive_border))
                .title(" ADB Wireless Pairing ")
                .title_style(Style::default().fg(palette.fg).add_modifier(Modifier::BOLD)),
        );

    frame.render_widget(tabs, area);
}

/// Render the pairing form
fn render_pairing_tab(frame: &mut Frame, panel: &PairingPanel, palette: &Palette, area: Rect) {
    let frame_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(20),
            Constraint::Length(2),
        ])
        .split(area)[1];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // IP/port label
            Constraint::Length(3), // IP : port
            Constraint::Length(1), // IP/port errors
            Constraint::Length(1), // Code label
            Constraint::Length(3), // Code
            Constraint::Length(1), // Code error
            Constraint::Min(1),    // Spacer
            Constraint::Length(3), // Buttons
        ])
        .split(frame_area);

    render_label(frame, "Pairing IP and port", palette, rows[1]);

    let ip_port = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(PORT_BOX_WIDTH),
        ])
        .split(rows[2]);

    render_input(
        frame,
        panel.ip(),
        "",
        panel.focus() == PanelFocus::Ip,
        panel.error_for(Field::Ip).is_some(),
        palette,
        ip_port[0],
    );
    let divider = Paragraph::new(Line::from(Span::styled(
        ":",
        Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::NONE));
    frame.render_widget(divider, Rect { y: ip_port[1].y + 1, height: 1, ..ip_port[1] });
    render_input(
        frame,
        panel.port(),
        "*****",
        panel.focus() == PanelFocus::Port,
        panel.error_for(Field::Port).is_some(),
        palette,
        ip_port[2],
    );

    let ip_port_error = panel
        .error_for(Field::Ip)
        .or_else(|| panel.error_for(Field::Port))
        .map(|e| e.to_string());
    render_error(frame, ip_port_error, palette, rows[3]);

    render_label(frame, "Pairing Code", palette, rows[4]);
    render_input(
        frame,
        panel.pairing_code(),
        "******",
        panel.focus() == PanelFocus::PairingCode,
        panel.error_for(Field::PairingCode).is_some(),
        palette,
        rows[5],
    );
    render_error(
        frame,
        panel.error_for(Field::PairingCode).map(|e| e.to_string()),
        palette,
        rows[6],
    );

    render_buttons(frame, panel, palette, rows[8]);
}

fn render_label(frame: &mut Frame, label: &str, palette: &Palette, area: Rect) {
    let paragraph = Paragraph::new(Span::styled(label, Style::default().fg(palette.fg)));
    frame.render_widget(paragraph, area);
}

fn render_error(frame: &mut Frame, message: Option<String>, palette: &Palette, area: Rect) {
    if let Some(message) = message {
        let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(palette.error)));
        frame.render_widget(paragraph, area);
    }
}

/// Render a bordered input box, placing the cursor when focused
fn render_input(
    frame: &mut Frame,
    input: &TextInput,
    placeholder: &str,
    focused: bool,
    invalid: bool,
    palette: &Palette,
    area: Rect,
) {
    let border_color = if invalid {
        palette.error
    } else if focused {
        palette.active_border
    } else {
        palette.inactive_border
    };

    let content = if input.is_empty() {
        Span::styled(placeholder.to_string(), Style::default().fg(palette.muted))
    } else {
        Span::styled(input.value().to_string(), Style::default().fg(palette.fg))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(palette.input_bg));
    let inner = block.inner(area);

    // Keep the cursor visible in narrow boxes
    let column = input.cursor_column() as u16;
    let scroll = column.saturating_sub(inner.width.saturating_sub(1));
    let paragraph = Paragraph::new(Line::from(content))
        .block(block)
        .scroll((0, scroll));
    frame.render_widget(paragraph, area);

    if focused && inner.width > 0 {
        let x = inner.x + column.saturating_sub(scroll);
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

/// Render the right-aligned action buttons
fn render_buttons(frame: &mut Frame, panel: &PairingPanel, palette: &Palette, area: Rect) {
    let buttons = [
        (PanelButton::Skip, PanelFocus::Skip, false),
        (PanelButton::Pair, PanelFocus::Pair, true),
    ];
    let widths: Vec<u16> = buttons
        .iter()
        .map(|(button, _, _)| button.label().len() as u16 + 4)
        .collect();

    let mut constraints = vec![Constraint::Min(0)];
    for width in &widths {
        constraints.push(Constraint::Length(*width));
        constraints.push(Constraint::Length(1));
    }
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (i, (button, focus, primary)) in buttons.iter().enumerate() {
        let focused = panel.focus() == *focus;
        let style = if *primary {
            Style::default()
                .fg(palette.primary_button_fg)
                .bg(palette.primary_button_bg)
        } else {
            Style::default().fg(palette.fg)
        };
        let border_color = if focused {
            palette.active_border
        } else {
            palette.inactive_border
        };
        let label_style = if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        };

        let widget = Paragraph::new(Span::styled(button.label(), label_style))
            .alignment(Alignment::Center)
            .style(style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color)),
            );
        frame.render_widget(widget, cells[1 + i * 2]);
    }
}

/// Render the placeholder Connect tab
fn render_connect_tab(frame: &mut Frame, palette: &Palette, area: Rect) {
    let paragraph = Paragraph::new("This is the custom tab panel.")
        .style(Style::default().fg(palette.muted))
        .block(Block::default().borders(Borders::NONE))
        .wrap(Wrap { trim: true });

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(1)])
        .split(area)[0];
    frame.render_widget(paragraph, inner);
}

/// Render the bottom status/help bar
fn render_status_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let help_text = match app.input_mode {
        InputMode::Normal => match app.active_tab {
            Tab::Pairing => {
                "Tab: Next field | Enter: Submit | Ctrl+U: Clear | Ctrl+←/→: Tabs | F1: Help | Esc: Quit"
            }
            Tab::Connect => "Ctrl+←/→ or F2: Tabs | F1: Help | Esc: Quit",
        },
        InputMode::Help => "Esc: Close help",
        InputMode::ConfirmQuit => "y: Quit | n: Cancel",
    };

    let mut spans = vec![Span::styled(
        help_text,
        Style::default().fg(palette.fg),
    )];
    if let Some(message) = &app.status_message {
        spans.push(Span::styled(
            format!(" | {}", message),
            Style::default().fg(palette.accent),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(palette.status_bar_bg))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Render the help overlay
fn render_help_overlay(frame: &mut Frame, palette: &Palette) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area first
    frame.render_widget(Clear, area);

    let heading = Style::default().add_modifier(Modifier::BOLD);
    let help_text = Text::from(vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            heading.add_modifier(Modifier::UNDERLINED),
        )),
        Line::from(""),
        Line::from(Span::styled("Pairing form", heading)),
        Line::from("  Tab / Down       Next field or button"),
        Line::from("  Shift+Tab / Up   Previous field or button"),
        Line::from("  Enter            Submit (in a field) / press button"),
        Line::from("  Ctrl+U           Clear the current field"),
        Line::from(""),
        Line::from(Span::styled("Tabs", heading)),
        Line::from("  Ctrl+Right / F2  Next tab"),
        Line::from("  Ctrl+Left        Previous tab"),
        Line::from("  Alt+1 / Alt+2    Jump to tab"),
        Line::from(""),
        Line::from(Span::styled("General", heading)),
        Line::from("  F1               Show this help"),
        Line::from("  Esc              Quit (with confirmation)"),
        Line::from("  Ctrl+C           Quit immediately"),
    ]);

    let paragraph = Paragraph::new(help_text)
        .style(Style::default().fg(palette.fg).bg(palette.bg))
        .block(
            Block::default()
                .title(" Help ")
                .title_style(Style::default().add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.active_border)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

/// Render the quit confirmation dialog
fn render_quit_dialog(frame: &mut Frame, palette: &Palette) {
    let area = centered_rect(40, 25, frame.area());

    // Clear the area first
    frame.render_widget(Clear, area);

    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Are you sure you want to quit?",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [Y]es  ", Style::default().fg(Color::Green)),
            Span::styled("  [N]o  ", Style::default().fg(palette.error)),
        ]),
    ]);

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(palette.fg).bg(palette.bg))
        .block(
            Block::default()
                .title(" Quit ")
                .title_style(Style::default().add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PairingSettings;
    use crate::theme::{DARK_THEME_CLASS, LIGHT_THEME_CLASS};
    use common::create_submission_channel;
    use ratatui::{Terminal, backend::TestBackend};

    fn render_to_string(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(50, 50, area);

        // Should be centered
        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.x + centered.width < area.width);
        assert!(centered.y + centered.height < area.height);
    }

    #[test]
    fn test_palette_follows_marker() {
        let (tx, _rx) = create_submission_channel();
        let mut app = App::new(&PairingSettings::default(), tx);
        assert_eq!(Palette::for_scheme(app.color_scheme()), Palette::TERMINAL);

        app.root.toggle(DARK_THEME_CLASS, true);
        assert_eq!(Palette::for_scheme(app.color_scheme()), Palette::DARK);

        app.root.toggle(DARK_THEME_CLASS, false);
        app.root.toggle(LIGHT_THEME_CLASS, true);
        assert_eq!(Palette::for_scheme(app.color_scheme()), Palette::LIGHT);
    }

    #[test]
    fn test_pairing_tab_renders_form() {
        let (tx, _rx) = create_submission_channel();
        let app = App::new(&PairingSettings::default(), tx);
        let screen = render_to_string(&app);

        assert!(screen.contains("Pairing IP and port"));
        assert!(screen.contains("Pairing Code"));
        assert!(screen.contains("Paired? Skip"));
        assert!(screen.contains("Pair"));
        assert!(screen.contains("Connect"));
    }

    #[test]
    fn test_connect_tab_renders_placeholder() {
        let (tx, _rx) = create_submission_channel();
        let mut app = App::new(&PairingSettings::default(), tx);
        app.select_tab(Tab::Connect);
        let screen = render_to_string(&app);

        assert!(screen.contains("This is the custom tab panel."));
        assert!(!screen.contains("Pairing Code"));
    }

    #[test]
    fn test_quit_dialog_renders() {
        let (tx, _rx) = create_submission_channel();
        let mut app = App::new(&PairingSettings::default(), tx);
        app.show_quit_confirm();
        let screen = render_to_string(&app);
        assert!(screen.contains("Are you sure you want to quit?"));
    }
}

//! Drawing the chat screen with ratatui.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
};

use crate::{
    channel::ConnectionStatus,
    notification::{NotificationConfig, ToastState},
    view::{RenderedMessage, ToastView},
};

use super::app::App;

const TOAST_HEIGHT: u16 = 3;
const TOAST_MARGIN: u16 = 1;

pub fn draw(frame: &mut Frame, app: &App) {
    let [log_area, typing_area, input_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_log(frame, app.view().messages(), log_area);

    let indicator = app.view().typing_indicator().unwrap_or_default();
    let indicator_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);
    frame.render_widget(Paragraph::new(indicator).style(indicator_style), typing_area);

    let title = match app.session().identity() {
        Some(name) => format!(" {name} "),
        None => " message ".to_string(),
    };
    frame.render_widget(
        Paragraph::new(app.draft()).block(Block::bordered().title(title)),
        input_area,
    );
    frame.set_cursor_position(cursor_position(input_area, app.draft()));

    frame.render_widget(
        Paragraph::new(status_line(app.view().status(), &app.settings().current())),
        status_area,
    );

    draw_toasts(frame, app.view().toasts(), log_area);
}

fn draw_log(frame: &mut Frame, messages: &[RenderedMessage], area: Rect) {
    let visible = usize::from(area.height);
    let lines: Vec<Line> = messages
        .iter()
        .skip(messages.len().saturating_sub(visible))
        .map(message_line)
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn message_line(message: &RenderedMessage) -> Line<'_> {
    let sender_style = if message.own {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    Line::from(vec![
        Span::styled(
            format!("{} ", message.received_at),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("{}: ", message.sender), sender_style),
        Span::raw(message.body.as_str()),
    ])
}

/// Status line text, e.g. `connected | audio on 40% normal | toasts on | F2 ...`
pub fn status_line(status: ConnectionStatus, config: &NotificationConfig) -> Line<'static> {
    let status_style = match status {
        ConnectionStatus::Connected => Style::default().fg(Color::Green),
        ConnectionStatus::Connecting => Style::default().fg(Color::Yellow),
        ConnectionStatus::Disconnected => Style::default().fg(Color::Red),
    };
    let on_off = |enabled: bool| if enabled { "on" } else { "off" };

    Line::from(vec![
        Span::styled(status.to_string(), status_style),
        Span::raw(format!(
            " | audio {} {} {} | toasts {} ",
            on_off(config.audio_enabled),
            config.volume_label(),
            config.sound_profile,
            on_off(config.visual_enabled),
        )),
        Span::styled(
            "| F2 audio F3/F4 volume F5 sound F6 toasts Esc quit",
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Toasts stack down from the top-right corner of `area`, newest first
fn draw_toasts(frame: &mut Frame, toasts: &[ToastView], area: Rect) {
    let mut y = area.y;
    for toast in toasts.iter().filter(|toast| toast.state != ToastState::Removed) {
        if y.saturating_add(TOAST_HEIGHT) > area.bottom() {
            break;
        }
        let rect = toast_rect(area, y, &toast.text);

        let style = match toast.state {
            ToastState::Visible => Style::default().fg(Color::White).bg(Color::Green),
            _ => Style::default().fg(Color::Gray).bg(Color::DarkGray),
        };
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(toast.text.as_str())
                .style(style)
                .block(Block::bordered().style(style)),
            rect,
        );
        y += TOAST_HEIGHT;
    }
}

/// Display width of `text` in cells, clamped to the terminal coordinate range
fn text_width(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}

/// Cursor after the draft, kept inside the input box border
fn cursor_position(input_area: Rect, draft: &str) -> Position {
    let x = input_area
        .x
        .saturating_add(1)
        .saturating_add(text_width(draft))
        .min(input_area.right().saturating_sub(2));
    Position::new(x, input_area.y.saturating_add(1))
}

/// Toast box at row `y`, right-aligned and never wider than `area`
fn toast_rect(area: Rect, y: u16, text: &str) -> Rect {
    let width = text_width(text).saturating_add(4).min(area.width);
    let x = area.right().saturating_sub(width.saturating_add(TOAST_MARGIN));
    Rect::new(x, y, width, TOAST_HEIGHT).intersection(area)
}

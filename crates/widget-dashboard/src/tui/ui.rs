//! Rendering of the dashboard screen.
//!
//! The screen is a one-line header, the board, and a one-line footer. Each
//! widget is a bordered box at its projected cell rectangle, titled with its
//! card number and filled with the text of its markup.

use crate::markup::markup_to_lines;
use crate::tui::app::App;
use crate::view::ViewMode;
use dashboard_api::Widget;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
    Frame,
};

/// Glyph drawn in a widget's resize handle cell while editing.
pub const RESIZE_HANDLE: &str = "◢";

const FOOTER_EDITABLE: &str = "[e] Edit  [s] Share  [r] Reload  [[/]] Dashboards  [j/k] Scroll  [q] Quit";
const FOOTER_EDITING: &str = "[drag] Move  [drag corner] Resize  [e] Save  [j/k] Scroll  [q] Quit";
const FOOTER_SHARED: &str = "[r] Reload  [j/k] Scroll  [q] Quit";

/// Renders header, board and footer, recording the board area on `app`.
pub fn render_dashboard(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    app.board_area = Some(chunks[1]);
    render_board(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let badge = Style::default().fg(Color::Black).bg(Color::Cyan);
    let mut spans = vec![
        Span::styled(
            format!("Dashboard: {}", app.view.title()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(format!(" {} ", app.view.mode()), badge),
        Span::raw(" "),
        Span::styled(format!(" {} ", app.view.device()), badge),
    ];
    if app.view.is_editing() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            " EDITING ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_board(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.view.is_editing();
    let active = app.view.controller().active().map(|g| g.index());

    for (index, widget) in app.view.widgets().iter().enumerate() {
        let Some(rect) = app.scale.widget_rect(widget, area, app.scroll) else {
            continue;
        };
        let highlighted = editing && active == Some(index);
        render_widget_box(frame, widget, rect, editing, highlighted);

        if editing {
            if let Some(cell) = app.scale.handle_cell(widget, area, app.scroll) {
                if let Some(cell) = frame.buffer_mut().cell_mut(cell) {
                    cell.set_symbol(RESIZE_HANDLE).set_fg(Color::Yellow);
                }
            }
        }
    }

    if app.view.widgets().is_empty() && app.view.dashboard().is_some() {
        let empty = Paragraph::new("No widgets on this dashboard")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
    }
}

fn render_widget_box(frame: &mut Frame, widget: &Widget, rect: Rect, editing: bool, highlighted: bool) {
    let border_style = if highlighted {
        Style::default().fg(Color::Yellow)
    } else if editing {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(format!("Widget: {}", widget.card_number));
    let lines: Vec<Line> = markup_to_lines(&widget.html)
        .into_iter()
        .map(Line::from)
        .collect();

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        rect,
    );
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status_message {
        Some((message, _)) => Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Green),
        )),
        None => {
            let text = match (app.view.mode(), app.view.is_editing()) {
                (ViewMode::Shared, _) => FOOTER_SHARED,
                (ViewMode::Editable, true) => FOOTER_EDITING,
                (ViewMode::Editable, false) => FOOTER_EDITABLE,
            };
            Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

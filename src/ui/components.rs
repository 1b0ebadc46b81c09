//! Shared UI components (status bar, keybindings panel, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};
use crate::controller::LoadPhase;

/// Render the bottom status bar with mode, counts and requests in flight.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let state = app.directory.state();
    let phase = match state.phase() {
        LoadPhase::Idle => "idle",
        LoadPhase::Loading => "loading",
        LoadPhase::Ready => "ready",
        LoadPhase::Failed(_) => "load failed",
    };
    let pending = match state.in_flight() {
        0 => String::new(),
        n => format!("  pending:{n}"),
    };
    let filter = if state.search_query().is_empty() {
        String::new()
    } else {
        format!("  filter:\"{}\"", state.search_query())
    };
    let msg = format!(
        "mode: {mode}  {phase}  users:{}/{}  rows/page:{}{pending}{filter}  up {}s",
        app.visible_len(),
        state.records().len(),
        app.rows_per_page,
        app.started_at.elapsed().as_secs(),
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Render the right-side keybinds viewer.
pub fn render_keybinds_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("Keybindings")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);

    let mut rows: Vec<(&str, String)> = Vec::new();
    for action in KeyAction::ALL {
        if action == KeyAction::Ignore {
            continue;
        }
        let keys = app.keymap.keys_for(action);
        if keys.is_empty() {
            continue;
        }
        let label = action.label();
        // Paging actions share labels; merge them into one row.
        if let Some((_, existing)) = rows.iter_mut().find(|(l, _)| *l == label) {
            existing.push_str(", ");
            existing.push_str(&keys.join(", "));
        } else {
            rows.push((label, keys.join(", ")));
        }
    }
    rows.push(("Cancel / Close", "Esc".to_string()));
    rows.push(("Next field", "Tab, Down".to_string()));

    let col1_w = rows
        .iter()
        .map(|(l, _)| l.chars().count())
        .max()
        .unwrap_or(0)
        .min((inner.width as usize).saturating_sub(8));
    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(label, keys)| {
            let lbl: String = label.chars().take(col1_w).collect();
            Line::from(vec![
                Span::raw(format!(" {:>width$} │ ", lbl, width = col1_w)),
                Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
            ])
        })
        .collect();

    let p = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.text))
        .wrap(Wrap { trim: false });
    f.render_widget(block, area);
    f.render_widget(p, inner);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let max_w = area.width.saturating_sub(6).max(30);
    let width = 50u16.min(max_w);
    let approx_lines = (message.len() as u16 / width.saturating_sub(4).max(10)).max(1);
    let max_h = area.height.saturating_sub(6).max(5);
    let height = (approx_lines + 4).min(max_h).max(5);
    let rect = centered_rect(width, height, area);
    let body = vec![
        Line::raw(message.to_string()),
        Line::raw(""),
        Line::from(Span::styled(
            "Enter/Esc to close",
            Style::default().fg(app.theme.muted),
        )),
    ];
    let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Info")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::app::AppState;
use crate::app::form::{FIELD_LABELS, FormState};
use crate::controller::LoadPhase;
use crate::ui::components::centered_rect;

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let block = Block::default()
        .title("Users")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    let notice = match app.directory.state().phase() {
        LoadPhase::Idle | LoadPhase::Loading => Some("Loading...".to_string()),
        LoadPhase::Failed(msg) => Some(format!("Error fetching users: {msg}")),
        LoadPhase::Ready => None,
    };
    if let Some(text) = notice {
        let p = Paragraph::new(text)
            .style(Style::default().fg(app.theme.text))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let theme = app.theme;
    let selected = app.selected_index;
    let visible = app.directory.state().visible();
    let start = (selected / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(visible.len());
    let slice = visible.get(start..end).unwrap_or(&[]);

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let style = if start + i == selected {
            Style::default()
                .fg(theme.highlight_fg)
                .bg(theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.username.clone()),
            Cell::from(u.email.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(5),
        Constraint::Percentage(35),
        Constraint::Percentage(20),
        Constraint::Percentage(45),
    ];
    let header = Row::new(vec!["ID", "NAME", "USERNAME", "EMAIL"])
        .style(Style::default().fg(theme.title).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.highlighted() {
        Some(u) => {
            let (street, city) = u
                .address
                .as_ref()
                .map(|a| (a.street.as_str(), a.city.as_str()))
                .unwrap_or(("", ""));
            format!(
                "ID: {}\nName: {}\nUsername: {}\nEmail: {}\nPhone: {}\nStreet: {street}\nCity: {city}\nWebsite: {}",
                u.id,
                u.name,
                u.username,
                u.email,
                u.phone.as_deref().unwrap_or(""),
                u.website.as_deref().unwrap_or(""),
            )
        }
        None => String::new(),
    };
    let p = Paragraph::new(text)
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

pub fn render_form_modal(f: &mut Frame, area: Rect, app: &AppState, form: &FormState) {
    let rect = centered_rect(60, (FIELD_LABELS.len() as u16) + 7, area);
    let label_w = FIELD_LABELS.iter().map(|l| l.len()).max().unwrap_or(0);

    let mut lines: Vec<Line> = FIELD_LABELS
        .iter()
        .zip(form.values.iter())
        .enumerate()
        .map(|(i, (label, value))| {
            let focused = i == form.focus;
            let marker = if focused { "▶" } else { " " };
            let cursor = if focused { "_" } else { "" };
            let style = if focused {
                Style::default().fg(app.theme.highlight_fg)
            } else {
                Style::default().fg(app.theme.text)
            };
            Line::from(vec![
                Span::styled(format!("{marker} {:<label_w$}: ", label), style),
                Span::raw(format!("{value}{cursor}")),
            ])
        })
        .collect();

    lines.push(Line::raw(""));
    let submit = if form.pending.is_some() {
        "Saving...".to_string()
    } else {
        format!("[ {} ]", form.submit_label())
    };
    let submit_style = if form.on_submit() {
        Style::default()
            .fg(app.theme.highlight_fg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text)
    };
    let marker = if form.on_submit() { "▶" } else { " " };
    lines.push(Line::from(Span::styled(format!("{marker} {submit}"), submit_style)));

    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(app.theme.error),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Tab: next field  Enter: submit  Esc: cancel",
            Style::default().fg(app.theme.muted),
        )));
    }

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(form.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_delete_confirm(f: &mut Frame, area: Rect, app: &AppState, name: &str, selected: usize) {
    let rect = centered_rect(44, 7, area);
    let mut text = format!("Delete user '{name}'?\n\n");
    for (idx, label) in ["Delete", "Cancel"].iter().enumerate() {
        if idx == selected {
            text.push_str(&format!("▶ {}\n", label));
        } else {
            text.push_str(&format!("  {}\n", label));
        }
    }
    let p = Paragraph::new(text).block(
        Block::default()
            .title("Confirm")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

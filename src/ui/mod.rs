pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState};

const HEADER_HINTS: [(KeyAction, &str); 5] = [
    (KeyAction::NewUser, "new"),
    (KeyAction::EditSelection, "edit"),
    (KeyAction::DeleteSelection, "delete"),
    (KeyAction::StartSearch, "search"),
    (KeyAction::Quit, "quit"),
];

/// Header hints built from the active keymap, e.g. `n: new  /: search`.
fn key_hints(app: &AppState) -> String {
    HEADER_HINTS
        .iter()
        .filter_map(|(action, what)| {
            let keys = app.keymap.keys_for(*action);
            (!keys.is_empty()).then(|| format!("{}: {what}", keys.join("/")))
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(root[1]);
    let right_constraints = if app.show_keybinds {
        [Constraint::Length(10), Constraint::Min(5)]
    } else {
        [Constraint::Min(10), Constraint::Length(0)]
    };
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints(right_constraints)
        .split(body[1]);

    let prompt = match app.input_mode {
        InputMode::Search => format!("  Search: {}_", app.directory.state().search_query()),
        InputMode::Normal | InputMode::Modal => String::new(),
    };
    let p = Paragraph::new(format!(
        "User List  users:{}{prompt}  {}",
        app.directory.state().records().len(),
        key_hints(app),
    ))
    .block(
        Block::default()
            .title("user-directory")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    users::render_users_table(f, body[0], app);
    users::render_user_details(f, right[0], app);
    if app.show_keybinds {
        components::render_keybinds_panel(f, right[1], app);
    }

    components::render_status_bar(f, root[2], app);

    if let Some(modal) = app.modal.clone() {
        let area = f.area();
        match &modal {
            ModalState::Form(form) => users::render_form_modal(f, area, app, form),
            ModalState::DeleteConfirm { name, selected, .. } => {
                users::render_delete_confirm(f, area, app, name, *selected)
            }
            ModalState::Info { message } => components::render_info_modal(f, area, app, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryUserApi;
    use crate::app::Theme;
    use crate::app::keymap::Keymap;
    use crate::controller::UserDirectoryController;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[tokio::test]
    async fn renders_loaded_users_and_form() {
        let api = InMemoryUserApi::seeded();
        let mut ctl = UserDirectoryController::new(Arc::new(api));
        ctl.load_all().await.expect("load");
        let mut app = AppState::new(ctl, Theme::mocha(), Keymap::default());

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).expect("terminal");
        terminal.draw(|f| render(f, &mut app)).expect("draw");
        let text = buffer_text(&terminal);
        assert!(text.contains("Leanne Graham"));
        assert!(text.contains("Keybindings"));

        app.open_modal(ModalState::Form(crate::app::form::FormState::create()));
        terminal.draw(|f| render(f, &mut app)).expect("draw");
        assert!(buffer_text(&terminal).contains("Create User"));
    }

    #[test]
    fn renders_loading_notice_before_fetch() {
        let ctl = UserDirectoryController::new(Arc::new(InMemoryUserApi::new()));
        let mut app = AppState::new(ctl, Theme::mocha(), Keymap::default());
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).expect("terminal");
        terminal.draw(|f| render(f, &mut app)).expect("draw");
        assert!(buffer_text(&terminal).contains("Loading..."));
    }

    #[test]
    fn header_hints_follow_keymap() {
        let ctl = UserDirectoryController::new(Arc::new(InMemoryUserApi::new()));
        let app = AppState::new(ctl, Theme::mocha(), Keymap::default());
        let hints = key_hints(&app);
        assert!(hints.contains("n: new"));
        assert!(hints.contains("Ctrl+c/q: quit"));

        let app = AppState::new(
            UserDirectoryController::new(Arc::new(InMemoryUserApi::new())),
            Theme::mocha(),
            Keymap::parse("NewUser = a\n"),
        );
        assert!(key_hints(&app).contains("a/n: new"));
    }
}

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::api::UserApi;
use crate::app::form::{FormMode, FormState, PendingSubmit};
use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState};
use crate::controller::{Completion, Operation};
use crate::ui;

const TICK: Duration = Duration::from_millis(100);

/// What the loop should do after a key press.
#[derive(Debug)]
pub enum Flow {
    Continue,
    Quit,
    Dispatch(Operation),
}

/// Sends operations to the runtime and routes their completions back to the UI thread.
pub struct Dispatcher {
    handle: Handle,
    api: Arc<dyn UserApi>,
    tx: UnboundedSender<Completion>,
}

impl Dispatcher {
    pub fn new(handle: Handle, api: Arc<dyn UserApi>) -> (Self, UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { handle, api, tx }, rx)
    }

    /// Fire and forget; the completion arrives on the receiver.
    pub fn dispatch(&self, op: Operation) {
        debug!(?op, "dispatching");
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let completion = op.execute(api.as_ref()).await;
            // The receiver is gone only when the UI has exited.
            let _ = tx.send(completion);
        });
    }
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
    handle: Handle,
) -> Result<()> {
    let (dispatcher, mut completions) = Dispatcher::new(handle, app.directory.api());
    if let Some(op) = app.directory.prepare_load() {
        dispatcher.dispatch(op);
    }

    loop {
        while let Ok(completion) = completions.try_recv() {
            handle_completion(app, completion);
        }

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match handle_key(app, key) {
                        Flow::Continue => {}
                        Flow::Quit => break,
                        Flow::Dispatch(op) => dispatcher.dispatch(op),
                    }
                }
            }
        }
    }
    Ok(())
}

/// Apply a finished request and tell the user about failures.
///
/// A form waiting on this request closes on success or shows the error
/// inline; anything else that fails gets an info modal. Load failures are
/// shown in the table area instead.
pub fn handle_completion(app: &mut AppState, completion: Completion) {
    let key = PendingSubmit::for_completion(&completion);
    let is_load = matches!(completion, Completion::Loaded(_));
    let result = app.directory.reconcile(completion);
    app.clamp_selection();

    let form_waiting = matches!(
        &app.modal,
        Some(ModalState::Form(form)) if key.is_some() && form.pending == key
    );
    match result {
        Ok(_) => {
            if form_waiting {
                app.close_modal();
            }
        }
        Err(e) if form_waiting => {
            if let Some(ModalState::Form(form)) = &mut app.modal {
                form.pending = None;
                form.error = Some(e.user_message());
            }
        }
        Err(_) if is_load => {}
        Err(e) => app.info(e.user_message()),
    }
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    match app.input_mode {
        InputMode::Normal => handle_normal(app, key),
        InputMode::Search => {
            handle_search(app, key);
            Flow::Continue
        }
        InputMode::Modal => handle_modal(app, key),
    }
}

fn handle_normal(app: &mut AppState, key: KeyEvent) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    let len = app.visible_len();
    let rpp = app.rows_per_page.max(1);
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::StartSearch => {
            app.input_mode = InputMode::Search;
        }
        KeyAction::NewUser => {
            app.directory.clear_selection();
            app.open_modal(ModalState::Form(FormState::create()));
        }
        KeyAction::EditSelection => {
            if let Some(user) = app.highlighted().cloned() {
                app.directory.select(user.id);
                app.open_modal(ModalState::Form(FormState::edit(&user)));
            }
        }
        KeyAction::DeleteSelection => {
            if let Some(user) = app.highlighted() {
                let modal = ModalState::DeleteConfirm {
                    id: user.id,
                    name: user.name.clone(),
                    selected: 1,
                };
                app.open_modal(modal);
            }
        }
        KeyAction::ToggleKeybindsPane => app.show_keybinds = !app.show_keybinds,
        KeyAction::MoveUp => app.selected_index = app.selected_index.saturating_sub(1),
        KeyAction::MoveDown => {
            if app.selected_index + 1 < len {
                app.selected_index += 1;
            }
        }
        KeyAction::MoveLeftPage | KeyAction::PageUp => {
            app.selected_index = app.selected_index.saturating_sub(rpp);
        }
        KeyAction::MoveRightPage | KeyAction::PageDown => {
            app.selected_index = app.selected_index.saturating_add(rpp).min(len.saturating_sub(1));
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_search(app: &mut AppState, key: KeyEvent) {
    let mut query = app.directory.state().search_query().to_string();
    match key.code {
        KeyCode::Esc => {
            query.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            return;
        }
        KeyCode::Backspace => {
            query.pop();
        }
        KeyCode::Char(c) => query.push(c),
        _ => return,
    }
    app.directory.set_search_query(query);
    app.selected_index = 0;
}

fn handle_modal(app: &mut AppState, key: KeyEvent) -> Flow {
    match app.modal.take() {
        Some(ModalState::Form(form)) => handle_form(app, form, key),
        Some(ModalState::DeleteConfirm { id, name, selected }) => {
            match key.code {
                KeyCode::Esc | KeyCode::Char('n') => app.close_modal(),
                KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                    app.modal = Some(ModalState::DeleteConfirm {
                        id,
                        name,
                        selected: 1 - selected.min(1),
                    });
                }
                KeyCode::Char('y') => {
                    app.close_modal();
                    return Flow::Dispatch(app.directory.prepare_delete(id));
                }
                KeyCode::Enter => {
                    app.close_modal();
                    if selected == 0 {
                        return Flow::Dispatch(app.directory.prepare_delete(id));
                    }
                }
                _ => app.modal = Some(ModalState::DeleteConfirm { id, name, selected }),
            }
            Flow::Continue
        }
        Some(ModalState::Info { message }) => {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => app.close_modal(),
                _ => app.modal = Some(ModalState::Info { message }),
            }
            Flow::Continue
        }
        None => {
            app.input_mode = InputMode::Normal;
            Flow::Continue
        }
    }
}

fn handle_form(app: &mut AppState, mut form: FormState, key: KeyEvent) -> Flow {
    let mut flow = Flow::Continue;
    match key.code {
        KeyCode::Esc => {
            if let FormMode::Edit { .. } = form.mode {
                app.directory.clear_selection();
            }
            app.close_modal();
            return flow;
        }
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Enter if form.on_submit() => {
            if form.pending.is_none() {
                flow = submit_form(app, &mut form);
            }
        }
        KeyCode::Enter => form.focus_next(),
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Char(c) if !form.on_submit() => form.push_char(c),
        _ => {}
    }
    app.modal = Some(ModalState::Form(form));
    flow
}

fn submit_form(app: &mut AppState, form: &mut FormState) -> Flow {
    let draft = form.to_draft();
    let prepared = match form.mode {
        FormMode::Create => app.directory.prepare_create(draft),
        FormMode::Edit { id } => app.directory.prepare_update(id, draft),
    };
    match prepared {
        Ok(op) => {
            form.error = None;
            form.pending = PendingSubmit::for_operation(&op);
            Flow::Dispatch(op)
        }
        Err(e) => {
            form.error = Some(e.to_string());
            Flow::Continue
        }
    }
}

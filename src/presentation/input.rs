use crate::application::{App, AppMode, HOME_ITEMS, Screen, Step};
use crate::domain::ApplicantStatus;
use crossterm::event::{KeyCode, KeyModifiers};

/// Work the event loop has to do on behalf of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Await the student id lookup for the open wizard.
    VerifyIdentity,
}

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => {
                Self::handle_editing_mode(app, key);
                None
            }
            AppMode::Search => {
                Self::handle_search_mode(app, key);
                None
            }
            AppMode::Help => {
                Self::handle_help_mode(app, key);
                None
            }
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        match key {
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.show_help();
                return None;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.move_up();
                return None;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.move_down();
                return None;
            }
            KeyCode::Esc if app.screen != Screen::Home => {
                app.go_home();
                return None;
            }
            _ => {}
        }

        match app.screen {
            Screen::Home => return Self::handle_home(app, key),
            Screen::Registration => return Self::handle_registration(app, key),
            Screen::StudentHome => Self::handle_student_home(app, key),
            Screen::Applicants => Self::handle_applicants(app, key),
        }
        None
    }

    fn handle_home(app: &mut App, key: KeyCode) -> Option<Command> {
        match key {
            KeyCode::Char('q') => return Some(Command::Quit),
            KeyCode::Enter if app.home_index == HOME_ITEMS.len() - 1 => return Some(Command::Quit),
            KeyCode::Enter => app.activate_home_item(),
            _ => {}
        }
        None
    }

    fn handle_registration(app: &mut App, key: KeyCode) -> Option<Command> {
        let step = app.wizard.as_ref().map(|w| w.step())?;
        match key {
            KeyCode::Enter | KeyCode::F(2) => app.start_editing(),
            KeyCode::Char(' ') if step == Step::InterestsSubmit => app.start_editing(),
            KeyCode::Tab => app.next_step(),
            KeyCode::BackTab => app.previous_step(),
            KeyCode::Char('v') if app.can_verify() => return Some(Command::VerifyIdentity),
            KeyCode::Char('r') if step == Step::Identity => app.reset_identity(),
            KeyCode::Char('s') if step == Step::InterestsSubmit => app.submit_registration(),
            KeyCode::Char('a') => app.add_skill(),
            KeyCode::Char('l') => app.add_link(),
            KeyCode::Char('d') | KeyCode::Delete => app.remove_current_item(),
            KeyCode::Char('+') => app.adjust_skill_level(1),
            KeyCode::Char('-') => app.adjust_skill_level(-1),
            _ => {}
        }
        None
    }

    fn handle_student_home(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.add_choice(false),
            KeyCode::Char('s') => app.add_choice(true),
            KeyCode::Char('d') | KeyCode::Delete => app.remove_choice(),
            KeyCode::Char('u') => app.promote_choice(),
            KeyCode::Char('c') => app.submit_plan(),
            _ => {}
        }
    }

    fn handle_applicants(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.next_tab(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => app.previous_tab(),
            KeyCode::Char('/') => app.start_search(),
            KeyCode::Char(' ') => app.toggle_selected(),
            KeyCode::Char('A') => app.toggle_select_all(),
            KeyCode::Char('e') => app.export_csv(),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                app.set_status(ApplicantStatus::ALL[index]);
            }
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_editing(),
            KeyCode::Esc => app.cancel_editing(),
            _ => Self::edit_buffer(app, key),
        }
    }

    fn handle_search_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_search(),
            KeyCode::Esc => app.cancel_search(),
            KeyCode::Down => app.move_down(),
            KeyCode::Up => app.move_up(),
            _ => Self::edit_buffer(app, key),
        }
    }

    fn edit_buffer(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Backspace => app.delete_before_cursor(),
            KeyCode::Delete => app.delete_at_cursor(),
            KeyCode::Left => app.cursor_left(),
            KeyCode::Right => app.cursor_right(),
            KeyCode::Home => app.cursor_home(),
            KeyCode::End => app.cursor_end(),
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.hide_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

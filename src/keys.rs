use crate::app::App;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Quit,
}

pub fn handle_key_bindings(key_event: KeyEvent, app: &mut App) -> KeyOutcome {
    // Windows reports releases too.
    if key_event.kind == KeyEventKind::Release {
        return KeyOutcome::Handled;
    }

    match (key_event.code, key_event.modifiers) {
        // Raw mode swallows SIGINT, so Ctrl-C arrives as a key.
        (Char('q'), _) | (KeyCode::Esc, _) | (Char('c'), KeyModifiers::CONTROL) => {
            return KeyOutcome::Quit;
        }
        (Char('"'), _) => app.toggle_show_logs(),
        _ => {}
    }
    KeyOutcome::Handled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use clap::Parser;

    fn app() -> App {
        App::new(AppSettings::parse_from(["arbscore", "--date", "2025-07-04"]))
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        for key in [
            KeyEvent::new(Char('q'), KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            KeyEvent::new(Char('c'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(handle_key_bindings(key, &mut app), KeyOutcome::Quit);
        }
        let plain_c = KeyEvent::new(Char('c'), KeyModifiers::NONE);
        assert_eq!(handle_key_bindings(plain_c, &mut app), KeyOutcome::Handled);
    }

    #[test]
    fn quote_toggles_the_log_pane() {
        let mut app = app();
        let key = KeyEvent::new(Char('"'), KeyModifiers::SHIFT);
        handle_key_bindings(key, &mut app);
        assert!(app.state.show_logs);
        handle_key_bindings(key, &mut app);
        assert!(!app.state.show_logs);
    }
}

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, View};

/// File written by the export key
pub const EXPORT_PATH: &str = "pulsewatch_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::Char('1') => app.set_view(View::Dashboard),
        KeyCode::Char('2') => app.set_view(View::Samples),
        KeyCode::Char('3') => app.set_view(View::Console),
        KeyCode::Esc => app.set_view(View::Dashboard),

        // List navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Telemetry controls
        KeyCode::Char('s') => app.toggle_simulator(),
        KeyCode::Char('c') => app.reset(),
        KeyCode::Char('e') => app.export_with_feedback(Path::new(EXPORT_PATH)),

        // Appearance
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::source::ChannelSource;
    use crate::ui::Theme;

    fn app() -> App {
        let (_tx, source) = ChannelSource::create("test");
        App::with_theme(Box::new(source), &Settings::default(), Theme::dark())
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_view_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_view, View::Console);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Dashboard);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.current_view, View::Console);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.current_view, View::Dashboard);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_toggles() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        assert!(app.simulating());
        press(&mut app, KeyCode::Char('s'));
        assert!(!app.simulating());

        press(&mut app, KeyCode::Char('t'));
        assert!(!app.theme.dark);
    }
}

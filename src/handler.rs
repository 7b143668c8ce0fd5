use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use wrap_context::arg_context;

use chooser::SelectKey;

use crate::app::App;

#[rustfmt::skip]
/// Handles the key events and updates the state of [`App`].
pub fn handle_key_events(key_event: KeyEvent, app: &mut App) -> anyhow::Result<()> {
    let alt = key_event.modifiers.contains(KeyModifiers::ALT);
    let control = key_event.modifiers.contains(KeyModifiers::CONTROL);

    match key_event.code {
        // Exit application on `Ctrl-C`
        KeyCode::Char('c') | KeyCode::Char('C') if control => {
            app.quit();
        }
        // `ESC` closes the dropdown first, then exits
        KeyCode::Esc if !app.select().is_open() => {
            app.quit();
        }
        KeyCode::Esc => arg_context!(app.key(SelectKey::Esc))?,
        KeyCode::Up if alt => arg_context!(app.key(SelectKey::AltUp))?,
        KeyCode::Down if alt => arg_context!(app.key(SelectKey::AltDown))?,
        KeyCode::Up => arg_context!(app.key(SelectKey::Up))?,
        KeyCode::Down => arg_context!(app.key(SelectKey::Down))?,
        KeyCode::Tab => arg_context!(app.key(SelectKey::Tab))?,
        KeyCode::Enter => arg_context!(app.key(SelectKey::Enter))?,
        KeyCode::Delete => arg_context!(app.clear())?,
        KeyCode::Backspace if app.select().filter_term().is_empty() => {
            arg_context!(app.key(SelectKey::Backspace))?
        }
        KeyCode::Backspace => arg_context!(app.filter_pop())?,
        KeyCode::Char(' ') if !app.select().is_open() => {
            arg_context!(app.key(SelectKey::Space))?
        }
        KeyCode::Char(character) if !control && !alt => {
            arg_context!(app.filter_push(character))?
        }
        _ => {}
    }

    anyhow::Ok(())
}

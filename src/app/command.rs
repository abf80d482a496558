//! Key bindings. Pure mapping from key events to app commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePlay,
    Next,
    Previous,
    ToggleShuffle,
    CycleRepeat,
    MoveDown,
    MoveUp,
    /// Play the selected track or open the selected album/artist.
    Activate,
    SwitchView,
    FocusSearch,
    OpenImport,
    Enqueue,
    ToggleQueuePanel,
    ToggleMute,
    VolumeUp,
    VolumeDown,
    ScrubBack,
    ScrubForward,
    CycleTheme,
    RemoveTrack,
    Back,
    Quit,
    Edit(TextEdit),
}

/// Editing commands for the focused text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    Backspace,
    Submit,
    Cancel,
}

/// Map a key press. While a text input has focus every printable key is
/// text, so the global shortcuts are suppressed.
pub fn map_key(key: KeyEvent, text_focus: bool) -> Option<Command> {
    if text_focus {
        return map_text_key(key).map(Command::Edit);
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let cmd = match key.code {
        KeyCode::Char('s') if ctrl => Command::ToggleShuffle,
        KeyCode::Char('r') if ctrl => Command::CycleRepeat,
        KeyCode::Char('c') if ctrl => Command::Quit,
        _ if ctrl => return None,
        KeyCode::Char(' ') => Command::TogglePlay,
        KeyCode::Left => Command::Previous,
        KeyCode::Right => Command::Next,
        KeyCode::Char('j') | KeyCode::Down => Command::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Command::MoveUp,
        KeyCode::Enter => Command::Activate,
        KeyCode::Tab => Command::SwitchView,
        KeyCode::Char('/') => Command::FocusSearch,
        KeyCode::Char('i') => Command::OpenImport,
        KeyCode::Char('a') => Command::Enqueue,
        KeyCode::Char('o') => Command::ToggleQueuePanel,
        KeyCode::Char('m') => Command::ToggleMute,
        KeyCode::Char('+') | KeyCode::Char('=') => Command::VolumeUp,
        KeyCode::Char('-') => Command::VolumeDown,
        KeyCode::Char('[') => Command::ScrubBack,
        KeyCode::Char(']') => Command::ScrubForward,
        KeyCode::Char('t') => Command::CycleTheme,
        KeyCode::Char('x') => Command::RemoveTrack,
        KeyCode::Esc | KeyCode::Backspace => Command::Back,
        KeyCode::Char('q') => Command::Quit,
        _ => return None,
    };
    Some(cmd)
}

fn map_text_key(key: KeyEvent) -> Option<TextEdit> {
    match key.code {
        KeyCode::Esc => Some(TextEdit::Cancel),
        KeyCode::Enter => Some(TextEdit::Submit),
        KeyCode::Backspace => Some(TextEdit::Backspace),
        KeyCode::Char(c)
            if !c.is_control() && !key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Some(TextEdit::Insert(c))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn transport_keys() {
        assert_eq!(map_key(key(KeyCode::Char(' ')), false), Some(Command::TogglePlay));
        assert_eq!(map_key(key(KeyCode::Left), false), Some(Command::Previous));
        assert_eq!(map_key(key(KeyCode::Right), false), Some(Command::Next));
        assert_eq!(map_key(ctrl('s'), false), Some(Command::ToggleShuffle));
        assert_eq!(map_key(ctrl('r'), false), Some(Command::CycleRepeat));
    }

    #[test]
    fn plain_letters_are_not_ctrl_shortcuts() {
        assert_eq!(map_key(key(KeyCode::Char('s')), false), None);
        assert_eq!(map_key(ctrl('t'), false), None);
    }

    #[test]
    fn text_focus_suppresses_shortcuts() {
        assert_eq!(
            map_key(key(KeyCode::Char(' ')), true),
            Some(Command::Edit(TextEdit::Insert(' ')))
        );
        assert_eq!(
            map_key(key(KeyCode::Char('q')), true),
            Some(Command::Edit(TextEdit::Insert('q')))
        );
        assert_eq!(map_key(ctrl('s'), true), None);
        assert_eq!(map_key(key(KeyCode::Left), true), None);
        assert_eq!(
            map_key(key(KeyCode::Esc), true),
            Some(Command::Edit(TextEdit::Cancel))
        );
    }
}

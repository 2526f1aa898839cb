use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Activate,
    Dismiss,
    Restart,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Quit,
        KeyCode::Esc => InputAction::Dismiss,
        KeyCode::Up | KeyCode::Char('k') => InputAction::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => InputAction::MoveDown,
        KeyCode::Left | KeyCode::Char('h') => InputAction::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => InputAction::MoveRight,
        KeyCode::Enter | KeyCode::Char(' ') => InputAction::Activate,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('r') => InputAction::Restart,
        _ => InputAction::None,
    }
}

use raylib::prelude::*;

/// User commands understood by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Previous,
    Next,
    First,
    Last,
    ToggleSlideshow,
    Faster,
    Slower,
    ToggleCentered,
    ToggleOverlay,
    ToggleComment,
    ClearBroken,
    ToggleUpdating,
}

/// Commands bound to printable characters.
pub fn command_for_char(c: char) -> Option<Command> {
    let command = match c {
        'q' | 'Q' => Command::Quit,
        'p' | 'P' => Command::Previous,
        'n' | 'N' => Command::Next,
        'h' | 'H' => Command::First,
        'E' => Command::Last,
        ' ' => Command::ToggleSlideshow,
        '+' => Command::Faster,
        '-' => Command::Slower,
        'c' => Command::ToggleCentered,
        'e' => Command::ToggleOverlay,
        'i' => Command::ToggleComment,
        'x' => Command::ClearBroken,
        'u' => Command::ToggleUpdating,
        _ => return None,
    };
    Some(command)
}

/// Commands bound to keys that produce no character.
pub fn command_for_key(key: KeyboardKey) -> Option<Command> {
    match key {
        KeyboardKey::KEY_ESCAPE => Some(Command::Quit),
        KeyboardKey::KEY_LEFT => Some(Command::Previous),
        KeyboardKey::KEY_RIGHT => Some(Command::Next),
        KeyboardKey::KEY_HOME => Some(Command::First),
        KeyboardKey::KEY_END => Some(Command::Last),
        _ => None,
    }
}

/// Drains raylib's key and character queues for this frame.
pub fn poll_commands(rl: &mut RaylibHandle) -> Vec<Command> {
    let mut commands = Vec::new();
    while let Some(key) = rl.get_key_pressed() {
        commands.extend(command_for_key(key));
    }
    while let Some(c) = rl.get_char_pressed() {
        commands.extend(command_for_char(c));
    }
    commands
}

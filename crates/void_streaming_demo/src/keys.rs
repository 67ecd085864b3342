//! Key handling
//!
//! Stdin arrives a line at a time. Every key on the line is a command:
//! W/A/S/D in either case, arrow keys as ANSI escape sequences
//! (`ESC [ A` .. `ESC [ D`, or `ESC O A` in application mode), and `q` to
//! quit. Whitespace is ignored.

use void_streaming::Direction;

/// Shown for anything that is not a movement key
pub const INVALID_KEY_MESSAGE: &str = "Invalid key. Use WASD or arrows.";

/// Shown until the first move
pub const WELCOME_MESSAGE: &str = "Use WASD or arrows to move.";

/// One decoded key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Move(Direction),
    Quit,
    Invalid,
}

/// Decode every key on an input line
pub fn parse_keys(line: &str) -> Vec<KeyCommand> {
    let mut commands = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        let command = match c {
            'w' | 'W' => KeyCommand::Move(Direction::Up),
            's' | 'S' => KeyCommand::Move(Direction::Down),
            'a' | 'A' => KeyCommand::Move(Direction::Left),
            'd' | 'D' => KeyCommand::Move(Direction::Right),
            'q' | 'Q' => KeyCommand::Quit,
            '\x1b' => {
                if matches!(chars.peek(), Some('[') | Some('O')) {
                    chars.next();
                    match chars.next().and_then(arrow) {
                        Some(direction) => KeyCommand::Move(direction),
                        None => KeyCommand::Invalid,
                    }
                } else {
                    KeyCommand::Invalid
                }
            }
            c if c.is_whitespace() => continue,
            _ => KeyCommand::Invalid,
        };
        commands.push(command);
    }

    commands
}

fn arrow(c: char) -> Option<Direction> {
    match c {
        'A' => Some(Direction::Up),
        'B' => Some(Direction::Down),
        'C' => Some(Direction::Right),
        'D' => Some(Direction::Left),
        _ => None,
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure movement system that turns held direction keys into player steps.

use overworld_core::{Command, Direction, InputEvent};

/// Picks the single direction applied this frame from the held directions.
///
/// Ties are broken by [`Direction::BY_PRIORITY`]: Left, Right, Up, Down.
#[must_use]
pub fn resolve_intent<I>(held: I) -> Option<Direction>
where
    I: IntoIterator<Item = Direction>,
{
    let mut mask = 0u8;
    for direction in held {
        mask |= bit(direction);
    }

    Direction::BY_PRIORITY
        .into_iter()
        .find(|direction| mask & bit(*direction) != 0)
}

const fn bit(direction: Direction) -> u8 {
    match direction {
        Direction::Left => 0b0001,
        Direction::Right => 0b0010,
        Direction::Up => 0b0100,
        Direction::Down => 0b1000,
    }
}

/// Stateless system that emits at most one step command per frame.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes the frame's drained input and emits the resolved step command.
    pub fn handle(&mut self, input: &[InputEvent], out: &mut Vec<Command>) {
        let held = input.iter().filter_map(|event| match event {
            InputEvent::DirectionHeld(direction) => Some(*direction),
            InputEvent::Quit | InputEvent::KeyDown(_) => None,
        });

        if let Some(direction) = resolve_intent(held) {
            out.push(Command::StepPlayer { direction });
        }
    }
}

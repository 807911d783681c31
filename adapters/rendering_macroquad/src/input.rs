//! Keyboard polling and distribution of input across fixed simulation steps.

use macroquad::input::{is_key_down, is_key_pressed, is_quit_requested, KeyCode};
use overworld_core::{Direction, InputEvent, Key};
use overworld_rendering::FrameInput;

/// Keys pressed on rendered frames that have not yet reached a simulation step.
///
/// A display refreshing faster than the simulation renders frames on which no
/// step is due; presses observed on those frames wait here for the next step.
#[derive(Clone, Debug, Default)]
pub(crate) struct PendingKeys {
    keys: Vec<Key>,
}

impl PendingKeys {
    fn register(&mut self, key: Key) {
        self.keys.push(key);
    }

    /// Drains the recorded presses in the order they were observed.
    fn take(&mut self) -> Vec<Key> {
        std::mem::take(&mut self.keys)
    }
}

/// Keyboard state sampled once per rendered frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct KeyboardObservation {
    /// Arrow keys held down, in [`Direction::BY_PRIORITY`] order.
    pub(crate) held: Vec<Direction>,
    /// `X` was pressed.
    pub(crate) dismiss_welcome: bool,
    /// `Z` was pressed.
    pub(crate) dismiss_dialog: bool,
    /// `Escape` was pressed or the window was asked to close.
    pub(crate) quit: bool,
}

impl KeyboardObservation {
    pub(crate) fn poll() -> Self {
        let held = Direction::BY_PRIORITY
            .into_iter()
            .filter(|direction| is_key_down(key_code(*direction)))
            .collect();

        Self {
            held,
            dismiss_welcome: is_key_pressed(KeyCode::X),
            dismiss_dialog: is_key_pressed(KeyCode::Z),
            quit: is_key_pressed(KeyCode::Escape) || is_quit_requested(),
        }
    }

    fn latch_into(&self, pending: &mut PendingKeys) {
        if self.dismiss_dialog {
            pending.register(Key::DismissDialog);
        }
        if self.dismiss_welcome {
            pending.register(Key::DismissWelcome);
        }
    }
}

const fn key_code(direction: Direction) -> KeyCode {
    match direction {
        Direction::Up => KeyCode::Up,
        Direction::Down => KeyCode::Down,
        Direction::Left => KeyCode::Left,
        Direction::Right => KeyCode::Right,
    }
}

/// Splits one rendered frame's observation into the input of each due step.
///
/// Held directions repeat on every step while pressed keys only reach the
/// first one. A quit request always yields at least one input so it is
/// honoured even on frames where no step is due.
pub(crate) fn distribute_frame_input(
    observation: &KeyboardObservation,
    steps_due: u32,
    pending: &mut PendingKeys,
) -> Vec<FrameInput> {
    observation.latch_into(pending);

    let steps = if observation.quit {
        steps_due.max(1)
    } else {
        steps_due
    };

    let mut inputs = Vec::with_capacity(steps as usize);
    for index in 0..steps {
        let mut events = Vec::new();
        if index == 0 {
            if observation.quit {
                events.push(InputEvent::Quit);
            }
            events.extend(pending.take().into_iter().map(InputEvent::KeyDown));
        }
        events.extend(
            observation
                .held
                .iter()
                .copied()
                .map(InputEvent::DirectionHeld),
        );
        inputs.push(FrameInput::new(events));
    }

    inputs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(held: Vec<Direction>) -> KeyboardObservation {
        KeyboardObservation {
            held,
            ..KeyboardObservation::default()
        }
    }

    #[test]
    fn held_directions_repeat_on_every_step() {
        let mut pending = PendingKeys::default();
        let observation = holding(vec![Direction::Left, Direction::Up]);

        let inputs = distribute_frame_input(&observation, 2, &mut pending);

        let expected = FrameInput::new(vec![
            InputEvent::DirectionHeld(Direction::Left),
            InputEvent::DirectionHeld(Direction::Up),
        ]);
        assert_eq!(inputs, vec![expected.clone(), expected]);
    }

    #[test]
    fn pressed_keys_reach_only_the_first_step() {
        let mut pending = PendingKeys::default();
        let observation = KeyboardObservation {
            held: vec![Direction::Down],
            dismiss_dialog: true,
            ..KeyboardObservation::default()
        };

        let inputs = distribute_frame_input(&observation, 2, &mut pending);

        assert_eq!(
            inputs,
            vec![
                FrameInput::new(vec![
                    InputEvent::KeyDown(Key::DismissDialog),
                    InputEvent::DirectionHeld(Direction::Down),
                ]),
                FrameInput::new(vec![InputEvent::DirectionHeld(Direction::Down)]),
            ]
        );
        assert!(pending.take().is_empty());
    }

    #[test]
    fn presses_wait_for_the_next_due_step() {
        let mut pending = PendingKeys::default();
        let press = KeyboardObservation {
            dismiss_welcome: true,
            ..KeyboardObservation::default()
        };

        assert!(distribute_frame_input(&press, 0, &mut pending).is_empty());

        let inputs = distribute_frame_input(&KeyboardObservation::default(), 1, &mut pending);
        assert_eq!(
            inputs,
            vec![FrameInput::new(vec![InputEvent::KeyDown(Key::DismissWelcome)])]
        );
    }

    #[test]
    fn quit_is_delivered_without_a_due_step() {
        let mut pending = PendingKeys::default();
        let observation = KeyboardObservation {
            quit: true,
            ..KeyboardObservation::default()
        };

        let inputs = distribute_frame_input(&observation, 0, &mut pending);

        assert_eq!(inputs, vec![FrameInput::new(vec![InputEvent::Quit])]);
    }

    fn pressing(dismiss_welcome: bool, dismiss_dialog: bool) -> KeyboardObservation {
        KeyboardObservation {
            dismiss_welcome,
            dismiss_dialog,
            ..KeyboardObservation::default()
        }
    }

    fn replay(frames: &[(KeyboardObservation, u32)]) -> Vec<FrameInput> {
        let mut pending = PendingKeys::default();
        frames
            .iter()
            .flat_map(|(observation, steps_due)| {
                distribute_frame_input(observation, *steps_due, &mut pending)
            })
            .collect()
    }

    #[test]
    fn presses_between_steps_are_delivered_once_in_order() {
        let frames = [
            (pressing(true, false), 0),
            (KeyboardObservation::default(), 1),
            (pressing(false, true), 0),
            (pressing(true, false), 0),
            (KeyboardObservation::default(), 2),
            (KeyboardObservation::default(), 1),
        ];

        let inputs = replay(&frames);

        assert_eq!(
            inputs,
            vec![
                FrameInput::new(vec![InputEvent::KeyDown(Key::DismissWelcome)]),
                FrameInput::new(vec![
                    InputEvent::KeyDown(Key::DismissDialog),
                    InputEvent::KeyDown(Key::DismissWelcome),
                ]),
                FrameInput::default(),
                FrameInput::default(),
            ]
        );
    }

    #[test]
    fn replaying_the_same_frames_is_deterministic() {
        let frames = [
            (pressing(false, true), 1),
            (holding(vec![Direction::Right]), 0),
            (pressing(true, true), 0),
            (holding(vec![Direction::Up, Direction::Right]), 3),
        ];

        let first_run = replay(&frames);
        let second_run = replay(&frames);

        assert_eq!(first_run, second_run);
        assert_eq!(first_run.len(), 4);
        let presses = first_run
            .iter()
            .flat_map(|input| &input.events)
            .filter(|event| matches!(event, InputEvent::KeyDown(_)))
            .count();
        assert_eq!(presses, 3);
    }
}

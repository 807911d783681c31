#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure interaction system that turns banner keys into banner commands.

use overworld_core::{Command, Event, InputEvent, Key};

/// System mirroring banner visibility from world events.
///
/// Keys are only translated into commands that would change a banner, so a
/// dismiss key pressed while its banner is hidden produces nothing.
#[derive(Debug, Clone)]
pub struct Interaction {
    welcome_visible: bool,
    dialog_active: bool,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Interaction {
    /// Creates a system matching a freshly built world: welcome shown, no dialog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            welcome_visible: true,
            dialog_active: false,
        }
    }

    /// Consumes world events and the frame's drained input to emit banner commands.
    pub fn handle(&mut self, events: &[Event], input: &[InputEvent], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::WelcomeDismissed => self.welcome_visible = false,
                Event::DialogOpened { .. } => self.dialog_active = true,
                Event::DialogClosed => self.dialog_active = false,
                Event::TimeAdvanced { .. }
                | Event::PlayerMoved { .. }
                | Event::PlayerBlocked { .. } => {}
            }
        }

        for event in input {
            match event {
                InputEvent::KeyDown(Key::DismissDialog) if self.dialog_active => {
                    self.dialog_active = false;
                    out.push(Command::DismissDialog);
                }
                InputEvent::KeyDown(Key::DismissWelcome) if self.welcome_visible => {
                    self.welcome_visible = false;
                    out.push(Command::DismissWelcome);
                }
                _ => {}
            }
        }
    }
}

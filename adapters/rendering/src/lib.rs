#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Overworld adapters.

mod timestep;

use anyhow::Result as AnyResult;
use glam::Vec2;
use overworld_core::{
    CellCoord, Direction, InputEvent, NpcId, Position, TileMap, WelcomeBanner, WELCOME_BANNER,
};
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt, sync::Arc};

pub use timestep::{FixedTimestep, MAX_STEPS_PER_FRAME};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Colors assigned to every drawable element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Color used to clear each frame.
    pub background: Color,
    /// Fill of wall tiles.
    pub wall: Color,
    /// Fill of regular floor tiles.
    pub floor: Color,
    /// Fill of special floor tiles.
    pub special_floor: Color,
    /// Fill of non-player characters.
    pub npc: Color,
    /// Player body.
    pub player_body: Color,
    /// Player face.
    pub player_face: Color,
    /// Welcome banner text.
    pub banner_text: Color,
    /// Dialog box background.
    pub dialog_box: Color,
    /// Dialog text.
    pub dialog_text: Color,
}

impl Palette {
    /// Four-shade handheld palette with red, blue and skin accents.
    pub const HANDHELD: Self = Self {
        background: Color::from_rgb_u8(15, 15, 15),
        wall: Color::from_rgb_u8(48, 98, 48),
        floor: Color::from_rgb_u8(139, 172, 15),
        special_floor: Color::from_rgb_u8(155, 188, 15),
        npc: Color::from_rgb_u8(172, 50, 50),
        player_body: Color::from_rgb_u8(50, 50, 172),
        player_face: Color::from_rgb_u8(172, 132, 85),
        banner_text: Color::from_rgb_u8(155, 188, 15),
        dialog_box: Color::from_rgb_u8(155, 188, 15),
        dialog_text: Color::from_rgb_u8(15, 15, 15),
    };
}

impl Default for Palette {
    fn default() -> Self {
        Self::HANDHELD
    }
}

/// Input drained by an adapter for a single simulation step.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Events in the order they were observed.
    pub events: Vec<InputEvent>,
}

impl FrameInput {
    /// Creates frame input from the provided events.
    #[must_use]
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self { events }
    }

    /// Reports whether the frame carries a quit request.
    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.events.contains(&InputEvent::Quit)
    }
}

/// Player state prepared for drawing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerPresentation {
    /// Upper-left corner in world pixels.
    pub position: Vec2,
    /// Direction the player faces.
    pub facing: Direction,
    /// Cosmetic animation counter.
    pub animation_frame: u8,
}

impl PlayerPresentation {
    /// Creates a new player descriptor.
    #[must_use]
    pub fn new(position: Position, facing: Direction, animation_frame: u8) -> Self {
        Self {
            position: Vec2::new(position.x(), position.y()),
            facing,
            animation_frame,
        }
    }
}

/// Non-player character prepared for drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NpcPresentation {
    /// Identifier of the character.
    pub id: NpcId,
    /// Cell the character occupies.
    pub cell: CellCoord,
}

impl NpcPresentation {
    /// Creates a new character descriptor.
    #[must_use]
    pub const fn new(id: NpcId, cell: CellCoord) -> Self {
        Self { id, cell }
    }
}

/// Immutable snapshot handed to the renderer once per step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Index of the step that produced the scene.
    pub frame: u64,
    /// Shared tile map.
    pub map: Arc<TileMap>,
    /// Side length of a tile in world pixels.
    pub tile_size: u32,
    /// Player avatar.
    pub player: PlayerPresentation,
    /// Characters in identifier order.
    pub npcs: Vec<NpcPresentation>,
    /// Welcome banner visibility.
    pub welcome: WelcomeBanner,
    /// Text of the active dialog, if any.
    pub dialog: Option<String>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        frame: u64,
        map: Arc<TileMap>,
        tile_size: u32,
        player: PlayerPresentation,
        npcs: Vec<NpcPresentation>,
        welcome: WelcomeBanner,
        dialog: Option<String>,
    ) -> Self {
        Self {
            frame,
            map,
            tile_size,
            player,
            npcs,
            welcome,
            dialog,
        }
    }

    /// Width of the map in world pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.map.columns() as f32 * self.tile_size as f32
    }

    /// Height of the map in world pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.map.rows() as f32 * self.tile_size as f32
    }

    /// Text of the welcome banner while it is shown.
    #[must_use]
    pub fn welcome_text(&self) -> Option<&'static str> {
        self.welcome.is_shown().then_some(WELCOME_BANNER)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Window size in screen pixels.
    pub window_size: (u32, u32),
    /// Simulation steps per second the backend should drive.
    pub frame_rate: u32,
    /// Colors used to draw the scene.
    pub palette: Palette,
    /// Scene shown before the first step.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    ///
    /// Returns an error when `frame_rate` or either window dimension is zero.
    pub fn new<T>(
        window_title: T,
        window_size: (u32, u32),
        frame_rate: u32,
        palette: Palette,
        scene: Scene,
    ) -> Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        if frame_rate == 0 {
            return Err(RenderingError::InvalidFrameRate { frame_rate });
        }
        if window_size.0 == 0 || window_size.1 == 0 {
            return Err(RenderingError::InvalidWindowSize {
                width: window_size.0,
                height: window_size.1,
            });
        }

        Ok(Self {
            window_title: window_title.into(),
            window_size,
            frame_rate,
            palette,
            scene,
        })
    }
}

/// Decision returned by the per-step callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    /// Keep running.
    Continue,
    /// Stop the loop and return from [`RenderingBackend::run`].
    Exit,
}

/// Rendering backend capable of presenting Overworld scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until the callback asks it to exit.
    ///
    /// The backend drives `step` at [`Presentation::frame_rate`] steps per
    /// second, handing it the input drained for that step and the scene to
    /// overwrite. An error returned by `step` stops the loop and is returned
    /// from `run`.
    fn run<F>(self, presentation: Presentation, step: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> AnyResult<LoopControl> + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The loop must run at a positive rate.
    InvalidFrameRate {
        /// Provided rate that failed validation.
        frame_rate: u32,
    },
    /// The window must have a positive area.
    InvalidWindowSize {
        /// Provided width.
        width: u32,
        /// Provided height.
        height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFrameRate { frame_rate } => {
                write!(f, "frame_rate must be positive (received {frame_rate})")
            }
            Self::InvalidWindowSize { width, height } => {
                write!(f, "window size must be positive (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        let map = TileMap::parse(["BBBB", "BP.B", "BBBB"]).expect("valid map");
        Scene::new(
            4,
            Arc::new(map),
            32,
            PlayerPresentation::new(Position::new(35.0, 32.0), Direction::Right, 1),
            vec![NpcPresentation::new(NpcId::new(0), CellCoord::new(2, 1))],
            WelcomeBanner::Shown,
            Some("Hello".to_owned()),
        )
    }

    #[test]
    fn scene_dimensions_follow_map_and_tile_size() {
        let scene = scene();

        assert_eq!(scene.width(), 128.0);
        assert_eq!(scene.height(), 96.0);
    }

    #[test]
    fn scene_dimensions_do_not_overflow_for_huge_tiles() {
        let mut scene = scene();
        scene.tile_size = u32::MAX;

        assert_eq!(scene.width(), 4.0 * u32::MAX as f32);
        assert_eq!(scene.height(), 3.0 * u32::MAX as f32);
    }

    #[test]
    fn welcome_text_only_while_shown() {
        let mut scene = scene();
        assert_eq!(scene.welcome_text(), Some(WELCOME_BANNER));

        scene.welcome = WelcomeBanner::Hidden;
        assert_eq!(scene.welcome_text(), None);
    }

    #[test]
    fn scene_survives_serialisation() {
        let scene = scene();
        let bytes = bincode::serialize(&scene).expect("serialize");
        let restored: Scene = bincode::deserialize(&bytes).expect("deserialize");

        assert_eq!(restored, scene);
    }

    #[test]
    fn presentation_rejects_zero_frame_rate_without_panicking() {
        let error = Presentation::new("Overworld", (640, 480), 0, Palette::default(), scene())
            .expect_err("zero frame rate must be rejected");

        assert_eq!(error, RenderingError::InvalidFrameRate { frame_rate: 0 });
    }

    #[test]
    fn presentation_rejects_empty_window() {
        let error = Presentation::new("Overworld", (640, 0), 30, Palette::default(), scene())
            .expect_err("empty window must be rejected");

        assert_eq!(
            error,
            RenderingError::InvalidWindowSize {
                width: 640,
                height: 0
            }
        );
    }

    #[test]
    fn frame_input_detects_quit() {
        assert!(!FrameInput::default().quit_requested());
        assert!(FrameInput::new(vec![
            InputEvent::DirectionHeld(Direction::Up),
            InputEvent::Quit
        ])
        .quit_requested());
    }
}

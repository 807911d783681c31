#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Overworld.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The window refreshes at whatever rate the platform allows while the
//! simulation advances in fixed steps released by [`FixedTimestep`].

mod input;

use self::input::{distribute_frame_input, KeyboardObservation, PendingKeys};
use anyhow::{Context, Result};
use glam::Vec2;
use log::{error, info};
use overworld_core::Tile;
use overworld_rendering::{
    Color, FixedTimestep, LoopControl, Palette, PlayerPresentation, Presentation,
    RenderingBackend, Scene,
};
use std::{
    collections::VecDeque,
    sync::mpsc,
    time::{Duration, Instant},
};

/// Font size used for banner text.
const FONT_SIZE: f32 = 24.0;
/// Distance from the top of a text line to its baseline at [`FONT_SIZE`].
const TEXT_BASELINE: f32 = 17.0;
/// Height of the dialog box.
const DIALOG_HEIGHT: f32 = 60.0;
/// Gap between the dialog box and the window edges.
const DIALOG_MARGIN: f32 = 10.0;
/// Padding between the dialog box border and its text.
const DIALOG_PADDING: f32 = 10.0;

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    steps: u32,
    simulation: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    steps: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    steps_per_second: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.steps = self.steps.saturating_add(breakdown.steps);
        self.simulation_accum += breakdown.simulation;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            steps_per_second: self.steps as f32 / seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.steps = 0;
        self.simulation_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut step: F) -> Result<()>
    where
        F: FnMut(overworld_rendering::FrameInput, &mut Scene) -> Result<LoopControl> + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            window_size,
            frame_rate,
            palette,
            scene,
        } = presentation;

        let mut timestep = FixedTimestep::from_frame_rate(frame_rate).with_context(|| {
            format!("cannot drive the simulation at {frame_rate} steps per second")
        })?;
        let window_width = i32::try_from(window_size.0).context("window width out of range")?;
        let window_height = i32::try_from(window_size.1).context("window height out of range")?;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width,
            window_height,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (outcome_sender, outcome_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut pending = PendingKeys::default();
            let mut fps_counter = FpsCounter::default();
            let background = to_macroquad_color(palette.background);

            macroquad::input::prevent_quit();
            info!("window opened, stepping at {frame_rate} Hz");

            let outcome = 'frames: loop {
                let observation = KeyboardObservation::poll();
                let frame_dt = Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                let steps_due = timestep.advance(frame_dt);

                let simulation_start = Instant::now();
                let inputs = distribute_frame_input(&observation, steps_due, &mut pending);
                let steps = inputs.len() as u32;
                for input in inputs {
                    let quit = input.quit_requested();
                    match step(input, &mut scene) {
                        Ok(LoopControl::Continue) if quit => {
                            info!("quit requested, closing the window");
                            break 'frames Ok(());
                        }
                        Ok(LoopControl::Continue) => {}
                        Ok(LoopControl::Exit) => break 'frames Ok(()),
                        Err(err) => {
                            error!("simulation step failed: {err:#}");
                            break 'frames Err(err);
                        }
                    }
                }
                let simulation = simulation_start.elapsed();

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                draw_tiles(&scene, &palette, &metrics);
                draw_npcs(&scene, &palette, &metrics);
                draw_player(&scene, &palette, &metrics);
                draw_banners(&scene, &palette, screen_width, screen_height);
                let render = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    steps,
                    simulation,
                    render,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        steps_per_second,
                        avg_simulation,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | steps/s: {:>5.2} sim: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            steps_per_second,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            };

            info!("window closing after frame {}", scene.frame);
            let _ = outcome_sender.send(outcome);
        });

        outcome_receiver.recv().unwrap_or_else(|_| Ok(()))
    }
}

/// Placement of the world inside the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    tile_step: f32,
}

impl SceneMetrics {
    /// Draws the world at its native size anchored to the top-left corner,
    /// shrinking it only when it does not fit the window.
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let world_width = scene.width();
        let world_height = scene.height();
        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / world_width)
                .min(screen_height / world_height)
                .min(1.0)
                .max(0.0)
        };

        Self {
            scale,
            tile_step: scene.tile_size as f32 * scale,
        }
    }

    fn to_screen(&self, world: Vec2) -> Vec2 {
        world * self.scale
    }
}

/// Screen rectangle as `(x, y, width, height)`.
type ScreenRect = (f32, f32, f32, f32);

/// Body and face rectangles of the player avatar.
fn player_rectangles(player: &PlayerPresentation, metrics: &SceneMetrics) -> [ScreenRect; 2] {
    let origin = metrics.to_screen(player.position);
    let tile = metrics.tile_step;
    let inset = 4.0 * metrics.scale;

    let body = (origin.x, origin.y, tile / 2.0, tile);
    let face = (
        origin.x + inset,
        origin.y + 2.0 * inset,
        (tile / 2.0 - 2.0 * inset).max(0.0),
        tile / 2.0,
    );
    [body, face]
}

/// Top-left corner of the welcome banner text.
fn welcome_text_origin(screen_height: f32) -> Vec2 {
    Vec2::new(50.0, screen_height - 50.0)
}

/// Rectangle of the dialog box spanning the bottom of the window.
fn dialog_box_rect(screen_width: f32, screen_height: f32) -> ScreenRect {
    (
        DIALOG_MARGIN,
        screen_height - DIALOG_HEIGHT - DIALOG_MARGIN,
        (screen_width - 2.0 * DIALOG_MARGIN).max(0.0),
        DIALOG_HEIGHT,
    )
}

fn tile_color(palette: &Palette, tile: Tile) -> Color {
    match tile {
        Tile::Wall => palette.wall,
        Tile::Floor => palette.floor,
        Tile::SpecialFloor => palette.special_floor,
    }
}

fn draw_tiles(scene: &Scene, palette: &Palette, metrics: &SceneMetrics) {
    for (cell, tile) in scene.map.iter() {
        let x = cell.column() as f32 * metrics.tile_step;
        let y = cell.row() as f32 * metrics.tile_step;
        let color = to_macroquad_color(tile_color(palette, tile));
        macroquad::shapes::draw_rectangle(x, y, metrics.tile_step, metrics.tile_step, color);
    }
}

fn draw_npcs(scene: &Scene, palette: &Palette, metrics: &SceneMetrics) {
    let color = to_macroquad_color(palette.npc);
    for npc in &scene.npcs {
        let x = npc.cell.column() as f32 * metrics.tile_step;
        let y = npc.cell.row() as f32 * metrics.tile_step;
        macroquad::shapes::draw_rectangle(x, y, metrics.tile_step, metrics.tile_step, color);
    }
}

fn draw_player(scene: &Scene, palette: &Palette, metrics: &SceneMetrics) {
    let [body, face] = player_rectangles(&scene.player, metrics);
    let colors = [palette.player_body, palette.player_face];
    for ((x, y, width, height), color) in [body, face].into_iter().zip(colors) {
        macroquad::shapes::draw_rectangle(x, y, width, height, to_macroquad_color(color));
    }
}

fn draw_banners(scene: &Scene, palette: &Palette, screen_width: f32, screen_height: f32) {
    if let Some(text) = scene.welcome_text() {
        let origin = welcome_text_origin(screen_height);
        let _ = macroquad::text::draw_text(
            text,
            origin.x,
            origin.y + TEXT_BASELINE,
            FONT_SIZE,
            to_macroquad_color(palette.banner_text),
        );
    }

    if let Some(text) = scene.dialog.as_deref() {
        let (x, y, width, height) = dialog_box_rect(screen_width, screen_height);
        let fill = to_macroquad_color(palette.dialog_box);
        macroquad::shapes::draw_rectangle(x, y, width, height, fill);
        let _ = macroquad::text::draw_text(
            text,
            x + DIALOG_PADDING,
            y + DIALOG_PADDING + TEXT_BASELINE,
            FONT_SIZE,
            to_macroquad_color(palette.dialog_text),
        );
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use overworld_core::{Direction, Position, TileMap, WelcomeBanner};
    use std::sync::Arc;

    fn scene_with(rows: &[&str], tile_size: u32) -> Scene {
        let map = TileMap::parse(rows).expect("valid map");
        Scene::new(
            0,
            Arc::new(map),
            tile_size,
            PlayerPresentation::new(Position::new(64.0, 32.0), Direction::Down, 0),
            Vec::new(),
            WelcomeBanner::Shown,
            None,
        )
    }

    fn town() -> Scene {
        scene_with(
            &[
                "BBBBBBBBBBBBBBBB",
                "B..............B",
                "B..P.......P...B",
                "B..............B",
                "B.......B......B",
                "B..............B",
                "BBBBBBBBBBBBBBBB",
            ],
            32,
        )
    }

    #[test]
    fn town_is_drawn_at_native_size() {
        let metrics = SceneMetrics::from_scene(&town(), 640.0, 480.0);

        assert_eq!(metrics.scale, 1.0);
        assert_eq!(metrics.tile_step, 32.0);
    }

    #[test]
    fn oversized_maps_shrink_to_fit() {
        let scene = scene_with(&["P".repeat(40).as_str(), "B".repeat(40).as_str()], 32);

        let metrics = SceneMetrics::from_scene(&scene, 640.0, 480.0);

        assert!((metrics.scale - 0.5).abs() <= f32::EPSILON);
        assert!((metrics.tile_step - 16.0).abs() <= f32::EPSILON);
    }

    #[test]
    fn player_body_is_half_a_tile_wide_with_inset_face() {
        let scene = town();
        let metrics = SceneMetrics::from_scene(&scene, 640.0, 480.0);

        let [body, face] = player_rectangles(&scene.player, &metrics);

        assert_eq!(body, (64.0, 32.0, 16.0, 32.0));
        assert_eq!(face, (68.0, 40.0, 8.0, 16.0));
    }

    #[test]
    fn banners_sit_at_the_bottom_of_the_window() {
        assert_eq!(welcome_text_origin(480.0), Vec2::new(50.0, 430.0));
        assert_eq!(dialog_box_rect(640.0, 480.0), (10.0, 410.0, 620.0, 60.0));
    }

    #[test]
    fn tiles_use_their_palette_entries() {
        let palette = Palette::default();

        assert_eq!(tile_color(&palette, Tile::Wall), palette.wall);
        assert_eq!(tile_color(&palette, Tile::Floor), palette.floor);
        assert_eq!(tile_color(&palette, Tile::SpecialFloor), palette.special_floor);
    }

    #[test]
    fn fps_counter_reports_average_frames_per_second() {
        let mut counter = FpsCounter::default();
        let frame = |millis| FrameBreakdown {
            frame: Duration::from_millis(millis),
            steps: 1,
            ..FrameBreakdown::default()
        };
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());

        let metrics = counter
            .record_frame(frame(250))
            .expect("should report FPS after one second of samples");
        assert!((metrics.per_second - 4.0).abs() <= 1e-3);
        assert!((metrics.trailing_ten_seconds - 4.0).abs() <= 1e-3);
        assert!((metrics.steps_per_second - 4.0).abs() <= 1e-3);
        assert!(counter.record_frame(frame(250)).is_none());
    }

    #[test]
    fn fps_counter_tracks_trailing_ten_second_average() {
        let mut counter = FpsCounter::default();
        let frame = |millis| FrameBreakdown {
            frame: Duration::from_millis(millis),
            ..FrameBreakdown::default()
        };

        for _ in 0..10 {
            for sample in 0..5 {
                let metrics = counter.record_frame(frame(200));
                if sample == 4 {
                    let metrics = metrics.expect("should report every second");
                    assert!((metrics.per_second - 5.0).abs() <= 1e-3);
                    assert!((metrics.trailing_ten_seconds - 5.0).abs() <= 1e-3);
                } else {
                    assert!(metrics.is_none());
                }
            }
        }

        for sample in 0..10 {
            let metrics = counter.record_frame(frame(100));
            if sample == 9 {
                let metrics = metrics.expect("should report every second");
                assert!((metrics.per_second - 10.0).abs() <= 1e-3);
                assert!((metrics.trailing_ten_seconds - 5.5).abs() <= 1e-3);
            } else {
                assert!(metrics.is_none());
            }
        }
    }
}

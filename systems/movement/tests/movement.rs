use std::sync::Arc;

use overworld_core::{
    CellCoord, Command, Direction, Event, InputEvent, Key, Position, SimulationConfig, TileMap,
};
use overworld_system_movement::Movement;
use overworld_world::{self as world, query, World};

fn world_on(rows: &[&str]) -> World {
    let map = TileMap::parse(rows).expect("valid map");
    World::new(SimulationConfig::default(), Arc::new(map), Vec::new()).expect("valid world")
}

fn pump(world: &mut World, movement: &mut Movement, input: &[InputEvent]) -> Vec<Event> {
    let mut commands = Vec::new();
    movement.handle(input, &mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events).expect("moves stay inside the map");
    }
    events
}

#[test]
fn emits_a_single_step_for_simultaneous_keys() {
    let mut movement = Movement::default();
    let mut commands = Vec::new();

    movement.handle(
        &[
            InputEvent::DirectionHeld(Direction::Up),
            InputEvent::KeyDown(Key::DismissWelcome),
            InputEvent::DirectionHeld(Direction::Left),
        ],
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::StepPlayer {
            direction: Direction::Left
        }],
        "only the highest-priority direction applies",
    );
}

#[test]
fn discrete_keys_alone_do_not_move_the_player() {
    let mut movement = Movement::default();
    let mut commands = Vec::new();

    movement.handle(
        &[
            InputEvent::KeyDown(Key::DismissDialog),
            InputEvent::KeyDown(Key::DismissWelcome),
        ],
        &mut commands,
    );

    assert!(commands.is_empty(), "banner keys never produce steps");
}

#[test]
fn player_walks_until_the_wall_and_then_stays_put() {
    let mut world = world_on(&["BBBBBB", "BP...B", "BBBBBB"]);
    let mut movement = Movement::default();
    let hold_right = [InputEvent::DirectionHeld(Direction::Right)];

    let mut blocked_after = None;
    for frame in 0..200 {
        let events = pump(&mut world, &mut movement, &hold_right);
        if matches!(events.as_slice(), [Event::PlayerBlocked { .. }]) {
            blocked_after = Some(frame);
            break;
        }
    }

    let frame = blocked_after.expect("the east wall stops the player");
    let player = query::player(&world);
    assert_eq!(player.cell, CellCoord::new(4, 1));
    assert_eq!(player.position, Position::new(32.0 + 3.0 * frame as f32, 32.0));

    let events = pump(&mut world, &mut movement, &hold_right);
    assert_eq!(
        events,
        vec![Event::PlayerBlocked {
            direction: Direction::Right,
            cell: CellCoord::new(5, 1),
        }]
    );
    assert_eq!(query::player(&world).position, player.position);
}

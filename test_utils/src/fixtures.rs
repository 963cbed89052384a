//! Level, simulation and app fixtures.

use bevy::prelude::*;
use glam::Vec2;
use haulage::level::{LevelDescriptor, Population};
use haulage::{AabbProbe, Archetype, Effect, FrameInput, HaulagePlugin, Rect, Simulation, Tuning};

/// Seed used by [`simulation`].
pub const FIXTURE_SEED: u64 = 1;

/// A 1600×1000 map with no obstacles and no actors.
///
/// The truck spawns at (100, 500) facing +x. The pickup zone straddles the
/// spawn row at x = 400 and the delivery zone at x = 900, so driving straight
/// ahead completes a standard mission.
#[must_use]
pub fn open_level() -> LevelDescriptor {
    LevelDescriptor {
        key: "TEST_OPEN".to_owned(),
        name: "Test Flats".to_owned(),
        difficulty: "Test".to_owned(),
        map_width: 1600.0,
        map_height: 1000.0,
        spawn: Vec2::new(100.0, 500.0),
        spawn_rotation: 0.0,
        pickup_zone: Rect::new(400.0, 460.0, 80.0, 80.0),
        delivery_zone: Rect::new(900.0, 460.0, 80.0, 80.0),
        route_zones: Default::default(),
        obstacles: Vec::new(),
        population: Some(Population::default()),
    }
}

/// [`open_level`] with a wall across the spawn row at x = 250.
#[must_use]
pub fn walled_level() -> LevelDescriptor {
    LevelDescriptor {
        key: "TEST_WALL".to_owned(),
        name: "Test Wall".to_owned(),
        obstacles: vec![Rect::new(250.0, 400.0, 40.0, 200.0)],
        ..open_level()
    }
}

/// Builds a simulation with default tuning and [`FIXTURE_SEED`].
///
/// # Panics
/// Panics if the level cannot host `archetype`.
#[must_use]
pub fn simulation(level: LevelDescriptor, archetype: Archetype) -> Simulation {
    Simulation::new(level, archetype, Tuning::default(), FIXTURE_SEED)
        .expect("fixture level should host the mission")
}

/// Steps `sim` for `seconds` at `fps` with constant `input`, using the AABB
/// probe. Returns every effect in order.
pub fn drive(sim: &mut Simulation, input: FrameInput, seconds: f32, fps: u16) -> Vec<Effect> {
    let dt = 1.0 / f32::from(fps);
    let frames = (seconds * f32::from(fps)).round() as u32;
    (0..frames)
        .flat_map(|_| sim.step(&input, dt, &mut AabbProbe))
        .collect()
}

/// Steps at 60 fps until `found` matches an effect or `max_seconds` pass.
pub fn drive_until(
    sim: &mut Simulation,
    input: FrameInput,
    max_seconds: f32,
    mut found: impl FnMut(&Effect) -> bool,
) -> Option<Effect> {
    let dt = 1.0 / 60.0;
    while sim.clock() < max_seconds {
        if let Some(effect) = sim
            .step(&input, dt, &mut AabbProbe)
            .into_iter()
            .find(|effect| found(effect))
        {
            return Some(effect);
        }
    }
    None
}

/// Headless app running `sim` through [`HaulagePlugin`].
#[must_use]
pub fn headless_app(sim: Simulation) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(HaulagePlugin::with_simulation(sim));
    app
}

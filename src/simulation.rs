//! The single frame step.
//!
//! [`Simulation::step`] is the only mutator of game state. Within a frame it
//! resolves pause and reset edges, drives the truck, derives the trailer,
//! moves encounter actors, resolves the contacts reported by a
//! [`ContactProbe`], runs the mission clock and checks the current stop zone.
//! Everything that happened is returned as a list of [`Effect`]s for the
//! caller to dispatch.
use glam::Vec2;
use hashbrown::HashSet;
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::encounter::actor::spawn_population;
use crate::encounter::{
    resolve_actor_contact, resolve_obstacle_contact, ActorId, Category, ContactOutcome,
    CrushMarks, EncounterActor, ObstacleOutcome,
};
use crate::error::ConfigError;
use crate::geometry::Rect;
use crate::input::FrameInput;
use crate::level::LevelDescriptor;
use crate::mission::{Archetype, DeliveryOutcome, Mission, MissionResult};
use crate::numeric::sanitise_delta;
use crate::tuning::Tuning;
use crate::vehicle::{Pose, Trailer, Truck};

/// Something observable that happened during a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Cargo collected.
    PickupOccurred {
        /// Index of the pickup stop.
        stop: usize,
        /// Label of the pickup stop.
        label: String,
    },
    /// An intermediate delivery was made.
    StopCompleted {
        /// Index of the new current stop.
        next: usize,
    },
    /// The truck hit an obstacle.
    CollisionOccurred {
        /// The mission's running collision count.
        total: u32,
        /// Truck position after push-out.
        position: Vec2,
    },
    /// An encounter actor was crushed.
    Crushed {
        /// Category of the victim.
        category: Category,
        /// Signed crush score applied.
        score_delta: i64,
        /// Where it happened.
        position: Vec2,
    },
    /// Slow contact shoved a traffic vehicle aside.
    TrafficBumped {
        /// The shoved vehicle.
        actor: ActorId,
    },
    /// The truck left the ground.
    JumpStarted,
    /// Truck and trailer were returned to spawn.
    TruckReset,
    /// Pause was toggled.
    PauseToggled {
        /// The new pause state.
        paused: bool,
    },
    /// The mission reached a terminal state.
    MissionEnded(Box<MissionResult>),
}

/// One overlap reported by the broad phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contact {
    /// Truck against the obstacle at this index of the level's list.
    Obstacle(usize),
    /// Truck or trailer against an encounter actor.
    Actor(ActorId),
}

/// Read-only world snapshot handed to a [`ContactProbe`].
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    /// Truck footprint.
    pub truck: Rect,
    /// Trailer footprint.
    pub trailer: Rect,
    /// The level's obstacles; contacts refer to them by index.
    pub obstacles: &'a [Rect],
    /// Every actor, crushed ones included.
    pub actors: &'a [EncounterActor],
}

/// Broad-phase seam: reports which bodies overlap this frame.
pub trait ContactProbe {
    /// Lists this frame's overlaps. Order is kept; duplicates are tolerated.
    fn probe(&mut self, world: &WorldView<'_>) -> Vec<Contact>;
}

impl<F> ContactProbe for F
where
    F: FnMut(&WorldView<'_>) -> Vec<Contact>,
{
    fn probe(&mut self, world: &WorldView<'_>) -> Vec<Contact> {
        self(world)
    }
}

/// Axis-aligned bounding-box broad phase.
///
/// Obstacles collide with the truck only; live actors collide with the truck
/// or the trailer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AabbProbe;

impl ContactProbe for AabbProbe {
    fn probe(&mut self, world: &WorldView<'_>) -> Vec<Contact> {
        let obstacles = world
            .obstacles
            .iter()
            .enumerate()
            .filter(|(_, obstacle)| world.truck.overlaps(obstacle))
            .map(|(index, _)| Contact::Obstacle(index));
        let actors = world
            .actors
            .iter()
            .filter(|actor| !actor.is_crushed())
            .filter(|actor| {
                let body = actor.bounds();
                world.truck.overlaps(&body) || world.trailer.overlaps(&body)
            })
            .map(|actor| Contact::Actor(actor.id()));
        obstacles.chain(actors).collect()
    }
}

/// Values a HUD needs each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    /// Display name of the archetype.
    pub mission_name: &'static str,
    /// Instruction for the current stop.
    pub objective: String,
    /// Stops done out of total, e.g. `1 / 2`.
    pub progress: String,
    /// Seconds left on the mission clock.
    pub time_remaining: f32,
    /// Obstacle hits so far.
    pub collisions: u32,
    /// Running crush score.
    pub crush_score: i64,
    /// Signed truck speed along its heading.
    pub speed: f32,
    /// Centre of the current stop zone.
    pub target: Vec2,
    /// Whether the step is paused.
    pub paused: bool,
    /// Dirt level in `[0, 1]`.
    pub dirt: f32,
    /// Blood level in `[0, 1]`.
    pub blood: f32,
}

/// A running mission on one level.
#[derive(Debug, Clone)]
pub struct Simulation {
    level: LevelDescriptor,
    tuning: Tuning,
    truck: Truck,
    trailer: Trailer,
    mission: Mission,
    actors: Vec<EncounterActor>,
    marks: CrushMarks,
    obstacle_contacts: HashSet<usize>,
    paused: bool,
    clock: f32,
    rng: SmallRng,
}

impl Simulation {
    /// Validates the inputs and sets up truck, trailer, mission and actors.
    ///
    /// `seed` drives every random choice so runs are reproducible.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the tuning, the level or the archetype's
    /// route on that level is invalid.
    pub fn new(
        level: LevelDescriptor,
        archetype: Archetype,
        tuning: Tuning,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        level.validate()?;
        let mission = Mission::new(archetype, &level, tuning.mission.clone())?;

        let mut rng = SmallRng::seed_from_u64(seed);
        let truck = Truck::new(
            Pose::new(level.spawn, level.spawn_rotation),
            tuning.truck.clone(),
        );
        let trailer = Trailer::new(&truck, tuning.trailer.clone());
        let population = level.population_for(&tuning.encounter);
        let actors = spawn_population(
            &population,
            &level.bounds(),
            &level.obstacles,
            &tuning.encounter,
            &mut rng,
        );
        let marks = CrushMarks::with_capacity(tuning.encounter.max_decals);

        info!("loaded {} ({}) for {}", level.name, level.key, archetype);
        Ok(Self {
            level,
            tuning,
            truck,
            trailer,
            mission,
            actors,
            marks,
            obstacle_contacts: HashSet::new(),
            paused: false,
            clock: 0.0,
            rng,
        })
    }

    /// Replaces the spawned population, e.g. with scripted actors.
    pub fn set_actors(&mut self, actors: Vec<EncounterActor>) {
        self.actors = actors;
    }

    /// Advances one frame using the built-in AABB broad phase.
    pub fn step_aabb(&mut self, input: &FrameInput, dt: f32) -> Vec<Effect> {
        self.step(input, dt, &mut AabbProbe)
    }

    /// Advances one frame of `dt` seconds.
    ///
    /// A pause edge toggles the pause state and consumes the frame. While
    /// paused nothing advances.
    pub fn step(
        &mut self,
        input: &FrameInput,
        dt: f32,
        probe: &mut dyn ContactProbe,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();

        if input.pause {
            self.paused = !self.paused;
            debug!("pause toggled: {}", self.paused);
            effects.push(Effect::PauseToggled {
                paused: self.paused,
            });
            return effects;
        }
        if self.paused {
            return effects;
        }

        let delta = sanitise_delta(dt).unwrap_or_else(|| {
            warn!("ignoring invalid frame delta {dt}");
            0.0
        });
        self.clock += delta;

        if input.reset {
            self.reset_vehicle();
            effects.push(Effect::TruckReset);
        }

        let was_jumping = self.truck.is_jumping();
        self.truck.update(input, delta);
        if self.truck.is_jumping() && !was_jumping {
            effects.push(Effect::JumpStarted);
        }
        self.truck.integrate(delta, &self.level.bounds());
        self.trailer.update(&self.truck, delta);

        self.update_actors(delta);
        self.resolve_contacts(probe, &mut effects);

        if let Some(record) = self.mission.update(delta) {
            effects.push(Effect::MissionEnded(Box::new(record)));
        }
        self.check_zones(&mut effects);

        effects
    }

    fn update_actors(&mut self, dt: f32) {
        let bounds = self.level.bounds();
        let tuning = &self.tuning.encounter;
        let rng = &mut self.rng;
        self.actors
            .retain_mut(|actor| !actor.update(dt, &bounds, tuning, rng));
    }

    fn resolve_contacts(&mut self, probe: &mut dyn ContactProbe, effects: &mut Vec<Effect>) {
        let contacts = probe.probe(&WorldView {
            truck: self.truck.bounds(),
            trailer: self.trailer.bounds(),
            obstacles: &self.level.obstacles,
            actors: &self.actors,
        });

        // Airborne overlaps are not recorded, so landing inside a wall begins
        // a fresh contact.
        let airborne = self.truck.is_jumping();
        let mut touching = HashSet::new();
        for contact in contacts {
            match contact {
                Contact::Obstacle(_) if airborne => {}
                Contact::Obstacle(index) => {
                    if touching.insert(index) {
                        self.resolve_obstacle(index, effects);
                    }
                }
                Contact::Actor(id) => self.resolve_actor(id, effects),
            }
        }
        self.obstacle_contacts = touching;
    }

    fn resolve_obstacle(&mut self, index: usize, effects: &mut Vec<Effect>) {
        let Some(obstacle) = self.level.obstacles.get(index).copied() else {
            warn!("contact with unknown obstacle #{index}");
            return;
        };

        self.truck
            .translate(self.truck.bounds().separation_from(&obstacle));
        if self.obstacle_contacts.contains(&index) {
            return;
        }
        if resolve_obstacle_contact(&mut self.truck, &mut self.mission) == ObstacleOutcome::Collided
        {
            effects.push(Effect::CollisionOccurred {
                total: self.mission.collisions(),
                position: self.truck.position(),
            });
        }
    }

    fn resolve_actor(&mut self, id: ActorId, effects: &mut Vec<Effect>) {
        let Some(actor) = self.actors.iter_mut().find(|actor| actor.id() == id) else {
            debug!("contact with departed actor {id:?}");
            return;
        };
        let outcome = resolve_actor_contact(
            actor,
            &mut self.truck,
            &mut self.mission,
            &mut self.marks,
            &self.tuning.encounter,
            &mut self.rng,
        );
        match outcome {
            ContactOutcome::Crushed {
                category,
                score_delta,
                position,
            } => effects.push(Effect::Crushed {
                category,
                score_delta,
                position,
            }),
            ContactOutcome::Bumped => effects.push(Effect::TrafficBumped { actor: id }),
            ContactOutcome::Fled | ContactOutcome::Ignored => {}
        }
    }

    fn check_zones(&mut self, effects: &mut Vec<Effect>) {
        let bounds = self.truck.bounds();
        let index = self.mission.current_stop_index();
        let label = self
            .mission
            .current_stop()
            .map(|stop| stop.label().to_owned());
        if self.mission.check_pickup_zone(&bounds) {
            effects.push(Effect::PickupOccurred {
                stop: index,
                label: label.unwrap_or_default(),
            });
        }
        // An overlapping delivery zone completes in the same frame.
        match self.mission.check_delivery_zone(&bounds) {
            DeliveryOutcome::NotReached => {}
            DeliveryOutcome::StopCompleted { next } => {
                effects.push(Effect::StopCompleted { next });
            }
            DeliveryOutcome::Finished(record) => effects.push(Effect::MissionEnded(record)),
        }
    }

    fn reset_vehicle(&mut self) {
        self.truck.reset();
        self.trailer.reset(&self.truck);
        self.obstacle_contacts.clear();
        debug!("truck reset to {:?}", self.truck.spawn());
    }

    /// Sets the pause state directly.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Values for the HUD, read between frames.
    #[must_use]
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            mission_name: self.mission.name(),
            objective: self.mission.objective(),
            progress: self.mission.progress(),
            time_remaining: self.mission.time_remaining(),
            collisions: self.mission.collisions(),
            crush_score: self.mission.crush_score(),
            speed: self.truck.speed(),
            target: self.mission.target_position(),
            paused: self.paused,
            dirt: self.truck.dirt(),
            blood: self.truck.blood(),
        }
    }

    /// The player truck.
    #[must_use]
    pub const fn truck(&self) -> &Truck {
        &self.truck
    }

    /// Mutable truck access for scripted scenarios.
    pub fn truck_mut(&mut self) -> &mut Truck {
        &mut self.truck
    }

    /// The trailer hitched to the truck.
    #[must_use]
    pub const fn trailer(&self) -> &Trailer {
        &self.trailer
    }

    /// Mission state and tallies.
    #[must_use]
    pub const fn mission(&self) -> &Mission {
        &self.mission
    }

    /// Live actors and crushed traffic still fading.
    #[must_use]
    pub fn actors(&self) -> &[EncounterActor] {
        &self.actors
    }

    /// Decals and debris left by crushes.
    #[must_use]
    pub const fn marks(&self) -> &CrushMarks {
        &self.marks
    }

    /// Mutable marks access so presentation can drain one-shot debris.
    pub fn marks_mut(&mut self) -> &mut CrushMarks {
        &mut self.marks
    }

    /// Level being played.
    #[must_use]
    pub const fn level(&self) -> &LevelDescriptor {
        &self.level
    }

    /// Validated tuning in effect.
    #[must_use]
    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// `true` while paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Simulated seconds, excluding paused frames.
    #[must_use]
    pub const fn clock(&self) -> f32 {
        self.clock
    }

    /// `true` once the mission has completed or timed out.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !self.mission.is_active()
    }
}

//! Encounter actor state, spawning and per-frame AI.
use std::f32::consts::{PI, TAU};

use glam::Vec2;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::Rect;
use crate::level::Population;
use crate::math::{angle_between, direction_or_zero, heading, lerp};
use crate::tuning::EncounterTuning;

use super::{Axis, Behaviour, Category};

/// Stable identifier for an actor within one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

/// Body style of a traffic vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficKind {
    /// Compact car.
    Car,
    /// Four-door saloon.
    Sedan,
    /// Delivery van.
    Van,
    /// City bus; the longest footprint.
    Bus,
}

impl TrafficKind {
    /// Every body style, for random selection.
    pub const ALL: [Self; 4] = [Self::Car, Self::Sedan, Self::Van, Self::Bus];

    /// Width and length when driving vertically.
    #[must_use]
    pub const fn footprint(self) -> (f32, f32) {
        match self {
            Self::Car => (28.0, 40.0),
            Self::Sedan => (30.0, 48.0),
            Self::Van => (32.0, 52.0),
            Self::Bus => (35.0, 70.0),
        }
    }

    /// Relative mass, `1` for a car.
    #[must_use]
    pub const fn mass(self) -> f32 {
        match self {
            Self::Car => 1.0,
            Self::Sedan => 1.2,
            Self::Van => 1.5,
            Self::Bus => 3.0,
        }
    }
}

/// Spin-and-fade played by crushed traffic before removal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrushFade {
    /// Seconds of fade left.
    pub remaining: f32,
    /// Full fade length.
    pub duration: f32,
    /// Total rotation in radians applied over the fade.
    pub spin: f32,
}

impl CrushFade {
    /// Fraction of the fade still to play, `1` at the start.
    #[must_use]
    pub fn progress_left(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            (self.remaining / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// A traffic vehicle, pedestrian or animal.
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterActor {
    id: ActorId,
    category: Category,
    position: Vec2,
    velocity: Vec2,
    /// Lane velocity cruising traffic returns to after a bump.
    cruise_velocity: Vec2,
    rotation: f32,
    width: f32,
    height: f32,
    behaviour: Behaviour,
    crushed: bool,
    fade: Option<CrushFade>,
    traffic_kind: Option<TrafficKind>,
}

impl EncounterActor {
    /// Builds an actor with explicit kinematics.
    #[must_use]
    pub fn new(
        id: ActorId,
        category: Category,
        position: Vec2,
        velocity: Vec2,
        behaviour: Behaviour,
    ) -> Self {
        let (width, height) = category.footprint();
        Self {
            id,
            category,
            position,
            velocity,
            cruise_velocity: velocity,
            rotation: if velocity == Vec2::ZERO {
                0.0
            } else {
                velocity.to_angle()
            },
            width,
            height,
            behaviour,
            crushed: false,
            fade: None,
            traffic_kind: None,
        }
    }

    /// A wandering pedestrian or animal heading in a random direction.
    pub fn walker(
        id: ActorId,
        category: Category,
        position: Vec2,
        tuning: &EncounterTuning,
        rng: &mut impl Rng,
    ) -> Self {
        let mut actor = Self::new(
            id,
            category,
            position,
            Vec2::ZERO,
            Behaviour::Wander { turn_timer: 0.0 },
        );
        actor.pick_wander_heading(tuning, rng);
        if category.is_wildlife() {
            actor.behaviour = Behaviour::Wander {
                turn_timer: rng.gen_range(0.7..=1.8),
            };
        }
        actor
    }

    /// A traffic vehicle cruising along `axis` in a random direction.
    pub fn traffic(
        id: ActorId,
        kind: TrafficKind,
        axis: Axis,
        position: Vec2,
        rng: &mut impl Rng,
    ) -> Self {
        let speed = rng.gen_range(30.0..=60.0);
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let velocity = match axis {
            Axis::Horizontal => Vec2::new(speed * sign, 0.0),
            Axis::Vertical => Vec2::new(0.0, speed * sign),
        };
        let (narrow, long) = kind.footprint();
        let (width, height) = match axis {
            Axis::Horizontal => (long, narrow),
            Axis::Vertical => (narrow, long),
        };
        let mut actor = Self::new(
            id,
            Category::Traffic,
            position,
            velocity,
            Behaviour::Cruise { axis },
        );
        actor.width = width;
        actor.height = height;
        actor.traffic_kind = Some(kind);
        actor
    }

    /// A fixed actor that never moves.
    #[must_use]
    pub fn stationary(id: ActorId, category: Category, position: Vec2) -> Self {
        Self::new(id, category, position, Vec2::ZERO, Behaviour::Static)
    }

    /// Advances the actor's AI. Returns `true` once the actor should be
    /// removed from the world.
    pub fn update(
        &mut self,
        dt: f32,
        bounds: &Rect,
        tuning: &EncounterTuning,
        rng: &mut impl Rng,
    ) -> bool {
        if let Some(fade) = self.fade.as_mut() {
            let step = if fade.duration > 0.0 {
                fade.spin * dt / fade.duration
            } else {
                0.0
            };
            fade.remaining -= dt;
            self.rotation += step;
            return fade.remaining <= 0.0;
        }
        if self.crushed {
            return true;
        }

        match self.behaviour {
            Behaviour::Wander { turn_timer } => {
                let left = turn_timer - dt;
                if left <= 0.0 {
                    self.pick_wander_heading(tuning, rng);
                } else {
                    self.behaviour = Behaviour::Wander { turn_timer: left };
                }
                self.position += self.velocity * dt;
                self.bounce(bounds);
            }
            Behaviour::Cruise { .. } => {
                let blend = (tuning.traffic_recovery_rate * dt).clamp(0.0, 1.0);
                self.velocity = self.velocity.lerp(self.cruise_velocity, blend);
                self.position += self.velocity * dt;
                self.wrap(bounds, tuning.traffic_wrap_margin);
            }
            Behaviour::Static => {}
        }
        false
    }

    fn pick_wander_heading(&mut self, tuning: &EncounterTuning, rng: &mut impl Rng) {
        let profile = self.category.profile(tuning);
        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(profile.wander_speed) * tuning.wander_speed_scale;
        self.set_heading(angle, speed);
        self.behaviour = Behaviour::Wander {
            turn_timer: rng.gen_range(self.category.turn_interval()),
        };
    }

    fn set_heading(&mut self, angle: f32, speed: f32) {
        self.velocity = heading(angle) * speed;
        self.rotation = angle;
    }

    fn bounce(&mut self, bounds: &Rect) {
        if self.position.x < bounds.x {
            self.position.x = bounds.x;
            self.velocity.x = self.velocity.x.abs();
        } else if self.position.x > bounds.right() {
            self.position.x = bounds.right();
            self.velocity.x = -self.velocity.x.abs();
        }
        if self.position.y < bounds.y {
            self.position.y = bounds.y;
            self.velocity.y = self.velocity.y.abs();
        } else if self.position.y > bounds.bottom() {
            self.position.y = bounds.bottom();
            self.velocity.y = -self.velocity.y.abs();
        }
    }

    /// Re-enters from the opposite edge once `margin` past the map, on
    /// either axis.
    fn wrap(&mut self, bounds: &Rect, margin: f32) {
        if self.position.x < bounds.x - margin {
            self.position.x = bounds.right() + margin;
        } else if self.position.x > bounds.right() + margin {
            self.position.x = bounds.x - margin;
        }
        if self.position.y < bounds.y - margin {
            self.position.y = bounds.bottom() + margin;
        } else if self.position.y > bounds.bottom() + margin {
            self.position.y = bounds.y - margin;
        }
    }

    /// Runs away from `point` at the category's flee speed with a jittered
    /// heading.
    pub fn flee_from(&mut self, point: Vec2, tuning: &EncounterTuning, rng: &mut impl Rng) {
        let profile = self.category.profile(tuning);
        let jitter = if profile.flee_jitter > 0.0 {
            rng.gen_range(-profile.flee_jitter..=profile.flee_jitter)
        } else {
            0.0
        };
        let angle = angle_between(point, self.position) + jitter;
        let speed = rng.gen_range(profile.flee_speed);
        self.set_heading(angle, speed);
        if let Behaviour::Wander { .. } = self.behaviour {
            self.behaviour = Behaviour::Wander {
                turn_timer: rng.gen_range(self.category.turn_interval()),
            };
        }
    }

    /// Shoves the actor directly away from `point` at `speed`. Cruising
    /// traffic drifts back to its lane velocity afterwards.
    pub fn push_away_from(&mut self, point: Vec2, speed: f32) {
        let mut direction = direction_or_zero(self.position - point);
        if direction == Vec2::ZERO {
            direction = heading(self.rotation);
        }
        self.velocity = direction * speed;
    }

    /// Flags the actor as crushed and stops it. Traffic passes a fade
    /// duration to spin out before removal.
    ///
    /// Returns `false` when the actor was already crushed.
    pub fn mark_crushed(&mut self, fade: Option<f32>, rng: &mut impl Rng) -> bool {
        if self.crushed {
            debug!("ignoring repeat crush of {:?}", self.id);
            return false;
        }
        self.crushed = true;
        self.velocity = Vec2::ZERO;
        self.fade = fade.map(|duration| CrushFade {
            remaining: duration,
            duration,
            spin: rng.gen_range(-PI..=PI),
        });
        true
    }

    /// Identifier used by contact reports.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Category tag.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Centre in world units.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity in units per second.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Facing in radians.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Active movement strategy.
    #[must_use]
    pub const fn behaviour(&self) -> Behaviour {
        self.behaviour
    }

    /// `true` once crushed; later contacts are ignored.
    #[must_use]
    pub const fn is_crushed(&self) -> bool {
        self.crushed
    }

    /// Spin-out in progress, if any.
    #[must_use]
    pub const fn fade(&self) -> Option<CrushFade> {
        self.fade
    }

    /// Body style for traffic, `None` for walkers.
    #[must_use]
    pub const fn traffic_kind(&self) -> Option<TrafficKind> {
        self.traffic_kind
    }

    /// Opacity for presentation; fades to zero while crushed traffic spins out.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.fade.map_or(1.0, |fade| fade.progress_left())
    }

    /// Draw scale; shrinks to one half over the crush fade.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.fade
            .map_or(1.0, |fade| lerp(0.5, 1.0, fade.progress_left()))
    }

    /// Axis-aligned footprint around the centre.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.position, self.width, self.height)
    }
}

/// Share of spawned pedestrians that carry a flag.
const FLAG_CARRIER_SHARE: f64 = 0.15;
/// Share of spawned pedestrians that use a wheelchair.
const WHEELCHAIR_SHARE: f64 = 0.15;
const SPAWN_ATTEMPTS: usize = 8;

/// Spawns the level's traffic, pedestrians and wildlife inside `bounds`,
/// avoiding `obstacles` where possible.
pub fn spawn_population(
    population: &Population,
    bounds: &Rect,
    obstacles: &[Rect],
    tuning: &EncounterTuning,
    rng: &mut impl Rng,
) -> Vec<EncounterActor> {
    let mut actors = Vec::new();
    let mut next_id = 0_u32;
    let mut allocate = || {
        let id = ActorId(next_id);
        next_id += 1;
        id
    };

    for _ in 0..population.traffic {
        let kind = TrafficKind::ALL
            .choose(rng)
            .copied()
            .unwrap_or(TrafficKind::Car);
        let axis = if rng.gen_bool(0.5) {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        let position = free_position(bounds, obstacles, rng);
        actors.push(EncounterActor::traffic(allocate(), kind, axis, position, rng));
    }

    for _ in 0..population.pedestrians {
        let roll: f64 = rng.gen();
        let category = if roll < FLAG_CARRIER_SHARE {
            Category::FlagCarrier
        } else if roll < FLAG_CARRIER_SHARE + WHEELCHAIR_SHARE {
            Category::Wheelchair
        } else {
            Category::Pedestrian
        };
        let position = free_position(bounds, obstacles, rng);
        actors.push(EncounterActor::walker(
            allocate(),
            category,
            position,
            tuning,
            rng,
        ));
    }

    for _ in 0..population.wildlife {
        let position = free_position(bounds, obstacles, rng);
        actors.push(EncounterActor::walker(
            allocate(),
            Category::Squirrel,
            position,
            tuning,
            rng,
        ));
    }

    debug!(
        "spawned {} actors ({} traffic, {} pedestrians, {} wildlife)",
        actors.len(),
        population.traffic,
        population.pedestrians,
        population.wildlife
    );
    actors
}

fn free_position(bounds: &Rect, obstacles: &[Rect], rng: &mut impl Rng) -> Vec2 {
    let mut candidate = bounds.center();
    for _ in 0..SPAWN_ATTEMPTS {
        candidate = Vec2::new(
            rng.gen_range(bounds.x..=bounds.right()),
            rng.gen_range(bounds.y..=bounds.bottom()),
        );
        if !obstacles.iter().any(|o| o.contains_point(candidate)) {
            break;
        }
    }
    candidate
}

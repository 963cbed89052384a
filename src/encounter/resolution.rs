//! Collision and encounter resolution.
//!
//! The broad phase reports overlaps; these functions decide what an overlap
//! means. Every entry point is idempotent with respect to an actor that has
//! already been crushed.
use std::collections::VecDeque;

use glam::Vec2;
use log::debug;
use rand::Rng;

use crate::mission::Mission;
use crate::tuning::EncounterTuning;
use crate::vehicle::Truck;

use super::{Category, EncounterActor};

/// Particles thrown by a single crush.
const DEBRIS_PARTICLES: u8 = 12;

/// Result of touching a static obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleOutcome {
    /// Momentum scrubbed and the collision counted.
    Collided,
    /// The truck was airborne.
    Suppressed,
}

/// Result of touching an encounter actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactOutcome {
    /// The actor was destroyed and scored.
    Crushed {
        /// Category of the crushed actor.
        category: Category,
        /// Signed crush score applied to the mission.
        score_delta: i64,
        /// Where the actor died.
        position: Vec2,
    },
    /// Traffic shoved aside by a slow hit.
    Bumped,
    /// A pedestrian or animal ran off.
    Fled,
    /// The actor had already been crushed.
    Ignored,
}

/// Blood trail left where a walker was crushed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decal {
    /// Where the walker died.
    pub position: Vec2,
    /// Direction of travel of the truck at impact.
    pub rotation: f32,
    /// Decides the decal colour.
    pub category: Category,
}

/// One-shot particle burst at a crush site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebrisBurst {
    /// Burst centre.
    pub position: Vec2,
    /// Particle count.
    pub particles: u8,
    /// Category of the crushed actor.
    pub category: Category,
}

/// Bounded record of crush decals and debris for presentation.
#[derive(Debug, Clone, Default)]
pub struct CrushMarks {
    decals: VecDeque<Decal>,
    debris: VecDeque<DebrisBurst>,
    capacity: usize,
}

impl CrushMarks {
    /// Keeps at most `capacity` of each mark kind, discarding the oldest.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            decals: VecDeque::with_capacity(capacity),
            debris: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a decal, recycling the oldest when full.
    pub fn add_decal(&mut self, decal: Decal) {
        push_bounded(&mut self.decals, decal, self.capacity);
    }

    /// Queues a debris burst, recycling the oldest when full.
    pub fn add_debris(&mut self, burst: DebrisBurst) {
        push_bounded(&mut self.debris, burst, self.capacity);
    }

    /// Decals, oldest first.
    pub fn decals(&self) -> impl Iterator<Item = &Decal> {
        self.decals.iter()
    }

    /// Pending debris bursts, oldest first.
    pub fn debris(&self) -> impl Iterator<Item = &DebrisBurst> {
        self.debris.iter()
    }

    /// Drops every debris burst; they are one-shot effects.
    pub fn drain_debris(&mut self) -> Vec<DebrisBurst> {
        self.debris.drain(..).collect()
    }

    /// Decals currently kept.
    #[must_use]
    pub fn decal_count(&self) -> usize {
        self.decals.len()
    }

    /// Forgets every mark.
    pub fn clear(&mut self) {
        self.decals.clear();
        self.debris.clear();
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, item: T, capacity: usize) {
    if capacity == 0 {
        return;
    }
    while queue.len() >= capacity {
        queue.pop_front();
    }
    queue.push_back(item);
}

/// Truck against a static obstacle.
///
/// Jumping trucks sail over obstacles; otherwise momentum is scrubbed and the
/// mission records the hit.
pub fn resolve_obstacle_contact(truck: &mut Truck, mission: &mut Mission) -> ObstacleOutcome {
    if truck.is_jumping() {
        return ObstacleOutcome::Suppressed;
    }
    truck.handle_collision();
    let total = mission.register_collision();
    debug!("obstacle collision #{total} at {:?}", truck.position());
    ObstacleOutcome::Collided
}

/// Truck or trailer against an encounter actor.
///
/// Traffic is crushed above its lethal speed regardless of the jump state and
/// bumped aside otherwise. Pedestrians and wildlife are crushed above their
/// lethal speed only while the truck is grounded; in every other case they
/// flee from the impact.
pub fn resolve_actor_contact(
    actor: &mut EncounterActor,
    truck: &mut Truck,
    mission: &mut Mission,
    marks: &mut CrushMarks,
    tuning: &EncounterTuning,
    rng: &mut impl Rng,
) -> ContactOutcome {
    if actor.is_crushed() {
        debug!("contact with already crushed {:?} ignored", actor.id());
        return ContactOutcome::Ignored;
    }

    let category = actor.category();
    let profile = category.profile(tuning);
    let closing_speed = truck.speed().abs();
    let lethal = closing_speed > profile.lethal_speed;

    if category.is_traffic() {
        if !lethal {
            actor.push_away_from(truck.position(), tuning.traffic_bump_speed);
            return ContactOutcome::Bumped;
        }
        if !actor.mark_crushed(Some(tuning.traffic_crush_fade), rng) {
            return ContactOutcome::Ignored;
        }
    } else {
        if !lethal || truck.is_jumping() {
            actor.flee_from(truck.position(), tuning, rng);
            return ContactOutcome::Fled;
        }
        if !actor.mark_crushed(None, rng) {
            return ContactOutcome::Ignored;
        }
        marks.add_decal(Decal {
            position: actor.position(),
            rotation: truck.rotation(),
            category,
        });
    }

    truck.add_blood(tuning.crush_blood);
    marks.add_debris(DebrisBurst {
        position: actor.position(),
        particles: DEBRIS_PARTICLES,
        category,
    });
    mission.register_crush(category, profile.score_delta);
    debug!(
        "crushed {category} {:?} at {closing_speed:.0} u/s ({:+})",
        actor.id(),
        profile.score_delta
    );
    ContactOutcome::Crushed {
        category,
        score_delta: profile.score_delta,
        position: actor.position(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encounter::{ActorId, Axis, Behaviour};
    use crate::geometry::Rect;
    use crate::mission::{Archetype, Stop, StopKind};
    use crate::tuning::{MissionTuning, TruckTuning};
    use crate::vehicle::Pose;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use rstest::{fixture, rstest};

    struct Scene {
        truck: Truck,
        mission: Mission,
        marks: CrushMarks,
        tuning: EncounterTuning,
        rng: SmallRng,
    }

    #[fixture]
    fn scene() -> Scene {
        let stops = vec![
            Stop::new(Rect::new(0.0, 0.0, 50.0, 50.0), StopKind::Pickup, "PICKUP"),
            Stop::new(
                Rect::new(500.0, 500.0, 50.0, 50.0),
                StopKind::Delivery,
                "DELIVERY",
            ),
        ];
        Scene {
            truck: Truck::new(Pose::new(Vec2::new(100.0, 100.0), 0.0), TruckTuning::default()),
            mission: Mission::with_stops(
                Archetype::Standard,
                stops,
                120.0,
                Rect::new(500.0, 500.0, 50.0, 50.0),
                MissionTuning::default(),
            )
            .expect("valid route"),
            marks: CrushMarks::with_capacity(4),
            tuning: EncounterTuning::default(),
            rng: SmallRng::seed_from_u64(11),
        }
    }

    fn pedestrian_at(x: f32) -> EncounterActor {
        EncounterActor::new(
            ActorId(1),
            Category::Pedestrian,
            Vec2::new(x, 100.0),
            Vec2::ZERO,
            Behaviour::Wander { turn_timer: 1.0 },
        )
    }

    fn car_at(x: f32) -> EncounterActor {
        EncounterActor::new(
            ActorId(2),
            Category::Traffic,
            Vec2::new(x, 100.0),
            Vec2::new(0.0, 40.0),
            Behaviour::Cruise {
                axis: Axis::Vertical,
            },
        )
    }

    #[rstest]
    fn fast_traffic_hit_crushes_once(mut scene: Scene) {
        scene.truck.set_speed(150.0);
        let mut car = car_at(130.0);
        let first = resolve_actor_contact(
            &mut car,
            &mut scene.truck,
            &mut scene.mission,
            &mut scene.marks,
            &scene.tuning,
            &mut scene.rng,
        );
        assert!(matches!(first, ContactOutcome::Crushed { score_delta: 100, .. }));
        let second = resolve_actor_contact(
            &mut car,
            &mut scene.truck,
            &mut scene.mission,
            &mut scene.marks,
            &scene.tuning,
            &mut scene.rng,
        );
        assert_eq!(second, ContactOutcome::Ignored);
        assert!(car.is_crushed());
        assert_eq!(scene.mission.crush_tally().count(Category::Traffic), 1);
        assert_eq!(scene.mission.crush_score(), 100);
    }

    #[rstest]
    fn slow_traffic_hit_is_a_bump(mut scene: Scene) {
        scene.truck.set_speed(60.0);
        let mut car = car_at(130.0);
        let outcome = resolve_actor_contact(
            &mut car,
            &mut scene.truck,
            &mut scene.mission,
            &mut scene.marks,
            &scene.tuning,
            &mut scene.rng,
        );
        assert_eq!(outcome, ContactOutcome::Bumped);
        assert!(!car.is_crushed());
        assert!(car.velocity().x > 0.0);
        assert!((car.velocity().length() - 120.0).abs() < 1e-3);
        assert_eq!(scene.mission.crush_score(), 0);
    }

    #[rstest]
    fn slow_pedestrian_hit_flees_without_scoring(mut scene: Scene) {
        scene.truck.set_speed(60.0);
        let mut walker = pedestrian_at(120.0);
        let outcome = resolve_actor_contact(
            &mut walker,
            &mut scene.truck,
            &mut scene.mission,
            &mut scene.marks,
            &scene.tuning,
            &mut scene.rng,
        );
        assert_eq!(outcome, ContactOutcome::Fled);
        assert!(!walker.is_crushed());
        assert!(walker.velocity().x > 0.0);
        assert!(scene.mission.crush_tally().is_empty());
    }

    #[rstest]
    fn airborne_truck_cannot_crush_pedestrians(mut scene: Scene) {
        scene.truck.set_speed(250.0);
        assert!(scene.truck.start_jump());
        let mut walker = pedestrian_at(120.0);
        let outcome = resolve_actor_contact(
            &mut walker,
            &mut scene.truck,
            &mut scene.mission,
            &mut scene.marks,
            &scene.tuning,
            &mut scene.rng,
        );
        assert_eq!(outcome, ContactOutcome::Fled);
    }

    #[rstest]
    fn squirrel_crush_costs_points_and_leaves_marks(mut scene: Scene) {
        scene.truck.set_speed(100.0);
        let mut squirrel = EncounterActor::stationary(
            ActorId(3),
            Category::Squirrel,
            Vec2::new(110.0, 100.0),
        );
        let outcome = resolve_actor_contact(
            &mut squirrel,
            &mut scene.truck,
            &mut scene.mission,
            &mut scene.marks,
            &scene.tuning,
            &mut scene.rng,
        );
        assert!(matches!(outcome, ContactOutcome::Crushed { score_delta: -50, .. }));
        assert_eq!(scene.mission.crush_score(), -50);
        assert_eq!(scene.marks.decal_count(), 1);
        assert_eq!(scene.marks.debris().count(), 1);
        assert!((scene.truck.blood() - 0.25).abs() < 1e-6);
    }

    #[rstest]
    fn obstacle_hits_are_skipped_while_airborne(mut scene: Scene) {
        scene.truck.set_speed(200.0);
        assert!(scene.truck.start_jump());
        assert_eq!(
            resolve_obstacle_contact(&mut scene.truck, &mut scene.mission),
            ObstacleOutcome::Suppressed
        );
        assert_eq!(scene.mission.collisions(), 0);
    }

    #[rstest]
    fn obstacle_hit_scrubs_and_counts(mut scene: Scene) {
        scene.truck.set_speed(200.0);
        assert_eq!(
            resolve_obstacle_contact(&mut scene.truck, &mut scene.mission),
            ObstacleOutcome::Collided
        );
        assert_eq!(scene.mission.collisions(), 1);
        assert!((scene.truck.speed() - 60.0).abs() < 1e-3);
    }

    #[rstest]
    fn marks_ring_buffer_drops_oldest() {
        let mut marks = CrushMarks::with_capacity(2);
        for x in 0..3_u8 {
            marks.add_decal(Decal {
                position: Vec2::new(f32::from(x), 0.0),
                rotation: 0.0,
                category: Category::Pedestrian,
            });
        }
        let xs: Vec<f32> = marks.decals().map(|d| d.position.x).collect();
        assert_eq!(xs, vec![1.0, 2.0]);
    }
}

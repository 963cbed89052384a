//! Encounter actors: traffic, pedestrians and wildlife.
//!
//! Every actor is the same plain struct carrying a [`Category`] tag and a
//! [`Behaviour`] strategy. Thresholds, scores and flee speeds come from the
//! category, so resolution is a single dispatch over the tag.
pub mod actor;
pub mod resolution;

use std::fmt;
use std::ops::RangeInclusive;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::tuning::EncounterTuning;

pub use actor::{ActorId, CrushFade, EncounterActor, TrafficKind};
pub use resolution::{
    resolve_actor_contact, resolve_obstacle_contact, ContactOutcome, CrushMarks, Decal,
    DebrisBurst, ObstacleOutcome,
};

/// Kind of actor the truck can run into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Cars, vans and buses cruising along a lane.
    Traffic,
    /// A person on foot.
    Pedestrian,
    /// A pedestrian carrying a flag; worth more.
    FlagCarrier,
    /// A wheelchair user; slower and worth more again.
    Wheelchair,
    /// Wildlife. Crushing it costs points.
    Squirrel,
}

/// Per-category constants resolved against the active tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProfile {
    /// Minimum absolute truck speed that destroys the actor.
    pub lethal_speed: f32,
    /// Signed score applied to the mission's crush total.
    pub score_delta: i64,
    /// Idle movement speed.
    pub wander_speed: RangeInclusive<f32>,
    /// Speed after a non-lethal hit.
    pub flee_speed: RangeInclusive<f32>,
    /// Random spread, in radians, added to the flee heading.
    pub flee_jitter: f32,
}

impl Category {
    /// Every category, in tally order.
    pub const ALL: [Self; 5] = [
        Self::Traffic,
        Self::Pedestrian,
        Self::FlagCarrier,
        Self::Wheelchair,
        Self::Squirrel,
    ];

    /// Resolves the category's thresholds and scores from `tuning`.
    #[must_use]
    pub fn profile(self, tuning: &EncounterTuning) -> CategoryProfile {
        match self {
            Self::Traffic => CategoryProfile {
                lethal_speed: tuning.traffic_lethal_speed,
                score_delta: tuning.traffic_crush_bonus,
                wander_speed: 30.0..=60.0,
                flee_speed: tuning.traffic_bump_speed..=tuning.traffic_bump_speed,
                flee_jitter: 0.0,
            },
            Self::Pedestrian => CategoryProfile {
                lethal_speed: tuning.pedestrian_lethal_speed,
                score_delta: tuning.pedestrian_crush_score,
                wander_speed: 45.0..=70.0,
                flee_speed: 85.0..=120.0,
                flee_jitter: 0.5,
            },
            Self::FlagCarrier => CategoryProfile {
                lethal_speed: tuning.flag_carrier_lethal_speed,
                score_delta: tuning.flag_carrier_crush_score,
                wander_speed: 45.0..=70.0,
                flee_speed: 85.0..=120.0,
                flee_jitter: 0.5,
            },
            Self::Wheelchair => CategoryProfile {
                lethal_speed: tuning.wheelchair_lethal_speed,
                score_delta: tuning.wheelchair_crush_score,
                wander_speed: 35.0..=55.0,
                flee_speed: 70.0..=95.0,
                flee_jitter: 0.5,
            },
            Self::Squirrel => CategoryProfile {
                lethal_speed: tuning.squirrel_lethal_speed,
                score_delta: tuning.squirrel_crush_score,
                wander_speed: 55.0..=95.0,
                flee_speed: 90.0..=140.0,
                flee_jitter: 0.45,
            },
        }
    }

    /// Seconds between random heading changes while wandering.
    #[must_use]
    pub const fn turn_interval(self) -> RangeInclusive<f32> {
        match self {
            Self::Squirrel => 0.8..=2.2,
            _ => 0.9..=2.4,
        }
    }

    /// Footprint of a pedestrian or animal; traffic sizes come from
    /// [`TrafficKind`].
    #[must_use]
    pub const fn footprint(self) -> (f32, f32) {
        match self {
            Self::Traffic => (28.0, 40.0),
            Self::Wheelchair => (20.0, 20.0),
            Self::Squirrel => (14.0, 10.0),
            Self::Pedestrian | Self::FlagCarrier => (14.0, 14.0),
        }
    }

    /// `true` for animals.
    #[must_use]
    pub const fn is_wildlife(self) -> bool {
        matches!(self, Self::Squirrel)
    }

    /// `true` for traffic vehicles.
    #[must_use]
    pub const fn is_traffic(self) -> bool {
        matches!(self, Self::Traffic)
    }

    /// Lower-case name used in logs and the HUD.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Traffic => "traffic",
            Self::Pedestrian => "pedestrian",
            Self::FlagCarrier => "flag carrier",
            Self::Wheelchair => "wheelchair user",
            Self::Squirrel => "squirrel",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which map axis a traffic vehicle drives along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Along x.
    Horizontal,
    /// Along y.
    Vertical,
}

/// Movement strategy attached to an actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behaviour {
    /// Random walk that re-rolls its heading when `turn_timer` runs out and
    /// bounces off the map edge.
    Wander {
        /// Seconds until the next heading change.
        turn_timer: f32,
    },
    /// Constant-velocity travel along one axis, wrapping past the map edge.
    Cruise {
        /// Lane direction.
        axis: Axis,
    },
    /// Never moves.
    Static,
}

/// Running count of crushed actors per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrushTally {
    counts: HashMap<Category, u32>,
}

impl CrushTally {
    /// Adds one crush of `category`.
    pub fn record(&mut self, category: Category) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    /// Crushes recorded for `category`.
    #[must_use]
    pub fn count(&self, category: Category) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Crushes across every category.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// `true` before the first crush.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Non-zero counts in category order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Category, u32)> {
        Category::ALL
            .into_iter()
            .filter_map(|category| {
                let count = self.count(category);
                (count > 0).then_some((category, count))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Category::Traffic, 100.0, 100)]
    #[case(Category::Pedestrian, 120.0, 25)]
    #[case(Category::FlagCarrier, 130.0, 50)]
    #[case(Category::Wheelchair, 140.0, 75)]
    #[case(Category::Squirrel, 90.0, -50)]
    fn default_profiles(#[case] category: Category, #[case] lethal: f32, #[case] score: i64) {
        let profile = category.profile(&EncounterTuning::default());
        assert!((profile.lethal_speed - lethal).abs() < f32::EPSILON);
        assert_eq!(profile.score_delta, score);
    }

    #[rstest]
    fn tally_counts_per_category() {
        let mut tally = CrushTally::default();
        tally.record(Category::Squirrel);
        tally.record(Category::Pedestrian);
        tally.record(Category::Squirrel);
        assert_eq!(tally.count(Category::Squirrel), 2);
        assert_eq!(tally.count(Category::Traffic), 0);
        assert_eq!(tally.total(), 3);
        assert_eq!(
            tally.entries(),
            vec![(Category::Pedestrian, 1), (Category::Squirrel, 2)]
        );
    }
}

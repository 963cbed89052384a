//! Mission templates: stop sequence, time budget and eligible bonuses.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::level::LevelDescriptor;
use crate::tuning::MissionTuning;

use super::{Stop, StopKind};

/// Named mission template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// Pick up at the level's pickup zone, deliver to its delivery zone.
    #[default]
    Standard,
    /// Fixed A→B sprint on a short clock; the speed bonus always applies.
    TimeTrial,
    /// Standard route with a bonus for at most one collision.
    Careful,
    /// Four alternating pickups and drops across the route zones.
    MultiStop,
    /// Single parking stop in the delivery zone.
    Parking,
}

impl Archetype {
    /// Every archetype, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Standard,
        Self::TimeTrial,
        Self::Careful,
        Self::MultiStop,
        Self::Parking,
    ];

    /// Title shown on the HUD and score table.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Standard => "Standard Delivery",
            Self::TimeTrial => "Time Trial",
            Self::Careful => "Careful Delivery",
            Self::MultiStop => "Multi-Stop Route",
            Self::Parking => "Precision Parking",
        }
    }

    /// One-line briefing.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Standard => "Pick up and deliver cargo",
            Self::TimeTrial => "Deliver as fast as possible!",
            Self::Careful => "Fragile cargo - avoid collisions!",
            Self::MultiStop => "Complete all deliveries",
            Self::Parking => "Park perfectly in the zone",
        }
    }

    /// Seconds on the clock at mission start.
    #[must_use]
    pub const fn time_limit(self, tuning: &MissionTuning) -> f32 {
        match self {
            Self::TimeTrial => tuning.time_trial_limit,
            Self::MultiStop => tuning.multi_stop_limit,
            Self::Standard | Self::Careful | Self::Parking => tuning.time_limit,
        }
    }

    /// Builds the ordered stop list for `level`.
    #[must_use]
    pub fn route(self, level: &LevelDescriptor) -> Vec<Stop> {
        let zones = &level.route_zones;
        match self {
            Self::Standard | Self::Careful => vec![
                Stop::new(level.pickup_zone, StopKind::Pickup, "PICKUP"),
                Stop::new(level.delivery_zone, StopKind::Delivery, "DELIVERY"),
            ],
            Self::TimeTrial => vec![
                Stop::new(zones.a, StopKind::Pickup, "START"),
                Stop::new(zones.b, StopKind::Delivery, "FINISH"),
            ],
            Self::MultiStop => vec![
                Stop::new(zones.a, StopKind::Pickup, "PICKUP 1"),
                Stop::new(zones.c, StopKind::Delivery, "DROP 1"),
                Stop::new(zones.d, StopKind::Pickup, "PICKUP 2"),
                Stop::new(zones.b, StopKind::Delivery, "DROP 2"),
            ],
            Self::Parking => vec![Stop::new(level.delivery_zone, StopKind::Park, "PARKING")],
        }
    }

    /// Machine name used on the command line and in descriptors.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::TimeTrial => "time_trial",
            Self::Careful => "careful",
            Self::MultiStop => "multi_stop",
            Self::Parking => "parking",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Archetype {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|archetype| archetype.key() == key || archetype.key().replace('_', "") == key)
            .ok_or_else(|| ConfigError::UnknownArchetype(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level;
    use rstest::rstest;

    #[rstest]
    #[case("standard", Archetype::Standard)]
    #[case("time-trial", Archetype::TimeTrial)]
    #[case("TIME_TRIAL", Archetype::TimeTrial)]
    #[case("multistop", Archetype::MultiStop)]
    #[case(" parking ", Archetype::Parking)]
    fn parses_names(#[case] input: &str, #[case] expected: Archetype) {
        assert_eq!(input.parse::<Archetype>().expect("known archetype"), expected);
    }

    #[rstest]
    fn rejects_unknown_names() {
        assert!(matches!(
            "demolition".parse::<Archetype>(),
            Err(ConfigError::UnknownArchetype(name)) if name == "demolition"
        ));
    }

    #[rstest]
    #[case(Archetype::Standard, 120.0)]
    #[case(Archetype::TimeTrial, 90.0)]
    #[case(Archetype::Careful, 120.0)]
    #[case(Archetype::MultiStop, 180.0)]
    #[case(Archetype::Parking, 120.0)]
    fn time_budgets(#[case] archetype: Archetype, #[case] limit: f32) {
        let budget = archetype.time_limit(&MissionTuning::default());
        assert!((budget - limit).abs() < f32::EPSILON);
    }

    #[rstest]
    fn multi_stop_alternates_pickup_and_delivery() {
        let level = level::builtin("LEVEL_1").expect("builtin level");
        let kinds: Vec<StopKind> = Archetype::MultiStop
            .route(&level)
            .iter()
            .map(Stop::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                StopKind::Pickup,
                StopKind::Delivery,
                StopKind::Pickup,
                StopKind::Delivery
            ]
        );
    }

    #[rstest]
    fn parking_uses_the_delivery_zone() {
        let level = level::builtin("LEVEL_2").expect("builtin level");
        let route = Archetype::Parking.route(&level);
        assert_eq!(route.len(), 1);
        assert_eq!(route.first().map(Stop::zone), Some(level.delivery_zone));
    }
}

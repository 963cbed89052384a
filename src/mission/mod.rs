//! Mission engine.
//!
//! A mission walks an ordered list of [`Stop`]s against a countdown. It is a
//! two-state machine: `Active` until either the last stop is reached or the
//! clock runs out, then `Completed` for good. Every mutator is a no-op once
//! completed, so racing completion paths within one frame are harmless.
pub mod archetype;
pub mod score;

use glam::Vec2;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::encounter::{Category, CrushTally};
use crate::error::ConfigError;
use crate::geometry::Rect;
use crate::level::LevelDescriptor;
use crate::tuning::MissionTuning;

pub use archetype::Archetype;
pub use score::{compute_score, Bonus, MissionResult, ScoreCard, ScoreInput};

/// What the truck must do at a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    /// Load cargo; no cargo required.
    Pickup,
    /// Drop cargo; requires cargo on board.
    Delivery,
    /// Stop inside the zone; no cargo involved.
    Park,
}

/// One waypoint of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    zone: Rect,
    kind: StopKind,
    label: String,
}

impl Stop {
    /// Stop covering `zone`.
    #[must_use]
    pub fn new(zone: Rect, kind: StopKind, label: impl Into<String>) -> Self {
        Self {
            zone,
            kind,
            label: label.into(),
        }
    }

    /// Zone the truck must overlap.
    #[must_use]
    pub const fn zone(&self) -> Rect {
        self.zone
    }

    /// Kind of stop.
    #[must_use]
    pub const fn kind(&self) -> StopKind {
        self.kind
    }

    /// HUD label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// HUD objective for this stop.
    #[must_use]
    pub fn objective(&self) -> String {
        match self.kind {
            StopKind::Pickup => format!("Go to {}", self.label),
            StopKind::Delivery => format!("Deliver to {}", self.label),
            StopKind::Park => format!("Park in {}", self.label),
        }
    }
}

/// Lifecycle of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionPhase {
    /// Clock running, stops pending.
    Active,
    /// Terminal; nothing changes afterwards.
    Completed {
        /// `false` when the clock ran out.
        success: bool,
    },
}

/// What a delivery/park check achieved.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    /// No qualifying overlap this frame.
    NotReached,
    /// An intermediate stop was passed.
    StopCompleted {
        /// The new current stop index.
        next: usize,
    },
    /// The final stop was reached.
    Finished(Box<MissionResult>),
}

/// Live mission state.
#[derive(Debug, Clone)]
pub struct Mission {
    archetype: Archetype,
    stops: Vec<Stop>,
    current: usize,
    time_limit: f32,
    time_remaining: f32,
    cargo_carried: bool,
    collisions: u32,
    perfect: bool,
    crush_tally: CrushTally,
    crush_score: i64,
    phase: MissionPhase,
    result: Option<MissionResult>,
    finish_zone: Rect,
    tuning: MissionTuning,
}

impl Mission {
    /// Builds `archetype`'s route on `level`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the route is empty or a stop zone is
    /// degenerate.
    pub fn new(
        archetype: Archetype,
        level: &LevelDescriptor,
        tuning: MissionTuning,
    ) -> Result<Self, ConfigError> {
        let limit = archetype.time_limit(&tuning);
        Self::with_stops(
            archetype,
            archetype.route(level),
            limit,
            level.delivery_zone,
            tuning,
        )
    }

    /// Builds a mission over an explicit route. `finish_zone` is the HUD
    /// target once every stop is done.
    ///
    /// # Errors
    /// Returns [`ConfigError::EmptyRoute`] for an empty stop list,
    /// [`ConfigError::DegenerateRect`] for a stop zone without area and
    /// [`ConfigError::InvalidTuning`] for a non-positive time limit.
    pub fn with_stops(
        archetype: Archetype,
        stops: Vec<Stop>,
        time_limit: f32,
        finish_zone: Rect,
        tuning: MissionTuning,
    ) -> Result<Self, ConfigError> {
        if stops.is_empty() {
            return Err(ConfigError::EmptyRoute {
                mission: archetype.display_name().to_owned(),
            });
        }
        if let Some(stop) = stops.iter().find(|stop| stop.zone.is_degenerate()) {
            return Err(ConfigError::degenerate(
                format!("stop `{}`", stop.label),
                stop.zone.width,
                stop.zone.height,
            ));
        }
        if !(time_limit.is_finite() && time_limit > 0.0) {
            return Err(ConfigError::InvalidTuning {
                field: "mission.time_limit",
                reason: "must be positive",
            });
        }

        info!(
            "mission `{}` started: {} stops, {time_limit:.0}s",
            archetype.display_name(),
            stops.len()
        );
        Ok(Self {
            archetype,
            stops,
            current: 0,
            time_limit,
            time_remaining: time_limit,
            cargo_carried: false,
            collisions: 0,
            perfect: true,
            crush_tally: CrushTally::default(),
            crush_score: 0,
            phase: MissionPhase::Active,
            result: None,
            finish_zone,
            tuning,
        })
    }

    /// Runs the clock. Returns the terminal record if time ran out during
    /// this call.
    pub fn update(&mut self, dt: f32) -> Option<MissionResult> {
        if !self.is_active() {
            return None;
        }
        self.time_remaining = (self.time_remaining - dt.max(0.0)).max(0.0);
        if self.time_remaining <= 0.0 {
            info!("mission `{}` timed out", self.archetype.display_name());
            return self.complete(false);
        }
        None
    }

    /// Collects cargo when the current stop is a pickup and `truck_bounds`
    /// overlaps it.
    pub fn check_pickup_zone(&mut self, truck_bounds: &Rect) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(stop) = self.current_stop() else {
            return false;
        };
        if stop.kind != StopKind::Pickup || !truck_bounds.overlaps(&stop.zone) {
            return false;
        }
        debug!("picked up cargo at {}", stop.label);
        self.cargo_carried = true;
        self.current += 1;
        true
    }

    /// Advances a delivery or park stop when `truck_bounds` overlaps it.
    /// Deliveries additionally require cargo on board.
    pub fn check_delivery_zone(&mut self, truck_bounds: &Rect) -> DeliveryOutcome {
        if !self.is_active() {
            return DeliveryOutcome::NotReached;
        }
        let Some(stop) = self.current_stop() else {
            return DeliveryOutcome::NotReached;
        };
        let eligible = match stop.kind {
            StopKind::Pickup => false,
            StopKind::Delivery => self.cargo_carried,
            StopKind::Park => true,
        };
        if !eligible || !truck_bounds.overlaps(&stop.zone) {
            return DeliveryOutcome::NotReached;
        }

        debug!("reached {}", stop.label);
        self.current += 1;
        if self.current >= self.stops.len() {
            return self
                .complete(true)
                .map_or(DeliveryOutcome::NotReached, |record| {
                    DeliveryOutcome::Finished(Box::new(record))
                });
        }
        self.cargo_carried = false;
        DeliveryOutcome::StopCompleted { next: self.current }
    }

    /// Counts an obstacle hit and forfeits the perfect-delivery bonus.
    /// Returns the running total.
    pub fn register_collision(&mut self) -> u32 {
        if self.is_active() {
            self.collisions += 1;
            self.perfect = false;
        }
        self.collisions
    }

    /// Tallies a crush and applies its signed score delta.
    pub fn register_crush(&mut self, category: Category, score_delta: i64) {
        if !self.is_active() {
            return;
        }
        self.crush_tally.record(category);
        self.crush_score += score_delta;
    }

    /// Ends the mission. Only the first call has any effect; it returns the
    /// terminal record.
    pub fn complete(&mut self, success: bool) -> Option<MissionResult> {
        if !self.is_active() {
            return None;
        }
        self.phase = MissionPhase::Completed { success };
        let record = self.build_result(success);
        info!(
            "mission `{}` ended: success={success} score={}",
            record.mission_name, record.score
        );
        self.result = Some(record.clone());
        Some(record)
    }

    fn build_result(&self, success: bool) -> MissionResult {
        let elapsed = self.time_limit - self.time_remaining;
        let (score, bonuses) = if success {
            let card = compute_score(
                &ScoreInput {
                    archetype: self.archetype,
                    time_remaining: self.time_remaining,
                    elapsed,
                    collisions: self.collisions,
                    crush_score: self.crush_score,
                },
                &self.tuning,
            );
            (card.total, card.bonuses)
        } else {
            (0, Vec::new())
        };

        MissionResult {
            success,
            score,
            time_remaining: self.time_remaining,
            elapsed,
            collisions: self.collisions,
            archetype: self.archetype,
            mission_name: self.archetype.display_name(),
            route: self.route_label(),
            bonuses,
            perfect_delivery: success && self.perfect && self.collisions == 0,
            crush_score: self.crush_score,
            crush_tally: self.crush_tally.entries(),
        }
    }

    fn route_label(&self) -> String {
        self.stops
            .iter()
            .map(Stop::label)
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// Stop the truck is heading for; `None` once all are done.
    #[must_use]
    pub fn current_stop(&self) -> Option<&Stop> {
        self.stops.get(self.current)
    }

    /// Index of the current stop.
    #[must_use]
    pub const fn current_stop_index(&self) -> usize {
        self.current
    }

    /// The full route.
    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// HUD objective line.
    #[must_use]
    pub fn objective(&self) -> String {
        self.current_stop()
            .map_or_else(|| "Mission Complete!".to_owned(), Stop::objective)
    }

    /// HUD progress line, e.g. `"1 / 2"`.
    #[must_use]
    pub fn progress(&self) -> String {
        format!("{} / {}", self.current.min(self.stops.len()), self.stops.len())
    }

    /// Centre of the zone the player should head to.
    #[must_use]
    pub fn target_position(&self) -> Vec2 {
        self.current_stop()
            .map_or_else(|| self.finish_zone.center(), |stop| stop.zone.center())
    }

    /// Template this mission was built from.
    #[must_use]
    pub const fn archetype(&self) -> Archetype {
        self.archetype
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.archetype.display_name()
    }

    /// Briefing line.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.archetype.description()
    }

    /// Budget at mission start.
    #[must_use]
    pub const fn time_limit(&self) -> f32 {
        self.time_limit
    }

    /// Seconds left, never negative.
    #[must_use]
    pub const fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    /// `true` between a pickup and its delivery.
    #[must_use]
    pub const fn cargo_carried(&self) -> bool {
        self.cargo_carried
    }

    /// Obstacle hits so far.
    #[must_use]
    pub const fn collisions(&self) -> u32 {
        self.collisions
    }

    /// `true` while no collision has been recorded.
    #[must_use]
    pub const fn is_perfect(&self) -> bool {
        self.perfect
    }

    /// Crushes per category.
    #[must_use]
    pub const fn crush_tally(&self) -> &CrushTally {
        &self.crush_tally
    }

    /// Running crush score, folded into the final score only on success.
    #[must_use]
    pub const fn crush_score(&self) -> i64 {
        self.crush_score
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> MissionPhase {
        self.phase
    }

    /// `true` until completion or timeout.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.phase, MissionPhase::Active)
    }

    /// Terminal record, once completed.
    #[must_use]
    pub const fn result(&self) -> Option<&MissionResult> {
        self.result.as_ref()
    }
}

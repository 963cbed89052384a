//! Final score composition and the terminal mission record.
use serde::Serialize;

use crate::encounter::Category;
use crate::numeric::floor_to_i64;
use crate::tuning::MissionTuning;

use super::Archetype;

/// One itemised line on the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bonus {
    /// Label, e.g. `Speed Bonus`.
    pub name: &'static str,
    /// Points awarded.
    pub points: i64,
}

impl Bonus {
    const fn new(name: &'static str, points: i64) -> Self {
        Self { name, points }
    }
}

/// Everything the score depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInput {
    /// Template being scored.
    pub archetype: Archetype,
    /// Seconds left at completion.
    pub time_remaining: f32,
    /// Seconds taken.
    pub elapsed: f32,
    /// Obstacle hits.
    pub collisions: u32,
    /// Running crush score.
    pub crush_score: i64,
}

/// Score breakdown for a successful mission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    /// Final score, never negative.
    pub total: i64,
    /// Bonus lines in award order.
    pub bonuses: Vec<Bonus>,
}

/// Composes the final score for a successful run.
///
/// The base is remaining time in points minus collision penalties, floored at
/// zero. Bonuses are applied in a fixed order because the careful bonus is a
/// share of everything before it.
///
/// # Examples
/// ```
/// use haulage::mission::{compute_score, Archetype, ScoreInput};
/// use haulage::tuning::MissionTuning;
///
/// let card = compute_score(
///     &ScoreInput {
///         archetype: Archetype::Standard,
///         time_remaining: 60.0,
///         elapsed: 60.0,
///         collisions: 0,
///         crush_score: 0,
///     },
///     &MissionTuning::default(),
/// );
/// assert_eq!(card.total, 600 + 300 + 500);
/// ```
#[must_use]
pub fn compute_score(input: &ScoreInput, tuning: &MissionTuning) -> ScoreCard {
    let collisions = i64::from(input.collisions);
    let base = floor_to_i64(input.time_remaining * tuning.points_per_second)
        - collisions * tuning.collision_penalty;
    let mut total = base.max(0);
    let mut bonuses = Vec::new();

    if input.archetype == Archetype::TimeTrial || input.elapsed < tuning.speed_bonus_threshold {
        let speed = floor_to_i64(input.time_remaining * tuning.speed_bonus_per_second);
        total += speed;
        bonuses.push(Bonus::new("Speed Bonus", speed));
    }

    if input.collisions == 0 {
        total += tuning.perfect_delivery_bonus;
        bonuses.push(Bonus::new("Perfect Delivery!", tuning.perfect_delivery_bonus));
    }

    if input.archetype == Archetype::Careful && input.collisions <= tuning.careful_max_collisions {
        let careful = floor_share(total, tuning.careful_bonus_ratio);
        total += careful;
        bonuses.push(Bonus::new("Careful Driver", careful));
    }

    if input.archetype == Archetype::MultiStop {
        total += tuning.multi_stop_bonus;
        bonuses.push(Bonus::new("Multi-Stop Complete", tuning.multi_stop_bonus));
    }

    if input.crush_score != 0 {
        total += input.crush_score;
        let name = if input.crush_score > 0 {
            "Crush Bonus"
        } else {
            "Crush Malus"
        };
        bonuses.push(Bonus::new(name, input.crush_score));
    }

    ScoreCard {
        total: total.max(0),
        bonuses,
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "Scores stay far below 2^24 so the f32 product is exact enough."
)]
fn floor_share(total: i64, ratio: f32) -> i64 {
    floor_to_i64(total as f32 * ratio)
}

/// Terminal record handed to presentation when a mission ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionResult {
    /// `false` on timeout.
    pub success: bool,
    /// Final score; zero on failure.
    pub score: i64,
    /// Seconds left on the clock.
    pub time_remaining: f32,
    /// Seconds taken.
    pub elapsed: f32,
    /// Obstacle hits.
    pub collisions: u32,
    /// Template played.
    pub archetype: Archetype,
    /// Display name of the archetype.
    pub mission_name: &'static str,
    /// Stop labels in route order, joined with `" > "`.
    pub route: String,
    /// Awarded bonuses.
    pub bonuses: Vec<Bonus>,
    /// Succeeded without a single collision.
    pub perfect_delivery: bool,
    /// Crush score accumulated during the run.
    pub crush_score: i64,
    /// Non-zero crush counts in category order.
    pub crush_tally: Vec<(Category, u32)>,
}

impl MissionResult {
    /// Sum of the itemised bonus lines.
    #[must_use]
    pub fn bonus_total(&self) -> i64 {
        self.bonuses.iter().map(|bonus| bonus.points).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn tuning() -> MissionTuning {
        MissionTuning::default()
    }

    fn input(archetype: Archetype, remaining: f32, collisions: u32, crush: i64) -> ScoreInput {
        ScoreInput {
            archetype,
            time_remaining: remaining,
            elapsed: archetype.time_limit(&MissionTuning::default()) - remaining,
            collisions,
            crush_score: crush,
        }
    }

    fn names(card: &ScoreCard) -> Vec<&'static str> {
        card.bonuses.iter().map(|b| b.name).collect()
    }

    #[rstest]
    fn perfect_fast_standard_run(tuning: MissionTuning) {
        let card = compute_score(&input(Archetype::Standard, 50.5, 0, 0), &tuning);
        assert_eq!(card.total, 505 + 252 + 500);
        assert_eq!(names(&card), vec!["Speed Bonus", "Perfect Delivery!"]);
    }

    #[rstest]
    fn slow_standard_run_gets_no_speed_bonus(tuning: MissionTuning) {
        let card = compute_score(&input(Archetype::Standard, 20.0, 0, 0), &tuning);
        assert_eq!(card.total, 200 + 500);
    }

    #[rstest]
    fn collisions_cost_points_and_perfection(tuning: MissionTuning) {
        let card = compute_score(&input(Archetype::Standard, 20.0, 3, 0), &tuning);
        assert_eq!(card.total, 50);
        assert!(card.bonuses.is_empty());
    }

    #[rstest]
    fn base_is_floored_at_zero(tuning: MissionTuning) {
        let card = compute_score(&input(Archetype::Standard, 5.0, 4, 0), &tuning);
        assert_eq!(card.total, 0);
    }

    #[rstest]
    fn time_trial_always_gets_speed_bonus(tuning: MissionTuning) {
        let card = compute_score(&input(Archetype::TimeTrial, 2.0, 1, 0), &tuning);
        assert_eq!(card.total, 10);
        assert_eq!(names(&card), vec!["Speed Bonus"]);
    }

    #[rstest]
    fn careful_bonus_is_half_of_the_running_total(tuning: MissionTuning) {
        let card = compute_score(&input(Archetype::Careful, 20.0, 1, 0), &tuning);
        assert_eq!(card.total, 150 + 75);
        let careful = compute_score(&input(Archetype::Careful, 20.0, 2, 0), &tuning);
        assert_eq!(careful.total, 100);
    }

    #[rstest]
    fn multi_stop_completion_bonus(tuning: MissionTuning) {
        let card = compute_score(&input(Archetype::MultiStop, 10.0, 2, 0), &tuning);
        assert_eq!(card.total, 1000);
        assert_eq!(names(&card), vec!["Multi-Stop Complete"]);
    }

    #[rstest]
    #[case(75, "Crush Bonus")]
    #[case(-50, "Crush Malus")]
    fn crush_total_is_itemised_by_sign(tuning: MissionTuning, #[case] crush: i64, #[case] name: &str) {
        let card = compute_score(&input(Archetype::Standard, 20.0, 1, crush), &tuning);
        assert_eq!(card.total, 150 + crush);
        assert_eq!(names(&card), vec![name]);
    }

    #[rstest]
    fn large_malus_cannot_go_negative(tuning: MissionTuning) {
        let card = compute_score(&input(Archetype::Standard, 1.0, 1, -500), &tuning);
        assert_eq!(card.total, 0);
    }
}

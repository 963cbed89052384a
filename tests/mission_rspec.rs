//! Behaviour-driven tests using rust-rspec.
//!
//! A truck driven straight across the open fixture level completes a standard
//! delivery: pickup first, then the drop, then a scored terminal record.

use haulage::mission::MissionPhase;
use haulage::{Archetype, Effect, FrameInput, Simulation};
use test_utils::{drive, open_level, simulation};

mod support;
use support::rspec_runner::run_serial;

#[derive(Clone, Debug)]
struct Run {
    sim: Simulation,
    effects: Vec<Effect>,
}

impl Default for Run {
    fn default() -> Self {
        Self {
            sim: simulation(open_level(), Archetype::Standard),
            effects: Vec::new(),
        }
    }
}

impl Run {
    fn drive_forward(&mut self, seconds: f32) {
        let effects = drive(&mut self.sim, FrameInput::forward(), seconds, 60);
        self.effects.extend(effects);
    }

    fn pickups(&self) -> usize {
        self.effects
            .iter()
            .filter(|effect| matches!(effect, Effect::PickupOccurred { .. }))
            .count()
    }

    fn ended(&self) -> Option<&Effect> {
        self.effects
            .iter()
            .find(|effect| matches!(effect, Effect::MissionEnded(_)))
    }
}

#[test]
fn straight_run_delivers_cargo() {
    run_serial(&rspec::given(
        "a standard mission on an open level",
        Run::default(),
        |ctx| {
            ctx.then("the HUD points at the pickup", |run| {
                let hud = run.sim.hud();
                assert_eq!(hud.objective, "Go to PICKUP");
                assert_eq!(hud.progress, "0 / 2");
            });

            ctx.when("the truck drives forward for two seconds", |ctx| {
                ctx.before_each(|run| run.drive_forward(2.0));

                ctx.then("cargo is collected exactly once", |run| {
                    assert_eq!(run.pickups(), 1);
                    assert!(run.sim.mission().cargo_carried());
                    assert_eq!(run.sim.hud().objective, "Deliver to DELIVERY");
                });

                ctx.then("the mission is still running", |run| {
                    assert!(run.sim.mission().is_active());
                    assert!(run.ended().is_none());
                });
            });

            ctx.when("the truck drives forward for five seconds", |ctx| {
                ctx.before_each(|run| run.drive_forward(5.0));

                ctx.then("the mission ends successfully with a perfect score", |run| {
                    let Some(Effect::MissionEnded(record)) = run.ended() else {
                        panic!("mission should have ended");
                    };
                    assert!(record.success);
                    assert!(record.perfect_delivery);
                    assert_eq!(record.collisions, 0);
                    assert_eq!(record.route, "PICKUP > DELIVERY");
                    let names: Vec<_> = record.bonuses.iter().map(|bonus| bonus.name).collect();
                    assert_eq!(names, vec!["Speed Bonus", "Perfect Delivery!"]);
                    let base = (record.time_remaining * 10.0).floor() as i64;
                    assert_eq!(record.score, base + record.bonus_total());
                });

                ctx.then("the mission reports completion", |run| {
                    assert_eq!(
                        run.sim.mission().phase(),
                        MissionPhase::Completed { success: true }
                    );
                    assert_eq!(run.sim.hud().objective, "Mission Complete!");
                    assert!(run.sim.is_finished());
                });
            });
        },
    ));
}

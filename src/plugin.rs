//! Bevy plugin driving a [`Simulation`] from the app schedule.
//!
//! [`HaulagePlugin`] inserts the run as an [`ActiveRun`] resource; the host
//! writes each frame's controls into [`PendingInput`]. Every [`Effect`]
//! produced by a step is triggered as a [`MissionNotice`] so presentation code
//! can observe it.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{debug, info};

use crate::constants::MAX_FRAME_DELTA;
use crate::input::FrameInput;
use crate::simulation::{Effect, Simulation};

/// The simulation owned by the app.
#[derive(Resource, Debug)]
pub struct ActiveRun(pub Simulation);

/// Controls consumed by the next step. Edge fields are cleared after use.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PendingInput(pub FrameInput);

/// Event carrying one [`Effect`] out of the step system.
#[derive(Event, Debug, Clone)]
pub struct MissionNotice(pub Effect);

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_notice(event: On<MissionNotice>) {
    match &event.event().0 {
        Effect::MissionEnded(result) => info!(
            "mission `{}` ended: success={} score={}",
            result.mission_name, result.success, result.score
        ),
        other => debug!("mission notice: {other:?}"),
    }
}

/// Steps the active run with the clamped frame delta.
pub fn advance_simulation_system(
    time: Res<Time>,
    mut run: ResMut<ActiveRun>,
    mut pending: ResMut<PendingInput>,
    mut commands: Commands,
) {
    let dt = time.delta_secs().min(MAX_FRAME_DELTA);
    let frame = pending.0;
    pending.0 = frame.without_edges();
    for effect in run.0.step_aabb(&frame, dt) {
        commands.trigger(MissionNotice(effect));
    }
}

/// Installs the step system and the notice logger.
///
/// A plugin built with [`HaulagePlugin::with_simulation`] also inserts the
/// run; the default plugin waits for the host to insert an [`ActiveRun`].
#[derive(Default)]
pub struct HaulagePlugin {
    simulation: Option<Simulation>,
}

impl HaulagePlugin {
    /// Plugin that inserts `simulation` as the [`ActiveRun`].
    #[must_use]
    pub const fn with_simulation(simulation: Simulation) -> Self {
        Self {
            simulation: Some(simulation),
        }
    }
}

impl Plugin for HaulagePlugin {
    fn build(&self, app: &mut App) {
        if let Some(simulation) = &self.simulation {
            app.insert_resource(ActiveRun(simulation.clone()));
        }
        app.init_resource::<PendingInput>();
        app.add_observer(log_notice);
        app.add_systems(
            Update,
            advance_simulation_system.run_if(resource_exists::<ActiveRun>),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::builtin;
    use crate::mission::Archetype;
    use crate::tuning::Tuning;
    use rstest::{fixture, rstest};

    #[derive(Resource, Default, Debug)]
    struct SeenNotices(Vec<Effect>);

    #[expect(
        clippy::needless_pass_by_value,
        reason = "Observer systems must take On<T> by value."
    )]
    fn record_notice(event: On<MissionNotice>, mut seen: ResMut<SeenNotices>) {
        seen.0.push(event.event().0.clone());
    }

    fn app_with(plugin: HaulagePlugin) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(plugin);
        app.insert_resource(SeenNotices::default());
        app.world_mut().add_observer(record_notice);
        app
    }

    #[fixture]
    fn app() -> App {
        let level = builtin("LEVEL_1").expect("built-in level");
        let sim = Simulation::new(level, Archetype::Standard, Tuning::default(), 7)
            .expect("valid simulation");
        app_with(HaulagePlugin::with_simulation(sim))
    }

    #[rstest]
    fn plugin_without_run_is_idle() {
        let mut app = app_with(HaulagePlugin::default());
        app.update();
        assert!(!app.world().contains_resource::<ActiveRun>());
        assert!(app.world().contains_resource::<PendingInput>());
        assert!(app.world().resource::<SeenNotices>().0.is_empty());
    }

    #[rstest]
    fn pause_edge_is_consumed_and_announced(mut app: App) {
        app.insert_resource(PendingInput(FrameInput {
            pause: true,
            forward: true,
            ..FrameInput::idle()
        }));
        app.update();

        assert!(app.world().resource::<ActiveRun>().0.is_paused());
        let pending = app.world().resource::<PendingInput>().0;
        assert!(!pending.pause);
        assert!(pending.forward);
        assert_eq!(
            app.world().resource::<SeenNotices>().0,
            vec![Effect::PauseToggled { paused: true }]
        );
    }

    #[rstest]
    fn jump_edge_triggers_notice(mut app: App) {
        app.insert_resource(PendingInput(FrameInput {
            jump: true,
            ..FrameInput::idle()
        }));
        app.update();
        app.update();

        let seen = &app.world().resource::<SeenNotices>().0;
        assert_eq!(
            seen.iter()
                .filter(|effect| matches!(effect, Effect::JumpStarted))
                .count(),
            1
        );
    }
}

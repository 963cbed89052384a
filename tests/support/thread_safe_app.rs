//! Shareable headless app for rspec scenarios that drive `HaulagePlugin`.
//!
//! rspec environments must be `Clone + Send + Sync`, so the Bevy `App` lives
//! behind a mutex. The wrapper also records every `MissionNotice` and offers
//! the handful of operations the plugin scenarios need: pressing controls,
//! ticking frames and reading back the run.

use bevy::ecs::prelude::On;
use bevy::prelude::{App, ResMut, Resource};
use haulage::{ActiveRun, Effect, FrameInput, MissionNotice, PendingInput};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Every notice triggered since the app was wrapped, in order.
#[derive(Resource, Default, Debug)]
pub struct NoticeLog(pub Vec<Effect>);

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record_notice(event: On<MissionNotice>, mut log: ResMut<NoticeLog>) {
    log.0.push(event.event().0.clone());
}

/// Headless app with a notice recorder attached.
#[derive(Debug)]
pub struct ThreadSafeApp(pub App);

impl Deref for ThreadSafeApp {
    type Target = App;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ThreadSafeApp {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// SAFETY: the scenarios run serially and every access goes through the
// mutex in `SharedApp`.
unsafe impl Send for ThreadSafeApp {}
unsafe impl Sync for ThreadSafeApp {}

impl ThreadSafeApp {
    /// Wraps `app` and starts recording its notices.
    pub fn recording(mut app: App) -> Self {
        app.insert_resource(NoticeLog::default());
        app.world_mut().add_observer(record_notice);
        Self(app)
    }

    /// Replaces the controls for the next update.
    pub fn press(&mut self, input: FrameInput) {
        self.world_mut().insert_resource(PendingInput(input));
    }

    /// Runs `frames` app updates.
    pub fn tick(&mut self, frames: usize) {
        for _ in 0..frames {
            self.update();
        }
    }

    /// Notices recorded so far.
    pub fn notices(&self) -> Vec<Effect> {
        self.world()
            .get_resource::<NoticeLog>()
            .map(|log| log.0.clone())
            .unwrap_or_default()
    }

    /// Simulated seconds of the active run, or zero without one.
    pub fn clock(&self) -> f32 {
        self.world()
            .get_resource::<ActiveRun>()
            .map_or(0.0, |run| run.0.clock())
    }

    /// Controls waiting for the next update.
    pub fn pending(&self) -> FrameInput {
        self.world()
            .get_resource::<PendingInput>()
            .map(|pending| pending.0)
            .unwrap_or_default()
    }
}

/// Shared pointer type for the wrapped app.
pub type SharedApp = Arc<Mutex<ThreadSafeApp>>;

/// Wraps `app` for sharing, recording its notices.
pub fn share(app: App) -> SharedApp {
    Arc::new(Mutex::new(ThreadSafeApp::recording(app)))
}

/// Locks the shared app, recovering from a poisoned mutex.
pub fn lock_app(app: &SharedApp) -> MutexGuard<'_, ThreadSafeApp> {
    app.lock().unwrap_or_else(PoisonError::into_inner)
}

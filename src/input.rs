//! Per-frame player input.
//!
//! Held controls are level-triggered. `jump`, `reset` and `pause` are edges:
//! the presentation layer sets them only on the frame the key goes down.
//! [`EdgeDetector`] derives those edges from raw held state for callers that
//! only have key-down booleans.

/// Controls sampled for one simulated frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "One flag per physical control is the natural input contract."
)]
pub struct FrameInput {
    /// Accelerate forward.
    pub forward: bool,
    /// Brake, then reverse.
    pub backward: bool,
    /// Steer left.
    pub left: bool,
    /// Steer right.
    pub right: bool,
    /// Extra speed decay this frame.
    pub handbrake: bool,
    /// Jump pressed this frame.
    pub jump: bool,
    /// Reset to spawn pressed this frame.
    pub reset: bool,
    /// Pause toggle pressed this frame.
    pub pause: bool,
}

impl FrameInput {
    /// Input holding only the throttle.
    #[must_use]
    pub const fn forward() -> Self {
        Self {
            forward: true,
            backward: false,
            left: false,
            right: false,
            handbrake: false,
            jump: false,
            reset: false,
            pause: false,
        }
    }

    /// Input holding only the brake/reverse control.
    #[must_use]
    pub const fn backward() -> Self {
        Self {
            backward: true,
            ..Self::idle()
        }
    }

    /// No controls held.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            forward: false,
            backward: false,
            left: false,
            right: false,
            handbrake: false,
            jump: false,
            reset: false,
            pause: false,
        }
    }

    /// Returns a copy with the edge-triggered controls cleared.
    #[must_use]
    pub const fn without_edges(self) -> Self {
        Self {
            jump: false,
            reset: false,
            pause: false,
            ..self
        }
    }
}

/// Raw held state of the edge-triggered controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldEdges {
    /// Jump key currently down.
    pub jump: bool,
    /// Reset key currently down.
    pub reset: bool,
    /// Pause key currently down.
    pub pause: bool,
}

/// Turns held key state into single-frame presses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    previous: HeldEdges,
}

impl EdgeDetector {
    /// Fills the edge fields of `input` from `held`, reporting a press only on
    /// the first frame each key is down.
    pub fn apply(&mut self, mut input: FrameInput, held: HeldEdges) -> FrameInput {
        input.jump = held.jump && !self.previous.jump;
        input.reset = held.reset && !self.previous.reset;
        input.pause = held.pause && !self.previous.pause;
        self.previous = held;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn edges_fire_once_per_press() {
        let mut edges = EdgeDetector::default();
        let held = HeldEdges {
            jump: true,
            ..HeldEdges::default()
        };
        assert!(edges.apply(FrameInput::idle(), held).jump);
        assert!(!edges.apply(FrameInput::idle(), held).jump);
        assert!(!edges.apply(FrameInput::idle(), HeldEdges::default()).jump);
        assert!(edges.apply(FrameInput::idle(), held).jump);
    }

    #[rstest]
    fn without_edges_keeps_held_controls() {
        let input = FrameInput {
            forward: true,
            left: true,
            jump: true,
            pause: true,
            ..FrameInput::idle()
        };
        let cleared = input.without_edges();
        assert!(cleared.forward && cleared.left);
        assert!(!cleared.jump && !cleared.pause);
    }
}

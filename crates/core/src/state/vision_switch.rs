//! Vision provider selection
//!
//! While browsing, the operator may cycle through the vision provider table
//! and bring the selected provider up or down. Initialize and shutdown block,
//! so they are only requested while inactive. While active, the operator may
//! save the current camera frame.

use crate::input::{Buttons, Edges};
use crate::ordinal::wrap_index;
use heapless::Vec;

/// Blocking vision operation the op-mode must perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisionAction {
    /// Replace the provider with the one at this table index
    Recreate(usize),
    /// Bring the provider up (blocking)
    Initialize,
    /// Take the provider down (blocking)
    Shutdown,
    /// Save the current frame to the dashboard
    SaveImage,
}

/// Actions for one tick, in execution order
pub type VisionActions = Vec<VisionAction, 2>;

/// Selected provider index and whether it is initialized ("finalized")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisionSwitch {
    provider_index: usize,
    finalized: bool,
}

impl VisionSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider_index(&self) -> usize {
        self.provider_index
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Record the outcome of an initialize or shutdown
    pub fn set_finalized(&mut self, finalized: bool) {
        self.finalized = finalized;
    }

    /// Translate this tick's edges into vision actions
    ///
    /// While inactive and not finalized: dpad-left advances to the next
    /// provider, then dpad-up initializes it (both may fire in one tick).
    /// While inactive and finalized: dpad-up shuts the provider down.
    /// While active: dpad-right saves an image from a finalized provider.
    pub fn handle(&mut self, edges: &Edges, active: bool, provider_count: usize) -> VisionActions {
        let mut actions = VisionActions::new();
        let up = edges.either(Buttons::DPAD_UP);

        // At most two pushes, so they cannot fail
        if active {
            if edges.either(Buttons::DPAD_RIGHT) && self.finalized {
                let _ = actions.push(VisionAction::SaveImage);
            }
        } else if self.finalized {
            if up {
                let _ = actions.push(VisionAction::Shutdown);
            }
        } else {
            if edges.either(Buttons::DPAD_LEFT) && provider_count > 0 {
                self.provider_index = wrap_index(self.provider_index as i32 + 1, provider_count);
                let _ = actions.push(VisionAction::Recreate(self.provider_index));
            }
            if up {
                let _ = actions.push(VisionAction::Initialize);
            }
        }

        actions
    }
}

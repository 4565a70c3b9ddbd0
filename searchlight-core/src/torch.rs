//! The torch surface seam.
//!
//! A torch surface owns the camera handle whose flash LED is used as the
//! light. Acquisition may finish later than [`TorchSurface::init_camera`]
//! returns; in that case the host reports the outcome through
//! [`LightController::on_camera_ready`](crate::LightController::on_camera_ready)
//! or [`LightController::on_camera_unavailable`](crate::LightController::on_camera_unavailable)
//! together with the ticket it was handed.

use crate::error::Result;

/// Identifies one camera acquisition attempt.
///
/// Outcomes carrying a ticket other than the controller's current one are
/// stale (the camera was released or the screen torn down in between) and
/// are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcquireTicket(pub(crate) u64);

impl AcquireTicket {
    /// Raw ticket number, for logging.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Immediate answer of [`TorchSurface::init_camera`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// The camera is ready now.
    Ready,
    /// The camera can't be used.
    Unavailable,
    /// The outcome will be delivered later with the same ticket.
    Pending,
}

/// Trait for torch hardware implementations.
///
/// This allows for mock implementations in tests.
pub trait TorchSurface {
    /// Start acquiring the camera.
    fn init_camera(&mut self, ticket: AcquireTicket) -> Acquisition;

    /// Release the camera handle. The torch goes dark.
    fn release_camera(&mut self);

    /// Restart the camera preview after the screen regained focus.
    fn start_preview(&mut self);

    /// Light the torch.
    fn light_on(&mut self) -> Result<()>;

    /// Turn the torch off.
    fn light_off(&mut self) -> Result<()>;

    /// Show the camera preview instead of a hidden surface.
    fn set_viewfinder(&mut self, enabled: bool) {
        let _ = enabled;
    }

    /// Whether the torch is physically lit.
    fn is_lit(&self) -> bool;
}

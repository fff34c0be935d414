//! Best-effort completion side effects.
//!
//! Implementations may fail; the controller logs the failure and carries on.

use crate::error::NotifyError;

pub trait Notifier {
    /// Short completion chime.
    fn play_sound(&self) -> Result<(), NotifyError>;

    /// Desktop-style notification.
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Notifier that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn play_sound(&self) -> Result<(), NotifyError> {
        Ok(())
    }

    fn notify(&self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

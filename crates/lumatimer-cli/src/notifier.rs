use std::io::Write;

use lumatimer_core::storage::NotificationsConfig;
use lumatimer_core::{Notifier, NotifyError};

/// Completion chime and notice on the controlling terminal.
pub struct TerminalNotifier {
    bell: bool,
    desktop: bool,
}

impl TerminalNotifier {
    pub fn from_config(config: &NotificationsConfig) -> Self {
        Self {
            bell: config.bell,
            desktop: config.desktop,
        }
    }
}

impl Notifier for TerminalNotifier {
    fn play_sound(&self) -> Result<(), NotifyError> {
        if !self.bell {
            return Ok(());
        }
        let mut err = std::io::stderr().lock();
        err.write_all(b"\x07")?;
        err.flush()?;
        Ok(())
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        if !self.desktop {
            return Ok(());
        }
        writeln!(std::io::stderr(), "\n[{title}] {body}")?;
        Ok(())
    }
}

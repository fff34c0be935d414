use clap::Subcommand;
use lumatimer_core::Settings;

use crate::app::{print_json, App, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a setting (e.g. "focus_duration", "auto_start_breaks")
    Get {
        /// Setting key
        key: String,
    },
    /// Set a setting
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: ConfigAction, app: &mut App) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let value = app
                .setting(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            app.set_setting(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            print_json(app.settings())?;
        }
        ConfigAction::Reset => {
            app.apply_settings(Settings::default())?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}

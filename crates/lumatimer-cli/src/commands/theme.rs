use clap::Subcommand;
use lumatimer_core::Theme;

use crate::app::{App, CliResult};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the current theme
    Get,
    /// Switch between light and dark
    Toggle,
    /// Set the theme explicitly
    Set {
        /// light or dark
        theme: Theme,
    },
}

pub fn run(action: ThemeAction, app: &mut App) -> CliResult {
    let theme = match action {
        ThemeAction::Get => app.theme(),
        ThemeAction::Toggle => app.toggle_theme()?,
        ThemeAction::Set { theme } => {
            app.set_theme(theme)?;
            theme
        }
    };
    println!("{theme}");
    Ok(())
}

use clap::Subcommand;

use crate::app::{print_json, App, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today,
    /// All stats including the weekly chart
    All,
}

pub fn run(action: StatsAction, app: &App) -> CliResult {
    let snapshot = app.stats_snapshot();
    match action {
        StatsAction::Today => print_json(&snapshot.today),
        StatsAction::All => print_json(&snapshot),
    }
}

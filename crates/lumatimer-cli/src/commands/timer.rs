use clap::Subcommand;
use lumatimer_core::{format_time, Event, TimerHandle, TimerMode};
use std::io::Write;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::{print_json, App, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Run the timer in the foreground until it stops
    ///
    /// Auto-started intervals keep the run going. Ctrl-C pauses, or cancels
    /// a pending auto-start.
    Run {
        /// Interval to run: focus, short-break or long-break
        #[arg(long)]
        mode: Option<TimerMode>,
    },
}

pub async fn run(
    action: TimerAction,
    app: &mut App,
    mut fired: UnboundedReceiver<TimerHandle>,
) -> CliResult {
    match action {
        TimerAction::Status => print_json(&app.display_state()),
        TimerAction::Run { mode } => run_foreground(app, &mut fired, mode).await,
    }
}

async fn run_foreground(
    app: &mut App,
    fired: &mut UnboundedReceiver<TimerHandle>,
    mode: Option<TimerMode>,
) -> CliResult {
    if let Some(mode) = mode {
        app.switch_mode(mode);
    }
    app.start();
    render(app.drain_events())?;

    loop {
        tokio::select! {
            handle = fired.recv() => {
                let Some(handle) = handle else { break };
                app.fire(handle)?;
            }
            _ = tokio::signal::ctrl_c() => {
                if app.pending_auto_advance().is_some() {
                    app.dismiss_completion();
                } else {
                    app.pause();
                }
                render(app.drain_events())?;
                break;
            }
        }
        render(app.drain_events())?;

        if !app.is_running() && app.pending_auto_advance().is_none() {
            break;
        }
    }

    eprintln!();
    print_json(&app.display_state())
}

/// Countdown on one stderr line; every other event as a JSON line on stdout.
fn render(events: Vec<Event>) -> CliResult {
    for event in events {
        match event {
            Event::Ticked {
                mode,
                time_left_secs,
            } => {
                let mut err = std::io::stderr().lock();
                write!(err, "\r{:>11}  {}", mode.as_str(), format_time(time_left_secs))?;
                err.flush()?;
            }
            other => println!("{}", serde_json::to_string(&other)?),
        }
    }
    Ok(())
}

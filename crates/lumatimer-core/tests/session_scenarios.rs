//! End-to-end session scenarios driven on virtual time.

mod common;

use common::{app, app_with, reopen, run_interval, Call, FlakyStore, RecordingNotifier};
use lumatimer_core::{Event, Settings, TimerMode};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn four_focus_sessions_end_in_long_break() {
    let mut app = app();

    for round in 1..=4 {
        assert_eq!(app.display_state().mode, TimerMode::Focus);
        run_interval(&mut app);

        let completion = app.last_completion().cloned().unwrap();
        assert_eq!(completion.completed_mode, TimerMode::Focus);
        assert_eq!(completion.title, "Session Complete!");
        if round < 4 {
            assert_eq!(completion.next_mode, TimerMode::ShortBreak);
            assert_eq!(completion.button_label, "Start Break");
        } else {
            assert_eq!(completion.next_mode, TimerMode::LongBreak);
            assert_eq!(completion.button_label, "Start Long Break");
        }

        // Breaks auto-start after the delay.
        assert!(completion.auto_advance);
        app.advance(3).unwrap();
        let state = app.display_state();
        assert!(state.is_running);
        assert_eq!(state.mode, completion.next_mode);

        app.advance(state.time_left_secs + 1).unwrap();
        let brk = app.last_completion().cloned().unwrap();
        assert_eq!(brk.next_mode, TimerMode::Focus);
        assert_eq!(brk.title, "Break Complete!");
        assert!(!brk.auto_advance);
        assert_eq!(app.accept_completion(), Some(TimerMode::Focus));
        app.pause();
    }

    let stats = app.stats_snapshot();
    assert_eq!(stats.total.pomodoros, 4);
    assert_eq!(stats.total.minutes, 100);
    assert_eq!(stats.today.pomodoros, 4);
    assert_eq!(stats.weekly[3], 4);
    assert_eq!(app.display_state().session_count, 5);
    assert_eq!(app.display_state().completed_sessions, 4);
}

#[test]
fn task_completes_after_estimated_pomodoros() {
    let mut app = app();
    let id = app.add_task("Write report", 2).unwrap().unwrap();
    assert_eq!(app.set_active_task(id).unwrap(), Some(id));

    run_interval(&mut app);
    assert_eq!(app.task(id).unwrap().completed_pomodoros, 1);
    assert!(!app.task(id).unwrap().completed);

    app.dismiss_completion();
    app.switch_mode(TimerMode::Focus);
    run_interval(&mut app);

    let task = app.task(id).unwrap();
    assert!(task.completed);
    assert_eq!(task.completed_pomodoros, 2);
    assert_eq!(app.last_completion().unwrap().credited_task, Some(id));
    assert_eq!(app.display_state().estimated_finish_time, None);
}

#[test]
fn deleting_active_task_leaves_no_dangling_reference() {
    let mut app = app();
    let id = app.add_task("Ephemeral", 3).unwrap().unwrap();
    app.set_active_task(id).unwrap();
    assert_eq!(app.display_state().active_task_id, Some(id));

    assert!(app.delete_task(id).unwrap());
    assert_eq!(app.display_state().active_task_id, None);

    run_interval(&mut app);
    let completion = app.last_completion().unwrap();
    assert_eq!(completion.credited_task, None);
    assert_eq!(app.stats_snapshot().total.pomodoros, 1);
    assert!(app.tasks().is_empty());
}

#[test]
fn dismissing_completion_cancels_auto_advance() {
    let mut app = app();
    run_interval(&mut app);
    assert_eq!(app.pending_auto_advance(), Some(TimerMode::ShortBreak));

    app.advance(2).unwrap();
    app.dismiss_completion();
    assert_eq!(app.pending_auto_advance(), None);
    assert!(app.last_completion().is_none());

    app.advance(10).unwrap();
    let state = app.display_state();
    assert!(!state.is_running);
    assert_eq!(state.mode, TimerMode::Focus);
    assert_eq!(app.scheduler().armed(), 0);
}

#[test]
fn accepting_completion_starts_next_interval_immediately() {
    let mut app = app();
    run_interval(&mut app);
    assert_eq!(app.accept_completion(), Some(TimerMode::ShortBreak));
    assert!(app.is_running());
    assert_eq!(app.pending_auto_advance(), None);
    // Only the tick source remains armed.
    assert_eq!(app.scheduler().armed(), 1);
    assert_eq!(app.accept_completion(), None);
}

#[test]
fn focus_auto_start_follows_setting() {
    let mut app = app_with(Settings {
        focus_duration: 1,
        short_break_duration: 1,
        auto_start_focus: true,
        ..Settings::default()
    });
    run_interval(&mut app);
    app.advance(3).unwrap();
    assert_eq!(app.display_state().mode, TimerMode::ShortBreak);
    app.advance(61).unwrap();
    assert_eq!(app.pending_auto_advance(), Some(TimerMode::Focus));
    app.advance(3).unwrap();
    let state = app.display_state();
    assert_eq!(state.mode, TimerMode::Focus);
    assert!(state.is_running);
    assert_eq!(state.session_count, 2);
}

#[test]
fn completion_emits_events_in_order() {
    let mut app = app_with(Settings {
        focus_duration: 1,
        ..Settings::default()
    });
    app.start();
    app.advance(61).unwrap();

    let events = app.drain_events();
    assert!(matches!(events.first(), Some(Event::TimerStarted { .. })));
    let ticks = events
        .iter()
        .filter(|e| matches!(e, Event::Ticked { .. }))
        .count();
    assert_eq!(ticks, 60);
    let completions = events
        .iter()
        .filter(|e| matches!(e, Event::SessionCompleted { .. }))
        .count();
    assert_eq!(completions, 1);
    assert!(matches!(
        events.last(),
        Some(Event::AutoAdvanceScheduled { next_mode: TimerMode::ShortBreak, delay_secs: 3, .. })
    ));
    assert!(app.drain_events().is_empty());
}

#[test]
fn paused_timer_does_not_count_down() {
    let mut app = app();
    app.start();
    app.advance(10).unwrap();
    app.pause();
    app.advance(100).unwrap();
    assert_eq!(app.display_state().time_left_secs, 1500 - 10);
    app.reset();
    assert_eq!(app.display_state().time_left_secs, 1500);
}

#[test]
fn notifier_respects_sound_setting_and_failures_are_swallowed() {
    let notifier = RecordingNotifier::default();
    let mut quiet = app_with(Settings {
        focus_duration: 1,
        sound_enabled: false,
        ..Settings::default()
    })
    .with_notifier(notifier.clone());
    run_interval(&mut quiet);
    assert_eq!(
        notifier.calls.borrow().as_slice(),
        &[Call::Notify("LumaTimer".into(), "Time for a break!".into())]
    );

    let failing = RecordingNotifier {
        fail: true,
        ..RecordingNotifier::default()
    };
    let mut loud = app_with(Settings {
        focus_duration: 1,
        ..Settings::default()
    })
    .with_notifier(failing.clone());
    run_interval(&mut loud);
    assert_eq!(failing.calls.borrow().len(), 2);
    assert_eq!(loud.stats_snapshot().total.pomodoros, 1);
}

#[test]
fn estimated_finish_counts_remaining_pomodoros() {
    let mut app = app();
    assert_eq!(app.display_state().estimated_finish_time, None);
    app.add_task("a", 2).unwrap();
    let done = app.add_task("b", 5).unwrap().unwrap();
    app.toggle_task(done).unwrap();

    let now = common::wednesday().0;
    let finish = app.display_state().estimated_finish_time.unwrap();
    assert_eq!(finish - now, chrono::Duration::minutes(50));
}

#[test]
fn settings_change_refills_idle_timer() {
    let mut app = app();
    app.set_setting("focus_duration", "40").unwrap();
    assert_eq!(app.display_state().total_time_secs, 40 * 60);

    app.start();
    app.set_setting("focus_duration", "10").unwrap();
    assert_eq!(app.display_state().total_time_secs, 40 * 60);
    assert_eq!(app.settings().focus_duration, 10);
}

#[test]
fn activating_completed_task_keeps_current_active_task() {
    let mut app = app();
    let draft = app.add_task("Draft", 3).unwrap().unwrap();
    let done = app.add_task("Done already", 1).unwrap().unwrap();
    assert_eq!(app.set_active_task(draft).unwrap(), Some(draft));

    assert!(app.toggle_task(done).unwrap());
    assert_eq!(app.set_active_task(done).unwrap(), None);
    assert_eq!(app.display_state().active_task_id, Some(draft));

    run_interval(&mut app);
    assert_eq!(app.last_completion().unwrap().credited_task, Some(draft));
    assert_eq!(app.task(draft).unwrap().completed_pomodoros, 1);
    assert_eq!(app.task(done).unwrap().completed_pomodoros, 0);
}

#[test]
fn huge_estimates_leave_display_state_usable() {
    let mut app = app();
    app.add_task("a", 3_000_000_000).unwrap();
    app.add_task("b", 3_000_000_000).unwrap();

    let state = app.display_state();
    assert_eq!(state.time_left_secs, 1500);
    assert_eq!(state.estimated_finish_time, None);
}

#[test]
fn failed_completion_write_still_announces_session() {
    let fail = Rc::new(Cell::new(false));
    let store = FlakyStore {
        fail: Rc::clone(&fail),
        ..FlakyStore::default()
    };
    let mut app = reopen(Box::new(store));
    let id = app.add_task("Write", 2).unwrap().unwrap();
    app.set_active_task(id).unwrap();
    app.drain_events();

    fail.set(true);
    let secs = app.display_state().time_left_secs + 1;
    app.start();
    assert!(app.advance(secs).is_err());

    assert!(!app.is_running());
    let completion = app.last_completion().cloned().unwrap();
    assert_eq!(completion.credited_task, Some(id));
    assert_eq!(app.pending_auto_advance(), Some(TimerMode::ShortBreak));
    let events = app.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::SessionCompleted { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::AutoAdvanceScheduled { .. })));

    fail.set(false);
    app.advance(3).unwrap();
    assert!(app.is_running());
    assert_eq!(app.display_state().mode, TimerMode::ShortBreak);
}

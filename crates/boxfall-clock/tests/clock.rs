//! Behavioral tests for the round clock.
//!
//! Uses `tokio::time::pause()` (via `start_paused = true`) so the
//! 1-second cadence resolves instantly under auto-advanced virtual time.

use std::time::Duration;

use boxfall_clock::Clock;
use tokio::time;

const PERIOD: Duration = Duration::from_secs(1);

#[test]
fn test_new_clock_is_idle() {
    let clock = Clock::idle(PERIOD);
    assert!(!clock.is_running());
    assert_eq!(clock.ticks(), 0);
    assert_eq!(clock.period(), PERIOD);
}

#[tokio::test(start_paused = true)]
async fn test_idle_clock_never_ticks() {
    let mut clock = Clock::idle(PERIOD);

    // The tick future must pend forever; the sleep branch must win.
    tokio::select! {
        _ = clock.tick() => panic!("idle clock must not tick"),
        _ = time::sleep(Duration::from_secs(3600)) => {}
    }
}

#[tokio::test(start_paused = true)]
async fn test_first_tick_fires_after_one_full_period() {
    let mut clock = Clock::idle(PERIOD);
    clock.start();

    let before = time::Instant::now();
    let tick = clock.tick().await;
    assert_eq!(tick, 1);
    assert_eq!(before.elapsed(), PERIOD);
}

#[tokio::test(start_paused = true)]
async fn test_ticks_are_numbered_monotonically() {
    let mut clock = Clock::idle(PERIOD);
    clock.start();

    for expected in 1..=5 {
        assert_eq!(clock.tick().await, expected);
    }
    assert_eq!(clock.ticks(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_stop_disarms_the_clock() {
    let mut clock = Clock::idle(PERIOD);
    clock.start();
    clock.tick().await;

    clock.stop();
    assert!(!clock.is_running());

    tokio::select! {
        _ = clock.tick() => panic!("stopped clock must not tick"),
        _ = time::sleep(Duration::from_secs(3600)) => {}
    }
}

#[test]
fn test_stop_is_idempotent() {
    let mut clock = Clock::idle(PERIOD);
    clock.stop();
    clock.stop();
    assert!(!clock.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_restart_resets_tick_count_and_cadence() {
    let mut clock = Clock::idle(PERIOD);
    clock.start();
    clock.tick().await;
    clock.tick().await;
    clock.stop();

    clock.start();
    assert_eq!(clock.ticks(), 0);

    let before = time::Instant::now();
    assert_eq!(clock.tick().await, 1);
    assert_eq!(before.elapsed(), PERIOD);
}

#[tokio::test(start_paused = true)]
async fn test_no_catch_up_after_a_stall() {
    let mut clock = Clock::idle(PERIOD);
    clock.start();
    clock.tick().await;

    // Simulate the consumer stalling for several periods.
    time::advance(Duration::from_millis(3500)).await;

    // MissedTickBehavior::Delay: exactly one (late) tick is delivered,
    // then the cadence resumes one full period out.
    clock.tick().await;
    let before = time::Instant::now();
    clock.tick().await;
    assert_eq!(before.elapsed(), PERIOD);
    assert_eq!(clock.ticks(), 3);
}

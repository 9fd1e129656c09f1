//! BlockTimer through the public API

use crossbeam::channel;
use feige::timer::TimerDriver;
use feige::{BlockTimer, Queue, TimerState};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_once_timer_reports_its_fire() {
    let (tx, rx) = channel::unbounded();
    let started = Instant::now();
    let timer = BlockTimer::scheduled(Duration::from_millis(30), false, Queue::main(), move |t| {
        tx.send(t.id()).unwrap();
    });

    let id = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(id, timer.id());
    assert!(started.elapsed() >= Duration::from_millis(30));
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    assert_eq!(timer.state(), TimerState::Fired);
}

#[test]
fn test_repeating_timer_on_dedicated_driver() {
    let driver = TimerDriver::spawn("integration-timer").unwrap();
    let queue = Queue::serial("integration-timer-callbacks").unwrap();
    let (tx, rx) = channel::unbounded();

    let timer = BlockTimer::builder(Duration::from_millis(20))
        .repeats(true)
        .queue(queue)
        .driver(driver.clone())
        .schedule(move |_| {
            let _ = tx.send(());
        });

    for _ in 0..3 {
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }
    assert_eq!(timer.state(), TimerState::Armed);

    drop(timer);
    let deadline = Instant::now() + Duration::from_secs(5);
    while driver.pending() != 0 {
        assert!(Instant::now() < deadline, "driver kept the entry");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn test_manual_fire_without_schedule() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let timer = BlockTimer::new(Duration::from_secs(3600), false, Queue::main(), move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    timer.fire();
    let deadline = Instant::now() + Duration::from_secs(5);
    while hits.load(Ordering::SeqCst) == 0 {
        assert!(Instant::now() < deadline, "fire never ran");
        thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(timer.state(), TimerState::Created);
}

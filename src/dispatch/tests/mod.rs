//! Dispatch queue tests

use crate::dispatch::{ConcurrentQueue, ExecutionContext, Job, Qos, Queue};
use crossbeam::channel;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

#[cfg(test)]
mod qos_tests {
    use super::*;

    #[test]
    fn test_qos_index_is_dense() {
        for (i, qos) in Qos::ALL.iter().enumerate() {
            assert_eq!(qos.index(), i);
        }
    }

    #[test]
    fn test_qos_default() {
        assert_eq!(Qos::default(), Qos::Default);
    }

    #[test]
    fn test_qos_threads_positive() {
        for qos in Qos::ALL {
            assert!(qos.num_threads() >= 1);
        }
    }

    #[test]
    fn test_qos_display() {
        assert_eq!(Qos::UserInitiated.to_string(), "user-initiated");
        assert_eq!(Qos::Background.to_string(), "background");
    }
}

#[cfg(test)]
mod serial_queue_tests {
    use super::*;

    #[test]
    fn test_serial_queue_fifo() {
        let queue = Queue::serial("test-fifo").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (done_tx, done_rx) = channel::bounded(1);

        for i in 0..100 {
            let seen = seen.clone();
            queue.async_run(move || seen.lock().push(i));
        }
        queue.async_run(move || {
            let _ = done_tx.send(());
        });

        done_rx.recv_timeout(WAIT).unwrap();
        assert_eq!(*seen.lock(), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_serial_queue_runs_off_caller_thread() {
        let queue = Queue::serial("test-thread").unwrap();
        let caller = thread::current().id();
        let (tx, rx) = channel::bounded(1);

        queue.async_run(move || {
            let _ = tx.send(thread::current().id());
        });

        let worker = rx.recv_timeout(WAIT).unwrap();
        assert_ne!(worker, caller);
    }

    #[test]
    fn test_serial_queue_survives_panicking_job() {
        let queue = Queue::serial("test-panic").unwrap();
        let (tx, rx) = channel::bounded(1);

        queue.async_run(|| panic!("boom"));
        queue.async_run(move || {
            let _ = tx.send(42);
        });

        assert_eq!(rx.recv_timeout(WAIT).unwrap(), 42);
    }

    #[test]
    fn test_serial_queue_label() {
        let queue = Queue::serial("labelled").unwrap();
        assert_eq!(queue.label(), "labelled");
        assert!(format!("{:?}", queue).contains("labelled"));
    }
}

#[cfg(test)]
mod queue_handle_tests {
    use super::*;

    #[test]
    fn test_main_queue_is_shared() {
        assert!(Queue::main().same_queue(&Queue::main()));
        assert_eq!(Queue::main().label(), "main");
    }

    #[test]
    fn test_global_queue_is_shared_per_qos() {
        assert!(Queue::global(Qos::Utility).same_queue(&Queue::global(Qos::Utility)));
        assert!(!Queue::global(Qos::Utility).same_queue(&Queue::global(Qos::Background)));
        assert_eq!(Queue::global(Qos::Utility).label(), "global-utility");
    }

    #[test]
    fn test_global_queue_runs_all_jobs() {
        let queue = Queue::global(Qos::UserInitiated);
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = channel::unbounded();

        for _ in 0..64 {
            let counter = counter.clone();
            let tx = tx.clone();
            queue.async_run(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(());
            });
        }

        for _ in 0..64 {
            rx.recv_timeout(WAIT).unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 64);
    }

    #[test]
    fn test_concurrent_queue_runs_in_parallel() {
        let queue = Queue::custom(ConcurrentQueue::new("test-parallel", Qos::UserInteractive).unwrap());
        let barrier = Arc::new(std::sync::Barrier::new(2));
        let (tx, rx) = channel::unbounded();

        // Both jobs must be running at once to pass the barrier.
        for _ in 0..2 {
            let barrier = barrier.clone();
            let tx = tx.clone();
            queue.async_run(move || {
                barrier.wait();
                let _ = tx.send(());
            });
        }

        rx.recv_timeout(WAIT).unwrap();
        rx.recv_timeout(WAIT).unwrap();
    }

    struct Recording {
        jobs: Mutex<Vec<Job>>,
    }

    impl ExecutionContext for Arc<Recording> {
        fn execute(
            &self,
            job: Job,
        ) {
            self.jobs.lock().push(job);
        }

        fn label(&self) -> &str {
            "recording"
        }
    }

    #[test]
    fn test_custom_context_receives_jobs() {
        let recording = Arc::new(Recording {
            jobs: Mutex::new(Vec::new()),
        });
        let queue = Queue::custom(recording.clone());
        let ran = Arc::new(AtomicUsize::new(0));

        let r = ran.clone();
        queue.async_run(move || {
            r.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(ran.load(Ordering::SeqCst), 0);

        for job in recording.jobs.lock().drain(..) {
            job();
        }
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(queue.label(), "recording");
    }
}

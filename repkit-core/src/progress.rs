use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::thread;
use std::time::{Duration, Instant};

/// Incremental progress receiver. Implementations must be cheap and
/// non-blocking; the verifier calls this after every manifest entry.
pub trait ProgressSink: Sync {
    fn update(&self, done: usize, total: usize, label: &str);
}

/// Sink that discards everything; used in tests and quiet runs.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn update(&self, _done: usize, _total: usize, _label: &str) {}
}

/// Shared counters with a background printer thread, for long-running checks
/// driven from a foreground loop.
#[derive(Clone)]
pub struct Progress {
    enabled: bool,
    pub label: Arc<Mutex<String>>,
    pub done: Arc<AtomicUsize>,
    pub total: Arc<AtomicUsize>,
    running: Arc<AtomicBool>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            label: Arc::new(Mutex::new(String::new())),
            done: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(0)),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn start(&self) {
        if !self.enabled {
            return;
        }
        self.running.store(true, Ordering::Relaxed);
        let label = self.label.clone();
        let done = self.done.clone();
        let total = self.total.clone();
        let running = self.running.clone();
        thread::spawn(move || {
            let t0 = Instant::now();
            while running.load(Ordering::Relaxed) {
                thread::sleep(Duration::from_secs(2));
                if !running.load(Ordering::Relaxed) {
                    break;
                }
                let l = label.lock().unwrap().clone();
                let d = done.load(Ordering::Relaxed);
                let t = total.load(Ordering::Relaxed);
                eprintln!("[{:>4}s] {}/{} {}", t0.elapsed().as_secs(), d, t, l);
            }
        });
    }

    pub fn stop(&self) {
        if self.enabled {
            self.running.store(false, Ordering::Relaxed);
        }
    }
}

impl ProgressSink for Progress {
    fn update(&self, done: usize, total: usize, label: &str) {
        self.done.store(done, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
        if self.enabled {
            *self.label.lock().unwrap() = label.to_string();
        }
    }
}

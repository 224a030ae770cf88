//! Frame scheduler
//!
//! Single-threaded multiplexer that invokes every running callback once per
//! frame with `(framestamp, frame_duration)`, both in milliseconds.
//!
//! Ownership runs one way: a [`Registration`] owns its slot and removes it on
//! drop, while the scheduler only keeps a weak link back to the registering
//! side (actions capture a `Weak` to themselves in their callback).

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Per-frame callback: `(framestamp, frame_duration)` in ms.
pub type FrameCallback = Box<dyn FnMut(f64, f64)>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ProcessId(pub u32);

#[derive(Copy, Clone, Debug)]
enum Clock {
    /// Time only moves when `tick` is called.
    Manual,
    /// Wall time since the scheduler was created.
    Monotonic(Instant),
}

struct Process {
    id: ProcessId,
    running: bool,
    callback: Rc<RefCell<FrameCallback>>,
}

struct SchedulerInner {
    cfg: Config,
    clock: Clock,
    framestamp: f64,
    next_id: u32,
    processes: Vec<Process>,
}

impl SchedulerInner {
    fn now(&self) -> f64 {
        match self.clock {
            Clock::Manual => self.framestamp,
            Clock::Monotonic(origin) => origin.elapsed().as_secs_f64() * 1000.0,
        }
    }

    fn process_mut(&mut self, id: ProcessId) -> Option<&mut Process> {
        self.processes.iter_mut().find(|p| p.id == id)
    }
}

/// The frame scheduler shared by every action of a host.
///
/// Cloning yields another handle to the same scheduler.
#[derive(Clone)]
pub struct FrameScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl FrameScheduler {
    fn with_clock(cfg: Config, clock: Clock) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                cfg,
                clock,
                framestamp: 0.0,
                next_id: 0,
                processes: Vec::new(),
            })),
        }
    }

    /// Scheduler reading wall time.
    pub fn new(cfg: Config) -> Self {
        Self::with_clock(cfg, Clock::Monotonic(Instant::now()))
    }

    /// Scheduler whose clock only advances through [`tick`](Self::tick).
    pub fn manual(cfg: Config) -> Self {
        Self::with_clock(cfg, Clock::Manual)
    }

    pub fn config(&self) -> Config {
        self.inner.borrow().cfg.clone()
    }

    /// Current clock reading in ms.
    pub fn now(&self) -> f64 {
        self.inner.borrow().now()
    }

    /// Register a callback. It is not dispatched until the registration is started.
    pub fn register<F>(&self, callback: F) -> Registration
    where
        F: FnMut(f64, f64) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = ProcessId(inner.next_id);
        inner.next_id = inner.next_id.wrapping_add(1);
        inner.processes.push(Process {
            id,
            running: false,
            callback: Rc::new(RefCell::new(Box::new(callback))),
        });
        Registration {
            id,
            scheduler: Rc::downgrade(&self.inner),
        }
    }

    /// Advance by `frame_duration` ms and dispatch one frame.
    ///
    /// On a manual clock the framestamp moves by exactly `frame_duration`; on a
    /// monotonic clock it is the wall time. The duration handed to callbacks is
    /// clamped to `max_frame_duration_ms`. Returns the number of callbacks dispatched.
    pub fn tick(&self, frame_duration: f64) -> usize {
        let (framestamp, dt) = {
            let mut inner = self.inner.borrow_mut();
            let dt = frame_duration.min(inner.cfg.max_frame_duration_ms).max(0.0);
            inner.framestamp = match inner.clock {
                Clock::Manual => inner.framestamp + frame_duration.max(0.0),
                Clock::Monotonic(_) => inner.now(),
            };
            (inner.framestamp, dt)
        };
        self.dispatch(framestamp, dt)
    }

    /// Dispatch one frame, deriving its duration from the clock.
    pub fn frame(&self) -> usize {
        let dt = {
            let inner = self.inner.borrow();
            match inner.clock {
                Clock::Manual => inner.cfg.frame_interval_ms,
                Clock::Monotonic(_) => inner.now() - inner.framestamp,
            }
        };
        self.tick(dt)
    }

    fn dispatch(&self, framestamp: f64, dt: f64) -> usize {
        // Snapshot first: callbacks start/stop/drop registrations while running.
        let callbacks: Vec<Rc<RefCell<FrameCallback>>> = self
            .inner
            .borrow()
            .processes
            .iter()
            .filter(|p| p.running)
            .map(|p| Rc::clone(&p.callback))
            .collect();

        for callback in &callbacks {
            match callback.try_borrow_mut() {
                Ok(mut f) => (*f)(framestamp, dt),
                Err(_) => log::warn!("frame callback re-entered during dispatch; skipped"),
            }
        }
        callbacks.len()
    }

    pub fn process_count(&self) -> usize {
        self.inner.borrow().processes.len()
    }

    pub fn running_count(&self) -> usize {
        self.inner
            .borrow()
            .processes
            .iter()
            .filter(|p| p.running)
            .count()
    }

    /// Whether any callback is currently scheduled (the host can idle otherwise).
    pub fn has_running(&self) -> bool {
        self.running_count() > 0
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Exclusive handle to one registered callback. Dropping it deregisters.
pub struct Registration {
    id: ProcessId,
    scheduler: Weak<RefCell<SchedulerInner>>,
}

impl Registration {
    #[inline]
    pub fn id(&self) -> ProcessId {
        self.id
    }

    /// Begin dispatching on subsequent frames.
    pub fn start(&self) {
        self.set_running(true);
    }

    /// Stop dispatching. A frame already in flight still runs its snapshot.
    pub fn stop(&self) {
        self.set_running(false);
    }

    pub fn is_running(&self) -> bool {
        let Some(inner) = self.scheduler.upgrade() else {
            return false;
        };
        let running = inner
            .borrow()
            .processes
            .iter()
            .any(|p| p.id == self.id && p.running);
        running
    }

    /// Scheduler clock, or `None` once the scheduler is gone.
    pub fn now(&self) -> Option<f64> {
        let inner = self.scheduler.upgrade()?;
        let now = inner.borrow().now();
        Some(now)
    }

    fn set_running(&self, running: bool) {
        let Some(inner) = self.scheduler.upgrade() else {
            log::warn!("process {:?}: scheduler dropped", self.id);
            return;
        };
        let mut guard = inner.borrow_mut();
        if let Some(process) = guard.process_mut(self.id) {
            process.running = running;
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        let Some(inner) = self.scheduler.upgrade() else {
            return;
        };
        let Ok(mut guard) = inner.try_borrow_mut() else {
            return;
        };
        guard.processes.retain(|p| p.id != self.id);
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("running", &self.is_running())
            .finish()
    }
}

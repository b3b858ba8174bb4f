//! Debounce & Throttle
//!
//! Rate-limiting wrappers over a [`Scheduler`]. In the browser the scheduler
//! is backed by `gloo_timers::callback::Timeout`; dropping a handle cancels
//! the pending task.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Source of delayed one-shot tasks
pub trait Scheduler {
    /// Cancels the task when dropped
    type Handle;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;
}

/// Browser timers
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerScheduler;

impl Scheduler for TimerScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, task)
    }
}

struct DebounceInner<A, S: Scheduler> {
    f: Rc<dyn Fn(A)>,
    wait_ms: u32,
    scheduler: S,
    pending: RefCell<Option<S::Handle>>,
}

/// Runs `f` once calls stop arriving for `wait_ms`; the last call's
/// arguments win
pub struct Debounced<A, S: Scheduler = TimerScheduler> {
    inner: Rc<DebounceInner<A, S>>,
}

impl<A, S: Scheduler> Clone for Debounced<A, S> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<A: 'static, S: Scheduler> Debounced<A, S> {
    pub fn with_scheduler(f: impl Fn(A) + 'static, wait_ms: u32, scheduler: S) -> Self {
        Self {
            inner: Rc::new(DebounceInner {
                f: Rc::new(f),
                wait_ms,
                scheduler,
                pending: RefCell::new(None),
            }),
        }
    }

    pub fn call(&self, args: A) {
        let f = self.inner.f.clone();
        let handle = self
            .inner
            .scheduler
            .schedule(self.inner.wait_ms, Box::new(move || f(args)));
        // Replacing the previous handle cancels it
        *self.inner.pending.borrow_mut() = Some(handle);
    }

    /// Drop any pending invocation
    pub fn cancel(&self) {
        self.inner.pending.borrow_mut().take();
    }
}

pub fn debounce<A: 'static>(f: impl Fn(A) + 'static, wait_ms: u32) -> Debounced<A> {
    Debounced::with_scheduler(f, wait_ms, TimerScheduler)
}

struct ThrottleInner<A, S: Scheduler> {
    f: Box<dyn Fn(A)>,
    limit_ms: u32,
    scheduler: S,
    in_window: Rc<Cell<bool>>,
    reset: RefCell<Option<S::Handle>>,
}

/// Runs `f` at most once per `limit_ms`; calls inside the window are dropped
pub struct Throttled<A, S: Scheduler = TimerScheduler> {
    inner: Rc<ThrottleInner<A, S>>,
}

impl<A, S: Scheduler> Clone for Throttled<A, S> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<A, S: Scheduler> Throttled<A, S> {
    pub fn with_scheduler(f: impl Fn(A) + 'static, limit_ms: u32, scheduler: S) -> Self {
        Self {
            inner: Rc::new(ThrottleInner {
                f: Box::new(f),
                limit_ms,
                scheduler,
                in_window: Rc::new(Cell::new(false)),
                reset: RefCell::new(None),
            }),
        }
    }

    /// Returns whether `f` ran
    pub fn call(&self, args: A) -> bool {
        if self.inner.in_window.get() {
            return false;
        }
        (self.inner.f)(args);
        self.inner.in_window.set(true);
        let flag = self.inner.in_window.clone();
        let handle = self
            .inner
            .scheduler
            .schedule(self.inner.limit_ms, Box::new(move || flag.set(false)));
        *self.inner.reset.borrow_mut() = Some(handle);
        true
    }
}

pub fn throttle<A>(f: impl Fn(A) + 'static, limit_ms: u32) -> Throttled<A> {
    Throttled::with_scheduler(f, limit_ms, TimerScheduler)
}

#[cfg(test)]
pub(crate) mod manual {
    //! Deterministic clock for timer tests

    use super::Scheduler;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct Task {
        due: u64,
        seq: u64,
        cancelled: Rc<Cell<bool>>,
        run: Option<Box<dyn FnOnce()>>,
    }

    #[derive(Default)]
    pub struct ManualClock {
        now: Cell<u64>,
        seq: Cell<u64>,
        tasks: RefCell<Vec<Task>>,
    }

    pub struct ManualHandle {
        cancelled: Rc<Cell<bool>>,
    }

    impl Drop for ManualHandle {
        fn drop(&mut self) {
            self.cancelled.set(true);
        }
    }

    impl ManualClock {
        pub fn new() -> Rc<Self> {
            Rc::new(Self::default())
        }

        pub fn now(&self) -> u64 {
            self.now.get()
        }

        /// Move time forward, running due tasks in order
        pub fn advance(&self, ms: u64) {
            let target = self.now.get() + ms;
            loop {
                let next = {
                    let mut tasks = self.tasks.borrow_mut();
                    tasks.retain(|t| !t.cancelled.get() && t.run.is_some());
                    let idx = tasks
                        .iter()
                        .enumerate()
                        .filter(|(_, t)| t.due <= target)
                        .min_by_key(|(_, t)| (t.due, t.seq))
                        .map(|(i, _)| i);
                    idx.map(|i| {
                        let task = &mut tasks[i];
                        (task.due, task.run.take())
                    })
                };
                match next {
                    Some((due, Some(run))) => {
                        self.now.set(due);
                        run();
                    }
                    _ => break,
                }
            }
            self.now.set(target);
        }
    }

    impl Scheduler for Rc<ManualClock> {
        type Handle = ManualHandle;

        fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ManualHandle {
            let cancelled = Rc::new(Cell::new(false));
            let seq = self.seq.get();
            self.seq.set(seq + 1);
            self.tasks.borrow_mut().push(Task {
                due: self.now.get() + u64::from(delay_ms),
                seq,
                cancelled: cancelled.clone(),
                run: Some(task),
            });
            ManualHandle { cancelled }
        }
    }
}

//! One-shot timers behind an injectable clock.
//!
//! Animations never sleep: a commit hands its completion task to a
//! [`Scheduler`] and returns immediately. Hosts bridge the trait to their own
//! timer primitive; [`VirtualScheduler`] is a manual clock that tests (and
//! frame-driven hosts) advance explicitly.

use std::cell::{Cell, RefCell};
use std::fmt;

/// Deferred work queued on a scheduler.
pub type Task = Box<dyn FnOnce()>;

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// Schedules one-shot tasks after a delay in milliseconds.
pub trait Scheduler {
    /// Run `task` once, `delay_ms` from now.
    fn schedule(&self, delay_ms: f64, task: Task) -> TaskId;

    /// Drop a task that has not run yet. Returns `false` if it already ran
    /// or was never scheduled here.
    fn cancel(&self, id: TaskId) -> bool;
}

struct Scheduled {
    id: TaskId,
    due_ms: f64,
    task: Task,
}

/// Manually advanced clock.
///
/// Tasks run in deadline order; equal deadlines run in scheduling order.
/// A task scheduled by a running task is eligible in the same
/// [`advance`](Self::advance) call when its deadline falls inside it.
#[derive(Default)]
pub struct VirtualScheduler {
    now_ms: Cell<f64>,
    next_id: Cell<u64>,
    queue: RefCell<Vec<Scheduled>>,
}

impl fmt::Debug for VirtualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualScheduler")
            .field("now_ms", &self.now_ms.get())
            .field("pending", &self.pending())
            .finish()
    }
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Move the clock forward by `ms`, running every task that falls due.
    ///
    /// Returns the number of tasks run.
    pub fn advance(&self, ms: f64) -> usize {
        let target = self.now_ms.get() + ms.max(0.0);
        let mut ran = 0;
        while let Some(task) = self.pop_due(Some(target)) {
            task();
            ran += 1;
        }
        self.now_ms.set(target);
        ran
    }

    /// Run tasks until the queue is empty, moving the clock to each deadline.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.pop_due(None) {
            task();
            ran += 1;
        }
        ran
    }

    fn pop_due(&self, limit: Option<f64>) -> Option<Task> {
        let mut queue = self.queue.borrow_mut();
        let (idx, due_ms) = queue
            .iter()
            .enumerate()
            .filter(|(_, s)| limit.is_none_or(|limit| s.due_ms <= limit))
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(idx, s)| (idx, s.due_ms))?;
        let scheduled = queue.remove(idx);
        self.now_ms.set(due_ms.max(self.now_ms.get()));
        Some(scheduled.task)
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&self, delay_ms: f64, task: Task) -> TaskId {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let delay = if delay_ms.is_finite() { delay_ms.max(0.0) } else { 0.0 };
        self.queue.borrow_mut().push(Scheduled {
            id,
            due_ms: self.now_ms.get() + delay,
            task,
        });
        id
    }

    fn cancel(&self, id: TaskId) -> bool {
        let mut queue = self.queue.borrow_mut();
        let before = queue.len();
        queue.retain(|s| s.id != id);
        queue.len() != before
    }
}

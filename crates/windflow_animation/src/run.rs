//! Animation runs and their handles
//!
//! A run is one invocation of the animator: a resolved spec plus the time it
//! started. The scheduler owns the run; callers keep a [`RunHandle`] to
//! observe or cancel it.

use crate::tween::{CompleteCallback, ProgressCallback, ResolvedSpec, Tween};
use slotmap::new_key_type;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

new_key_type! {
    /// Handle to a registered animation run
    pub struct RunId;
}

/// Lifecycle of a run. `Completed` and `Cancelled` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Completed,
    Cancelled,
}

const RUNNING: u8 = 0;
const COMPLETED: u8 = 1;
const CANCELLED: u8 = 2;

/// State shared between a run and its handles
#[derive(Debug)]
pub(crate) struct RunShared {
    state: AtomicU8,
}

impl RunShared {
    pub(crate) fn new() -> Self {
        Self {
            state: AtomicU8::new(RUNNING),
        }
    }

    pub(crate) fn state(&self) -> RunState {
        match self.state.load(Ordering::Acquire) {
            RUNNING => RunState::Running,
            COMPLETED => RunState::Completed,
            _ => RunState::Cancelled,
        }
    }

    /// Leave `Running` for a terminal state. Fails if already terminal.
    fn finish(&self, terminal: u8) -> bool {
        self.state
            .compare_exchange(RUNNING, terminal, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn cancel(&self) -> bool {
        self.finish(CANCELLED)
    }

    fn complete(&self) -> bool {
        self.finish(COMPLETED)
    }
}

/// A caller's view of a run
///
/// Dropping the handle does not stop the run.
#[derive(Clone, Debug)]
pub struct RunHandle {
    id: RunId,
    shared: Arc<RunShared>,
}

impl RunHandle {
    pub(crate) fn new(id: RunId, shared: Arc<RunShared>) -> Self {
        Self { id, shared }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn state(&self) -> RunState {
        self.shared.state()
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    pub fn is_completed(&self) -> bool {
        self.state() == RunState::Completed
    }

    /// Stop the run before its next tick
    ///
    /// No further progress or completion callbacks are delivered.
    /// Returns `false` if the run had already completed or been cancelled.
    pub fn cancel(&self) -> bool {
        self.shared.cancel()
    }
}

/// Result of ticking a run once
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StepOutcome {
    /// Wants another tick
    Pending,
    /// Completed or cancelled; drop it
    Finished,
}

/// A live run owned by the scheduler
pub(crate) struct AnimationRun {
    id: RunId,
    start_ms: f64,
    tween: Tween,
    on_progress: ProgressCallback,
    on_complete: Option<CompleteCallback>,
    shared: Arc<RunShared>,
}

impl AnimationRun {
    pub(crate) fn new(id: RunId, start_ms: f64, spec: ResolvedSpec, shared: Arc<RunShared>) -> Self {
        Self {
            id,
            start_ms,
            tween: spec.tween,
            on_progress: spec.on_progress,
            on_complete: Some(spec.on_complete),
            shared,
        }
    }

    pub(crate) fn id(&self) -> RunId {
        self.id
    }

    pub(crate) fn state(&self) -> RunState {
        self.shared.state()
    }

    pub(crate) fn cancel(&self) -> bool {
        self.shared.cancel()
    }

    /// Advance to `now_ms`, delivering progress and, on the final frame, completion
    pub(crate) fn step(&mut self, now_ms: f64) -> StepOutcome {
        if self.state() != RunState::Running {
            return StepOutcome::Finished;
        }

        let elapsed = now_ms - self.start_ms;
        let frame = self.tween.sample(elapsed);
        (self.on_progress)(&frame.values);

        if !frame.is_final() {
            // The progress callback may have cancelled this run
            return if self.state() == RunState::Running {
                StepOutcome::Pending
            } else {
                StepOutcome::Finished
            };
        }

        if self.shared.complete() {
            if let Some(on_complete) = self.on_complete.take() {
                on_complete(elapsed);
            }
        }
        StepOutcome::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::tween::AnimationSpec;
    use slotmap::SlotMap;
    use std::sync::Mutex;

    fn make_run(spec: AnimationSpec, start_ms: f64) -> (AnimationRun, RunHandle) {
        let mut ids: SlotMap<RunId, ()> = SlotMap::with_key();
        let id = ids.insert(());
        let shared = Arc::new(RunShared::new());
        let run = AnimationRun::new(id, start_ms, spec.resolve().unwrap(), Arc::clone(&shared));
        (run, RunHandle::new(id, shared))
    }

    #[test]
    fn test_step_until_complete() {
        let completions = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&completions);
        let (mut run, handle) = make_run(
            AnimationSpec::new()
                .from([("a", 0.0)])
                .to([("a", 10.0)])
                .duration_ms(100.0)
                .on_complete(move |ms| sink.lock().unwrap().push(ms)),
            1000.0,
        );

        assert_eq!(run.step(1050.0), StepOutcome::Pending);
        assert!(handle.is_running());
        assert_eq!(run.step(1120.0), StepOutcome::Finished);
        assert!(handle.is_completed());
        assert_eq!(*completions.lock().unwrap(), vec![120.0]);

        // A finished run never calls back again
        assert_eq!(run.step(1200.0), StepOutcome::Finished);
        assert_eq!(completions.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_cancelled_run_is_silent() {
        let ticks = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&ticks);
        let (mut run, handle) = make_run(
            AnimationSpec::new()
                .easing(Easing::InSine)
                .on_progress(move |_| *sink.lock().unwrap() += 1),
            0.0,
        );

        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert_eq!(run.step(1000.0), StepOutcome::Finished);
        assert_eq!(*ticks.lock().unwrap(), 0);
        assert_eq!(handle.state(), RunState::Cancelled);
    }

    #[test]
    fn test_cancel_after_complete_fails() {
        let (mut run, handle) = make_run(AnimationSpec::new().duration_ms(10.0), 0.0);
        run.step(10.0);
        assert!(!handle.cancel());
        assert_eq!(handle.state(), RunState::Completed);
    }
}

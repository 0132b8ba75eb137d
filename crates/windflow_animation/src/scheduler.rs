//! Animation scheduler
//!
//! Owns every in-flight animation run and advances them once per frame.
//! A frame is one call to [`AnimationScheduler::tick`], made either by the
//! host (typically from its redraw handler) or by the scheduler's own
//! background thread.
//!
//! Runs tick in the order they were started, so when two runs write the same
//! target the later one wins. A run started while a frame is being processed
//! (for example from inside another run's callback) first ticks on the next
//! frame. No lock is held while callbacks execute, so callbacks may start or
//! cancel runs freely. A callback that panics takes down only its own run.
//!
//! Frames are meant to come from one ticker at a time: either the host calls
//! `tick()` or the background thread is running, not both.

use crate::clock::{Clock, SystemClock};
use crate::error::{AnimationError, Result};
use crate::run::{AnimationRun, RunHandle, RunId, RunShared, RunState, StepOutcome};
use crate::tween::AnimationSpec;
use slotmap::SlotMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

// ============================================================================
// Global Animation Scheduler State
// ============================================================================

/// Global scheduler handle for access from anywhere in the application
static GLOBAL_SCHEDULER: OnceLock<SchedulerHandle> = OnceLock::new();

/// Set the global animation scheduler handle
///
/// Call once at startup after creating the [`AnimationScheduler`].
pub fn set_global_scheduler(handle: SchedulerHandle) -> Result<()> {
    GLOBAL_SCHEDULER
        .set(handle)
        .map_err(|_| AnimationError::AlreadyInitialized)
}

/// Get the global scheduler (returns None if not initialized)
pub fn try_get_scheduler() -> Option<SchedulerHandle> {
    GLOBAL_SCHEDULER.get().cloned()
}

/// Check if the global scheduler has been initialized
pub fn is_scheduler_initialized() -> bool {
    GLOBAL_SCHEDULER.get().is_some()
}

/// Start an animation run on the global scheduler
///
/// Returns immediately; the run advances on subsequent frames.
///
/// # Example
///
/// ```ignore
/// use windflow_animation::{animate, AnimationSpec, Easing};
///
/// let run = animate(
///     AnimationSpec::new()
///         .from([("offset", -280.0)])
///         .to([("offset", 0.0)])
///         .easing(Easing::InSine)
///         .on_progress(|values| println!("{:?}", values.get("offset"))),
/// )?;
/// ```
pub fn animate(spec: AnimationSpec) -> Result<RunHandle> {
    try_get_scheduler()
        .ok_or(AnimationError::SchedulerUnavailable)?
        .animate(spec)
}

/// Callback type for waking up the host's event loop
///
/// Called when a run is started and, in background mode, on every frame with
/// active runs. The callback should ask the host to deliver a frame, e.g. by
/// posting a message to the thread that draws.
pub type WakeCallback = Arc<dyn Fn() + Send + Sync>;

/// Internal state of the animation scheduler
struct SchedulerInner {
    clock: Arc<dyn Clock>,
    /// Live runs, for lookup by id while the run body is being ticked
    registry: SlotMap<RunId, Arc<RunShared>>,
    /// Run bodies in start order
    queue: Vec<AnimationRun>,
    frame: u64,
    target_fps: u32,
    suspended: bool,
    needs_redraw: Arc<AtomicBool>,
    wake_callback: Option<WakeCallback>,
}

impl SchedulerInner {
    /// Counted from the registry, which also covers the batch a frame has taken out of `queue`
    fn running(&self) -> impl Iterator<Item = &Arc<RunShared>> {
        self.registry
            .values()
            .filter(|shared| shared.state() == RunState::Running)
    }

    fn is_active(&self) -> bool {
        self.running().next().is_some()
    }
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    // Callbacks never run under this lock and their panics are caught, so a
    // poisoned guard still holds consistent data
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

fn register(inner: &Mutex<SchedulerInner>, spec: AnimationSpec) -> Result<RunHandle> {
    let resolved = spec.resolve()?;

    let (handle, wake, start_ms) = {
        let mut guard = lock(inner);
        let start_ms = guard.clock.now_ms();
        let shared = Arc::new(RunShared::new());
        let id = guard.registry.insert(Arc::clone(&shared));
        guard
            .queue
            .push(AnimationRun::new(id, start_ms, resolved, Arc::clone(&shared)));
        guard.needs_redraw.store(true, Ordering::Release);
        (
            RunHandle::new(id, shared),
            guard.wake_callback.clone(),
            start_ms,
        )
    };

    tracing::debug!(run = ?handle.id(), start_ms, "animation run started");

    if let Some(wake) = wake {
        wake();
    }
    Ok(handle)
}

/// Advance every run by one frame. Returns true if runs remain active.
fn tick_shared(inner: &Mutex<SchedulerInner>) -> bool {
    let (now_ms, batch) = {
        let mut guard = lock(inner);
        if guard.suspended {
            return guard.is_active();
        }
        guard.frame += 1;
        (guard.clock.now_ms(), std::mem::take(&mut guard.queue))
    };

    let mut pending = Vec::with_capacity(batch.len());
    let mut finished = Vec::new();
    for mut run in batch {
        match panic::catch_unwind(AssertUnwindSafe(|| run.step(now_ms))) {
            Ok(StepOutcome::Pending) => pending.push(run),
            Ok(StepOutcome::Finished) => {
                tracing::trace!(run = ?run.id(), state = ?run.state(), now_ms, "animation run finished");
                finished.push(run.id());
            }
            Err(_) => {
                // A panic inside on_complete leaves the run Completed
                run.cancel();
                tracing::warn!(run = ?run.id(), state = ?run.state(), "animation callback panicked, run dropped");
                finished.push(run.id());
            }
        }
    }

    let mut guard = lock(inner);
    for id in finished {
        guard.registry.remove(id);
    }
    // Runs started by callbacks during this frame go after the survivors
    let started_this_frame = std::mem::replace(&mut guard.queue, pending);
    guard.queue.extend(started_this_frame);
    guard.is_active()
}

/// The animation scheduler that ticks all active runs
///
/// This is typically held by the application and shared via [`SchedulerHandle`].
///
/// # Background Thread Mode
///
/// The scheduler can run on its own background thread via `start_background()`,
/// ticking at the target frame rate (default 120fps).
///
/// ```ignore
/// let mut scheduler = AnimationScheduler::new();
/// scheduler.set_wake_callback(move || {
///     let _ = redraw_tx.send(());
/// });
/// scheduler.start_background();
/// ```
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Stop signal for background thread
    stop_flag: Arc<AtomicBool>,
    /// Set whenever runs are active; the host checks and clears it to request redraws
    needs_redraw: Arc<AtomicBool>,
    /// Background thread handle (if running)
    thread_handle: Option<JoinHandle<()>>,
}

impl AnimationScheduler {
    /// Create a scheduler measuring time with the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Create a scheduler with a custom time source
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let needs_redraw = Arc::new(AtomicBool::new(false));
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                clock,
                registry: SlotMap::with_key(),
                queue: Vec::new(),
                frame: 0,
                target_fps: 120,
                suspended: false,
                needs_redraw: Arc::clone(&needs_redraw),
                wake_callback: None,
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            needs_redraw,
            thread_handle: None,
        }
    }

    /// Set a wake callback that is called when runs need a frame
    pub fn set_wake_callback<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        lock(&self.inner).wake_callback = Some(Arc::new(callback));
    }

    /// Start ticking on a background thread at the target frame rate
    ///
    /// Callbacks then execute on that thread.
    pub fn start_background(&mut self) {
        if self.thread_handle.is_some() {
            return; // Already running
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let needs_redraw = Arc::clone(&self.needs_redraw);
        let fps = lock(&self.inner).target_fps.max(1);

        tracing::debug!(fps, "animation scheduler: starting background thread");

        self.thread_handle = Some(thread::spawn(move || {
            let frame_duration = Duration::from_micros(1_000_000 / u64::from(fps));

            while !stop_flag.load(Ordering::Relaxed) {
                let start = Instant::now();

                if tick_shared(&inner) {
                    needs_redraw.store(true, Ordering::Release);
                    let wake = lock(&inner).wake_callback.clone();
                    if let Some(wake) = wake {
                        wake();
                    }
                }

                // Sleep for remaining frame time
                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        }));
    }

    /// Stop the background thread
    pub fn stop_background(&mut self) {
        // Clones share the stop flag but never own the thread
        let Some(handle) = self.thread_handle.take() else {
            return;
        };
        self.stop_flag.store(true, Ordering::Relaxed);
        if handle.join().is_err() {
            tracing::warn!("animation scheduler: background thread panicked");
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    /// Check if the background thread is running
    pub fn is_background_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Check and clear the needs_redraw flag
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }

    /// Manually request a redraw
    pub fn request_redraw(&self) {
        self.needs_redraw.store(true, Ordering::Release);
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Frame rate of the background thread; takes effect on the next `start_background()`
    pub fn set_target_fps(&mut self, fps: u32) {
        lock(&self.inner).target_fps = fps;
    }

    pub fn target_fps(&self) -> u32 {
        lock(&self.inner).target_fps
    }

    /// Pause or resume frame delivery
    ///
    /// While suspended, `tick()` does nothing and runs make no progress. Time
    /// keeps flowing, so on resume runs jump to where the clock says they are.
    pub fn set_suspended(&self, suspended: bool) {
        tracing::debug!(suspended, "animation scheduler: suspend state changed");
        lock(&self.inner).suspended = suspended;
    }

    pub fn is_suspended(&self) -> bool {
        lock(&self.inner).suspended
    }

    /// Start an animation run
    pub fn animate(&self, spec: AnimationSpec) -> Result<RunHandle> {
        register(&self.inner, spec)
    }

    /// Tick all runs
    ///
    /// Returns true if any runs are still active (need another tick).
    pub fn tick(&self) -> bool {
        tick_shared(&self.inner)
    }

    /// Check if any runs are still active
    pub fn has_active_animations(&self) -> bool {
        lock(&self.inner).is_active()
    }

    /// Number of runs that have not yet completed or been cancelled
    ///
    /// Runs that another thread is ticking right now are included.
    pub fn active_count(&self) -> usize {
        lock(&self.inner).running().count()
    }

    /// Number of frames processed so far
    pub fn frame_count(&self) -> u64 {
        lock(&self.inner).frame
    }

    /// Cancel every in-flight run
    pub fn cancel_all(&self) {
        cancel_all(&self.inner);
    }
}

fn cancel_all(inner: &Mutex<SchedulerInner>) {
    let guard = lock(inner);
    let cancelled = guard.registry.values().filter(|shared| shared.cancel()).count();
    tracing::debug!(cancelled, "animation scheduler: cancelled all runs");
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for AnimationScheduler {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            stop_flag: Arc::clone(&self.stop_flag),
            needs_redraw: Arc::clone(&self.needs_redraw),
            // Cloned scheduler doesn't own the background thread
            thread_handle: None,
        }
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        // Stop background thread when scheduler is dropped
        self.stop_background();
    }
}

/// A weak handle to the animation scheduler
///
/// Passed to components that start runs. It won't keep the scheduler alive.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Start an animation run
    pub fn animate(&self, spec: AnimationSpec) -> Result<RunHandle> {
        let inner = self
            .inner
            .upgrade()
            .ok_or(AnimationError::SchedulerUnavailable)?;
        register(&inner, spec)
    }

    /// State of a run still owned by the scheduler
    ///
    /// Returns None once the scheduler has dropped the run.
    pub fn run_state(&self, id: RunId) -> Option<RunState> {
        self.inner
            .upgrade()
            .and_then(|inner| lock(&inner).registry.get(id).map(|shared| shared.state()))
    }

    /// Cancel a run by id. Returns false if it was not running.
    pub fn cancel(&self, id: RunId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| lock(&inner).registry.get(id).map(|shared| shared.cancel()))
            .unwrap_or(false)
    }

    /// Cancel every in-flight run
    pub fn cancel_all(&self) {
        if let Some(inner) = self.inner.upgrade() {
            cancel_all(&inner);
        }
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

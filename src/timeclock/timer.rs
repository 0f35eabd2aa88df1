use std::{cell::Cell, rc::Rc, sync::Arc, time::Duration};

use tracing::{debug, trace};

use crate::utils::clock::Clock;

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Stopped,
    Running,
}

/// Accumulated minutes. Clones share the same counter, which is how the controller lends it to
/// its timer.
#[derive(Debug, Clone, Default)]
pub struct ElapsedMinutes(Rc<Cell<u64>>);

impl ElapsedMinutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }

    fn increment(&self) -> u64 {
        let next = self.0.get().saturating_add(1);
        self.0.set(next);
        next
    }
}

/// Receives the counter value after every tick.
pub trait TickObserver {
    fn on_tick(&self, elapsed_minutes: u64);
}

impl<F: Fn(u64)> TickObserver for F {
    fn on_tick(&self, elapsed_minutes: u64) {
        self(elapsed_minutes)
    }
}

/// State visible to both the timer handle and its tick chain. Every `start` opens a new run, and
/// a tick only counts if it was scheduled by the run that is still active.
#[derive(Debug, Default)]
struct RunState {
    state: Cell<TimerState>,
    run: Cell<u64>,
}

impl RunState {
    fn is_current(&self, run: u64) -> bool {
        self.state.get() == TimerState::Running && self.run.get() == run
    }
}

/// Adds a minute to [ElapsedMinutes] once per period while running.
///
/// Ticks are deferred tasks on the current [tokio::task::LocalSet], so the counter and the
/// observer never leave the thread that owns the display. Stopping doesn't cancel the pending
/// task; instead the task checks at fire time whether its run is still the active one and quietly
/// ends otherwise.
pub struct ElapsedTimer {
    run_state: Rc<RunState>,
    counter: ElapsedMinutes,
    observer: Rc<dyn TickObserver>,
    clock: Arc<dyn Clock>,
    period: Duration,
}

impl ElapsedTimer {
    pub fn new(
        counter: ElapsedMinutes,
        observer: Rc<dyn TickObserver>,
        clock: Arc<dyn Clock>,
        period: Duration,
    ) -> Self {
        Self {
            run_state: Rc::new(RunState::default()),
            counter,
            observer,
            clock,
            period,
        }
    }

    /// Starts counting, first tick lands one period from now. Does nothing if already running.
    ///
    /// # Panics
    ///
    /// Must be called from inside a [tokio::task::LocalSet].
    pub fn start(&mut self) {
        if self.is_running() {
            trace!("Timer is already running");
            return;
        }

        let run = self.run_state.run.get().wrapping_add(1);
        self.run_state.run.set(run);
        self.run_state.state.set(TimerState::Running);
        debug!(run, period = ?self.period, "Starting timer");

        tokio::task::spawn_local(tick_chain(
            run,
            self.run_state.clone(),
            self.counter.clone(),
            self.observer.clone(),
            self.clock.clone(),
            self.period,
        ));
    }

    /// Stops counting. The counter keeps its value.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        debug!(run = self.run_state.run.get(), "Stopping timer");
        self.run_state.state.set(TimerState::Stopped);
    }

    pub fn state(&self) -> TimerState {
        self.run_state.state.get()
    }

    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    pub fn elapsed(&self) -> u64 {
        self.counter.get()
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn tick_chain(
    run: u64,
    run_state: Rc<RunState>,
    counter: ElapsedMinutes,
    observer: Rc<dyn TickObserver>,
    clock: Arc<dyn Clock>,
    period: Duration,
) {
    loop {
        clock.sleep(period).await;

        if !run_state.is_current(run) {
            trace!(run, "Tick chain ended");
            return;
        }

        let elapsed = counter.increment();
        trace!(run, elapsed, "Tick");
        observer.on_tick(elapsed);
    }
}

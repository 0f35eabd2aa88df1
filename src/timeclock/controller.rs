use std::{rc::Rc, sync::Arc, time::Duration};

use tracing::{debug, info};

use crate::utils::clock::Clock;

use super::{
    format::format_elapsed,
    timer::{ElapsedMinutes, ElapsedTimer, TickObserver},
};

pub const CLOCK_IN_LABEL: &str = "Clock In";
pub const CLOCK_OUT_LABEL: &str = "Clock Out";

/// The two labels the controller writes to. Implementations are only ever called from the thread
/// that runs the controller.
#[cfg_attr(test, mockall::automock)]
pub trait DisplaySurface {
    fn set_button_label(&self, label: &str);

    fn set_elapsed_label(&self, label: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockSessionState {
    #[default]
    ClockedOut,
    ClockedIn,
}

impl ClockSessionState {
    /// Label of the control that leads out of this state.
    pub fn button_label(self) -> &'static str {
        match self {
            ClockSessionState::ClockedOut => CLOCK_IN_LABEL,
            ClockSessionState::ClockedIn => CLOCK_OUT_LABEL,
        }
    }
}

/// Owns the session state and the minute counter. The counter lives as long as the controller, so
/// clocking out and in again keeps adding to the same total.
pub struct ClockController {
    session: ClockSessionState,
    elapsed: ElapsedMinutes,
    timer: ElapsedTimer,
    display: Rc<dyn DisplaySurface>,
    clock: Arc<dyn Clock>,
}

impl ClockController {
    pub fn new(display: Rc<dyn DisplaySurface>, clock: Arc<dyn Clock>, period: Duration) -> Self {
        let elapsed = ElapsedMinutes::new();
        let timer = ElapsedTimer::new(
            elapsed.clone(),
            elapsed_label_writer(display.clone()),
            clock.clone(),
            period,
        );

        let session = ClockSessionState::default();
        display.set_button_label(session.button_label());
        display.set_elapsed_label(&format_elapsed(elapsed.get()));

        Self {
            session,
            elapsed,
            timer,
            display,
            clock,
        }
    }

    /// Flips between clocked in and clocked out and returns the new state.
    ///
    /// # Panics
    ///
    /// Clocking in starts the timer, which must happen inside a [tokio::task::LocalSet].
    pub fn toggle(&mut self) -> ClockSessionState {
        match self.session {
            ClockSessionState::ClockedOut => {
                self.timer.start();
                self.session = ClockSessionState::ClockedIn;
                info!(at = %self.clock.time(), total = self.elapsed.get(), "Clocked in");
            }
            ClockSessionState::ClockedIn => {
                self.timer.stop();
                self.session = ClockSessionState::ClockedOut;
                info!(at = %self.clock.time(), total = self.elapsed.get(), "Clocked out");
            }
        }
        self.display.set_button_label(self.session.button_label());

        debug_assert_eq!(
            self.session == ClockSessionState::ClockedIn,
            self.timer.is_running(),
            "Session and timer went out of sync"
        );
        self.session
    }

    pub fn session(&self) -> ClockSessionState {
        self.session
    }

    pub fn elapsed_minutes(&self) -> u64 {
        self.elapsed.get()
    }

    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.elapsed.get())
    }
}

fn elapsed_label_writer(display: Rc<dyn DisplaySurface>) -> Rc<dyn TickObserver> {
    Rc::new(move |minutes: u64| {
        let label = format_elapsed(minutes);
        debug!(minutes, %label, "Updating elapsed time");
        display.set_elapsed_label(&label);
    })
}

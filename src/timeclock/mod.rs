//! Clock-in/clock-out core. [controller::ClockController] drives an [timer::ElapsedTimer] that
//! adds a minute per period while clocked in, and every tick is rendered with
//! [format::format_elapsed].

pub mod controller;
pub mod format;
pub mod timer;

//! Simple clock-in/clock-out timer for the terminal. While clocked in, a counter goes up by one
//! every minute and is shown as `DD:HH:MM`. Nothing is saved; every run starts from zero.
//!

pub mod cli;
pub mod shell;
pub mod timeclock;
pub mod utils;

//! Peripheral cards shipped with the machine.
//!
//! Each card models just enough of its device to be wired into a slot; the
//! heavy lifting (disk nibblisation, printer rendering, 80-column output)
//! belongs to the frontend.

mod disk2;
mod langcard;
mod parallel;
mod ramfactor;
mod smartport;
mod thunderclock;
mod videoterm;

pub use disk2::{DiskII, DriveLights, LogDriveLights};
pub use langcard::LanguageCard;
pub use parallel::{Parallel, Printer, SharedPrinter};
pub use ramfactor::RamFactor;
pub use smartport::{SmartPort, SmartPortOptions};
pub use thunderclock::Thunderclock;
pub use videoterm::VideoTerm;

use std::cell::RefCell;
use std::rc::Rc;

use crate::cards::{DiskII, SharedPrinter, SmartPort};
use crate::machine::Apple2;

/// Everything a frontend needs once the machine is running.
pub struct Booted<'a> {
    pub machine: &'a Apple2,
    pub disk2: Rc<RefCell<DiskII>>,
    pub smartport: Rc<RefCell<SmartPort>>,
    pub printer: SharedPrinter,
}

/// UI / execution-loop layer started at the end of a successful boot.
pub trait Frontend {
    fn start(&mut self, booted: Booted<'_>);
}

/// Frontend without a display: logs the slot directory and returns.
#[derive(Debug, Default)]
pub struct HeadlessFrontend {
    started: bool,
}

impl HeadlessFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> bool {
        self.started
    }
}

impl Frontend for HeadlessFrontend {
    fn start(&mut self, booted: Booted<'_>) {
        let bus = booted.machine.bus();
        for slot in 0..crate::NUM_SLOTS {
            match bus.query(slot) {
                Some(card) => log::info!("Slot {}: {}", slot, card.borrow().name()),
                None => log::info!("Slot {}: (empty)", slot),
            }
        }
        log::info!(
            "Disk II expects {}-sector disks, render mode {:?}",
            booted.disk2.borrow().sectors().sectors(),
            booted.machine.options().render_mode
        );
        self.started = true;
    }
}

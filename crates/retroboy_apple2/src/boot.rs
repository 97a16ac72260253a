//! Startup sequence for the Apple II.
//!
//! ```text
//! Constructing -> AwaitingReady -> Installing -> Running
//!                       \
//!                        -> Failed
//! ```
//!
//! Waiting for the machine core is the only suspension point. Card
//! installation runs without yielding and builds the slot directory off to
//! the side, so the machine's bus is either empty or fully populated.

use std::cell::RefCell;
use std::rc::Rc;

use retroboy_common::PreferenceStore;

use crate::bus::{Bus, BusError};
use crate::card::{shared, CardCapabilities, SharedCard};
use crate::cards::{
    DiskII, DriveLights, LanguageCard, LogDriveLights, Parallel, Printer, RamFactor,
    SharedPrinter, SmartPort, SmartPortOptions, Thunderclock, VideoTerm,
};
use crate::config::resolve_from_prefs;
use crate::frontend::{Booted, Frontend};
use crate::machine::{Apple2, Apple2Options};
use crate::probe::{probe, requested_render_mode, RenderSurface};
use crate::rom::RomError;

/// Slot left empty by the standard layout.
pub const VACANT_SLOT: usize = 5;
/// Size of the RAMFactor expansion installed in slot 2.
pub const RAMFACTOR_SIZE: usize = 1024 * 1024;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CardKind {
    LanguageCard,
    Parallel,
    RamFactor,
    VideoTerm,
    Thunderclock,
    DiskII,
    SmartPort,
}

/// Standard slot assignments, in the order they are attached.
pub const SLOT_LAYOUT: [(usize, CardKind); 7] = [
    (0, CardKind::LanguageCard),
    (1, CardKind::Parallel),
    (2, CardKind::RamFactor),
    (4, CardKind::Thunderclock),
    (3, CardKind::VideoTerm),
    (6, CardKind::DiskII),
    (7, CardKind::SmartPort),
];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BootState {
    Constructing,
    AwaitingReady,
    Installing,
    Running,
    Failed,
}

#[derive(Debug, thiserror::Error)]
pub enum BootError {
    #[error("machine core rejected readiness: {0}")]
    ReadinessRejected(#[source] RomError),
    #[error("machine core dropped its readiness signal")]
    ReadinessDropped,
    #[error("boot already attempted (state {0:?}), a new sequencer is required")]
    AlreadyStarted(BootState),
    #[error("card installation failed: {0}")]
    Install(#[from] BusError),
}

/// Resolves the ROM profile and effective render mode before the machine
/// core is constructed.
pub fn configure(prefs: &mut dyn PreferenceStore, surface: &dyn RenderSurface) -> Apple2Options {
    let profile = resolve_from_prefs(prefs);
    let requested = requested_render_mode(prefs);
    let render_mode = probe(surface, requested, prefs);
    Apple2Options::builder()
        .profile(profile)
        .render_mode(render_mode)
        .build()
}

/// Cards built during installation, with typed handles for the frontend.
struct InstalledCards {
    language_card: Rc<RefCell<LanguageCard>>,
    parallel: Rc<RefCell<Parallel>>,
    ramfactor: Rc<RefCell<RamFactor>>,
    videoterm: Rc<RefCell<VideoTerm>>,
    thunderclock: Rc<RefCell<Thunderclock>>,
    disk2: Rc<RefCell<DiskII>>,
    smartport: Rc<RefCell<SmartPort>>,
    printer: SharedPrinter,
}

impl InstalledCards {
    fn card(&self, kind: CardKind) -> SharedCard {
        match kind {
            CardKind::LanguageCard => self.language_card.clone(),
            CardKind::Parallel => self.parallel.clone(),
            CardKind::RamFactor => self.ramfactor.clone(),
            CardKind::VideoTerm => self.videoterm.clone(),
            CardKind::Thunderclock => self.thunderclock.clone(),
            CardKind::DiskII => self.disk2.clone(),
            CardKind::SmartPort => self.smartport.clone(),
        }
    }
}

/// Drives one boot of one machine. A failed boot is final.
pub struct BootSequencer {
    machine: Apple2,
    state: BootState,
    drive_lights: Option<Box<dyn DriveLights>>,
}

impl BootSequencer {
    pub fn new(machine: Apple2) -> Self {
        Self {
            machine,
            state: BootState::Constructing,
            drive_lights: None,
        }
    }

    /// Routes Disk II activity lights to the frontend. Defaults to logging.
    pub fn with_drive_lights(mut self, lights: impl DriveLights + 'static) -> Self {
        self.drive_lights = Some(Box::new(lights));
        self
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    pub fn machine(&self) -> &Apple2 {
        &self.machine
    }

    pub fn into_machine(self) -> Apple2 {
        self.machine
    }

    /// Runs the sequence to completion and starts `frontend`.
    ///
    /// Waits for the machine core with no timeout. A rejected or dropped
    /// readiness signal leaves the bus empty and the sequencer `Failed`.
    pub async fn boot(&mut self, frontend: &mut dyn Frontend) -> Result<(), BootError> {
        if self.state != BootState::Constructing {
            return Err(BootError::AlreadyStarted(self.state));
        }

        let result = self.run(frontend).await;
        if let Err(err) = &result {
            self.state = BootState::Failed;
            log::error!("Boot failed: {}", err);
        }
        result
    }

    async fn run(&mut self, frontend: &mut dyn Frontend) -> Result<(), BootError> {
        let ready = self
            .machine
            .take_ready()
            .ok_or(BootError::ReadinessDropped)?;

        self.state = BootState::AwaitingReady;
        log::info!("Waiting for machine core");
        let roms = match ready.await {
            Ok(Ok(roms)) => roms,
            Ok(Err(err)) => return Err(BootError::ReadinessRejected(err)),
            Err(_) => return Err(BootError::ReadinessDropped),
        };
        self.machine.finish_init(roms);

        self.state = BootState::Installing;
        let cards = self.install()?;

        self.state = BootState::Running;
        log::info!("Boot complete, starting frontend");
        frontend.start(Booted {
            machine: &self.machine,
            disk2: cards.disk2,
            smartport: cards.smartport,
            printer: cards.printer,
        });
        Ok(())
    }

    /// Builds every card after the components it depends on.
    fn construct_cards(&mut self) -> InstalledCards {
        let options = self.machine.options();
        let sectors = options.profile.sector_format;

        let printer: SharedPrinter = Rc::new(RefCell::new(Printer::new()));
        let parallel = shared(Parallel::new(printer.clone()));

        let language_card = shared(LanguageCard::new(self.machine.system_rom()));
        let ramfactor = shared(RamFactor::new(RAMFACTOR_SIZE));
        let videoterm = shared(VideoTerm::new());
        let thunderclock = shared(Thunderclock::new());

        let lights = self
            .drive_lights
            .take()
            .unwrap_or_else(|| Box::new(LogDriveLights));
        let disk2 = shared(DiskII::new(self.machine.clock(), lights, sectors));

        let smartport = shared(SmartPort::new(
            self.machine.cpu(),
            SmartPortOptions { block: true },
        ));

        InstalledCards {
            language_card,
            parallel,
            ramfactor,
            videoterm,
            thunderclock,
            disk2,
            smartport,
            printer,
        }
    }

    /// Populates a staged bus, registers page handlers, then commits the
    /// bus to the machine in one assignment.
    fn install(&mut self) -> Result<InstalledCards, BootError> {
        let cards = self.construct_cards();

        let mut staged = Bus::new();
        for (slot, kind) in SLOT_LAYOUT {
            staged.attach(slot, cards.card(kind))?;
        }

        let cpu = self.machine.cpu();
        let mut cpu = cpu.borrow_mut();
        for (slot, card) in staged.occupied() {
            if card
                .borrow()
                .capabilities()
                .contains(CardCapabilities::MEMORY_MAPPED_IO)
            {
                log::debug!("Registering slot {} as page handler", slot);
                Bus::register_page_handler(card, &mut cpu)?;
            }
        }
        drop(cpu);

        self.machine.install_bus(staged);
        Ok(cards)
    }
}

#[cfg(test)]
mod tests;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tokio::sync::oneshot;
use typed_builder::TypedBuilder;

use crate::bus::Bus;
use crate::config::RomProfile;
use crate::cpu::{Cpu, SharedCpu};
use crate::probe::RenderMode;
use crate::rom::{LoadedRoms, RomError, SYSTEM_ROM_BASE};

/// Construction options for the machine core.
#[derive(TypedBuilder, Clone, Debug, Eq, PartialEq)]
pub struct Apple2Options {
    pub profile: RomProfile,
    #[builder(default = RenderMode::Accelerated)]
    pub render_mode: RenderMode,
}

/// Monotonic CPU cycle counter shared with timing-sensitive cards.
#[derive(Clone, Debug, Default)]
pub struct Clock(Rc<Cell<u64>>);

impl Clock {
    pub fn cycles(&self) -> u64 {
        self.0.get()
    }

    pub fn advance(&self, cycles: u64) {
        self.0.set(self.0.get().wrapping_add(cycles));
    }
}

/// Outcome delivered through the readiness signal.
pub type Readiness = Result<LoadedRoms, RomError>;

/// Sending half of the machine's readiness signal.
///
/// Dropping it without calling [`ReadySignal::resolve`] or
/// [`ReadySignal::reject`] also fails the boot.
#[derive(Debug)]
pub struct ReadySignal(oneshot::Sender<Readiness>);

impl ReadySignal {
    pub fn resolve(self, roms: LoadedRoms) {
        self.complete(Ok(roms));
    }

    pub fn reject(self, err: RomError) {
        self.complete(Err(err));
    }

    pub fn complete(self, result: Readiness) {
        if self.0.send(result).is_err() {
            log::debug!("Readiness signalled after the machine was dropped");
        }
    }
}

/// Machine core: memory map, processing unit and expansion bus.
///
/// The core is unusable until its readiness signal resolves with the ROM
/// images. Cards are installed by the boot sequencer afterwards.
pub struct Apple2 {
    options: Apple2Options,
    cpu: SharedCpu,
    bus: Bus,
    clock: Clock,
    roms: Option<LoadedRoms>,
    ready: Option<oneshot::Receiver<Readiness>>,
}

impl Apple2 {
    pub fn new(options: Apple2Options) -> (Self, ReadySignal) {
        let (tx, rx) = oneshot::channel();
        log::info!(
            "Apple2 init: rom '{}', character rom '{}', render mode {:?}",
            options.profile.rom_id,
            options.profile.character_rom_id,
            options.render_mode
        );
        let machine = Self {
            options,
            cpu: Rc::new(RefCell::new(Cpu::new())),
            bus: Bus::new(),
            clock: Clock::default(),
            roms: None,
            ready: Some(rx),
        };
        (machine, ReadySignal(tx))
    }

    pub fn options(&self) -> &Apple2Options {
        &self.options
    }

    pub fn cpu(&self) -> SharedCpu {
        self.cpu.clone()
    }

    pub fn clock(&self) -> Clock {
        self.clock.clone()
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// ROM images, available once the machine is ready.
    pub fn roms(&self) -> Option<&LoadedRoms> {
        self.roms.as_ref()
    }

    /// System ROM image, empty until the machine is ready.
    pub fn system_rom(&self) -> &[u8] {
        self.roms
            .as_ref()
            .map(|roms| roms.rom.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_ready(&self) -> bool {
        self.roms.is_some()
    }

    /// Takes the readiness receiver. Returns `None` on every call after the
    /// first.
    pub(crate) fn take_ready(&mut self) -> Option<oneshot::Receiver<Readiness>> {
        self.ready.take()
    }

    /// Completes internal initialisation with the loaded ROM images.
    pub(crate) fn finish_init(&mut self, roms: LoadedRoms) {
        self.cpu.borrow_mut().load(SYSTEM_ROM_BASE, &roms.rom);
        self.roms = Some(roms);
    }

    /// Replaces the whole slot directory in one step.
    pub(crate) fn install_bus(&mut self, bus: Bus) {
        self.bus = bus;
    }
}

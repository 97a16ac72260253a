use super::*;
use crate::config::{HardwareVariant, RomProfile};
use crate::machine::ReadySignal;
use crate::probe::{HeadlessSurface, ProbeOutcome, RenderMode};
use crate::rom::{LoadedRoms, SYSTEM_ROM_SIZE};
use crate::{NUM_SLOTS, PREF_COMPUTER_TYPE, PREF_GL_CANVAS};
use retroboy_common::MemoryPrefs;

/// ROM image whose bytes equal the low byte of their offset.
fn test_roms() -> LoadedRoms {
    let rom = (0..SYSTEM_ROM_SIZE).map(|i| i as u8).collect();
    LoadedRoms::new(&RomProfile::default(), rom, vec![0; 0x800]).unwrap()
}

fn new_machine(profile: RomProfile) -> (Apple2, ReadySignal) {
    Apple2::new(Apple2Options::builder().profile(profile).build())
}

#[derive(Default)]
struct RecordingFrontend {
    starts: u32,
    slots: Vec<Option<&'static str>>,
    sectors: u8,
    disk2: Option<Rc<RefCell<DiskII>>>,
    printer: Option<SharedPrinter>,
}

impl Frontend for RecordingFrontend {
    fn start(&mut self, booted: Booted<'_>) {
        self.starts += 1;
        let bus = booted.machine.bus();
        self.slots = (0..NUM_SLOTS)
            .map(|slot| bus.query(slot).map(|card| card.borrow().name()))
            .collect();
        self.sectors = booted.disk2.borrow().sectors().sectors();
        self.disk2 = Some(booted.disk2);
        self.printer = Some(booted.printer);
    }
}

#[tokio::test]
async fn successful_boot_fills_every_slot_but_five() {
    let (machine, ready) = new_machine(RomProfile::default());
    let mut sequencer = BootSequencer::new(machine);
    assert_eq!(sequencer.state(), BootState::Constructing);
    assert!(sequencer.machine().bus().is_empty());

    ready.resolve(test_roms());
    let mut frontend = RecordingFrontend::default();
    sequencer.boot(&mut frontend).await.unwrap();

    assert_eq!(sequencer.state(), BootState::Running);
    let bus = sequencer.machine().bus();
    for slot in [0, 1, 2, 3, 4, 6, 7] {
        assert!(bus.query(slot).is_some(), "slot {slot} should be occupied");
    }
    assert!(bus.query(VACANT_SLOT).is_none());

    assert_eq!(frontend.starts, 1);
    assert_eq!(
        frontend.slots,
        vec![
            Some("Language Card"),
            Some("Parallel"),
            Some("RAMFactor"),
            Some("VideoTerm"),
            Some("Thunderclock"),
            None,
            Some("Disk II"),
            Some("SmartPort"),
        ]
    );
    assert_eq!(frontend.sectors, 16);
}

#[tokio::test]
async fn language_card_serves_rom_through_cpu() {
    let (machine, ready) = new_machine(RomProfile::default());
    let mut sequencer = BootSequencer::new(machine);
    ready.resolve(test_roms());
    sequencer.boot(&mut RecordingFrontend::default()).await.unwrap();

    let cpu = sequencer.machine().cpu();
    let mut cpu = cpu.borrow_mut();
    assert_eq!(cpu.handler_count(), 1);
    assert_eq!(cpu.read(0xD005), 0x05);
    assert_eq!(cpu.read(0xFFFC), 0xFC);
}

#[tokio::test]
async fn parallel_card_prints_to_frontend_printer() {
    let (machine, ready) = new_machine(RomProfile::default());
    let mut sequencer = BootSequencer::new(machine);
    ready.resolve(test_roms());
    let mut frontend = RecordingFrontend::default();
    sequencer.boot(&mut frontend).await.unwrap();

    let parallel = sequencer.machine().bus().query(1).unwrap();
    parallel.borrow_mut().io_write(0, b'A' | 0x80);
    let printer = frontend.printer.unwrap();
    assert_eq!(printer.borrow().text(), "A");
}

#[tokio::test]
async fn disk_controller_uses_profile_sector_format() {
    let (machine, ready) = new_machine(HardwareVariant::Apple213.profile());
    let mut sequencer = BootSequencer::new(machine);
    ready.resolve(test_roms());
    let mut frontend = RecordingFrontend::default();
    sequencer.boot(&mut frontend).await.unwrap();
    assert_eq!(frontend.sectors, 13);
}

#[tokio::test]
async fn boot_suspends_until_ready() {
    let (machine, ready) = new_machine(RomProfile::default());
    let mut sequencer = BootSequencer::new(machine);
    let mut frontend = RecordingFrontend::default();

    let signal = async move {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        ready.resolve(test_roms());
    };
    let (result, ()) = tokio::join!(sequencer.boot(&mut frontend), signal);

    result.unwrap();
    assert_eq!(sequencer.state(), BootState::Running);
    assert_eq!(frontend.starts, 1);
}

#[tokio::test]
async fn rejected_readiness_leaves_bus_empty() {
    let (machine, ready) = new_machine(RomProfile::default());
    let mut sequencer = BootSequencer::new(machine);
    ready.reject(RomError::Empty {
        id: "apple2_char".to_string(),
    });

    let mut frontend = RecordingFrontend::default();
    let err = sequencer.boot(&mut frontend).await.unwrap_err();

    assert!(matches!(
        err,
        BootError::ReadinessRejected(RomError::Empty { .. })
    ));
    assert_eq!(sequencer.state(), BootState::Failed);
    assert!(sequencer.machine().bus().is_empty());
    assert!(!sequencer.machine().is_ready());
    assert_eq!(sequencer.machine().cpu().borrow().handler_count(), 0);
    assert_eq!(frontend.starts, 0);
}

#[tokio::test]
async fn dropped_readiness_signal_fails_boot() {
    let (machine, ready) = new_machine(RomProfile::default());
    let mut sequencer = BootSequencer::new(machine);
    drop(ready);

    let mut frontend = RecordingFrontend::default();
    let err = sequencer.boot(&mut frontend).await.unwrap_err();
    assert!(matches!(err, BootError::ReadinessDropped));
    assert_eq!(sequencer.state(), BootState::Failed);
    assert!(sequencer.machine().bus().is_empty());
    assert_eq!(frontend.starts, 0);
}

#[tokio::test]
async fn failed_boot_is_not_retried() {
    let (machine, ready) = new_machine(RomProfile::default());
    let mut sequencer = BootSequencer::new(machine);
    drop(ready);
    let mut frontend = RecordingFrontend::default();
    sequencer.boot(&mut frontend).await.unwrap_err();

    let err = sequencer.boot(&mut frontend).await.unwrap_err();
    assert!(matches!(err, BootError::AlreadyStarted(BootState::Failed)));
    assert_eq!(sequencer.state(), BootState::Failed);
    assert!(sequencer.machine().bus().is_empty());
    assert_eq!(frontend.starts, 0);
}

#[tokio::test]
async fn completed_boot_cannot_run_twice() {
    let (machine, ready) = new_machine(RomProfile::default());
    let mut sequencer = BootSequencer::new(machine);
    ready.resolve(test_roms());
    let mut frontend = RecordingFrontend::default();
    sequencer.boot(&mut frontend).await.unwrap();

    let err = sequencer.boot(&mut frontend).await.unwrap_err();
    assert!(matches!(err, BootError::AlreadyStarted(BootState::Running)));
    assert_eq!(frontend.starts, 1);
}

#[tokio::test]
async fn custom_drive_lights_reach_disk_controller() {
    #[derive(Clone, Default)]
    struct Lights(Rc<RefCell<Vec<(u8, bool)>>>);

    impl DriveLights for Lights {
        fn set_light(&mut self, drive: u8, on: bool) {
            self.0.borrow_mut().push((drive, on));
        }
    }

    let lights = Lights::default();
    let (machine, ready) = new_machine(RomProfile::default());
    let mut sequencer = BootSequencer::new(machine).with_drive_lights(lights.clone());
    ready.resolve(test_roms());
    sequencer.boot(&mut RecordingFrontend::default()).await.unwrap();

    let disk = sequencer.machine().bus().query(6).unwrap();
    disk.borrow_mut().io_read(0x9);
    assert_eq!(*lights.0.borrow(), vec![(1, true)]);
}

#[tokio::test]
async fn disk_controller_times_motor_with_machine_clock() {
    let (machine, ready) = new_machine(RomProfile::default());
    let clock = machine.clock();
    let mut sequencer = BootSequencer::new(machine);
    ready.resolve(test_roms());
    let mut frontend = RecordingFrontend::default();
    sequencer.boot(&mut frontend).await.unwrap();

    let disk = sequencer.machine().bus().query(6).unwrap();
    disk.borrow_mut().io_read(0x9);
    clock.advance(250);
    assert_eq!(frontend.disk2.unwrap().borrow().motor_cycles(), 250);
}

#[test]
fn slot_layout_is_fixed() {
    let slots: Vec<usize> = SLOT_LAYOUT.iter().map(|(slot, _)| *slot).collect();
    assert_eq!(slots, vec![0, 1, 2, 4, 3, 6, 7]);
    assert!(!slots.contains(&VACANT_SLOT));
}

#[test]
fn configure_resolves_profile_and_downgrades_render_mode() {
    let mut prefs = MemoryPrefs::with_values([(PREF_COMPUTER_TYPE, "apple2jplus")]);
    let options = configure(&mut prefs, &HeadlessSurface);

    assert_eq!(options.profile.rom_id, "apple2j");
    assert_eq!(options.profile.character_rom_id, "apple2j_char");
    assert_eq!(options.render_mode, RenderMode::Fallback);
    assert_eq!(prefs.read_pref(PREF_GL_CANVAS).as_deref(), Some("false"));
}

#[test]
fn configure_keeps_acceleration_on_capable_surface() {
    struct Capable;

    impl RenderSurface for Capable {
        fn probe_accelerated(&self, _extension: &str) -> ProbeOutcome {
            ProbeOutcome::Supported
        }
    }

    let mut prefs = MemoryPrefs::new();
    let options = configure(&mut prefs, &Capable);
    assert_eq!(
        options,
        Apple2Options::builder()
            .profile(RomProfile::default())
            .render_mode(RenderMode::Accelerated)
            .build()
    );
    assert_eq!(prefs.read_pref(PREF_GL_CANVAS), None);
}

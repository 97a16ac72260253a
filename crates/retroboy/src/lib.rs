use std::path::PathBuf;

use anyhow::{Context, Result};
use retroboy_apple2::rom::load_roms;
use retroboy_apple2::{
    configure, probe::HeadlessSurface, Apple2, BootError, BootSequencer, Frontend,
    HeadlessFrontend,
};
use retroboy_common::{FilePrefs, PreferenceStore};

pub enum EmulatorType {
    Apple2,
}

pub struct RunOptions {
    /// Directory holding `<rom id>.rom` images.
    pub rom_dir: PathBuf,
    /// Preference file; the platform config directory when `None`.
    pub prefs_path: Option<PathBuf>,
}

pub fn run(emulator: EmulatorType, options: RunOptions) -> Result<()> {
    match emulator {
        EmulatorType::Apple2 => {
            run_apple2(options)?;
        }
    }
    Ok(())
}

pub fn run_apple2(options: RunOptions) -> Result<()> {
    let mut prefs = match options.prefs_path {
        Some(path) => FilePrefs::open(path),
        None => FilePrefs::open_default()
            .context("could not determine the configuration directory")?,
    };
    log::info!("Using preferences at '{}'", prefs.path().display());

    let mut frontend = HeadlessFrontend::new();
    boot_apple2(&mut prefs, options.rom_dir, &mut frontend).context("Apple II boot failed")?;
    Ok(())
}

/// Configures, constructs and boots an Apple II, loading ROM images from
/// `rom_dir` on a blocking worker while the boot task waits.
pub fn boot_apple2(
    prefs: &mut dyn PreferenceStore,
    rom_dir: PathBuf,
    frontend: &mut dyn Frontend,
) -> Result<Apple2> {
    let options = configure(prefs, &HeadlessSurface);
    let profile = options.profile;
    let (machine, ready) = Apple2::new(options);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to create async runtime")?;

    let machine = runtime.block_on(async move {
        tokio::task::spawn_blocking(move || ready.complete(load_roms(&rom_dir, &profile)));

        let mut sequencer = BootSequencer::new(machine);
        sequencer.boot(frontend).await?;
        Ok::<Apple2, BootError>(sequencer.into_machine())
    })?;
    Ok(machine)
}

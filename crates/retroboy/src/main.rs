use std::path::PathBuf;

use retroboy::{EmulatorType, RunOptions};

const DEFAULT_APPLE2_ROM_DIR: &str = "assets/roms/apple2";

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut positional = Vec::new();
    let mut prefs_path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--prefs" => match args.next() {
                Some(path) => prefs_path = Some(PathBuf::from(path)),
                None => {
                    eprintln!("--prefs requires a path");
                    std::process::exit(1);
                }
            },
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let system = positional.next().unwrap_or_else(|| "apple2".to_string());
    let rom_dir = positional.next().unwrap_or_default();

    let emulator = match system.as_str() {
        "apple2" | "APPLE2" | "a2" => EmulatorType::Apple2,
        other => {
            eprintln!("Unknown system '{}'. Supported: apple2", other);
            std::process::exit(1);
        }
    };

    let rom_dir = if rom_dir.is_empty() {
        log::info!("No ROM directory provided, using '{}'", DEFAULT_APPLE2_ROM_DIR);
        PathBuf::from(DEFAULT_APPLE2_ROM_DIR)
    } else {
        log::info!("Loading ROMs from '{}'", rom_dir);
        PathBuf::from(rom_dir)
    };

    if let Err(err) = retroboy::run(emulator, RunOptions { rom_dir, prefs_path }) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

use std::path::{Path, PathBuf};

use crate::config::RomProfile;

/// System ROMs cover `$D000-$FFFF`.
pub const SYSTEM_ROM_SIZE: usize = 0x3000;
/// Load address of the system ROM.
pub const SYSTEM_ROM_BASE: u16 = 0xD000;
/// File extension of ROM images on disk.
pub const ROM_EXTENSION: &str = "rom";

#[derive(Debug, thiserror::Error)]
pub enum RomError {
    #[error("failed to read ROM image '{id}' from {path}: {source}")]
    Read {
        id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("ROM image '{id}' is {actual} bytes, expected {expected}")]
    BadSize {
        id: String,
        expected: usize,
        actual: usize,
    },
    #[error("ROM image '{id}' is empty")]
    Empty { id: String },
}

/// ROM images the machine needs before it can run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoadedRoms {
    pub rom: Vec<u8>,
    pub character_rom: Vec<u8>,
}

impl LoadedRoms {
    /// Checks image sizes and wraps them.
    pub fn new(profile: &RomProfile, rom: Vec<u8>, character_rom: Vec<u8>) -> Result<Self, RomError> {
        if rom.len() != SYSTEM_ROM_SIZE {
            return Err(RomError::BadSize {
                id: profile.rom_id.to_string(),
                expected: SYSTEM_ROM_SIZE,
                actual: rom.len(),
            });
        }
        if character_rom.is_empty() {
            return Err(RomError::Empty {
                id: profile.character_rom_id.to_string(),
            });
        }
        Ok(Self { rom, character_rom })
    }
}

/// Path of the image named `id` inside `dir`.
pub fn rom_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(id).with_extension(ROM_EXTENSION)
}

fn read_image(dir: &Path, id: &str) -> Result<Vec<u8>, RomError> {
    let path = rom_path(dir, id);
    std::fs::read(&path).map_err(|source| RomError::Read {
        id: id.to_string(),
        path,
        source,
    })
}

/// Loads both images selected by `profile` from `dir`.
///
/// Blocking; run it off the boot task.
pub fn load_roms(dir: &Path, profile: &RomProfile) -> Result<LoadedRoms, RomError> {
    let rom = read_image(dir, profile.rom_id)?;
    let character_rom = read_image(dir, profile.character_rom_id)?;
    log::info!(
        "Loaded ROM '{}' ({} bytes) and character ROM '{}' ({} bytes)",
        profile.rom_id,
        rom.len(),
        profile.character_rom_id,
        character_rom.len()
    );
    LoadedRoms::new(profile, rom, character_rom)
}

use std::fmt;

use retroboy_common::PreferenceStore;

use crate::PREF_COMPUTER_TYPE;

/// Disk sector layout expected by the Disk II controller ROM.
///
/// DOS 3.2 and earlier use 13 sectors per track; DOS 3.3 and ProDOS use 16.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum SectorFormat {
    Thirteen,
    #[default]
    Sixteen,
}

impl SectorFormat {
    pub const fn sectors(self) -> u8 {
        match self {
            SectorFormat::Thirteen => 13,
            SectorFormat::Sixteen => 16,
        }
    }
}

/// ROM selection for one boot: system ROM, character ROM and disk format.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RomProfile {
    pub rom_id: &'static str,
    pub character_rom_id: &'static str,
    pub sector_format: SectorFormat,
}

impl RomProfile {
    const fn new(
        rom_id: &'static str,
        character_rom_id: &'static str,
        sector_format: SectorFormat,
    ) -> Self {
        Self {
            rom_id,
            character_rom_id,
            sector_format,
        }
    }
}

impl Default for RomProfile {
    /// Applesoft (floating point BASIC) with the stock character set.
    fn default() -> Self {
        Self::new("fpbasic", "apple2_char", SectorFormat::Sixteen)
    }
}

/// Historical machine variants selectable from preferences.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum HardwareVariant {
    /// Integer BASIC Apple ][.
    Apple2,
    /// Integer BASIC Apple ][ with a 13-sector Disk II.
    Apple213,
    /// Original monitor ROM without autostart.
    Original,
    /// Japanese Apple ][ j-plus.
    Apple2JPlus,
    /// Applesoft with the "pig font" character set.
    Apple2Pig,
    /// Applesoft with the lower-case character generator.
    Apple2Lc,
}

impl HardwareVariant {
    pub const ALL: [HardwareVariant; 6] = [
        HardwareVariant::Apple2,
        HardwareVariant::Apple213,
        HardwareVariant::Original,
        HardwareVariant::Apple2JPlus,
        HardwareVariant::Apple2Pig,
        HardwareVariant::Apple2Lc,
    ];

    /// Parses a preference value. Matching is exact and case-sensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "apple2" => Some(HardwareVariant::Apple2),
            "apple213" => Some(HardwareVariant::Apple213),
            "original" => Some(HardwareVariant::Original),
            "apple2jplus" => Some(HardwareVariant::Apple2JPlus),
            "apple2pig" => Some(HardwareVariant::Apple2Pig),
            "apple2lc" => Some(HardwareVariant::Apple2Lc),
            _ => None,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            HardwareVariant::Apple2 => "apple2",
            HardwareVariant::Apple213 => "apple213",
            HardwareVariant::Original => "original",
            HardwareVariant::Apple2JPlus => "apple2jplus",
            HardwareVariant::Apple2Pig => "apple2pig",
            HardwareVariant::Apple2Lc => "apple2lc",
        }
    }

    pub const fn profile(self) -> RomProfile {
        match self {
            HardwareVariant::Apple2 => {
                RomProfile::new("intbasic", "apple2_char", SectorFormat::Sixteen)
            }
            HardwareVariant::Apple213 => {
                RomProfile::new("intbasic", "apple2_char", SectorFormat::Thirteen)
            }
            HardwareVariant::Original => {
                RomProfile::new("original", "apple2_char", SectorFormat::Sixteen)
            }
            HardwareVariant::Apple2JPlus => {
                RomProfile::new("apple2j", "apple2j_char", SectorFormat::Sixteen)
            }
            HardwareVariant::Apple2Pig => {
                RomProfile::new("fpbasic", "pigfont_char", SectorFormat::Sixteen)
            }
            HardwareVariant::Apple2Lc => {
                RomProfile::new("fpbasic", "apple2lc_char", SectorFormat::Sixteen)
            }
        }
    }
}

impl fmt::Display for HardwareVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Maps a hardware-variant preference value to its ROM profile.
///
/// Unknown or absent values resolve to [`RomProfile::default`]; this never
/// fails.
pub fn resolve(value: Option<&str>) -> RomProfile {
    value
        .and_then(HardwareVariant::from_key)
        .map(HardwareVariant::profile)
        .unwrap_or_default()
}

/// Reads the hardware variant from `prefs` and resolves it.
pub fn resolve_from_prefs(prefs: &dyn PreferenceStore) -> RomProfile {
    let value = prefs.read_pref(PREF_COMPUTER_TYPE);
    let profile = resolve(value.as_deref());
    log::info!(
        "Hardware variant {:?} -> rom '{}', character rom '{}', {} sectors",
        value,
        profile.rom_id,
        profile.character_rom_id,
        profile.sector_format.sectors()
    );
    profile
}

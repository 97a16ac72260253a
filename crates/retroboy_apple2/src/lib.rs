pub mod boot;
pub mod bus;
pub mod card;
pub mod cards;
pub mod config;
pub mod cpu;
pub mod frontend;
pub mod machine;
pub mod probe;
pub mod rom;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use boot::{configure, BootError, BootSequencer, BootState};
pub use bus::{Bus, BusError};
pub use card::{Card, CardCapabilities, PageHandler, SharedCard};
pub use config::{resolve, HardwareVariant, RomProfile, SectorFormat};
pub use frontend::{Booted, Frontend, HeadlessFrontend};
pub use machine::{Apple2, Apple2Options, ReadySignal};
pub use probe::{probe, ProbeOutcome, RenderMode, RenderSurface};
pub use rom::{LoadedRoms, RomError};

/// Number of expansion slots on the motherboard (0–7).
pub const NUM_SLOTS: usize = 8;

/// Preference key holding the hardware variant identifier.
pub const PREF_COMPUTER_TYPE: &str = "computer_type2";
/// Preference key holding the render mode as `"true"` / `"false"`.
pub const PREF_GL_CANVAS: &str = "gl_canvas";

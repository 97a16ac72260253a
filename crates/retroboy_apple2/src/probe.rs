//! Accelerated rendering capability check.
//!
//! The render mode preference only ever moves from accelerated to fallback.
//! Once a probe fails the downgrade is persisted and later boots skip the
//! probe entirely; re-enabling acceleration requires resetting the
//! preference by hand.

use retroboy_common::PreferenceStore;

use crate::PREF_GL_CANVAS;

/// Extension the accelerated renderer cannot work without.
pub const REQUIRED_EXTENSION: &str = "OES_texture_float";

const PREF_TRUE: &str = "true";
const PREF_FALSE: &str = "false";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RenderMode {
    Accelerated,
    Fallback,
}

impl RenderMode {
    /// Only the exact string `"true"` selects accelerated rendering.
    pub fn from_pref(value: &str) -> Self {
        if value == PREF_TRUE {
            RenderMode::Accelerated
        } else {
            RenderMode::Fallback
        }
    }

    pub const fn as_pref(self) -> &'static str {
        match self {
            RenderMode::Accelerated => PREF_TRUE,
            RenderMode::Fallback => PREF_FALSE,
        }
    }

    pub const fn is_accelerated(self) -> bool {
        matches!(self, RenderMode::Accelerated)
    }
}

/// Result of asking a surface for an accelerated context.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ProbeOutcome {
    Supported,
    /// No accelerated context could be created.
    NoContext,
    /// A context exists but lacks the required extension.
    MissingExtension,
}

/// Something that can be rendered to, e.g. a window or a canvas.
pub trait RenderSurface {
    fn probe_accelerated(&self, extension: &str) -> ProbeOutcome;
}

/// Surface with no accelerated backend at all.
#[derive(Copy, Clone, Debug, Default)]
pub struct HeadlessSurface;

impl RenderSurface for HeadlessSurface {
    fn probe_accelerated(&self, _extension: &str) -> ProbeOutcome {
        ProbeOutcome::NoContext
    }
}

/// Reads the requested render mode. Absent means accelerated.
pub fn requested_render_mode(prefs: &dyn PreferenceStore) -> RenderMode {
    RenderMode::from_pref(&prefs.get(PREF_GL_CANVAS, PREF_TRUE))
}

/// Pure ratchet: the effective mode is never better than the requested one.
pub fn decide(requested: RenderMode, outcome: ProbeOutcome) -> RenderMode {
    match (requested, outcome) {
        (RenderMode::Accelerated, ProbeOutcome::Supported) => RenderMode::Accelerated,
        _ => RenderMode::Fallback,
    }
}

/// Probes `surface` when acceleration is requested and persists a downgrade.
///
/// A fallback request skips the probe and leaves `prefs` untouched.
pub fn probe(
    surface: &dyn RenderSurface,
    requested: RenderMode,
    prefs: &mut dyn PreferenceStore,
) -> RenderMode {
    if requested == RenderMode::Fallback {
        return RenderMode::Fallback;
    }

    let outcome = surface.probe_accelerated(REQUIRED_EXTENSION);
    let effective = decide(requested, outcome);
    if effective != requested {
        log::warn!(
            "Accelerated rendering unavailable ({:?}), falling back",
            outcome
        );
        prefs.set(PREF_GL_CANVAS, effective.as_pref());
    }
    effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use retroboy_common::MemoryPrefs;
    use std::cell::Cell;

    struct FakeSurface {
        outcome: ProbeOutcome,
        calls: Cell<u32>,
    }

    impl FakeSurface {
        fn new(outcome: ProbeOutcome) -> Self {
            Self {
                outcome,
                calls: Cell::new(0),
            }
        }
    }

    impl RenderSurface for FakeSurface {
        fn probe_accelerated(&self, extension: &str) -> ProbeOutcome {
            assert_eq!(extension, REQUIRED_EXTENSION);
            self.calls.set(self.calls.get() + 1);
            self.outcome
        }
    }

    /// Counts writes so the "persist exactly once" rule can be checked.
    #[derive(Default)]
    struct CountingPrefs {
        inner: MemoryPrefs,
        writes: Vec<(String, String)>,
    }

    impl PreferenceStore for CountingPrefs {
        fn read_pref(&self, key: &str) -> Option<String> {
            self.inner.read_pref(key)
        }

        fn set(&mut self, key: &str, value: &str) {
            self.writes.push((key.to_string(), value.to_string()));
            self.inner.set(key, value);
        }
    }

    #[test]
    fn decision_never_upgrades() {
        for outcome in [
            ProbeOutcome::Supported,
            ProbeOutcome::NoContext,
            ProbeOutcome::MissingExtension,
        ] {
            assert_eq!(decide(RenderMode::Fallback, outcome), RenderMode::Fallback);
        }
        assert_eq!(
            decide(RenderMode::Accelerated, ProbeOutcome::Supported),
            RenderMode::Accelerated
        );
        assert_eq!(
            decide(RenderMode::Accelerated, ProbeOutcome::NoContext),
            RenderMode::Fallback
        );
    }

    #[test]
    fn supported_surface_keeps_acceleration_without_writing() {
        let surface = FakeSurface::new(ProbeOutcome::Supported);
        let mut prefs = CountingPrefs::default();
        let mode = probe(&surface, RenderMode::Accelerated, &mut prefs);
        assert_eq!(mode, RenderMode::Accelerated);
        assert!(prefs.writes.is_empty());
    }

    #[test]
    fn missing_extension_downgrades_and_persists_once() {
        let surface = FakeSurface::new(ProbeOutcome::MissingExtension);
        let mut prefs = CountingPrefs::default();

        let requested = requested_render_mode(&prefs);
        assert_eq!(requested, RenderMode::Accelerated);
        assert_eq!(probe(&surface, requested, &mut prefs), RenderMode::Fallback);
        assert_eq!(
            prefs.writes,
            vec![(PREF_GL_CANVAS.to_string(), "false".to_string())]
        );

        // Second probe in the same run sees the persisted fallback.
        let requested = requested_render_mode(&prefs);
        assert_eq!(requested, RenderMode::Fallback);
        assert_eq!(probe(&surface, requested, &mut prefs), RenderMode::Fallback);
        assert_eq!(prefs.writes.len(), 1);
        assert_eq!(surface.calls.get(), 1);
    }

    #[test]
    fn missing_context_downgrades() {
        let mut prefs = MemoryPrefs::new();
        let mode = probe(&HeadlessSurface, RenderMode::Accelerated, &mut prefs);
        assert_eq!(mode, RenderMode::Fallback);
        assert_eq!(prefs.read_pref(PREF_GL_CANVAS).as_deref(), Some("false"));
    }

    #[test]
    fn fallback_request_skips_probe() {
        let surface = FakeSurface::new(ProbeOutcome::Supported);
        let mut prefs = CountingPrefs::default();
        assert_eq!(
            probe(&surface, RenderMode::Fallback, &mut prefs),
            RenderMode::Fallback
        );
        assert_eq!(surface.calls.get(), 0);
        assert!(prefs.writes.is_empty());
    }

    #[test]
    fn only_exact_true_requests_acceleration() {
        assert_eq!(RenderMode::from_pref("true"), RenderMode::Accelerated);
        assert_eq!(RenderMode::from_pref("TRUE"), RenderMode::Fallback);
        assert_eq!(RenderMode::from_pref("false"), RenderMode::Fallback);
        assert_eq!(RenderMode::from_pref(""), RenderMode::Fallback);
    }
}

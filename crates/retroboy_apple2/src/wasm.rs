use js_sys::Object;
use retroboy_common::PreferenceStore;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Storage, WebGlRenderingContext};

use crate::boot::configure;
use crate::probe::{ProbeOutcome, RenderSurface};

/// `<canvas>` element probed for WebGL.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }

    /// Looks the canvas up by element id.
    pub fn from_id(id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let canvas = document
            .get_element_by_id(id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        Some(Self::new(canvas))
    }

    fn webgl_context(&self) -> Option<WebGlRenderingContext> {
        let context: Object = self.canvas.get_context("webgl").ok().flatten()?;
        context.dyn_into::<WebGlRenderingContext>().ok()
    }
}

impl RenderSurface for CanvasSurface {
    fn probe_accelerated(&self, extension: &str) -> ProbeOutcome {
        let Some(gl) = self.webgl_context() else {
            return ProbeOutcome::NoContext;
        };
        match gl.get_extension(extension) {
            Ok(Some(_)) => ProbeOutcome::Supported,
            _ => ProbeOutcome::MissingExtension,
        }
    }
}

/// Preferences kept in the browser's `localStorage`.
pub struct LocalStoragePrefs {
    storage: Storage,
}

impl LocalStoragePrefs {
    pub fn new() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl PreferenceStore for LocalStoragePrefs {
    fn read_pref(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(err) = self.storage.set_item(key, value) {
            log::warn!("Failed to store preference '{}': {:?}", key, err);
        }
    }
}

/// Runs configuration and the WebGL probe against the canvas with
/// `canvas_id`, returning whether accelerated rendering will be used.
#[wasm_bindgen]
pub fn probe_canvas(canvas_id: &str) -> Result<bool, JsValue> {
    let surface = CanvasSurface::from_id(canvas_id)
        .ok_or_else(|| JsValue::from_str("canvas element not found"))?;
    let mut prefs =
        LocalStoragePrefs::new().ok_or_else(|| JsValue::from_str("localStorage unavailable"))?;
    let options = configure(&mut prefs, &surface);
    Ok(options.render_mode.is_accelerated())
}

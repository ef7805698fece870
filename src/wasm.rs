//! WebAssembly bindings for the morphogenesis simulation.
//!
//! Provides a thin wrapper around [`Simulation`] for browser environments.
//! The host owns the canvas: it calls `tick` from `requestAnimationFrame`,
//! copies `pixels()` into an `ImageData` and draws the overlay strings.

use wasm_bindgen::prelude::*;

use crate::{
    interaction::{InputEvent, SurfaceRect},
    render::BufferSurface,
    schema::SimulationConfig,
    simulation::{Lifecycle, Simulation},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

/// WebAssembly wrapper for a [`Simulation`] drawing into an in-memory surface.
#[wasm_bindgen]
pub struct WasmSimulation {
    simulation: Simulation,
    surface: BufferSurface,
}

#[wasm_bindgen]
impl WasmSimulation {
    /// Create a simulation for a `width`×`height` canvas.
    ///
    /// # Arguments
    /// * `config_json` - JSON string containing SimulationConfig, or empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, width: usize, height: usize) -> Result<WasmSimulation, JsValue> {
        let config: SimulationConfig = if config_json.trim().is_empty() {
            SimulationConfig::default()
        } else {
            serde_json::from_str(config_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?
        };

        let simulation = Simulation::new(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;

        Ok(WasmSimulation {
            simulation,
            surface: BufferSurface::new(width, height),
        })
    }

    /// Bind to the canvas.
    #[wasm_bindgen]
    pub fn init(&mut self) {
        self.simulation.init(&self.surface);
    }

    /// Allocate buffers, seed and start accepting input.
    #[wasm_bindgen]
    pub fn start(&mut self) -> Result<(), JsValue> {
        self.simulation
            .start(&self.surface)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) {
        self.simulation.pause();
    }

    #[wasm_bindgen]
    pub fn resume(&mut self) {
        self.simulation.resume();
    }

    #[wasm_bindgen]
    pub fn destroy(&mut self) {
        self.simulation.destroy();
    }

    /// Canvas resized: rebuild and reseed at the new size.
    #[wasm_bindgen]
    pub fn resize(&mut self, width: usize, height: usize) {
        self.surface.set_size(width, height);
        self.simulation.resize(width, height);
    }

    /// Canvas placement from `getBoundingClientRect()`.
    #[wasm_bindgen(js_name = setBounds)]
    pub fn set_bounds(&mut self, left: f32, top: f32, width: f32, height: f32) {
        self.simulation.set_surface_bounds(SurfaceRect {
            left,
            top,
            width,
            height,
        });
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, client_x: f32, client_y: f32) {
        self.simulation
            .handle_input(InputEvent::PointerDown { x: client_x, y: client_y });
    }

    /// `explore` is the state of the explore modifier (Shift).
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, client_x: f32, client_y: f32, explore: bool) {
        self.simulation.handle_input(InputEvent::PointerMove {
            x: client_x,
            y: client_y,
            explore,
        });
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.simulation.handle_input(InputEvent::PointerUp);
    }

    #[wasm_bindgen(js_name = touchStart)]
    pub fn touch_start(&mut self, client_x: f32, client_y: f32) {
        self.simulation
            .handle_input(InputEvent::TouchStart { x: client_x, y: client_y });
    }

    #[wasm_bindgen(js_name = touchMove)]
    pub fn touch_move(&mut self, client_x: f32, client_y: f32) {
        self.simulation
            .handle_input(InputEvent::TouchMove { x: client_x, y: client_y });
    }

    #[wasm_bindgen(js_name = touchEnd)]
    pub fn touch_end(&mut self) {
        self.simulation.handle_input(InputEvent::TouchEnd);
    }

    #[wasm_bindgen(js_name = resetKey)]
    pub fn reset_key(&mut self) {
        self.simulation.handle_input(InputEvent::ResetKey);
    }

    /// Run one frame. Returns false when not running.
    #[wasm_bindgen]
    pub fn tick(&mut self, timestamp_ms: f64) -> bool {
        self.simulation.tick(timestamp_ms, &mut self.surface)
    }

    /// RGBA pixels of the last presented frame.
    #[wasm_bindgen]
    pub fn pixels(&self) -> js_sys::Uint8ClampedArray {
        js_sys::Uint8ClampedArray::from(self.surface.frame().pixels.as_slice())
    }

    #[wasm_bindgen(js_name = frameWidth)]
    pub fn frame_width(&self) -> usize {
        self.surface.frame().width
    }

    #[wasm_bindgen(js_name = frameHeight)]
    pub fn frame_height(&self) -> usize {
        self.surface.frame().height
    }

    /// Overlay status line, e.g. current feed and kill.
    #[wasm_bindgen(js_name = statusLine)]
    pub fn status_line(&self) -> Option<String> {
        self.surface.overlay().map(|o| o.status.clone())
    }

    /// Overlay control hints.
    #[wasm_bindgen(js_name = hintLine)]
    pub fn hint_line(&self) -> Option<String> {
        self.surface.overlay().map(|o| o.hint.to_string())
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.simulation.state() == Lifecycle::Running
    }

    /// Get field statistics as a JS object.
    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.simulation.stats())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Get current runtime parameters as a JS object.
    #[wasm_bindgen(js_name = getParams)]
    pub fn get_params(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.simulation.params())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Default configuration as JSON.
    #[wasm_bindgen(js_name = defaultConfig)]
    pub fn default_config() -> Result<String, JsValue> {
        serde_json::to_string(&SimulationConfig::default())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }
}

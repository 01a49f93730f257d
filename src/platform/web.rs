//! Browser bindings
//!
//! The page owns rendering, input and the interval timer. It calls
//! `update` on every timer tick, feeds tilt through `change_control` and
//! reads `state_json` to draw.

use wasm_bindgen::prelude::*;

use crate::sim::Game;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Logger may already be set when the module is re-instantiated
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Tilt Maze starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, layout: &str) -> Result<WebGame, JsValue> {
        let game = Game::new(width, height, layout).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WebGame { game })
    }

    #[wasm_bindgen(js_name = changeControl)]
    pub fn change_control(&mut self, ax: f64, ay: f64) {
        self.game.change_control(ax, ay);
    }

    pub fn update(&mut self, dt: f64) {
        self.game.update(dt);
    }

    pub fn ended(&self) -> bool {
        self.game.ended()
    }

    /// Snapshot as JSON: `{ ball, board, ended, won }`
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

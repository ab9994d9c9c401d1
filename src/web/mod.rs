//! `XlMatrix`, the WASM-exported entry point.
//!
//! Owns a [`Matrix`], a Canvas 2D surface and the DOM edit widgets. The
//! host page forwards pointer and keyboard events and calls `render` when
//! `needs_redraw` reports pending changes (typically from a
//! `requestAnimationFrame` loop).
//!
//! ```javascript
//! import init, { XlMatrix } from 'xlmatrix';
//! await init();
//! const m = new XlMatrix(canvas, JSON.stringify({ num_lin: 100, num_col: 8 }), devicePixelRatio);
//! m.set_attribute("1:1", "Hello");
//! m.render();
//! ```

mod canvas;
mod input;

pub use canvas::Canvas2D;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement};

use crate::config::MatrixConfig;
use crate::matrix::{Key, Matrix, MouseButton};
use crate::render::Canvas;
use crate::types::Modifiers;

use input::DomEditFactory;

/// DOM `KeyboardEvent.key` to a grid key.
fn dom_key(key: &str) -> Option<Key> {
    let key = match key {
        "ArrowUp" => Key::Up,
        "ArrowDown" => Key::Down,
        "ArrowLeft" => Key::Left,
        "ArrowRight" => Key::Right,
        "Home" => Key::Home,
        "End" => Key::End,
        "PageUp" => Key::PageUp,
        "PageDown" => Key::PageDown,
        "Tab" => Key::Tab,
        "Enter" => Key::Enter,
        "Escape" => Key::Escape,
        "F2" => Key::F2,
        "Delete" | "Backspace" => Key::Delete,
        " " => Key::Space,
        other => {
            let mut chars = other.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            Key::Char(c)
        }
    };
    Some(key)
}

fn dom_button(button: i16) -> MouseButton {
    match button {
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        _ => MouseButton::Left,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn px(v: f64) -> i32 {
    v.floor() as i32
}

/// The matrix control exported to JavaScript
#[wasm_bindgen]
pub struct XlMatrix {
    matrix: Matrix,
    surface: Canvas2D,
}

#[wasm_bindgen]
impl XlMatrix {
    /// Create a matrix drawing into `canvas`.
    ///
    /// `config` is an optional JSON [`MatrixConfig`]; missing fields keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        config: Option<String>,
        dpr: f64,
    ) -> Result<XlMatrix, JsValue> {
        console_error_panic_hook::set_once();

        let config = match config {
            Some(json) => MatrixConfig::from_json(&json)?,
            None => MatrixConfig::default(),
        };
        let container = canvas
            .parent_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let surface = Canvas2D::new(canvas.clone(), dpr)?;
        let metrics = Canvas2D::new(canvas, dpr)?;

        let mut matrix = Matrix::new(config);
        matrix.set_font_metrics(Box::new(metrics));
        matrix.set_edit_factory(Box::new(DomEditFactory::new(container)));
        let (w, h) = surface.size();
        matrix.resize(w, h);
        Ok(XlMatrix { matrix, surface })
    }

    /// Canvas backing store changed size (or the device pixel ratio did).
    pub fn resize(&mut self, dpr: f64) {
        self.surface.sync_size(dpr);
        let (w, h) = self.surface.size();
        self.matrix.resize(w, h);
    }

    pub fn render(&mut self) {
        self.matrix.draw(&mut self.surface);
    }

    pub fn needs_redraw(&self) -> bool {
        self.matrix.needs_redraw()
    }

    /// Set a toolkit attribute (`"NUMLIN"`, `"ADDLIN"`, `"2:3"`, `"BGCOLOR1:*"`, ...).
    pub fn set_attribute(&mut self, name: &str, value: Option<String>) -> Result<(), JsValue> {
        self.matrix.set_attribute(name, value.as_deref())?;
        Ok(())
    }

    pub fn get_attribute(&self, name: &str) -> Result<Option<String>, JsValue> {
        Ok(self.matrix.get_attribute(name)?)
    }

    /// Register a canvas (or offscreen-rendered bitmap) as a named image for `IMAGE` cells.
    pub fn register_image(&mut self, name: &str, image: HtmlCanvasElement) {
        self.surface.register_image(name, image);
        self.matrix.request_redraw();
    }

    pub fn on_mouse_down(
        &mut self,
        x: f64,
        y: f64,
        button: i16,
        shift: bool,
        ctrl: bool,
        double: bool,
    ) -> bool {
        self.matrix.mouse_press(
            px(x),
            px(y),
            dom_button(button),
            Modifiers { shift, ctrl },
            double,
        )
    }

    pub fn on_mouse_move(&mut self, x: f64, y: f64) -> bool {
        self.matrix.mouse_move(px(x), px(y))
    }

    pub fn on_mouse_up(&mut self, x: f64, y: f64, button: i16) -> bool {
        self.matrix.mouse_release(px(x), px(y), dom_button(button))
    }

    /// Wheel delta in notches (sign of `deltaY`), Shift scrolls columns.
    pub fn on_wheel(&mut self, notches: i32, shift: bool) -> bool {
        self.matrix.mouse_wheel(
            notches,
            Modifiers {
                shift,
                ctrl: false,
            },
        )
    }

    /// Handle `KeyboardEvent.key`. Returns true when the page should `preventDefault`.
    pub fn on_key_down(&mut self, key: &str, shift: bool, ctrl: bool) -> bool {
        let Some(key) = dom_key(key) else {
            return false;
        };
        self.matrix.key_press(key, Modifiers { shift, ctrl })
    }

    /// Current state (sizes, window, focus, marks, values) as a JS object.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.matrix.snapshot())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }
}

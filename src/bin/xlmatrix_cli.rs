//! CLI tool for xlmatrix - replays a JSON script against a matrix and
//! prints the resulting state as JSON
//!
//! Usage:
//!   xlmatrix_cli <script.json>              # Snapshot JSON to stdout
//!   xlmatrix_cli <script.json> -o out.json  # Snapshot JSON to file
//!   xlmatrix_cli <script.json> --ops        # Include the last frame's draw ops
//!
//! Script format:
//! ```json
//! {
//!   "config": { "num_lin": 20, "num_col": 5 },
//!   "size": [400, 300],
//!   "ops": [
//!     { "op": "set", "name": "1:1", "value": "Hello" },
//!     { "op": "click", "x": 60, "y": 30 },
//!     { "op": "key", "key": "down" },
//!     { "op": "scroll", "axis": "lin", "action": "page_inc" },
//!     { "op": "draw" }
//!   ]
//! }
//! ```
//!
//! Set `RUST_LOG=xlmatrix=debug` to trace what the matrix does.

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use xlmatrix::matrix::{Key, MouseButton};
use xlmatrix::render::DrawOp;
use xlmatrix::scrollbar::ScrollAction;
use xlmatrix::{Axis, Matrix, MatrixConfig, MatrixSnapshot, Modifiers, RecordingCanvas};

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Op {
    /// Attribute write; a missing value clears
    Set {
        name: String,
        #[serde(default)]
        value: Option<String>,
    },
    Click {
        x: i32,
        y: i32,
        #[serde(default)]
        button: MouseButton,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        double: bool,
    },
    Drag {
        from: (i32, i32),
        to: (i32, i32),
    },
    Key {
        key: Key,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        ctrl: bool,
    },
    Wheel {
        notches: i32,
        #[serde(default)]
        shift: bool,
    },
    Scroll {
        axis: Axis,
        action: ScrollAction,
    },
    Resize {
        width: i32,
        height: i32,
    },
    Draw,
}

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    config: MatrixConfig,
    #[serde(default = "default_size")]
    size: (i32, i32),
    #[serde(default)]
    ops: Vec<Op>,
}

fn default_size() -> (i32, i32) {
    (640, 480)
}

#[derive(Debug, Serialize)]
struct Output<'a> {
    #[serde(flatten)]
    snapshot: MatrixSnapshot,
    frames: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    ops: Option<&'a [DrawOp]>,
    /// Operations that failed, as `"index: error"`
    errors: Vec<String>,
}

fn run(script: Script) -> (Matrix, RecordingCanvas, Vec<String>) {
    let (width, height) = script.size;
    let mut matrix = Matrix::new(script.config);
    let mut canvas = RecordingCanvas::new(width, height);
    matrix.resize(width, height);
    let mut errors = Vec::new();

    for (index, op) in script.ops.into_iter().enumerate() {
        match op {
            Op::Set { name, value } => {
                if let Err(e) = matrix.set_attribute(&name, value.as_deref()) {
                    warn!(index, %name, error = %e, "attribute write failed");
                    errors.push(format!("{index}: {e}"));
                }
            }
            Op::Click {
                x,
                y,
                button,
                shift,
                ctrl,
                double,
            } => {
                let mods = Modifiers { shift, ctrl };
                matrix.mouse_press(x, y, button, mods, double);
                matrix.mouse_release(x, y, button);
            }
            Op::Drag { from, to } => {
                matrix.mouse_press(from.0, from.1, MouseButton::Left, Modifiers::NONE, false);
                matrix.mouse_move(to.0, to.1);
                matrix.mouse_release(to.0, to.1, MouseButton::Left);
            }
            Op::Key { key, shift, ctrl } => {
                matrix.key_press(key, Modifiers { shift, ctrl });
            }
            Op::Wheel { notches, shift } => {
                matrix.mouse_wheel(notches, Modifiers { shift, ctrl: false });
            }
            Op::Scroll { axis, action } => matrix.scroll(axis, action),
            Op::Resize {
                width: w,
                height: h,
            } => {
                canvas = RecordingCanvas::new(w, h);
                matrix.resize(w, h);
            }
            Op::Draw => matrix.draw(&mut canvas),
        }
    }
    (matrix, canvas, errors)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(input_path) = args.get(1) else {
        eprintln!("Usage: xlmatrix_cli <script.json> [-o output.json] [--ops]");
        std::process::exit(1);
    };
    let output_path = args
        .iter()
        .position(|a| a == "-o")
        .and_then(|i| args.get(i + 1));
    let with_ops = args.iter().any(|a| a == "--ops");

    let text = match fs::read_to_string(input_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {input_path}: {e}");
            std::process::exit(1);
        }
    };
    let script: Script = match serde_json::from_str(&text) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error parsing script: {e}");
            std::process::exit(1);
        }
    };
    info!(ops = script.ops.len(), "running script");

    let (matrix, canvas, errors) = run(script);
    let output = Output {
        snapshot: matrix.snapshot(),
        frames: canvas.frames(),
        ops: with_ops.then(|| canvas.ops()),
        errors,
    };

    let json = match serde_json::to_string_pretty(&output) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {e}");
            std::process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {path}: {e}");
                std::process::exit(1);
            }
            eprintln!("Written: {path}");
        }
        None => {
            let mut stdout = io::stdout().lock();
            if stdout
                .write_all(json.as_bytes())
                .and_then(|()| writeln!(stdout))
                .is_err()
            {
                std::process::exit(1);
            }
        }
    }
}

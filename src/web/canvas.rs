//! Canvas 2D backend.
//!
//! Implements [`Canvas`] and [`FontMetrics`] on a `CanvasRenderingContext2d`.
//! Coordinates are logical (CSS) pixels; the device pixel ratio is applied
//! once per frame through the context transform.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::color::Rgb;
use crate::error::Result;
use crate::render::{Canvas, FontMetrics, Rect};
use crate::types::{Alignment, HAlign, VAlign};

const TEXT_MEASURE_CACHE_CAP: usize = 4096;

/// Points to CSS pixels.
const PT_TO_PX_NUM: i32 = 4;
const PT_TO_PX_DEN: i32 = 3;

/// Align a coordinate to the pixel grid for crisp 1px lines.
#[inline]
fn crisp(x: i32) -> f64 {
    f64::from(x) + 0.5
}

/// Convert a toolkit font (`"Face, Bold Italic 10"`) to a CSS font string.
///
/// Positive sizes are points, negative sizes are pixels.
pub(crate) fn css_font(font: &str) -> String {
    let (face, rest) = font.split_once(',').unwrap_or((font, ""));
    let face = face.trim();
    let mut style = Vec::new();
    let mut px = 13;
    for token in rest.split_whitespace() {
        match token.to_ascii_lowercase().as_str() {
            "bold" => style.push("bold"),
            "italic" => style.push("italic"),
            _ => {
                if let Ok(size) = token.parse::<i32>() {
                    px = if size < 0 {
                        -size
                    } else {
                        size * PT_TO_PX_NUM / PT_TO_PX_DEN
                    };
                }
            }
        }
    }
    let face = if face.is_empty() { "sans-serif" } else { face };
    let family = match face.to_ascii_lowercase().as_str() {
        "sans" | "helvetica" | "arial" => "sans-serif".to_string(),
        "serif" | "times" => "serif".to_string(),
        "monospace" | "courier" => "monospace".to_string(),
        _ => format!("\"{face}\", sans-serif"),
    };
    if style.is_empty() {
        format!("{px}px {family}")
    } else {
        format!("{} {px}px {family}", style.join(" "))
    }
}

/// FIFO-bounded cache of text widths keyed by font and text.
struct TextMeasureCache {
    entries: HashMap<Rc<str>, f64>,
    order: VecDeque<Rc<str>>,
    max_entries: usize,
    scratch: String,
}

impl TextMeasureCache {
    fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
            scratch: String::new(),
        }
    }

    fn build_key<'a>(scratch: &'a mut String, font: &str, text: &str) -> &'a str {
        scratch.clear();
        scratch.push_str(font);
        scratch.push('\n');
        scratch.push_str(text);
        scratch.as_str()
    }

    fn get(&mut self, font: &str, text: &str) -> Option<f64> {
        let key = Self::build_key(&mut self.scratch, font, text);
        self.entries.get(key).copied()
    }

    fn insert(&mut self, font: &str, text: &str, width: f64) {
        let key: Rc<str> = Self::build_key(&mut self.scratch, font, text).into();
        if self.entries.insert(Rc::clone(&key), width).is_none() {
            self.order.push_back(key);
        }
        while self.entries.len() > self.max_entries {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }
}

/// Canvas 2D drawing surface.
pub struct Canvas2D {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: i32,
    height: i32,
    dpr: f64,
    clipped: bool,
    images: HashMap<String, HtmlCanvasElement>,
    measure: RefCell<TextMeasureCache>,
}

impl Canvas2D {
    pub fn new(canvas: HtmlCanvasElement, dpr: f64) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| "Failed to get 2d context")?
            .ok_or("No 2d context available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;
        let mut this = Self {
            canvas,
            ctx,
            width: 0,
            height: 0,
            dpr: 1.0,
            clipped: false,
            images: HashMap::new(),
            measure: RefCell::new(TextMeasureCache::new(TEXT_MEASURE_CACHE_CAP)),
        };
        this.sync_size(dpr);
        Ok(this)
    }

    /// Re-read the backing store size, e.g. after the element was resized.
    #[allow(clippy::cast_possible_truncation)]
    pub fn sync_size(&mut self, dpr: f64) {
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
        self.width = (f64::from(self.canvas.width()) / self.dpr).floor() as i32;
        self.height = (f64::from(self.canvas.height()) / self.dpr).floor() as i32;
    }

    /// Make an image name available to `IMAGE` cells.
    pub fn register_image(&mut self, name: &str, image: HtmlCanvasElement) {
        self.images.insert(name.to_string(), image);
    }

    fn set_fill(&self, color: Rgb) {
        self.ctx.set_fill_style_str(&color.to_hex());
    }

    fn set_stroke(&self, color: Rgb) {
        self.ctx.set_stroke_style_str(&color.to_hex());
    }

    fn measure_raw(&self, css: &str, text: &str) -> f64 {
        if let Some(width) = self.measure.borrow_mut().get(css, text) {
            return width;
        }
        self.ctx.set_font(css);
        let width = self.ctx.measure_text(text).map_or(0.0, |m| m.width());
        self.measure.borrow_mut().insert(css, text, width);
        width
    }
}

impl Canvas for Canvas2D {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn begin_frame(&mut self) {
        self.ctx.save();
        let _ = self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
        self.ctx.set_line_width(1.0);
    }

    fn end_frame(&mut self) {
        self.reset_clip();
        self.ctx.restore();
    }

    fn set_clip(&mut self, rect: Rect) {
        self.reset_clip();
        self.ctx.save();
        self.ctx.begin_path();
        self.ctx.rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.w),
            f64::from(rect.h),
        );
        self.ctx.clip();
        self.clipped = true;
    }

    fn reset_clip(&mut self) {
        if self.clipped {
            self.ctx.restore();
            self.clipped = false;
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.set_fill(color);
        self.ctx.fill_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.w),
            f64::from(rect.h),
        );
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb) {
        self.set_stroke(color);
        self.ctx.stroke_rect(
            crisp(rect.x),
            crisp(rect.y),
            f64::from(rect.w - 1),
            f64::from(rect.h - 1),
        );
    }

    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgb) {
        self.set_stroke(color);
        self.ctx.begin_path();
        self.ctx.move_to(crisp(x1), crisp(y1));
        self.ctx.line_to(crisp(x2), crisp(y2));
        self.ctx.stroke();
    }

    fn text(&mut self, rect: Rect, text: &str, align: Alignment, font: &str, color: Rgb) {
        let css = css_font(font);
        let (_, line_height) = self.char_size(font);
        let lines: Vec<&str> = text.split('\n').collect();
        let count = i32::try_from(lines.len()).unwrap_or(i32::MAX);
        let block = line_height.saturating_mul(count);
        let top = match align.vertical {
            VAlign::Top => rect.y,
            VAlign::Center => rect.y + (rect.h - block) / 2,
            VAlign::Bottom => rect.bottom() - block,
        };
        let (x, text_align) = match align.horizontal {
            HAlign::Left => (f64::from(rect.x), "left"),
            HAlign::Center => (f64::from(rect.x) + f64::from(rect.w) / 2.0, "center"),
            HAlign::Right => (f64::from(rect.right()), "right"),
        };

        self.ctx.save();
        self.ctx.begin_path();
        self.ctx.rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.w),
            f64::from(rect.h),
        );
        self.ctx.clip();
        self.ctx.set_font(&css);
        self.ctx.set_text_align(text_align);
        self.ctx.set_text_baseline("middle");
        self.set_fill(color);
        let mut y = top;
        for line in lines {
            let _ = self
                .ctx
                .fill_text(line, x, f64::from(y) + f64::from(line_height) / 2.0);
            y += line_height;
        }
        self.ctx.restore();
    }

    fn image(&mut self, rect: Rect, name: &str, align: Alignment) -> bool {
        let Some(image) = self.images.get(name) else {
            return false;
        };
        let (w, h) = (
            i32::try_from(image.width()).unwrap_or(rect.w).min(rect.w),
            i32::try_from(image.height()).unwrap_or(rect.h).min(rect.h),
        );
        let x = match align.horizontal {
            HAlign::Left => rect.x,
            HAlign::Center => rect.x + (rect.w - w) / 2,
            HAlign::Right => rect.right() - w,
        };
        let y = match align.vertical {
            VAlign::Top => rect.y,
            VAlign::Center => rect.y + (rect.h - h) / 2,
            VAlign::Bottom => rect.bottom() - h,
        };
        let _ = self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
            image,
            f64::from(x),
            f64::from(y),
            f64::from(w),
            f64::from(h),
        );
        true
    }
}

impl FontMetrics for Canvas2D {
    #[allow(clippy::cast_possible_truncation)]
    fn char_size(&self, font: &str) -> (i32, i32) {
        let css = css_font(font);
        let sample = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
        let width = self.measure_raw(&css, sample) / 52.0;
        let height = css
            .split_whitespace()
            .find_map(|t| t.strip_suffix("px").and_then(|n| n.parse::<i32>().ok()))
            .unwrap_or(13);
        (width.ceil() as i32, height * 5 / 4)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn text_width(&self, font: &str, text: &str) -> i32 {
        self.measure_raw(&css_font(font), text).ceil() as i32
    }
}

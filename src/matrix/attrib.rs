//! String attribute bridge.
//!
//! Maps the toolkit's attribute names (`NUMLIN`, `BGCOLOR2:*`, `MARKED`,
//! `3:4`, ...) onto the typed matrix API. Values are the toolkit's string
//! forms; `None` means "unset" for writes and "no value" for reads.

use crate::attrs::Target;
use crate::color::Rgb;
use crate::config::EditNext;
use crate::error::{MatrixError, Result};
use crate::numeric::{NumericColumn, NumericFormat};
use crate::types::{Alignment, Axis, CellAttr, CellType, MarkMode, MergedRange};

use super::structure::ClearScope;
use super::Matrix;

/// Parse an `ADDLIN`/`DELLIN` value, `"base"` or `"base-count"`.
///
/// `axis_count` includes the title. Returns `(base, count)` ready for
/// [`Matrix::insert`] or [`Matrix::delete`]: an add opens indices after
/// `base`, a delete count is clamped to the indices that exist.
pub fn parse_start_end(value: &str, axis_count: usize, add: bool) -> Result<(usize, usize)> {
    let bad = || MatrixError::invalid_value(if add { "ADD" } else { "DEL" }, value);
    let (base, count) = match value.split_once('-') {
        Some((b, c)) => (b.trim(), c.trim()),
        None => (value.trim(), "1"),
    };
    let base: usize = base.parse().map_err(|_| bad())?;
    let count: i64 = count.parse().map_err(|_| bad())?;
    if count <= 0 {
        return Err(MatrixError::InvalidCount(value.to_string()));
    }
    let count = usize::try_from(count).map_err(|_| bad())?;
    if add {
        let base = base
            .checked_add(1)
            .ok_or_else(bad)?
            .clamp(1, axis_count.max(1));
        Ok((base, count))
    } else {
        if base == 0 || base >= axis_count {
            return Err(bad());
        }
        Ok((base, count.min(axis_count - base)))
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_uppercase().as_str() {
        "YES" | "ON" | "1" | "TRUE" => Ok(true),
        "NO" | "OFF" | "0" | "FALSE" => Ok(false),
        _ => Err(MatrixError::invalid_value(name, value)),
    }
}

fn yes_no(b: bool) -> String {
    if b { "YES" } else { "NO" }.to_string()
}

/// `"L:C"` to a pair of indices.
fn parse_cell(s: &str) -> Option<(usize, usize)> {
    let (l, c) = s.split_once(':')?;
    Some((l.trim().parse().ok()?, c.trim().parse().ok()?))
}

fn numbered(name: &str, prefix: &str) -> Option<usize> {
    name.strip_prefix(prefix)?.parse().ok()
}

fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str> {
    value.ok_or_else(|| MatrixError::invalid_value(name, "(null)"))
}

fn read_only(name: &str) -> MatrixError {
    MatrixError::Other(format!("{name} is read-only"))
}

fn write_only(name: &str) -> MatrixError {
    MatrixError::Other(format!("{name} is write-only"))
}

impl Matrix {
    fn parse_in<T: std::str::FromStr>(name: &str, value: Option<&str>) -> Result<T> {
        let v = required(name, value)?;
        v.trim()
            .parse()
            .map_err(|_| MatrixError::invalid_value(name, v))
    }

    /// Set or drop the numeric format of a column.
    ///
    /// A column becomes numeric when it first gets a format.
    pub fn set_numeric_format(&mut self, col: usize, format: Option<&str>) -> Result<()> {
        if col >= self.cols.count() {
            return Err(MatrixError::IndexOutOfRange {
                axis: Axis::Col,
                index: col,
            });
        }
        match format {
            None => {
                self.numeric.remove(col);
            }
            Some(f) => {
                if NumericFormat::compile(f).is_none() {
                    return Err(MatrixError::invalid_value("NUMERICFORMAT", f));
                }
                match self.numeric.get_mut(col) {
                    Some(column) => column.format = Some(f.to_string()),
                    None => self.numeric.set(col, NumericColumn::with_format(f)),
                }
            }
        }
        self.request_redraw();
        Ok(())
    }

    fn set_override(&mut self, name: &str, attr: CellAttr, suffix: &str, value: Option<&str>) -> Result<()> {
        if let Some(v) = value {
            let valid = match attr {
                CellAttr::Font => !v.trim().is_empty(),
                CellAttr::FgColor
                | CellAttr::BgColor
                | CellAttr::FrameHorizColor
                | CellAttr::FrameVertColor => Rgb::parse(v).is_some(),
                CellAttr::Type => CellType::parse(v).is_some(),
                CellAttr::Alignment => Alignment::parse(v).is_some(),
            };
            if !valid {
                return Err(MatrixError::invalid_value(name, v));
            }
        }
        if suffix.is_empty() {
            return self.set_global(name, attr, value);
        }
        let target = match (Target::parse(suffix), attr) {
            (Some(t), _) => t,
            (None, CellAttr::Alignment) => suffix
                .parse()
                .map(Target::Column)
                .map_err(|_| MatrixError::UnknownAttribute(name.to_string()))?,
            (None, _) => return Err(MatrixError::UnknownAttribute(name.to_string())),
        };
        self.set_cell_attr(attr, target, value)
    }

    fn set_global(&mut self, name: &str, attr: CellAttr, value: Option<&str>) -> Result<()> {
        match attr {
            CellAttr::BgColor => self.config.bg_color = value.and_then(Rgb::parse),
            CellAttr::FgColor => self.config.fg_color = value.and_then(Rgb::parse),
            CellAttr::Font => {
                self.config.font = required(name, value)?.trim().to_string();
            }
            _ => return Err(MatrixError::UnknownAttribute(name.to_string())),
        }
        self.request_redraw();
        Ok(())
    }

    fn get_override(&self, name: &str, attr: CellAttr, suffix: &str) -> Result<Option<String>> {
        if suffix.is_empty() {
            return match attr {
                CellAttr::BgColor => Ok(Some(
                    self.config
                        .bg_color
                        .unwrap_or(self.config.txt_bg_color)
                        .to_attr_string(),
                )),
                CellAttr::FgColor => Ok(Some(
                    self.config
                        .fg_color
                        .unwrap_or(self.config.txt_fg_color)
                        .to_attr_string(),
                )),
                CellAttr::Font => Ok(Some(self.config.font.clone())),
                _ => Err(MatrixError::UnknownAttribute(name.to_string())),
            };
        }
        let target = match (Target::parse(suffix), attr) {
            (Some(t), _) => t,
            (None, CellAttr::Alignment) => match suffix.parse() {
                Ok(col) => {
                    return Ok(Some(
                        self.cell_attr(attr, Target::Column(col))
                            .map_or_else(|| self.resolve_alignment(1, col).to_attr_string(), str::to_string),
                    ))
                }
                Err(_) => return Err(MatrixError::UnknownAttribute(name.to_string())),
            },
            (None, _) => return Err(MatrixError::UnknownAttribute(name.to_string())),
        };
        Ok(self.cell_attr(attr, target).map(str::to_string))
    }

    /// Write a toolkit attribute.
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        let upper = name.trim().to_ascii_uppercase();
        let name = upper.as_str();
        match name {
            "NUMLIN" => self.set_count(Axis::Lin, Self::parse_in(name, value)?),
            "NUMCOL" => self.set_count(Axis::Col, Self::parse_in(name, value)?),
            "NUMLIN_NOSCROLL" => {
                self.set_noscroll(Axis::Lin, Self::parse_in(name, value)?);
                Ok(())
            }
            "NUMCOL_NOSCROLL" => {
                self.set_noscroll(Axis::Col, Self::parse_in(name, value)?);
                Ok(())
            }
            "ADDLIN" | "ADDCOL" | "DELLIN" | "DELCOL" => {
                let axis = if name.ends_with("LIN") { Axis::Lin } else { Axis::Col };
                let add = name.starts_with("ADD");
                let (base, count) =
                    parse_start_end(required(name, value)?, self.axis(axis).count(), add)?;
                if add {
                    self.insert(axis, base, count)
                } else {
                    self.delete(axis, base, count)
                }
            }
            "WIDTHDEF" | "HEIGHTDEF" => {
                let size: i32 = Self::parse_in(name, value)?;
                if name == "WIDTHDEF" {
                    self.cols.set_default_size(size);
                    self.config.width_def = size.max(0);
                } else {
                    self.lines.set_default_size(size);
                    self.config.height_def = size.max(0);
                }
                Ok(())
            }
            "VALUE" => {
                let (lin, col) = self.focus();
                self.set_value(lin, col, value)
            }
            "FOCUSCELL" => {
                let v = required(name, value)?;
                let (lin, col) = parse_cell(v).ok_or_else(|| MatrixError::invalid_value(name, v))?;
                self.set_focus(lin, col).map(|_| ())
            }
            "ORIGIN" => {
                let v = required(name, value)?;
                let (lin, col) = parse_cell(v).ok_or_else(|| MatrixError::invalid_value(name, v))?;
                self.set_origin(lin, col)
            }
            "SHOW" => {
                let v = required(name, value)?;
                let (lin, col) = parse_cell(v).ok_or_else(|| MatrixError::invalid_value(name, v))?;
                self.check_cell(lin, col)?;
                self.scroll_cell_visible(lin, col);
                Ok(())
            }
            "MARKED" => self.set_marked_attr(value),
            "MARKMODE" => {
                let v = required(name, value)?;
                let mode = MarkMode::parse(v).ok_or_else(|| MatrixError::invalid_value(name, v))?;
                self.set_mark_mode(mode);
                Ok(())
            }
            "MARKMULTIPLE" => {
                self.set_mark_multiple(parse_bool(name, required(name, value)?)?);
                Ok(())
            }
            "MARKAREA" => {
                let v = required(name, value)?;
                let continuous = match v.trim().to_ascii_uppercase().as_str() {
                    "CONTINUOUS" => true,
                    "NOT_CONTINUOUS" => false,
                    _ => return Err(MatrixError::invalid_value(name, v)),
                };
                self.set_mark_continuous(continuous);
                Ok(())
            }
            "CLEARVALUE" | "CLEARATTRIB" => {
                let v = required(name, value)?;
                let scope = ClearScope::parse(v).ok_or_else(|| MatrixError::invalid_value(name, v))?;
                if name == "CLEARVALUE" {
                    self.clear_values(scope)
                } else {
                    self.clear_attributes(scope)
                }
            }
            "EDITMODE" => {
                if parse_bool(name, required(name, value)?)? {
                    self.edit_show()
                } else if self.is_editing() {
                    self.edit_confirm()
                } else {
                    Ok(())
                }
            }
            "READONLY" => {
                self.config.readonly = parse_bool(name, required(name, value)?)?;
                if self.config.readonly {
                    self.edit_hide();
                }
                Ok(())
            }
            "EDITNEXT" => {
                let v = required(name, value)?;
                self.config.edit_next = match v.trim().to_ascii_uppercase().as_str() {
                    "LIN" => EditNext::Lin,
                    "COL" => EditNext::Col,
                    "NONE" => EditNext::None,
                    _ => return Err(MatrixError::invalid_value(name, v)),
                };
                Ok(())
            }
            "ACTIVE" => {
                self.config.active = parse_bool(name, required(name, value)?)?;
                self.request_redraw();
                Ok(())
            }
            "FITTOSIZE" => {
                let v = required(name, value)?;
                let (lines, cols) = match v.trim().to_ascii_uppercase().as_str() {
                    "LINES" => (true, false),
                    "COLUMNS" => (false, true),
                    "YES" => (true, true),
                    _ => return Err(MatrixError::invalid_value(name, v)),
                };
                self.fit_to_size(lines, cols);
                Ok(())
            }
            "FITTOTEXT" => {
                let v = required(name, value)?.trim().to_ascii_uppercase();
                let (axis, rest) = if let Some(rest) = v.strip_prefix('L') {
                    (Axis::Lin, rest)
                } else if let Some(rest) = v.strip_prefix('C') {
                    (Axis::Col, rest)
                } else {
                    return Err(MatrixError::invalid_value(name, &v));
                };
                let index = rest
                    .parse()
                    .map_err(|_| MatrixError::invalid_value(name, &v))?;
                self.fit_to_text(axis, index)
            }
            "NUMERICFORMATDEF" => {
                let v = required(name, value)?;
                if NumericFormat::compile(v).is_none() {
                    return Err(MatrixError::invalid_value(name, v));
                }
                self.config.numeric_format_def = v.to_string();
                self.request_redraw();
                Ok(())
            }
            "FRAMECOLOR" | "HLCOLOR" => {
                let v = required(name, value)?;
                let color = Rgb::parse(v).ok_or_else(|| MatrixError::invalid_value(name, v))?;
                if name == "FRAMECOLOR" {
                    self.config.frame_color = color;
                } else {
                    self.config.hl_color = color;
                }
                self.request_redraw();
                Ok(())
            }
            "HLCOLORALPHA" => {
                self.config.hl_color_alpha = Self::parse_in(name, value)?;
                self.request_redraw();
                Ok(())
            }
            "POSX" => {
                self.set_scroll_pos(Axis::Col, Self::parse_in(name, value)?);
                Ok(())
            }
            "POSY" => {
                self.set_scroll_pos(Axis::Lin, Self::parse_in(name, value)?);
                Ok(())
            }
            "REDRAW" => {
                self.request_redraw();
                Ok(())
            }
            "DX" | "DY" | "XMAX" | "YMAX" | "NUMLIN_VISIBLE" | "NUMCOL_VISIBLE" | "EDITCELL" => {
                Err(read_only(name))
            }
            _ => self.set_indexed_attribute(name, value),
        }
    }

    fn set_indexed_attribute(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        if let Some(index) = numbered(name, "WIDTH") {
            return self.set_size(Axis::Col, index, Self::parse_in(name, value)?);
        }
        if let Some(index) = numbered(name, "HEIGHT") {
            return self.set_size(Axis::Lin, index, Self::parse_in(name, value)?);
        }
        if let Some(col) = numbered(name, "NUMERICFORMAT") {
            return self.set_numeric_format(col, value);
        }
        if let Some(suffix) = name.strip_prefix("MERGESPLIT") {
            let (lin, col) = parse_cell(suffix).ok_or_else(|| MatrixError::UnknownAttribute(name.to_string()))?;
            return self.merge_split(lin, col).map(|_| ());
        }
        if name.starts_with("MERGED") {
            return Err(read_only(name));
        }
        if let Some(suffix) = name.strip_prefix("MERGE") {
            let (lin, col) = parse_cell(suffix).ok_or_else(|| MatrixError::UnknownAttribute(name.to_string()))?;
            let v = required(name, value)?;
            let (end_lin, end_col) = parse_cell(v).ok_or_else(|| MatrixError::invalid_value(name, v))?;
            return self
                .merge(MergedRange::new(lin, col, end_lin, end_col))
                .map(|_| ());
        }
        if let Some(suffix) = name.strip_prefix("MARK") {
            let (lin, col) = parse_cell(suffix).ok_or_else(|| MatrixError::UnknownAttribute(name.to_string()))?;
            return self.set_cell_marked(lin, col, parse_bool(name, required(name, value)?)?);
        }
        if let Some((attr, suffix)) = CellAttr::split_name(name) {
            return self.set_override(name, attr, suffix, value);
        }
        if let Some((lin, col)) = parse_cell(name) {
            return self.set_value(lin, col, value);
        }
        Err(MatrixError::UnknownAttribute(name.to_string()))
    }

    /// Read a toolkit attribute.
    pub fn get_attribute(&self, name: &str) -> Result<Option<String>> {
        let upper = name.trim().to_ascii_uppercase();
        let name = upper.as_str();
        let cell = |(l, c): (usize, usize)| Some(format!("{l}:{c}"));
        let value = match name {
            "NUMLIN" => Some(self.num_lin().to_string()),
            "NUMCOL" => Some(self.num_col().to_string()),
            "NUMLIN_NOSCROLL" => Some((self.lines.fixed() - 1).to_string()),
            "NUMCOL_NOSCROLL" => Some((self.cols.fixed() - 1).to_string()),
            "NUMLIN_VISIBLE" => Some(self.lines.visible_range().len().to_string()),
            "NUMCOL_VISIBLE" => Some(self.cols.visible_range().len().to_string()),
            "WIDTHDEF" => Some(self.cols.default_size().to_string()),
            "HEIGHTDEF" => Some(self.lines.default_size().to_string()),
            "VALUE" => {
                let (lin, col) = self.focus();
                self.value(lin, col)
            }
            "FOCUSCELL" => cell(self.focus()),
            "ORIGIN" => cell(self.origin()),
            "MARKED" => self.marked_attr(),
            "MARKMODE" => Some(self.selection.mode.as_str().to_string()),
            "MARKMULTIPLE" => Some(yes_no(self.selection.multiple)),
            "MARKAREA" => Some(
                if self.selection.continuous {
                    "CONTINUOUS"
                } else {
                    "NOT_CONTINUOUS"
                }
                .to_string(),
            ),
            "EDITMODE" => Some(yes_no(self.is_editing())),
            "EDITCELL" => self.edit_cell().and_then(cell),
            "READONLY" => Some(yes_no(self.config.readonly)),
            "ACTIVE" => Some(yes_no(self.config.active)),
            "EDITNEXT" => Some(
                match self.config.edit_next {
                    EditNext::Lin => "LIN",
                    EditNext::Col => "COL",
                    EditNext::None => "NONE",
                }
                .to_string(),
            ),
            "NUMERICFORMATDEF" => Some(self.config.numeric_format_def.clone()),
            "FRAMECOLOR" => Some(self.config.frame_color.to_attr_string()),
            "HLCOLOR" => Some(self.config.hl_color.to_attr_string()),
            "HLCOLORALPHA" => Some(self.config.hl_color_alpha.to_string()),
            "POSX" => Some(self.cols.scroll_pos().to_string()),
            "POSY" => Some(self.lines.scroll_pos().to_string()),
            "DX" => Some(self.cols.current_size().to_string()),
            "DY" => Some(self.lines.current_size().to_string()),
            "XMAX" => Some(self.cols.total_size().to_string()),
            "YMAX" => Some(self.lines.total_size().to_string()),
            "ADDLIN" | "ADDCOL" | "DELLIN" | "DELCOL" | "CLEARVALUE" | "CLEARATTRIB"
            | "FITTOSIZE" | "FITTOTEXT" | "SHOW" | "REDRAW" => return Err(write_only(name)),
            _ => return self.get_indexed_attribute(name),
        };
        Ok(value)
    }

    fn get_indexed_attribute(&self, name: &str) -> Result<Option<String>> {
        let out_of_range = |axis, index| MatrixError::IndexOutOfRange { axis, index };
        if let Some(index) = numbered(name, "WIDTH") {
            if index >= self.cols.count() {
                return Err(out_of_range(Axis::Col, index));
            }
            return Ok(Some(self.cols.size(index).to_string()));
        }
        if let Some(index) = numbered(name, "HEIGHT") {
            if index >= self.lines.count() {
                return Err(out_of_range(Axis::Lin, index));
            }
            return Ok(Some(self.lines.size(index).to_string()));
        }
        if let Some(col) = numbered(name, "NUMERICFORMAT") {
            return Ok(self
                .numeric
                .get(col)
                .map(|c| c.format.clone().unwrap_or_else(|| self.config.numeric_format_def.clone())));
        }
        if let Some(suffix) = name.strip_prefix("MERGED") {
            let (lin, col) = parse_cell(suffix).ok_or_else(|| MatrixError::UnknownAttribute(name.to_string()))?;
            self.check_cell(lin, col)?;
            return Ok(self.merged_at(lin, col).map(|m| m.to_attr_string()));
        }
        if let Some(suffix) = name.strip_prefix("MARK") {
            let (lin, col) = parse_cell(suffix).ok_or_else(|| MatrixError::UnknownAttribute(name.to_string()))?;
            self.check_cell(lin, col)?;
            return Ok(Some(if self.is_marked(lin, col) { "1" } else { "0" }.to_string()));
        }
        if let Some((attr, suffix)) = CellAttr::split_name(name) {
            return self.get_override(name, attr, suffix);
        }
        if let Some((lin, col)) = parse_cell(name) {
            self.check_cell(lin, col)?;
            return Ok(self.value(lin, col));
        }
        Err(MatrixError::UnknownAttribute(name.to_string()))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::config::MatrixConfig;

    fn grid() -> Matrix {
        let mut m = Matrix::new(MatrixConfig {
            num_lin: 5,
            num_col: 3,
            ..MatrixConfig::default()
        });
        m.resize(400, 300);
        m
    }

    #[test]
    fn test_parse_start_end() {
        assert_eq!(parse_start_end("0", 6, true).unwrap(), (1, 1));
        assert_eq!(parse_start_end("5-2", 6, true).unwrap(), (6, 2));
        assert_eq!(parse_start_end("9", 6, true).unwrap(), (6, 1));
        assert_eq!(parse_start_end("2-10", 6, false).unwrap(), (2, 4));
        assert!(parse_start_end("0", 6, false).is_err());
        assert!(parse_start_end("6", 6, false).is_err());
        assert!(parse_start_end(&usize::MAX.to_string(), 6, true).is_err());
        assert!(matches!(
            parse_start_end("2-0", 6, true),
            Err(MatrixError::InvalidCount(_))
        ));
        assert!(parse_start_end("2--1", 6, true).is_err());
        assert!(parse_start_end("x", 6, true).is_err());
    }

    #[test]
    fn test_counts_and_add_del() {
        let mut m = grid();
        m.set_attribute("ADDLIN", Some("5-2")).unwrap();
        assert_eq!(m.get_attribute("NUMLIN").unwrap().as_deref(), Some("7"));
        m.set_attribute("DELCOL", Some("1-2")).unwrap();
        assert_eq!(m.get_attribute("numcol").unwrap().as_deref(), Some("1"));
        m.set_attribute("NUMCOL", Some("4")).unwrap();
        assert_eq!(m.num_col(), 4);
        assert!(m.set_attribute("NUMCOL", Some("many")).is_err());
    }

    #[test]
    fn test_cell_values_and_overrides() {
        let mut m = grid();
        m.set_attribute("2:3", Some("hello")).unwrap();
        assert_eq!(m.get_attribute("2:3").unwrap().as_deref(), Some("hello"));
        m.set_attribute("BGCOLOR2:*", Some("10 20 30")).unwrap();
        assert_eq!(m.get_attribute("BGCOLOR2:*").unwrap().as_deref(), Some("10 20 30"));
        assert_eq!(m.resolve_bg(2, 1), Rgb::new(10, 20, 30));
        assert!(m.set_attribute("BGCOLOR2:*", Some("blue-ish")).is_err());
        m.set_attribute("ALIGNMENT2", Some("ARIGHT")).unwrap();
        assert_eq!(m.get_attribute("ALIGNMENT2").unwrap().as_deref(), Some("ARIGHT"));
        m.set_attribute("BGCOLOR", Some("1 1 1")).unwrap();
        assert_eq!(m.resolve_bg(3, 3), Rgb::new(1, 1, 1));
    }

    #[test]
    fn test_sizes_and_scroll_extents() {
        let mut m = grid();
        m.set_attribute("WIDTH2", Some("120")).unwrap();
        assert_eq!(m.get_attribute("WIDTH2").unwrap().as_deref(), Some("120"));
        m.set_attribute("WIDTHDEF", Some("50")).unwrap();
        assert_eq!(m.get_attribute("WIDTHDEF").unwrap().as_deref(), Some("50"));
        assert_eq!(m.get_attribute("XMAX").unwrap().as_deref(), Some("280"));
        assert!(m.set_attribute("XMAX", Some("1")).is_err());
        assert!(m.get_attribute("WIDTH9").is_err());
    }

    #[test]
    fn test_merge_attributes() {
        let mut m = grid();
        m.set_attribute("MERGE1:1", Some("2:2")).unwrap();
        assert_eq!(m.get_attribute("MERGED2:2").unwrap().as_deref(), Some("1:1-2:2"));
        assert!(m.set_attribute("MERGE2:1", Some("3:1")).is_err());
        m.set_attribute("MERGESPLIT1:1", None).unwrap();
        assert_eq!(m.get_attribute("MERGED2:2").unwrap(), None);
    }

    #[test]
    fn test_mark_attributes() {
        let mut m = grid();
        m.set_attribute("MARKMODE", Some("CELL")).unwrap();
        m.set_attribute("MARK2:2", Some("YES")).unwrap();
        assert_eq!(m.get_attribute("MARK2:2").unwrap().as_deref(), Some("1"));
        assert_eq!(
            m.get_attribute("MARKED").unwrap().as_deref(),
            Some("000010000000000")
        );
        m.set_attribute("MARKED", None).unwrap();
        assert_eq!(m.get_attribute("MARKED").unwrap(), None);
    }

    #[test]
    fn test_numeric_format_attribute() {
        let mut m = grid();
        m.set_attribute("1:2", Some("3.14159")).unwrap();
        m.set_attribute("NUMERICFORMAT2", Some("%.1f")).unwrap();
        assert_eq!(m.display_value(1, 2).as_deref(), Some("3.1"));
        assert_eq!(m.get_attribute("NUMERICFORMAT2").unwrap().as_deref(), Some("%.1f"));
        m.set_attribute("NUMERICFORMAT2", None).unwrap();
        assert_eq!(m.display_value(1, 2).as_deref(), Some("3.14159"));
    }

    #[test]
    fn test_unknown_names() {
        let mut m = grid();
        assert!(matches!(
            m.set_attribute("BOGUS", Some("1")),
            Err(MatrixError::UnknownAttribute(_))
        ));
        assert!(matches!(
            m.get_attribute("TYPE"),
            Err(MatrixError::UnknownAttribute(_))
        ));
    }
}

//! Numeric columns: parse, unit conversion and printf-style formatting.
//!
//! Values of a numeric column are stored as canonical text (`.` decimal
//! separator, stored unit). The display path parses that text, converts it
//! to the shown unit and formats it; the edit path runs the inverse.
//!
//! Format strings follow the printf subset the toolkit accepts:
//! - `%[flags][width][.precision](f|e|E|g|G|d)` with literal prefix/suffix text
//! - flags: `-` (left justify), `+` (always sign), `0` (zero pad), `'` (thousands)
//! - `%%` is a literal percent sign

use std::collections::BTreeMap;
use std::fmt;

/// Direction of a unit conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Stored unit to shown unit (display, edit start)
    ToDisplay,
    /// Shown unit to stored unit (edit confirm)
    FromDisplay,
}

/// Unit conversion function registered for a numeric column.
pub type ConvertFn = Box<dyn Fn(f64, Conversion) -> f64>;

/// Largest width or precision a format may ask for.
const MAX_FIELD: usize = 255;

/// Conversion character of a compiled format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conv {
    Fixed,
    Exp { upper: bool },
    General { upper: bool },
    Int,
}

/// A compiled printf-style number format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericFormat {
    prefix: String,
    suffix: String,
    left: bool,
    plus: bool,
    zero_pad: bool,
    thousands: bool,
    width: usize,
    precision: Option<usize>,
    conv: Conv,
}

impl NumericFormat {
    /// Compile a format string. Returns None when it holds no conversion.
    pub fn compile(format: &str) -> Option<Self> {
        let chars: Vec<char> = format.chars().collect();
        let mut prefix = String::new();
        let mut i = 0;
        // Literal text up to the first real conversion
        loop {
            match (chars.get(i), chars.get(i + 1)) {
                (Some('%'), Some('%')) => {
                    prefix.push('%');
                    i += 2;
                }
                (Some('%'), _) => break,
                (Some(c), _) => {
                    prefix.push(*c);
                    i += 1;
                }
                (None, _) => return None,
            }
        }
        i += 1;

        let (mut left, mut plus, mut zero_pad, mut thousands) = (false, false, false, false);
        while let Some(c) = chars.get(i) {
            match c {
                '-' => left = true,
                '+' => plus = true,
                '0' => zero_pad = true,
                '\'' => thousands = true,
                ' ' | '#' => {}
                _ => break,
            }
            i += 1;
        }

        let width = field(&chars, &mut i)?;

        let mut precision = None;
        if chars.get(i) == Some(&'.') {
            i += 1;
            precision = Some(field(&chars, &mut i)?.min(17));
        }

        // Length modifiers are accepted and ignored
        while matches!(chars.get(i), Some('l' | 'L' | 'h')) {
            i += 1;
        }

        let conv = match chars.get(i)? {
            'f' | 'F' => Conv::Fixed,
            'e' => Conv::Exp { upper: false },
            'E' => Conv::Exp { upper: true },
            'g' => Conv::General { upper: false },
            'G' => Conv::General { upper: true },
            'd' | 'i' => Conv::Int,
            _ => return None,
        };
        i += 1;

        let suffix = chars
            .get(i..)
            .map(|rest| rest.iter().collect::<String>().replace("%%", "%"))
            .unwrap_or_default();

        Some(Self {
            prefix,
            suffix,
            left,
            plus,
            zero_pad,
            thousands,
            width,
            precision,
            conv,
        })
    }

    /// Format a value using `decimal` as the decimal separator.
    pub fn format(&self, value: f64, decimal: char) -> String {
        let negative = value.is_sign_negative() && value != 0.0;
        let magnitude = value.abs();

        let mut body = match self.conv {
            Conv::Fixed => format!("{:.prec$}", magnitude, prec = self.precision.unwrap_or(6)),
            Conv::Exp { upper } => format_exp(magnitude, self.precision.unwrap_or(6), upper),
            Conv::General { upper } => format_general(magnitude, self.precision.unwrap_or(6), upper),
            Conv::Int => format!("{:.0}", magnitude),
        };

        if self.thousands {
            body = group_thousands(&body);
        }
        if decimal != '.' {
            body = body.replacen('.', &decimal.to_string(), 1);
        }

        let sign = if negative {
            "-"
        } else if self.plus {
            "+"
        } else {
            ""
        };

        let len = sign.chars().count() + body.chars().count();
        let padded = if len >= self.width {
            format!("{sign}{body}")
        } else if self.left {
            format!("{sign}{body}{}", " ".repeat(self.width - len))
        } else if self.zero_pad {
            format!("{sign}{}{body}", "0".repeat(self.width - len))
        } else {
            format!("{}{sign}{body}", " ".repeat(self.width - len))
        };

        format!("{}{}{}", self.prefix, padded, self.suffix)
    }
}

/// Decimal width/precision digits at `chars[*i..]`, `None` above [`MAX_FIELD`].
fn field(chars: &[char], i: &mut usize) -> Option<usize> {
    let mut n = 0usize;
    while let Some(d) = chars.get(*i).and_then(|c| c.to_digit(10)) {
        n = n.checked_mul(10)?.checked_add(d as usize)?;
        if n > MAX_FIELD {
            return None;
        }
        *i += 1;
    }
    Some(n)
}

impl fmt::Display for NumericFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.prefix.replace('%', "%%"))?;
        if self.left {
            f.write_str("-")?;
        }
        if self.plus {
            f.write_str("+")?;
        }
        if self.zero_pad {
            f.write_str("0")?;
        }
        if self.thousands {
            f.write_str("'")?;
        }
        if self.width > 0 {
            write!(f, "{}", self.width)?;
        }
        if let Some(p) = self.precision {
            write!(f, ".{p}")?;
        }
        let c = match self.conv {
            Conv::Fixed => "f",
            Conv::Exp { upper: false } => "e",
            Conv::Exp { upper: true } => "E",
            Conv::General { upper: false } => "g",
            Conv::General { upper: true } => "G",
            Conv::Int => "d",
        };
        write!(f, "{c}{}", self.suffix.replace('%', "%%"))
    }
}

/// C-style exponent notation: `1.50e+03`.
fn format_exp(value: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{:.prec$e}", value, prec = precision);
    let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    let e = if upper { 'E' } else { 'e' };
    format!("{mantissa}{e}{sign}{:02}", exp.abs())
}

/// C-style `%g`: shortest of fixed/exponent with trailing zeros removed.
#[allow(clippy::cast_possible_truncation)]
fn format_general(value: f64, precision: usize, upper: bool) -> String {
    let p = precision.max(1);
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let exp = value.log10().floor() as i64;
    let p_i = i64::try_from(p).unwrap_or(i64::MAX);
    if exp < -4 || exp >= p_i {
        let s = format_exp(value, p - 1, upper);
        let e = if upper { 'E' } else { 'e' };
        match s.split_once(e) {
            Some((m, rest)) => format!("{}{e}{rest}", trim_fraction(m)),
            None => s,
        }
    } else {
        let decimals = usize::try_from(p_i - 1 - exp).unwrap_or(0);
        trim_fraction(&format!("{:.prec$}", value, prec = decimals)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Insert `,` between groups of three digits of the integer part.
fn group_thousands(s: &str) -> String {
    let (int_part, rest) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(pos) => s.split_at(pos),
        None => (s, ""),
    };
    let mut with_sep = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_sep.push(',');
        }
        with_sep.push(c);
    }
    let grouped: String = with_sep.chars().rev().collect();
    format!("{grouped}{rest}")
}

/// Parse user text using `decimal` as the decimal separator.
///
/// The other common separator is treated as a thousands separator and dropped.
pub fn parse_number(text: &str, decimal: char) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let grouping = if decimal == ',' { '.' } else { ',' };
    let normalized: String = trimmed
        .chars()
        .filter(|c| *c != grouping && !c.is_whitespace())
        .map(|c| if c == decimal { '.' } else { c })
        .collect();
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Settings of one numeric column.
#[derive(Default)]
pub struct NumericColumn {
    /// Column-specific format; falls back to the matrix default.
    pub format: Option<String>,
    /// Unit conversion between stored and shown values.
    pub convert: Option<ConvertFn>,
}

impl fmt::Debug for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericColumn")
            .field("format", &self.format)
            .field("convert", &self.convert.is_some())
            .finish()
    }
}

impl NumericColumn {
    pub fn with_format(format: &str) -> Self {
        Self {
            format: Some(format.to_string()),
            convert: None,
        }
    }

    fn convert(&self, value: f64, direction: Conversion) -> f64 {
        match &self.convert {
            Some(f) => f(value, direction),
            None => value,
        }
    }
}

/// Numeric column registry, keyed by column index.
#[derive(Debug, Default)]
pub struct NumericColumns {
    columns: BTreeMap<usize, NumericColumn>,
}

impl NumericColumns {
    pub fn get(&self, col: usize) -> Option<&NumericColumn> {
        self.columns.get(&col)
    }

    pub fn get_mut(&mut self, col: usize) -> Option<&mut NumericColumn> {
        self.columns.get_mut(&col)
    }

    pub fn set(&mut self, col: usize, column: NumericColumn) {
        self.columns.insert(col, column);
    }

    pub fn remove(&mut self, col: usize) -> Option<NumericColumn> {
        self.columns.remove(&col)
    }

    pub fn is_numeric(&self, col: usize) -> bool {
        self.columns.contains_key(&col)
    }

    /// Stored text to display text. Unparseable text is shown as is.
    pub fn display(&self, col: usize, stored: &str, default_format: &str, decimal: char) -> String {
        let Some(column) = self.columns.get(&col) else {
            return stored.to_string();
        };
        let Some(value) = parse_number(stored, '.') else {
            return stored.to_string();
        };
        let shown = column.convert(value, Conversion::ToDisplay);
        let format = column.format.as_deref().unwrap_or(default_format);
        match NumericFormat::compile(format) {
            Some(compiled) => compiled.format(shown, decimal),
            None => shown.to_string(),
        }
    }

    /// Stored text to the full-precision text placed in the editor.
    pub fn edit_text(&self, col: usize, stored: &str, decimal: char) -> String {
        let Some(column) = self.columns.get(&col) else {
            return stored.to_string();
        };
        match parse_number(stored, '.') {
            Some(value) => {
                let shown = column.convert(value, Conversion::ToDisplay);
                shown.to_string().replacen('.', &decimal.to_string(), 1)
            }
            None => stored.to_string(),
        }
    }

    /// Edited text to stored text.
    ///
    /// Text that does not parse is stored unchanged, without conversion.
    pub fn store_text(&self, col: usize, edited: &str, decimal: char) -> String {
        let Some(column) = self.columns.get(&col) else {
            return edited.to_string();
        };
        match parse_number(edited, decimal) {
            Some(value) => column.convert(value, Conversion::FromDisplay).to_string(),
            None => edited.to_string(),
        }
    }

    /// Open `count` columns at `base`, shifting later columns right.
    pub fn insert(&mut self, base: usize, count: usize) {
        let moved = self.columns.split_off(&base);
        for (col, column) in moved {
            self.columns.insert(col + count, column);
        }
    }

    /// Drop columns `[base, base + count)` and shift later columns left.
    pub fn remove_range(&mut self, base: usize, count: usize) {
        let mut tail = self.columns.split_off(&base);
        let after = tail.split_off(&(base + count));
        for (col, column) in after {
            self.columns.insert(col - count, column);
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn fmt(f: &str, v: f64) -> String {
        NumericFormat::compile(f).unwrap().format(v, '.')
    }

    #[test]
    fn test_fixed_precision() {
        assert_eq!(fmt("%.2f", 3.14159), "3.14");
        assert_eq!(fmt("%.0f", 2.5), "2");
        assert_eq!(fmt("%f", 1.0), "1.000000");
    }

    #[test]
    fn test_prefix_suffix_and_percent() {
        assert_eq!(fmt("$ %.1f", 12.34), "$ 12.3");
        assert_eq!(fmt("%.0f%%", 42.0), "42%");
        assert_eq!(fmt("100%% = %.1f", 1.0), "100% = 1.0");
    }

    #[test]
    fn test_width_and_flags() {
        assert_eq!(fmt("%8.2f", -1.5), "   -1.50");
        assert_eq!(fmt("%-6.1f|", 1.5), "1.5   |");
        assert_eq!(fmt("%06.1f", 1.5), "0001.5");
        assert_eq!(fmt("%+.1f", 1.5), "+1.5");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(fmt("%'.2f", 1234567.891), "1,234,567.89");
        assert_eq!(fmt("%'d", 999.0), "999");
    }

    #[test]
    fn test_exponent_and_general() {
        assert_eq!(fmt("%.2e", 1500.0), "1.50e+03");
        assert_eq!(fmt("%.3E", 0.00012), "1.200E-04");
        assert_eq!(fmt("%g", 0.5), "0.5");
        assert_eq!(fmt("%g", 1234567.0), "1.23457e+06");
        assert_eq!(fmt("%g", 100.0), "100");
    }

    #[test]
    fn test_decimal_symbol() {
        let f = NumericFormat::compile("%'.2f").unwrap();
        assert_eq!(f.format(1234.5, ','), "1,234,50");
        assert_eq!(parse_number("1.234,50", ','), Some(1234.5));
        assert_eq!(parse_number("1,234.50", '.'), Some(1234.5));
    }

    #[test]
    fn test_compile_rejects_plain_text() {
        assert!(NumericFormat::compile("no conversion").is_none());
        assert!(NumericFormat::compile("%s").is_none());
    }

    #[test]
    fn test_compile_bounds_width_and_precision() {
        assert_eq!(fmt("%255.2f", 1.0).len(), 255);
        assert_eq!(fmt("%.40f", 1.0), fmt("%.17f", 1.0));
        assert!(NumericFormat::compile("%256f").is_none());
        assert!(NumericFormat::compile("%99999999999999999999f").is_none());
        assert!(NumericFormat::compile("%.99999999999999999999f").is_none());
    }

    #[test]
    fn test_display_and_store_with_conversion() {
        let mut cols = NumericColumns::default();
        cols.set(
            2,
            NumericColumn {
                format: Some("%.1f".into()),
                convert: Some(Box::new(|v, dir| match dir {
                    Conversion::ToDisplay => v * 100.0,
                    Conversion::FromDisplay => v / 100.0,
                })),
            },
        );
        assert_eq!(cols.display(2, "0.5", "%.2f", '.'), "50.0");
        assert_eq!(cols.store_text(2, "25", '.'), "0.25");
        // Unparseable edit text is kept verbatim
        assert_eq!(cols.store_text(2, "abc", '.'), "abc");
        // Non-numeric columns pass through
        assert_eq!(cols.display(1, "0.5", "%.2f", '.'), "0.5");
    }

    #[test]
    fn test_shift_on_insert_and_remove() {
        let mut cols = NumericColumns::default();
        cols.set(1, NumericColumn::with_format("%.1f"));
        cols.set(3, NumericColumn::with_format("%.3f"));
        cols.insert(2, 2);
        assert!(cols.is_numeric(1));
        assert!(cols.is_numeric(5));
        assert!(!cols.is_numeric(3));
        cols.remove_range(1, 1);
        assert!(!cols.is_numeric(1));
        assert_eq!(cols.get(4).and_then(|c| c.format.as_deref()), Some("%.3f"));
    }
}

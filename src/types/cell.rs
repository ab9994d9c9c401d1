use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// "Has override" flags kept per cell, per line and per column.
    ///
    /// A set bit means the attribute side table holds a value for that
    /// target and the resolver must consult it. `MARKED` is the mark state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttrFlags: u8 {
        const FONT        = 0b0000_0001;
        const FGCOLOR     = 0b0000_0010;
        const BGCOLOR     = 0b0000_0100;
        const MARKED      = 0b0000_1000;
        const FRAMEHCOLOR = 0b0001_0000;
        const FRAMEVCOLOR = 0b0010_0000;
        const TYPE        = 0b0100_0000;
        const ALIGNMENT   = 0b1000_0000;
    }
}

/// Overridable cell attribute.
///
/// Each attribute owns exactly one presence bit; going through
/// [`CellAttr::flag`] keeps the side table and the flag bits in step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellAttr {
    Font,
    FgColor,
    BgColor,
    FrameHorizColor,
    FrameVertColor,
    Type,
    Alignment,
}

impl CellAttr {
    pub const ALL: [CellAttr; 7] = [
        CellAttr::Font,
        CellAttr::FgColor,
        CellAttr::BgColor,
        CellAttr::FrameHorizColor,
        CellAttr::FrameVertColor,
        CellAttr::Type,
        CellAttr::Alignment,
    ];

    /// Presence bit for this attribute.
    pub fn flag(self) -> AttrFlags {
        match self {
            Self::Font => AttrFlags::FONT,
            Self::FgColor => AttrFlags::FGCOLOR,
            Self::BgColor => AttrFlags::BGCOLOR,
            Self::FrameHorizColor => AttrFlags::FRAMEHCOLOR,
            Self::FrameVertColor => AttrFlags::FRAMEVCOLOR,
            Self::Type => AttrFlags::TYPE,
            Self::Alignment => AttrFlags::ALIGNMENT,
        }
    }

    /// Toolkit attribute name prefix.
    pub fn name(self) -> &'static str {
        match self {
            Self::Font => "FONT",
            Self::FgColor => "FGCOLOR",
            Self::BgColor => "BGCOLOR",
            Self::FrameHorizColor => "FRAMEHORIZCOLOR",
            Self::FrameVertColor => "FRAMEVERTCOLOR",
            Self::Type => "TYPE",
            Self::Alignment => "ALIGNMENT",
        }
    }

    /// Match a name prefix, returning the attribute and the remaining suffix.
    ///
    /// Longer names are tried first so `FRAMEHORIZCOLOR` never matches as `FONT...`.
    pub fn split_name(name: &str) -> Option<(Self, &str)> {
        let mut candidates = Self::ALL;
        candidates.sort_by_key(|a| std::cmp::Reverse(a.name().len()));
        candidates
            .into_iter()
            .find_map(|attr| name.strip_prefix(attr.name()).map(|rest| (attr, rest)))
    }
}

/// Backing storage for one cell in owned mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// Text value, `None` when never set or cleared.
    pub value: Option<String>,
    /// Per-cell override presence and mark state.
    pub flags: AttrFlags,
}

/// How a cell's value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CellType {
    /// Value drawn as text (numeric columns are formatted first).
    #[default]
    Text,
    /// Value is a color; the cell is filled with it.
    Color,
    /// Value is a percentage; a proportional bar is filled.
    Fill,
    /// Value names an image handed to the canvas.
    Image,
    /// Value is `"0"`/`"1"`, drawn as a check box.
    Toggle,
}

impl CellType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TEXT" => Some(Self::Text),
            "COLOR" => Some(Self::Color),
            "FILL" => Some(Self::Fill),
            "IMAGE" => Some(Self::Image),
            "TOGGLE" => Some(Self::Toggle),
            _ => None,
        }
    }
}

/// Horizontal text alignment inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical text alignment inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Combined alignment, written as `"ALEFT"`, `"ARIGHT:ATOP"`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Alignment {
    pub horizontal: HAlign,
    pub vertical: VAlign,
}

impl Alignment {
    pub const fn new(horizontal: HAlign, vertical: VAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Parse `"ALEFT"`, `"ACENTER:ABOTTOM"`, or the bare `"LEFT"`/`"RIGHT"` forms.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split(':');
        let h = parts.next()?.trim().to_ascii_uppercase();
        let horizontal = match h.trim_start_matches('A') {
            "LEFT" => HAlign::Left,
            "CENTER" => HAlign::Center,
            "RIGHT" => HAlign::Right,
            _ => return None,
        };
        let vertical = match parts.next().map(|v| v.trim().to_ascii_uppercase()) {
            None => VAlign::Center,
            Some(v) => match v.trim_start_matches('A') {
                "TOP" => VAlign::Top,
                "CENTER" => VAlign::Center,
                "BOTTOM" => VAlign::Bottom,
                _ => return None,
            },
        };
        Some(Self::new(horizontal, vertical))
    }

    pub fn to_attr_string(self) -> String {
        let h = match self.horizontal {
            HAlign::Left => "ALEFT",
            HAlign::Center => "ACENTER",
            HAlign::Right => "ARIGHT",
        };
        let v = match self.vertical {
            VAlign::Top => "ATOP",
            VAlign::Center => "ACENTER",
            VAlign::Bottom => "ABOTTOM",
        };
        format!("{h}:{v}")
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

    #[test]
    fn test_every_attr_has_distinct_flag() {
        let mut seen = AttrFlags::empty();
        for attr in CellAttr::ALL {
            assert!(!seen.intersects(attr.flag()), "{attr:?} shares a bit");
            seen |= attr.flag();
        }
        assert!(!seen.contains(AttrFlags::MARKED));
    }

    #[test]
    fn test_split_name_prefers_longest() {
        assert_eq!(
            CellAttr::split_name("FRAMEHORIZCOLOR2:3"),
            Some((CellAttr::FrameHorizColor, "2:3"))
        );
        assert_eq!(CellAttr::split_name("FONT*:1"), Some((CellAttr::Font, "*:1")));
        assert_eq!(CellAttr::split_name("WIDTH1"), None);
    }

    #[test]
    fn test_alignment_parse() {
        assert_eq!(
            Alignment::parse("ARIGHT"),
            Some(Alignment::new(HAlign::Right, VAlign::Center))
        );
        assert_eq!(
            Alignment::parse("aleft:atop"),
            Some(Alignment::new(HAlign::Left, VAlign::Top))
        );
        assert_eq!(Alignment::parse("SIDEWAYS"), None);
    }

    #[test]
    fn test_cell_type_parse() {
        assert_eq!(CellType::parse("color"), Some(CellType::Color));
        assert_eq!(CellType::parse("nope"), None);
    }
}

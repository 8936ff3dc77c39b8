//! User-facing names for cursor styles, status colors and alignments, mapped
//! onto the host's native values. Every lookup is total: unknown input yields
//! `None` and the host default applies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Editor cursor style, numbered the way the host numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorStyle {
    #[default]
    Line = 1,
    Block = 2,
    Underline = 3,
    LineThin = 4,
    BlockOutline = 5,
    UnderlineThin = 6,
}

impl CursorStyle {
    pub const ALL: [CursorStyle; 6] = [
        Self::Line,
        Self::Block,
        Self::Underline,
        Self::LineThin,
        Self::BlockOutline,
        Self::UnderlineThin,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "line" => Some(Self::Line),
            "block" => Some(Self::Block),
            "underline" => Some(Self::Underline),
            "line-thin" => Some(Self::LineThin),
            "block-outline" => Some(Self::BlockOutline),
            "underline-thin" => Some(Self::UnderlineThin),
            _ => None,
        }
    }

    pub fn from_native(n: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.native() == n)
    }

    pub fn native(self) -> i64 {
        self as i64
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Block => "block",
            Self::Underline => "underline",
            Self::LineThin => "line-thin",
            Self::BlockOutline => "block-outline",
            Self::UnderlineThin => "underline-thin",
        }
    }
}

/// Map a configured cursor (name or native number) to a style.
pub fn cursorify(input: Option<&Value>) -> Option<CursorStyle> {
    match input? {
        Value::String(s) => CursorStyle::from_name(s),
        Value::Number(n) => n.as_i64().and_then(CursorStyle::from_native),
        _ => None,
    }
}

/// A status item color: a host theme color id or a raw color string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Theme(String),
    Raw(String),
}

/// Only the two severities the host ships status item backgrounds for.
pub fn map_background_color(input: &str) -> Option<StatusColor> {
    match input {
        "error" => Some(StatusColor::Theme("statusBarItem.errorBackground".into())),
        "warning" => Some(StatusColor::Theme("statusBarItem.warningBackground".into())),
        _ => None,
    }
}

/// Which side of the status bar an item sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left = 1,
    Right = 2,
}

impl Alignment {
    /// Accepts `"left"`/`"right"` or the host's native 1/2.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => match s.as_str() {
                "left" => Some(Self::Left),
                "right" => Some(Self::Right),
                _ => None,
            },
            Value::Number(n) => match n.as_i64()? {
                1 => Some(Self::Left),
                2 => Some(Self::Right),
                _ => None,
            },
            _ => None,
        }
    }
}

//! Settings loading and the context normalizer.
//!
//! Users may write a context as any of five shorthands:
//!
//! ```json
//! "contextually.contexts": [
//!     "myFlag",
//!     ["mode", "dark"],
//!     ["insert", false, "underline"],
//!     { "name": "vim", "initial": "normal", "map": [["insert", "line", "-- INSERT --"]] },
//!     { "name": "bare", "initial": 3 }
//! ]
//! ```
//!
//! Each one collapses onto a single [`ContextDeclaration`]. Entries that fit none
//! of the shapes are dropped without error.

use crate::errors::Result;
use crate::value::ContextValue;
use crate::vocabulary::{cursorify, map_background_color, Alignment, CursorStyle, StatusColor};
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

pub const SECTION: &str = "contextually";
pub const CONTEXTS_KEY: &str = "contexts";

/// Canonical description of one context.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextDeclaration {
    pub name: String,
    pub initial: ContextValue,
    /// Whether `turnOn`/`turnOff`/`toggle` commands are generated.
    pub auto_commands: bool,
    pub mappings: Vec<ValueMapping>,
}

impl ContextDeclaration {
    /// Declaration used for contexts set at runtime without being configured.
    pub fn ad_hoc(name: &str, value: ContextValue) -> Self {
        Self {
            name: name.to_string(),
            initial: value,
            auto_commands: false,
            mappings: Vec::new(),
        }
    }

    /// First mapping whose key equals `value`.
    pub fn mapping_for(&self, value: &ContextValue) -> Option<&ValueMapping> {
        self.mappings.iter().find(|m| &m.key == value)
    }

    pub fn first_status_view(&self) -> Option<&StatusView> {
        self.mappings.iter().find_map(|m| m.status_view.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueMapping {
    pub key: ContextValue,
    pub cursor_style: Option<CursorStyle>,
    pub status_view: Option<StatusView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub text: String,
    pub color: Option<StatusColor>,
    pub background_color: Option<StatusColor>,
    pub alignment: Alignment,
    pub priority: i32,
}

impl StatusView {
    fn with_text(text: String) -> Self {
        Self {
            text,
            color: None,
            background_color: None,
            alignment: Alignment::Left,
            priority: 1,
        }
    }
}

/// The full object form, with or without a `map`.
///
/// Only `name` is typed strictly; the optional fields are read leniently so a
/// mistyped one falls back to its default instead of losing the context.
#[derive(Debug, Deserialize)]
struct FullContextConfig {
    name: String,
    #[serde(default)]
    initial: Option<Value>,
    #[serde(default)]
    map: Option<Value>,
    #[serde(rename = "add-toggles", default)]
    add_toggles: Option<Value>,
}

/// The object form of a single value mapping.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueViewConfig {
    val: ContextValue,
    #[serde(default)]
    cursor: Option<Value>,
    #[serde(default)]
    text: Option<Value>,
    #[serde(default)]
    color: Option<Value>,
    #[serde(default, alias = "bg")]
    background_color: Option<Value>,
    #[serde(default)]
    alignment: Option<Value>,
    #[serde(default)]
    priority: Option<Value>,
}

/// Non-empty strings, and numbers rendered as text. Everything else counts as unset.
fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One recognized shape of a raw context entry, in matching precedence.
#[derive(Debug)]
enum RawContextEntry {
    Name(String),
    Pair(String, ContextValue),
    Triple(String, ContextValue, Value),
    /// Covers both the `map` form and the bare object form.
    Full(FullContextConfig),
}

impl RawContextEntry {
    fn classify(raw: &Value) -> Option<Self> {
        match raw {
            Value::String(name) => Some(Self::Name(name.clone())),
            Value::Array(items) => {
                let name = items.first()?.as_str()?.to_string();
                let initial = ContextValue::from_json(items.get(1)?)?;
                match items.len() {
                    2 => Some(Self::Pair(name, initial)),
                    3 => Some(Self::Triple(name, initial, items[2].clone())),
                    _ => None,
                }
            }
            Value::Object(_) => serde_json::from_value(raw.clone()).ok().map(Self::Full),
            _ => None,
        }
    }

    fn into_declaration(self) -> ContextDeclaration {
        match self {
            Self::Name(name) => ContextDeclaration {
                name,
                initial: ContextValue::Bool(false),
                auto_commands: true,
                mappings: Vec::new(),
            },
            Self::Pair(name, initial) => ContextDeclaration {
                name,
                auto_commands: initial.is_bool(),
                initial,
                mappings: Vec::new(),
            },
            Self::Triple(name, initial, cursor) => ContextDeclaration {
                name,
                auto_commands: initial.is_bool(),
                initial,
                mappings: vec![ValueMapping {
                    key: ContextValue::Bool(true),
                    cursor_style: cursorify(Some(&cursor)),
                    status_view: None,
                }],
            },
            Self::Full(full) => {
                let initial = full
                    .initial
                    .as_ref()
                    .and_then(ContextValue::from_json)
                    .unwrap_or(ContextValue::Bool(false));
                let mappings = full
                    .map
                    .as_ref()
                    .and_then(Value::as_array)
                    .map(|raw| raw.as_slice())
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|raw| normalize_mapping(&full.name, raw))
                    .unique_by(|m| m.key.key())
                    .collect();
                ContextDeclaration {
                    auto_commands: full.add_toggles == Some(Value::Bool(true)) || initial.is_bool(),
                    name: full.name,
                    initial,
                    mappings,
                }
            }
        }
    }
}

fn normalize_mapping(context_name: &str, raw: &Value) -> Option<ValueMapping> {
    match raw {
        Value::Array(items) => {
            let key = ContextValue::from_json(items.first()?)?;
            let cursor_style = cursorify(items.get(1));
            match items.len() {
                2 => Some(ValueMapping {
                    key,
                    cursor_style,
                    status_view: None,
                }),
                3 => Some(ValueMapping {
                    key,
                    cursor_style,
                    status_view: text_field(items.get(2)).map(StatusView::with_text),
                }),
                _ => None,
            }
        }
        Value::Object(_) => {
            let view: ValueViewConfig = serde_json::from_value(raw.clone()).ok()?;
            let text = text_field(view.text.as_ref());
            let color = text_field(view.color.as_ref());
            let background = text_field(view.background_color.as_ref());
            let has_status = text.is_some() || color.is_some() || background.is_some();
            let status_view = has_status.then(|| StatusView {
                text: text.unwrap_or_else(|| context_name.to_string()),
                color: color.map(StatusColor::Raw),
                background_color: background
                    .map(|bg| map_background_color(&bg).unwrap_or(StatusColor::Raw(bg))),
                alignment: view
                    .alignment
                    .as_ref()
                    .and_then(Alignment::from_json)
                    .unwrap_or_default(),
                priority: view
                    .priority
                    .as_ref()
                    .and_then(Value::as_f64)
                    .map(|p| p as i32)
                    .unwrap_or(1),
            });
            Some(ValueMapping {
                key: view.val,
                cursor_style: cursorify(view.cursor.as_ref()),
                status_view,
            })
        }
        _ => None,
    }
}

/// Normalize raw context entries, preserving input order.
pub fn normalize(raw: &[Value]) -> Vec<ContextDeclaration> {
    raw.iter()
        .filter_map(|entry| match RawContextEntry::classify(entry) {
            Some(shape) => Some(shape.into_declaration()),
            None => {
                tracing::debug!(%entry, "dropping unrecognized context entry");
                None
            }
        })
        .filter(|decl| !decl.name.is_empty())
        .collect()
}

/// The raw settings blob handed over by the host configuration loader.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    contexts: Vec<Value>,
}

impl Settings {
    /// Accepts both `{"contextually.contexts": [...]}` and
    /// `{"contextually": {"contexts": [...]}}`.
    pub fn from_value(blob: &Value) -> Self {
        let flat = format!("{SECTION}.{CONTEXTS_KEY}");
        let contexts = blob
            .get(&flat)
            .or_else(|| blob.get(SECTION).and_then(|s| s.get(CONTEXTS_KEY)))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Self { contexts }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let blob: Value = serde_json::from_str(s)?;
        Ok(Self::from_value(&blob))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn raw_contexts(&self) -> &[Value] {
        &self.contexts
    }

    pub fn declarations(&self) -> Vec<ContextDeclaration> {
        normalize(&self.contexts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn one(raw: Value) -> ContextDeclaration {
        let mut out = normalize(&[raw]);
        assert_eq!(out.len(), 1);
        out.remove(0)
    }

    #[test]
    fn object_map_entries_in_all_three_forms() {
        let decl = one(json!({
            "name": "vim",
            "initial": "normal",
            "map": [
                ["normal", "block"],
                ["insert", "line", "-- INSERT --"],
                {"val": "visual", "cursor": "block-outline", "bg": "warning", "alignment": "right", "priority": 5}
            ]
        }));
        assert!(!decl.auto_commands);
        assert_eq!(decl.mappings.len(), 3);
        assert_eq!(decl.mappings[0].cursor_style, Some(CursorStyle::Block));
        assert_eq!(decl.mappings[0].status_view, None);
        assert_eq!(
            decl.mappings[1].status_view,
            Some(StatusView::with_text("-- INSERT --".into()))
        );
        assert_eq!(
            decl.mappings[2].status_view,
            Some(StatusView {
                text: "vim".into(),
                color: None,
                background_color: Some(StatusColor::Theme(
                    "statusBarItem.warningBackground".into()
                )),
                alignment: Alignment::Right,
                priority: 5,
            })
        );
    }

    #[test]
    fn object_mapping_without_status_fields_has_no_view() {
        let decl = one(json!({"name": "a", "initial": true, "map": [{"val": true, "cursor": "block", "priority": 9}]}));
        assert_eq!(decl.mappings[0].status_view, None);
    }

    #[test]
    fn raw_colors_pass_through() {
        let decl = one(json!({"name": "a", "map": [{"val": 1, "color": "#fff", "backgroundColor": "#c00"}]}));
        let view = decl.mappings[0].status_view.clone().unwrap();
        assert_eq!(view.color, Some(StatusColor::Raw("#fff".into())));
        assert_eq!(view.background_color, Some(StatusColor::Raw("#c00".into())));
        assert_eq!(decl.initial, ContextValue::Bool(false));
    }

    #[test]
    fn duplicate_keys_keep_the_first() {
        let decl = one(json!({"name": "a", "initial": false, "map": [[true, "block"], [true, "underline"], [false, "line"]]}));
        assert_eq!(decl.mappings.len(), 2);
        assert_eq!(decl.mappings[0].cursor_style, Some(CursorStyle::Block));
    }

    #[test]
    fn malformed_mappings_are_dropped() {
        let decl = one(json!({"name": "a", "initial": 0, "map": [[1], [null, "block"], 7, {"cursor": "line"}, [3, "line"]]}));
        assert_eq!(decl.mappings.len(), 1);
        assert_eq!(decl.mappings[0].key, ContextValue::Number(3.0));
    }

    #[test]
    fn mistyped_optional_fields_fall_back_to_defaults() {
        let decl = one(json!({"name": "a", "initial": true, "add-toggles": "yes"}));
        assert!(decl.auto_commands);

        let decl = one(json!({"name": "b", "initial": "s", "add-toggles": 1, "map": "nope"}));
        assert!(!decl.auto_commands);
        assert_eq!(decl.mappings, vec![]);

        let decl = one(json!({"name": "c", "initial": [1], "map": [
            {"val": true, "text": "ON", "priority": "5"},
            {"val": false, "text": 7, "color": false, "bg": {"x": 1}},
            {"val": 2, "text": ["x"]},
            [3, "line", null]
        ]}));
        assert_eq!(decl.initial, ContextValue::Bool(false));
        assert_eq!(decl.mappings.len(), 4);
        assert_eq!(decl.mappings[0].status_view, Some(StatusView::with_text("ON".into())));
        assert_eq!(decl.mappings[1].status_view, Some(StatusView::with_text("7".into())));
        assert_eq!(decl.mappings[2].status_view, None);
        assert_eq!(decl.mappings[3].status_view, None);
    }

    #[test]
    fn empty_text_counts_as_unset() {
        let decl = one(json!({"name": "e", "map": [
            {"val": true, "text": ""},
            {"val": false, "text": "", "bg": "error"}
        ]}));
        assert_eq!(decl.mappings[0].status_view, None);
        assert_eq!(decl.mappings[1].status_view.as_ref().unwrap().text, "e");
    }

    #[test]
    fn rejected_entries() {
        let out = normalize(&[
            json!(42),
            json!(null),
            json!([]),
            json!(["a"]),
            json!(["a", true, "line", "extra"]),
            json!([1, true]),
            json!(["a", null]),
            json!({"initial": true}),
            json!({"name": ""}),
            json!(""),
        ]);
        assert_eq!(out, vec![]);
    }

    #[test]
    fn settings_accepts_flat_and_nested_keys() {
        let flat = Settings::from_json_str(r#"{"contextually.contexts": ["a"]}"#).unwrap();
        let nested = Settings::from_json_str(r#"{"contextually": {"contexts": ["b"]}}"#).unwrap();
        let missing = Settings::from_json_str(r#"{"editor.fontSize": 12}"#).unwrap();
        assert_eq!(flat.declarations()[0].name, "a");
        assert_eq!(nested.declarations()[0].name, "b");
        assert!(missing.declarations().is_empty());
        assert!(Settings::from_json_str("{").is_err());
    }
}

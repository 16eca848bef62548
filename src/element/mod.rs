//! The declarative element tree — plain data describing an interface.
//!
//! An [`Element`] is the only persistent entity: a type tag, a name, an
//! ordered list of child elements and a free-form property bag. Elements
//! are built once (as literals or via [`json`]) and are read-only inputs
//! to materialization; the live widgets they describe belong to the
//! toolkit.

pub mod json;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ───────────────────────────────────────── element kinds ─────

/// The closed set of recognized element type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Window,
    MenuBar,
    DropDownMenu,
    MenuCommand,
    Frame,
    TabBinder,
    Tab,
    TextLine,
    TextBox,
    Entry,
    DropDown,
    Button,
}

impl ElementKind {
    /// Ordered list of all kinds (used by the default-table tests).
    pub const ALL: &[ElementKind] = &[
        ElementKind::Window,
        ElementKind::MenuBar,
        ElementKind::DropDownMenu,
        ElementKind::MenuCommand,
        ElementKind::Frame,
        ElementKind::TabBinder,
        ElementKind::Tab,
        ElementKind::TextLine,
        ElementKind::TextBox,
        ElementKind::Entry,
        ElementKind::DropDown,
        ElementKind::Button,
    ];

    /// The type tag as it appears in element data.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Window => "window",
            ElementKind::MenuBar => "menu_bar",
            ElementKind::DropDownMenu => "drop_down_menu",
            ElementKind::MenuCommand => "menu_command",
            ElementKind::Frame => "frame",
            ElementKind::TabBinder => "tab_binder",
            ElementKind::Tab => "tab",
            ElementKind::TextLine => "text_line",
            ElementKind::TextBox => "text_box",
            ElementKind::Entry => "entry",
            ElementKind::DropDown => "drop_down",
            ElementKind::Button => "button",
        }
    }

    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "window" => Some(ElementKind::Window),
            "menu_bar" => Some(ElementKind::MenuBar),
            "drop_down_menu" => Some(ElementKind::DropDownMenu),
            "menu_command" => Some(ElementKind::MenuCommand),
            "frame" => Some(ElementKind::Frame),
            "tab_binder" => Some(ElementKind::TabBinder),
            "tab" => Some(ElementKind::Tab),
            "text_line" => Some(ElementKind::TextLine),
            "text_box" => Some(ElementKind::TextBox),
            "entry" => Some(ElementKind::Entry),
            "drop_down" => Some(ElementKind::DropDown),
            "button" => Some(ElementKind::Button),
            _ => None,
        }
    }

    /// Leaf kinds may never carry children.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            ElementKind::MenuCommand
                | ElementKind::TextLine
                | ElementKind::TextBox
                | ElementKind::Entry
                | ElementKind::DropDown
                | ElementKind::Button
        )
    }

    /// Kinds that occupy a grid cell inside their parent. Windows are
    /// top-level, tabs are positioned by their binder, and a menu bar is
    /// window chrome rather than grid content.
    pub fn is_grid_placed(self) -> bool {
        !matches!(
            self,
            ElementKind::Window | ElementKind::MenuBar | ElementKind::Tab
        )
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ───────────────────────────────────────── property values ───

/// A single property value. JSON null is the absent-sentinel some
/// defaults use (e.g. `drop_down.default_option`); lists only carry
/// strings (`drop_down.options`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<String>),
}

/// Property bag — ordered so serialization round-trips are stable.
pub type PropMap = BTreeMap<String, PropValue>;

impl PropValue {
    /// Bool-ish interpretation. Besides real booleans the original data
    /// format spells truth as the strings "True" or "Yes".
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Bool(b) => *b,
            PropValue::Str(s) => matches!(s.as_str(), "True" | "true" | "Yes" | "yes"),
            _ => false,
        }
    }

    /// Integer interpretation: integers, whole floats and numeric
    /// strings. Anything else is `None`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropValue::Int(n) => Some(*n),
            PropValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            PropValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Display-text interpretation (labels, initial entry values).
    pub fn as_text(&self) -> Option<String> {
        match self {
            PropValue::Str(s) => Some(s.clone()),
            PropValue::Int(n) => Some(n.to_string()),
            PropValue::Float(f) => Some(f.to_string()),
            PropValue::Bool(b) => Some(b.to_string()),
            PropValue::Null | PropValue::List(_) => None,
        }
    }

    /// Option-list interpretation: a bare string is a one-element list.
    pub fn as_options(&self) -> Option<Vec<String>> {
        match self {
            PropValue::List(items) => Some(items.clone()),
            PropValue::Str(s) => Some(vec![s.clone()]),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Str(s.to_string())
    }
}

impl From<i64> for PropValue {
    fn from(n: i64) -> Self {
        PropValue::Int(n)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

// ───────────────────────────────────────── element ───────────

/// One node of the declarative interface description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// Type tag; see [`ElementKind`] for the recognized set.
    #[serde(rename = "type")]
    pub kind: String,
    /// Identifier used as the lookup key in the realized-widget registry.
    pub name: String,
    #[serde(default)]
    pub children: Vec<Element>,
    #[serde(default)]
    pub properties: PropMap,
}

impl Element {
    pub fn new(kind: &str, name: &str) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
            children: Vec::new(),
            properties: PropMap::new(),
        }
    }

    /// Set a property (builder-style, for literal trees and tests).
    pub fn with(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Append a child element (builder-style).
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for &kind in ElementKind::ALL {
            assert_eq!(ElementKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(ElementKind::from_tag("checkbox"), None);
    }

    #[test]
    fn truthiness_accepts_data_format_spellings() {
        assert!(PropValue::Bool(true).is_truthy());
        assert!(PropValue::Str("True".into()).is_truthy());
        assert!(PropValue::Str("Yes".into()).is_truthy());
        assert!(!PropValue::Str("no".into()).is_truthy());
        assert!(!PropValue::Int(1).is_truthy());
        assert!(!PropValue::Null.is_truthy());
    }

    #[test]
    fn ints_parse_from_numbers_and_strings() {
        assert_eq!(PropValue::Int(3).as_int(), Some(3));
        assert_eq!(PropValue::Float(2.0).as_int(), Some(2));
        assert_eq!(PropValue::Str(" 7 ".into()).as_int(), Some(7));
        assert_eq!(PropValue::Float(2.5).as_int(), None);
        assert_eq!(PropValue::Str("wide".into()).as_int(), None);
        assert_eq!(PropValue::Bool(true).as_int(), None);
    }

    #[test]
    fn options_promote_bare_strings() {
        let single = PropValue::Str("only".into());
        assert_eq!(single.as_options(), Some(vec!["only".to_string()]));
        let list = PropValue::List(vec!["a".into(), "b".into()]);
        assert_eq!(list.as_options().unwrap().len(), 2);
        assert_eq!(PropValue::Int(4).as_options(), None);
    }
}

//! Per-type default-property tables and the property resolver.
//!
//! Every recognized element type carries a compile-time table of the
//! property keys it understands and their defaults. [`resolve`] is a
//! total, pure function over any raw property bag: supplied keys win,
//! table keys fill the gaps, unrecognized keys are dropped silently.
//!
//! `column` defaults to the absent-sentinel rather than a number — an
//! unspecified column resolves dynamically to the placement planner's
//! running cursor, so no fixed default can live here. `on_new_row` and
//! `column` are accepted on every type except `tab`.

use crate::element::{ElementKind, PropMap, PropValue};

// ───────────────────────────────────────── table values ──────

/// Const-friendly default value; converted to a [`PropValue`] at
/// resolution time. `Absent` is the sentinel default ("no such
/// option"), which resolves to `PropValue::Null` and must be honored by
/// the builder rather than treated as an error.
#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    Str(&'static str),
    Int(i64),
    Bool(bool),
    StrList(&'static [&'static str]),
    Absent,
}

impl DefaultValue {
    fn to_prop(self) -> PropValue {
        match self {
            DefaultValue::Str(s) => PropValue::Str(s.to_string()),
            DefaultValue::Int(n) => PropValue::Int(n),
            DefaultValue::Bool(b) => PropValue::Bool(b),
            DefaultValue::StrList(items) => {
                PropValue::List(items.iter().map(|s| s.to_string()).collect())
            }
            DefaultValue::Absent => PropValue::Null,
        }
    }
}

// ───────────────────────────────────────── the tables ────────

use DefaultValue::{Absent, Bool, Int, Str, StrList};

const WINDOW: &[(&str, DefaultValue)] = &[
    ("visible_text", Str("Default Window Title")),
    ("size_and_position", Str("1040x640+0+0")),
    ("action", Str("exit")),
    ("on_new_row", Bool(false)),
    ("column", Absent),
];

const MENU_BAR: &[(&str, DefaultValue)] = &[("on_new_row", Bool(false)), ("column", Absent)];

const DROP_DOWN_MENU: &[(&str, DefaultValue)] = &[
    ("visible_text", Str("Menu")),
    ("on_new_row", Bool(false)),
    ("column", Absent),
];

const MENU_COMMAND: &[(&str, DefaultValue)] = &[
    ("visible_text", Str("Default Command Label")),
    ("action", Str("print")),
    ("on_new_row", Bool(false)),
    ("column", Absent),
];

const FRAME: &[(&str, DefaultValue)] = &[
    ("visible_text", Absent),
    ("width", Int(500)),
    ("height", Int(20)),
    ("on_new_row", Bool(false)),
    ("column", Absent),
];

const TAB_BINDER: &[(&str, DefaultValue)] = &[("on_new_row", Bool(false)), ("column", Absent)];

const TAB: &[(&str, DefaultValue)] = &[("visible_text", Str("Default Tab Label"))];

const TEXT_LINE: &[(&str, DefaultValue)] = &[
    ("visible_text", Str("Default text")),
    ("justification", Str("left")),
    ("visible", Bool(true)),
    ("on_new_row", Bool(false)),
    ("column", Absent),
];

const TEXT_BOX: &[(&str, DefaultValue)] = &[
    ("default_text", Str("")),
    ("width", Int(40)),
    ("height", Int(5)),
    ("has_scrollbar", Bool(false)),
    ("parameter_name", Str("default_text_parameter_name")),
    ("visible", Bool(true)),
    ("on_new_row", Bool(false)),
    ("column", Absent),
];

const ENTRY: &[(&str, DefaultValue)] = &[
    ("visible_text", Str("New Value Entry")),
    ("default_value", Str("0")),
    ("width", Int(15)),
    ("parameter_name", Str("default_parameter_name")),
    ("visible", Bool(true)),
    ("on_new_row", Bool(false)),
    ("column", Absent),
];

const DROP_DOWN: &[(&str, DefaultValue)] = &[
    ("visible_text", Str("Default drop-down text")),
    ("options", StrList(&["Default_Option"])),
    ("default_option", Absent),
    ("only_selectable", Bool(true)),
    ("width", Int(40)),
    ("parameter_name", Str("default_parameter_name")),
    ("action", Absent),
    ("visible", Bool(true)),
    ("on_new_row", Bool(false)),
    ("column", Absent),
];

const BUTTON: &[(&str, DefaultValue)] = &[
    ("visible_text", Str("Default Button Text")),
    ("action", Str("print")),
    ("visible", Bool(true)),
    ("on_new_row", Bool(false)),
    ("column", Absent),
];

/// The default table for one element type.
pub fn default_table(kind: ElementKind) -> &'static [(&'static str, DefaultValue)] {
    match kind {
        ElementKind::Window => WINDOW,
        ElementKind::MenuBar => MENU_BAR,
        ElementKind::DropDownMenu => DROP_DOWN_MENU,
        ElementKind::MenuCommand => MENU_COMMAND,
        ElementKind::Frame => FRAME,
        ElementKind::TabBinder => TAB_BINDER,
        ElementKind::Tab => TAB,
        ElementKind::TextLine => TEXT_LINE,
        ElementKind::TextBox => TEXT_BOX,
        ElementKind::Entry => ENTRY,
        ElementKind::DropDown => DROP_DOWN,
        ElementKind::Button => BUTTON,
    }
}

/// The documented default for a single key, if the type knows it.
pub fn default_value(kind: ElementKind, key: &str) -> Option<PropValue> {
    default_table(kind)
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_prop())
}

// ───────────────────────────────────────── resolver ──────────

/// Produce a fully-defaulted property set for `kind`.
///
/// Total over any input; idempotent (resolving an already-resolved bag
/// is a no-op).
pub fn resolve(kind: ElementKind, raw: &PropMap) -> PropMap {
    let mut resolved = PropMap::new();
    for (key, default) in default_table(kind) {
        let value = raw
            .get(*key)
            .cloned()
            .unwrap_or_else(|| default.to_prop());
        resolved.insert((*key).to_string(), value);
    }
    resolved
}

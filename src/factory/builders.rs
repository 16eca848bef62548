//! Per-type builders — resolved properties in, widget specs out.
//!
//! A builder consumes only the property keys meaningful to its type and
//! applies the type's construction rules (scrollbar wiring, option
//! pre-selection, geometry parsing). Builders are pure over the
//! resolved bag: malformed values never abort a build, they fall back
//! to the type's documented default with a logged warning.

use crate::element::{ElementKind, PropMap, PropValue};
use crate::toolkit::{Geometry, Justify, WidgetSpec};

use super::defaults;

// ───────────────────────────────────────── property access ───

/// Display text for a key that is always present post-resolution.
fn text(resolved: &PropMap, key: &str) -> String {
    resolved
        .get(key)
        .and_then(PropValue::as_text)
        .unwrap_or_default()
}

/// Display text, honoring the absent-sentinel.
fn opt_text(resolved: &PropMap, key: &str) -> Option<String> {
    resolved.get(key).and_then(PropValue::as_text)
}

fn truthy(resolved: &PropMap, key: &str) -> bool {
    resolved.get(key).is_some_and(PropValue::is_truthy)
}

/// Numeric property with fall-back to the type's documented default.
fn numeric(kind: ElementKind, resolved: &PropMap, key: &str, element: &str) -> i64 {
    if let Some(n) = resolved.get(key).and_then(PropValue::as_int) {
        return n.max(0);
    }
    tracing::warn!(
        element,
        property = key,
        "non-numeric value, using the {kind} default"
    );
    defaults::default_value(kind, key)
        .and_then(|v| v.as_int())
        .unwrap_or(0)
}

// ───────────────────────────────────────── builders ──────────

/// Translate a resolved property bag into the construction order for
/// `kind`. `element` is the element name, used in degradation warnings.
pub fn build_spec(kind: ElementKind, element: &str, resolved: &PropMap) -> WidgetSpec {
    match kind {
        ElementKind::Window => build_window(element, resolved),
        ElementKind::MenuBar => WidgetSpec::MenuBar,
        ElementKind::DropDownMenu => WidgetSpec::Menu {
            label: text(resolved, "visible_text"),
        },
        ElementKind::MenuCommand => WidgetSpec::MenuCommand {
            label: text(resolved, "visible_text"),
        },
        ElementKind::Frame => WidgetSpec::Frame {
            label: opt_text(resolved, "visible_text"),
            width: numeric(kind, resolved, "width", element) as u32,
            height: numeric(kind, resolved, "height", element) as u32,
        },
        ElementKind::TabBinder => WidgetSpec::TabBinder,
        ElementKind::Tab => WidgetSpec::Tab {
            label: text(resolved, "visible_text"),
        },
        ElementKind::TextLine => WidgetSpec::TextLine {
            text: text(resolved, "visible_text"),
            justify: Justify::from_tag(&text(resolved, "justification")),
            visible: truthy(resolved, "visible"),
        },
        ElementKind::TextBox => WidgetSpec::TextBox {
            text: text(resolved, "default_text"),
            width: numeric(kind, resolved, "width", element) as u16,
            height: numeric(kind, resolved, "height", element) as u16,
            scrollbar: truthy(resolved, "has_scrollbar"),
        },
        ElementKind::Entry => WidgetSpec::Entry {
            label: text(resolved, "visible_text"),
            value: text(resolved, "default_value"),
            width: numeric(kind, resolved, "width", element) as u16,
        },
        ElementKind::DropDown => build_drop_down(element, resolved),
        ElementKind::Button => WidgetSpec::Button {
            label: text(resolved, "visible_text"),
            visible: truthy(resolved, "visible"),
        },
    }
}

fn build_window(element: &str, resolved: &PropMap) -> WidgetSpec {
    let raw = text(resolved, "size_and_position");
    let geometry = Geometry::parse(&raw).unwrap_or_else(|| {
        tracing::warn!(element, geometry = %raw, "unparseable geometry, using the default");
        let fallback = defaults::default_value(ElementKind::Window, "size_and_position")
            .and_then(|v| v.as_text())
            .unwrap_or_default();
        Geometry::parse(&fallback).expect("default geometry parses")
    });
    WidgetSpec::Window {
        title: text(resolved, "visible_text"),
        geometry,
    }
}

fn build_drop_down(element: &str, resolved: &PropMap) -> WidgetSpec {
    let options = resolved
        .get("options")
        .and_then(PropValue::as_options)
        .filter(|opts| !opts.is_empty())
        .unwrap_or_else(|| {
            tracing::warn!(element, "drop-down without usable options, using the default list");
            defaults::default_value(ElementKind::DropDown, "options")
                .and_then(|v| v.as_options())
                .unwrap_or_default()
        });

    // Pre-select the default option when it actually is one of the
    // options; anything else falls back to the first entry.
    let selected = match opt_text(resolved, "default_option") {
        Some(choice) if options.contains(&choice) => choice,
        Some(choice) => {
            tracing::warn!(
                element,
                option = %choice,
                "default_option is not among the options, pre-selecting the first"
            );
            options[0].clone()
        }
        None => options[0].clone(),
    };

    WidgetSpec::DropDown {
        label: text(resolved, "visible_text"),
        options,
        selected,
        locked: truthy(resolved, "only_selectable"),
        width: numeric(ElementKind::DropDown, resolved, "width", element) as u16,
    }
}

/// Which action, if any, this element wants bound to its activation.
pub fn action_request(kind: ElementKind, resolved: &PropMap) -> Option<String> {
    match kind {
        ElementKind::Window | ElementKind::MenuCommand | ElementKind::Button => {
            Some(text(resolved, "action"))
        }
        // Selection-changed action, only when declared.
        ElementKind::DropDown => opt_text(resolved, "action"),
        _ => None,
    }
}

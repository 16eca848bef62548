//! The widget/geometry interface the factory drives.
//!
//! The engine never talks to a concrete UI library; it only consumes
//! this trait. A backend must offer create-widget-of-kind construction,
//! grid placement, activation binding, subtree destruction and the
//! small value read/write surface the realized [`Interface`] exposes.
//!
//! [`Interface`]: crate::factory::Interface

pub mod headless;

use std::rc::Rc;

use thiserror::Error;

use crate::element::ElementKind;

/// Handle to a live widget inside a backend's arena.
pub type WidgetId = usize;

/// A callable bound to an interactive widget's activation event.
pub type ActionFn = Rc<dyn Fn()>;

// ───────────────────────────────────────── geometry ──────────

/// Window geometry in `"WxH+X+Y"` notation (pixels on a desktop
/// backend, cells on a terminal one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl Geometry {
    /// Parse `"1040x640+0+0"`. Returns `None` on any malformed part.
    pub fn parse(s: &str) -> Option<Self> {
        let (size, rest) = s.split_once('+')?;
        let (x, y) = rest.split_once('+')?;
        let (w, h) = size.split_once('x')?;
        Some(Self {
            width: w.trim().parse().ok()?,
            height: h.trim().parse().ok()?,
            x: x.trim().parse().ok()?,
            y: y.trim().parse().ok()?,
        })
    }
}

/// Text justification within a widget's cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

impl Justify {
    pub fn from_tag(s: &str) -> Self {
        match s {
            "center" => Justify::Center,
            "right" => Justify::Right,
            _ => Justify::Left,
        }
    }
}

/// A concrete (row, rendered-column) cell inside the parent's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: u16,
    pub column: u16,
}

/// How [`Toolkit::write_value`] applies new content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Insert at the start of the current content.
    Insert,
    /// Discard the current content first.
    ReplaceAll,
}

// ───────────────────────────────────────── widget specs ──────

/// Fully-resolved, data-only construction order for one widget.
///
/// Builders translate resolved property bags into these; the backend
/// decides what a `Frame` or `TabBinder` physically is.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetSpec {
    Window { title: String, geometry: Geometry },
    MenuBar,
    Menu { label: String },
    MenuCommand { label: String },
    Frame { label: Option<String>, width: u32, height: u32 },
    TabBinder,
    Tab { label: String },
    TextLine { text: String, justify: Justify, visible: bool },
    TextBox { text: String, width: u16, height: u16, scrollbar: bool },
    Entry { label: String, value: String, width: u16 },
    DropDown { label: String, options: Vec<String>, selected: String, locked: bool, width: u16 },
    Button { label: String, visible: bool },
}

impl WidgetSpec {
    pub fn kind(&self) -> ElementKind {
        match self {
            WidgetSpec::Window { .. } => ElementKind::Window,
            WidgetSpec::MenuBar => ElementKind::MenuBar,
            WidgetSpec::Menu { .. } => ElementKind::DropDownMenu,
            WidgetSpec::MenuCommand { .. } => ElementKind::MenuCommand,
            WidgetSpec::Frame { .. } => ElementKind::Frame,
            WidgetSpec::TabBinder => ElementKind::TabBinder,
            WidgetSpec::Tab { .. } => ElementKind::Tab,
            WidgetSpec::TextLine { .. } => ElementKind::TextLine,
            WidgetSpec::TextBox { .. } => ElementKind::TextBox,
            WidgetSpec::Entry { .. } => ElementKind::Entry,
            WidgetSpec::DropDown { .. } => ElementKind::DropDown,
            WidgetSpec::Button { .. } => ElementKind::Button,
        }
    }
}

// ───────────────────────────────────────── errors ────────────

/// Failures raised by a backend. The factory wraps these into its own
/// error type together with the offending element's identity.
#[derive(Debug, Error)]
pub enum ToolkitError {
    #[error("widget {0} does not exist")]
    NoSuchWidget(WidgetId),
    #[error("{kind} widgets do not support {operation}")]
    Unsupported { kind: ElementKind, operation: &'static str },
    #[error("{0}")]
    Backend(String),
}

// ───────────────────────────────────────── the trait ─────────

/// Contract between the materialization engine and a widget backend.
///
/// All calls are synchronous; the backend owns widget lifetimes.
pub trait Toolkit {
    /// Create a widget and attach it under `parent` (`None` for a
    /// top-level window).
    fn create_widget(
        &mut self,
        spec: WidgetSpec,
        parent: Option<WidgetId>,
    ) -> Result<WidgetId, ToolkitError>;

    /// Assign the widget its (row, rendered-column) cell inside the
    /// parent's grid.
    fn place(&mut self, id: WidgetId, cell: GridCell) -> Result<(), ToolkitError>;

    /// Bind a callable to the widget's activation event (button press,
    /// menu command selection, drop-down change, window close).
    fn bind_activation(&mut self, id: WidgetId, action: ActionFn) -> Result<(), ToolkitError>;

    /// Backend-supplied callables for reserved action names ("exit").
    fn reserved_action(&self, name: &str) -> Option<ActionFn>;

    /// Destroy a widget and its whole subtree. Idempotent.
    fn destroy(&mut self, id: WidgetId);

    /// Current value of a value-bearing widget (`entry`, `drop_down`,
    /// `text_box`); `None` for anything else.
    fn read_value(&self, id: WidgetId) -> Option<String>;

    /// Edit the content of a value-bearing widget.
    fn write_value(
        &mut self,
        id: WidgetId,
        content: &str,
        mode: EditMode,
    ) -> Result<(), ToolkitError>;

    /// Show or hide a grid-placed widget.
    fn set_visible(&mut self, id: WidgetId, visible: bool) -> Result<(), ToolkitError>;

    /// Whether the widget is currently shown.
    fn is_visible(&self, id: WidgetId) -> Result<bool, ToolkitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_parses_the_documented_format() {
        let g = Geometry::parse("1040x640+10+20").unwrap();
        assert_eq!((g.width, g.height, g.x, g.y), (1040, 640, 10, 20));
        assert!(Geometry::parse("fullscreen").is_none());
        assert!(Geometry::parse("1040x640").is_none());
    }
}

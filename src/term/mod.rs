//! Terminal implementation of the widget toolkit.
//!
//! Widgets live in an arena-backed tree ([`Node`] entries referencing
//! each other by index), mirroring how the factory attached them.
//! Rendering ([`render`]) lays each container's children out on the
//! grid cells the placement planner assigned; input ([`input`]) drives
//! focus traversal, field editing and activation through the bound
//! action callables.

pub mod event;
mod input;
mod render;
pub mod theme;

use std::cell::Cell;
use std::rc::Rc;

use crate::toolkit::{
    ActionFn, EditMode, Geometry, GridCell, Justify, Toolkit, ToolkitError, WidgetId, WidgetSpec,
};

// ───────────────────────────────────────── widget arena ──────

/// Kind-specific live state for one widget.
pub(crate) enum Widget {
    Window { title: String, geometry: Geometry },
    MenuBar,
    Menu { label: String },
    MenuCommand { label: String },
    Frame { label: Option<String> },
    TabBinder { active: usize },
    Tab { label: String },
    TextLine { text: String, justify: Justify },
    TextBox { buffer: String, width: u16, height: u16, scrollbar: bool },
    Entry { label: String, buffer: String, width: u16 },
    DropDown { label: String, options: Vec<String>, value: String, locked: bool, width: u16 },
    Button { label: String },
}

impl Widget {
    fn from_spec(spec: WidgetSpec) -> Self {
        match spec {
            WidgetSpec::Window { title, geometry } => Widget::Window { title, geometry },
            WidgetSpec::MenuBar => Widget::MenuBar,
            WidgetSpec::Menu { label } => Widget::Menu { label },
            WidgetSpec::MenuCommand { label } => Widget::MenuCommand { label },
            WidgetSpec::Frame { label, .. } => Widget::Frame { label },
            WidgetSpec::TabBinder => Widget::TabBinder { active: 0 },
            WidgetSpec::Tab { label } => Widget::Tab { label },
            WidgetSpec::TextLine { text, justify, .. } => Widget::TextLine { text, justify },
            WidgetSpec::TextBox { text, width, height, scrollbar } => Widget::TextBox {
                buffer: text,
                width,
                height,
                scrollbar,
            },
            WidgetSpec::Entry { label, value, width } => Widget::Entry {
                label,
                buffer: value,
                width,
            },
            WidgetSpec::DropDown { label, options, selected, locked, width } => Widget::DropDown {
                label,
                options,
                value: selected,
                locked,
                width,
            },
            WidgetSpec::Button { label, .. } => Widget::Button { label },
        }
    }

    /// Can this widget take keyboard focus? Menu commands are reachable
    /// here only when they sit directly on the menu bar; inside a menu
    /// they are driven by the popup instead.
    fn focusable(&self) -> bool {
        matches!(
            self,
            Widget::Menu { .. }
                | Widget::MenuCommand { .. }
                | Widget::TabBinder { .. }
                | Widget::TextBox { .. }
                | Widget::Entry { .. }
                | Widget::DropDown { .. }
                | Widget::Button { .. }
        )
    }
}

/// A single node in the arena-allocated widget tree.
pub(crate) struct Node {
    pub widget: Widget,
    pub parent: Option<WidgetId>,
    pub children: Vec<WidgetId>,
    pub cell: Option<GridCell>,
    pub visible: bool,
    pub alive: bool,
    pub action: Option<ActionFn>,
}

// ───────────────────────────────────────── the backend ───────

/// Menu popup state: the currently open menu and the highlighted entry.
pub(crate) struct MenuState {
    pub menu: WidgetId,
    pub selected: usize,
}

/// Terminal widget backend.
///
/// Owns every widget created through it; the factory only ever sees
/// [`WidgetId`] handles.
pub struct TermToolkit {
    pub(crate) nodes: Vec<Node>,
    pub(crate) windows: Vec<WidgetId>,
    pub(crate) focus: Option<WidgetId>,
    pub(crate) menu: Option<MenuState>,
    close_requested: Rc<Cell<bool>>,
}

impl Default for TermToolkit {
    fn default() -> Self {
        Self::new()
    }
}

impl TermToolkit {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            windows: Vec::new(),
            focus: None,
            menu: None,
            close_requested: Rc::new(Cell::new(false)),
        }
    }

    /// Whether an "exit" action has fired (window close).
    pub fn close_requested(&self) -> bool {
        self.close_requested.get()
    }

    /// The window currently shown (the most recently created live one).
    pub(crate) fn active_window(&self) -> Option<WidgetId> {
        self.windows.iter().rev().copied().find(|&id| self.nodes[id].alive)
    }

    fn live(&self, id: WidgetId) -> Result<&Node, ToolkitError> {
        self.nodes
            .get(id)
            .filter(|n| n.alive)
            .ok_or(ToolkitError::NoSuchWidget(id))
    }

    fn live_mut(&mut self, id: WidgetId) -> Result<&mut Node, ToolkitError> {
        self.nodes
            .get_mut(id)
            .filter(|n| n.alive)
            .ok_or(ToolkitError::NoSuchWidget(id))
    }

    fn mark_dead(&mut self, id: WidgetId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.alive = false;
            node.action = None;
            let children = std::mem::take(&mut node.children);
            for child in children {
                self.mark_dead(child);
            }
        }
    }

    // ── focus ──────────────────────────────────────────────────

    /// Depth-first list of focusable, visible widgets under the active
    /// window, in materialization order.
    pub(crate) fn focus_ring(&self) -> Vec<WidgetId> {
        let mut ring = Vec::new();
        if let Some(window) = self.active_window() {
            self.collect_focusable(window, &mut ring);
        }
        ring
    }

    fn collect_focusable(&self, id: WidgetId, ring: &mut Vec<WidgetId>) {
        let node = &self.nodes[id];
        if !node.alive || !node.visible {
            return;
        }
        if node.widget.focusable() {
            ring.push(id);
        }
        // Inactive tabs keep their widgets, but those are unreachable
        // until the tab is brought forward.
        if let Widget::TabBinder { active } = node.widget {
            if let Some(&tab) = node.children.get(active) {
                self.collect_focusable(tab, ring);
            }
            return;
        }
        // The commands inside a menu are reached through the menu popup,
        // not the focus ring.
        if matches!(node.widget, Widget::Menu { .. }) {
            return;
        }
        for &child in &node.children {
            self.collect_focusable(child, ring);
        }
    }

    pub(crate) fn focus_step(&mut self, backwards: bool) {
        let ring = self.focus_ring();
        if ring.is_empty() {
            self.focus = None;
            return;
        }
        let position = self.focus.and_then(|id| ring.iter().position(|&r| r == id));
        let next = match (position, backwards) {
            (None, false) => 0,
            (None, true) => ring.len() - 1,
            (Some(i), false) => (i + 1) % ring.len(),
            (Some(i), true) => (i + ring.len() - 1) % ring.len(),
        };
        self.focus = Some(ring[next]);
    }

    /// Invoke the action bound to a widget, if any.
    pub(crate) fn fire(&self, id: WidgetId) {
        let action = self.nodes[id].action.clone();
        if let Some(action) = action {
            action();
        }
    }
}

// ───────────────────────────────────────── toolkit impl ──────

impl Toolkit for TermToolkit {
    fn create_widget(
        &mut self,
        spec: WidgetSpec,
        parent: Option<WidgetId>,
    ) -> Result<WidgetId, ToolkitError> {
        if let Some(pid) = parent {
            self.live(pid)?;
        }
        let visible = match &spec {
            WidgetSpec::TextLine { visible, .. } | WidgetSpec::Button { visible, .. } => *visible,
            _ => true,
        };
        let is_window = matches!(spec, WidgetSpec::Window { .. });

        let id = self.nodes.len();
        self.nodes.push(Node {
            widget: Widget::from_spec(spec),
            parent,
            children: Vec::new(),
            cell: None,
            visible,
            alive: true,
            action: None,
        });
        if let Some(pid) = parent {
            self.nodes[pid].children.push(id);
        }
        if is_window {
            self.windows.push(id);
        }
        Ok(id)
    }

    fn place(&mut self, id: WidgetId, cell: GridCell) -> Result<(), ToolkitError> {
        self.live_mut(id)?.cell = Some(cell);
        Ok(())
    }

    fn bind_activation(&mut self, id: WidgetId, action: ActionFn) -> Result<(), ToolkitError> {
        self.live_mut(id)?.action = Some(action);
        Ok(())
    }

    fn reserved_action(&self, name: &str) -> Option<ActionFn> {
        match name {
            "exit" => {
                let flag = Rc::clone(&self.close_requested);
                Some(Rc::new(move || flag.set(true)))
            }
            _ => None,
        }
    }

    fn destroy(&mut self, id: WidgetId) {
        if let Some(node) = self.nodes.get(id) {
            if let Some(pid) = node.parent {
                if let Some(parent) = self.nodes.get_mut(pid) {
                    parent.children.retain(|&c| c != id);
                }
            }
        }
        self.mark_dead(id);
        if self.focus.is_some_and(|f| !self.nodes[f].alive) {
            self.focus = None;
        }
        if self.menu.as_ref().is_some_and(|m| !self.nodes[m.menu].alive) {
            self.menu = None;
        }
    }

    fn read_value(&self, id: WidgetId) -> Option<String> {
        match &self.live(id).ok()?.widget {
            Widget::Entry { buffer, .. } | Widget::TextBox { buffer, .. } => Some(buffer.clone()),
            Widget::DropDown { value, .. } => Some(value.clone()),
            _ => None,
        }
    }

    fn write_value(
        &mut self,
        id: WidgetId,
        content: &str,
        mode: EditMode,
    ) -> Result<(), ToolkitError> {
        let node = self.live_mut(id)?;
        let buffer = match &mut node.widget {
            Widget::Entry { buffer, .. } | Widget::TextBox { buffer, .. } => buffer,
            Widget::DropDown { value, .. } => value,
            other => {
                return Err(ToolkitError::Unsupported {
                    kind: widget_kind(other),
                    operation: "value editing",
                })
            }
        };
        match mode {
            EditMode::ReplaceAll => *buffer = content.to_string(),
            EditMode::Insert => buffer.insert_str(0, content),
        }
        Ok(())
    }

    fn set_visible(&mut self, id: WidgetId, visible: bool) -> Result<(), ToolkitError> {
        let node = self.live_mut(id)?;
        if node.cell.is_none() {
            return Err(ToolkitError::Unsupported {
                kind: widget_kind(&node.widget),
                operation: "visibility toggling",
            });
        }
        node.visible = visible;
        Ok(())
    }

    fn is_visible(&self, id: WidgetId) -> Result<bool, ToolkitError> {
        Ok(self.live(id)?.visible)
    }
}

fn widget_kind(widget: &Widget) -> crate::element::ElementKind {
    use crate::element::ElementKind;
    match widget {
        Widget::Window { .. } => ElementKind::Window,
        Widget::MenuBar => ElementKind::MenuBar,
        Widget::Menu { .. } => ElementKind::DropDownMenu,
        Widget::MenuCommand { .. } => ElementKind::MenuCommand,
        Widget::Frame { .. } => ElementKind::Frame,
        Widget::TabBinder { .. } => ElementKind::TabBinder,
        Widget::Tab { .. } => ElementKind::Tab,
        Widget::TextLine { .. } => ElementKind::TextLine,
        Widget::TextBox { .. } => ElementKind::TextBox,
        Widget::Entry { .. } => ElementKind::Entry,
        Widget::DropDown { .. } => ElementKind::DropDown,
        Widget::Button { .. } => ElementKind::Button,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::factory::{ActionTable, GuiFactory};

    fn sample_interface() -> (TermToolkit, crate::factory::Interface) {
        let mut window = Element::new("window", "main").with("visible_text", "Sim");
        window.children = vec![
            Element::new("entry", "steps").with("default_value", "100"),
            Element::new("drop_down", "mode")
                .with("options", crate::element::PropValue::List(vec![
                    "euler".into(),
                    "rk4".into(),
                ]))
                .with("on_new_row", true),
            Element::new("button", "run").with("on_new_row", true),
        ];
        let mut toolkit = TermToolkit::new();
        let interface = GuiFactory::new()
            .build_interface(&mut toolkit, &[window], &ActionTable::new())
            .unwrap();
        (toolkit, interface)
    }

    #[test]
    fn focus_ring_follows_materialization_order() {
        let (mut toolkit, interface) = sample_interface();
        let ring = toolkit.focus_ring();
        assert_eq!(ring.len(), 3);
        assert_eq!(ring[0], interface.widget("steps").unwrap());
        assert_eq!(ring[2], interface.widget("run").unwrap());

        toolkit.focus_step(false);
        assert_eq!(toolkit.focus, Some(ring[0]));
        toolkit.focus_step(true);
        assert_eq!(toolkit.focus, Some(ring[2]));
    }

    #[test]
    fn hidden_widgets_leave_the_focus_ring() {
        let (mut toolkit, interface) = sample_interface();
        let run = interface.widget("run").unwrap();
        toolkit.set_visible(run, false).unwrap();
        assert!(!toolkit.focus_ring().contains(&run));
    }

    #[test]
    fn values_survive_the_round_trip_through_the_toolkit_trait() {
        let (mut toolkit, interface) = sample_interface();
        let steps = interface.widget("steps").unwrap();
        assert_eq!(toolkit.read_value(steps).as_deref(), Some("100"));
        toolkit
            .write_value(steps, "250", EditMode::ReplaceAll)
            .unwrap();
        assert_eq!(toolkit.read_value(steps).as_deref(), Some("250"));
    }

    #[test]
    fn destroy_clears_focus_and_subtree() {
        let (mut toolkit, interface) = sample_interface();
        toolkit.focus_step(false);
        assert!(toolkit.focus.is_some());
        interface.close(&mut toolkit);
        assert!(toolkit.active_window().is_none());
        assert!(toolkit.focus_ring().is_empty());
    }
}

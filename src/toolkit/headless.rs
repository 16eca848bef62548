//! Headless backend — records every toolkit call in memory.
//!
//! Stands in for a real UI during tests and dry runs: widgets live in a
//! flat arena, placements and activations are stored verbatim, and the
//! reserved "exit" action just flips a flag. Nothing is drawn.

use std::cell::Cell;
use std::rc::Rc;

use super::{
    ActionFn, EditMode, GridCell, Toolkit, ToolkitError, WidgetId, WidgetSpec,
};

/// One recorded widget.
pub struct HeadlessWidget {
    pub spec: WidgetSpec,
    pub parent: Option<WidgetId>,
    pub children: Vec<WidgetId>,
    pub cell: Option<GridCell>,
    pub visible: bool,
    pub alive: bool,
    action: Option<ActionFn>,
    value: Option<String>,
}

/// In-memory recording backend.
#[derive(Default)]
pub struct HeadlessToolkit {
    widgets: Vec<HeadlessWidget>,
    /// Ids passed to `destroy`, in call order.
    pub destroyed: Vec<WidgetId>,
    close_requested: Rc<Cell<bool>>,
}

impl HeadlessToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn widget(&self, id: WidgetId) -> &HeadlessWidget {
        &self.widgets[id]
    }

    /// Number of widgets still alive.
    pub fn alive_count(&self) -> usize {
        self.widgets.iter().filter(|w| w.alive).count()
    }

    /// Fire the widget's bound activation, as the event loop would.
    pub fn activate(&self, id: WidgetId) {
        if let Some(action) = self.widgets[id].action.clone() {
            action();
        }
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested.get()
    }

    fn get(&self, id: WidgetId) -> Result<&HeadlessWidget, ToolkitError> {
        self.widgets
            .get(id)
            .filter(|w| w.alive)
            .ok_or(ToolkitError::NoSuchWidget(id))
    }

    fn get_mut(&mut self, id: WidgetId) -> Result<&mut HeadlessWidget, ToolkitError> {
        self.widgets
            .get_mut(id)
            .filter(|w| w.alive)
            .ok_or(ToolkitError::NoSuchWidget(id))
    }

    fn mark_dead(&mut self, id: WidgetId) {
        if let Some(widget) = self.widgets.get_mut(id) {
            widget.alive = false;
            let children = std::mem::take(&mut widget.children);
            for child in children {
                self.mark_dead(child);
            }
        }
    }
}

impl Toolkit for HeadlessToolkit {
    fn create_widget(
        &mut self,
        spec: WidgetSpec,
        parent: Option<WidgetId>,
    ) -> Result<WidgetId, ToolkitError> {
        if let Some(pid) = parent {
            self.get(pid)?;
        }
        let value = match &spec {
            WidgetSpec::Entry { value, .. } => Some(value.clone()),
            WidgetSpec::DropDown { selected, .. } => Some(selected.clone()),
            WidgetSpec::TextBox { text, .. } => Some(text.clone()),
            _ => None,
        };
        let visible = match &spec {
            WidgetSpec::TextLine { visible, .. } | WidgetSpec::Button { visible, .. } => *visible,
            _ => true,
        };
        let id = self.widgets.len();
        self.widgets.push(HeadlessWidget {
            spec,
            parent,
            children: Vec::new(),
            cell: None,
            visible,
            alive: true,
            action: None,
            value,
        });
        if let Some(pid) = parent {
            self.widgets[pid].children.push(id);
        }
        Ok(id)
    }

    fn place(&mut self, id: WidgetId, cell: GridCell) -> Result<(), ToolkitError> {
        self.get_mut(id)?.cell = Some(cell);
        Ok(())
    }

    fn bind_activation(&mut self, id: WidgetId, action: ActionFn) -> Result<(), ToolkitError> {
        self.get_mut(id)?.action = Some(action);
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
        self.destroyed.push(id);
        if let Some(widget) = self.widgets.get(id) {
            if let Some(pid) = widget.parent {
                if let Some(parent) = self.widgets.get_mut(pid) {
                    parent.children.retain(|&c| c != id);
                }
            }
        }
        self.mark_dead(id);
    }

    fn read_value(&self, id: WidgetId) -> Option<String> {
        self.get(id).ok()?.value.clone()
    }

    fn write_value(
        &mut self,
        id: WidgetId,
        content: &str,
        mode: EditMode,
    ) -> Result<(), ToolkitError> {
        let widget = self.get_mut(id)?;
        let Some(value) = widget.value.as_mut() else {
            return Err(ToolkitError::Unsupported {
                kind: widget.spec.kind(),
                operation: "value editing",
            });
        };
        match mode {
            EditMode::ReplaceAll => *value = content.to_string(),
            EditMode::Insert => value.insert_str(0, content),
        }
        Ok(())
    }

    fn set_visible(&mut self, id: WidgetId, visible: bool) -> Result<(), ToolkitError> {
        let widget = self.get_mut(id)?;
        if !widget.spec.kind().is_grid_placed() {
            return Err(ToolkitError::Unsupported {
                kind: widget.spec.kind(),
                operation: "visibility toggling",
            });
        }
        widget.visible = visible;
        Ok(())
    }

    fn is_visible(&self, id: WidgetId) -> Result<bool, ToolkitError> {
        Ok(self.get(id)?.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destroy_kills_the_whole_subtree() {
        let mut tk = HeadlessToolkit::new();
        let root = tk
            .create_widget(
                WidgetSpec::Window {
                    title: "w".into(),
                    geometry: crate::toolkit::Geometry::parse("80x24+0+0").unwrap(),
                },
                None,
            )
            .unwrap();
        let frame = tk
            .create_widget(
                WidgetSpec::Frame { label: None, width: 10, height: 2 },
                Some(root),
            )
            .unwrap();
        let button = tk
            .create_widget(
                WidgetSpec::Button { label: "go".into(), visible: true },
                Some(frame),
            )
            .unwrap();

        assert_eq!(tk.alive_count(), 3);
        tk.destroy(root);
        assert_eq!(tk.alive_count(), 0);
        assert!(tk.read_value(button).is_none());
    }

    #[test]
    fn write_value_modes() {
        let mut tk = HeadlessToolkit::new();
        let entry = tk
            .create_widget(
                WidgetSpec::Entry { label: "x".into(), value: "0".into(), width: 10 },
                None,
            )
            .unwrap();
        tk.write_value(entry, "1", EditMode::Insert).unwrap();
        assert_eq!(tk.read_value(entry).as_deref(), Some("10"));
        tk.write_value(entry, "42", EditMode::ReplaceAll).unwrap();
        assert_eq!(tk.read_value(entry).as_deref(), Some("42"));
    }

    #[test]
    fn reserved_exit_flips_the_close_flag() {
        let tk = HeadlessToolkit::new();
        let exit = tk.reserved_action("exit").unwrap();
        assert!(!tk.close_requested());
        exit();
        assert!(tk.close_requested());
    }
}

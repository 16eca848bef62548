//! Key handling — focus traversal, field editing, activation.

use crossterm::event::{KeyCode, KeyEvent};

use super::{MenuState, TermToolkit, Widget};
use crate::toolkit::WidgetId;

impl TermToolkit {
    /// Feed one key event into the interface.
    ///
    /// Tab / Shift-Tab walk the focus ring; Esc fires the active
    /// window's close action (or backs out of an open menu). Everything
    /// else is routed to the focused widget.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.menu.is_some() {
            self.menu_key(key);
            return;
        }
        match key.code {
            KeyCode::Tab => self.focus_step(false),
            KeyCode::BackTab => self.focus_step(true),
            KeyCode::Esc => {
                if let Some(window) = self.active_window() {
                    self.fire(window);
                }
            }
            _ => self.widget_key(key),
        }
    }

    fn widget_key(&mut self, key: KeyEvent) {
        let Some(id) = self.focus else {
            return;
        };
        match &self.nodes[id].widget {
            Widget::Button { .. } | Widget::MenuCommand { .. } => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.fire(id);
                }
            }
            Widget::Menu { .. } => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down) {
                    self.menu = Some(MenuState { menu: id, selected: 0 });
                }
            }
            Widget::TabBinder { .. } => self.tab_binder_key(id, key),
            Widget::Entry { .. } | Widget::TextBox { .. } => self.edit_key(id, key),
            Widget::DropDown { .. } => self.drop_down_key(id, key),
            _ => {}
        }
    }

    fn edit_key(&mut self, id: WidgetId, key: KeyEvent) {
        let multiline = matches!(self.nodes[id].widget, Widget::TextBox { .. });
        let (Widget::Entry { buffer, .. } | Widget::TextBox { buffer, .. }) =
            &mut self.nodes[id].widget
        else {
            return;
        };
        match key.code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Enter if multiline => buffer.push('\n'),
            _ => {}
        }
    }

    fn drop_down_key(&mut self, id: WidgetId, key: KeyEvent) {
        let mut selection_changed = false;
        if let Widget::DropDown { options, value, locked, .. } = &mut self.nodes[id].widget {
            match key.code {
                KeyCode::Up | KeyCode::Down if !options.is_empty() => {
                    let current = options.iter().position(|o| o == value).unwrap_or(0);
                    let next = if key.code == KeyCode::Down {
                        (current + 1) % options.len()
                    } else {
                        (current + options.len() - 1) % options.len()
                    };
                    if options[next] != *value {
                        value.clone_from(&options[next]);
                        selection_changed = true;
                    }
                }
                KeyCode::Char(c) if !*locked => value.push(c),
                KeyCode::Backspace if !*locked => {
                    value.pop();
                }
                _ => {}
            }
        }
        if selection_changed {
            self.fire(id);
        }
    }

    fn tab_binder_key(&mut self, id: WidgetId, key: KeyEvent) {
        let node = &mut self.nodes[id];
        let count = node.children.len();
        if let Widget::TabBinder { active } = &mut node.widget {
            match key.code {
                KeyCode::Left => *active = active.saturating_sub(1),
                KeyCode::Right if count > 0 => *active = (*active + 1).min(count - 1),
                _ => {}
            }
        }
    }

    // ── menu popup ─────────────────────────────────────────────

    fn menu_key(&mut self, key: KeyEvent) {
        let Some(state) = &self.menu else {
            return;
        };
        let menu = state.menu;
        let selected = state.selected;
        let items: Vec<WidgetId> = self.nodes[menu]
            .children
            .iter()
            .copied()
            .filter(|&c| self.nodes[c].alive)
            .collect();

        match key.code {
            KeyCode::Esc => {
                // Back out into the parent menu, or close the popup.
                let parent = self.nodes[menu].parent;
                self.menu = match parent {
                    Some(p) if matches!(self.nodes[p].widget, Widget::Menu { .. }) => {
                        let position = self.nodes[p]
                            .children
                            .iter()
                            .position(|&c| c == menu)
                            .unwrap_or(0);
                        Some(MenuState { menu: p, selected: position })
                    }
                    _ => None,
                };
            }
            KeyCode::Up => {
                if let Some(state) = self.menu.as_mut() {
                    state.selected = state.selected.saturating_sub(1);
                }
            }
            KeyCode::Down => {
                if let Some(state) = self.menu.as_mut() {
                    if state.selected + 1 < items.len() {
                        state.selected += 1;
                    }
                }
            }
            KeyCode::Enter => {
                let Some(&item) = items.get(selected) else {
                    self.menu = None;
                    return;
                };
                match self.nodes[item].widget {
                    Widget::Menu { .. } => {
                        self.menu = Some(MenuState { menu: item, selected: 0 });
                    }
                    Widget::MenuCommand { .. } => {
                        self.menu = None;
                        self.fire(item);
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

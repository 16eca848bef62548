//! Rendering — lay the widget tree out on the terminal.
//!
//! Containers render their children row by row from the grid cells the
//! placement planner assigned. Rendered columns are already compacted,
//! so layout here is a straight walk: vertical chunks per row, sized to
//! the tallest widget, horizontal chunks per cell, sized to each
//! widget's intrinsic width.

use std::collections::BTreeMap;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{theme::Theme, MenuState, TermToolkit, Widget};
use crate::toolkit::{Justify, WidgetId};

fn text_width(s: &str) -> u16 {
    s.chars().count() as u16
}

impl TermToolkit {
    /// Draw the active window (and any open menu popup) onto the frame.
    pub fn render(&self, frame: &mut Frame) {
        let Some(window) = self.active_window() else {
            return;
        };
        let Widget::Window { title, geometry } = &self.nodes[window].widget else {
            return;
        };

        // Window geometry is in cells on this backend, clamped to the
        // actual terminal size.
        let rect = window_rect(*geometry, frame.area());
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_style(Theme::border_style());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        // The menu bar claims the first line of the window, everything
        // else is grid content.
        let menu_bar = self.nodes[window]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].alive && matches!(self.nodes[c].widget, Widget::MenuBar));

        let mut content = inner;
        if let Some(bar) = menu_bar {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(inner);
            self.render_menu_bar(frame, bar, chunks[0]);
            content = chunks[1];
        }

        self.render_grid(frame, window, content);

        if let Some(state) = &self.menu {
            self.render_menu_popup(frame, state);
        }
    }

    // ── grid ───────────────────────────────────────────────────

    /// Placed, visible children of a container, grouped by row and
    /// ordered by rendered column (declaration order breaks ties).
    fn grid_rows(&self, container: WidgetId) -> Vec<Vec<WidgetId>> {
        let mut rows: BTreeMap<u16, Vec<(u16, WidgetId)>> = BTreeMap::new();
        for &child in &self.nodes[container].children {
            let node = &self.nodes[child];
            if !node.alive || !node.visible {
                continue;
            }
            if let Some(cell) = node.cell {
                rows.entry(cell.row).or_default().push((cell.column, child));
            }
        }
        rows.into_values()
            .map(|mut row| {
                row.sort_by_key(|&(column, _)| column);
                row.into_iter().map(|(_, id)| id).collect()
            })
            .collect()
    }

    fn render_grid(&self, frame: &mut Frame, container: WidgetId, area: Rect) {
        let rows = self.grid_rows(container);
        if rows.is_empty() {
            return;
        }

        let mut constraints: Vec<Constraint> = rows
            .iter()
            .map(|row| {
                let height = row
                    .iter()
                    .map(|&id| self.intrinsic_size(id).1)
                    .max()
                    .unwrap_or(1);
                Constraint::Length(height)
            })
            .collect();
        constraints.push(Constraint::Min(0));

        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (row, row_area) in rows.iter().zip(row_areas.iter()) {
            let mut constraints: Vec<Constraint> = row
                .iter()
                .map(|&id| Constraint::Length(self.intrinsic_size(id).0))
                .collect();
            constraints.push(Constraint::Min(0));

            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .spacing(1)
                .constraints(constraints)
                .split(*row_area);

            for (&id, cell_area) in row.iter().zip(cells.iter()) {
                self.render_node(frame, id, *cell_area);
            }
        }
    }

    /// Preferred (width, height) of a widget, borders included.
    fn intrinsic_size(&self, id: WidgetId) -> (u16, u16) {
        let node = &self.nodes[id];
        match &node.widget {
            Widget::TextLine { text, .. } => (text_width(text), 1),
            Widget::Entry { label, width, .. } => (width + 1 + text_width(label), 1),
            // value field, arrow marker, label
            Widget::DropDown { label, width, .. } => (width + 3 + text_width(label), 1),
            Widget::Button { label } => (text_width(label) + 4, 1),
            Widget::TextBox { width, height, scrollbar, .. } => {
                (width + 2 + u16::from(*scrollbar), height + 2)
            }
            Widget::Frame { label } => {
                let (w, h) = self.grid_size(id);
                let title = label.as_deref().map(text_width).unwrap_or(0);
                (w.max(title + 2) + 2, h + 2)
            }
            Widget::TabBinder { .. } => {
                let headers: u16 = node
                    .children
                    .iter()
                    .filter_map(|&tab| match &self.nodes[tab].widget {
                        Widget::Tab { label } => Some(text_width(label) + 3),
                        _ => None,
                    })
                    .sum();
                let (mut w, mut h) = (0u16, 0u16);
                for &tab in &node.children {
                    let (tw, th) = self.grid_size(tab);
                    w = w.max(tw);
                    h = h.max(th);
                }
                (w.max(headers) + 2, h + 3)
            }
            _ => (0, 0),
        }
    }

    /// Content size of a container's grid (no borders).
    fn grid_size(&self, container: WidgetId) -> (u16, u16) {
        let rows = self.grid_rows(container);
        let mut width = 0u16;
        let mut height = 0u16;
        for row in rows {
            let mut row_width = 0u16;
            let mut row_height = 0u16;
            for &id in &row {
                let (w, h) = self.intrinsic_size(id);
                row_width += w + 1;
                row_height = row_height.max(h);
            }
            width = width.max(row_width.saturating_sub(1));
            height += row_height.max(1);
        }
        (width, height)
    }

    // ── widgets ────────────────────────────────────────────────

    fn render_node(&self, frame: &mut Frame, id: WidgetId, area: Rect) {
        let focused = self.focus == Some(id);
        let node = &self.nodes[id];
        match &node.widget {
            Widget::TextLine { text, justify } => {
                let alignment = match justify {
                    Justify::Left => Alignment::Left,
                    Justify::Center => Alignment::Center,
                    Justify::Right => Alignment::Right,
                };
                frame.render_widget(
                    Paragraph::new(text.as_str())
                        .style(Theme::text_style())
                        .alignment(alignment),
                    area,
                );
            }
            Widget::Entry { label, buffer, width } => {
                let field_style = if focused { Theme::focus_style() } else { Theme::field_style() };
                let line = Line::from(vec![
                    Span::styled(format!("{buffer:<w$}", w = *width as usize), field_style),
                    Span::raw(" "),
                    Span::styled(label.clone(), Theme::text_style()),
                ]);
                frame.render_widget(Paragraph::new(line), area);
            }
            Widget::DropDown { label, value, width, .. } => {
                let field_style = if focused { Theme::focus_style() } else { Theme::field_style() };
                let line = Line::from(vec![
                    Span::styled(format!("{value:<w$} ▾", w = *width as usize), field_style),
                    Span::raw(" "),
                    Span::styled(label.clone(), Theme::text_style()),
                ]);
                frame.render_widget(Paragraph::new(line), area);
            }
            Widget::Button { label } => {
                let style = if focused { Theme::focus_style() } else { Theme::button_style() };
                frame.render_widget(
                    Paragraph::new(Span::styled(format!("[ {label} ]"), style)),
                    area,
                );
            }
            Widget::TextBox { buffer, scrollbar, .. } => {
                let border_style = if focused { Theme::focus_style() } else { Theme::border_style() };
                let block = Block::default().borders(Borders::ALL).border_style(border_style);
                let mut inner = block.inner(area);
                frame.render_widget(block, area);
                if *scrollbar && inner.width > 1 {
                    // Right-most inner column is the scroll lane.
                    let lane = Rect::new(inner.right() - 1, inner.y, 1, inner.height);
                    let marks: Vec<Line> = (0..lane.height).map(|_| Line::raw("░")).collect();
                    frame.render_widget(Paragraph::new(marks), lane);
                    inner.width -= 1;
                }
                frame.render_widget(
                    Paragraph::new(buffer.as_str())
                        .style(Theme::text_style())
                        .wrap(Wrap { trim: false }),
                    inner,
                );
            }
            Widget::Frame { label } => {
                let mut block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border_style());
                if let Some(label) = label {
                    block = block
                        .title(format!(" {label} "))
                        .title_style(Theme::frame_label_style());
                }
                let inner = block.inner(area);
                frame.render_widget(block, area);
                self.render_grid(frame, id, inner);
            }
            Widget::TabBinder { active } => self.render_tab_binder(frame, id, *active, area, focused),
            // Menu pieces render through the menu bar / popup paths.
            _ => {}
        }
    }

    fn render_tab_binder(
        &self,
        frame: &mut Frame,
        id: WidgetId,
        active: usize,
        area: Rect,
        focused: bool,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let mut spans = Vec::new();
        for (i, &tab) in self.nodes[id].children.iter().enumerate() {
            let Widget::Tab { label } = &self.nodes[tab].widget else {
                continue;
            };
            let style = if i == active {
                if focused { Theme::focus_style() } else { Theme::active_tab_style() }
            } else {
                Theme::tab_style()
            };
            spans.push(Span::styled(format!(" {label} "), style));
            spans.push(Span::styled("│", Theme::border_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_style());
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);

        if let Some(&tab) = self.nodes[id].children.get(active) {
            self.render_grid(frame, tab, inner);
        }
    }

    // ── menus ──────────────────────────────────────────────────

    fn render_menu_bar(&self, frame: &mut Frame, bar: WidgetId, area: Rect) {
        let mut spans = Vec::new();
        for &child in &self.nodes[bar].children {
            if !self.nodes[child].alive {
                continue;
            }
            let label = match &self.nodes[child].widget {
                Widget::Menu { label } => label.clone(),
                Widget::MenuCommand { label } => label.clone(),
                _ => continue,
            };
            let style = if self.focus == Some(child) {
                Theme::focus_style()
            } else {
                Theme::menu_bar_style()
            };
            spans.push(Span::styled(format!(" {label} "), style));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Theme::menu_bar_style()),
            area,
        );
    }

    fn render_menu_popup(&self, frame: &mut Frame, state: &MenuState) {
        let title = match &self.nodes[state.menu].widget {
            Widget::Menu { label } => label.clone(),
            _ => return,
        };
        let items: Vec<WidgetId> = self.nodes[state.menu]
            .children
            .iter()
            .copied()
            .filter(|&c| self.nodes[c].alive)
            .collect();

        let width = items
            .iter()
            .map(|&item| match &self.nodes[item].widget {
                Widget::Menu { label } | Widget::MenuCommand { label } => text_width(label) + 8,
                _ => 0,
            })
            .max()
            .unwrap_or(12)
            .max(text_width(&title) + 6);
        let height = items.len() as u16 + 2;
        let popup = centered_fixed(width, height, frame.area());

        frame.render_widget(Clear, popup);
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_style());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut lines = Vec::new();
        for (i, &item) in items.iter().enumerate() {
            let (label, submenu) = match &self.nodes[item].widget {
                Widget::Menu { label } => (label.clone(), true),
                Widget::MenuCommand { label } => (label.clone(), false),
                _ => continue,
            };
            let (prefix, style) = if i == state.selected {
                (" ▸ ", Theme::popup_selected_style())
            } else {
                ("   ", Theme::popup_item_style())
            };
            let suffix = if submenu { " ▸" } else { "" };
            lines.push(Line::from(Span::styled(
                format!("{prefix}{label}{suffix}"),
                style,
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Clamp a declared window geometry into the terminal area. A zero
/// width or height means "use everything available".
fn window_rect(geometry: crate::toolkit::Geometry, area: Rect) -> Rect {
    let clamp = |v: u32| v.min(u16::MAX as u32) as u16;
    let width = match geometry.width {
        0 => area.width,
        w => clamp(w).min(area.width),
    };
    let height = match geometry.height {
        0 => area.height,
        h => clamp(h).min(area.height),
    };
    let x = area.x + clamp(geometry.x).min(area.width.saturating_sub(width));
    let y = area.y + clamp(geometry.y).min(area.height.saturating_sub(height));
    Rect::new(x, y, width, height)
}

/// Create a centered rectangle with fixed dimensions, clamped to the
/// available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::element::Element;
    use crate::factory::{ActionTable, GuiFactory};

    fn terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(60, 16)).unwrap()
    }

    #[test]
    fn a_window_with_grid_content_draws_without_panicking() {
        let window = Element::new("window", "main")
            .with("visible_text", "Sim Setup")
            .child(Element::new("text_line", "heading").with("visible_text", "Parameters"))
            .child(Element::new("entry", "steps").with("on_new_row", true))
            .child(Element::new("button", "run").with("on_new_row", true));
        let mut toolkit = TermToolkit::new();
        GuiFactory::new()
            .build_interface(&mut toolkit, &[window], &ActionTable::new())
            .unwrap();

        let mut terminal = terminal();
        terminal.draw(|frame| toolkit.render(frame)).unwrap();

        let rendered = format!("{:?}", terminal.backend().buffer());
        assert!(rendered.contains("Sim Setup"));
        assert!(rendered.contains("Parameters"));
        assert!(rendered.contains("[ Default Button Text ]"));
    }

    #[test]
    fn invisible_columns_render_flush_left() {
        // The lone element declared at column 3 still starts at the left
        // edge of the content area.
        let window = Element::new("window", "main")
            .child(Element::new("text_line", "t").with("visible_text", "X").with("column", 3));
        let mut toolkit = TermToolkit::new();
        GuiFactory::new()
            .build_interface(&mut toolkit, &[window], &ActionTable::new())
            .unwrap();

        let mut terminal = terminal();
        terminal.draw(|frame| toolkit.render(frame)).unwrap();

        // Window border occupies column 0; content starts at column 1.
        let cell = terminal.backend().buffer().cell((1, 1)).unwrap();
        assert_eq!(cell.symbol(), "X");
    }

    #[test]
    fn tab_binder_renders_the_active_tab_only() {
        let window = Element::new("window", "main").child(
            Element::new("tab_binder", "tabs")
                .child(
                    Element::new("tab", "t1").with("visible_text", "First").child(
                        Element::new("text_line", "a").with("visible_text", "alpha"),
                    ),
                )
                .child(
                    Element::new("tab", "t2").with("visible_text", "Second").child(
                        Element::new("text_line", "b").with("visible_text", "omega"),
                    ),
                ),
        );
        let mut toolkit = TermToolkit::new();
        GuiFactory::new()
            .build_interface(&mut toolkit, &[window], &ActionTable::new())
            .unwrap();

        let mut terminal = terminal();
        terminal.draw(|frame| toolkit.render(frame)).unwrap();
        let rendered = format!("{:?}", terminal.backend().buffer());
        assert!(rendered.contains("First"));
        assert!(rendered.contains("alpha"));
        assert!(!rendered.contains("omega"));
    }
}

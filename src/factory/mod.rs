//! The materialization engine — element trees in, live interfaces out.
//!
//! [`GuiFactory::build_interface`] drives a depth-first walk over the
//! declared roots: resolve properties, validate containment, build the
//! widget through the [`Toolkit`], place it on its parent's grid,
//! record its name, recurse. Any structural violation aborts the whole
//! build and tears down what was already created, so a failed build
//! never leaves a partially visible interface.

pub mod actions;
pub mod builders;
pub mod defaults;
pub mod error;
pub mod placement;
pub mod registry;
pub mod rules;

use std::collections::BTreeMap;

use crate::element::{Element, ElementKind, PropValue};
use crate::toolkit::{EditMode, GridCell, Toolkit, WidgetId};

pub use actions::ActionTable;
pub use error::{BuildError, InterfaceError};
pub use registry::{RegistryEntry, WidgetRegistry};

// ───────────────────────────────────────── factory ───────────

/// Public entry point for turning element trees into live interfaces.
#[derive(Debug, Default)]
pub struct GuiFactory;

impl GuiFactory {
    pub fn new() -> Self {
        Self
    }

    /// Materialize `roots` (windows, optionally followed by menu bars
    /// that attach to the most recent window) against `toolkit`.
    ///
    /// On success the returned [`Interface`] owns the top-level handles
    /// and the completed name registry. On failure every widget created
    /// so far is destroyed and no registry escapes.
    pub fn build_interface<T: Toolkit>(
        &self,
        toolkit: &mut T,
        roots: &[Element],
        actions: &ActionTable,
    ) -> Result<Interface, BuildError> {
        let mut table = actions.clone();
        table.adopt_reserved(toolkit);

        let mut build = Build {
            toolkit,
            actions: table,
            registry: WidgetRegistry::new(),
            windows: Vec::new(),
        };

        match build.roots(roots) {
            Ok(()) => Ok(Interface {
                windows: build.windows,
                registry: build.registry,
            }),
            Err(err) => {
                for id in build.windows {
                    build.toolkit.destroy(id);
                }
                Err(err)
            }
        }
    }
}

// ───────────────────────────────────────── tree walk ─────────

fn kind_of(element: &Element) -> Result<ElementKind, BuildError> {
    ElementKind::from_tag(&element.kind).ok_or_else(|| BuildError::UnknownElementType {
        name: element.name.clone(),
        type_tag: element.kind.clone(),
    })
}

/// State threaded through one build call; owns nothing the caller
/// needs except the registry and window list it surrenders on success.
struct Build<'a, T: Toolkit> {
    toolkit: &'a mut T,
    actions: ActionTable,
    registry: WidgetRegistry,
    windows: Vec<WidgetId>,
}

impl<T: Toolkit> Build<'_, T> {
    fn roots(&mut self, roots: &[Element]) -> Result<(), BuildError> {
        for root in roots {
            let kind = kind_of(root)?;
            match kind {
                ElementKind::Window => {
                    let id = self.materialize(root, kind, None, None)?;
                    self.windows.push(id);
                }
                ElementKind::MenuBar => {
                    let Some(&window) = self.windows.last() else {
                        return Err(BuildError::IllegalParent {
                            name: root.name.clone(),
                            kind,
                            parent: "top level without a window".to_string(),
                        });
                    };
                    self.materialize(root, kind, Some(window), None)?;
                }
                _ => {
                    return Err(BuildError::IllegalParent {
                        name: root.name.clone(),
                        kind,
                        parent: "top level".to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    fn materialize(
        &mut self,
        element: &Element,
        kind: ElementKind,
        parent: Option<WidgetId>,
        cell: Option<GridCell>,
    ) -> Result<WidgetId, BuildError> {
        let resolved = defaults::resolve(kind, &element.properties);

        if kind.is_leaf() && !element.children.is_empty() {
            return Err(BuildError::UnexpectedChildren {
                name: element.name.clone(),
                kind,
                count: element.children.len(),
            });
        }

        // Validate every child edge before constructing anything, so an
        // illegal subtree never leaves a half-attached widget behind.
        let mut child_kinds = Vec::with_capacity(element.children.len());
        for child in &element.children {
            let child_kind = kind_of(child)?;
            rules::check_edge(element, kind, child, child_kind)?;
            child_kinds.push(child_kind);
        }

        let spec = builders::build_spec(kind, &element.name, &resolved);
        let id = self
            .toolkit
            .create_widget(spec, parent)
            .map_err(|source| BuildError::Toolkit {
                name: element.name.clone(),
                kind,
                source,
            })?;

        if let Some(requested) = builders::action_request(kind, &resolved) {
            let action = self.actions.resolve(&requested, &element.name);
            self.toolkit
                .bind_activation(id, action)
                .map_err(|source| BuildError::Toolkit {
                    name: element.name.clone(),
                    kind,
                    source,
                })?;
        }

        if let Some(cell) = cell {
            self.toolkit
                .place(id, cell)
                .map_err(|source| BuildError::Toolkit {
                    name: element.name.clone(),
                    kind,
                    source,
                })?;
        }

        let parameter_name = resolved.get("parameter_name").and_then(PropValue::as_text);
        self.registry
            .insert(&element.name, kind, id, parameter_name)?;

        // Siblings materialize and get placed in list order — the only
        // ordering guarantee the engine makes.
        let siblings: Vec<(&Element, ElementKind)> = element
            .children
            .iter()
            .zip(child_kinds.iter().copied())
            .collect();
        let cells = placement::plan(&siblings)?;

        for ((child, child_kind), child_cell) in
            element.children.iter().zip(child_kinds).zip(cells)
        {
            self.materialize(child, child_kind, Some(id), child_cell)?;
        }

        Ok(id)
    }
}

// ───────────────────────────────────────── realized handle ───

/// A successfully materialized interface: top-level window handles plus
/// the name registry for later programmatic access.
pub struct Interface {
    windows: Vec<WidgetId>,
    registry: WidgetRegistry,
}

impl Interface {
    pub fn windows(&self) -> &[WidgetId] {
        &self.windows
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Realized widget handle for an element name.
    pub fn widget(&self, name: &str) -> Option<WidgetId> {
        self.registry.get(name).map(|entry| entry.id)
    }

    fn entry(&self, name: &str) -> Result<&RegistryEntry, InterfaceError> {
        self.registry
            .get(name)
            .ok_or_else(|| InterfaceError::UnknownName(name.to_string()))
    }

    /// Current value of a value-bearing element (`entry`, `drop_down`,
    /// `text_box`).
    pub fn value_of(&self, toolkit: &impl Toolkit, name: &str) -> Option<String> {
        let entry = self.registry.get(name)?;
        toolkit.read_value(entry.id)
    }

    /// All readable values, keyed by each element's `parameter_name`.
    /// Elements without a parameter name are skipped.
    pub fn values(&self, toolkit: &impl Toolkit) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for (_, entry) in self.registry.iter() {
            let Some(parameter) = &entry.parameter_name else {
                continue;
            };
            if let Some(value) = toolkit.read_value(entry.id) {
                out.insert(parameter.clone(), value);
            }
        }
        out
    }

    /// Edit the content of a value-bearing element.
    pub fn set_value(
        &self,
        toolkit: &mut impl Toolkit,
        name: &str,
        content: &str,
        mode: EditMode,
    ) -> Result<(), InterfaceError> {
        let entry = self.entry(name)?;
        toolkit.write_value(entry.id, content, mode)?;
        Ok(())
    }

    /// Hide the named widget if shown, show it if hidden. Returns the
    /// new visibility.
    pub fn toggle_visible(
        &self,
        toolkit: &mut impl Toolkit,
        name: &str,
    ) -> Result<bool, InterfaceError> {
        let entry = self.entry(name)?;
        let shown = toolkit.is_visible(entry.id)?;
        toolkit.set_visible(entry.id, !shown)?;
        Ok(!shown)
    }

    /// Destroy every window root (and with them, the whole interface).
    pub fn close(&self, toolkit: &mut impl Toolkit) {
        for &window in &self.windows {
            toolkit.destroy(window);
        }
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::toolkit::headless::HeadlessToolkit;

    fn build(
        roots: &[Element],
        actions: &ActionTable,
    ) -> (HeadlessToolkit, Result<Interface, BuildError>) {
        let mut toolkit = HeadlessToolkit::new();
        let result = GuiFactory::new().build_interface(&mut toolkit, roots, actions);
        (toolkit, result)
    }

    fn window_with(children: Vec<Element>) -> Element {
        let mut window = Element::new("window", "main").with("visible_text", "Sim");
        window.children = children;
        window
    }

    #[test]
    fn button_action_is_bound_and_invocable() {
        let fired = Rc::new(Cell::new(0u32));
        let mut actions = ActionTable::new();
        {
            let fired = Rc::clone(&fired);
            actions.register("go", Rc::new(move || fired.set(fired.get() + 1)));
        }

        let roots = [window_with(vec![Element::new("button", "b1")
            .with("visible_text", "Go")
            .with("action", "go")])];
        let (toolkit, result) = build(&roots, &actions);
        let interface = result.unwrap();

        let button = interface.widget("b1").expect("b1 registered");
        toolkit.activate(button);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn omitted_action_defaults_to_print_and_never_fails() {
        let roots = [window_with(vec![Element::new("button", "b1")])];
        let (toolkit, result) = build(&roots, &ActionTable::new());
        let interface = result.unwrap();
        // The fallback is a real callable, not an error.
        toolkit.activate(interface.widget("b1").unwrap());
    }

    #[test]
    fn tab_binder_accepts_tabs_and_rejects_everything_else() {
        let binder = Element::new("tab_binder", "tabs")
            .child(Element::new("tab", "t1"))
            .child(Element::new("tab", "t2"));
        let (_, result) = build(&[window_with(vec![binder])], &ActionTable::new());
        let interface = result.unwrap();
        assert!(interface.widget("t1").is_some());
        assert!(interface.widget("t2").is_some());

        let binder = Element::new("tab_binder", "tabs").child(Element::new("entry", "e1"));
        let (_, result) = build(&[window_with(vec![binder])], &ActionTable::new());
        assert!(matches!(result.unwrap_err(), BuildError::IllegalChild { .. }));
    }

    #[test]
    fn tab_outside_a_binder_is_an_illegal_parent() {
        let roots = [window_with(vec![Element::new("tab", "stray")])];
        let (_, result) = build(&roots, &ActionTable::new());
        assert!(matches!(
            result.unwrap_err(),
            BuildError::IllegalParent { ref name, .. } if name == "stray"
        ));
    }

    #[test]
    fn leaves_must_not_carry_children() {
        let entry = Element::new("entry", "e1").child(Element::new("button", "b1"));
        let (_, result) = build(&[window_with(vec![entry])], &ActionTable::new());
        assert!(matches!(
            result.unwrap_err(),
            BuildError::UnexpectedChildren { ref name, count: 1, .. } if name == "e1"
        ));
    }

    #[test]
    fn unknown_types_abort_the_build() {
        let roots = [window_with(vec![Element::new("checkbox", "c1")])];
        let (_, result) = build(&roots, &ActionTable::new());
        assert!(matches!(
            result.unwrap_err(),
            BuildError::UnknownElementType { ref type_tag, .. } if type_tag == "checkbox"
        ));
    }

    #[test]
    fn duplicate_names_fail_and_roll_back() {
        let roots = [window_with(vec![
            Element::new("button", "twin"),
            Element::new("button", "twin"),
        ])];
        let (toolkit, result) = build(&roots, &ActionTable::new());
        assert!(matches!(result.unwrap_err(), BuildError::DuplicateName { .. }));
        // The window and the first button were created, then torn down.
        assert_eq!(toolkit.alive_count(), 0);
        assert!(!toolkit.destroyed.is_empty());
    }

    #[test]
    fn menu_bar_root_attaches_to_the_window_root() {
        let menu = Element::new("menu_bar", "bar").child(
            Element::new("drop_down_menu", "file")
                .with("visible_text", "File")
                .child(Element::new("menu_command", "quit").with("action", "exit")),
        );
        let roots = [window_with(vec![]), menu];
        let (toolkit, result) = build(&roots, &ActionTable::new());
        let interface = result.unwrap();

        let bar = interface.widget("bar").unwrap();
        assert_eq!(toolkit.widget(bar).parent, Some(interface.windows()[0]));

        // The reserved "exit" action came from the toolkit.
        toolkit.activate(interface.widget("quit").unwrap());
        assert!(toolkit.close_requested());
    }

    #[test]
    fn menu_bar_without_a_window_is_rejected() {
        let roots = [Element::new("menu_bar", "bar")];
        let (_, result) = build(&roots, &ActionTable::new());
        assert!(matches!(result.unwrap_err(), BuildError::IllegalParent { .. }));
    }

    #[test]
    fn grid_cells_reach_the_toolkit_compacted() {
        let roots = [window_with(vec![
            Element::new("entry", "a").with("column", 1),
            Element::new("entry", "b").with("column", 3),
            Element::new("button", "c").with("on_new_row", true),
        ])];
        let (toolkit, result) = build(&roots, &ActionTable::new());
        let interface = result.unwrap();

        let cell = |name: &str| toolkit.widget(interface.widget(name).unwrap()).cell.unwrap();
        assert_eq!((cell("a").row, cell("a").column), (0, 0));
        assert_eq!((cell("b").row, cell("b").column), (0, 1));
        assert_eq!((cell("c").row, cell("c").column), (1, 0));
    }

    #[test]
    fn values_read_back_keyed_by_parameter_name() {
        let roots = [window_with(vec![
            Element::new("entry", "steps")
                .with("parameter_name", "step_count")
                .with("default_value", 200),
            Element::new("drop_down", "mode")
                .with("parameter_name", "solver_mode")
                .with("options", PropValue::List(vec!["euler".into(), "rk4".into()]))
                .with("default_option", "rk4"),
            Element::new("button", "run"),
        ])];
        let (mut toolkit, result) = build(&roots, &ActionTable::new());
        let interface = result.unwrap();

        let values = interface.values(&toolkit);
        assert_eq!(values["step_count"], "200");
        assert_eq!(values["solver_mode"], "rk4");
        // Buttons carry no parameter.
        assert_eq!(values.len(), 2);

        interface
            .set_value(&mut toolkit, "steps", "500", EditMode::ReplaceAll)
            .unwrap();
        assert_eq!(interface.value_of(&toolkit, "steps").as_deref(), Some("500"));
    }

    #[test]
    fn toggle_visible_round_trips() {
        let roots = [window_with(vec![Element::new("button", "b1")])];
        let (mut toolkit, result) = build(&roots, &ActionTable::new());
        let interface = result.unwrap();

        assert!(!interface.toggle_visible(&mut toolkit, "b1").unwrap());
        assert!(interface.toggle_visible(&mut toolkit, "b1").unwrap());
        assert!(matches!(
            interface.toggle_visible(&mut toolkit, "ghost"),
            Err(InterfaceError::UnknownName(_))
        ));
    }

    #[test]
    fn close_destroys_every_window_root() {
        let roots = [window_with(vec![Element::new("text_line", "hello")])];
        let (mut toolkit, result) = build(&roots, &ActionTable::new());
        let interface = result.unwrap();
        assert!(toolkit.alive_count() > 0);
        interface.close(&mut toolkit);
        assert_eq!(toolkit.alive_count(), 0);
    }
}

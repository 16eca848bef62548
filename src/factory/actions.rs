//! Named actions — the callables bound to interactive elements.
//!
//! Callers hand the factory a table of name → callable. Two names are
//! reserved: `"print"` (a no-op debug action, always present) and
//! `"exit"` (window close, supplied by the toolkit when the caller does
//! not override it). Resolution never fails — an unknown action name
//! degrades to `"print"` with a logged warning, because a missing
//! handler should not keep the interface from appearing.

use std::collections::HashMap;
use std::rc::Rc;

use crate::toolkit::{ActionFn, Toolkit};

/// Reserved action names recognized even when the caller's table lacks
/// them.
pub const PRINT_ACTION: &str = "print";
pub const EXIT_ACTION: &str = "exit";

/// Mapping from action name to callable.
#[derive(Clone, Default)]
pub struct ActionTable {
    map: HashMap<String, ActionFn>,
}

impl ActionTable {
    /// An empty table (plus the built-in `"print"` action).
    pub fn new() -> Self {
        let mut table = Self { map: HashMap::new() };
        table.register(PRINT_ACTION, Rc::new(|| {
            tracing::debug!("default print action invoked");
        }));
        table
    }

    pub fn register(&mut self, name: &str, action: ActionFn) {
        self.map.insert(name.to_string(), action);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Fill in reserved names the caller left out with the toolkit's
    /// own callables. Called once per build.
    pub fn adopt_reserved(&mut self, toolkit: &impl Toolkit) {
        for name in [PRINT_ACTION, EXIT_ACTION] {
            if !self.map.contains_key(name) {
                if let Some(action) = toolkit.reserved_action(name) {
                    self.map.insert(name.to_string(), action);
                }
            }
        }
        // "print" must exist even on a backend that supplies nothing.
        if !self.map.contains_key(PRINT_ACTION) {
            self.register(PRINT_ACTION, Rc::new(|| {
                tracing::debug!("default print action invoked");
            }));
        }
    }

    /// Look up `requested` for `element`, degrading to `"print"`.
    pub fn resolve(&self, requested: &str, element: &str) -> ActionFn {
        if let Some(action) = self.map.get(requested) {
            return Rc::clone(action);
        }
        tracing::warn!(
            element,
            action = requested,
            "action not found in table, falling back to \"print\""
        );
        self.map
            .get(PRINT_ACTION)
            .cloned()
            .unwrap_or_else(|| Rc::new(|| {}))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::toolkit::headless::HeadlessToolkit;

    #[test]
    fn unknown_actions_degrade_to_print() {
        let table = ActionTable::new();
        // Must not panic and must return a callable.
        let action = table.resolve("does_not_exist", "b1");
        action();
    }

    #[test]
    fn caller_actions_win_over_fallback() {
        let fired = Rc::new(Cell::new(false));
        let mut table = ActionTable::new();
        {
            let fired = Rc::clone(&fired);
            table.register("go", Rc::new(move || fired.set(true)));
        }
        table.resolve("go", "b1")();
        assert!(fired.get());
    }

    #[test]
    fn exit_is_adopted_from_the_toolkit() {
        let toolkit = HeadlessToolkit::new();
        let mut table = ActionTable::new();
        assert!(!table.contains(EXIT_ACTION));
        table.adopt_reserved(&toolkit);
        assert!(table.contains(EXIT_ACTION));

        table.resolve(EXIT_ACTION, "main")();
        assert!(toolkit.close_requested());
    }
}

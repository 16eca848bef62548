//! Declarative interface factory for simulation front-ends.
//!
//! Feed [`factory::GuiFactory`] a tree of plain [`element::Element`]
//! data (type tag, name, children, property bag) and it materializes a
//! live, arranged interface on any [`toolkit::Toolkit`] backend, wiring
//! named actions to the interactive elements. The crate ships two
//! backends: a terminal one ([`term::TermToolkit`]) and an in-memory
//! recorder ([`toolkit::headless::HeadlessToolkit`]).
//!
//! ```no_run
//! use simui::element::Element;
//! use simui::factory::{ActionTable, GuiFactory};
//! use simui::term::TermToolkit;
//!
//! let window = Element::new("window", "main")
//!     .with("visible_text", "Simulation Setup")
//!     .child(Element::new("entry", "steps").with("default_value", "100"))
//!     .child(Element::new("button", "run").with("on_new_row", true));
//!
//! let mut toolkit = TermToolkit::new();
//! let interface = GuiFactory::new()
//!     .build_interface(&mut toolkit, &[window], &ActionTable::new())
//!     .unwrap();
//! assert!(interface.widget("run").is_some());
//! ```

pub mod element;
pub mod factory;
pub mod term;
pub mod toolkit;

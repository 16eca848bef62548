//! Declarative parent/child containment rules.
//!
//! Legality is table-driven so new container types slot in without
//! touching the traversal: each type lists the child types it accepts,
//! and types with a special attachment requirement (tabs, menu pieces)
//! additionally list the only parents they tolerate.

use crate::element::{Element, ElementKind};

use super::error::BuildError;

/// Everything that can sit in a grid cell inside a window, frame or tab.
const GRID_CONTENT: &[ElementKind] = &[
    ElementKind::Frame,
    ElementKind::TabBinder,
    ElementKind::TextLine,
    ElementKind::TextBox,
    ElementKind::Entry,
    ElementKind::DropDown,
    ElementKind::Button,
];

const WINDOW_CONTENT: &[ElementKind] = &[
    ElementKind::MenuBar,
    ElementKind::Frame,
    ElementKind::TabBinder,
    ElementKind::TextLine,
    ElementKind::TextBox,
    ElementKind::Entry,
    ElementKind::DropDown,
    ElementKind::Button,
];

const MENU_CONTENT: &[ElementKind] = &[ElementKind::DropDownMenu, ElementKind::MenuCommand];

/// Child types a container accepts. Leaves accept nothing (their shape
/// is rejected earlier as `UnexpectedChildren`).
pub fn allowed_children(kind: ElementKind) -> &'static [ElementKind] {
    match kind {
        ElementKind::Window => WINDOW_CONTENT,
        ElementKind::MenuBar | ElementKind::DropDownMenu => MENU_CONTENT,
        ElementKind::Frame | ElementKind::Tab => GRID_CONTENT,
        ElementKind::TabBinder => &[ElementKind::Tab],
        _ => &[],
    }
}

/// Parents a type insists on, or `None` when the parent's own
/// child-list already says everything there is to say.
pub fn required_parents(kind: ElementKind) -> Option<&'static [ElementKind]> {
    match kind {
        // Windows exist only at the top level.
        ElementKind::Window => Some(&[]),
        ElementKind::MenuBar => Some(&[ElementKind::Window]),
        ElementKind::DropDownMenu | ElementKind::MenuCommand => {
            Some(&[ElementKind::MenuBar, ElementKind::DropDownMenu])
        }
        ElementKind::Tab => Some(&[ElementKind::TabBinder]),
        _ => None,
    }
}

/// Validate one parent→child edge, before either side is constructed.
pub fn check_edge(
    parent: &Element,
    parent_kind: ElementKind,
    child: &Element,
    child_kind: ElementKind,
) -> Result<(), BuildError> {
    if let Some(parents) = required_parents(child_kind) {
        if !parents.contains(&parent_kind) {
            return Err(BuildError::IllegalParent {
                name: child.name.clone(),
                kind: child_kind,
                parent: parent_kind.to_string(),
            });
        }
    }
    if !allowed_children(parent_kind).contains(&child_kind) {
        return Err(BuildError::IllegalChild {
            name: parent.name.clone(),
            kind: parent_kind,
            child: child.name.clone(),
            child_kind,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(parent: (&str, ElementKind), child: (&str, ElementKind)) -> Result<(), BuildError> {
        let p = Element::new(parent.1.as_str(), parent.0);
        let c = Element::new(child.1.as_str(), child.0);
        check_edge(&p, parent.1, &c, child.1)
    }

    #[test]
    fn tab_demands_a_tab_binder_parent() {
        let err = edge(("f", ElementKind::Frame), ("t", ElementKind::Tab)).unwrap_err();
        assert!(matches!(err, BuildError::IllegalParent { ref name, .. } if name == "t"));

        assert!(edge(("binder", ElementKind::TabBinder), ("t", ElementKind::Tab)).is_ok());
    }

    #[test]
    fn tab_binder_accepts_only_tabs() {
        let err = edge(("binder", ElementKind::TabBinder), ("e", ElementKind::Entry)).unwrap_err();
        assert!(matches!(err, BuildError::IllegalChild { ref child, .. } if child == "e"));
    }

    #[test]
    fn menu_pieces_stay_inside_menus() {
        assert!(edge(("bar", ElementKind::MenuBar), ("m", ElementKind::DropDownMenu)).is_ok());
        assert!(edge(("m", ElementKind::DropDownMenu), ("cmd", ElementKind::MenuCommand)).is_ok());

        let err = edge(("w", ElementKind::Window), ("cmd", ElementKind::MenuCommand)).unwrap_err();
        assert!(matches!(err, BuildError::IllegalParent { .. }));
    }

    #[test]
    fn windows_never_nest() {
        let err = edge(("outer", ElementKind::Window), ("inner", ElementKind::Window)).unwrap_err();
        assert!(matches!(err, BuildError::IllegalParent { .. }));
    }
}

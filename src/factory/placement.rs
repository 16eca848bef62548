//! Grid placement planning for a sibling sequence.
//!
//! Works on whole sibling lists because the invisible-column compaction
//! rule needs to see every element of a row before rendered positions
//! exist: within a row the distinct declared column numbers are sorted
//! and re-mapped to consecutive positions starting at 0, so a lone
//! element declared at column 3 still renders flush left. Compaction is
//! computed per row; one row's columns never influence another's.

use std::collections::BTreeMap;

use crate::element::{Element, ElementKind, PropValue};
use crate::toolkit::GridCell;

use super::error::BuildError;

/// Declared (pre-compaction) slot for one grid sibling.
struct Slot {
    index: usize,
    row: u16,
    declared: i64,
}

/// Assign a grid cell to each sibling, `None` for kinds the grid does
/// not manage (`menu_bar`, `tab`).
///
/// Row assignment follows the declaration order: a truthy `on_new_row`
/// opens a new row, except on the first sibling of the list, which
/// stays on row 0 either way. A `menu_bar` sibling consumes that
/// first-slot exemption without occupying a cell, so content under a
/// menu bar starts below it exactly when it asks to. An unspecified
/// column flows to the previous sibling's column + 1.
pub fn plan(siblings: &[(&Element, ElementKind)]) -> Result<Vec<Option<GridCell>>, BuildError> {
    let mut cells: Vec<Option<GridCell>> = vec![None; siblings.len()];
    let mut slots: Vec<Slot> = Vec::new();

    let mut row: u16 = 0;
    let mut cursor: i64 = 0;
    let mut first = true;

    for (index, (element, kind)) in siblings.iter().enumerate() {
        if !kind.is_grid_placed() {
            first = false;
            continue;
        }

        let props = &element.properties;
        let on_new_row = props.get("on_new_row").is_some_and(PropValue::is_truthy);
        let declared = match props.get("column") {
            None | Some(PropValue::Null) => None,
            Some(value) => Some(value.as_int().ok_or_else(|| BuildError::InvalidColumn {
                name: element.name.clone(),
                kind: *kind,
                value: value.as_text().unwrap_or_else(|| format!("{value:?}")),
            })?),
        };

        let column = if on_new_row && !first {
            row += 1;
            declared.unwrap_or(0)
        } else if on_new_row {
            declared.unwrap_or(0)
        } else {
            declared.unwrap_or(cursor)
        };
        cursor = column + 1;
        first = false;

        slots.push(Slot { index, row, declared: column });
    }

    // Per-row compaction: distinct declared columns, ascending, become
    // rendered positions 0..n.
    let mut rows: BTreeMap<u16, Vec<&Slot>> = BTreeMap::new();
    for slot in &slots {
        rows.entry(slot.row).or_default().push(slot);
    }

    for (row, slots_in_row) in rows {
        let mut columns: Vec<i64> = slots_in_row.iter().map(|s| s.declared).collect();
        columns.sort_unstable();
        columns.dedup();

        for slot in &slots_in_row {
            let rendered = columns.binary_search(&slot.declared).expect("column present") as u16;
            cells[slot.index] = Some(GridCell { row, column: rendered });
        }

        // Same declared column twice: both stay, declaration order wins.
        if columns.len() < slots_in_row.len() {
            let names: Vec<&str> = slots_in_row
                .iter()
                .map(|s| siblings[s.index].0.name.as_str())
                .collect();
            tracing::warn!(
                row,
                elements = ?names,
                "siblings share a declared column; they will overlap in declaration order"
            );
        }
    }

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    fn grid(el: Element) -> (Element, ElementKind) {
        let kind = ElementKind::from_tag(&el.kind).unwrap();
        (el, kind)
    }

    fn plan_all(elements: &[(Element, ElementKind)]) -> Vec<Option<GridCell>> {
        let borrowed: Vec<(&Element, ElementKind)> =
            elements.iter().map(|(e, k)| (e, *k)).collect();
        plan(&borrowed).unwrap()
    }

    fn cell(row: u16, column: u16) -> Option<GridCell> {
        Some(GridCell { row, column })
    }

    #[test]
    fn unspecified_columns_flow_left_to_right() {
        let elements = [
            grid(Element::new("button", "a")),
            grid(Element::new("button", "b")),
            grid(Element::new("button", "c")),
        ];
        assert_eq!(plan_all(&elements), vec![cell(0, 0), cell(0, 1), cell(0, 2)]);
    }

    #[test]
    fn invisible_columns_compact_per_row() {
        let elements = [
            grid(Element::new("entry", "a").with("column", 1)),
            grid(Element::new("entry", "b").with("column", 3)),
            grid(Element::new("entry", "c").with("on_new_row", true)),
        ];
        // Row 0 declares {1, 3} → rendered {0, 1}; row 1 declares {0} → 0.
        assert_eq!(plan_all(&elements), vec![cell(0, 0), cell(0, 1), cell(1, 0)]);
    }

    #[test]
    fn compaction_is_independent_between_rows() {
        let elements = [
            grid(Element::new("button", "a").with("column", 5)),
            grid(Element::new("button", "b").with("on_new_row", true).with("column", 0)),
        ];
        assert_eq!(plan_all(&elements), vec![cell(0, 0), cell(1, 0)]);
    }

    #[test]
    fn first_sibling_stays_on_row_zero() {
        let elements = [
            grid(Element::new("button", "a").with("on_new_row", true)),
            grid(Element::new("button", "b")),
        ];
        assert_eq!(plan_all(&elements), vec![cell(0, 0), cell(0, 1)]);
    }

    #[test]
    fn content_below_a_menu_bar_opts_in_with_on_new_row() {
        let elements = [
            grid(Element::new("menu_bar", "menu")),
            grid(Element::new("text_line", "heading").with("on_new_row", true)),
            grid(Element::new("entry", "value")),
        ];
        assert_eq!(plan_all(&elements), vec![None, cell(1, 0), cell(1, 1)]);
    }

    #[test]
    fn new_row_resets_the_column_cursor() {
        let elements = [
            grid(Element::new("entry", "a")),
            grid(Element::new("entry", "b")),
            grid(Element::new("entry", "c").with("on_new_row", "Yes")),
            grid(Element::new("entry", "d")),
        ];
        assert_eq!(
            plan_all(&elements),
            vec![cell(0, 0), cell(0, 1), cell(1, 0), cell(1, 1)]
        );
    }

    #[test]
    fn shared_columns_keep_declaration_order() {
        let elements = [
            grid(Element::new("button", "a").with("column", 2)),
            grid(Element::new("button", "b").with("column", 2)),
        ];
        // Both land on the same rendered column; neither is dropped.
        assert_eq!(plan_all(&elements), vec![cell(0, 0), cell(0, 0)]);
    }

    #[test]
    fn tabs_are_exempt_from_the_grid() {
        let elements = [
            grid(Element::new("tab", "t1")),
            grid(Element::new("tab", "t2")),
        ];
        assert_eq!(plan_all(&elements), vec![None, None]);
    }

    #[test]
    fn malformed_columns_fail() {
        let bad = [grid(Element::new("button", "a").with("column", "wide"))];
        let borrowed: Vec<(&Element, ElementKind)> = bad.iter().map(|(e, k)| (e, *k)).collect();
        let err = plan(&borrowed).unwrap_err();
        assert!(matches!(err, BuildError::InvalidColumn { ref name, .. } if name == "a"));

        let bad = [grid(Element::new("button", "a").with("column", true))];
        let borrowed: Vec<(&Element, ElementKind)> = bad.iter().map(|(e, k)| (e, *k)).collect();
        assert!(plan(&borrowed).is_err());
    }

    #[test]
    fn numeric_string_columns_are_accepted() {
        let elements = [
            grid(Element::new("button", "a").with("column", "4")),
            grid(Element::new("button", "b").with("column", 6)),
        ];
        assert_eq!(plan_all(&elements), vec![cell(0, 0), cell(0, 1)]);
    }
}

//! Property checks on change detection.

use grid_sync_core::transaction::calculate_updates;
use grid_sync_core::{CellValue, Snapshot, WorkingCopy};
use proptest::prelude::*;

fn cell_value() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Empty),
        Just(CellValue::Number(f64::NAN)),
        (-1.0e6..1.0e6f64).prop_map(CellValue::Number),
        "[a-zA-Z0-9 ]{0,8}".prop_map(CellValue::Text),
        any::<bool>().prop_map(CellValue::Bool),
    ]
}

fn snapshot() -> impl Strategy<Value = Snapshot> {
    (1usize..6, 0usize..8).prop_flat_map(|(width, height)| {
        prop::collection::vec(prop::collection::vec(cell_value(), width), height).prop_map(
            move |rows| {
                let columns: Vec<String> = (0..width).map(|i| format!("col_{i}")).collect();
                Snapshot::new(columns, rows).unwrap()
            },
        )
    })
}

proptest! {
    #[test]
    fn unmodified_copy_has_no_changes(original in snapshot()) {
        let working = WorkingCopy::new(&original);
        prop_assert!(calculate_updates(&original, &working, 1).is_empty());
    }

    #[test]
    fn single_write_yields_at_most_one_change(
        original in snapshot(),
        value in cell_value(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!original.is_empty());
        let cells = original.row_count() * original.column_count();
        let flat = pick.index(cells);
        let row = original.index()[flat / original.column_count()];
        let column = original.columns()[flat % original.column_count()].clone();

        let mut working = WorkingCopy::new(&original);
        working.set(row, &column, value.clone()).unwrap();
        let changes = calculate_updates(&original, &working, 1);

        let old = original.get(row, &column).unwrap();
        if *old == value {
            prop_assert!(changes.is_empty());
        } else {
            prop_assert_eq!(changes.len(), 1);
            prop_assert_eq!(changes[0].row, row);
            prop_assert_eq!(&changes[0].column, &column);
            prop_assert_eq!(changes[0].address.grid_row(), row + 2);
        }
    }
}

//! Update transactions end to end: working copy, diff, batch, commit.

use std::convert::Infallible;

use anyhow::bail;
use grid_sync_core::grid::{InMemoryGrid, ValueInputOption};
use grid_sync_core::{
    CellValue, DataSheet, GridError, SheetError, Snapshot, SyncConfig, SyncOutcome, ValueRange,
};
use serde_json::json;

use super::helpers::{sample_sheet, LogCapture};

#[test]
fn test_no_changes_skips_grid() {
    let mut sheet = sample_sheet();
    let before = sheet.copy();

    let outcome = sheet.update(|_change| Ok::<(), Infallible>(())).unwrap();

    assert_eq!(outcome, SyncOutcome::Unchanged);
    assert_eq!(sheet.grid().call_count(), 0);
    assert_eq!(sheet.snapshot(), &before);
}

#[test]
fn test_single_cell_change() {
    let mut sheet = sample_sheet();
    assert_ne!(sheet.get(1, "col_b").unwrap(), &CellValue::from("Updated B2"));

    let outcome = sheet
        .update(|change| change.set(1, "col_b", "Updated B2"))
        .unwrap();

    assert!(outcome.is_synced());
    let calls = sheet.grid().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].data.len(), 1);
    assert_eq!(calls[0].input, ValueInputOption::UserEntered);
    assert_eq!(
        calls[0].data,
        vec![ValueRange::single("B3", json!("Updated B2"))]
    );
    assert_eq!(sheet.get(1, "col_b").unwrap(), &CellValue::from("Updated B2"));
    assert_eq!(sheet.grid().cell("B3"), Some(&json!("Updated B2")));
}

#[test]
fn test_multiple_cell_changes_in_one_batch() {
    let mut sheet = sample_sheet();

    let outcome = sheet
        .update(|change| {
            change.set(0, "col_c", 99)?;
            change.set(2, "col_d", "New D3")?;
            Ok::<(), SheetError>(())
        })
        .unwrap();

    assert_eq!(outcome.changes().len(), 2);
    assert_eq!(sheet.grid().call_count(), 1);

    let mut ranges: Vec<&str> = sheet.grid().calls()[0]
        .data
        .iter()
        .map(|r| r.range.as_str())
        .collect();
    ranges.sort();
    assert_eq!(ranges, ["C2", "D4"]);

    assert_eq!(sheet.get(0, "col_c").unwrap(), &CellValue::from(99));
    assert_eq!(sheet.get(2, "col_d").unwrap(), &CellValue::from("New D3"));
}

#[test]
fn test_bulk_update_merge() {
    let mut sheet = sample_sheet();
    let patch = Snapshot::with_index(
        vec!["col_b"],
        vec![0],
        vec![vec!["UPDATED B1".into()]],
    )
    .unwrap();

    let outcome = sheet
        .update(|change| {
            change.update(&patch);
            Ok::<(), Infallible>(())
        })
        .unwrap();

    assert_eq!(sheet.grid().call_count(), 1);
    assert_eq!(outcome.changes()[0].address.to_string(), "B2");
    assert_eq!(sheet.get(0, "col_b").unwrap(), &CellValue::from("UPDATED B1"));
}

#[test]
fn test_missing_to_value() {
    let mut sheet = sample_sheet();
    assert!(sheet.get(1, "col_d").unwrap().is_missing());

    sheet
        .update(|change| change.set(1, "col_d", "Now Has Value"))
        .unwrap();

    assert_eq!(
        sheet.grid().calls()[0].data,
        vec![ValueRange::single("D3", json!("Now Has Value"))]
    );
    assert_eq!(sheet.get(1, "col_d").unwrap(), &CellValue::from("Now Has Value"));
}

#[test]
fn test_value_to_missing() {
    let mut sheet = sample_sheet();

    sheet.update(|change| change.clear(0, "col_c")).unwrap();

    assert_eq!(
        sheet.grid().calls()[0].data,
        vec![ValueRange::single("C2", json!(""))]
    );
    assert!(sheet.get(0, "col_c").unwrap().is_missing());
    assert_eq!(sheet.grid().cell("C2"), None);
}

#[test]
fn test_value_to_empty_string() {
    let mut sheet = sample_sheet();

    sheet.update(|change| change.set(2, "col_d", "")).unwrap();

    assert_eq!(
        sheet.grid().calls()[0].data,
        vec![ValueRange::single("D4", json!(""))]
    );
    assert_eq!(sheet.get(2, "col_d").unwrap(), &CellValue::from(""));
}

#[test]
fn test_caller_error_propagates_without_sync() {
    let mut sheet = sample_sheet();
    let before = sheet.copy();

    let result = sheet.update(|change| {
        change.set(0, "col_b", "This change won't happen")?;
        bail!("Something went wrong inside!");
    });

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Something went wrong inside!");
    assert_eq!(sheet.grid().call_count(), 0);
    assert_eq!(sheet.snapshot(), &before);
}

#[test]
fn test_local_error_inside_update_aborts() {
    let mut sheet = sample_sheet();
    let before = sheet.copy();

    let result = sheet.update(|change| {
        change.set(0, "col_b", "staged")?;
        change.set(0, "no_such_column", "x")
    });

    assert_eq!(
        result.unwrap_err(),
        SheetError::ColumnNotFound {
            column: "no_such_column".to_string()
        }
    );
    assert_eq!(sheet.grid().call_count(), 0);
    assert_eq!(sheet.snapshot(), &before);
}

#[test]
fn test_panic_inside_transaction_leaves_snapshot() {
    let mut sheet = sample_sheet();
    let before = sheet.copy();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut tx = sheet.start_update();
        tx.set(0, "col_b", "never synced").unwrap();
        panic!("boom");
    }));

    assert!(result.is_err());
    assert_eq!(sheet.grid().call_count(), 0);
    assert_eq!(sheet.snapshot(), &before);
}

#[test]
fn test_grid_failure_is_reported_not_raised() {
    let mut sheet = sample_sheet();
    let before = sheet.copy();
    sheet
        .grid_mut()
        .fail_next(GridError::Backend("API limit reached".to_string()));

    let outcome = sheet
        .update(|change| change.set(0, "col_b", "Change that fails"))
        .unwrap();

    assert!(outcome.is_failed());
    assert_eq!(
        outcome.error().map(ToString::to_string).as_deref(),
        Some("API limit reached")
    );
    let calls = sheet.grid().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].data,
        vec![ValueRange::single("B2", json!("Change that fails"))]
    );
    assert_eq!(calls[0].input, ValueInputOption::UserEntered);
    assert_eq!(sheet.snapshot(), &before);
}

#[test]
fn test_next_transaction_after_failure_syncs() {
    let mut sheet = sample_sheet();
    sheet
        .grid_mut()
        .fail_next(GridError::Network("connection reset".to_string()));

    let failed = sheet
        .update(|change| change.set(0, "col_b", "retry me"))
        .unwrap();
    assert!(failed.is_failed());

    let applied = sheet
        .update(|change| change.set(0, "col_b", "retry me"))
        .unwrap();
    assert!(matches!(applied, SyncOutcome::Applied { .. }));
    assert_eq!(sheet.get(0, "col_b").unwrap(), &CellValue::from("retry me"));
    assert_eq!(sheet.grid().call_count(), 2);
}

#[test]
fn test_structural_edits_only_sync_values() {
    let mut sheet = sample_sheet();

    sheet
        .update(|change| {
            change.set(0, "col_b", "Valid Change")?;
            change.drop_column("col_c")?;
            change.rename_column("col_d", "col_d_new")?;
            Ok::<(), SheetError>(())
        })
        .unwrap();

    assert_eq!(
        sheet.grid().calls()[0].data,
        vec![ValueRange::single("B2", json!("Valid Change"))]
    );
    assert_eq!(sheet.get(0, "col_b").unwrap(), &CellValue::from("Valid Change"));
    assert_eq!(sheet.get(0, "col_c").unwrap(), &CellValue::from(10));
    assert!(sheet.contains_column("col_d"));
}

#[test]
fn test_drop_then_append_row_is_not_synced() {
    let mut sheet = sample_sheet();
    let before = sheet.copy();

    let outcome = sheet
        .update(|change| {
            change.drop_row(2)?;
            let row_id = change.append_row(vec![
                "A9".into(),
                "B9".into(),
                99.into(),
                "D9".into(),
            ])?;
            assert_eq!(row_id, 3);
            Ok::<(), SheetError>(())
        })
        .unwrap();

    assert_eq!(outcome, SyncOutcome::Unchanged);
    assert_eq!(sheet.grid().call_count(), 0);
    assert_eq!(sheet.snapshot(), &before);
}

#[test]
fn test_unaddressable_row_rejected_at_bind() {
    let snapshot = Snapshot::with_index(
        vec!["col_a"],
        vec![usize::MAX - 1],
        vec![vec!["A1".into()]],
    )
    .unwrap();

    let result = DataSheet::new(InMemoryGrid::new(), snapshot, SyncConfig::default());

    assert_eq!(
        result.err(),
        Some(SheetError::RowOutOfRange {
            row: usize::MAX - 1
        })
    );
}

#[test]
fn test_grid_failure_logs_one_error_line() {
    let mut sheet = sample_sheet();
    sheet
        .grid_mut()
        .fail_next(GridError::Backend("API limit reached".to_string()));

    let logs = LogCapture::default();
    let outcome = tracing::subscriber::with_default(logs.subscriber(), || {
        sheet
            .update(|change| change.set(0, "col_b", "Change that fails"))
            .unwrap()
    });

    assert!(outcome.is_failed());
    let output = logs.contents();
    let lines: Vec<&str> = output
        .lines()
        .filter(|line| line.contains("Error during sheet update"))
        .collect();
    assert_eq!(lines.len(), 1, "unexpected log output: {output}");
    assert!(lines[0].contains("ERROR"));
    assert!(lines[0].contains("Error during sheet update: API limit reached"));
}

#[test]
fn test_successful_sync_logs_no_error() {
    let mut sheet = sample_sheet();

    let logs = LogCapture::default();
    let outcome = tracing::subscriber::with_default(logs.subscriber(), || {
        sheet
            .update(|change| change.set(0, "col_b", "fine"))
            .unwrap()
    });

    assert!(outcome.is_synced());
    assert!(!logs.contents().contains("Error during sheet update"));
}

#[test]
fn test_guard_api_preview_then_commit() {
    let mut sheet = sample_sheet();

    let mut tx = sheet.start_update();
    tx.set(1, "col_a", "X").unwrap();
    tx.set(1, "col_a", "A2").unwrap();
    assert!(tx.pending_changes().is_empty());

    tx.set(2, "col_c", 31).unwrap();
    assert_eq!(tx.pending_batch(), vec![ValueRange::single("C4", json!(31))]);
    let outcome = tx.commit();

    assert_eq!(outcome.changes().len(), 1);
    assert_eq!(sheet.get(2, "col_c").unwrap(), &CellValue::from(31));
}

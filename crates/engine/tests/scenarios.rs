// End-to-end behavior of the grid surface on a small snapshot.

mod common;

use std::rc::Rc;

use common::*;
use gridedit_engine::{CellKind, ColumnDefinition, ColumnParams, DataType, SortRequest, Value};

// -------------------------------------------------------------------------
// Scenario A: edit one cell
// -------------------------------------------------------------------------

#[test]
fn edit_cell_then_read_back() {
    let source = Rc::new(scenario_source());
    let mut grid = grid(&source);

    let write = grid.set_cell(1, 1, edit(42));
    assert!(write.is_some());

    let cell = grid.get_cell(1, 1);
    assert_eq!(cell.data, Value::from(42));
    assert_eq!(cell.display_data, "42");
    assert!(cell.last_updated.is_some());
    assert_eq!(grid.get_cell(1, 0).data, Value::from(10));

    assert_eq!(persist(&mut grid, write), Some(Ok(())));
    assert_eq!(source.writes.borrow().as_slice(), &[(1, 1, Value::from(42))]);
}

#[test]
fn edit_cell_accepts_typed_text() {
    let source = Rc::new(scenario_source());
    let mut grid = grid(&source);

    grid.set_cell(1, 2, edit(" +1,250 "));
    assert_eq!(grid.get_cell(1, 2).data, Value::from(1250));
}

#[test]
fn edit_read_only_column_is_rejected() {
    let source = Rc::new(scenario_source());
    let mut grid = grid(&source);

    assert!(grid.set_cell(0, 0, edit("zzz")).is_none());
    assert_eq!(grid.get_cell(0, 0).display_data, "a");
    assert!(grid.get_cell(0, 0).read_only);
    assert!(grid.overlay().get_cell(0, 0).is_none());
}

// -------------------------------------------------------------------------
// Scenario B: add a row
// -------------------------------------------------------------------------

#[test]
fn add_row_shows_defaults() {
    let source = Rc::new(scenario_source());
    let mut grid = grid(&source);

    let row = smol::block_on(grid.add_row()).unwrap();
    assert_eq!(row, 3);
    assert_eq!(grid.get_row_count(), 4);

    for col in 0..grid.get_column_count() {
        let cell = grid.get_cell(col, 3);
        assert!(!cell.is_error(), "column {col} gave {:?}", cell);
        assert!(cell.is_missing_value);
    }
}

#[test]
fn add_row_uses_column_defaults() {
    let source = Rc::new(MemorySource::new(
        vec![
            ColumnDefinition::new("id", DataType::Text),
            ColumnDefinition::new("qty", DataType::Number)
                .editable(true)
                .with_params(ColumnParams {
                    default: Some(Value::from(5)),
                    ..Default::default()
                }),
            ColumnDefinition::new("done", DataType::Boolean).editable(true),
        ],
        vec![vec![Value::text("a"), Value::from(1), Value::Bool(true)]],
    ));
    let mut grid = grid(&source);

    smol::block_on(grid.add_row()).unwrap();
    assert_eq!(grid.get_cell(1, 1).data, Value::from(5));
    let done = grid.get_cell(2, 1);
    assert_eq!(done.kind, CellKind::Boolean);
    assert_eq!(done.data, Value::Bool(false));
    assert_eq!(done.display_data, "false");
}

#[test]
fn edits_to_added_row_reach_the_new_source_row() {
    let source = Rc::new(scenario_source());
    let mut grid = grid(&source);

    let row = smol::block_on(grid.add_row()).unwrap();
    let write = grid.set_cell(1, row, edit(99));
    assert_eq!(persist(&mut grid, write), Some(Ok(())));
    assert_eq!(source.writes.borrow().last(), Some(&(1, 3, Value::from(99))));
    assert_eq!(grid.get_cell(1, row).data, Value::from(99));
}

// -------------------------------------------------------------------------
// Scenario C: delete a row
// -------------------------------------------------------------------------

#[test]
fn delete_row_shifts_following_rows() {
    let source = Rc::new(scenario_source());
    let mut grid = grid(&source);

    assert_eq!(grid.get_cell(0, 1).display_data, "b");
    smol::block_on(grid.delete_row(1)).unwrap();

    assert_eq!(grid.get_row_count(), 2);
    assert_eq!(grid.get_cell(0, 1).display_data, "c");
    assert_eq!(grid.get_cell(1, 1).data, Value::from(30));
    assert_eq!(grid.get_deleted_rows().into_iter().collect::<Vec<_>>(), vec![1]);
    assert_eq!(source.delete_calls.borrow().as_slice(), &[1]);
}

#[test]
fn edits_follow_their_row_after_delete() {
    let source = Rc::new(scenario_source());
    let mut grid = grid(&source);

    grid.set_cell(1, 2, edit(7));
    smol::block_on(grid.delete_row(0)).unwrap();
    assert_eq!(grid.get_cell(1, 1).data, Value::from(7));
    assert_eq!(grid.get_cell(0, 1).display_data, "c");
}

// -------------------------------------------------------------------------
// Scenario D: sort cycle returns to the original order
// -------------------------------------------------------------------------

#[test]
fn sort_cycle_restores_order() {
    let source = Rc::new(scenario_source());
    let mut grid = grid(&source);
    let before = column_display(&mut grid, 0);

    grid.sort_column(1, SortRequest::Ascending, None).unwrap();
    assert_eq!(column_display(&mut grid, 0), vec!["a", "b", "c"]);
    grid.sort_column(1, SortRequest::Descending, None).unwrap();
    assert_eq!(column_display(&mut grid, 0), vec!["c", "b", "a"]);
    assert_eq!(grid.sort_column(1, SortRequest::Auto, None).unwrap(), None);

    assert_eq!(column_display(&mut grid, 0), before);
    assert!(grid.sort_state().is_none());
}

// -------------------------------------------------------------------------
// Scenario E: invalid edit is shown but not persisted
// -------------------------------------------------------------------------

#[test]
fn invalid_edit_is_kept_but_not_persisted() {
    let source = Rc::new(MemorySource::new(
        vec![
            ColumnDefinition::new("id", DataType::Text),
            ColumnDefinition::new("qty", DataType::Number)
                .editable(true)
                .with_params(ColumnParams {
                    max: Some(Value::from(100)),
                    ..Default::default()
                }),
        ],
        vec![vec![Value::text("a"), Value::from(1)]],
    ));
    let mut grid = grid(&source);

    // warm the cache so a stale success cell could be served
    assert_eq!(grid.get_cell(1, 0).data, Value::from(1));

    assert!(grid.set_cell(1, 0, edit(500)).is_none());
    let cell = grid.get_cell(1, 0);
    assert_eq!(cell.data, Value::from(500));
    assert_eq!(cell.validation_error.as_deref(), Some("The value must be 100 or smaller."));
    assert_eq!(source.write_count(), 0);

    assert!(grid.set_cell(1, 0, edit("lots")).is_none());
    let cell = grid.get_cell(1, 0);
    assert_eq!(cell.display_data, "lots");
    assert!(cell.validation_error.is_some());
    assert_eq!(source.write_count(), 0);
}

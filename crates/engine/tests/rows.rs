// Row lifecycle: add/delete against the data source, interaction with sort,
// fixed-row mode and refresh.

mod common;

use std::rc::Rc;

use common::*;
use gridedit_config::{EditorSettings, RowMode};
use gridedit_engine::{ColumnDefinition, DataType, GridError, SortDirection, SortRequest, Value};

fn fixed_rows() -> EditorSettings {
    let mut settings = EditorSettings::default();
    settings.rows.mode = RowMode::Fixed;
    settings
}

#[test]
fn fixed_mode_refuses_row_changes() {
    let source = Rc::new(scenario_source());
    let mut grid = grid_with(&source, fixed_rows());

    assert_eq!(smol::block_on(grid.add_row()), Err(GridError::RowsFixed));
    assert_eq!(smol::block_on(grid.delete_row(0)), Err(GridError::RowsFixed));
    assert_eq!(grid.get_row_count(), 3);
    assert!(source.delete_calls.borrow().is_empty());
}

#[test]
fn rejected_delete_keeps_row() {
    let source = Rc::new(scenario_source());
    source.reject_deletes.set(true);
    let mut grid = grid(&source);

    let err = smol::block_on(grid.delete_row(1)).unwrap_err();
    assert_eq!(err, GridError::DeleteRejected { row: 1 });
    assert_eq!(grid.get_row_count(), 3);
    assert!(grid.get_deleted_rows().is_empty());
    assert_eq!(grid.get_cell(0, 1).display_data, "b");
}

#[test]
fn failed_add_leaves_overlay_untouched() {
    let source = Rc::new(scenario_source());
    source.fail_adds.set(true);
    let mut grid = grid(&source);

    let err = smol::block_on(grid.add_row()).unwrap_err();
    assert!(matches!(err, GridError::Source(_)));
    assert_eq!(grid.get_row_count(), 3);
    assert!(grid.overlay().added_rows().is_empty());
}

#[test]
fn delete_out_of_bounds_is_error() {
    let source = Rc::new(scenario_source());
    let mut grid = grid(&source);

    let err = smol::block_on(grid.delete_row(3)).unwrap_err();
    assert!(matches!(err, GridError::IndexOutOfBounds { index: 3, len: 3, .. }));
    assert!(source.delete_calls.borrow().is_empty());
}

#[test]
fn delete_added_row() {
    let source = Rc::new(scenario_source());
    let mut grid = grid(&source);

    let row = smol::block_on(grid.add_row()).unwrap();
    smol::block_on(grid.delete_row(row)).unwrap();

    assert_eq!(grid.get_row_count(), 3);
    // the data source is addressed by the index it handed out
    assert_eq!(source.delete_calls.borrow().as_slice(), &[3]);
    assert_eq!(grid.get_deleted_rows().into_iter().collect::<Vec<_>>(), vec![3]);
    assert!(grid.edit_summary().added_rows.is_empty());
}

#[test]
fn source_deleted_rows_are_hidden_from_the_start() {
    let source = Rc::new(scenario_source().with_deleted(&[0]));
    let mut grid = grid(&source);

    assert_eq!(grid.get_row_count(), 2);
    assert_eq!(column_display(&mut grid, 0), vec!["b", "c"]);
}

#[test]
fn added_row_goes_last_while_sorted() {
    let source = Rc::new(scenario_source());
    let mut grid = grid(&source);

    grid.sort_column(1, SortRequest::Descending, None).unwrap();
    let row = smol::block_on(grid.add_row()).unwrap();
    assert_eq!(row, 3);
    assert!(grid.get_cell(1, 3).is_missing_value);
    assert_eq!(column_display(&mut grid, 0), vec!["c", "b", "a", ""]);

    // re-sorting integrates it: missing values go last when descending
    grid.sort_column(1, SortRequest::Descending, Some(false)).unwrap();
    assert_eq!(column_display(&mut grid, 0), vec!["c", "b", "a", ""]);
    grid.sort_column(1, SortRequest::Ascending, None).unwrap();
    assert_eq!(column_display(&mut grid, 0), vec!["", "a", "b", "c"]);
}

#[test]
fn delete_while_sorted_removes_the_displayed_row() {
    let source = Rc::new(scenario_source());
    let mut grid = grid(&source);

    grid.sort_column(1, SortRequest::Descending, None).unwrap();
    // display row 0 is "c", original row 2
    smol::block_on(grid.delete_row(0)).unwrap();

    assert_eq!(source.delete_calls.borrow().as_slice(), &[2]);
    assert_eq!(column_display(&mut grid, 0), vec!["b", "a"]);
    assert_eq!(
        grid.sort_state().map(|s| s.direction),
        Some(SortDirection::Descending)
    );
}

#[test]
fn refresh_resets_session_state() {
    let source = Rc::new(scenario_source());
    let mut grid = grid(&source);

    grid.set_cell(1, 0, edit(1));
    smol::block_on(grid.add_row()).unwrap();
    grid.sort_column(0, SortRequest::Descending, None).unwrap();

    source.stage_refresh(
        vec![
            ColumnDefinition::new("name", DataType::Text).editable(true),
            ColumnDefinition::new("qty", DataType::Number).editable(true),
            ColumnDefinition::new("note", DataType::Text),
        ],
        vec![
            vec![Value::text("x"), Value::from(1), Value::text("n1")],
            vec![Value::text("y"), Value::from(2), Value::text("n2")],
        ],
        &[1],
    );
    smol::block_on(grid.refresh()).unwrap();

    assert_eq!(grid.get_column_count(), 3);
    assert_eq!(grid.get_column_definition(2).map(|c| c.id.as_str()), Some("note"));
    assert_eq!(grid.get_row_count(), 1);
    assert!(grid.sort_state().is_none());
    assert!(grid.edit_summary().is_empty());
    assert_eq!(grid.get_cell(0, 0).display_data, "x");
    assert_eq!(grid.get_cell(2, 0).display_data, "n1");
}

#[test]
fn delete_is_idempotent_on_the_overlay() {
    let mut overlay = gridedit_engine::EditOverlay::new(3);
    overlay.delete_row(2).unwrap();
    let once = overlay.deleted_rows().clone();
    overlay.delete_row(2).unwrap();
    assert_eq!(overlay.deleted_rows(), &once);
}

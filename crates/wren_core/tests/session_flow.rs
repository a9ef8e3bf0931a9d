use wren_core::config::{APPLICATION_KEY, MAIN_GRID_KEY, NAME_COUNTER_KEY};
use wren_core::{
    open_db, open_db_in_memory, CursorRole, Direction, GridConfig, RecordKind, RecordStore,
    ServiceError, SqliteRecordStore, Session,
};

#[test]
fn first_open_bootstraps_well_known_records() {
    let conn = open_db_in_memory().unwrap();
    let session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();
    let store = session.store();

    assert_eq!(store.load_datum(NAME_COUNTER_KEY).unwrap().content, "0");
    let app = store.load_application(APPLICATION_KEY).unwrap();
    assert!(app.grids.contains(MAIN_GRID_KEY));
    assert_eq!(app.current_grid.as_deref(), Some(MAIN_GRID_KEY));
    assert!(store.load_grid(MAIN_GRID_KEY).unwrap().clips.is_empty());
    assert_eq!(session.grid().key(), MAIN_GRID_KEY);
}

#[test]
fn invalid_config_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let result = Session::open(SqliteRecordStore::new(&conn), GridConfig::with_viewport(0, 7));
    assert!(matches!(result, Err(ServiceError::Config(_))));
}

#[test]
fn datum_names_come_from_persisted_counter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wren.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();
        assert_eq!(session.next_datum_name().unwrap(), "0");
        assert_eq!(session.next_datum_name().unwrap(), "1");
    }

    let conn = open_db(&path).unwrap();
    let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();
    let key = session.create_datum("hello").unwrap();
    assert_eq!(session.datum(&key).unwrap().name, "2");
}

#[test]
fn grid_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wren.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();
        session.new_datum_and_clip(2, 2, "alpha").unwrap();
        session.new_datum_and_clip(4, 3, "beta").unwrap();
        session.move_cursor(CursorRole::Main, Direction::Right).unwrap();
        session.copy_clip().unwrap();
    }

    let conn = open_db(&path).unwrap();
    let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();
    let grid = session.grid();
    assert_eq!(grid.plane().len(), 2);
    assert_eq!(grid.bounds().min_x(), Some(2));
    assert_eq!(grid.bounds().max_x(), Some(4));
    assert_eq!(grid.bounds().column_range(4), Some((1, 1)));
    assert_eq!((grid.main_cursor().x, grid.main_cursor().y), (3, 2));
    assert_eq!(grid.clipboard(), None);

    let alpha_key = grid.clip_at(2, 0).unwrap().datum_key.clone();
    assert_eq!(session.datum(&alpha_key).unwrap().content, "alpha");
}

#[test]
fn clip_commands_report_unmet_preconditions() {
    let conn = open_db_in_memory().unwrap();
    let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();

    let delete = session.delete_clip().unwrap();
    assert!(!delete.ok);
    assert_eq!(delete.message, "Delete Clip fail - no Clip selected");
    assert!(!session.copy_clip().unwrap().ok);
    assert!(!session.cut_clip().unwrap().ok);
    assert!(!session.paste_clip().unwrap().ok);
    assert!(!session.archive_selection().unwrap().ok);
    assert!(!session.cycle_parentage().unwrap().ok);
    assert!(session.grid().plane().is_empty());
}

#[test]
fn cut_then_paste_moves_datum_with_a_fresh_clip() {
    let conn = open_db_in_memory().unwrap();
    let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();
    session.new_datum_and_clip(2, 2, "note").unwrap();
    let original = session.grid().selection_clip().unwrap().clone();

    assert!(session.cut_clip().unwrap().ok);
    assert!(session.grid().selection_clip().is_none());
    assert_eq!(session.grid().clipboard(), Some(original.datum_key.as_str()));

    session.move_cursor(CursorRole::Main, Direction::Down).unwrap();
    assert!(session.paste_clip().unwrap().ok);
    let pasted = session.grid().selection_clip().unwrap();
    assert_eq!(pasted.datum_key, original.datum_key);
    assert_ne!(pasted.key, original.key);
    assert_eq!(pasted.coords(), (2, 1));
}

#[test]
fn paste_replaces_clip_under_the_selection() {
    let conn = open_db_in_memory().unwrap();
    let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();
    session.new_datum_and_clip(2, 2, "keep").unwrap();
    session.copy_clip().unwrap();
    session.move_cursor(CursorRole::Main, Direction::Right).unwrap();
    session.new_datum_and_clip(3, 2, "replace me").unwrap();

    assert!(session.paste_clip().unwrap().ok);

    let grid = session.grid();
    assert_eq!(grid.plane().len(), 2);
    assert_eq!(
        grid.clip_at(3, 0).unwrap().datum_key,
        grid.clip_at(2, 0).unwrap().datum_key
    );
}

#[test]
fn new_clip_refuses_an_occupied_cell() {
    let conn = open_db_in_memory().unwrap();
    let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();
    session.new_datum_and_clip(0, 0, "first").unwrap();

    let outcome = session.new_datum_and_clip(0, 0, "second").unwrap();
    assert!(!outcome.ok);
    assert_eq!(session.grid().plane().len(), 1);
    assert_eq!(session.store().list_kind(RecordKind::Datum).unwrap().len(), 2);
}

#[test]
fn import_fills_the_nearest_free_cell() {
    let conn = open_db_in_memory().unwrap();
    let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();

    for text in ["a", "b", "c"] {
        session.import_text(text).unwrap();
    }

    let grid = session.grid();
    assert!(grid.clip_at(2, 0).is_some());
    assert!(grid.clip_at(1, -1).is_some());
    assert!(grid.clip_at(2, -1).is_some());
    assert_eq!(grid.active_datums().len(), 3);
}

#[test]
fn column_commands_use_the_selection_column() {
    let conn = open_db_in_memory().unwrap();
    let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();
    session.new_datum_and_clip(1, 2, "left").unwrap();
    session.new_datum_and_clip(2, 2, "here").unwrap();

    assert!(session.insert_cursor_column().unwrap().ok);
    assert!(session.grid().clip_at(2, 0).is_none());
    assert!(session.grid().clip_at(1, 0).is_some());
    assert!(session.grid().clip_at(0, 0).is_some());

    session.delete_cursor_column().unwrap();
    assert!(session.grid().clip_at(2, 0).is_some());
    assert!(session.grid().clip_at(1, 0).is_some());
    assert_eq!(session.grid().plane().len(), 2);
}

#[test]
fn archive_selection_deactivates_but_keeps_the_record() {
    let conn = open_db_in_memory().unwrap();
    let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();
    session.new_datum_and_clip(2, 2, "gone").unwrap();
    let key = session.grid().selection_clip().unwrap().datum_key.clone();

    assert!(session.archive_selection().unwrap().ok);

    assert!(session.grid().plane().is_empty());
    assert!(!session.grid().is_active(&key));
    assert_eq!(session.store().load_datum(&key).unwrap().content, "gone");
    assert!(session
        .store()
        .load_grid(MAIN_GRID_KEY)
        .unwrap()
        .active_datums
        .is_empty());
}

#[test]
fn parentage_toggles_and_ancestors_stop_at_cycles() {
    let conn = open_db_in_memory().unwrap();
    let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();
    session.new_datum_and_clip(2, 2, "child").unwrap();
    session.new_datum_and_clip(3, 2, "parent").unwrap();
    let child = session.grid().clip_at(2, 0).unwrap().datum_key.clone();
    let parent = session.grid().clip_at(3, 0).unwrap().datum_key.clone();
    session.grid_mut().set_secondary_cursor(3, 0);

    assert!(session.cycle_parentage().unwrap().ok);
    assert_eq!(session.datum(&child).unwrap().parent.as_deref(), Some(parent.as_str()));
    assert_eq!(session.ancestors(&child).unwrap(), vec![parent.clone()]);
    assert_eq!(
        session.store().load_datum(&child).unwrap().parent,
        Some(parent.clone())
    );

    session.grid_mut().set_main_cursor(3, 2);
    session.grid_mut().set_secondary_cursor(2, 0);
    assert!(session.cycle_parentage().unwrap().ok);
    assert_eq!(session.ancestors(&child).unwrap(), vec![parent.clone()]);
    assert_eq!(session.ancestors(&parent).unwrap(), vec![child.clone()]);

    session.grid_mut().set_main_cursor(2, 2);
    session.grid_mut().set_secondary_cursor(3, 0);
    assert!(session.cycle_parentage().unwrap().ok);
    assert_eq!(session.datum(&child).unwrap().parent, None);
}

#[test]
fn find_scrolls_match_to_the_anchor_cell() {
    let conn = open_db_in_memory().unwrap();
    let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();
    session.new_datum_and_clip(10, 6, "needle").unwrap();
    session.new_datum_and_clip(0, 0, "hay").unwrap();

    let outcome = session.find("needle").unwrap();

    assert!(outcome.ok, "{}", outcome.message);
    let grid = session.grid();
    assert_eq!((grid.main_cursor().x, grid.main_cursor().y), (2, 2));
    assert_eq!(grid.selection_coords(), (10, 4));
    assert!(!session.find("absent").unwrap().ok);
}

#[test]
fn edits_update_datum_and_clip() {
    let conn = open_db_in_memory().unwrap();
    let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();
    session.new_datum_and_clip(2, 2, "draft").unwrap();
    let key = session.grid().selection_clip().unwrap().datum_key.clone();

    assert!(session.edit_selection_text("final text").unwrap().ok);
    assert!(session.set_selection_edit_position(5).unwrap().ok);
    session.rename_datum(&key, "renamed").unwrap();

    let stored = session.store().load_datum(&key).unwrap();
    assert_eq!(stored.content, "final text");
    assert_eq!(stored.name, "renamed");
    let grid = session.store().load_grid(MAIN_GRID_KEY).unwrap();
    assert_eq!(grid.clips[0].edit_cursor_position, 5);
}

#[test]
fn grids_can_be_created_and_switched() {
    let conn = open_db_in_memory().unwrap();
    let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();
    session.new_datum_and_clip(2, 2, "main").unwrap();

    let second = session.create_grid().unwrap();
    assert_eq!(session.grid().key(), second);
    assert!(session.grid().plane().is_empty());

    session.switch_grid(MAIN_GRID_KEY).unwrap();
    assert_eq!(session.grid().plane().len(), 1);
    assert!(matches!(
        session.switch_grid("missing"),
        Err(ServiceError::UnknownGrid(_))
    ));

    let app = session.store().load_application(APPLICATION_KEY).unwrap();
    assert_eq!(app.grids.len(), 2);
    assert_eq!(app.current_grid.as_deref(), Some(MAIN_GRID_KEY));
}

#[test]
fn scrolling_commands_move_the_viewport() {
    let conn = open_db_in_memory().unwrap();
    let mut session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default()).unwrap();

    session.scroll(3, -1).unwrap();
    assert_eq!(session.grid().offset(), (3, -3));

    let selected = session.grid().selection_coords();
    session.scroll_cursor_right().unwrap();
    assert_eq!(session.grid().selection_coords(), selected);
    assert_eq!(session.grid().main_cursor().x, 11);
    session.scroll_cursor_center().unwrap();
    assert_eq!(session.grid().main_cursor().x, 6);
    session.scroll_cursor_left().unwrap();
    assert_eq!(session.grid().main_cursor().x, 0);
    assert_eq!(session.grid().selection_coords(), selected);

    assert_eq!(session.column_scroll().unwrap().message, "Column Scroll - Home Row");
    assert_eq!(session.grid().offset().1, -2);
}

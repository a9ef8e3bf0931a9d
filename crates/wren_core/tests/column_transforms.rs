use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use wren_core::grid::plane::SparsePlane;
use wren_core::{Clip, Coord, Grid, GridConfig, GridEvent};

fn plane_with(clips: &[(&str, i64, i64)]) -> SparsePlane {
    SparsePlane::from_clips(
        clips
            .iter()
            .map(|(datum, x, y)| Clip::new("g", *datum, *x, *y, 0)),
    )
    .unwrap()
}

fn layout(plane: &SparsePlane) -> BTreeMap<Coord, String> {
    plane
        .iter()
        .map(|clip| (clip.coords(), clip.datum_key.clone()))
        .collect()
}

fn clip_keys(plane: &SparsePlane) -> BTreeMap<Coord, String> {
    plane
        .iter()
        .map(|clip| (clip.coords(), clip.key.clone()))
        .collect()
}

fn cells(entries: &[((i64, i64), &str)]) -> BTreeMap<Coord, String> {
    entries
        .iter()
        .map(|(coord, datum)| (*coord, datum.to_string()))
        .collect()
}

#[test]
fn insert_column_on_empty_plane_is_noop() {
    let mut plane = SparsePlane::new();
    let report = plane.insert_column(0).unwrap();

    assert!(report.is_noop());
    assert!(plane.is_empty());
    assert_eq!(plane.bounds().min_x(), None);
}

#[test]
fn insert_column_slides_home_clip_left() {
    let mut plane = plane_with(&[("a", 0, 0)]);
    let report = plane.insert_column(0).unwrap();

    assert_eq!(report.moved, vec![((0, 0), (-1, 0))]);
    assert_eq!(layout(&plane), cells(&[((-1, 0), "a")]));
    assert_eq!(plane.bounds().min_x(), Some(-1));
    assert_eq!(plane.bounds().max_x(), Some(-1));
    assert_eq!(plane.bounds().column_range(-1), Some((0, 0)));
    assert_eq!(plane.bounds().column_range(0), None);
}

#[test]
fn insert_column_leaves_right_side_alone() {
    let mut plane = plane_with(&[("a", -1, 2), ("b", 0, -1), ("c", 0, 3), ("d", 2, 0)]);
    plane.insert_column(0).unwrap();

    assert_eq!(
        layout(&plane),
        cells(&[((-2, 2), "a"), ((-1, -1), "b"), ((-1, 3), "c"), ((2, 0), "d")])
    );
    assert_eq!(plane.bounds().min_x(), Some(-2));
    assert_eq!(plane.bounds().max_x(), Some(2));
    assert_eq!(plane.bounds().column_range(-1), Some((-1, 3)));
    assert_eq!(plane.bounds().column_range(-2), Some((2, 2)));
}

#[test]
fn insert_column_left_of_every_clip_is_noop() {
    let mut plane = plane_with(&[("a", 5, 0)]);
    assert!(plane.insert_column(4).unwrap().is_noop());
    assert_eq!(layout(&plane), cells(&[((5, 0), "a")]));
}

#[test]
fn delete_column_closes_gap_from_the_left() {
    let mut plane = plane_with(&[("a", 0, 0), ("b", 1, 0)]);
    let report = plane.delete_column(1).unwrap();

    assert_eq!(report.removed.len(), 1);
    assert_eq!(report.removed[0].datum_key, "b");
    assert_eq!(layout(&plane), cells(&[((1, 0), "a")]));
    assert_eq!(plane.bounds().min_x(), Some(1));
    assert_eq!(plane.bounds().max_x(), Some(1));
}

#[test]
fn delete_column_counts_and_shifts_exactly() {
    let before = plane_with(&[
        ("a", -3, 1),
        ("b", -1, -2),
        ("c", -1, 4),
        ("d", 2, 0),
        ("e", 2, 1),
        ("f", 2, 5),
        ("g", 6, 0),
    ]);
    let mut plane = before.clone();
    let report = plane.delete_column(2).unwrap();

    assert_eq!(report.removed.len(), 3);
    assert_eq!(plane.len(), before.len() - 3);
    for clip in before.iter() {
        let expected = match clip.x {
            x if x < 2 => Some((x + 1, clip.y)),
            2 => None,
            x => Some((x, clip.y)),
        };
        let found = plane
            .iter()
            .find(|moved| moved.key == clip.key)
            .map(Clip::coords);
        assert_eq!(found, expected, "clip of datum {}", clip.datum_key);
    }
    assert_eq!(plane.bounds().min_x(), Some(-2));
    assert_eq!(plane.bounds().max_x(), Some(6));
}

#[test]
fn delete_column_with_nothing_at_or_left_is_noop() {
    let mut plane = plane_with(&[("a", 3, 0)]);
    assert!(plane.delete_column(2).unwrap().is_noop());
    assert_eq!(layout(&plane), cells(&[((3, 0), "a")]));
}

#[test]
fn delete_of_rightmost_column_moves_max_x() {
    let mut plane = plane_with(&[("a", 4, 0)]);
    plane.delete_column(4).unwrap();

    assert!(plane.is_empty());
    assert_eq!(plane.bounds().max_x(), None);
}

proptest! {
    #[test]
    fn insert_then_delete_restores_layout(
        cells in prop::collection::btree_set((-6i64..=6, -4i64..=4), 0..30),
        column in -7i64..=7,
    ) {
        let original = SparsePlane::from_clips(
            cells
                .into_iter()
                .filter(|(x, _)| *x != column)
                .enumerate()
                .map(|(index, (x, y))| Clip::new("g", format!("d{index}"), x, y, 0)),
        )
        .unwrap();
        let mut plane = original.clone();

        plane.insert_column(column).unwrap();
        prop_assert!(plane.column(column).is_empty());
        plane.delete_column(column).unwrap();

        prop_assert_eq!(clip_keys(&plane), clip_keys(&original));
        prop_assert_eq!(plane.bounds(), original.bounds());
    }
}

#[test]
fn archive_removes_home_row_column_and_shifts_the_rest() {
    let mut plane = plane_with(&[
        ("a", 1, 0),
        ("b", 2, 0),
        ("doomed", 3, 0),
        ("x", 3, 1),
        ("c", 4, 0),
        ("d", 4, 2),
    ]);
    let report = plane.archive("doomed").unwrap();

    assert_eq!(report.removed.len(), 2);
    assert_eq!(
        layout(&plane),
        cells(&[((1, 0), "a"), ((2, 0), "b"), ((3, 0), "c"), ((3, 2), "d")])
    );
    assert_eq!(plane.bounds().max_x(), Some(3));
    assert_eq!(plane.bounds().column_range(3), Some((0, 2)));
    assert_eq!(plane.bounds().column_range(4), None);
}

#[test]
fn archive_collapses_rows_toward_home() {
    let mut plane = plane_with(&[
        ("top", 0, -3),
        ("doomed", 0, -2),
        ("up", 0, -1),
        ("home", 0, 0),
        ("doomed", 0, 1),
        ("doomed", 0, 2),
        ("low", 0, 3),
    ]);
    plane.archive("doomed").unwrap();

    assert_eq!(
        layout(&plane),
        cells(&[((0, -2), "top"), ((0, -1), "up"), ((0, 0), "home"), ((0, 1), "low")])
    );
    assert_eq!(plane.bounds().column_range(0), Some((-2, 1)));
}

#[test]
fn archive_passes_shift_independently() {
    let mut plane = plane_with(&[
        ("doomed", 2, -1),
        ("above", 2, -2),
        ("home", 2, 0),
        ("below", 2, 1),
    ]);
    plane.archive("doomed").unwrap();

    assert_eq!(
        layout(&plane),
        cells(&[((2, -1), "above"), ((2, 0), "home"), ((2, 1), "below")])
    );
}

#[test]
fn archive_keeps_collapsed_columns_contiguous() {
    let mut plane = plane_with(&[
        ("k1", -2, -2),
        ("z", -2, -1),
        ("k2", -2, 0),
        ("z", -2, 1),
        ("k3", -2, 2),
        ("z", -1, 0),
        ("m", -1, 1),
        ("n", 1, 0),
        ("z", 1, 1),
        ("z", 1, 2),
        ("o", 1, 3),
    ]);
    plane.archive("z").unwrap();

    assert!(plane.iter().all(|clip| clip.datum_key != "z"));
    for column in plane.bounds().columns() {
        let (upper, lower) = plane.bounds().column_range(column).unwrap();
        let rows: BTreeSet<i64> = plane.column(column).iter().map(|clip| clip.y).collect();
        assert_eq!(
            rows,
            (upper..=lower).collect::<BTreeSet<i64>>(),
            "column {column}"
        );
    }
    assert_eq!(
        layout(&plane),
        cells(&[
            ((-2, -1), "k1"),
            ((-2, 0), "k2"),
            ((-2, 1), "k3"),
            ((0, 0), "n"),
            ((0, 1), "o"),
        ])
    );
}

#[test]
fn grid_archive_deactivates_and_clears_clipboard() {
    let mut grid = Grid::new("g", &GridConfig::default());
    for (datum, x, y) in [("keep", 0, 0), ("drop", 0, 1), ("drop", 1, 0)] {
        grid.activate(datum);
        grid.place_clip(datum, x, y, 0).unwrap();
    }
    grid.set_clipboard(Some("drop".to_string()));
    grid.drain_events();

    let report = grid.archive("drop").unwrap();

    assert_eq!(report.removed.len(), 2);
    assert!(!grid.is_active("drop"));
    assert!(grid.is_active("keep"));
    assert_eq!(grid.clipboard(), None);
    assert_eq!(grid.plane().len(), 1);
    assert!(matches!(
        grid.drain_events().as_slice(),
        [GridEvent::ClipsChanged { .. }]
    ));
}

#[test]
fn grid_transforms_report_touched_coordinates() {
    let mut grid = Grid::new("g", &GridConfig::default());
    grid.activate("a");
    grid.place_clip("a", 0, 0, 0).unwrap();
    grid.drain_events();

    grid.insert_column(0).unwrap();
    assert_eq!(
        grid.drain_events(),
        vec![GridEvent::ClipsChanged {
            touched: vec![(-1, 0), (0, 0)]
        }]
    );

    grid.insert_column(-5).unwrap();
    assert!(grid.drain_events().is_empty());
}

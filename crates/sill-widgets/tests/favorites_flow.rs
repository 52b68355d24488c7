//! End-to-end Favorites flows through the public wiring API:
//! cross-container moves into and out of a folder, with the effects a
//! host shell would drain.

use sill_core::geometry::Rect;
use sill_core::id::RowId;
use sill_core::pointer::PointerEvent;
use sill_sortable::driver::DropOutcome;
use sill_sortable::intent::Placement;
use sill_widgets::effects::{EntryKind, MovePlacement};
use sill_widgets::favorites::{FavoritesEffect, FavoritesModel, FavoritesView};

const ROW_H: f32 = 24.0;

fn seeded_view() -> FavoritesView {
    let mut model = FavoritesModel::new();
    let work = model.add_folder("work", "Work");
    model.add_favorite("/work/report", "Report", Some(&work));
    model.add_favorite("/home/docs", "Docs", None);
    model.add_favorite("/home/videos", "Videos", None);
    model.set_expanded(&work, true);

    let mut view = FavoritesView::new(model, Rect::new(0.0, 0.0, 300.0, 400.0));
    remount_rows(&mut view);
    view
}

/// Lay visible rows out top to bottom, as the renderer would after a
/// structural change.
fn remount_rows(view: &mut FavoritesView) {
    let rows: Vec<RowId> = view
        .model()
        .visible()
        .iter()
        .map(|e| e.id.clone())
        .collect();
    for (i, id) in rows.into_iter().enumerate() {
        view.mount_row(id, Rect::new(0.0, i as f32 * ROW_H, 300.0, ROW_H));
    }
}

fn drag(view: &mut FavoritesView, id: RowId, from_y: f32, to_y: f32) -> DropOutcome {
    view.press_row(id, &PointerEvent::at(10.0, from_y));
    view.pointer_move(&PointerEvent::at(10.0, to_y));
    let _ = view.frame(web_time::Instant::now());
    let (outcome, _) = view.pointer_up(&PointerEvent::at(10.0, to_y));
    outcome
}

#[test]
fn drag_a_root_favorite_into_the_expanded_folder() {
    let mut view = seeded_view();
    // Visible: folder:work, /work/report, /home/docs, /home/videos.

    view.press_row(RowId::item("/home/docs"), &PointerEvent::at(10.0, 52.0));
    view.pointer_move(&PointerEvent::at(10.0, 12.0)); // center of the folder row
    let _ = view.frame(web_time::Instant::now());
    let (outcome, effects) = view.pointer_up(&PointerEvent::at(10.0, 12.0));

    match outcome {
        DropOutcome::Committed(mv) => {
            assert_eq!(mv.intent.target, RowId::folder("work"));
            assert_eq!(mv.intent.placement, Placement::Inside);
        }
        other => unreachable!("expected commit, got {other:?}"),
    }

    let persist = effects.iter().find_map(|e| match e {
        FavoritesEffect::Persist(req) => Some(req.clone()),
        _ => None,
    });
    let persist = persist.expect("persist effect");
    assert_eq!(persist.moved_kind, EntryKind::Item);
    assert_eq!(persist.moved_key, "/home/docs");
    assert_eq!(persist.target_kind, EntryKind::Folder);
    assert_eq!(persist.target_key, "work");
    assert_eq!(persist.placement, MovePlacement::Inside);

    assert!(
        effects
            .iter()
            .any(|e| matches!(e, FavoritesEffect::Announce(_))),
        "siblings must hear about the change"
    );

    // Docs is now the folder's last child, after Report.
    assert_eq!(
        view.model().entry(&RowId::item("/home/docs")).unwrap().parent,
        Some(RowId::folder("work"))
    );
    let order: Vec<&str> = view
        .model()
        .entries()
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(
        order,
        vec![
            "folder:work",
            "item:/work/report",
            "item:/home/docs",
            "item:/home/videos",
        ]
    );
}

#[test]
fn drag_a_nested_favorite_out_to_the_root_level() {
    let mut view = seeded_view();
    // Visible rows: work(0), report(1), docs(2), videos(3).

    let outcome = drag(
        &mut view,
        RowId::item("/work/report"),
        ROW_H + 4.0,
        3.0 * ROW_H + 20.0, // lower half of the videos row
    );
    match outcome {
        DropOutcome::Committed(mv) => {
            assert_eq!(mv.intent.target, RowId::item("/home/videos"));
            assert_eq!(mv.intent.placement, Placement::After);
        }
        other => unreachable!("expected commit, got {other:?}"),
    }

    assert_eq!(
        view.model().entry(&RowId::item("/work/report")).unwrap().parent,
        None,
        "report left the folder"
    );
    let order: Vec<&str> = view
        .model()
        .entries()
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(
        order,
        vec![
            "folder:work",
            "item:/home/docs",
            "item:/home/videos",
            "item:/work/report",
        ]
    );
}

#[test]
fn consecutive_drags_reuse_the_same_view() {
    let mut view = seeded_view();

    // First: docs after videos.
    let outcome = drag(
        &mut view,
        RowId::item("/home/docs"),
        2.0 * ROW_H + 4.0,
        3.0 * ROW_H + 20.0,
    );
    assert!(matches!(outcome, DropOutcome::Committed(_)));
    assert!(view.swallow_click());
    remount_rows(&mut view);

    // Second: videos before the folder.
    let outcome = drag(
        &mut view,
        RowId::item("/home/videos"),
        2.0 * ROW_H + 4.0,
        3.0,
    );
    assert!(matches!(outcome, DropOutcome::Committed(_)));

    let order: Vec<&str> = view
        .model()
        .entries()
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(
        order,
        vec![
            "item:/home/videos",
            "folder:work",
            "item:/work/report",
            "item:/home/docs",
        ]
    );
}

#[path = "../support/mod.rs"]
mod support;

use std::sync::{Arc, Mutex};

use menu_admin::{
    Direction, LogNotifier, MenuItemDraft, MenuItemPatch, MoveOutcome, NoOp, Notice, Operation,
    OrderedCollection, StoreError, SyncError,
};
use support::{expected, names, seed_menu, Menu, ScriptedStore};

async fn loaded(store: &ScriptedStore, dishes: &[&str]) -> (Menu, Arc<Mutex<Vec<Notice>>>) {
    seed_menu(store, dishes).await;
    let notices = Arc::new(Mutex::new(Vec::new()));
    let menu = OrderedCollection::new(Arc::new(store.clone()))
        .with_notifier(LogNotifier::with_buffer(notices.clone()));
    menu.load().await.unwrap();
    (menu, notices)
}

fn failures(notices: &Mutex<Vec<Notice>>) -> Vec<String> {
    notices
        .lock()
        .unwrap()
        .iter()
        .filter(|n| n.is_failure())
        .map(|n| n.message().to_string())
        .collect()
}

async fn settle(mut done: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

#[tokio::test]
async fn drag_persists_only_the_shifted_range() {
    let store = ScriptedStore::new();
    let (menu, notices) = loaded(&store, &["Momo", "Thukpa", "Sel Roti", "Chatamari", "Yomari"]).await;

    let outcome = menu.move_item(1, 3).await.unwrap();

    assert_eq!(outcome, MoveOutcome::Moved);
    assert_eq!(names(&menu.items()), ["Momo", "Sel Roti", "Chatamari", "Thukpa", "Yomari"]);
    assert_eq!(store.updates_started(), 3);
    assert_eq!(
        store.stored_menu(),
        expected(&["Momo", "Sel Roti", "Chatamari", "Thukpa", "Yomari"])
    );
    assert!(failures(&notices).is_empty());
    assert_eq!(
        notices.lock().unwrap().last(),
        Some(&Notice::success("Order updated"))
    );
}

#[tokio::test]
async fn swap_at_the_edge_makes_no_store_calls() {
    let store = ScriptedStore::new();
    let (menu, notices) = loaded(&store, &["Momo", "Thukpa"]).await;
    let before = notices.lock().unwrap().len();

    let outcome = menu.swap(0, Direction::Up).await.unwrap();

    assert_eq!(outcome, MoveOutcome::Unchanged(NoOp::AtBoundary));
    assert_eq!(store.updates_started(), 0);
    assert_eq!(notices.lock().unwrap().len(), before);
}

#[tokio::test]
async fn partial_batch_failure_resyncs_once() {
    let store = ScriptedStore::new();
    let (menu, notices) = loaded(&store, &["Momo", "Thukpa", "Sel Roti"]).await;
    let thukpa = menu.items()[1].id.clone();
    store.fail_update_for(&thukpa);
    let lists_before = store.lists.load(std::sync::atomic::Ordering::SeqCst);

    // Diff is [Thukpa -> 0, Momo -> 1]; only Momo's write lands.
    let err = menu.swap(1, Direction::Up).await.unwrap_err();

    match err {
        SyncError::Store {
            operation,
            failed,
            resynced,
            source,
        } => {
            assert_eq!(operation, Operation::Reorder);
            assert_eq!(failed, 1);
            assert!(resynced);
            assert!(matches!(source, StoreError::Transport(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(failures(&notices), ["Failed to save order"]);
    assert_eq!(store.lists.load(std::sync::atomic::Ordering::SeqCst), lists_before + 1);

    // The listing is whatever the store now says, not the optimistic order.
    let stored: Vec<String> = store.stored_menu().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names(&menu.items()), stored);
    assert_eq!(names(&menu.items()), ["Momo", "Thukpa", "Sel Roti"]);
}

#[tokio::test]
async fn repair_restores_dense_positions_after_a_failure() {
    let store = ScriptedStore::new();
    let (menu, _) = loaded(&store, &["Momo", "Thukpa", "Sel Roti"]).await;
    let thukpa = menu.items()[1].id.clone();
    store.fail_update_for(&thukpa);
    menu.swap(1, Direction::Up).await.unwrap_err();
    store.heal();

    let writes = menu.repair().await.unwrap();

    assert_eq!(writes, 1);
    assert_eq!(store.stored_menu(), expected(&["Momo", "Thukpa", "Sel Roti"]));
}

#[tokio::test]
async fn failed_resync_restores_last_confirmed_order() {
    let store = ScriptedStore::new();
    let (menu, notices) = loaded(&store, &["Momo", "Thukpa", "Sel Roti"]).await;
    let momo = menu.items()[0].id.clone();
    store.fail_update_for(&momo);
    store.fail_next_lists(1);

    let err = menu.move_item(0, 2).await.unwrap_err();

    assert!(matches!(err, SyncError::Store { resynced: false, .. }));
    assert_eq!(names(&menu.items()), ["Momo", "Thukpa", "Sel Roti"]);
    assert_eq!(failures(&notices), ["Failed to save order"]);
}

#[tokio::test]
async fn requests_queue_behind_an_inflight_batch() {
    let store = ScriptedStore::gated();
    let (menu, _) = loaded(&store, &["Momo", "Thukpa", "Sel Roti", "Yomari"]).await;
    let menu = Arc::new(menu);

    let first = tokio::spawn({
        let menu = menu.clone();
        async move { menu.move_item(3, 0).await }
    });
    // All four writes are issued together while the gate is shut.
    settle(|| store.updates_started() == 4).await;
    assert_eq!(names(&menu.items()), ["Yomari", "Momo", "Thukpa", "Sel Roti"]);

    let second = tokio::spawn({
        let menu = menu.clone();
        async move { menu.swap(0, Direction::Down).await }
    });
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    assert_eq!(store.updates_started(), 4);
    assert_eq!(names(&menu.items()), ["Yomari", "Momo", "Thukpa", "Sel Roti"]);

    store.open_gate();
    assert_eq!(first.await.unwrap().unwrap(), MoveOutcome::Moved);
    assert_eq!(second.await.unwrap().unwrap(), MoveOutcome::Moved);

    // The swap was planned against the settled drag.
    assert_eq!(store.updates_started(), 6);
    assert_eq!(names(&menu.items()), ["Momo", "Yomari", "Thukpa", "Sel Roti"]);
    assert_eq!(
        store.stored_menu(),
        expected(&["Momo", "Yomari", "Thukpa", "Sel Roti"])
    );
}

#[tokio::test]
async fn dispatched_writes_finish_after_the_caller_is_gone() {
    let store = ScriptedStore::gated();
    let (menu, _) = loaded(&store, &["Momo", "Thukpa", "Sel Roti"]).await;
    let menu = Arc::new(menu);

    let caller = tokio::spawn({
        let menu = menu.clone();
        async move { menu.move_item(2, 0).await }
    });
    settle(|| store.updates_started() == 3).await;
    caller.abort();
    assert!(caller.await.unwrap_err().is_cancelled());

    store.open_gate();
    settle(|| store.stored_menu() == expected(&["Sel Roti", "Momo", "Thukpa"])).await;

    // The flight lock was released with the aborted caller.
    assert_eq!(menu.swap(0, Direction::Down).await.unwrap(), MoveOutcome::Moved);
}

#[tokio::test]
async fn create_appends_at_the_end() {
    let store = ScriptedStore::new();
    let (menu, notices) = loaded(&store, &["Momo", "Thukpa"]).await;

    let created = menu
        .create(&MenuItemDraft::new("Sel Roti", "₹60"))
        .await
        .unwrap();

    assert_eq!(created.sort_order, 2);
    assert!(created.active);
    assert_eq!(names(&menu.items()), ["Momo", "Thukpa", "Sel Roti"]);
    assert_eq!(store.stored_menu(), expected(&["Momo", "Thukpa", "Sel Roti"]));
    assert_eq!(
        notices.lock().unwrap().last(),
        Some(&Notice::success("Item added"))
    );
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_store() {
    let store = ScriptedStore::new();
    let (menu, notices) = loaded(&store, &["Momo"]).await;

    let mut draft = MenuItemDraft::new("Phaley", "₹90");
    draft.spice_level = 9;
    let err = menu.create(&draft).await.unwrap_err();

    assert!(matches!(err, SyncError::Validation(_)));
    assert_eq!(store.inner.rows("menu_items").len(), 1);
    assert_eq!(menu.len(), 1);
    assert_eq!(failures(&notices).len(), 1);
}

#[tokio::test]
async fn delete_closes_the_gap() {
    let store = ScriptedStore::new();
    let (menu, notices) = loaded(&store, &["Momo", "Thukpa", "Sel Roti", "Yomari"]).await;
    let thukpa = menu.items()[1].id.clone();

    menu.delete(&thukpa).await.unwrap();

    assert_eq!(names(&menu.items()), ["Momo", "Sel Roti", "Yomari"]);
    assert_eq!(store.stored_menu(), expected(&["Momo", "Sel Roti", "Yomari"]));
    // Only the two records after the gap were rewritten.
    assert_eq!(store.updates_started(), 2);
    assert_eq!(
        notices.lock().unwrap().last(),
        Some(&Notice::success("Item deleted"))
    );
}

#[tokio::test]
async fn failed_delete_leaves_the_listing_alone() {
    let store = ScriptedStore::new();
    let (menu, notices) = loaded(&store, &["Momo", "Thukpa"]).await;
    let momo = menu.items()[0].id.clone();
    store.fail_update_for(&momo);

    let err = menu.delete(&momo).await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(names(&menu.items()), ["Momo", "Thukpa"]);
    assert_eq!(failures(&notices), ["Failed to delete item"]);
}

#[tokio::test]
async fn failed_compaction_after_delete_is_a_reorder_failure() {
    let store = ScriptedStore::new();
    let (menu, notices) = loaded(&store, &["Momo", "Thukpa", "Sel Roti"]).await;
    let momo = menu.items()[0].id.clone();
    let sel_roti = menu.items()[2].id.clone();
    store.fail_update_for(&sel_roti);

    let err = menu.delete(&momo).await.unwrap_err();

    // The row is gone; only the renumbering is retryable.
    assert!(matches!(
        err,
        SyncError::Store {
            operation: Operation::Reorder,
            failed: 1,
            resynced: true,
            ..
        }
    ));
    assert_eq!(failures(&notices), ["Failed to save order"]);
    assert_eq!(names(&menu.items()), ["Thukpa", "Sel Roti"]);
    assert!(menu.get(&momo).is_none());

    store.heal();
    assert_eq!(menu.repair().await.unwrap(), 1);
    assert_eq!(store.stored_menu(), expected(&["Thukpa", "Sel Roti"]));
    assert_eq!(failures(&notices).len(), 1);
}

#[tokio::test]
async fn edit_survives_a_reorder_that_falls_back() {
    let store = ScriptedStore::gated();
    let (menu, notices) = loaded(&store, &["Momo", "Thukpa", "Sel Roti"]).await;
    let menu = Arc::new(menu);
    let momo = menu.items()[0].id.clone();
    let thukpa = menu.items()[1].id.clone();
    store.fail_update_for(&momo);

    let drag = tokio::spawn({
        let menu = menu.clone();
        async move { menu.move_item(0, 2).await }
    });
    settle(|| store.updates_started() == 3).await;

    // Field edits are not gated; this one lands while the drag is pending.
    let edit = tokio::spawn({
        let menu = menu.clone();
        let thukpa = thukpa.clone();
        async move {
            let patch = MenuItemPatch {
                price: Some("₹175".into()),
                ..Default::default()
            };
            menu.update(&thukpa, &patch).await
        }
    });
    settle(|| store.updates_started() == 4).await;

    // The drag's resync fails too, so it restores its pre-drag snapshot.
    store.fail_next_lists(1);
    store.open_gate();

    assert!(matches!(
        drag.await.unwrap(),
        Err(SyncError::Store { resynced: false, .. })
    ));
    let edited = edit.await.unwrap().unwrap();

    assert_eq!(edited.price, "₹175");
    assert_eq!(names(&menu.items()), ["Momo", "Thukpa", "Sel Roti"]);
    assert_eq!(menu.get(&thukpa).unwrap().price, "₹175");
    assert_eq!(failures(&notices), ["Failed to save order"]);
}

#[tokio::test]
async fn update_never_sends_position() {
    let store = ScriptedStore::new();
    let (menu, _) = loaded(&store, &["Momo", "Thukpa"]).await;
    let thukpa = menu.items()[1].id.clone();

    let patch = MenuItemPatch {
        price: Some("₹140".into()),
        spice_level: Some(4),
        ..Default::default()
    };
    let updated = menu.update(&thukpa, &patch).await.unwrap();

    assert_eq!(updated.price, "₹140");
    assert_eq!(updated.spice_level, 4);
    assert_eq!(updated.sort_order, 1);
    assert_eq!(menu.get(&thukpa), Some(updated));
    assert_eq!(store.stored_menu(), expected(&["Momo", "Thukpa"]));
}

#[tokio::test]
async fn toggle_failure_reverts_to_the_store_value() {
    let store = ScriptedStore::new();
    let (menu, notices) = loaded(&store, &["Momo", "Thukpa"]).await;
    let momo = menu.items()[0].id.clone();

    assert!(!menu.toggle_active(&momo).await.unwrap());
    assert!(!menu.get(&momo).unwrap().active);

    store.fail_update_for(&momo);
    let err = menu.toggle_active(&momo).await.unwrap_err();

    assert!(matches!(
        err,
        SyncError::Store {
            operation: Operation::Toggle,
            resynced: true,
            ..
        }
    ));
    assert!(!menu.get(&momo).unwrap().active);
    assert_eq!(failures(&notices), ["Failed to update item"]);
}

#[cfg(feature = "emitter")]
#[tokio::test]
async fn emitter_notifier_receives_notices() {
    use menu_admin::{EmitterNotifier, EventEmitter};
    use std::sync::mpsc;
    use std::time::Duration;

    let store = ScriptedStore::new();
    seed_menu(&store, &["Momo", "Thukpa"]).await;

    let (tx, rx) = mpsc::channel::<String>();
    let mut emitter = EventEmitter::new();
    emitter.on("success", move |message: String| {
        let _ = tx.send(message);
    });
    let menu: Menu<EmitterNotifier> = OrderedCollection::new(Arc::new(store.clone()))
        .with_notifier(EmitterNotifier::new(emitter));
    menu.load().await.unwrap();

    menu.swap(0, Direction::Down).await.unwrap();

    let message = rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(message, "Order updated");
}

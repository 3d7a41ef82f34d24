#[path = "../support/mod.rs"]
mod support;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use menu_admin::{
    live_announcements, Announcement, AnnouncementDraft, ChangeKind, ContactMessage,
    ContactMessageDraft, InMemoryRecordStore, LiveCollection, LogNotifier, Notice, OrderBy,
    ReadFlag, RecordsExt, SyncError,
};
use support::ScriptedStore;
use tokio::time::timeout;

fn message(name: &str) -> ContactMessageDraft {
    ContactMessageDraft {
        name: name.into(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "9800000000".into(),
        message: "Is the momo stall open on Saturday?".into(),
    }
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

async fn next(inbox: &LiveCollection<InMemoryRecordStore, ContactMessage>) -> ChangeKind {
    timeout(Duration::from_secs(1), inbox.next_change())
        .await
        .expect("change feed stalled")
        .unwrap()
        .expect("change feed closed")
}

#[tokio::test]
async fn inbox_relists_on_every_change() {
    let store = Arc::new(InMemoryRecordStore::new());
    let inbox: LiveCollection<_, ContactMessage> =
        LiveCollection::new(store.clone(), OrderBy::asc("name"));
    inbox.refresh().await.unwrap();
    assert!(inbox.is_empty());

    // A visitor submits the public form.
    store
        .records::<ContactMessage>()
        .create(&message("Bikash"))
        .await
        .unwrap();
    assert_eq!(next(&inbox).await, ChangeKind::Insert);
    assert_eq!(inbox.len(), 1);

    inbox.create(&message("Asha")).await.unwrap();
    assert_eq!(next(&inbox).await, ChangeKind::Insert);
    let names: Vec<String> = inbox.items().into_iter().map(|m| m.name).collect();
    assert_eq!(names, ["Asha", "Bikash"]);

    let asha = inbox.items()[0].id.clone();
    inbox.set_fields(&asha, &ReadFlag { read: true }).await.unwrap();
    assert_eq!(next(&inbox).await, ChangeKind::Update);
    assert!(inbox.items()[0].is_read());
    assert!(!inbox.items()[1].is_read());

    inbox.delete(&asha).await.unwrap();
    assert_eq!(next(&inbox).await, ChangeKind::Delete);
    assert_eq!(inbox.len(), 1);
}

#[tokio::test]
async fn other_collections_do_not_wake_the_inbox() {
    let store = Arc::new(InMemoryRecordStore::new());
    let inbox: LiveCollection<_, ContactMessage> =
        LiveCollection::new(store.clone(), OrderBy::asc("name"));

    store
        .records::<Announcement>()
        .create(&AnnouncementDraft {
            title: "Dashain".into(),
            message: "Closed for the festival".into(),
            start_date: Some(date("2026-10-01")),
            end_date: Some(date("2026-10-05")),
        })
        .await
        .unwrap();

    let waited = timeout(Duration::from_millis(50), inbox.next_change()).await;
    assert!(waited.is_err());
}

#[tokio::test]
async fn invalid_message_is_rejected_before_the_store() {
    let store = Arc::new(InMemoryRecordStore::new());
    let inbox: LiveCollection<_, ContactMessage> =
        LiveCollection::new(store.clone(), OrderBy::asc("name"));

    let mut draft = message("Asha");
    draft.email = "asha-at-example".into();
    let err = inbox.create(&draft).await.unwrap_err();

    assert!(matches!(err, SyncError::Validation(_)));
    assert!(store.rows("contact_messages").is_empty());
}

#[tokio::test]
async fn banner_shows_only_live_announcements() {
    let store = Arc::new(InMemoryRecordStore::new());
    let board: LiveCollection<_, Announcement> =
        LiveCollection::new(store.clone(), OrderBy::asc("start_date"));

    for (title, start, end) in [
        ("Tihar hours", "2026-10-15", "2026-10-20"),
        ("Summer menu", "2026-06-01", "2026-08-31"),
        ("New branch", "2026-10-17", "2026-12-31"),
    ] {
        board
            .create(&AnnouncementDraft {
                title: title.into(),
                message: "See you there".into(),
                start_date: Some(date(start)),
                end_date: Some(date(end)),
            })
            .await
            .unwrap();
    }
    board.refresh().await.unwrap();
    assert_eq!(board.len(), 3);

    let today = date("2026-10-17");
    let live: Vec<String> = live_announcements(&board.items(), today)
        .into_iter()
        .map(|a| a.title)
        .collect();
    assert_eq!(live, ["Tihar hours", "New branch"]);
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

#[tokio::test]
async fn follow_relists_until_the_feed_closes() {
    let store = ScriptedStore::new();
    let notices = Arc::new(Mutex::new(Vec::new()));
    let inbox = Arc::new(
        LiveCollection::<_, ContactMessage>::new(Arc::new(store.clone()), OrderBy::asc("name"))
            .with_notifier(LogNotifier::with_buffer(notices.clone())),
    );

    let follower = tokio::spawn({
        let inbox = inbox.clone();
        async move { inbox.follow().await }
    });

    // The first re-list fails; the follower carries on with the next event.
    store.fail_next_lists(1);
    let messages = store.records::<ContactMessage>();
    messages.create(&message("Bikash")).await.unwrap();
    messages.create(&message("Asha")).await.unwrap();
    store.close_feed();

    timeout(Duration::from_secs(1), follower)
        .await
        .expect("follow did not stop after the feed closed")
        .unwrap();

    let names: Vec<String> = inbox.items().into_iter().map(|m| m.name).collect();
    assert_eq!(names, ["Asha", "Bikash"]);
    assert_eq!(failures(&notices), ["Failed to load messages"]);
}

#[tokio::test]
async fn each_operation_reports_one_notice() {
    let store = ScriptedStore::new();
    let notices = Arc::new(Mutex::new(Vec::new()));
    let inbox = LiveCollection::<_, ContactMessage>::new(Arc::new(store.clone()), OrderBy::asc("name"))
        .with_notifier(LogNotifier::with_buffer(notices.clone()));

    let asha = inbox.create(&message("Asha")).await.unwrap();
    inbox.set_fields(&asha.id, &ReadFlag { read: true }).await.unwrap();

    let mut invalid = message("Bikash");
    invalid.phone = " ".into();
    assert!(matches!(
        inbox.create(&invalid).await,
        Err(SyncError::Validation(_))
    ));

    store.fail_update_for(&asha.id);
    assert!(inbox.delete(&asha.id).await.unwrap_err().is_retryable());
    store.heal();
    inbox.delete(&asha.id).await.unwrap();

    store.fail_next_lists(1);
    assert!(inbox.refresh().await.is_err());

    let seen: Vec<Notice> = notices.lock().unwrap().clone();
    assert_eq!(
        seen,
        [
            Notice::success("Message added"),
            Notice::success("Message updated"),
            Notice::failure("phone is required"),
            Notice::failure("Failed to delete message"),
            Notice::success("Message deleted"),
            Notice::failure("Failed to load messages"),
        ]
    );
}

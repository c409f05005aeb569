use std::thread::sleep;
use std::time::Duration;

use genie_store::{ChatUpdate, Database};
use tempfile::TempDir;

fn open_test_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db = Database::open_at(&dir.path().join("test.db")).unwrap();
    (dir, db)
}

#[test]
fn test_create_user_is_idempotent() {
    let (_dir, db) = open_test_db();

    db.create_user("u1").unwrap();
    db.set_assistant_id("u1", "asst_1").unwrap();

    // Re-creating must not wipe the cached persona id.
    db.create_user("u1").unwrap();
    assert_eq!(db.assistant_id_for_user("u1").unwrap().as_deref(), Some("asst_1"));
}

#[test]
fn test_assistant_id_roundtrip() {
    let (_dir, db) = open_test_db();

    db.create_user("u1").unwrap();
    assert_eq!(db.assistant_id_for_user("u1").unwrap(), None);

    db.set_assistant_id("u1", "asst_old").unwrap();
    db.set_assistant_id("u1", "asst_new").unwrap();
    assert_eq!(
        db.assistant_id_for_user("u1").unwrap().as_deref(),
        Some("asst_new")
    );

    // Unknown user: no row, no id.
    assert_eq!(db.assistant_id_for_user("missing").unwrap(), None);
}

#[test]
fn test_update_title_leaves_thread_id_unchanged() {
    let (_dir, db) = open_test_db();

    db.create_user("u1").unwrap();
    db.create_chat("c1", "u1", "untitled").unwrap();
    db.update_chat("c1", ChatUpdate::new().thread_id("thread_abc"))
        .unwrap();

    db.update_chat("c1", ChatUpdate::new().title("renamed")).unwrap();

    let chat = db.get_chat("c1").unwrap().unwrap();
    assert_eq!(chat.title, "renamed");
    assert_eq!(chat.thread_id.as_deref(), Some("thread_abc"));
}

#[test]
fn test_update_thread_id_leaves_title_unchanged() {
    let (_dir, db) = open_test_db();

    db.create_user("u1").unwrap();
    db.create_chat("c1", "u1", "my title").unwrap();

    db.update_chat("c1", ChatUpdate::new().thread_id("thread_abc"))
        .unwrap();

    let chat = db.get_chat("c1").unwrap().unwrap();
    assert_eq!(chat.title, "my title");
    assert_eq!(chat.thread_id.as_deref(), Some("thread_abc"));
}

#[test]
fn test_empty_update_is_a_noop() {
    let (_dir, db) = open_test_db();

    db.create_user("u1").unwrap();
    db.create_chat("c1", "u1", "t").unwrap();
    let before = db.get_chat("c1").unwrap().unwrap();

    sleep(Duration::from_millis(5));
    db.update_chat("c1", ChatUpdate::new()).unwrap();

    let after = db.get_chat("c1").unwrap().unwrap();
    assert_eq!(before.updated_at, after.updated_at);
}

#[test]
fn test_update_bumps_updated_at() {
    let (_dir, db) = open_test_db();

    db.create_user("u1").unwrap();
    db.create_chat("c1", "u1", "t").unwrap();
    let before = db.get_chat("c1").unwrap().unwrap();

    sleep(Duration::from_millis(5));
    db.update_chat("c1", ChatUpdate::new().title("t2")).unwrap();

    let after = db.get_chat("c1").unwrap().unwrap();
    assert!(after.updated_at > before.updated_at);
}

#[test]
fn test_list_chats_orders_by_most_recent_update() {
    let (_dir, db) = open_test_db();

    db.create_user("u1").unwrap();
    db.create_chat("older", "u1", "first").unwrap();
    sleep(Duration::from_millis(5));
    db.create_chat("newer", "u1", "second").unwrap();

    let chats = db.list_chats_for_user("u1").unwrap();
    assert_eq!(chats[0].id, "newer");
    assert_eq!(chats[1].id, "older");

    // Updating the older chat moves it to the front.
    sleep(Duration::from_millis(5));
    db.update_chat("older", ChatUpdate::new().title("bumped")).unwrap();

    let chats = db.list_chats_for_user("u1").unwrap();
    assert_eq!(chats[0].id, "older");
    assert_eq!(chats[1].id, "newer");
}

#[test]
fn test_touch_chat_reorders_listing() {
    let (_dir, db) = open_test_db();

    db.create_user("u1").unwrap();
    db.create_chat("a", "u1", "a").unwrap();
    sleep(Duration::from_millis(5));
    db.create_chat("b", "u1", "b").unwrap();
    sleep(Duration::from_millis(5));

    db.touch_chat("a").unwrap();
    let chats = db.list_chats_for_user("u1").unwrap();
    assert_eq!(chats[0].id, "a");
}

#[test]
fn test_delete_chat_keeps_user_row() {
    let (_dir, db) = open_test_db();

    db.create_user("u1").unwrap();
    db.create_chat("c1", "u1", "t").unwrap();
    db.create_chat("c2", "u1", "t").unwrap();

    assert!(db.delete_chat("c1").unwrap());
    assert!(!db.delete_chat("c1").unwrap());

    let chats = db.list_chats_for_user("u1").unwrap();
    assert_eq!(chats.len(), 1);
    assert_eq!(chats[0].id, "c2");

    assert!(db.get_user("u1").unwrap().is_some());
}

#[test]
fn test_chats_are_scoped_to_their_user() {
    let (_dir, db) = open_test_db();

    db.create_user("u1").unwrap();
    db.create_user("u2").unwrap();
    db.create_chat("c1", "u1", "t").unwrap();
    db.create_chat("c2", "u2", "t").unwrap();

    let chats = db.list_chats_for_user("u1").unwrap();
    assert_eq!(chats.len(), 1);
    assert_eq!(chats[0].id, "c1");
}

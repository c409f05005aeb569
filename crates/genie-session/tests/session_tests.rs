use std::sync::Arc;
use std::time::Duration;

use genie_assistant::stub::StubAssistantApi;
use genie_assistant::types::RunStatus;
use genie_assistant::{AssistantConfig, AssistantService};
use genie_session::{delete_chat, init_session, new_chat, send_prompt};
use genie_store::Database;
use tempfile::TempDir;

fn fast_config() -> AssistantConfig {
    AssistantConfig::new()
        .poll_interval(Duration::ZERO)
        .run_timeout(Duration::from_secs(5))
        .persona_retry_backoff(Duration::ZERO)
}

fn setup(stub: StubAssistantApi) -> (TempDir, Database, Arc<StubAssistantApi>, AssistantService) {
    let dir = TempDir::new().unwrap();
    let db = Database::open_at(&dir.path().join("test.db")).unwrap();
    let api = Arc::new(stub);
    let svc = AssistantService::new(api.clone(), fast_config());
    (dir, db, api, svc)
}

#[tokio::test]
async fn test_init_session_creates_user_and_starts_empty() {
    let (_dir, db, _api, svc) = setup(StubAssistantApi::new());

    let ctx = init_session(&db, &svc, "u1").await.unwrap();

    assert_eq!(ctx.user_id, "u1");
    assert!(ctx.current_chat.is_none());
    assert!(ctx.transcript.is_empty());
    assert!(db.get_user("u1").unwrap().is_some());
}

#[tokio::test]
async fn test_first_prompt_creates_chat_thread_and_title() {
    let stub = StubAssistantApi::new().with_reply("Hi! How can I help?");
    let (_dir, db, api, svc) = setup(stub);

    let ctx = init_session(&db, &svc, "u1").await.unwrap();
    let ctx = send_prompt(&db, &svc, &ctx, "Hello genie").await.unwrap();

    let chat_id = ctx.current_chat.clone().expect("chat selected");
    let chat = db.get_chat(&chat_id).unwrap().unwrap();

    // Thread created exactly once, id persisted, title echoes the prompt.
    assert_eq!(api.counts().create_thread, 1);
    assert!(chat.thread_id.is_some());
    assert_eq!(chat.title, "Hello genie");
    assert_eq!(ctx.transcript.len(), 2);
}

#[tokio::test]
async fn test_long_first_prompt_title_is_truncated() {
    let stub = StubAssistantApi::new().with_reply("ok");
    let (_dir, db, _api, svc) = setup(stub);

    let ctx = init_session(&db, &svc, "u1").await.unwrap();
    let prompt = "Please draft a very long viral post about morning routines";
    let ctx = send_prompt(&db, &svc, &ctx, prompt).await.unwrap();

    let chat = db
        .get_chat(ctx.current_chat.as_deref().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(chat.title.chars().count(), 30);
    assert!(chat.title.ends_with("..."));
}

#[tokio::test]
async fn test_thread_id_is_created_once_and_reused() {
    let stub = StubAssistantApi::new().with_reply("reply");
    let (_dir, db, api, svc) = setup(stub);

    let ctx = init_session(&db, &svc, "u1").await.unwrap();
    let ctx = send_prompt(&db, &svc, &ctx, "first").await.unwrap();
    let chat_id = ctx.current_chat.clone().unwrap();
    let thread_after_first = db.get_chat(&chat_id).unwrap().unwrap().thread_id;

    let ctx = send_prompt(&db, &svc, &ctx, "second").await.unwrap();
    let thread_after_second = db.get_chat(&chat_id).unwrap().unwrap().thread_id;

    assert_eq!(api.counts().create_thread, 1);
    assert_eq!(thread_after_first, thread_after_second);
    assert!(ctx.current_chat.is_some());
}

#[tokio::test]
async fn test_second_prompt_keeps_first_message_title() {
    let stub = StubAssistantApi::new().with_reply("reply");
    let (_dir, db, _api, svc) = setup(stub);

    let ctx = init_session(&db, &svc, "u1").await.unwrap();
    let ctx = send_prompt(&db, &svc, &ctx, "short title").await.unwrap();
    let ctx = send_prompt(&db, &svc, &ctx, "something else entirely").await.unwrap();

    let chat = db
        .get_chat(ctx.current_chat.as_deref().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(chat.title, "short title");
}

#[tokio::test]
async fn test_failed_turn_surfaces_in_band_reply() {
    let stub = StubAssistantApi::new().push_run(StubAssistantApi::run(RunStatus::Failed));
    let (_dir, db, _api, svc) = setup(stub);

    let ctx = init_session(&db, &svc, "u1").await.unwrap();
    let ctx = send_prompt(&db, &svc, &ctx, "hello").await.unwrap();

    let last = ctx.transcript.last().expect("in-band reply present");
    assert!(last.text().contains("error processing your request"));
}

#[tokio::test]
async fn test_delete_selected_chat_clears_selection() {
    let stub = StubAssistantApi::new().with_reply("reply");
    let (_dir, db, _api, svc) = setup(stub);

    let ctx = init_session(&db, &svc, "u1").await.unwrap();
    let ctx = send_prompt(&db, &svc, &ctx, "hello").await.unwrap();
    let chat_id = ctx.current_chat.clone().unwrap();

    let ctx = delete_chat(&db, &ctx, &chat_id).unwrap();

    assert!(ctx.current_chat.is_none());
    assert!(ctx.transcript.is_empty());
    assert!(db.list_chats_for_user("u1").unwrap().is_empty());
    assert!(db.get_user("u1").unwrap().is_some());
}

#[tokio::test]
async fn test_delete_other_chat_keeps_selection() {
    let (_dir, db, _api, svc) = setup(StubAssistantApi::new());

    let ctx = init_session(&db, &svc, "u1").await.unwrap();
    let ctx = new_chat(&db, &ctx).unwrap();
    let first = ctx.current_chat.clone().unwrap();
    let ctx = new_chat(&db, &ctx).unwrap();
    let second = ctx.current_chat.clone().unwrap();

    let ctx = delete_chat(&db, &ctx, &first).unwrap();

    assert_eq!(ctx.current_chat.as_deref(), Some(second.as_str()));
    let remaining = db.list_chats_for_user("u1").unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second);
}

#[tokio::test]
async fn test_init_session_restores_most_recent_chat() {
    let stub = StubAssistantApi::new().with_reply("reply");
    let (_dir, db, _api, svc) = setup(stub);

    let ctx = init_session(&db, &svc, "u1").await.unwrap();
    let ctx = send_prompt(&db, &svc, &ctx, "hello").await.unwrap();
    let chat_id = ctx.current_chat.clone().unwrap();

    // A fresh session picks up where the last one left off.
    let restored = init_session(&db, &svc, "u1").await.unwrap();
    assert_eq!(restored.current_chat.as_deref(), Some(chat_id.as_str()));
    assert!(!restored.transcript.is_empty());
}

#[tokio::test]
async fn test_uploaded_files_are_remembered() {
    let stub = StubAssistantApi::new().with_reply("done");
    let (_dir, db, _api, svc) = setup(stub);
    let file_dir = TempDir::new().unwrap();
    let path = file_dir.path().join("data.csv");
    std::fs::write(&path, "a,b\n1,2\n").unwrap();

    let ctx = init_session(&db, &svc, "u1").await.unwrap();
    let ctx = genie_session::upload_file(&svc, &ctx, &path).await.unwrap();

    assert_eq!(ctx.uploaded_files.len(), 1);
    assert!(ctx.notice.as_deref().unwrap_or("").contains("Uploaded"));
}

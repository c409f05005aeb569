//! Interaction handlers. One handler per UI event; each takes the current
//! context snapshot and returns the next one.
//!
//! Failure policy mirrors the rest of the system: store errors propagate
//! (fatal to the interaction), persona/thread creation and history
//! listing failures become notices, and turn failures become in-band
//! reply text.

use anyhow::{anyhow, Result};

use genie_assistant::{AssistantService, Turn, TurnOutcome};
use genie_store::{ChatUpdate, Database};

use crate::context::{short_id, SessionContext};
use crate::title::{default_title, derive_title};

/// Start a session: ensure the user row exists and restore the most
/// recently updated chat.
pub async fn init_session(
    db: &Database,
    svc: &AssistantService,
    user_id: &str,
) -> Result<SessionContext> {
    db.create_user(user_id)?;

    let ctx = SessionContext::new(user_id);
    match db.list_chats_for_user(user_id)?.into_iter().next() {
        Some(last) => load_chat(db, svc, ctx, &last.id).await,
        None => Ok(ctx),
    }
}

/// Create a new chat with a timestamp title and select it.
pub fn new_chat(db: &Database, ctx: &SessionContext) -> Result<SessionContext> {
    let chat_id = short_id();
    db.create_chat(&chat_id, &ctx.user_id, &default_title())?;

    let mut next = ctx.clone().without_notice();
    next.current_chat = Some(chat_id);
    next.transcript = Vec::new();
    Ok(next)
}

/// Select a chat and load its transcript from the remote thread.
pub async fn select_chat(
    db: &Database,
    svc: &AssistantService,
    ctx: &SessionContext,
    chat_id: &str,
) -> Result<SessionContext> {
    load_chat(db, svc, ctx.clone().without_notice(), chat_id).await
}

/// Delete a chat. Deleting the selected chat clears the selection; the
/// user row is never deleted.
pub fn delete_chat(db: &Database, ctx: &SessionContext, chat_id: &str) -> Result<SessionContext> {
    db.delete_chat(chat_id)?;

    let mut next = ctx.clone().without_notice();
    if next.current_chat.as_deref() == Some(chat_id) {
        next.current_chat = None;
        next.transcript = Vec::new();
    }
    Ok(next)
}

/// Send a prompt to the selected chat (creating one if none is selected)
/// and block until the turn settles.
///
/// The remote thread is created lazily on the first message; its id is
/// written once and reused. The first message also overwrites the default
/// title with a truncated echo of itself.
pub async fn send_prompt(
    db: &Database,
    svc: &AssistantService,
    ctx: &SessionContext,
    text: &str,
) -> Result<SessionContext> {
    let mut next = match ctx.current_chat {
        Some(_) => ctx.clone().without_notice(),
        None => new_chat(db, ctx)?,
    };
    let chat_id = next
        .current_chat
        .clone()
        .ok_or_else(|| anyhow!("no chat selected after creation"))?;
    let chat = db
        .get_chat(&chat_id)?
        .ok_or_else(|| anyhow!("chat {} not found", chat_id))?;

    let assistant_id = match svc.get_or_create_assistant(db, &next.user_id).await {
        Ok(id) => id,
        Err(err) => {
            tracing::error!(error = %err, "could not resolve persona");
            return Ok(next.with_notice(format!("Error creating assistant: {}", err)));
        }
    };

    let (thread_id, first_message) = match chat.thread_id {
        Some(thread_id) => (thread_id, false),
        None => match svc.create_thread().await {
            Ok(thread) => {
                db.update_chat(&chat_id, ChatUpdate::new().thread_id(&thread.id))?;
                (thread.id, true)
            }
            Err(err) => {
                tracing::error!(error = %err, "could not create thread");
                return Ok(next.with_notice(format!("Error creating thread: {}", err)));
            }
        },
    };

    if first_message {
        db.update_chat(&chat_id, ChatUpdate::new().title(derive_title(text)))?;
    }

    // Blocks the session for the duration of the poll loop.
    let outcome = svc
        .send_message(&thread_id, &assistant_id, text, &next.uploaded_files)
        .await;

    let (completed, reply) = match outcome {
        Ok(TurnOutcome::Completed(reply)) => (true, reply),
        Ok(other) => (false, other.into_reply()),
        Err(err) => (
            false,
            format!(
                "I apologize, but I encountered an error: {}. Please try again.",
                err
            ),
        ),
    };

    match svc.get_thread_messages(&thread_id).await {
        Ok(turns) => {
            next.transcript = turns;
            // Failed and timed-out turns leave no assistant message on the
            // remote thread; surface the in-band reply locally.
            if !completed {
                next.transcript.push(Turn::assistant_text(reply));
            }
        }
        Err(err) => {
            next.transcript.push(Turn::user_text(text));
            next.transcript.push(Turn::assistant_text(reply));
            next.notice = Some(format!("Error retrieving messages: {}", err));
        }
    }

    db.touch_chat(&chat_id)?;
    Ok(next)
}

/// Upload a file for the code-execution tool; subsequent prompts attach
/// the accumulated file set.
pub async fn upload_file(
    svc: &AssistantService,
    ctx: &SessionContext,
    path: &std::path::Path,
) -> Result<SessionContext> {
    let mut next = ctx.clone().without_notice();
    match svc.upload_file(path).await {
        Ok(file) => {
            next.notice = Some(format!("Uploaded file {}", file.id));
            next.uploaded_files.push(file.id);
        }
        Err(err) => {
            tracing::error!(error = %err, "file upload failed");
            next.notice = Some(format!("Error uploading file: {}", err));
        }
    }
    Ok(next)
}

/// Load a chat's transcript. A chat with no thread yet renders empty; a
/// listing failure renders empty with a notice.
async fn load_chat(
    db: &Database,
    svc: &AssistantService,
    ctx: SessionContext,
    chat_id: &str,
) -> Result<SessionContext> {
    let chat = db
        .get_chat(chat_id)?
        .ok_or_else(|| anyhow!("chat {} not found", chat_id))?;

    let mut next = ctx;
    next.current_chat = Some(chat.id.clone());
    next.transcript = Vec::new();

    if let Some(thread_id) = chat.thread_id {
        match svc.get_thread_messages(&thread_id).await {
            Ok(turns) => next.transcript = turns,
            Err(err) => {
                tracing::error!(error = %err, "could not load thread history");
                next.notice = Some(format!("Error retrieving messages: {}", err));
            }
        }
    }
    Ok(next)
}

//! Terminal driver: renders the sidebar and transcript, forwards events
//! to the session handlers. All logic lives in the library crates.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use genie_assistant::{AssistantConfig, AssistantService, HttpAssistantApi, Role, Turn};
use genie_session::{
    delete_chat, init_session, new_chat, select_chat, send_prompt, upload_file, SessionContext,
};
use genie_store::Database;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY environment variable is required")?;
    let user_id = std::env::var("GENIE_USER").unwrap_or_else(|_| "local".to_string());

    let db = Database::open_default()?;
    let api = Arc::new(HttpAssistantApi::new(api_key)?);
    let svc = AssistantService::new(api, AssistantConfig::default());

    let mut ctx = init_session(&db, &svc, &user_id).await?;

    println!("genie - type a message, or /help for commands");
    render(&db, &ctx)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt_marker().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        ctx = match handle_line(&db, &svc, ctx, &line).await? {
            Some(next) => next,
            None => break,
        };
        render(&db, &ctx)?;
    }

    Ok(())
}

/// Dispatch one line of input. Returns `None` on quit.
async fn handle_line(
    db: &Database,
    svc: &AssistantService,
    ctx: SessionContext,
    line: &str,
) -> Result<Option<SessionContext>> {
    let next = match line.split_once(' ') {
        _ if line == "/quit" || line == "/exit" => return Ok(None),
        _ if line == "/help" => {
            print_help();
            ctx
        }
        _ if line == "/new" => new_chat(db, &ctx)?,
        _ if line == "/list" => ctx,
        Some(("/open", arg)) => match nth_chat(db, &ctx, arg)? {
            Some(chat_id) => select_chat(db, svc, &ctx, &chat_id).await?,
            None => ctx,
        },
        Some(("/delete", arg)) => match nth_chat(db, &ctx, arg)? {
            Some(chat_id) => delete_chat(db, &ctx, &chat_id)?,
            None => ctx,
        },
        Some(("/upload", arg)) => upload_file(svc, &ctx, Path::new(arg.trim())).await?,
        _ if line.starts_with('/') => {
            println!("unknown command: {}", line);
            ctx
        }
        _ => send_prompt(db, svc, &ctx, line).await?,
    };
    Ok(Some(next))
}

/// Resolve a 1-based sidebar index to a chat id.
fn nth_chat(db: &Database, ctx: &SessionContext, arg: &str) -> Result<Option<String>> {
    let chats = db.list_chats_for_user(&ctx.user_id)?;
    let index: usize = match arg.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= chats.len() => n - 1,
        _ => {
            println!("no such chat: {}", arg.trim());
            return Ok(None);
        }
    };
    Ok(Some(chats[index].id.clone()))
}

/// Render the sidebar and the current transcript.
fn render(db: &Database, ctx: &SessionContext) -> Result<()> {
    if let Some(notice) = &ctx.notice {
        println!("! {}", notice);
    }

    let chats = db.list_chats_for_user(&ctx.user_id)?;
    if !chats.is_empty() {
        println!("-- chats --");
        for (i, chat) in chats.iter().enumerate() {
            let marker = if ctx.current_chat.as_deref() == Some(chat.id.as_str()) {
                "*"
            } else {
                " "
            };
            println!("{} {:>2}. {}", marker, i + 1, chat.title);
        }
    }

    if !ctx.transcript.is_empty() {
        println!("-- transcript --");
        for turn in &ctx.transcript {
            print_turn(turn);
        }
    }
    Ok(())
}

fn print_turn(turn: &Turn) {
    let speaker = match turn.role {
        Role::User => "you",
        Role::Assistant => "genie",
    };
    println!("{}: {}", speaker, turn.text());
    for image in turn.image_refs() {
        println!("{}: [image] {}", speaker, image);
    }
}

fn print_help() {
    println!("/new           start a new chat");
    println!("/list          show the chat list");
    println!("/open <n>      switch to chat n");
    println!("/delete <n>    delete chat n");
    println!("/upload <path> upload a file for code execution");
    println!("/quit          exit");
    println!("anything else is sent as a message");
}

async fn prompt_marker() -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;
    Ok(())
}

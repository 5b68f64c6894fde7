//! Chat command handler.
//!
//! Runs an interactive conversation with a hosted text-generation model,
//! printing the answer as it streams in.

use std::io::{self, Write};

use anyhow::Result;
use modelhub_core::chat::model_names;
use modelhub_core::{ChatError, ChatSession, SamplingParams};

use super::Prompt;
use crate::bootstrap::CliContext;
use crate::commands::ChatArgs;
use crate::error::CliError;

const HELP: &str = "\
Commands:
  /clear        start a new conversation
  /key <key>    save a new API key
  /quit         leave";

/// Apply the command-line overrides to the session defaults.
fn apply_overrides(mut params: SamplingParams, args: &ChatArgs) -> SamplingParams {
    if let Some(temperature) = args.temperature {
        params.temperature = temperature;
    }
    if let Some(top_p) = args.top_p {
        params.top_p = top_p;
    }
    if let Some(max_tokens) = args.max_tokens {
        params.max_tokens = max_tokens;
    }
    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    params
}

/// Execute the chat command.
pub async fn execute(ctx: &CliContext, args: ChatArgs) -> Result<()> {
    if args.list_models {
        for name in model_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let mut session = ChatSession::new(ctx.chat(), ctx.store(), &args.model).map_err(CliError::from)?;
    if let Some(key) = args.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        session.set_api_key(key.trim()).map_err(CliError::from)?;
    }
    session.set_params(apply_overrides(*session.params(), &args));

    println!("Chatting with {} (/help for commands)", session.model_name());
    if session.api_key().is_empty() {
        println!("No API key saved yet; set one with /key <key>.");
    }

    let mut prompt = Prompt::new()?;
    while let Some(line) = prompt.read("you> ")? {
        match line.as_str() {
            "" => {}
            "/quit" | "/exit" => break,
            "/help" => println!("{HELP}"),
            "/clear" => {
                session.clear_history();
                println!("Conversation cleared.");
            }
            _ if line.starts_with("/key") => {
                let key = line.trim_start_matches("/key").trim();
                if key.is_empty() {
                    println!("Usage: /key <key>");
                } else {
                    session.set_api_key(key).map_err(CliError::from)?;
                    println!("API key saved.");
                }
            }
            text => send_turn(&mut session, text).await,
        }
    }
    Ok(())
}

async fn send_turn(session: &mut ChatSession, text: &str) {
    let mut stdout = io::stdout();
    let result = session
        .send(text, |delta| {
            let _ = write!(stdout, "{delta}");
            let _ = stdout.flush();
        })
        .await;

    match result {
        Ok(_) => println!(),
        Err(ChatError::MissingApiKey) => {
            println!("An API key is required; set one with /key <key>.");
        }
        Err(ChatError::ApiKeyRejected) => {
            println!();
            println!("API key is wrong; set another with /key <key>.");
        }
        Err(err) => {
            println!();
            eprintln!("Error: {err}");
        }
    }
}

//! Interactive chat loop.
//!
//! Plain lines are questions; slash commands map onto controller
//! operations. The prompt only returns after a submission fully resolves,
//! so a second question cannot overtake the one in flight.

use anyhow::Result;
use chrono::Utc;
use dormchat_core::session::ChatController;
use dormchat_core::view;
use dormchat_infrastructure::{AnswerClient, ClientConfig};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const HELP: &str = "\
commands: /new  /list  /switch <n>  /delete <n>  /clear  /help  /quit
anything else is sent to the chatbot as a question";

pub async fn run() -> Result<()> {
    let config = ClientConfig::load();
    let store = super::build_store(&config)?;
    let answers = Arc::new(AnswerClient::new(
        &config.base_url,
        Duration::from_secs(config.request_timeout_secs),
    ));

    let (reveal_tx, mut reveal_rx) = mpsc::unbounded_channel::<String>();
    // Redraws the answer line as each reveal frame arrives.
    let printer = tokio::spawn(async move {
        while let Some(frame) = reveal_rx.recv().await {
            print!("\r{}", view::render_partial(&frame));
            let _ = std::io::stdout().flush();
        }
    });

    let mut controller = ChatController::new(
        store,
        answers,
        Duration::from_millis(config.reveal_delay_ms),
        reveal_tx,
    );
    controller.load_chat_history().await?;

    println!("{HELP}\n");
    draw_transcript(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        match line.as_str() {
            "" => {}
            "/quit" | "/exit" => break,
            "/help" => println!("{HELP}"),
            "/new" => {
                controller.new_chat().await?;
                draw_transcript(&controller);
            }
            "/list" => draw_sidebar(&controller),
            "/clear" => {
                controller.delete_all_sessions().await?;
                println!("All sessions deleted.");
                draw_transcript(&controller);
            }
            _ if line.starts_with("/switch") => {
                if let Some(id) = pick(&controller, line.strip_prefix("/switch")) {
                    controller.switch_session(&id).await?;
                    draw_transcript(&controller);
                }
            }
            _ if line.starts_with("/delete") => {
                if let Some(id) = pick(&controller, line.strip_prefix("/delete")) {
                    controller.delete_session(&id).await?;
                    draw_sidebar(&controller);
                }
            }
            _ if line.starts_with('/') => println!("unknown command, try /help"),
            question => {
                controller.submit(question).await?;
                // Ends the line the reveal was drawing on.
                println!();
            }
        }
        prompt();
    }

    drop(controller);
    let _ = printer.await;
    Ok(())
}

fn prompt() {
    print!("you> ");
    let _ = std::io::stdout().flush();
}

/// Resolves a sidebar index argument to a session id.
fn pick(controller: &ChatController, arg: Option<&str>) -> Option<String> {
    let index: usize = match arg.map(str::trim).unwrap_or_default().parse() {
        Ok(index) => index,
        Err(_) => {
            println!("expected a session number, see /list");
            return None;
        }
    };
    match controller.summaries().get(index) {
        Some(summary) => Some(summary.id.clone()),
        None => {
            println!("no session [{index}], see /list");
            None
        }
    }
}

fn draw_sidebar(controller: &ChatController) {
    let rendered = view::render_sidebar(
        controller.summaries(),
        controller.active_session_id(),
        Utc::now(),
    );
    if rendered.is_empty() {
        println!("(no sessions)");
    } else {
        print!("{rendered}");
    }
}

fn draw_transcript(controller: &ChatController) {
    print!("{}", view::render_transcript(controller.transcript()));
}

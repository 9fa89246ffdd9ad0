//! `sitechat chat` — Interactive or single-message chat mode.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{self, AsyncBufReadExt, BufReader};

use sitechat_config::AppConfig;
use sitechat_core::{BotId, ChatMessage, Conversation};
use sitechat_knowledge::{KnowledgeStore, Responder};

/// Lines that end an interactive session.
fn is_exit_command(line: &str) -> bool {
    matches!(line, "exit" | "quit" | "/exit" | "/quit" | ":q")
}

pub async fn run(
    message: Option<String>,
    knowledge: Option<PathBuf>,
    source: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let snippets = super::resolve_snippets(&config, knowledge)?;
    let source_label = source.or_else(|| config.bot.source_label.clone());

    if snippets.is_empty() {
        eprintln!();
        eprintln!("  WARNING: No knowledge loaded — the bot can only greet.");
        eprintln!("  Pass a file with --knowledge <FILE> or set bot.knowledge_file in:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
    }

    let snippet_count = snippets.len();
    let store = Arc::new(KnowledgeStore::with_snippets(snippets, source_label.clone()));
    let responder = Responder::new(store)
        .with_delay(Duration::from_millis(config.bot.response_delay_ms));

    if let Some(msg) = message {
        // Single message mode
        println!("{}", responder.reply(&msg).await);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        SiteChat — Interactive Mode           ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Bot:       {}", config.bot.name);
    println!("  Source:    {}", source_label.as_deref().unwrap_or("(none)"));
    println!("  Knowledge: {snippet_count} snippets");
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut conv = Conversation::new(BotId::from("cli"));
    let mut lines = BufReader::new(io::stdin()).lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            print!("  You > ");
            std::io::stdout().flush()?;
            continue;
        }
        if is_exit_command(line) {
            break;
        }

        conv.push(ChatMessage::user(line));
        let reply = responder.reply(line).await;
        println!("  Bot > {reply}");
        println!();
        conv.push(ChatMessage::bot(reply));

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    tracing::debug!(turns = conv.messages.len() / 2, "Chat session ended");
    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}

//! `sitechat pages` — Show how a knowledge file groups into pages.

use std::path::PathBuf;

use sitechat_config::AppConfig;
use sitechat_knowledge::structured_view;

pub async fn run(knowledge: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let snippets = super::resolve_snippets(&config, knowledge)?;
    let sections = structured_view(&snippets, config.bot.source_label.as_deref());

    if sections.is_empty() {
        println!("  No knowledge loaded.");
        return Ok(());
    }

    println!("📄 {} page(s) from {} snippet(s)", sections.len(), snippets.len());
    for section in &sections {
        println!();
        println!("  {}", section.title);
        if !section.url.is_empty() {
            println!("  {}", section.url);
        }
        for line in section.content.lines() {
            println!("    {line}");
        }
    }

    Ok(())
}

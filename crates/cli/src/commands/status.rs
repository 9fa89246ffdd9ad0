//! `sitechat status` — Show configuration status.

use sitechat_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("💬 SiteChat Status");
    println!("==================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);
    println!(
        "  Auth:         {}",
        if config.gateway.api_key.is_some() { "api key" } else { "open" }
    );
    println!("  Rate limit:   {}/min", config.gateway.rate_limit_per_minute);
    println!("  Bot:          {}", config.bot.name);
    println!(
        "  Source:       {}",
        config.bot.source_label.as_deref().unwrap_or("(none)")
    );
    println!("  Reply delay:  {} ms", config.bot.response_delay_ms);

    match &config.bot.knowledge_file {
        Some(path) if path.exists() => println!("  Knowledge:    {}", path.display()),
        Some(path) => println!("  Knowledge:    {} ⚠️  (missing)", path.display()),
        None => println!("  Knowledge:    (none)"),
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `sitechat onboard` first");
    }

    Ok(())
}

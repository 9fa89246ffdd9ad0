//! `sitechat gateway` — Start the HTTP API server.

use sitechat_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
        config.validate()?;
    }

    println!("💬 SiteChat Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!(
        "   Auth:      {}",
        if config.gateway.api_key.is_some() {
            "bearer api key"
        } else {
            "open"
        }
    );

    sitechat_gateway::start(config).await?;

    Ok(())
}

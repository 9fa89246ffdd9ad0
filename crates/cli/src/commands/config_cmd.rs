//! `sitechat config` — Configuration management commands.

use sitechat_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let warnings = warnings(&config);
            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!(
                "   Gateway:   {}:{}",
                config.gateway.host, config.gateway.port
            );
            println!("   Bot:       {}", config.bot.name);
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

/// Settings that load fine but are probably not what the user wants.
fn warnings(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    match &config.bot.knowledge_file {
        None => warnings.push("No bot.knowledge_file set; the default bot starts empty".to_string()),
        Some(path) if !path.exists() => {
            warnings.push(format!("Knowledge file not found: {}", path.display()))
        }
        Some(_) => {}
    }

    if config.gateway.api_key.is_none() && config.gateway.allow_public_bind {
        warnings.push("Public bind without gateway.api_key; the API is open".to_string());
    }

    warnings
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if config.gateway.api_key.is_some() {
        config.gateway.api_key = Some("[REDACTED]".into());
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_knowledge_file_is_flagged() {
        let found = warnings(&AppConfig::default());
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("No bot.knowledge_file"));
    }

    #[test]
    fn missing_knowledge_file_is_flagged() {
        let mut config = AppConfig::default();
        config.bot.knowledge_file = Some("/nonexistent/site.txt".into());

        let found = warnings(&config);
        assert_eq!(found, vec!["Knowledge file not found: /nonexistent/site.txt".to_string()]);
    }

    #[test]
    fn public_bind_without_key_is_flagged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.txt");
        std::fs::write(&path, "Our pricing is $29/month\n").unwrap();

        let mut config = AppConfig::default();
        config.bot.knowledge_file = Some(path);
        config.gateway.allow_public_bind = true;

        let found = warnings(&config);
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("Public bind"));

        config.gateway.api_key = Some("k-123".into());
        assert!(warnings(&config).is_empty());
    }
}

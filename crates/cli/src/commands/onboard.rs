//! `sitechat onboard` — First-time setup wizard.

use sitechat_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    let knowledge_dir = AppConfig::knowledge_dir();

    println!("💬 SiteChat — First-Time Setup");
    println!("==============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if !knowledge_dir.exists() {
        std::fs::create_dir_all(&knowledge_dir)?;
        println!("✅ Created knowledge directory: {}", knowledge_dir.display());
    }

    // Sample knowledge file
    let sample_path = knowledge_dir.join("example.txt");
    if !sample_path.exists() {
        std::fs::write(
            &sample_path,
            concat!(
                "Home - https://example.com\n",
                "Example builds tools for small teams.\n",
                "Pricing - https://example.com/pricing\n",
                "Our pricing is $29/month\n",
                "Support - https://example.com/support\n",
                "We offer 24/7 support by email and chat.\n",
            ),
        )?;
        println!("✅ Created sample knowledge: {}", sample_path.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        let default_toml = AppConfig::default_toml();
        std::fs::write(&config_path, &default_toml)?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Set bot.knowledge_file in {}", config_path.display());
        println!("   2. Run: sitechat chat --knowledge {}", sample_path.display());
        println!("   3. Run: sitechat gateway\n");
    }

    println!("🎉 Setup complete!\n");

    Ok(())
}

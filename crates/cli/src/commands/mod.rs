pub mod chat;
pub mod config_cmd;
pub mod gateway;
pub mod onboard;
pub mod pages;
pub mod status;

use std::path::PathBuf;

use sitechat_config::AppConfig;
use sitechat_knowledge::load_snippets;

/// Snippets from the CLI argument, else the configured file, else none.
pub fn resolve_snippets(
    config: &AppConfig,
    knowledge: Option<PathBuf>,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    match knowledge.or_else(|| config.bot.knowledge_file.clone()) {
        Some(path) => Ok(load_snippets(&path)?),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let from_arg = dir.path().join("arg.txt");
        let from_config = dir.path().join("config.txt");
        std::fs::write(&from_arg, "from argument\n").unwrap();
        std::fs::write(&from_config, "from config\n").unwrap();

        let mut config = AppConfig::default();
        config.bot.knowledge_file = Some(from_config);

        let snippets = resolve_snippets(&config, Some(from_arg)).unwrap();
        assert_eq!(snippets, vec!["from argument"]);

        let snippets = resolve_snippets(&config, None).unwrap();
        assert_eq!(snippets, vec!["from config"]);
    }

    #[test]
    fn no_knowledge_is_empty() {
        let snippets = resolve_snippets(&AppConfig::default(), None).unwrap();
        assert!(snippets.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = resolve_snippets(
            &AppConfig::default(),
            Some(PathBuf::from("/nonexistent/site.txt")),
        );
        assert!(result.is_err());
    }
}

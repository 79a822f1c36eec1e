//! TOML configuration: database location plus vocabulary extensions.
//!
//! ```toml
//! [database]
//! path = "~/registers/holdings.db"
//!
//! [vocabulary]
//! corporate_suffixes = ["ANS", "IKS"]
//!
//! [vocabulary.share_class_aliases]
//! "Founder shares" = ["gründeraksjer", "founder shares"]
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use captable_parse::Vocabulary;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VocabularyConfig {
    #[serde(default)]
    pub corporate_suffixes: Vec<String>,
    #[serde(default)]
    pub share_class_aliases: HashMap<String, Vec<String>>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read(String),
    Parse(String),
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&text)
            .map_err(|e| ConfigError::Parse(format!("invalid config {}: {e}", path.display())))
    }

    /// Built-in vocabulary plus this config's extensions. Alias lists are
    /// applied in canonical-name order so layering is deterministic.
    pub fn vocabulary(&self) -> Vocabulary {
        let mut aliases: Vec<(String, Vec<String>)> = self
            .vocabulary
            .share_class_aliases
            .iter()
            .map(|(canonical, list)| (canonical.clone(), list.clone()))
            .collect();
        aliases.sort_by(|a, b| a.0.cmp(&b.0));
        Vocabulary::with_extensions(&self.vocabulary.corporate_suffixes, &aliases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg: Config = toml::from_str(
            r#"
[database]
path = "~/registers/holdings.db"

[vocabulary]
corporate_suffixes = ["ANS", "IKS"]

[vocabulary.share_class_aliases]
"Founder shares" = ["gründeraksjer", "founder shares"]
"#,
        )
        .unwrap();

        assert_eq!(cfg.database.path.as_deref(), Some("~/registers/holdings.db"));
        assert_eq!(cfg.vocabulary.corporate_suffixes, vec!["ANS", "IKS"]);

        let vocab = cfg.vocabulary();
        assert_eq!(vocab.share_class("Gründeraksjer"), Some("Founder shares"));
        assert!(vocab.is_corporate_name("Vannverket IKS"));
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.database.path, None);
        assert!(cfg.vocabulary.corporate_suffixes.is_empty());
        let vocab = cfg.vocabulary();
        assert_eq!(vocab.share_class("A-aksjer"), Some("Class A"));
    }

    #[test]
    fn load_reads_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captable.toml");
        std::fs::write(&path, "[database]\npath = \"./holdings.db\"\n").unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.database.path.as_deref(), Some("./holdings.db"));
    }

    #[test]
    fn load_distinguishes_read_and_parse_failures() {
        let dir = tempfile::tempdir().unwrap();

        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));

        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[database\npath = 3").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}

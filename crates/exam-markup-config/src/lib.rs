use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use exam_markup_engine::{Highlight, MarkupOptions, TagKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Unknown tag name in disabled_tags: {name}")]
    UnknownTag { name: String },

    #[error("Unknown highlight name: {name} (expected yellow, lightBlue, lightGray or lightGreen)")]
    UnknownHighlight { name: String },
}

/// On-disk configuration. Every field is optional; the defaults reproduce
/// the engine's fixed behavior exactly.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where exported exam documents land.
    pub export_dir: Option<PathBuf>,
    /// Tag names removed from the recognized vocabulary.
    pub disabled_tags: Vec<String>,
    /// Text-color substitutions, token -> replacement hex.
    pub colors: BTreeMap<String, String>,
    /// Background-to-highlight substitutions, token -> highlight name.
    pub highlights: BTreeMap<String, String>,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the export directory
        if let Some(dir) = &config.export_dir {
            config.export_dir = Some(Self::expand_path(dir).unwrap_or_else(|| dir.clone()));
        }

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/exam-markup");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Converts the loaded configuration into engine options, validating
    /// tag and highlight names along the way.
    pub fn into_options(&self) -> Result<MarkupOptions, ConfigError> {
        let mut options = MarkupOptions::default();

        for name in &self.disabled_tags {
            let tag = TagKind::from_name(name).ok_or_else(|| ConfigError::UnknownTag {
                name: name.clone(),
            })?;
            options.vocabulary.disable(tag);
        }

        for (token, replacement) in &self.colors {
            options.colors.insert_color(token, replacement);
        }

        for (token, name) in &self.highlights {
            let highlight =
                Highlight::from_name(name).ok_or_else(|| ConfigError::UnknownHighlight {
                    name: name.clone(),
                })?;
            options.colors.insert_highlight(token, highlight);
        }

        Ok(options)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/exam-markup/config.toml"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        let test_config = Config {
            export_dir: Some(PathBuf::from("/tmp/exams")),
            disabled_tags: vec!["code".to_string()],
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded.export_dir, test_config.export_dir);
        assert_eq!(loaded.disabled_tags, test_config.disabled_tags);
    }

    #[test]
    fn test_config_with_tilde_in_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "export_dir = \"~/exams\"\n").unwrap();

        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();
        let expanded = loaded.export_dir.unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("exams"));
    }

    #[test]
    fn test_empty_config_gives_default_options() {
        let config = Config::default();
        let options = config.into_options().unwrap();

        // Default options must reproduce engine behavior untouched.
        assert!(options.vocabulary.recognizes(TagKind::Code));
        assert_eq!(
            options.colors.resolve_color("#fff3cd").as_deref(),
            Some("996600")
        );
    }

    #[test]
    fn test_disabled_tags_are_applied() {
        let config = Config {
            disabled_tags: vec!["code".to_string(), "mark".to_string()],
            ..Config::default()
        };
        let options = config.into_options().unwrap();

        assert!(!options.vocabulary.recognizes(TagKind::Code));
        assert!(!options.vocabulary.recognizes(TagKind::Mark));
        assert!(options.vocabulary.recognizes(TagKind::Strong));
    }

    #[test]
    fn test_unknown_tag_name_is_an_error() {
        let config = Config {
            disabled_tags: vec!["marquee".to_string()],
            ..Config::default()
        };

        assert!(matches!(
            config.into_options(),
            Err(ConfigError::UnknownTag { .. })
        ));
    }

    #[test]
    fn test_color_and_highlight_overrides() {
        let mut config = Config::default();
        config
            .colors
            .insert("#0066cc".to_string(), "#112233".to_string());
        config
            .highlights
            .insert("#abcdef".to_string(), "lightGreen".to_string());

        let options = config.into_options().unwrap();
        assert_eq!(
            options.colors.resolve_color("#0066cc").as_deref(),
            Some("112233")
        );
        assert_eq!(
            options.colors.resolve_highlight("#abcdef"),
            Some(Highlight::LightGreen)
        );
    }

    #[test]
    fn test_unknown_highlight_name_is_an_error() {
        let mut config = Config::default();
        config
            .highlights
            .insert("#abcdef".to_string(), "magenta".to_string());

        assert!(matches!(
            config.into_options(),
            Err(ConfigError::UnknownHighlight { .. })
        ));
    }

    #[test]
    fn test_parse_full_config_document() {
        let content = r##"
export_dir = "/srv/exams"
disabled_tags = ["code"]

[colors]
"#28a745" = "#004400"

[highlights]
"#fafafa" = "lightGray"
"##;
        let config: Config = toml::from_str(content).unwrap();
        let options = config.into_options().unwrap();

        assert_eq!(
            options.colors.resolve_color("#28a745").as_deref(),
            Some("004400")
        );
        assert_eq!(
            options.colors.resolve_highlight("#fafafa"),
            Some(Highlight::LightGray)
        );
    }
}

use anyhow::Context;
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub mod validator;

use crate::cli::Cli;
use crate::domain::resolver::DEFAULT_FALLBACK_METHOD;
use crate::domain::{GeneratorArgs, Resolution, Resolver, RuleTable};

/// Built-in keyword table, used when the configuration defines no rules
pub const DEFAULT_RULES: &str = include_str!("default_rules.yaml");

/// Base name of the configuration file looked up in the root directory
pub const CONFIG_FILE_STEM: &str = "schemock";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// One locale tag, or a list to pick one from per run
    #[serde(default)]
    pub locale: LocaleSetting,
    /// Seed for the random generator; absent or 0 picks a random seed
    #[serde(default)]
    pub seed: Option<u64>,
    /// Generator provider groups to enable
    #[serde(default)]
    pub providers: Vec<String>,
    /// Upper bound on generated array lengths, for schema walkers
    #[serde(default = "default_max_array_length")]
    pub max_array_length: usize,
    /// Generator used for fields no rule matches
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Keyword rules in priority order
    #[serde(default)]
    pub keyword_matching: Vec<KeywordRuleConfig>,
}

fn default_max_array_length() -> usize {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: LocaleSetting::default(),
            seed: None,
            providers: Vec::new(),
            max_array_length: default_max_array_length(),
            fallback: FallbackConfig::default(),
            keyword_matching: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LocaleSetting {
    One(String),
    Many(Vec<String>),
}

impl Default for LocaleSetting {
    fn default() -> Self {
        LocaleSetting::One("en_US".to_string())
    }
}

impl LocaleSetting {
    pub fn tags(&self) -> Vec<&str> {
        match self {
            LocaleSetting::One(tag) => vec![tag.as_str()],
            LocaleSetting::Many(tags) => tags.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FallbackConfig {
    #[serde(default = "default_fallback_method")]
    pub method: String,
    #[serde(default)]
    pub args: GeneratorArgs,
}

fn default_fallback_method() -> String {
    DEFAULT_FALLBACK_METHOD.to_string()
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            method: default_fallback_method(),
            args: GeneratorArgs::new(),
        }
    }
}

/// One entry of the `keyword_matching` list.
///
/// Missing `keywords`/`method` deserialize as empty so validation can report
/// them by position instead of failing inside the deserializer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KeywordRuleConfig {
    #[serde(default)]
    pub keywords: Vec<KeywordPatternConfig>,
    #[serde(default)]
    pub method: String,
    #[serde(default, skip_serializing_if = "GeneratorArgs::is_empty")]
    pub args: GeneratorArgs,
}

/// A keyword entry is either a bare string or an `{ancestor: child}` mapping
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum KeywordPatternConfig {
    Keyword(String),
    Path(BTreeMap<String, String>),
}

/// Shape of the built-in table and of files under `rules/`
#[derive(Debug, Default, Deserialize)]
struct RuleFile {
    #[serde(default)]
    keyword_matching: Vec<KeywordRuleConfig>,
}

/// Parse the built-in keyword table
pub fn default_keyword_rules() -> Result<Vec<KeywordRuleConfig>, anyhow::Error> {
    let file: RuleFile =
        serde_yaml::from_str(DEFAULT_RULES).context("Built-in rule table is malformed")?;
    Ok(file.keyword_matching)
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let config_path = &cli.config;
        let root = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let s = Config::builder()
            .add_source(File::from(config_path.clone()).required(false))
            .set_default("max_array_length", default_max_array_length() as i64)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.finish_loading(root)?;
        Ok(settings)
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if let Some(locale) = &cli.locale {
            self.locale = LocaleSetting::One(locale.clone());
        }
    }

    /// Load `<root>/schemock.{toml,yaml,json}` plus `<root>/rules/*`
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let root = root.as_ref();
        let config_path = root.join(CONFIG_FILE_STEM);
        let s = Config::builder()
            .add_source(File::from(config_path).required(false))
            .set_default("max_array_length", default_max_array_length() as i64)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;
        settings.finish_loading(root)?;
        Ok(settings)
    }

    fn finish_loading(&mut self, root: &Path) -> Result<(), anyhow::Error> {
        if self.keyword_matching.is_empty() {
            tracing::debug!("No keyword_matching configured, using built-in rule table");
            self.keyword_matching = default_keyword_rules()?;
        }

        self.load_external_rules(&root.join("rules"))?;

        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })?;

        Ok(())
    }

    /// Append the rules of every file in `dir`, in file name order.
    /// Rules from these files rank below the main configuration's rules.
    fn load_external_rules(&mut self, dir: &Path) -> Result<(), anyhow::Error> {
        let pattern = format!("{}/*", dir.display());
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) => {
                    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                        if matches!(ext, "json" | "yaml" | "yml" | "toml") {
                            let content = std::fs::read_to_string(&path)?;
                            let file: RuleFile = match ext {
                                "json" => serde_json::from_str(&content)?,
                                "toml" => toml::from_str(&content)?,
                                _ => serde_yaml::from_str(&content)?,
                            };
                            tracing::info!(
                                "Loaded {} rules from {}",
                                file.keyword_matching.len(),
                                path.display()
                            );
                            self.keyword_matching.extend(file.keyword_matching);
                        }
                    }
                }
                Err(e) => tracing::warn!("Failed to read glob entry: {}", e),
            }
        }
        Ok(())
    }

    pub fn rule_table(&self) -> Result<RuleTable, anyhow::Error> {
        Ok(RuleTable::from_config(&self.keyword_matching)?)
    }

    pub fn fallback_resolution(&self) -> Resolution {
        Resolution::new(self.fallback.method.clone(), self.fallback.args.clone())
    }

    /// Build a resolver over this configuration's rule table and fallback
    pub fn resolver(&self) -> Result<Resolver, anyhow::Error> {
        Ok(Resolver::with_fallback(
            self.rule_table()?,
            self.fallback_resolution(),
        ))
    }
}

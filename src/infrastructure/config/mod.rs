//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::application::messaging::{DeliveryMode, DispatchConfig};
use crate::domain::entities::{CategoryRule, CategoryRules, ChannelKind, DEFAULT_CATEGORY};

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub extraction: ExtractionConfig,
    pub ledger: LedgerConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub mode: DeliveryMode,
    /// Upper bound for one ledger append
    pub append_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExtractionConfig {
    pub default_category: String,
    /// Ordered; the first matching rule wins. Empty means the built-in table.
    pub categories: Vec<CategoryRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LedgerBackend {
    #[default]
    Sheets,
    Sqlite,
    Memory,
}

impl std::str::FromStr for LedgerBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sheets" => Ok(LedgerBackend::Sheets),
            "sqlite" => Ok(LedgerBackend::Sqlite),
            "memory" => Ok(LedgerBackend::Memory),
            other => Err(ConfigError::InvalidValue(format!("ledger backend: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LedgerConfig {
    pub backend: LedgerBackend,
    pub sheets: SheetsConfig,
    pub sqlite: SqliteConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SheetsConfig {
    pub spreadsheet_id: Option<String>,
    pub range: String,
    pub access_token: Option<String>,
    /// Read on every (re)connect, takes precedence over `access-token`
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SqliteConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AdaptersConfig {
    pub whatsapp: Option<WhatsAppConfig>,
    pub telegram: Option<TelegramConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct WhatsAppConfig {
    pub enabled: bool,
    pub listen: String,
    pub verify_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "hisaab-bot".to_string(),
            mode: DeliveryMode::FireAndForget,
            append_timeout_secs: 10,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_category: DEFAULT_CATEGORY.to_string(),
            categories: CategoryRules::builtin(),
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            range: "Sheet1!A:D".to_string(),
            access_token: None,
            token_file: None,
        }
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("hisaab.db"),
        }
    }
}

impl Default for AdaptersConfig {
    fn default() -> Self {
        Self {
            whatsapp: Some(WhatsAppConfig::default()),
            telegram: Some(TelegramConfig::default()),
            console: Some(ConsoleConfig::default()),
        }
    }
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen: "0.0.0.0:5000".to_string(),
            verify_token: None,
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            token: None,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Defaults overlaid with environment variables
    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Overlay values from a variable lookup (environment in production)
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(mode) = lookup("BOT_MODE") {
            match mode.parse() {
                Ok(mode) => self.bot.mode = mode,
                Err(e) => tracing::warn!("Ignoring BOT_MODE: {}", e),
            }
        }

        if let Some(category) = lookup("DEFAULT_CATEGORY") {
            self.extraction.default_category = category;
        }

        if let Some(backend) = lookup("LEDGER_BACKEND") {
            match backend.parse() {
                Ok(backend) => self.ledger.backend = backend,
                Err(e) => tracing::warn!("Ignoring LEDGER_BACKEND: {}", e),
            }
        }

        let sheets = &mut self.ledger.sheets;
        if let Some(id) = lookup("SHEETS_SPREADSHEET_ID") {
            sheets.spreadsheet_id = Some(id);
        }
        if let Some(range) = lookup("SHEETS_RANGE") {
            sheets.range = range;
        }
        if let Some(token) = lookup("SHEETS_ACCESS_TOKEN") {
            sheets.access_token = Some(token);
        }
        if let Some(path) = lookup("SHEETS_TOKEN_FILE") {
            sheets.token_file = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("SQLITE_PATH") {
            self.ledger.sqlite.path = PathBuf::from(path);
        }

        if let Some(token) = lookup("WHATSAPP_VERIFY_TOKEN") {
            let whatsapp = self.whatsapp_mut();
            whatsapp.verify_token = Some(token);
            whatsapp.enabled = true;
        }
        if let Some(listen) = lookup("WHATSAPP_LISTEN") {
            self.whatsapp_mut().listen = listen;
        }

        if let Some(token) = lookup("BOT_TOKEN") {
            let telegram = self.adapters.telegram.get_or_insert_with(TelegramConfig::default);
            telegram.token = Some(token);
            telegram.enabled = true;
        }
    }

    fn whatsapp_mut(&mut self) -> &mut WhatsAppConfig {
        self.adapters.whatsapp.get_or_insert_with(WhatsAppConfig::default)
    }

    pub fn category_rules(&self) -> CategoryRules {
        let rules = if self.extraction.categories.is_empty() {
            CategoryRules::builtin()
        } else {
            self.extraction.categories.clone()
        };
        CategoryRules::new(rules, self.extraction.default_category.clone())
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            mode: self.bot.mode,
            append_timeout: Duration::from_secs(self.bot.append_timeout_secs.max(1)),
        }
    }

    /// Ledger settings that still need a value for the selected backend
    pub fn missing_ledger_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.ledger.backend == LedgerBackend::Sheets {
            let sheets = &self.ledger.sheets;
            if sheets.spreadsheet_id.as_deref().unwrap_or("").is_empty() {
                missing.push("ledger.sheets.spreadsheet-id");
            }
            if sheets.access_token.as_deref().unwrap_or("").is_empty() && sheets.token_file.is_none() {
                missing.push("ledger.sheets.access-token");
            }
        }
        missing
    }

    pub fn whatsapp(&self) -> Option<&WhatsAppConfig> {
        self.adapters.whatsapp.as_ref().filter(|w| w.enabled)
    }

    pub fn telegram_token(&self) -> Option<&str> {
        self.adapters
            .telegram
            .as_ref()
            .filter(|t| t.enabled)
            .and_then(|t| t.token.as_deref())
            .filter(|t| !t.is_empty())
    }

    /// An absent `console` section counts as enabled
    pub fn console_enabled(&self) -> bool {
        self.adapters.console.as_ref().map_or(true, |c| c.enabled)
    }

    /// Channel `run` starts: WhatsApp, else Telegram with a token, else console
    pub fn primary_channel(&self) -> Result<ChannelKind, ConfigError> {
        if self.whatsapp().is_some() {
            Ok(ChannelKind::WhatsApp)
        } else if self.telegram_token().is_some() {
            Ok(ChannelKind::Telegram)
        } else if self.console_enabled() {
            Ok(ChannelKind::Console)
        } else {
            Err(ConfigError::MissingField(
                "adapters: enable whatsapp, telegram (with a token) or console".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bot.mode, DeliveryMode::FireAndForget);
        assert_eq!(config.ledger.backend, LedgerBackend::Sheets);
        assert_eq!(config.category_rules(), CategoryRules::default());
        assert_eq!(
            config.missing_ledger_fields(),
            vec!["ledger.sheets.spreadsheet-id", "ledger.sheets.access-token"]
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "bot:\n  mode: sync\nledger:\n  backend: sqlite\n  sqlite:\n    path: /tmp/x.db\n",
        )
        .unwrap();

        assert_eq!(config.bot.mode, DeliveryMode::Sync);
        assert_eq!(config.bot.append_timeout_secs, 10);
        assert_eq!(config.ledger.backend, LedgerBackend::Sqlite);
        assert_eq!(config.ledger.sqlite.path, PathBuf::from("/tmp/x.db"));
        assert!(config.missing_ledger_fields().is_empty());
    }

    #[test]
    fn test_custom_categories_from_yaml() {
        let config = Config::from_yaml(
            "extraction:\n  default-category: Misc\n  categories:\n    - label: Fuel\n      keywords: [Petrol, diesel]\n",
        )
        .unwrap();

        let rules = config.category_rules();
        assert_eq!(rules.classify("500 ka petrol"), "Fuel");
        assert_eq!(rules.classify("200 ki chai"), "Misc");
    }

    #[test]
    fn test_yaml_round_trip_of_defaults() {
        let yaml = Config::default().to_yaml().unwrap();
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.category_rules(), CategoryRules::default());
        assert!(yaml.contains("fire-and-forget"));
    }

    #[test]
    fn test_bad_yaml_is_parse_error() {
        let err = Config::from_yaml("bot: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_apply_vars() {
        let vars: HashMap<&str, &str> = [
            ("BOT_MODE", "sync"),
            ("SHEETS_SPREADSHEET_ID", "sheet-1"),
            ("SHEETS_ACCESS_TOKEN", "tok"),
            ("WHATSAPP_VERIFY_TOKEN", "verify-me"),
            ("BOT_TOKEN", "123:abc"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_vars(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.bot.mode, DeliveryMode::Sync);
        assert!(config.missing_ledger_fields().is_empty());
        assert_eq!(
            config.whatsapp().and_then(|w| w.verify_token.as_deref()),
            Some("verify-me")
        );
        assert_eq!(config.telegram_token(), Some("123:abc"));
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_vars(|k| match k {
            "BOT_MODE" => Some("sometimes".to_string()),
            "LEDGER_BACKEND" => Some("postgres".to_string()),
            _ => None,
        });
        assert_eq!(config.bot.mode, DeliveryMode::FireAndForget);
        assert_eq!(config.ledger.backend, LedgerBackend::Sheets);
    }

    #[test]
    fn test_partial_adapter_section_keeps_rest_of_file() {
        let config = Config::from_yaml(
            "bot:\n  mode: sync\nadapters:\n  whatsapp:\n    enabled: true\n    verify-token: abc\n  telegram:\n    enabled: true\n",
        )
        .unwrap();

        assert_eq!(config.bot.mode, DeliveryMode::Sync);
        let whatsapp = config.whatsapp().unwrap();
        assert_eq!(whatsapp.listen, "0.0.0.0:5000");
        assert_eq!(whatsapp.verify_token.as_deref(), Some("abc"));
        assert_eq!(config.telegram_token(), None);
    }

    #[test]
    fn test_primary_channel_order() {
        let mut config = Config::default();
        assert_eq!(config.primary_channel().unwrap(), ChannelKind::Console);

        config.apply_vars(|k| (k == "BOT_TOKEN").then(|| "123:abc".to_string()));
        assert_eq!(config.primary_channel().unwrap(), ChannelKind::Telegram);

        config.apply_vars(|k| (k == "WHATSAPP_VERIFY_TOKEN").then(|| "v".to_string()));
        assert_eq!(config.primary_channel().unwrap(), ChannelKind::WhatsApp);
    }

    #[test]
    fn test_no_enabled_channel_is_an_error() {
        let config = Config::from_yaml("adapters:\n  console:\n    enabled: false\n").unwrap();
        assert!(!config.console_enabled());
        assert!(matches!(
            config.primary_channel(),
            Err(ConfigError::MissingField(_))
        ));
    }

    #[test]
    fn test_dispatch_config() {
        let mut config = Config::default();
        config.bot.append_timeout_secs = 0;
        assert_eq!(config.dispatch_config().append_timeout, Duration::from_secs(1));
    }
}

use crate::cli::CommonArgs;
use crate::error::{GhstatError, Result};
use crate::github::client::DEFAULT_API_URL;
use crate::model::Affiliation;
use crate::svg::TemplateIds;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "ACCESS_TOKEN"];
pub const LOGIN_VAR: &str = "USER_NAME";

/// Earliest point the contribution walk reaches back to when unset.
const DEFAULT_CONTRIBUTIONS_SINCE: &str = "2008-01-01";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub login: String,
    pub birthday: Option<String>,
    pub contributions_since: Option<String>,
    pub cache_path: Option<PathBuf>,
    pub affiliations: Vec<Affiliation>,
    pub templates: Vec<PathBuf>,
    pub api_url: String,
    pub timeout_seconds: u64,
    pub template_ids: TemplateIds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            login: String::new(),
            birthday: None,
            contributions_since: None,
            cache_path: None,
            affiliations: Affiliation::all(),
            templates: Vec::new(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: 30,
            template_ids: TemplateIds::default(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ghstat").join("config.toml"))
    }

    /// Read `path`, or the default location when `None`. An explicit path
    /// must exist; a missing default file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(GhstatError::Config(format!(
                        "config file not found: {}",
                        p.display()
                    )));
                }
                p.to_path_buf()
            }
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        let text = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&text)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Load and apply command-line overrides.
    pub fn for_args(common: &CommonArgs) -> Result<Self> {
        let mut config = Self::load(common.config.as_deref())?;
        if let Some(login) = &common.login {
            config.login = login.clone();
        }
        if config.login.is_empty() {
            if let Ok(login) = std::env::var(LOGIN_VAR) {
                config.login = login;
            }
        }
        if let Some(cache) = &common.cache {
            config.cache_path = Some(cache.clone());
        }
        Ok(config)
    }

    pub fn require_login(&self) -> Result<&str> {
        if self.login.is_empty() {
            return Err(GhstatError::Config(format!(
                "no login configured; pass --login, set `login` in the config file or {LOGIN_VAR}"
            )));
        }
        Ok(&self.login)
    }

    pub fn cache_path(&self) -> Result<PathBuf> {
        match &self.cache_path {
            Some(path) => Ok(path.clone()),
            None => Ok(PathBuf::from("cache").join(format!("{}.txt", self.require_login()?))),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn token(&self) -> Result<String> {
        TOKEN_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|t| !t.is_empty()))
            .ok_or_else(|| {
                GhstatError::Config(format!("no API token; set {}", TOKEN_VARS.join(" or ")))
            })
    }

    pub fn birthday(&self) -> Result<Option<NaiveDate>> {
        self.birthday
            .as_deref()
            .map(crate::age::parse_date)
            .transpose()
    }

    pub fn contributions_since(&self) -> Result<DateTime<Utc>> {
        parse_instant(
            self.contributions_since
                .as_deref()
                .unwrap_or(DEFAULT_CONTRIBUTIONS_SINCE),
        )
    }
}

/// RFC3339 or `YYYY-MM-DD` (midnight UTC).
pub fn parse_instant(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&datetime));
        }
    }
    Err(GhstatError::InvalidDate(format!(
        "'{input}' is neither RFC3339 nor YYYY-MM-DD"
    )))
}

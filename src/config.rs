use log::{Level, LevelFilter};
use url::Url;

use crate::error::ConfigError;
use crate::types::SessionId;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Where the chat API lives.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
    base_url: Url,
}

impl ApiConfig {
    pub fn new(base: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base).map_err(|source| ConfigError::BaseUrl {
            value: base.to_string(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::NotABase(base.to_string()));
        }
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn sessions_url(&self) -> Url {
        self.endpoint(&["api", "chat", "sessions"])
    }

    /// The session id is a single, percent-encoded path segment.
    pub fn history_url(&self, session_id: &SessionId) -> Url {
        self.endpoint(&["api", "chat", "history", session_id.as_str()])
    }

    pub fn chat_url(&self) -> Url {
        self.endpoint(&["api", "chat"])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so the segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WidgetConfig {
    pub api: ApiConfig,
    pub log_level: LevelFilter,
}

impl WidgetConfig {
    /// Builds the config from the mount element's `data-api-base` and
    /// `data-log-level` attributes. Bad values fall back to the defaults and
    /// are returned alongside so the caller can report them once logging is up.
    pub fn from_attributes(
        api_base: Option<String>,
        log_level: Option<String>,
    ) -> (Self, Vec<ConfigError>) {
        let mut problems = Vec::new();

        let api = match api_base.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(base) => ApiConfig::new(base).unwrap_or_else(|e| {
                problems.push(e);
                ApiConfig::default()
            }),
            None => ApiConfig::default(),
        };

        let log_level = match log_level.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(level) => level.parse::<LevelFilter>().unwrap_or_else(|_| {
                problems.push(ConfigError::LogLevel(level.to_string()));
                DEFAULT_LOG_LEVEL
            }),
            None => DEFAULT_LOG_LEVEL,
        };

        (Self { api, log_level }, problems)
    }

    /// Level handed to the console logger; `None` when logging is off.
    pub fn console_level(&self) -> Option<Level> {
        self.log_level.to_level()
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

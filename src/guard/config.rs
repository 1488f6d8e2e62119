//! Guard configuration.

use regex::Regex;
use serde::Deserialize;
use time::Duration;

use crate::base::context::{ConfigResultExt, PatternResultExt};
use crate::base::guarderror::GuardError;
use crate::guard::category::{Category, CategoryRegistry, CookieMatcher, MatchAll};

/// Name of the implicit category created by [`GuardConfig::all_cookies`].
pub const ALL_COOKIES_CATEGORY: &str = "all";

/// Default lifetime given to cookies moved from the raw store into the buffer.
pub const DEFAULT_EXPIRATION: Duration = Duration::days(365);

/// One category to register.
pub struct CategoryConfig {
    pub name: String,
    pub matcher: Box<dyn CookieMatcher>,
    pub blocked: bool,
}

/// Cookie guard configuration.
pub struct GuardConfig {
    /// Categories in registration order
    pub categories: Vec<CategoryConfig>,
    /// Lifetime of cookies moved into the buffer on block
    pub default_expiration: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            default_expiration: DEFAULT_EXPIRATION,
        }
    }
}

impl GuardConfig {
    /// Create a new config with no categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single implicit category covering every cookie.
    pub fn all_cookies(default_blocked: bool) -> Self {
        Self::new().category(ALL_COOKIES_CATEGORY, MatchAll, default_blocked)
    }

    /// Register a category with any matcher.
    pub fn category(
        mut self,
        name: impl Into<String>,
        matcher: impl CookieMatcher + 'static,
        blocked: bool,
    ) -> Self {
        self.categories.push(CategoryConfig {
            name: name.into(),
            matcher: Box::new(matcher),
            blocked,
        });
        self
    }

    /// Register a category matching cookie names against a regular expression.
    pub fn category_pattern(
        self,
        name: impl Into<String>,
        pattern: &str,
        blocked: bool,
    ) -> Result<Self, GuardError> {
        let name = name.into();
        let regex = Regex::new(pattern).pattern_context(&name)?;
        Ok(self.category(name, regex, blocked))
    }

    /// Set the lifetime of cookies moved into the buffer.
    pub fn default_expiration(mut self, expiration: Duration) -> Self {
        self.default_expiration = expiration;
        self
    }

    /// Parse a JSON configuration.
    ///
    /// ```json
    /// {
    ///   "categories": [
    ///     { "name": "analytics", "pattern": "^_ga", "blocked": true }
    ///   ],
    ///   "default_expiration_secs": 31536000
    /// }
    /// ```
    ///
    /// `{"default_blocked": true}` selects the single-category form.
    pub fn from_json(json: &str) -> Result<Self, GuardError> {
        let file: ConfigFile = serde_json::from_str(json).config_context("guard config")?;

        let mut config = match (file.default_blocked, file.categories.is_empty()) {
            (Some(_), false) => {
                return Err(GuardError::InvalidConfig(
                    "default_blocked cannot be combined with categories".to_string(),
                ))
            }
            (Some(default_blocked), true) => Self::all_cookies(default_blocked),
            (None, _) => {
                let mut config = Self::new();
                for category in file.categories {
                    config =
                        config.category_pattern(category.name, &category.pattern, category.blocked)?;
                }
                config
            }
        };

        if let Some(secs) = file.default_expiration_secs {
            if secs <= 0 {
                return Err(GuardError::InvalidConfig(format!(
                    "default_expiration_secs must be positive, got {}",
                    secs
                )));
            }
            config = config.default_expiration(Duration::seconds(secs));
        }

        Ok(config)
    }

    /// Validate and build the category registry.
    pub(crate) fn into_parts(self) -> Result<(CategoryRegistry, Duration), GuardError> {
        let categories = self
            .categories
            .into_iter()
            .map(|c| Category::new(c.name, c.matcher, c.blocked))
            .collect();

        Ok((CategoryRegistry::new(categories)?, self.default_expiration))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    categories: Vec<CategoryEntry>,
    default_blocked: Option<bool>,
    default_expiration_secs: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CategoryEntry {
    name: String,
    pattern: String,
    #[serde(default)]
    blocked: bool,
}

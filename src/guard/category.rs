use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use regex::Regex;

use crate::base::guarderror::GuardError;

/// Decides whether a cookie name belongs to a category.
///
/// Implementations must be deterministic and total over cookie names.
pub trait CookieMatcher: Send + Sync {
    fn matches(&self, name: &str) -> bool;
}

impl<F> CookieMatcher for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, name: &str) -> bool {
        self(name)
    }
}

impl CookieMatcher for Regex {
    fn matches(&self, name: &str) -> bool {
        self.is_match(name)
    }
}

/// Matches names starting with a fixed prefix.
#[derive(Debug, Clone)]
pub struct Prefix(pub String);

impl CookieMatcher for Prefix {
    fn matches(&self, name: &str) -> bool {
        name.starts_with(&self.0)
    }
}

/// Matches an explicit set of names.
#[derive(Debug, Clone, Default)]
pub struct NameSet(HashSet<String>);

impl NameSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }
}

impl CookieMatcher for NameSet {
    fn matches(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

/// Matches every cookie.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl CookieMatcher for MatchAll {
    fn matches(&self, _name: &str) -> bool {
        true
    }
}

/// A named blocking policy unit.
pub struct Category {
    name: String,
    matcher: Box<dyn CookieMatcher>,
    blocked: AtomicBool,
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Category")
            .field("name", &self.name)
            .field("blocked", &self.is_blocked())
            .finish_non_exhaustive()
    }
}

impl Category {
    pub fn new(name: impl Into<String>, matcher: Box<dyn CookieMatcher>, blocked: bool) -> Self {
        Self {
            name: name.into(),
            matcher,
            blocked: AtomicBool::new(blocked),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::Acquire)
    }

    pub fn matches(&self, cookie_name: &str) -> bool {
        self.matcher.matches(cookie_name)
    }

    /// Flip the flag, returning the previous value. Only the toggle path calls this.
    pub(crate) fn set_blocked(&self, blocked: bool) -> bool {
        self.blocked.swap(blocked, Ordering::AcqRel)
    }
}

/// Ordered set of categories. Registration order decides which category
/// owns a cookie name when several matchers accept it.
#[derive(Debug)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Build a registry. Fails on an empty set or a repeated name.
    pub fn new(categories: Vec<Category>) -> Result<Self, GuardError> {
        if categories.is_empty() {
            return Err(GuardError::NoCategories);
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if !seen.insert(category.name()) {
                return Err(GuardError::DuplicateCategory(category.name().to_string()));
            }
        }

        Ok(Self { categories })
    }

    /// Look up a category by name.
    pub fn get(&self, name: &str) -> Result<&Category, GuardError> {
        self.categories
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| GuardError::category_not_configured(name))
    }

    /// The first category, in registration order, whose matcher accepts `cookie_name`.
    pub fn find_for_cookie(&self, cookie_name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.matches(cookie_name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

//! Recovery of location text embedded at the end of an offense description.
//!
//! When the location cell is empty the location usually bled into the
//! offense cell. Recovery runs an ordered list of strategies; the first one
//! that matches decides the split.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::text::strip_leading_period;

/// A revised (offense, location) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSplit {
    pub offense: String,
    pub location: String,
}

/// One way of pulling a trailing location out of offense text.
pub trait LocationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns `None` when the offense text does not fit this strategy.
    fn split(&self, offense: &str) -> Option<LocationSplit>;
}

// Shortest leading offense phrase, then a trailing location that is either
// a (possibly period-prefixed) street number run, two capitalized phrases
// joined by a slash, or an all-caps phrase.
static TRAILING_LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)\s+((?:\.\d+|\d{1,5})\s.*|[A-Z].*/[A-Z].*|[A-Z\s]+)$").unwrap()
});

/// Regex split of "<offense> <trailing location>".
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailingLocationPattern;

impl LocationStrategy for TrailingLocationPattern {
    fn name(&self) -> &'static str {
        "trailing-location-pattern"
    }

    fn split(&self, offense: &str) -> Option<LocationSplit> {
        let caps = TRAILING_LOCATION_RE.captures(offense)?;
        Some(LocationSplit {
            offense: caps.get(1)?.as_str().to_string(),
            location: caps.get(2)?.as_str().to_string(),
        })
    }
}

/// Runs location strategies in order.
pub struct LocationResolver {
    strategies: Vec<Box<dyn LocationStrategy>>,
}

impl Default for LocationResolver {
    fn default() -> Self {
        Self::new(vec![Box::new(TrailingLocationPattern)])
    }
}

impl LocationResolver {
    pub fn new(strategies: Vec<Box<dyn LocationStrategy>>) -> Self {
        Self { strategies }
    }

    /// Add a strategy tried after the existing ones.
    pub fn push(&mut self, strategy: Box<dyn LocationStrategy>) {
        self.strategies.push(strategy);
    }

    /// Returns the possibly revised (offense, location).
    ///
    /// Strategies only run when `location` is empty. A single leading
    /// period is always stripped from the resulting location.
    pub fn resolve(&self, offense: &str, location: &str) -> LocationSplit {
        let mut result = LocationSplit {
            offense: offense.to_string(),
            location: location.to_string(),
        };

        if location.is_empty() {
            if let Some((name, split)) = self
                .strategies
                .iter()
                .find_map(|s| s.split(offense).map(|split| (s.name(), split)))
            {
                debug!(
                    "Recovered location {:?} from offense via {}",
                    split.location, name
                );
                result = split;
            }
        }

        result.location = strip_leading_period(&result.location).to_string();
        result
    }
}

//! Catalogue of monitored feeds and their deviation thresholds

use super::types::RegistryError;
use std::collections::HashMap;

/// Threshold applied to feeds without an explicit one (2%)
pub const DEFAULT_DEVIATION: f64 = 2.0;

/// Feeds monitored when no catalogue is configured, with their thresholds
const BUILTIN_FEEDS: &[(&str, Option<f64>)] = &[
    ("ADA-USD", Some(1.0)),
    ("ADA-IUSD", None),
    ("ADA-USDM", None),
    ("ADA-DJED", None),
    ("SHEN-ADA", None),
    ("MIN-ADA", None),
    ("FACT-ADA", None),
    ("LQ-ADA", None),
    ("SNEK-ADA", None),
    ("LENFI-ADA", None),
    ("HUNT-ADA", None),
    ("IBTC-ADA", None),
    ("IETH-ADA", None),
];

/// A monitored price pair
#[derive(Debug, Clone, PartialEq)]
pub struct Feed {
    /// Pair identifier, always upper-case (e.g. "ADA-USD")
    pub name: String,
    /// Deviation percentage that warrants an update request
    pub deviation_threshold: f64,
}

impl Feed {
    /// Create a feed with an explicit threshold
    pub fn new(name: impl Into<String>, deviation_threshold: f64) -> Self {
        Self {
            name: name.into().trim().to_uppercase(),
            deviation_threshold,
        }
    }

    /// Create a feed using the default threshold
    pub fn with_default(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_DEVIATION)
    }
}

/// Read-only feed catalogue, built once at start-up
#[derive(Debug, Clone)]
pub struct FeedRegistry {
    feeds: Vec<Feed>,
    index: HashMap<String, usize>,
    default_threshold: f64,
}

impl FeedRegistry {
    /// Build a registry from a list of feeds.
    ///
    /// Names must be non-empty and unique (case-insensitively), thresholds
    /// finite and non-negative.
    pub fn new(feeds: Vec<Feed>, default_threshold: f64) -> Result<Self, RegistryError> {
        check_threshold("<default>", default_threshold)?;

        let mut index = HashMap::with_capacity(feeds.len());
        for (i, feed) in feeds.iter().enumerate() {
            if feed.name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            check_threshold(&feed.name, feed.deviation_threshold)?;
            if index.insert(feed.name.clone(), i).is_some() {
                return Err(RegistryError::DuplicateFeed(feed.name.clone()));
            }
        }

        Ok(Self {
            feeds,
            index,
            default_threshold,
        })
    }

    /// The built-in catalogue
    pub fn builtin() -> Self {
        let feeds = builtin_feeds(DEFAULT_DEVIATION);
        let index = feeds
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();

        Self {
            feeds,
            index,
            default_threshold: DEFAULT_DEVIATION,
        }
    }

    /// The built-in catalogue, with `default_threshold` for feeds that
    /// don't carry their own
    pub fn builtin_with_default(default_threshold: f64) -> Result<Self, RegistryError> {
        Self::new(builtin_feeds(default_threshold), default_threshold)
    }

    /// Threshold for `name`, or the default when the feed is unknown
    pub fn lookup(&self, name: &str) -> f64 {
        self.get(name)
            .map(|f| f.deviation_threshold)
            .unwrap_or(self.default_threshold)
    }

    /// Get a registered feed
    pub fn get(&self, name: &str) -> Option<&Feed> {
        self.index.get(name).map(|&i| &self.feeds[i])
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Feed identifiers in catalogue order
    pub fn all_names(&self) -> Vec<&str> {
        self.feeds.iter().map(|f| f.name.as_str()).collect()
    }

    /// Iterate over feeds in catalogue order
    pub fn iter(&self) -> impl Iterator<Item = &Feed> {
        self.feeds.iter()
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    pub fn default_threshold(&self) -> f64 {
        self.default_threshold
    }
}

fn builtin_feeds(default_threshold: f64) -> Vec<Feed> {
    BUILTIN_FEEDS
        .iter()
        .map(|(name, threshold)| Feed::new(*name, threshold.unwrap_or(default_threshold)))
        .collect()
}

fn check_threshold(name: &str, threshold: f64) -> Result<(), RegistryError> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(RegistryError::InvalidThreshold {
            name: name.to_string(),
            threshold,
        })
    }
}

impl Default for FeedRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

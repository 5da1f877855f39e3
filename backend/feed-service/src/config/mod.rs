use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Feed assembly limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Page size used when the caller passes 0
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    /// Largest page a caller may request
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl FeedConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_limit = parse_var(&lookup, "FEED_MAX_LIMIT")
            .filter(|n: &u32| *n > 0)
            .unwrap_or_else(default_max_limit);
        let default_limit = parse_var(&lookup, "FEED_DEFAULT_LIMIT")
            .filter(|n: &u32| *n > 0)
            .unwrap_or_else(default_limit)
            .min(max_limit);

        Ok(Self {
            default_limit,
            max_limit,
        })
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.parse().ok())
}

fn default_limit() -> u32 {
    20
}

fn default_max_limit() -> u32 {
    100
}

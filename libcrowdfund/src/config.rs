//! Configuration management for Crowdfund
//!
//! The campaign figures and animation timings can be overridden from a TOML
//! file. Every field has a default, so a missing file or a partial file is
//! fine.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::campaign::state::{default_pledges, CampaignState, Pledge, PledgeId};
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub campaign: CampaignConfig,
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    pub goal: u64,
    pub backed_amount: u64,
    pub backers_count: u64,
    pub pledges: Vec<PledgeConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PledgeConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub min_amount: u64,
    #[serde(default)]
    pub left_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// How long the stats counters take to reach their value
    pub counter_duration_ms: u64,
    /// Sampling interval when printing counter frames
    pub frame_interval_ms: u64,
    /// Hide pledge cards again when they leave the viewport
    pub reveal_reverse: bool,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        let state = CampaignState::default();
        Self {
            goal: state.goal,
            backed_amount: state.backed_amount,
            backers_count: state.backers_count,
            pledges: default_pledges().iter().map(PledgeConfig::from).collect(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            counter_duration_ms: 1_500,
            frame_interval_ms: 100,
            reveal_reverse: false,
        }
    }
}

impl From<&Pledge> for PledgeConfig {
    fn from(pledge: &Pledge) -> Self {
        Self {
            id: pledge.id.to_string(),
            name: pledge.name.clone(),
            min_amount: pledge.min_amount,
            left_count: pledge.left_count,
        }
    }
}

impl AnimationConfig {
    pub fn counter_duration(&self) -> Duration {
        Duration::from_millis(self.counter_duration_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Config {
    /// Load configuration from the default location, falling back to
    /// defaults when no file exists there
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Build the page's starting state from the campaign section
    pub fn initial_state(&self) -> Result<CampaignState> {
        let campaign = &self.campaign;
        let mut seen = HashSet::new();
        let mut pledges = Vec::with_capacity(campaign.pledges.len());

        for pledge in &campaign.pledges {
            if pledge.id.trim().is_empty() {
                return Err(ConfigError::Invalid("pledge id cannot be empty".to_string()).into());
            }
            if !seen.insert(pledge.id.as_str()) {
                return Err(
                    ConfigError::Invalid(format!("duplicate pledge id '{}'", pledge.id)).into(),
                );
            }
            pledges.push(Pledge {
                id: PledgeId::new(pledge.id.clone()),
                name: pledge.name.clone(),
                min_amount: pledge.min_amount,
                left_count: pledge.left_count,
            });
        }

        Ok(CampaignState {
            pledges,
            backed_amount: campaign.backed_amount,
            backers_count: campaign.backers_count,
            goal: campaign.goal,
            ..CampaignState::default()
        })
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CROWDFUND_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::NoConfigDir)?;

    Ok(config_dir.join("crowdfund").join("config.toml"))
}

//! Error types for Crowdfund

use thiserror::Error;

use crate::campaign::PledgeId;

pub type Result<T> = std::result::Result<T, CrowdfundError>;

#[derive(Error, Debug)]
pub enum CrowdfundError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pledge rejected: {0}")]
    Pledge(#[from] PledgeError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CrowdfundError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CrowdfundError::InvalidInput(_) => 3,
            CrowdfundError::Config(_) => 1,
            CrowdfundError::Pledge(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the config directory for this platform; set CROWDFUND_CONFIG")]
    NoConfigDir,
}

/// Reasons the campaign reducer refuses an action.
///
/// A refused action never reaches the state: the store keeps its previous
/// value and nobody is notified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PledgeError {
    #[error("unknown pledge '{0}'")]
    UnknownPledge(PledgeId),

    #[error("pledge '{0}' is out of stock")]
    OutOfStock(PledgeId),

    #[error("pledge '{pledge}' requires at least ${min}, got ${amount}")]
    BelowMinimum {
        pledge: PledgeId,
        min: u64,
        amount: u64,
    },

    #[error("pledge '{pledge}' of ${amount} would overflow the campaign totals")]
    AmountOverflow { pledge: PledgeId, amount: u64 },
}

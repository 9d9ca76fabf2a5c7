//! Fund configuration.
//!
//! Governance parameters are fixed at fund creation: the approval rule
//! (percentage of the membership plus an absolute floor), the optional
//! funding target, and whether membership is invitation-gated.

use crate::error::{FundError, FundResult};
use crate::types::Amount;
use serde::{Deserialize, Serialize};

/// Governance and identity parameters for one fund.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FundConfig {
    /// Human-readable fund name.
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Funding target. 0 = unlimited (no target).
    #[serde(default)]
    pub target_amount: Amount,

    /// Whether membership requires a creator-issued invitation.
    #[serde(default)]
    pub is_private: bool,

    /// Percentage of the contributor membership whose approval a
    /// proposal needs, 1-100. Measured against total membership, not
    /// ballots cast.
    #[serde(default = "default_approval_percentage")]
    pub approval_percentage: u8,

    /// Absolute floor on approving votes, at least 1.
    #[serde(default = "default_minimum_votes")]
    pub minimum_votes: u32,
}

fn default_approval_percentage() -> u8 {
    60
}

fn default_minimum_votes() -> u32 {
    1
}

impl Default for FundConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            target_amount: 0,
            is_private: false,
            approval_percentage: default_approval_percentage(),
            minimum_votes: default_minimum_votes(),
        }
    }
}

impl FundConfig {
    /// Check that the parameters describe a usable fund.
    pub fn validate(&self) -> FundResult<()> {
        if self.name.trim().is_empty() {
            return Err(FundError::InvalidConfig("fund name is empty".to_string()));
        }
        if self.approval_percentage < 1 || self.approval_percentage > 100 {
            return Err(FundError::InvalidConfig(format!(
                "approval_percentage must be 1-100, got {}",
                self.approval_percentage
            )));
        }
        if self.minimum_votes < 1 {
            return Err(FundError::InvalidConfig(
                "minimum_votes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a config from TOML.
    pub fn from_toml_str(input: &str) -> FundResult<Self> {
        let config: FundConfig = toml::from_str(input)
            .map_err(|e| FundError::InvalidConfig(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// ledger-wide settings shared by every account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// length of one billing period in days
    pub pay_period_days: u32,
    /// year basis for converting an APR into a daily rate
    pub days_per_year: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            pay_period_days: 30,
            days_per_year: 365,
        }
    }
}

impl LedgerConfig {
    /// parse and validate a json config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LedgerConfig = serde_json::from_str(json)
            .map_err(|e| LedgerError::invalid_config(format!("unreadable config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pay_period_days == 0 {
            return Err(LedgerError::invalid_config("pay_period_days must be greater than 0"));
        }
        if self.days_per_year == 0 {
            return Err(LedgerError::invalid_config("days_per_year must be greater than 0"));
        }
        Ok(())
    }
}

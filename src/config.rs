use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::date::CalendarDate;
use crate::decimal::Money;
use crate::errors::{LibraryError, Result};
use crate::loan::DEFAULT_LOAN_DAYS;

/// default snapshot file written by `Library::save`
pub const DEFAULT_DATA_FILE: &str = "library_data.txt";

/// maximum number of books a member may hold at once
pub const DEFAULT_MAX_ACTIVE_LOANS: usize = 5;

/// fine charged per overdue day when a book is added without an explicit rate
pub fn default_fine_per_day() -> Money {
    Money::from_decimal(dec!(0.50))
}

/// date the registry clock starts on
pub fn default_seed_date() -> CalendarDate {
    CalendarDate::SEED
}

/// registry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default = "default_seed_date")]
    pub seed_date: CalendarDate,
    #[serde(default)]
    pub loan_policy: LoanPolicy,
}

/// circulation rules applied to every borrow and return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPolicy {
    #[serde(default = "default_loan_days")]
    pub default_loan_days: u32,
    #[serde(default = "default_max_active_loans")]
    pub max_active_loans: usize,
    #[serde(default = "default_fine_per_day")]
    pub default_fine_per_day: Money,
}

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_loan_days() -> u32 {
    DEFAULT_LOAN_DAYS
}

fn default_max_active_loans() -> usize {
    DEFAULT_MAX_ACTIVE_LOANS
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            seed_date: default_seed_date(),
            loan_policy: LoanPolicy::default(),
        }
    }
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            default_loan_days: DEFAULT_LOAN_DAYS,
            max_active_loans: DEFAULT_MAX_ACTIVE_LOANS,
            default_fine_per_day: default_fine_per_day(),
        }
    }
}

impl LoanPolicy {
    /// short loans with a higher fine, e.g. for a reference shelf
    pub fn short_term() -> Self {
        Self {
            default_loan_days: 7,
            max_active_loans: 2,
            default_fine_per_day: Money::from_major(1),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_active_loans == 0 {
            return Err(LibraryError::InvalidConfiguration {
                message: "max_active_loans must be at least 1".to_string(),
            });
        }

        if self.default_fine_per_day.is_negative() {
            return Err(LibraryError::InvalidConfiguration {
                message: format!("negative default fine: {}", self.default_fine_per_day),
            });
        }

        Ok(())
    }
}

impl LibraryConfig {
    /// parse configuration from json, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LibraryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.loan_policy.validate()
    }
}

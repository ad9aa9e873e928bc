//! Transaction-building constants.
//!
//! Minimum ADA amounts for protocol outputs, withdrawal thresholds and
//! discount schedules. Amounts are in lovelace.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Denominator for every ratio in the protocol (1.0 == 1_000_000).
pub const RATIO_MULTIPLIER: u64 = 1_000_000;

/// Default upper bound on fraction numerators and denominators.
///
/// Not yet confirmed against on-chain budgets; override through
/// [`TransactionConstants::fraction_limit`] if needed.
pub const FRACTION_LIMIT: u64 = 2_000_000;

/// Constants used when building protocol transactions.
///
/// Missing fields take their [`Default`] value when deserializing, so a
/// configuration file only needs to list overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TransactionConstants {
    pub inactive_project_utxo_ada: u64,
    pub project_detail_utxo_ada: u64,
    pub project_script_utxo_ada: u64,
    pub project_min_funds_withdrawal_ada: u64,
    pub project_funds_withdrawal_discount_ratio: u64,
    pub project_new_milestone_discount_cents: u64,
    pub project_close_discount_cents: u64,
    pub project_delist_discount_cents: u64,
    pub project_script_close_discount_cents: u64,
    pub project_script_delist_discount_cents: u64,
    pub treasury_utxo_min_ada: u64,
    pub treasury_min_withdrawal_ada: u64,
    pub treasury_withdrawal_discount_ratio: u64,
    pub treasury_revoke_discount_cents: u64,
    pub ratio_multiplier: u64,
    pub fraction_limit: u64,
}

impl Default for TransactionConstants {
    fn default() -> Self {
        Self {
            inactive_project_utxo_ada: 2_000_000,
            project_detail_utxo_ada: 2_000_000,
            project_script_utxo_ada: 20_000_000,
            project_min_funds_withdrawal_ada: 100_000_000,
            project_funds_withdrawal_discount_ratio: 100,
            project_new_milestone_discount_cents: 100,
            project_close_discount_cents: 50,
            project_delist_discount_cents: 50,
            project_script_close_discount_cents: 50,
            project_script_delist_discount_cents: 50,
            treasury_utxo_min_ada: 2_000_000,
            treasury_min_withdrawal_ada: 100_000_000,
            treasury_withdrawal_discount_ratio: 100,
            treasury_revoke_discount_cents: 50,
            ratio_multiplier: RATIO_MULTIPLIER,
            fraction_limit: FRACTION_LIMIT,
        }
    }
}

impl TransactionConstants {
    /// Check that every divisor and ledger minimum is non-zero.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("ratioMultiplier", self.ratio_multiplier),
            ("fractionLimit", self.fraction_limit),
            (
                "projectFundsWithdrawalDiscountRatio",
                self.project_funds_withdrawal_discount_ratio,
            ),
            (
                "treasuryWithdrawalDiscountRatio",
                self.treasury_withdrawal_discount_ratio,
            ),
            ("inactiveProjectUtxoAda", self.inactive_project_utxo_ada),
            ("projectDetailUtxoAda", self.project_detail_utxo_ada),
            ("projectScriptUtxoAda", self.project_script_utxo_ada),
            ("treasuryUtxoMinAda", self.treasury_utxo_min_ada),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero(field));
            }
        }
        Ok(())
    }

    /// Validate and return the constants.
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Parse constants (or overrides of them) from JSON and validate.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let constants: Self = serde_json::from_str(content)?;
        constants.validated()
    }

    /// Load constants from a JSON file and validate.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let constants = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded transaction constants");
        Ok(constants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let constants = TransactionConstants::default();
        constants.validate().unwrap();
        assert_eq!(constants.ratio_multiplier, 1_000_000);
        assert_eq!(constants.fraction_limit, 2_000_000);
    }

    #[test]
    fn test_partial_override() {
        let constants = TransactionConstants::from_json_str(r#"{"fractionLimit": 4000000}"#).unwrap();
        assert_eq!(constants.fraction_limit, 4_000_000);
        assert_eq!(constants.project_script_utxo_ada, 20_000_000);
    }

    #[test]
    fn test_zero_divisor_rejected() {
        assert!(matches!(
            TransactionConstants::from_json_str(r#"{"treasuryWithdrawalDiscountRatio": 0}"#),
            Err(ConfigError::Zero("treasuryWithdrawalDiscountRatio"))
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            TransactionConstants::from_json_str(r#"{"fractionLimt": 1}"#),
            Err(ConfigError::Parse(_))
        ));
    }
}

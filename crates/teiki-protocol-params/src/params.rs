//! Protocol parameters that are not inputs to script hashing.
//!
//! These are consumed by transaction building: fee schedules, share ratios,
//! milestone thresholds and waiting periods. Ratios are expressed against
//! [`RATIO_MULTIPLIER`]; durations are in milliseconds.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::RATIO_MULTIPLIER;
use crate::error::{ConfigError, Result};

/// A duration in milliseconds, serialized as `{ "milliseconds": n }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DurationMillis {
    pub milliseconds: u64,
}

impl DurationMillis {
    pub const fn from_millis(milliseconds: u64) -> Self {
        Self { milliseconds }
    }

    pub const fn is_zero(&self) -> bool {
        self.milliseconds == 0
    }
}

/// The non-script protocol parameter table.
///
/// Unsigned fields make negative values unrepresentable; JSON containing one
/// fails to parse. Construct once, [`validate`](Self::validate), then share by
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProtocolNonScriptParams {
    pub governor_share_ratio: u64,
    pub protocol_funds_share_ratio: u64,
    pub discount_cent_price: u64,
    /// Backing thresholds (lovelace) at which a project reaches a milestone.
    pub project_milestones: Vec<u64>,
    pub teiki_coefficient: u64,
    /// Share of a project's teiki burned per epoch.
    pub project_teiki_burn_rate: u64,
    pub epoch_length: DurationMillis,
    pub project_pledge: u64,
    pub project_creation_fee: u64,
    pub project_sponsorship_fee: u64,
    pub project_sponsorship_duration: DurationMillis,
    pub project_information_update_fee: u64,
    pub project_community_update_fee: u64,
    pub min_treasury_per_milestone_event: u64,
    pub stake_key_deposit: u64,
    pub proposal_waiting_period: DurationMillis,
    pub project_delist_waiting_period: DurationMillis,
}

impl Default for ProtocolNonScriptParams {
    /// The sample values used by the reference deployment.
    ///
    /// Provisional: deployments are expected to load their own table.
    fn default() -> Self {
        Self {
            governor_share_ratio: 800_000,      // 80%
            protocol_funds_share_ratio: 100_000, // 10%
            discount_cent_price: 10_000,
            project_milestones: vec![1_000_000_000, 5_000_000_000, 10_000_000_000],
            teiki_coefficient: 500,
            project_teiki_burn_rate: 50_000, // 5% per epoch
            epoch_length: DurationMillis::from_millis(200_000), // 10 blocks
            project_pledge: 100_000_000,
            project_creation_fee: 10_000_000,
            project_sponsorship_fee: 50_000_000,
            project_sponsorship_duration: DurationMillis::from_millis(86_400_000), // 1 day
            project_information_update_fee: 4_000_000,
            project_community_update_fee: 2_000_000,
            min_treasury_per_milestone_event: 10,
            stake_key_deposit: 2_000_000,
            proposal_waiting_period: DurationMillis::from_millis(20_000), // 1 block
            project_delist_waiting_period: DurationMillis::from_millis(20_000),
        }
    }
}

impl ProtocolNonScriptParams {
    /// Check the table's invariants.
    ///
    /// - every ratio is at most [`RATIO_MULTIPLIER`], and the governor and
    ///   protocol funds shares together are too
    /// - milestones are non-empty and strictly increasing
    /// - the epoch length and sponsorship duration are non-zero
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("governorShareRatio", self.governor_share_ratio),
            ("protocolFundsShareRatio", self.protocol_funds_share_ratio),
            ("projectTeikiBurnRate", self.project_teiki_burn_rate),
        ] {
            if value > RATIO_MULTIPLIER {
                return Err(ConfigError::RatioOutOfRange {
                    field,
                    value,
                    max: RATIO_MULTIPLIER,
                });
            }
        }

        let sum = self.governor_share_ratio + self.protocol_funds_share_ratio;
        if sum > RATIO_MULTIPLIER {
            return Err(ConfigError::SharesExceedWhole {
                sum,
                max: RATIO_MULTIPLIER,
            });
        }

        if self.project_milestones.is_empty() {
            return Err(ConfigError::NoMilestones);
        }
        for (index, pair) in self.project_milestones.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ConfigError::MilestonesNotIncreasing {
                    index: index + 1,
                    prev: pair[0],
                    next: pair[1],
                });
            }
        }

        if self.epoch_length.is_zero() {
            return Err(ConfigError::Zero("epochLength"));
        }
        if self.project_sponsorship_duration.is_zero() {
            return Err(ConfigError::Zero("projectSponsorshipDuration"));
        }

        Ok(())
    }

    /// Validate and return the table.
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Parse a table from JSON and validate it.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(content)?;
        params.validated()
    }

    /// Load a table from a JSON file and validate it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let params = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded protocol params");
        Ok(params)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        ProtocolNonScriptParams::default().validate().unwrap();
    }

    #[test]
    fn test_ratio_above_multiplier() {
        let params = ProtocolNonScriptParams {
            project_teiki_burn_rate: RATIO_MULTIPLIER + 1,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::RatioOutOfRange {
                field: "projectTeikiBurnRate",
                ..
            })
        ));
    }

    #[test]
    fn test_shares_exceed_whole() {
        let params = ProtocolNonScriptParams {
            governor_share_ratio: 900_000,
            protocol_funds_share_ratio: 200_000,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::SharesExceedWhole { sum: 1_100_000, .. })
        ));
    }

    #[test]
    fn test_milestones_must_increase() {
        let params = ProtocolNonScriptParams {
            project_milestones: vec![10, 20, 20],
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::MilestonesNotIncreasing {
                index: 2,
                prev: 20,
                next: 20
            })
        ));

        let params = ProtocolNonScriptParams {
            project_milestones: vec![],
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(ConfigError::NoMilestones)));
    }

    #[test]
    fn test_zero_epoch_rejected() {
        let params = ProtocolNonScriptParams {
            epoch_length: DurationMillis::from_millis(0),
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(ConfigError::Zero("epochLength"))));
    }

    #[test]
    fn test_json_roundtrip_uses_camel_case() {
        let json = ProtocolNonScriptParams::default().to_json_pretty().unwrap();
        assert!(json.contains("\"governorShareRatio\": 800000"));
        assert!(json.contains("\"epochLength\": {\n    \"milliseconds\": 200000\n  }"));

        let back = ProtocolNonScriptParams::from_json_str(&json).unwrap();
        assert_eq!(back, ProtocolNonScriptParams::default());
    }

    #[test]
    fn test_negative_value_fails_to_parse() {
        let json = ProtocolNonScriptParams::default()
            .to_json_pretty()
            .unwrap()
            .replace("\"teikiCoefficient\": 500", "\"teikiCoefficient\": -500");
        assert!(matches!(
            ProtocolNonScriptParams::from_json_str(&json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file_validates() {
        let mut params = ProtocolNonScriptParams::default();
        params.project_milestones = vec![5, 1];

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&params).unwrap().as_bytes())
            .unwrap();

        assert!(matches!(
            ProtocolNonScriptParams::from_file(file.path()),
            Err(ConfigError::MilestonesNotIncreasing { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ProtocolNonScriptParams::from_file(&dir.path().join("absent.json")),
            Err(ConfigError::Io(_))
        ));
    }
}

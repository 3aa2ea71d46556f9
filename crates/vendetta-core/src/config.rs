//! Configuration loading and typed config structures for Vendetta.
//!
//! The canonical configuration lives in `vendetta-config.yaml` next to
//! the server data directory. This module defines strongly-typed
//! structs that mirror the YAML structure and provides a loader that
//! reads and validates the file. Every field has a default matching the
//! shipped configuration, so a missing file or a partial file is always
//! usable.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Vendetta configuration.
///
/// Mirrors the structure of `vendetta-config.yaml`. All fields have
/// defaults matching the shipped configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VendettaConfig {
    /// Master switch and general behavior.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Payment item and bounty placement floor.
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Claiming rules (placer reclaim, self-claim).
    #[serde(default)]
    pub claiming: ClaimingConfig,

    /// Leaderboard crediting rules.
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,

    /// Map marker settings for bountied players.
    #[serde(default)]
    pub map_icons: MapIconConfig,

    /// Assassin contract offer cycle settings.
    #[serde(default)]
    pub contracts: ContractConfig,

    /// Clan-betrayal cooldown settings.
    #[serde(default)]
    pub betrayal: BetrayalConfig,
}

impl VendettaConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Master switch for the whole bounty system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneralConfig {
    /// Enable or disable every Vendetta feature at once.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

/// Payment item identity and the bounty placement floor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentConfig {
    /// Host prefab id of the item bounties are paid in.
    #[serde(default = "default_item_guid")]
    pub item_guid: i32,

    /// Display name for the payment item.
    #[serde(default = "default_item_name")]
    pub item_name: String,

    /// Minimum amount of the payment item required to place a bounty.
    #[serde(default = "default_minimum_bounty")]
    pub minimum_bounty: i64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            item_guid: default_item_guid(),
            item_name: default_item_name(),
            minimum_bounty: default_minimum_bounty(),
        }
    }
}

/// Rules for how bounties can be claimed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClaimingConfig {
    /// When `true`, a placer who kills their own target forfeits the
    /// escrow (the bounty is voided without payout). When `false`, the
    /// escrow is returned to the placer.
    #[serde(default = "default_true")]
    pub forbid_placer_reclaim: bool,

    /// When `true`, a bountied player can claim their own bounty by
    /// scoring kills while bountied.
    #[serde(default = "default_true")]
    pub enable_self_claim: bool,

    /// Kills a bountied player must score to self-claim.
    #[serde(default = "default_kills_for_self_claim")]
    pub kills_for_self_claim: u32,
}

impl Default for ClaimingConfig {
    fn default() -> Self {
        Self {
            forbid_placer_reclaim: default_true(),
            enable_self_claim: default_true(),
            kills_for_self_claim: default_kills_for_self_claim(),
        }
    }
}

/// Which claim paths add to the leaderboard score.
///
/// Third-party claims and contract completions always credit the
/// leaderboard; these switches cover the two ambiguous paths.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeaderboardConfig {
    /// Credit the target when they self-claim their own bounty.
    #[serde(default = "default_true")]
    pub self_claim_adds_to_score: bool,

    /// Credit the placer when they reclaim their own escrow.
    #[serde(default = "default_false")]
    pub placer_reclaim_adds_to_score: bool,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            self_claim_adds_to_score: default_true(),
            placer_reclaim_adds_to_score: default_false(),
        }
    }
}

/// Map marker settings for bountied players.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MapIconConfig {
    /// Show a map marker on players with an active bounty.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Host prefab id of the marker.
    #[serde(default = "default_icon_guid")]
    pub icon_guid: i32,
}

impl Default for MapIconConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            icon_guid: default_icon_guid(),
        }
    }
}

/// Assassin contract offer cycle settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractConfig {
    /// Enable the periodic contract offers.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum seconds between offer attempts.
    #[serde(default = "default_offer_min_interval")]
    pub offer_min_interval_secs: i64,

    /// Maximum seconds between offer attempts.
    #[serde(default = "default_offer_max_interval")]
    pub offer_max_interval_secs: i64,

    /// Minimum kills a contract can require.
    #[serde(default = "default_min_kills")]
    pub min_kills: u32,

    /// Maximum kills a contract can require.
    #[serde(default = "default_max_kills")]
    pub max_kills: u32,

    /// Seconds a holder has to complete a contract.
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: i64,

    /// Minimum reward for completing a contract.
    #[serde(default = "default_min_reward")]
    pub min_reward: i64,

    /// Maximum reward for completing a contract. When `min_reward` is
    /// at least this value, `min_reward` is used exactly.
    #[serde(default = "default_max_reward")]
    pub max_reward: i64,

    /// Cap on simultaneously active contracts; 0 means unlimited.
    #[serde(default = "default_max_active")]
    pub max_active: usize,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            offer_min_interval_secs: default_offer_min_interval(),
            offer_max_interval_secs: default_offer_max_interval(),
            min_kills: default_min_kills(),
            max_kills: default_max_kills(),
            time_limit_secs: default_time_limit(),
            min_reward: default_min_reward(),
            max_reward: default_max_reward(),
            max_active: default_max_active(),
        }
    }
}

/// Clan-betrayal cooldown settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BetrayalConfig {
    /// Prevent kills between recent clanmates from resolving bounties
    /// or advancing contracts.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds the protection lasts after leaving a clan.
    #[serde(default = "default_betrayal_cooldown")]
    pub cooldown_secs: i64,
}

impl Default for BetrayalConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            cooldown_secs: default_betrayal_cooldown(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}

const fn default_false() -> bool {
    false
}

const fn default_item_guid() -> i32 {
    576_389_135
}

fn default_item_name() -> String {
    String::from("Greater Stygian Shard")
}

const fn default_minimum_bounty() -> i64 {
    500
}

const fn default_kills_for_self_claim() -> u32 {
    5
}

const fn default_icon_guid() -> i32 {
    1_501_929_529
}

const fn default_offer_min_interval() -> i64 {
    7_200
}

const fn default_offer_max_interval() -> i64 {
    14_400
}

const fn default_min_kills() -> u32 {
    3
}

const fn default_max_kills() -> u32 {
    7
}

const fn default_time_limit() -> i64 {
    2_700
}

const fn default_min_reward() -> i64 {
    1_000
}

const fn default_max_reward() -> i64 {
    5_000
}

const fn default_max_active() -> usize {
    3
}

const fn default_betrayal_cooldown() -> i64 {
    14_400
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_configuration() {
        let config = VendettaConfig::default();
        assert!(config.general.enabled);
        assert_eq!(config.payment.minimum_bounty, 500);
        assert_eq!(config.payment.item_name, "Greater Stygian Shard");
        assert!(config.claiming.forbid_placer_reclaim);
        assert_eq!(config.claiming.kills_for_self_claim, 5);
        assert!(!config.leaderboard.placer_reclaim_adds_to_score);
        assert_eq!(config.contracts.offer_min_interval_secs, 7_200);
        assert_eq!(config.contracts.max_active, 3);
        assert_eq!(config.betrayal.cooldown_secs, 14_400);
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let config = VendettaConfig::parse(
            "claiming:\n  forbid_placer_reclaim: false\ncontracts:\n  max_active: 10\n",
        )
        .unwrap();
        assert!(!config.claiming.forbid_placer_reclaim);
        assert_eq!(config.contracts.max_active, 10);
        // Untouched sections keep their defaults.
        assert!(config.general.enabled);
        assert_eq!(config.payment.minimum_bounty, 500);
    }

    #[test]
    fn invalid_yaml_is_a_yaml_error() {
        let result = VendettaConfig::parse("general: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn from_file_reads_a_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vendetta-config.yaml");
        std::fs::write(&path, "general:\n  enabled: false\n").unwrap();

        let config = VendettaConfig::from_file(&path).unwrap();
        assert!(!config.general.enabled);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = VendettaConfig::from_file(Path::new("/nonexistent/vendetta.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}

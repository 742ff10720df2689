//! Node settings, loadable from TOML.

use serde::{Deserialize, Serialize};

use plenum_timelock::round::{DRAND_MAINNET_URL, QUICKNET_CHAIN_HASH};
use plenum_timelock::{BeaconClient, BeaconInfo, BeaconVerifier};
use plenum_types::ActorAddress;

use crate::NodeError;

/// The randomness beacon a node seals ballots against.
///
/// Defaults to drand quicknet; tests point it at a locally-keyed beacon.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BeaconConfig {
    /// Hex-encoded compressed G2 public key of the beacon network.
    pub public_key: String,

    /// Seconds between beacon rounds.
    pub period: u64,

    /// Publication time of round 1, in Unix seconds.
    pub genesis_time: u64,
}

impl BeaconConfig {
    /// The drand quicknet chain (3-second rounds, unchained signatures).
    pub fn quicknet() -> Self {
        let info = BeaconInfo::quicknet();
        Self {
            public_key: hex::encode(&info.public_key),
            period: info.period,
            genesis_time: info.genesis_time,
        }
    }
}

/// Configuration for a Plenum governance node.
///
/// Deployments read it from a TOML file via [`NodeConfig::from_toml_file`];
/// tests construct it directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Address seeded as the first approved editor on an empty registry.
    #[serde(default = "default_genesis_editor")]
    pub genesis_editor: String,

    /// Base URL of the beacon HTTP relay.
    #[serde(default = "default_relay_url")]
    pub relay_url: String,

    /// Chain hash selecting which beacon network the relay serves.
    #[serde(default = "default_chain_hash")]
    pub chain_hash: Option<String>,

    /// Output encoding for logs, `"human"` or `"json"`.
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Filter directive for tracing, e.g. `"info"` or
    /// `"debug,plenum_node=trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Beacon chain parameters used for sealing and round scheduling.
    #[serde(default = "BeaconConfig::quicknet")]
    pub beacon: BeaconConfig,
}

// ── Defaults ───────────────────────────────────────────────────────────

fn default_genesis_editor() -> String {
    "0x0000000000000000000000000000000000000001".to_string()
}

fn default_relay_url() -> String {
    DRAND_MAINNET_URL.to_string()
}

fn default_chain_hash() -> Option<String> {
    Some(QUICKNET_CHAIN_HASH.to_string())
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Loading ────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Read and parse a TOML config file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Render the config back out as TOML.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("NodeConfig is always serializable to TOML")
    }

    /// Decode the configured beacon parameters.
    ///
    /// Rejects a zero round period and non-hex public keys before any
    /// engine sees them.
    pub fn beacon_info(&self) -> Result<BeaconInfo, NodeError> {
        if self.beacon.period == 0 {
            return Err(NodeError::Config("beacon period must be non-zero".into()));
        }
        let public_key = hex::decode(&self.beacon.public_key)
            .map_err(|e| NodeError::Config(format!("beacon public key: {e}")))?;
        Ok(BeaconInfo::new(
            public_key,
            self.beacon.period,
            self.beacon.genesis_time,
        ))
    }

    /// Parse the configured genesis editor address.
    pub fn genesis_editor(&self) -> Result<ActorAddress, NodeError> {
        Ok(ActorAddress::parse(&self.genesis_editor)?)
    }

    /// Build a relay client that verifies fetched beacons against the
    /// configured public key.
    pub fn beacon_client(&self) -> Result<BeaconClient, NodeError> {
        let info = self.beacon_info()?;
        let verifier = BeaconVerifier::new(&info.public_key)?;
        let client = match &self.chain_hash {
            Some(hash) => BeaconClient::with_chain(&self.relay_url, hash),
            None => BeaconClient::with_url(&self.relay_url),
        };
        Ok(client.with_verifier(verifier))
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            genesis_editor: default_genesis_editor(),
            relay_url: default_relay_url(),
            chain_hash: default_chain_hash(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            beacon: BeaconConfig::quicknet(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string();
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.genesis_editor, config.genesis_editor);
        assert_eq!(parsed.beacon.genesis_time, config.beacon.genesis_time);
        assert_eq!(parsed.chain_hash, config.chain_hash);
    }

    #[test]
    fn minimal_toml_uses_quicknet_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.beacon.period, 3);
        assert_eq!(config.beacon.genesis_time, 1_692_803_367);
        assert_eq!(config.relay_url, DRAND_MAINNET_URL);
        assert_eq!(config.chain_hash.as_deref(), Some(QUICKNET_CHAIN_HASH));
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            genesis_editor = "0x00000000000000000000000000000000000000aa"
            log_level = "debug"
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(
            config.genesis_editor,
            "0x00000000000000000000000000000000000000aa"
        );
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.beacon.period, 3); // default
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/plenum.toml");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }

    #[test]
    fn config_loads_from_a_file_on_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("plenum.toml");
        std::fs::write(&path, NodeConfig::default().to_toml_string()).expect("write");
        let config = NodeConfig::from_toml_file(path.to_str().expect("utf8 path"))
            .expect("should load");
        assert_eq!(config.beacon.period, 3);
    }

    #[test]
    fn quicknet_key_decodes_to_a_g2_point() {
        let info = NodeConfig::default().beacon_info().expect("valid default");
        assert_eq!(info.public_key.len(), 96);
    }

    #[test]
    fn zero_period_is_rejected() {
        let mut config = NodeConfig::default();
        config.beacon.period = 0;
        assert!(matches!(config.beacon_info(), Err(NodeError::Config(_))));
    }

    #[test]
    fn bad_public_key_hex_is_rejected() {
        let mut config = NodeConfig::default();
        config.beacon.public_key = "not hex".into();
        assert!(matches!(config.beacon_info(), Err(NodeError::Config(_))));
    }

    #[test]
    fn malformed_genesis_editor_is_rejected() {
        let mut config = NodeConfig::default();
        config.genesis_editor = "not-an-address".into();
        assert!(matches!(
            config.genesis_editor(),
            Err(NodeError::Types(_))
        ));
    }

    #[test]
    fn default_relay_client_is_constructible() {
        assert!(NodeConfig::default().beacon_client().is_ok());
    }
}

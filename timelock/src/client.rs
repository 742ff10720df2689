//! HTTP client for drand relays.
//!
//! Fetches round beacons and chain metadata over a relay's public API and,
//! when a verifier is attached, checks every beacon before handing it out.
//! Verified signatures can be synced into a [`BeaconCache`] for offline
//! ballot counting.

use std::time::Duration;

use serde::Deserialize;

use crate::error::TimelockError;
use crate::oracle::BeaconCache;
use crate::round::{BeaconInfo, DRAND_MAINNET_URL, QUICKNET_CHAIN_HASH};
use crate::verify::{BeaconVerifier, RoundBeacon};

/// Chain metadata as served by a relay's `/info` endpoint.
#[derive(Debug, Clone, Deserialize)]
struct InfoResponse {
    /// Hex-encoded compressed G2 public key.
    public_key: String,
    /// Seconds between rounds.
    period: u64,
    /// Publication time of round 1, in Unix seconds.
    genesis_time: u64,
}

impl InfoResponse {
    fn into_info(self) -> Result<BeaconInfo, TimelockError> {
        let public_key = hex::decode(&self.public_key)
            .map_err(|e| TimelockError::InvalidPublicKey(format!("hex decode: {e}")))?;
        if self.period == 0 {
            return Err(TimelockError::BeaconFetch(
                "relay reported a zero round period".into(),
            ));
        }
        Ok(BeaconInfo::new(public_key, self.period, self.genesis_time))
    }
}

/// HTTP client for fetching beacons from a drand relay.
///
/// Beacons are produced by the League of Entropy's distributed key generation
/// network; each carries a BLS signature verifiable against the network's
/// public key.
pub struct BeaconClient {
    /// Base URL of the HTTP relay.
    base_url: String,
    /// Shared HTTP connection pool.
    client: reqwest::Client,
    /// Chain hash selecting which network to query.
    chain_hash: Option<String>,
    /// Optional verifier; when set, every fetched beacon is checked.
    verifier: Option<BeaconVerifier>,
}

impl BeaconClient {
    /// Client pointing at the drand mainnet relay, no verification.
    pub fn new() -> Self {
        Self::with_url(DRAND_MAINNET_URL)
    }

    /// Client pointing at a custom relay URL.
    pub fn with_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            chain_hash: None,
            verifier: None,
        }
    }

    /// Client with a specific chain hash for network selection.
    pub fn with_chain(base_url: &str, chain_hash: &str) -> Self {
        Self {
            chain_hash: Some(chain_hash.to_string()),
            ..Self::with_url(base_url)
        }
    }

    /// Client for drand quicknet with full BLS verification.
    pub fn quicknet() -> Result<Self, TimelockError> {
        let verifier = BeaconVerifier::new(&BeaconInfo::quicknet().public_key)?;
        Ok(Self {
            chain_hash: Some(QUICKNET_CHAIN_HASH.to_string()),
            verifier: Some(verifier),
            ..Self::with_url(DRAND_MAINNET_URL)
        })
    }

    /// Attach a verifier so every fetched beacon is checked.
    pub fn with_verifier(mut self, verifier: BeaconVerifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// API path prefix, incorporating the chain hash if set.
    fn api_prefix(&self) -> String {
        match &self.chain_hash {
            Some(hash) => format!("{}/{}", self.base_url, hash),
            None => self.base_url.clone(),
        }
    }

    /// Fetch the chain metadata needed for round scheduling and sealing.
    pub async fn fetch_info(&self) -> Result<BeaconInfo, TimelockError> {
        let url = format!("{}/info", self.api_prefix());
        let resp = self.get(&url).await?;
        let info: InfoResponse = resp
            .json()
            .await
            .map_err(|e| TimelockError::BeaconFetch(e.to_string()))?;
        info.into_info()
    }

    /// Fetch the latest published beacon.
    pub async fn fetch_latest(&self) -> Result<RoundBeacon, TimelockError> {
        let url = format!("{}/public/latest", self.api_prefix());
        let beacon = self.fetch_beacon_from(&url).await?;
        self.maybe_verify(&beacon)?;
        Ok(beacon)
    }

    /// Fetch a specific round.
    pub async fn fetch_round(&self, round: u64) -> Result<RoundBeacon, TimelockError> {
        let url = format!("{}/public/{}", self.api_prefix(), round);
        let beacon = self.fetch_beacon_from(&url).await?;
        self.maybe_verify(&beacon)?;
        Ok(beacon)
    }

    /// Fetch a round, fully verify it, and store its signature in the cache.
    ///
    /// Requires an attached verifier; unverified signatures never enter a
    /// cache that ballot counting reads from.
    pub async fn sync_round(&self, round: u64, cache: &BeaconCache) -> Result<(), TimelockError> {
        let verifier = self
            .verifier
            .as_ref()
            .ok_or_else(|| TimelockError::BeaconFetch("syncing requires a verifier".into()))?;
        let url = format!("{}/public/{}", self.api_prefix(), round);
        let beacon = self.fetch_beacon_from(&url).await?;
        verifier.verify_beacon(&beacon)?;
        let signature = hex::decode(&beacon.signature)
            .map_err(|e| TimelockError::InvalidSignature(format!("hex decode: {e}")))?;
        cache.insert(beacon.round, signature);
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, TimelockError> {
        let resp = self
            .client
            .get(url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| TimelockError::BeaconFetch(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(TimelockError::BeaconFetch(format!(
                "HTTP {} from {}",
                resp.status(),
                url
            )));
        }
        Ok(resp)
    }

    async fn fetch_beacon_from(&self, url: &str) -> Result<RoundBeacon, TimelockError> {
        let resp = self.get(url).await?;
        resp.json()
            .await
            .map_err(|e| TimelockError::BeaconFetch(e.to_string()))
    }

    fn maybe_verify(&self, beacon: &RoundBeacon) -> Result<(), TimelockError> {
        match &self.verifier {
            Some(verifier) => verifier.verify_beacon(beacon),
            None => Ok(()),
        }
    }
}

impl Default for BeaconClient {
    fn default() -> Self {
        Self::new()
    }
}

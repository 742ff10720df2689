use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimelockError {
    #[error("beacon round {round} has not been published yet")]
    RoundNotYetPublished { round: u64 },

    #[error("invalid beacon public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid round signature: {0}")]
    InvalidSignature(String),

    #[error("ciphertext failed its integrity check")]
    InvalidCiphertext,

    #[error("malformed sealed ballot: {0}")]
    MalformedBallot(String),

    #[error("failed to fetch beacon: {0}")]
    BeaconFetch(String),

    #[error("beacon round {round} failed BLS verification")]
    BeaconVerification { round: u64 },

    #[error("system randomness unavailable: {0}")]
    Entropy(String),
}

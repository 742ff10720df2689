//! Append-only event log with a Blake2b hash chain and synchronous fan-out.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use std::sync::Mutex;
use thiserror::Error;

use crate::event::{EventRecord, GovernanceEvent};

type Blake2b256 = Blake2b<U32>;

type Listener = Box<dyn Fn(&EventRecord) + Send + Sync>;

/// Digest of the record at `seq` given its predecessor's digest.
fn chain_digest(prev: &[u8; 32], seq: u64, event_bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(prev);
    hasher.update(seq.to_be_bytes());
    hasher.update(event_bytes);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// A broken link in an event chain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainViolation {
    #[error("record at position {position} has sequence {found}, expected {expected}")]
    SequenceGap {
        position: usize,
        expected: u64,
        found: u64,
    },

    #[error("record {seq} has a digest that does not commit to its predecessor")]
    DigestMismatch { seq: u64 },
}

/// Append-only event log with synchronous listener fan-out.
///
/// Sequence numbers start at 0 and are dense. Listeners are invoked inline on
/// the appending thread after the record is stored; keep handlers fast and do
/// not call back into the log from a handler.
pub struct EventLog {
    records: Mutex<Vec<EventRecord>>,
    listeners: Mutex<Vec<Listener>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Append an event, returning its sequence number.
    pub fn append(&self, event: GovernanceEvent) -> u64 {
        let event_bytes = bincode::serialize(&event).expect("serialize governance event");
        let record = {
            let mut records = self.records.lock().unwrap();
            let seq = records.len() as u64;
            let prev = records.last().map(|r| r.digest).unwrap_or([0u8; 32]);
            let record = EventRecord {
                seq,
                digest: chain_digest(&prev, seq, &event_bytes),
                event,
            };
            records.push(record.clone());
            record
        };
        for listener in self.listeners.lock().unwrap().iter() {
            listener(&record);
        }
        record.seq
    }

    pub fn subscribe(&self, listener: Listener) {
        self.listeners.lock().unwrap().push(listener);
    }

    /// Snapshot of all records in append order.
    pub fn records(&self) -> Vec<EventRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }

    /// Digest of the newest record, if any.
    pub fn head_digest(&self) -> Option<[u8; 32]> {
        self.records.lock().unwrap().last().map(|r| r.digest)
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that `records` form an unbroken chain from sequence 0.
pub fn verify_chain(records: &[EventRecord]) -> Result<(), ChainViolation> {
    let mut prev = [0u8; 32];
    for (position, record) in records.iter().enumerate() {
        if record.seq != position as u64 {
            return Err(ChainViolation::SequenceGap {
                position,
                expected: position as u64,
                found: record.seq,
            });
        }
        let event_bytes =
            bincode::serialize(&record.event).expect("serialize governance event");
        if record.digest != chain_digest(&prev, record.seq, &event_bytes) {
            return Err(ChainViolation::DigestMismatch { seq: record.seq });
        }
        prev = record.digest;
    }
    Ok(())
}

//! Deterministic stand-ins for the workspace's external dependencies.
//!
//! The governance core reaches the outside world through three seams: the
//! clock, the randomness beacon, and the power snapshots. Each gets an
//! in-process replacement here that returns reproducible values, advances
//! only when told to, and never opens a socket.
//!
//! Tests construct these in place of the real implementations.

pub mod beacon;
pub mod clock;
pub mod power;

pub use beacon::NullBeacon;
pub use clock::NullClock;
pub use power::NullPowerOracle;

//! The weighted tally fold.

use std::sync::Arc;

use plenum_events::{EventLog, GovernanceEvent};
use plenum_store::{BallotStore, ProposalStore, StoreError};
use plenum_timelock::{BeaconInfo, BeaconVerifier, RoundOracle, SealedBallot, TimelockCipher};
use plenum_types::{
    PowerSnapshot, ProposalId, ProposalOutcome, Role, RolePercentages, TallyResult, Timestamp,
    VoteOption,
};

use crate::error::TallyError;
use crate::power::PowerOracle;

/// Scale of per-role voting ratios: parts per million.
const PPM: u128 = 1_000_000;

/// Scale of the final result: basis points.
const BPS: u128 = 10_000;

/// One role's slice of the count, kept for independent audit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoleTally {
    pub role: Role,
    /// Network-wide power in this role on the snapshot day.
    pub total_power: u128,
    pub approve_power: u128,
    pub reject_power: u128,
    /// False when the network held no power in this role, which removes the
    /// role from both numerator and denominator.
    pub counted: bool,
}

/// The full result of counting one proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TallyOutcome {
    pub proposal: ProposalId,
    pub result: TallyResult,
    /// Per-role breakdown in [`Role::ALL`] order.
    pub roles: Vec<RoleTally>,
    /// Ballots that opened to a valid choice.
    pub revealed: u64,
    /// Ballots that failed authenticated decryption and were skipped.
    pub discarded: u64,
}

/// Counts closed proposals.
///
/// The count is a pure fold over fixed inputs: the stored ballots, the round
/// signature, and the day's power snapshots. Identical inputs give identical
/// output bytes, which is what makes the one-shot commit below race-safe.
pub struct TallyEngine<S> {
    store: Arc<S>,
    events: Arc<EventLog>,
    cipher: TimelockCipher,
    verifier: BeaconVerifier,
}

impl<S: ProposalStore + BallotStore> TallyEngine<S> {
    pub fn new(
        store: Arc<S>,
        events: Arc<EventLog>,
        beacon: &BeaconInfo,
    ) -> Result<Self, TallyError> {
        Ok(Self {
            store,
            events,
            cipher: TimelockCipher::from_info(beacon)?,
            verifier: BeaconVerifier::new(&beacon.public_key)?,
        })
    }

    /// Open every ballot of a closed proposal, weigh the revealed choices by
    /// role power, and commit the outcome.
    ///
    /// The first successful call commits the result and emits
    /// `ProposalCounted`; any later or concurrent call computes the identical
    /// fold and observes the already-stored commit. A ballot that fails
    /// authenticated decryption is skipped and reported in `discarded`.
    pub fn count_votes(
        &self,
        id: ProposalId,
        power: &dyn PowerOracle,
        rounds: &dyn RoundOracle,
        now: Timestamp,
    ) -> Result<TallyOutcome, TallyError> {
        let proposal = match self.store.proposal(id) {
            Ok(p) => p,
            Err(StoreError::NotFound(_)) => return Err(TallyError::UnknownProposal(id)),
            Err(e) => return Err(e.into()),
        };
        if proposal.cancelled {
            return Err(TallyError::ProposalCancelled(id));
        }
        if now < proposal.end_time {
            return Err(TallyError::VotingStillOpen {
                until: proposal.end_time,
            });
        }

        let signature = rounds.signature_for(proposal.reveal_round)?;
        // Checked once up front: a signature the network never issued must
        // abort the count, not discard every ballot into a zero result.
        self.verifier
            .verify_round(proposal.reveal_round, &signature)?;

        let day = proposal.snapshot_day;
        let mut approve = PowerSnapshot::ZERO;
        let mut reject = PowerSnapshot::ZERO;
        let mut revealed: u64 = 0;
        let mut discarded: u64 = 0;
        for ballot in self.store.ballots_for(id)? {
            let vote = SealedBallot::from_bytes(&ballot.sealed)
                .and_then(|sealed| self.cipher.reveal(&sealed, &signature));
            let Ok(vote) = vote else {
                discarded += 1;
                continue;
            };
            revealed += 1;
            let snapshot = power.power_of(&ballot.voter, day);
            match vote {
                VoteOption::Approve => {
                    approve = approve.checked_add(&snapshot).ok_or(TallyError::Overflow)?;
                }
                VoteOption::Reject => {
                    reject = reject.checked_add(&snapshot).ok_or(TallyError::Overflow)?;
                }
            }
        }

        let network = power.network_power(day);
        let mut roles = Vec::with_capacity(Role::ALL.len());
        for role in Role::ALL {
            let total = network.power_for(role);
            roles.push(RoleTally {
                role,
                total_power: total,
                approve_power: approve.power_for(role),
                reject_power: reject.power_for(role),
                counted: total > 0,
            });
        }

        let (approve_bps, reject_bps) = weigh(&proposal.percentages, &roles)?;
        let outcome = if approve_bps > reject_bps {
            ProposalOutcome::Passed
        } else {
            ProposalOutcome::Rejected
        };
        let result = TallyResult {
            approve_bps,
            reject_bps,
            outcome,
        };

        match self.store.commit_result(id, result) {
            Ok(()) => {
                self.events.append(GovernanceEvent::ProposalCounted {
                    id,
                    approve_bps,
                    reject_bps,
                    outcome,
                });
            }
            // Lost the commit race; the stored result is identical to ours.
            Err(StoreError::Duplicate(_)) => {}
            Err(e) => return Err(e.into()),
        }

        Ok(TallyOutcome {
            proposal: id,
            result,
            roles,
            revealed,
            discarded,
        })
    }
}

/// Fold per-role rows into final basis points.
///
/// Each powered role contributes its approve/reject ratio (parts per million
/// of the role's total power) weighted by the proposal's basis points for
/// that role; the weighted sum is then renormalized over the powered roles
/// only. With every powered role at zero weight there is nothing to average
/// and both sides read zero.
fn weigh(percentages: &RolePercentages, roles: &[RoleTally]) -> Result<(u32, u32), TallyError> {
    let mut approve_sum: u128 = 0;
    let mut reject_sum: u128 = 0;
    let mut powered_bps: u128 = 0;
    for row in roles {
        if row.total_power == 0 {
            continue;
        }
        let bps = percentages.bps_for(row.role) as u128;
        let approve_ppm = row
            .approve_power
            .checked_mul(PPM)
            .ok_or(TallyError::Overflow)?
            / row.total_power;
        let reject_ppm = row
            .reject_power
            .checked_mul(PPM)
            .ok_or(TallyError::Overflow)?
            / row.total_power;
        approve_sum = approve_sum
            .checked_add(approve_ppm.checked_mul(bps).ok_or(TallyError::Overflow)?)
            .ok_or(TallyError::Overflow)?;
        reject_sum = reject_sum
            .checked_add(reject_ppm.checked_mul(bps).ok_or(TallyError::Overflow)?)
            .ok_or(TallyError::Overflow)?;
        powered_bps += bps;
    }

    let denominator = powered_bps * PPM;
    if denominator == 0 {
        return Ok((0, 0));
    }
    let approve_bps = approve_sum.checked_mul(BPS).ok_or(TallyError::Overflow)? / denominator;
    let reject_bps = reject_sum.checked_mul(BPS).ok_or(TallyError::Overflow)? / denominator;
    Ok((
        u32::try_from(approve_bps).map_err(|_| TallyError::Overflow)?,
        u32::try_from(reject_bps).map_err(|_| TallyError::Overflow)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blst::min_sig::SecretKey;
    use plenum_store::{BallotRecord, MemoryStore, NewProposal};
    use plenum_timelock::verify::{round_message, BEACON_DST};
    use plenum_timelock::{BeaconCache, TimelockError};
    use plenum_types::{ActorAddress, ProposalPhase};
    use proptest::prelude::*;
    use std::collections::HashMap;

    const WINDOW_START: u64 = 1_100;
    const WINDOW_END: u64 = 1_150;
    // (1_150 - 1_000) / 3 rounds after genesis, exactly on a boundary.
    const REVEAL_ROUND: u64 = 51;
    const AFTER_END: u64 = 1_200;

    fn addr(n: u8) -> ActorAddress {
        ActorAddress::new(format!("0x{n:040x}"))
    }

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn network_key() -> SecretKey {
        SecretKey::key_gen(&[7u8; 32], &[]).unwrap()
    }

    fn sign_round(sk: &SecretKey, round: u64) -> Vec<u8> {
        sk.sign(&round_message(round), BEACON_DST, &[])
            .to_bytes()
            .to_vec()
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        events: Arc<EventLog>,
        engine: TallyEngine<MemoryStore>,
        cipher: TimelockCipher,
        cache: BeaconCache,
    }

    /// A network with round 1 at t=1000 and a published reveal round.
    fn setup() -> Fixture {
        let sk = network_key();
        let info = BeaconInfo::new(sk.sk_to_pk().to_bytes().to_vec(), 3, 1_000);
        let store = Arc::new(MemoryStore::new());
        let events = Arc::new(EventLog::new());
        let engine = TallyEngine::new(store.clone(), events.clone(), &info).unwrap();
        let cipher = TimelockCipher::from_info(&info).unwrap();
        let cache = BeaconCache::new();
        cache.insert(REVEAL_ROUND, sign_round(&sk, REVEAL_ROUND));
        Fixture {
            store,
            events,
            engine,
            cipher,
            cache,
        }
    }

    fn open_proposal(store: &MemoryStore, percentages: RolePercentages) -> ProposalId {
        store
            .insert_proposal(NewProposal {
                creator: addr(1),
                start_time: ts(WINDOW_START),
                end_time: ts(WINDOW_END),
                percentages,
                title: "t".into(),
                content: "c".into(),
                created_at: ts(1_050),
                snapshot_day: 0,
                reveal_round: REVEAL_ROUND,
            })
            .unwrap()
    }

    fn cast(fx: &Fixture, id: ProposalId, voter: u8, vote: VoteOption) {
        let sealed = fx.cipher.seal(REVEAL_ROUND, vote).unwrap().to_bytes();
        fx.store
            .put_ballot(BallotRecord {
                proposal: id,
                voter: addr(voter),
                sealed,
                submitted_at: ts(WINDOW_START),
            })
            .unwrap();
    }

    #[derive(Default)]
    struct StaticPower {
        by_address: HashMap<ActorAddress, PowerSnapshot>,
        network: PowerSnapshot,
    }

    impl StaticPower {
        /// Give a voter power, accumulating it into the network totals.
        fn grant(&mut self, voter: u8, snapshot: PowerSnapshot) {
            self.network = self.network.saturating_add(&snapshot);
            self.by_address.insert(addr(voter), snapshot);
        }

        /// Add power held by addresses that never vote.
        fn bystander(&mut self, snapshot: PowerSnapshot) {
            self.network = self.network.saturating_add(&snapshot);
        }
    }

    impl PowerOracle for StaticPower {
        fn power_of(&self, address: &ActorAddress, _day: u64) -> PowerSnapshot {
            self.by_address
                .get(address)
                .copied()
                .unwrap_or(PowerSnapshot::ZERO)
        }

        fn network_power(&self, _day: u64) -> PowerSnapshot {
            self.network
        }
    }

    fn th(amount: u128) -> PowerSnapshot {
        PowerSnapshot {
            token_holder: amount,
            ..PowerSnapshot::ZERO
        }
    }

    // --- outcomes ---

    #[test]
    fn majority_of_one_powered_role_passes() {
        let fx = setup();
        let id = open_proposal(&fx.store, RolePercentages::EVEN);
        let mut power = StaticPower::default();
        power.grant(2, th(600));
        power.grant(3, th(400));
        cast(&fx, id, 2, VoteOption::Approve);
        cast(&fx, id, 3, VoteOption::Reject);

        let outcome = fx
            .engine
            .count_votes(id, &power, &fx.cache, ts(AFTER_END))
            .unwrap();

        // 600 of 1000 token-holder power approved, the only powered role.
        assert_eq!(outcome.result.approve_bps, 6_000);
        assert_eq!(outcome.result.reject_bps, 4_000);
        assert_eq!(outcome.result.outcome, ProposalOutcome::Passed);
        assert_eq!(outcome.revealed, 2);
        assert_eq!(outcome.discarded, 0);

        let holders = outcome
            .roles
            .iter()
            .find(|r| r.role == Role::TokenHolder)
            .unwrap();
        assert!(holders.counted);
        assert_eq!(holders.total_power, 1_000);
        assert_eq!(holders.approve_power, 600);
        assert_eq!(holders.reject_power, 400);
        for row in outcome.roles.iter().filter(|r| r.role != Role::TokenHolder) {
            assert!(!row.counted);
        }
    }

    #[test]
    fn exact_tie_rejects() {
        let fx = setup();
        let id = open_proposal(&fx.store, RolePercentages::EVEN);
        let mut power = StaticPower::default();
        power.grant(2, th(500));
        power.grant(3, th(500));
        cast(&fx, id, 2, VoteOption::Approve);
        cast(&fx, id, 3, VoteOption::Reject);

        let outcome = fx
            .engine
            .count_votes(id, &power, &fx.cache, ts(AFTER_END))
            .unwrap();
        assert_eq!(outcome.result.approve_bps, 5_000);
        assert_eq!(outcome.result.reject_bps, 5_000);
        assert_eq!(outcome.result.outcome, ProposalOutcome::Rejected);
    }

    #[test]
    fn nobody_voting_rejects() {
        let fx = setup();
        let id = open_proposal(&fx.store, RolePercentages::EVEN);
        let mut power = StaticPower::default();
        power.bystander(th(1_000));

        let outcome = fx
            .engine
            .count_votes(id, &power, &fx.cache, ts(AFTER_END))
            .unwrap();
        assert_eq!(outcome.result.approve_bps, 0);
        assert_eq!(outcome.result.reject_bps, 0);
        assert_eq!(outcome.result.outcome, ProposalOutcome::Rejected);
        assert_eq!(outcome.revealed, 0);
    }

    #[test]
    fn zero_power_voter_weighs_nothing() {
        let fx = setup();
        let id = open_proposal(&fx.store, RolePercentages::EVEN);
        let mut power = StaticPower::default();
        power.grant(2, th(600));
        power.grant(3, th(400));
        cast(&fx, id, 2, VoteOption::Approve);
        cast(&fx, id, 3, VoteOption::Reject);
        // Voter 9 holds no power at all; the ballot opens but moves nothing.
        cast(&fx, id, 9, VoteOption::Reject);

        let outcome = fx
            .engine
            .count_votes(id, &power, &fx.cache, ts(AFTER_END))
            .unwrap();
        assert_eq!(outcome.revealed, 3);
        assert_eq!(outcome.result.approve_bps, 6_000);
        assert_eq!(outcome.result.reject_bps, 4_000);
        assert_eq!(outcome.result.outcome, ProposalOutcome::Passed);
    }

    #[test]
    fn unvoted_power_dilutes_both_sides() {
        let fx = setup();
        let id = open_proposal(&fx.store, RolePercentages::EVEN);
        let mut power = StaticPower::default();
        power.grant(2, th(300));
        power.bystander(th(700));
        cast(&fx, id, 2, VoteOption::Approve);

        let outcome = fx
            .engine
            .count_votes(id, &power, &fx.cache, ts(AFTER_END))
            .unwrap();
        // 300 of 1000 approved; the silent 700 count toward neither side.
        assert_eq!(outcome.result.approve_bps, 3_000);
        assert_eq!(outcome.result.reject_bps, 0);
        assert_eq!(outcome.result.outcome, ProposalOutcome::Passed);
    }

    #[test]
    fn unpowered_roles_are_renormalized_away() {
        let fx = setup();
        // Half the weight sits on clients, but the network has no client power.
        let percentages = RolePercentages::new(5_000, 5_000, 0, 0).unwrap();
        let id = open_proposal(&fx.store, percentages);
        let mut power = StaticPower::default();
        power.grant(
            2,
            PowerSnapshot {
                storage_provider: 100,
                ..PowerSnapshot::ZERO
            },
        );
        power.bystander(th(500));
        cast(&fx, id, 2, VoteOption::Approve);

        let outcome = fx
            .engine
            .count_votes(id, &power, &fx.cache, ts(AFTER_END))
            .unwrap();

        // All storage-provider power approved; the client weight is
        // redistributed, so the result is a full approval.
        assert_eq!(outcome.result.approve_bps, 10_000);
        assert_eq!(outcome.result.outcome, ProposalOutcome::Passed);
        let clients = outcome
            .roles
            .iter()
            .find(|r| r.role == Role::Client)
            .unwrap();
        assert!(!clients.counted);
    }

    #[test]
    fn weighted_average_across_roles() {
        let fx = setup();
        let percentages = RolePercentages::new(4_000, 3_000, 2_000, 1_000).unwrap();
        let id = open_proposal(&fx.store, percentages);
        let mut power = StaticPower::default();
        power.grant(
            2,
            PowerSnapshot {
                storage_provider: 500,
                token_holder: 500,
                ..PowerSnapshot::ZERO
            },
        );
        power.grant(
            3,
            PowerSnapshot {
                client: 1_000,
                ..PowerSnapshot::ZERO
            },
        );
        power.bystander(PowerSnapshot {
            storage_provider: 500,
            client: 1_000,
            ..PowerSnapshot::ZERO
        });
        cast(&fx, id, 2, VoteOption::Approve);
        cast(&fx, id, 3, VoteOption::Reject);

        let outcome = fx
            .engine
            .count_votes(id, &power, &fx.cache, ts(AFTER_END))
            .unwrap();

        // approve = (0.5 × 4000 + 1.0 × 1000) / 8000, reject = (0.5 × 3000) / 8000
        // with the developer role (no power) dropped from the denominator.
        assert_eq!(outcome.result.approve_bps, 3_750);
        assert_eq!(outcome.result.reject_bps, 1_875);
        assert_eq!(outcome.result.outcome, ProposalOutcome::Passed);
    }

    #[test]
    fn powerless_network_rejects() {
        let fx = setup();
        let id = open_proposal(&fx.store, RolePercentages::EVEN);
        let power = StaticPower::default();
        cast(&fx, id, 2, VoteOption::Approve);

        let outcome = fx
            .engine
            .count_votes(id, &power, &fx.cache, ts(AFTER_END))
            .unwrap();
        assert_eq!(outcome.result.approve_bps, 0);
        assert_eq!(outcome.result.reject_bps, 0);
        assert_eq!(outcome.result.outcome, ProposalOutcome::Rejected);
        assert!(outcome.roles.iter().all(|r| !r.counted));
    }

    // --- commit semantics ---

    #[test]
    fn tally_commits_once_and_repeats_agree() {
        let fx = setup();
        let id = open_proposal(&fx.store, RolePercentages::EVEN);
        let mut power = StaticPower::default();
        power.grant(2, th(600));
        power.grant(3, th(400));
        cast(&fx, id, 2, VoteOption::Approve);
        cast(&fx, id, 3, VoteOption::Reject);

        let first = fx
            .engine
            .count_votes(id, &power, &fx.cache, ts(AFTER_END))
            .unwrap();
        let second = fx
            .engine
            .count_votes(id, &power, &fx.cache, ts(AFTER_END + 500))
            .unwrap();
        assert_eq!(first, second);

        let counted_events = fx
            .events
            .records()
            .iter()
            .filter(|r| matches!(r.event, GovernanceEvent::ProposalCounted { .. }))
            .count();
        assert_eq!(counted_events, 1);

        let stored = fx.store.proposal(id).unwrap();
        assert_eq!(stored.result, Some(first.result));
        assert_eq!(
            stored.phase(ts(AFTER_END)),
            ProposalPhase::Completed(ProposalOutcome::Passed)
        );
    }

    // --- preconditions ---

    #[test]
    fn counting_waits_for_the_window() {
        let fx = setup();
        let id = open_proposal(&fx.store, RolePercentages::EVEN);
        let power = StaticPower::default();

        let err = fx
            .engine
            .count_votes(id, &power, &fx.cache, ts(WINDOW_END - 1))
            .unwrap_err();
        assert!(matches!(
            err,
            TallyError::VotingStillOpen { until } if until == ts(WINDOW_END)
        ));
    }

    #[test]
    fn counting_waits_for_the_beacon() {
        let fx = setup();
        let id = open_proposal(&fx.store, RolePercentages::EVEN);
        let power = StaticPower::default();
        let empty = BeaconCache::new();

        let err = fx
            .engine
            .count_votes(id, &power, &empty, ts(AFTER_END))
            .unwrap_err();
        assert!(matches!(
            err,
            TallyError::Timelock(TimelockError::RoundNotYetPublished { round: REVEAL_ROUND })
        ));
        assert!(fx.store.proposal(id).unwrap().result.is_none());
    }

    #[test]
    fn cancelled_proposals_are_never_counted() {
        let fx = setup();
        let id = open_proposal(&fx.store, RolePercentages::EVEN);
        fx.store.cancel_proposal(id).unwrap();
        let power = StaticPower::default();

        let err = fx
            .engine
            .count_votes(id, &power, &fx.cache, ts(AFTER_END))
            .unwrap_err();
        assert!(matches!(err, TallyError::ProposalCancelled(p) if p == id));
    }

    #[test]
    fn unknown_proposal_is_rejected() {
        let fx = setup();
        let power = StaticPower::default();
        let missing = ProposalId(99);

        let err = fx
            .engine
            .count_votes(missing, &power, &fx.cache, ts(AFTER_END))
            .unwrap_err();
        assert!(matches!(err, TallyError::UnknownProposal(p) if p == missing));
    }

    // --- bad inputs ---

    #[test]
    fn forged_ballots_are_discarded_not_counted() {
        let fx = setup();
        let id = open_proposal(&fx.store, RolePercentages::EVEN);
        let mut power = StaticPower::default();
        power.grant(2, th(600));
        power.grant(3, th(400));
        cast(&fx, id, 2, VoteOption::Approve);

        // Voter 3's ballot is tampered after sealing; the AEAD tag no longer
        // matches. The payload is the last serialized field.
        let mut sealed = fx
            .cipher
            .seal(REVEAL_ROUND, VoteOption::Reject)
            .unwrap()
            .to_bytes();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xff;
        fx.store
            .put_ballot(BallotRecord {
                proposal: id,
                voter: addr(3),
                sealed,
                submitted_at: ts(WINDOW_START),
            })
            .unwrap();

        let outcome = fx
            .engine
            .count_votes(id, &power, &fx.cache, ts(AFTER_END))
            .unwrap();
        assert_eq!(outcome.revealed, 1);
        assert_eq!(outcome.discarded, 1);
        // Only the intact approval counts; voter 3's power sits unvoted.
        assert_eq!(outcome.result.approve_bps, 6_000);
        assert_eq!(outcome.result.reject_bps, 0);
        assert_eq!(outcome.result.outcome, ProposalOutcome::Passed);
        assert!(fx.store.proposal(id).unwrap().result.is_some());
    }

    #[test]
    fn foreign_signature_aborts_the_count() {
        let fx = setup();
        let id = open_proposal(&fx.store, RolePercentages::EVEN);
        let mut power = StaticPower::default();
        power.grant(2, th(600));
        cast(&fx, id, 2, VoteOption::Approve);

        let foreign = SecretKey::key_gen(&[42u8; 32], &[]).unwrap();
        let bad = BeaconCache::new();
        bad.insert(REVEAL_ROUND, sign_round(&foreign, REVEAL_ROUND));

        let err = fx
            .engine
            .count_votes(id, &power, &bad, ts(AFTER_END))
            .unwrap_err();
        assert!(matches!(
            err,
            TallyError::Timelock(TimelockError::BeaconVerification { .. })
        ));
        // Nothing committed; a genuine signature can still count it later.
        assert!(fx.store.proposal(id).unwrap().result.is_none());
    }

    // --- fold arithmetic ---

    fn role_rows(values: [(u128, u128, u128); 4]) -> Vec<RoleTally> {
        Role::ALL
            .iter()
            .zip(values)
            .map(|(&role, (total, approve, reject))| RoleTally {
                role,
                total_power: total,
                approve_power: approve,
                reject_power: reject,
                counted: total > 0,
            })
            .collect()
    }

    #[test]
    fn weigh_handles_full_participation() {
        let rows = role_rows([(100, 100, 0), (200, 0, 200), (0, 0, 0), (50, 25, 25)]);
        let percentages = RolePercentages::new(2_500, 2_500, 2_500, 2_500).unwrap();
        let (approve, reject) = weigh(&percentages, &rows).unwrap();
        // (1.0 + 0 + 0.5) / 3 approve, (0 + 1.0 + 0.5) / 3 reject.
        assert_eq!(approve, 5_000);
        assert_eq!(reject, 5_000);
    }

    #[test]
    fn weigh_detects_inconsistent_oracle_overflow() {
        let rows = role_rows([(1, u128::MAX, 0), (0, 0, 0), (0, 0, 0), (0, 0, 0)]);
        let err = weigh(&RolePercentages::EVEN, &rows).unwrap_err();
        assert!(matches!(err, TallyError::Overflow));
    }

    proptest! {
        /// However power and weights are distributed, the two sides never
        /// account for more than the whole.
        #[test]
        fn weigh_never_exceeds_the_whole(
            raw in proptest::array::uniform4(
                (0u64..=1_000_000, any::<u64>(), any::<u64>())
            ),
            cuts in proptest::array::uniform3(0u16..=10_000),
        ) {
            let mut cuts = cuts;
            cuts.sort_unstable();
            let weights = [
                cuts[0],
                cuts[1] - cuts[0],
                cuts[2] - cuts[1],
                10_000 - cuts[2],
            ];
            let percentages =
                RolePercentages::new(weights[0], weights[1], weights[2], weights[3]).unwrap();

            let values = raw.map(|(total, a_seed, r_seed)| {
                let total = total as u128;
                let approve = if total == 0 { 0 } else { a_seed as u128 % (total + 1) };
                let rest = total - approve;
                let reject = if rest == 0 { 0 } else { r_seed as u128 % (rest + 1) };
                (total, approve, reject)
            });
            let rows = role_rows(values);

            let (approve, reject) = weigh(&percentages, &rows).unwrap();
            prop_assert!(approve <= 10_000);
            prop_assert!(reject <= 10_000);
            prop_assert!(approve + reject <= 10_000);
        }
    }
}

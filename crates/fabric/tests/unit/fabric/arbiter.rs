//! Per-slave arbiter unit tests.
//!
//! Verifies grant registration, the sticky keep bit, both selection
//! policies, and release and reset behavior.

use ahbsim_core::MasterId;
use ahbsim_core::fabric::ArbitrationPolicy;
use ahbsim_core::fabric::arbiter::SlaveArbiter;

fn ids(indices: &[usize]) -> Vec<MasterId> {
    indices.iter().copied().map(MasterId).collect()
}

// ══════════════════════════════════════════════════════════
// 1. Fixed priority
// ══════════════════════════════════════════════════════════

#[test]
fn lowest_index_wins_under_fixed_priority() {
    let mut arbiter = SlaveArbiter::new(ArbitrationPolicy::FixedPriority);
    assert_eq!(arbiter.arbitrate(&ids(&[1, 2, 3])), Some(MasterId(1)));
}

#[test]
fn no_requesters_means_no_grant() {
    let mut arbiter = SlaveArbiter::new(ArbitrationPolicy::FixedPriority);
    assert_eq!(arbiter.arbitrate(&[]), None);
    assert_eq!(arbiter.owner(), None);
}

#[test]
fn owner_keeps_the_grant_over_a_lower_index() {
    let mut arbiter = SlaveArbiter::new(ArbitrationPolicy::FixedPriority);
    assert_eq!(arbiter.arbitrate(&ids(&[2])), Some(MasterId(2)));
    arbiter.set_keep(true);

    // Master 0 outranks master 2 but cannot pry the slave away mid-burst.
    assert_eq!(arbiter.arbitrate(&ids(&[0, 2])), Some(MasterId(2)));
    assert!(arbiter.is_kept());
}

#[test]
fn owner_persists_across_idle_cycles() {
    let mut arbiter = SlaveArbiter::new(ArbitrationPolicy::FixedPriority);
    assert_eq!(arbiter.arbitrate(&ids(&[1])), Some(MasterId(1)));
    assert_eq!(arbiter.arbitrate(&[]), Some(MasterId(1)));
    assert_eq!(arbiter.owner(), Some(MasterId(1)));
}

#[test]
fn release_reopens_the_slave() {
    let mut arbiter = SlaveArbiter::new(ArbitrationPolicy::FixedPriority);
    let _ = arbiter.arbitrate(&ids(&[2]));
    arbiter.set_keep(true);
    arbiter.release();

    assert_eq!(arbiter.owner(), None);
    assert!(!arbiter.is_kept());
    assert_eq!(arbiter.arbitrate(&ids(&[0, 2])), Some(MasterId(0)));
}

// ══════════════════════════════════════════════════════════
// 2. Round robin
// ══════════════════════════════════════════════════════════

#[test]
fn rotation_starts_past_the_previous_winner() {
    let mut arbiter = SlaveArbiter::new(ArbitrationPolicy::RoundRobin);

    assert_eq!(arbiter.arbitrate(&ids(&[0, 1, 2])), Some(MasterId(0)));
    arbiter.release();
    assert_eq!(arbiter.arbitrate(&ids(&[0, 1, 2])), Some(MasterId(1)));
    arbiter.release();
    assert_eq!(arbiter.arbitrate(&ids(&[0, 1, 2])), Some(MasterId(2)));
    arbiter.release();
    assert_eq!(arbiter.arbitrate(&ids(&[0, 1, 2])), Some(MasterId(0)));
}

#[test]
fn rotation_wraps_when_no_higher_index_requests() {
    let mut arbiter = SlaveArbiter::new(ArbitrationPolicy::RoundRobin);
    let _ = arbiter.arbitrate(&ids(&[1]));
    arbiter.release();

    // Last winner was 1; only 0 and 1 request, so the scan wraps to 0.
    assert_eq!(arbiter.arbitrate(&ids(&[0, 1])), Some(MasterId(0)));
}

#[test]
fn round_robin_owner_is_still_sticky() {
    let mut arbiter = SlaveArbiter::new(ArbitrationPolicy::RoundRobin);
    assert_eq!(arbiter.arbitrate(&ids(&[2])), Some(MasterId(2)));
    assert_eq!(arbiter.arbitrate(&ids(&[0, 1])), Some(MasterId(2)));
}

// ══════════════════════════════════════════════════════════
// 3. Reset
// ══════════════════════════════════════════════════════════

#[test]
fn reset_clears_grant_and_rotation_history() {
    let mut arbiter = SlaveArbiter::new(ArbitrationPolicy::RoundRobin);
    let _ = arbiter.arbitrate(&ids(&[0, 1]));
    arbiter.set_keep(true);
    arbiter.reset();

    assert_eq!(arbiter.owner(), None);
    assert!(!arbiter.is_kept());
    // History is gone, so the scan starts from index zero again.
    assert_eq!(arbiter.arbitrate(&ids(&[0, 1])), Some(MasterId(0)));
}

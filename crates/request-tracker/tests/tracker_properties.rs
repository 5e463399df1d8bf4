// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Retention, overwrite and resize behavior of the request ring.

#![allow(missing_docs)]
use proptest::prelude::*;
use proptest::test_runner::{Config as PropConfig, RngAlgorithm, TestRng, TestRunner};

use request_tracker::{
    exception_name, ArgIndex, ExceptionCode, RequestTracker, Unsynchronized,
    UNKNOWN_EXCEPTION_NAME,
};

type Tracker = RequestTracker<Unsynchronized>;

fn hits(tracker: &Tracker, id: u32) -> bool {
    !tracker
        .lookup(id, ExceptionCode::ERROR, ArgIndex::Unknown)
        .is_placeholder()
}

fn write_ids(tracker: &Tracker, ids: impl IntoIterator<Item = u32>) {
    for id in ids {
        tracker.record(id, "SimConnect_RequestDataOnSimObject", &[&id, &"SECOND"]);
    }
}

#[test]
fn round_trip_annotates_record() {
    let tracker = Tracker::new(16);
    tracker.record(42, "Foo", &[&1, &2, &3]);
    let view = tracker.lookup(42, ExceptionCode::DATA_ERROR, ArgIndex::from_raw(2));
    assert_eq!(view.label(), "Foo");
    assert_eq!(view.args(), "1,2,3");
    assert_eq!(view.send_id(), 42);
    assert_eq!(view.exception(), Some(ExceptionCode::DATA_ERROR));
    assert_eq!(view.arg_index(), ArgIndex::from_raw(2));
}

#[test]
fn miss_on_empty_tracker_yields_placeholder() {
    let tracker = Tracker::new(16);
    let view = tracker.lookup(999, ExceptionCode::DATA_ERROR, ArgIndex::from_raw(0));
    assert_eq!(view.label(), "");
    assert_eq!(view.args(), "");
    assert_eq!(view.send_id(), 999);
    assert_eq!(view.exception(), Some(ExceptionCode::DATA_ERROR));
    assert_eq!(view.arg_index(), ArgIndex::Unknown);
}

#[test]
fn disabled_tracker_never_stores() {
    let tracker = Tracker::new(0);
    write_ids(&tracker, 1..50);
    assert_eq!(tracker.len(), 0);
    for id in 1..50 {
        assert!(!hits(&tracker, id));
    }
}

#[test]
fn shrink_keeps_only_low_slots() {
    let tracker = Tracker::new(5);
    write_ids(&tracker, 0..5);
    tracker.set_capacity(2);
    assert_eq!(tracker.capacity(), 2);
    for id in 0..5 {
        assert_eq!(hits(&tracker, id), id < 2, "id {id}");
    }
}

#[test]
fn shrink_can_drop_the_newest_record() {
    let tracker = Tracker::new(6);
    write_ids(&tracker, 1..5); // slots 0..=3, newest in slot 3
    tracker.set_capacity(3);
    assert!(!hits(&tracker, 4));
    // Cursor was clamped onto the last slot, so the next write lands there.
    write_ids(&tracker, [10]);
    assert!(hits(&tracker, 10));
    assert!(!hits(&tracker, 3));
    assert!(hits(&tracker, 1) && hits(&tracker, 2));
}

#[test]
fn grow_preserves_records_and_uses_new_slots_first() {
    let tracker = Tracker::new(2);
    write_ids(&tracker, [100, 101]);
    tracker.set_capacity(10);
    assert!(hits(&tracker, 100));
    assert!(hits(&tracker, 101));

    write_ids(&tracker, 1..=8);
    assert!(hits(&tracker, 100));
    assert!(hits(&tracker, 101));
    assert_eq!(tracker.len(), 10);

    write_ids(&tracker, [9]);
    assert!(!hits(&tracker, 100), "oldest original goes first");
    assert!(hits(&tracker, 101));
}

#[test]
fn records_snapshot_is_oldest_first() {
    let tracker = Tracker::new(3);
    write_ids(&tracker, 1..=5);
    let ids: Vec<u32> = tracker.records().iter().map(|r| r.send_id()).collect();
    assert_eq!(ids, vec![3, 4, 5]);
}

#[test]
fn annotation_is_cleared_when_slot_is_reused() {
    let tracker = Tracker::new(1);
    write_ids(&tracker, [1]);
    let _ = tracker.lookup(1, ExceptionCode::ERROR, ArgIndex::from_raw(1));
    write_ids(&tracker, [2]);
    let snapshot = tracker.records();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].send_id(), 2);
    assert_eq!(snapshot[0].exception(), None);
}

#[test]
fn overwrite_order_with_pinned_seed() {
    const SEED_BYTES: [u8; 32] = [
        0x17, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0,
    ];

    let rng = TestRng::from_seed(RngAlgorithm::ChaCha, &SEED_BYTES);
    let mut runner = TestRunner::new_with_rng(PropConfig::default(), rng);

    runner
        .run(&(1_usize..32, 0_u32..48), |(capacity, extra)| {
            let tracker = Tracker::new(capacity);
            let cap = u32::try_from(capacity).expect("small capacity");
            let total = cap + extra;
            // Ids start at 1 so none collides with an unset id.
            write_ids(&tracker, 1..=total);

            let overwritten = total.saturating_sub(cap);
            for id in 1..=overwritten {
                prop_assert!(!hits(&tracker, id), "id {} should be gone", id);
            }
            for id in (overwritten + 1)..=total {
                prop_assert!(hits(&tracker, id), "id {} should be kept", id);
            }
            Ok(())
        })
        .expect("overwrite-order property should hold");
}

proptest! {
    #[test]
    fn live_records_never_exceed_capacity(
        capacity in 0_usize..24,
        ops in prop::collection::vec((any::<u32>(), 0_usize..30, any::<bool>()), 0..200),
    ) {
        let tracker = Tracker::new(capacity);
        for (id, new_capacity, resize) in ops {
            if resize {
                tracker.set_capacity(new_capacity);
            } else {
                write_ids(&tracker, [id]);
            }
            prop_assert!(tracker.len() <= tracker.capacity());
        }
    }

    #[test]
    fn error_names_are_total_and_pure(code in any::<u32>()) {
        let name = exception_name(code);
        prop_assert_eq!(name, exception_name(code));
        prop_assert_eq!(name == UNKNOWN_EXCEPTION_NAME, !ExceptionCode(code).is_known());
    }
}

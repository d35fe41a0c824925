//! Property-based tests for time-range validation and worker arguments.

#![allow(clippy::expect_used)]

use archman_core::ArchiveRequest;
use archman_core::DeleteRequest;
use archman_core::DeleteTarget;
use archman_core::FindRequest;
use archman_core::validate_time_range;
use proptest::prelude::*;
use std::path::Path;

const CONFIG: &str = "/opt/clp/var/log/.clp-archive-manager-0000-config.yml";

proptest! {
    /// An inverted range is always rejected.
    #[test]
    fn prop_inverted_range_rejected(begin in any::<i64>(), end in any::<i64>()) {
        prop_assume!(begin > end);
        prop_assert!(!validate_time_range(begin, end));
    }

    /// Any ordered non-negative range is accepted.
    #[test]
    fn prop_ordered_non_negative_accepted(begin in 0..i64::MAX, span in 0..i64::MAX) {
        let end = begin.saturating_add(span);
        prop_assert!(validate_time_range(begin, end));
    }

    /// A negative bound is rejected regardless of ordering.
    #[test]
    fn prop_negative_bound_rejected(
        negative in i64::MIN..0,
        other in any::<i64>(),
        negative_first in any::<bool>(),
    ) {
        let (begin, end) = if negative_first { (negative, other) } else { (other, negative) };
        prop_assert!(!validate_time_range(begin, end));
    }

    /// `find` without an upper bound always passes the domain check.
    #[test]
    fn prop_find_without_end_always_valid(begin in any::<i64>()) {
        let request = ArchiveRequest::Find(FindRequest { begin_ts: begin, end_ts: None });
        prop_assert!(request.validate().is_ok());
    }

    /// `del by-ids` never checks timestamps and forwards the IDs in order.
    #[test]
    fn prop_delete_by_ids_forwards_ids(
        ids in prop::collection::vec("[a-z0-9-]{1,36}", 1..8),
        dry_run in any::<bool>(),
    ) {
        let request = ArchiveRequest::Delete(DeleteRequest {
            dry_run,
            target: DeleteTarget::ByIds(ids.clone()),
        });
        prop_assert!(request.validate().is_ok());

        let args = request.worker_args(Path::new(CONFIG));
        let del_pos = args.iter().position(|arg| arg == "del").expect("del token");
        let mut expected = vec!["del".to_string()];
        if dry_run {
            expected.push("--dry-run".to_string());
        }
        expected.push("by-ids".to_string());
        expected.extend(ids);
        prop_assert_eq!(&args[del_pos..], expected.as_slice());
    }

    /// The `--end-ts` pair appears exactly when an upper bound is supplied.
    #[test]
    fn prop_find_end_ts_only_when_supplied(
        begin in 0..1_000_000i64,
        end in prop::option::of(1_000_000..2_000_000i64),
    ) {
        let request = ArchiveRequest::Find(FindRequest { begin_ts: begin, end_ts: end });
        let args = request.worker_args(Path::new(CONFIG));
        prop_assert_eq!(args.iter().any(|arg| arg == "--end-ts"), end.is_some());
        prop_assert!(args.contains(&begin.to_string()));
    }
}

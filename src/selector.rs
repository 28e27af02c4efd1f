//! Version selection
//!
//! Picks the most recently published release that is at least as stable as a
//! requested minimum tier.

use crate::types::{ReleaseRecord, StabilityTier};

/// Latest release whose tier satisfies `minimum`
///
/// Returns `None` when `records` is empty or nothing survives the tier filter.
///
/// When several qualifying releases share the latest publish instant, the one
/// listed first by the registry wins.
#[must_use]
pub fn select_latest(records: &[ReleaseRecord], minimum: StabilityTier) -> Option<&ReleaseRecord> {
    latest_index(records, minimum).map(|index| &records[index])
}

/// Owned variant of [`select_latest`] for callers that hand the release on
#[must_use]
pub fn take_latest(
    mut records: Vec<ReleaseRecord>,
    minimum: StabilityTier,
) -> Option<ReleaseRecord> {
    latest_index(&records, minimum).map(|index| records.swap_remove(index))
}

fn latest_index(records: &[ReleaseRecord], minimum: StabilityTier) -> Option<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.version_type.is_at_least(minimum))
        .fold(None::<(usize, &ReleaseRecord)>, |best, (index, candidate)| match best {
            Some((_, current)) if candidate.date_published <= current.date_published => best,
            _ => Some((index, candidate)),
        })
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn release(label: &str, tier: StabilityTier, secs: i64) -> ReleaseRecord {
        ReleaseRecord {
            id: Some(label.to_string()),
            version_number: Some(label.to_string()),
            version_type: tier,
            date_published: at(secs),
            files: vec![],
        }
    }

    #[test]
    fn empty_input_has_no_match() {
        assert!(select_latest(&[], StabilityTier::Any).is_none());
    }

    #[test]
    fn picks_latest_regardless_of_order() {
        let records = vec![
            release("beta", StabilityTier::Beta, 10),
            release("release", StabilityTier::Release, 20),
            release("alpha", StabilityTier::Alpha, 5),
        ];
        let best = select_latest(&records, StabilityTier::Any).unwrap();
        assert_eq!(best.label(), "release");

        let mut reversed = records.clone();
        reversed.reverse();
        let best = select_latest(&reversed, StabilityTier::Any).unwrap();
        assert_eq!(best.label(), "release");
    }

    #[test]
    fn newer_unstable_release_is_skipped_when_minimum_is_higher() {
        let records = vec![
            release("old-release", StabilityTier::Release, 1),
            release("new-beta", StabilityTier::Beta, 100),
        ];
        assert_eq!(
            select_latest(&records, StabilityTier::Release)
                .unwrap()
                .label(),
            "old-release"
        );
        assert_eq!(
            select_latest(&records, StabilityTier::Beta).unwrap().label(),
            "new-beta"
        );
    }

    #[test]
    fn fully_filtered_input_has_no_match() {
        let records = vec![
            release("a", StabilityTier::Alpha, 1),
            release("b", StabilityTier::Beta, 2),
        ];
        assert!(select_latest(&records, StabilityTier::Release).is_none());
    }

    #[test]
    fn unknown_tier_is_never_selected() {
        let records = vec![release("mystery", StabilityTier::Unknown, 50)];
        assert!(select_latest(&records, StabilityTier::Any).is_none());
    }

    #[test]
    fn selection_never_violates_minimum_and_is_maximal() {
        let tiers = [
            StabilityTier::Unknown,
            StabilityTier::Alpha,
            StabilityTier::Beta,
            StabilityTier::Release,
        ];
        let records: Vec<_> = (0..24)
            .map(|i| {
                // scrambled timestamps so registry order is not chronological
                release(&format!("v{i}"), tiers[i % tiers.len()], (i as i64 * 7) % 19)
            })
            .collect();

        for minimum in [
            StabilityTier::Any,
            StabilityTier::Alpha,
            StabilityTier::Beta,
            StabilityTier::Release,
        ] {
            let best = select_latest(&records, minimum).unwrap();
            assert!(best.version_type.is_at_least(minimum));
            assert!(
                records
                    .iter()
                    .filter(|r| r.version_type.is_at_least(minimum))
                    .all(|r| r.date_published <= best.date_published)
            );
        }
    }

    #[test]
    fn equal_timestamps_keep_first_listed() {
        let records = vec![
            release("first", StabilityTier::Release, 30),
            release("second", StabilityTier::Release, 30),
        ];
        assert_eq!(
            select_latest(&records, StabilityTier::Any).unwrap().label(),
            "first"
        );
    }

    #[test]
    fn take_latest_returns_owned_record() {
        let records = vec![
            release("a", StabilityTier::Release, 1),
            release("b", StabilityTier::Release, 2),
        ];
        let best = take_latest(records, StabilityTier::Release).unwrap();
        assert_eq!(best.label(), "b");
        assert!(take_latest(vec![], StabilityTier::Any).is_none());
    }
}

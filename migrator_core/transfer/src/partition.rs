//! Channel partitioning (spec.md §4.C/D: "partition a table into channels
//! sized by `*_channels`/`incremental_size`"). Every channel but the last
//! gets a fixed-size `LIMIT`; the last is left unbounded so it picks up
//! whatever remains without needing a row count computed up front.

/// One worker's slice of a table, rendered into `OFFSET`/`LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub offset: u64,
    pub limit: Option<u64>,
}

/// Splits a table into `channels` partitions of `channel_size` rows each,
/// with the final channel unbounded. `channel_size <= 0` (spec.md's
/// `incremental_size == -1 -> 0`, "no limit") collapses to a single
/// unbounded partition regardless of `channels`, since there is no size to
/// divide by.
pub fn partition(channels: i64, channel_size: i64) -> Vec<Partition> {
    if channel_size <= 0 {
        return vec![Partition { offset: 0, limit: None }];
    }

    let channels = channels.max(1) as u64;
    let channel_size = channel_size as u64;

    (0..channels)
        .map(|i| Partition {
            offset: i * channel_size,
            limit: if i + 1 < channels { Some(channel_size) } else { None },
        })
        .collect()
}

/// Like `partition`, but for a table whose row count is already known (an
/// incremental window's bound, spec.md §4.C.4): every partition is clipped
/// to `total` rows and shifted by `start` so it lines up with the window's
/// resume offset. Partitions entirely past `total` are dropped.
pub fn partition_window(channels: i64, channel_size: i64, start: u64, total: u64) -> Vec<Partition> {
    partition(channels, channel_size)
        .into_iter()
        .filter(|p| p.offset < total)
        .map(|p| {
            let remaining = total - p.offset;
            let limit = Some(p.limit.map_or(remaining, |l| l.min(remaining)));
            Partition { offset: p.offset + start, limit }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_channel_is_entirely_unbounded() {
        let partitions = partition(1, 1000);
        assert_eq!(partitions, vec![Partition { offset: 0, limit: None }]);
    }

    #[test]
    fn multiple_channels_step_by_channel_size_and_leave_the_last_open() {
        let partitions = partition(3, 1000);
        assert_eq!(
            partitions,
            vec![
                Partition { offset: 0, limit: Some(1000) },
                Partition { offset: 1000, limit: Some(1000) },
                Partition { offset: 2000, limit: None },
            ]
        );
    }

    #[test]
    fn zero_channel_size_means_no_limit() {
        assert_eq!(partition(4, 0), vec![Partition { offset: 0, limit: None }]);
    }

    #[test]
    fn negative_channel_size_also_means_no_limit() {
        assert_eq!(partition(4, -1), vec![Partition { offset: 0, limit: None }]);
    }

    #[test]
    fn zero_or_negative_channel_count_is_treated_as_one() {
        assert_eq!(partition(0, 500), vec![Partition { offset: 0, limit: None }]);
    }

    #[test]
    fn windowed_partitions_clip_the_last_channel_to_the_known_total() {
        let partitions = partition_window(3, 1000, 0, 2500);
        assert_eq!(
            partitions,
            vec![
                Partition { offset: 0, limit: Some(1000) },
                Partition { offset: 1000, limit: Some(1000) },
                Partition { offset: 2000, limit: Some(500) },
            ]
        );
    }

    #[test]
    fn windowed_partitions_drop_channels_entirely_past_the_total() {
        let partitions = partition_window(3, 1000, 0, 1500);
        assert_eq!(
            partitions,
            vec![
                Partition { offset: 0, limit: Some(1000) },
                Partition { offset: 1000, limit: Some(500) },
            ]
        );
    }

    #[test]
    fn windowed_partitions_shift_by_the_resume_offset() {
        let partitions = partition_window(2, 1000, 5000, 1500);
        assert_eq!(
            partitions,
            vec![
                Partition { offset: 5000, limit: Some(1000) },
                Partition { offset: 6000, limit: Some(500) },
            ]
        );
    }
}

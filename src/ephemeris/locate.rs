use chrono::{DateTime, Utc};

use super::epoch::parse_epoch;

/// Pick the candidate whose epoch is closest to `target`.
///
/// Linear scan; on an exact tie the first candidate seen wins, so callers
/// control tie-breaking through the order they pass candidates in.
/// Candidates with an unparseable epoch are skipped.
pub fn find_nearest<K, T, I>(target: DateTime<Utc>, candidates: I) -> Option<(K, T)>
where
    I: IntoIterator<Item = (K, T)>,
    K: AsRef<str>,
{
    let mut best: Option<(i64, K, T)> = None;

    for (epoch, record) in candidates {
        let instant = match parse_epoch(epoch.as_ref()) {
            Ok(instant) => instant,
            Err(e) => {
                log::warn!("Skipping candidate: {}", e);
                continue;
            }
        };

        let distance_ms = (target - instant).num_milliseconds().abs();
        let closer = match &best {
            Some((best_ms, _, _)) => distance_ms < *best_ms,
            None => true,
        };
        if closer {
            best = Some((distance_ms, epoch, record));
        }
    }

    best.map(|(_, epoch, record)| (epoch, record))
}

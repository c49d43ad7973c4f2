use crate::model::{AvgListenTime, ListenEvent};

use super::par_sum_count_by;

/// Arithmetic mean listen duration per song, over the raw event log.
///
/// Works on raw events, not the joined set — a song needs no catalog entry
/// to appear here. Mean is f64 sum/count, no rounding; a song with zero
/// events simply has no row. Output sorted by song_id.
pub fn average_listen_time(
    pool: &rayon::ThreadPool,
    events: &[ListenEvent],
) -> Vec<AvgListenTime> {
    let sums = pool.install(|| {
        par_sum_count_by(events, |e| (e.song_id.clone(), e.duration_sec))
    });

    let mut rows: Vec<AvgListenTime> = sums
        .into_iter()
        .map(|(song_id, (sum, count))| AvgListenTime {
            song_id,
            avg_duration_sec: sum / count as f64,
        })
        .collect();
    rows.sort_by(|a, b| a.song_id.cmp(&b.song_id));
    rows
}

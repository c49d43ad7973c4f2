use std::collections::HashMap;

use crate::model::{EnrichedEvent, GenreLoyaltyScore};

use super::par_count_by;

/// Retention threshold, strict: a user at exactly 0.8 is excluded.
const LOYALTY_THRESHOLD: f64 = 0.8;

/// Genre-loyalty ratio per user: plays of the most-played genre over total
/// plays. Only genuinely genre-dominant listeners (score > 0.8) are kept.
///
/// Both counts derive from the same joined event set, so every user present
/// has total_plays >= max_genre_plays >= 1 and a score in (0, 1].
pub fn loyalty_scores(
    pool: &rayon::ThreadPool,
    events: &[EnrichedEvent],
) -> Vec<GenreLoyaltyScore> {
    let (total_plays, genre_plays) = pool.install(|| {
        let totals = par_count_by(events, |e| e.user_id.clone());
        let by_genre = par_count_by(events, |e| (e.user_id.clone(), e.genre.clone()));
        (totals, by_genre)
    });

    let mut max_genre_plays: HashMap<&str, u64> = HashMap::new();
    for ((user_id, _genre), plays) in &genre_plays {
        let entry = max_genre_plays.entry(user_id.as_str()).or_insert(0);
        *entry = (*entry).max(*plays);
    }

    let mut rows: Vec<GenreLoyaltyScore> = total_plays
        .iter()
        .filter_map(|(user_id, &total)| {
            let max = max_genre_plays[user_id.as_str()];
            let score = max as f64 / total as f64;
            (score > LOYALTY_THRESHOLD).then(|| GenreLoyaltyScore {
                user_id: user_id.clone(),
                max_genre_plays: max,
                total_plays: total,
                loyalty_score: score,
            })
        })
        .collect();
    rows.sort_by(|a, b| a.user_id.cmp(&b.user_id));
    rows
}

use std::collections::HashMap;

use crate::model::{EnrichedEvent, UserFavoriteGenre};

use super::par_count_by;

/// Pick each user's single most-played genre.
///
/// Tie-break is deterministic: higher play_count wins, equal counts break by
/// genre name ascending. Output is sorted by user_id, one row per user.
pub fn favorite_genres(
    pool: &rayon::ThreadPool,
    events: &[EnrichedEvent],
) -> Vec<UserFavoriteGenre> {
    let genre_counts = pool.install(|| {
        par_count_by(events, |e| (e.user_id.clone(), e.genre.clone()))
    });

    // Reduce (user, genre) counts to the winning genre per user.
    let mut best: HashMap<String, (String, u64)> = HashMap::new();
    for ((user_id, genre), play_count) in genre_counts {
        match best.get_mut(&user_id) {
            Some((best_genre, best_count)) => {
                if play_count > *best_count
                    || (play_count == *best_count && genre < *best_genre)
                {
                    *best_genre = genre;
                    *best_count = play_count;
                }
            }
            None => {
                best.insert(user_id, (genre, play_count));
            }
        }
    }

    let mut rows: Vec<UserFavoriteGenre> = best
        .into_iter()
        .map(|(user_id, (genre, play_count))| UserFavoriteGenre {
            user_id,
            genre,
            play_count,
        })
        .collect();
    rows.sort_by(|a, b| a.user_id.cmp(&b.user_id));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plays(pairs: &[(&str, &str)]) -> Vec<EnrichedEvent> {
        pairs
            .iter()
            .map(|(user, genre)| EnrichedEvent {
                user_id: user.to_string(),
                genre: genre.to_string(),
            })
            .collect()
    }

    fn pool() -> rayon::ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .unwrap()
    }

    #[test]
    fn test_single_favorite_per_user() {
        let events = plays(&[
            ("u1", "rock"),
            ("u1", "rock"),
            ("u1", "jazz"),
            ("u2", "jazz"),
        ]);
        let favs = favorite_genres(&pool(), &events);

        assert_eq!(favs.len(), 2);
        assert_eq!(favs[0].user_id, "u1");
        assert_eq!(favs[0].genre, "rock");
        assert_eq!(favs[0].play_count, 2);
        assert_eq!(favs[1].user_id, "u2");
        assert_eq!(favs[1].genre, "jazz");
        assert_eq!(favs[1].play_count, 1);
    }

    #[test]
    fn test_tie_breaks_by_genre_name_ascending() {
        // Two genres tied at 3 plays each — the lexicographically smaller
        // genre must win, regardless of input order.
        let events = plays(&[
            ("u1", "rock"),
            ("u1", "jazz"),
            ("u1", "rock"),
            ("u1", "jazz"),
            ("u1", "rock"),
            ("u1", "jazz"),
        ]);
        let favs = favorite_genres(&pool(), &events);

        assert_eq!(favs.len(), 1);
        assert_eq!(favs[0].genre, "jazz");
        assert_eq!(favs[0].play_count, 3);
    }

    #[test]
    fn test_play_count_is_the_max() {
        let events = plays(&[
            ("u1", "rock"),
            ("u1", "jazz"),
            ("u1", "jazz"),
            ("u1", "electronic"),
            ("u1", "jazz"),
        ]);
        let favs = favorite_genres(&pool(), &events);
        assert_eq!(favs[0].genre, "jazz");
        assert_eq!(favs[0].play_count, 3);
    }

    #[test]
    fn test_empty_genre_is_a_bucket() {
        let events = plays(&[("u1", ""), ("u1", ""), ("u1", "rock")]);
        let favs = favorite_genres(&pool(), &events);
        assert_eq!(favs[0].genre, "");
        assert_eq!(favs[0].play_count, 2);
    }

    #[test]
    fn test_no_events_no_rows() {
        assert!(favorite_genres(&pool(), &[]).is_empty());
    }
}

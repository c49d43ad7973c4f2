use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// One playback row from the listening log. Immutable input.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenEvent {
    pub user_id: String,
    pub song_id: String,
    #[serde(deserialize_with = "de_timestamp")]
    pub timestamp: NaiveDateTime,
    pub duration_sec: f64,
}

/// One catalog row from the song metadata file.
/// Descriptive columns beyond song_id/genre are ignored on read.
#[derive(Debug, Clone, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub genre: String,
}

/// A play joined against the catalog. Intermediate only — never persisted.
/// Projects exactly the fields the genre analyses consume.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedEvent {
    pub user_id: String,
    pub genre: String,
}

/// Output row: the single most-played genre for a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserFavoriteGenre {
    pub user_id: String,
    pub genre: String,
    pub play_count: u64,
}

/// Output row: arithmetic mean listen duration for a song.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvgListenTime {
    pub song_id: String,
    pub avg_duration_sec: f64,
}

/// Output row: genre concentration for a user. Only emitted when
/// loyalty_score is strictly above the retention threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreLoyaltyScore {
    pub user_id: String,
    pub max_genre_plays: u64,
    pub total_plays: u64,
    pub loyalty_score: f64,
}

/// Output row: membership only, no counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NightOwlUser {
    pub user_id: String,
}

/// Parse a naive wall-clock timestamp. Accepts the ISO `T` separator and
/// the space separator. No timezone normalization — the hour digits in the
/// input text are the hour used downstream.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_iso_separator() {
        let ts = parse_timestamp("2024-01-01T02:30:00").unwrap();
        assert_eq!(ts.hour(), 2);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn test_parse_space_separator() {
        let ts = parse_timestamp("2024-01-01 23:59:59").unwrap();
        assert_eq!(ts.hour(), 23);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("not-a-date").is_err());
        assert!(parse_timestamp("2024-01-01").is_err());
        assert!(parse_timestamp("2024-13-01T00:00:00").is_err());
    }
}

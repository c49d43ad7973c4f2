use std::collections::HashMap;

use crate::model::{EnrichedEvent, ListenEvent, SongRecord};

/// Counters from a join pass.
pub struct JoinSummary {
    pub matched: u64,
    pub dropped: u64,
    pub duplicate_songs: u64,
}

/// song_id → genre lookup built from the catalog.
///
/// Duplicate policy: first row wins. A catalog with repeated song_ids would
/// otherwise fan out every join hit for that song and inflate each affected
/// user's counts, so later duplicates are ignored and counted.
pub fn build_catalog(songs: &[SongRecord]) -> (HashMap<String, String>, u64) {
    let mut catalog: HashMap<String, String> = HashMap::with_capacity(songs.len());
    let mut duplicates = 0u64;

    for song in songs {
        if catalog.contains_key(&song.song_id) {
            duplicates += 1;
        } else {
            catalog.insert(song.song_id.clone(), song.genre.clone());
        }
    }

    if duplicates > 0 {
        log::warn!(
            "Catalog has {} duplicate song_id rows; first occurrence kept",
            duplicates
        );
    }

    (catalog, duplicates)
}

/// Inner-join events against the catalog. Events whose song_id has no
/// catalog row are dropped — songs missing metadata silently vanish from the
/// genre-dependent analyses, by design.
pub fn join_events(
    events: &[ListenEvent],
    songs: &[SongRecord],
) -> (Vec<EnrichedEvent>, JoinSummary) {
    let (catalog, duplicate_songs) = build_catalog(songs);

    let mut enriched = Vec::with_capacity(events.len());
    let mut dropped = 0u64;

    for event in events {
        match catalog.get(&event.song_id) {
            Some(genre) => enriched.push(EnrichedEvent {
                user_id: event.user_id.clone(),
                genre: genre.clone(),
            }),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::info!("{} events dropped (no catalog match)", dropped);
    }

    let summary = JoinSummary {
        matched: enriched.len() as u64,
        dropped,
        duplicate_songs,
    };
    (enriched, summary)
}

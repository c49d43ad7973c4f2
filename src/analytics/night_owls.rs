use std::collections::HashSet;

use chrono::Timelike;
use rayon::prelude::*;

use crate::model::{ListenEvent, NightOwlUser};

/// The late-night window: hour-of-day in [NIGHT_START, NIGHT_END).
/// Midnight through 4:59 counts; a 5:00:00 play does not.
const NIGHT_START: u32 = 0;
const NIGHT_END: u32 = 5;

fn is_night(event: &ListenEvent) -> bool {
    let hour = event.timestamp.hour();
    (NIGHT_START..NIGHT_END).contains(&hour)
}

/// Users with at least one play in the late-night window. Membership only —
/// no counts. Works on raw events; a catalog match is not required.
/// The hour is the naive wall-clock hour of the event timestamp.
pub fn night_owl_users(pool: &rayon::ThreadPool, events: &[ListenEvent]) -> Vec<NightOwlUser> {
    let distinct: HashSet<String> = pool.install(|| {
        events
            .par_iter()
            .filter(|e| is_night(e))
            .map(|e| e.user_id.clone())
            .collect()
    });

    let mut rows: Vec<NightOwlUser> = distinct
        .into_iter()
        .map(|user_id| NightOwlUser { user_id })
        .collect();
    rows.sort_by(|a, b| a.user_id.cmp(&b.user_id));
    rows
}

use std::fs::File;
use std::io::Read;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{ListenEvent, SongRecord};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed row in {path} (line {line}): {message}")]
    Row {
        path: String,
        line: u64,
        message: String,
    },
}

/// Load the listening log. Any malformed row (unparseable timestamp,
/// non-numeric duration, wrong column count) is fatal — no skip-and-continue.
pub fn load_events(path: &Path) -> Result<Vec<ListenEvent>, IngestError> {
    let file = open(path)?;
    let events = read_rows(file, path, "events")?;
    log::info!("Loaded {} listen events from {}", events.len(), path.display());
    Ok(events)
}

/// Load the song catalog. Columns beyond song_id/genre are ignored.
pub fn load_songs(path: &Path) -> Result<Vec<SongRecord>, IngestError> {
    let file = open(path)?;
    let songs = read_rows(file, path, "songs")?;
    log::info!("Loaded {} catalog rows from {}", songs.len(), path.display());
    Ok(songs)
}

fn open(path: &Path) -> Result<File, IngestError> {
    File::open(path).map_err(|source| IngestError::Open {
        path: path.display().to_string(),
        source,
    })
}

/// Deserialize every row of a headered CSV stream, failing on the first
/// malformed row with its 1-based line number.
fn read_rows<T: DeserializeOwned, R: Read>(
    reader: R,
    path: &Path,
    label: &str,
) -> Result<Vec<T>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {pos} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("{} read", label));

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let row: T = result.map_err(|e| row_error(path, &e))?;
        rows.push(row);
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(rows)
}

fn row_error(path: &Path, err: &csv::Error) -> IngestError {
    // Header line is 1, so the first data row reports as line 2.
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    IngestError::Row {
        path: path.display().to_string(),
        line,
        message: err.to_string(),
    }
}

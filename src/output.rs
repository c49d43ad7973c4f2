use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Output table names, one directory per table under the output root.
pub const TABLE_FAVORITES: &str = "user_favorite_genres";
pub const TABLE_AVG_LISTEN: &str = "avg_listen_time_per_song";
pub const TABLE_LOYALTY: &str = "genre_loyalty_scores";
pub const TABLE_NIGHT_OWLS: &str = "night_owl_users";

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV write error at {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

fn io_err(path: &Path, source: std::io::Error) -> OutputError {
    OutputError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Write one result table as `<out_dir>/<table>/part-00000.csv` with a
/// header row. Overwrite semantics: the table directory is removed and
/// recreated, so prior contents are replaced, never merged. Callers pass
/// rows pre-sorted by primary key, which makes repeat runs byte-identical.
pub fn write_table<T: Serialize>(
    out_dir: &Path,
    table: &str,
    rows: &[T],
) -> Result<u64, OutputError> {
    let table_dir = out_dir.join(table);
    if table_dir.exists() {
        std::fs::remove_dir_all(&table_dir).map_err(|e| io_err(&table_dir, e))?;
    }
    std::fs::create_dir_all(&table_dir).map_err(|e| io_err(&table_dir, e))?;

    let part = table_dir.join("part-00000.csv");
    let mut writer = csv::Writer::from_path(&part).map_err(|e| OutputError::Csv {
        path: part.display().to_string(),
        source: e,
    })?;

    for row in rows {
        writer.serialize(row).map_err(|e| OutputError::Csv {
            path: part.display().to_string(),
            source: e,
        })?;
    }
    writer.flush().map_err(|e| io_err(&part, e))?;

    log::debug!("Wrote {} rows to {}", rows.len(), part.display());
    Ok(rows.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AvgListenTime;
    use std::path::PathBuf;

    fn temp_out(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "spinlog-output-test-{}-{}",
            std::process::id(),
            name
        ));
        if dir.exists() {
            std::fs::remove_dir_all(&dir).unwrap();
        }
        dir
    }

    fn rows(pairs: &[(&str, f64)]) -> Vec<AvgListenTime> {
        pairs
            .iter()
            .map(|(song, avg)| AvgListenTime {
                song_id: song.to_string(),
                avg_duration_sec: *avg,
            })
            .collect()
    }

    #[test]
    fn test_header_and_rows() {
        let out = temp_out("header");
        let written = write_table(&out, TABLE_AVG_LISTEN, &rows(&[("s1", 30.0)])).unwrap();
        assert_eq!(written, 1);

        let contents =
            std::fs::read_to_string(out.join(TABLE_AVG_LISTEN).join("part-00000.csv")).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("song_id,avg_duration_sec"));
        assert_eq!(lines.next(), Some("s1,30.0"));
        assert_eq!(lines.next(), None);

        std::fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn test_overwrite_replaces_prior_contents() {
        let out = temp_out("overwrite");
        write_table(&out, TABLE_AVG_LISTEN, &rows(&[("s1", 30.0), ("s2", 10.0)])).unwrap();

        // A stray file from a prior run must not survive the rewrite.
        let stray = out.join(TABLE_AVG_LISTEN).join("part-00001.csv");
        std::fs::write(&stray, "leftover").unwrap();

        write_table(&out, TABLE_AVG_LISTEN, &rows(&[("s3", 5.0)])).unwrap();
        assert!(!stray.exists());

        let contents =
            std::fs::read_to_string(out.join(TABLE_AVG_LISTEN).join("part-00000.csv")).unwrap();
        assert!(contents.contains("s3"));
        assert!(!contents.contains("s1"));

        std::fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn test_repeat_runs_byte_identical() {
        let out = temp_out("idempotent");
        let data = rows(&[("s1", 1.5), ("s2", 2.0)]);

        write_table(&out, TABLE_AVG_LISTEN, &data).unwrap();
        let first =
            std::fs::read_to_string(out.join(TABLE_AVG_LISTEN).join("part-00000.csv")).unwrap();

        write_table(&out, TABLE_AVG_LISTEN, &data).unwrap();
        let second =
            std::fs::read_to_string(out.join(TABLE_AVG_LISTEN).join("part-00000.csv")).unwrap();

        assert_eq!(first, second);
        std::fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn test_unwritable_destination_is_fatal() {
        let err = write_table(
            &PathBuf::from("/dev/null/spinlog"),
            TABLE_AVG_LISTEN,
            &rows(&[("s1", 1.0)]),
        )
        .unwrap_err();
        assert!(matches!(err, OutputError::Io { .. } | OutputError::Csv { .. }));
    }
}

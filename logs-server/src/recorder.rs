//! Log Recorder
//!
//! Append-only text log. Each recorded message becomes exactly one line
//! with a local-time prefix; embedded newlines are collapsed so a single
//! request can never split across lines.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

/// Timestamp prefix format for every recorded line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct Recorder {
    writer: BufWriter<File>,
    path: PathBuf,
    lines_written: u64,
}

impl Recorder {
    /// Open (or create) the log file in append mode.
    pub fn new(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            lines_written: 0,
        })
    }

    /// Append one message as a single timestamped line. Flushes on every
    /// call; an acknowledged line is on disk.
    pub fn append(&mut self, message: &str) -> std::io::Result<()> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let flattened: String = message
            .trim()
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();

        writeln!(self.writer, "[{}] {}", timestamp, flattened)?;
        self.writer.flush()?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines appended since this recorder was opened.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Newest `count` lines of a log file, oldest first.
    pub fn tail(path: &Path, count: usize) -> std::io::Result<Vec<String>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;

        let start = lines.len().saturating_sub(count);
        Ok(lines[start..].to_vec())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn recorder_in(dir: &TempDir) -> (Recorder, PathBuf) {
        let path = dir.path().join("server_log.txt");
        (Recorder::new(&path).unwrap(), path)
    }

    #[test]
    fn test_append_writes_timestamped_line() {
        let dir = TempDir::new().unwrap();
        let (mut recorder, path) = recorder_in(&dir);

        recorder.append("patient stable").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let line = content.lines().next().unwrap();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] patient stable"));
        // The prefix holds a real date
        assert!(chrono::NaiveDate::parse_from_str(&line[1..11], "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_embedded_newlines_collapse_to_one_line() {
        let dir = TempDir::new().unwrap();
        let (mut recorder, path) = recorder_in(&dir);

        recorder.append("first\nsecond\r\nthird").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("first second"));
    }

    #[test]
    fn test_lines_written_counts_appends() {
        let dir = TempDir::new().unwrap();
        let (mut recorder, path) = recorder_in(&dir);

        for i in 0..4 {
            recorder.append(&format!("entry {}", i)).unwrap();
        }

        assert_eq!(recorder.lines_written(), 4);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 4);
    }

    #[test]
    fn test_tail_returns_newest_lines_in_order() {
        let dir = TempDir::new().unwrap();
        let (mut recorder, path) = recorder_in(&dir);

        for i in 1..=6 {
            recorder.append(&format!("entry {}", i)).unwrap();
        }

        let tail = Recorder::tail(&path, 2).unwrap();
        assert_eq!(tail.len(), 2);
        assert!(tail[0].contains("entry 5"));
        assert!(tail[1].contains("entry 6"));

        // Asking for more than exists returns everything
        let all = Recorder::tail(&path, 100).unwrap();
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_tail_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(Recorder::tail(&dir.path().join("absent.txt"), 10).is_err());
    }

    #[test]
    fn test_reopen_appends_rather_than_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("server_log.txt");

        Recorder::new(&path).unwrap().append("before restart").unwrap();
        Recorder::new(&path).unwrap().append("after restart").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("before restart"));
        assert!(content.contains("after restart"));
    }
}

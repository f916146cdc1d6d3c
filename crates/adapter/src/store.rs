//! Flat-file score persistence.
//!
//! The formats are inherited, not designed: the score table is one
//! `name,score` pair per line, best first, at most ten entries; the
//! personal-best file holds a single integer. A missing file is an
//! empty table; malformed lines are skipped with a warning.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

/// One scored game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// The high-score table, kept sorted descending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    entries: Vec<ScoreEntry>,
}

impl ScoreBoard {
    /// Entries retained in the table.
    pub const CAPACITY: usize = 10;

    pub fn new() -> Self {
        Self::default()
    }

    /// Read a table from disk. A missing file is an empty board.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("reading scores from {}", path.display()))
            }
        };

        let mut board = Self::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.split_once(',') {
                Some((name, score)) => match score.trim().parse::<u32>() {
                    Ok(score) => board.submit(ScoreEntry::new(name.trim(), score)),
                    Err(_) => {
                        log::warn!("skipping malformed score line: {line}");
                        continue;
                    }
                },
                None => {
                    log::warn!("skipping malformed score line: {line}");
                    continue;
                }
            };
        }
        Ok(board)
    }

    /// Write the table back out, one `name,score` line per entry.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut contents = String::new();
        for entry in &self.entries {
            contents.push_str(&entry.name);
            contents.push(',');
            contents.push_str(&entry.score.to_string());
            contents.push('\n');
        }
        fs::write(path, contents)
            .with_context(|| format!("writing scores to {}", path.display()))
    }

    /// Record an entry, keeping the table sorted and capped. Returns
    /// whether the entry made the table.
    pub fn submit(&mut self, entry: ScoreEntry) -> bool {
        let at = self
            .entries
            .iter()
            .position(|e| e.score < entry.score)
            .unwrap_or(self.entries.len());
        if at >= Self::CAPACITY {
            return false;
        }
        self.entries.insert(at, entry);
        self.entries.truncate(Self::CAPACITY);
        true
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read the personal-best file: a single integer, or nothing.
pub fn load_best(path: &Path) -> Result<Option<u32>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("reading best score from {}", path.display()))
        }
    };
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let best = trimmed
        .parse::<u32>()
        .with_context(|| format!("parsing best score from {}", path.display()))?;
    Ok(Some(best))
}

/// Overwrite the personal-best file.
pub fn save_best(path: &Path, score: u32) -> Result<()> {
    fs::write(path, format!("{score}\n"))
        .with_context(|| format!("writing best score to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gridfall-store-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_submit_keeps_descending_order() {
        let mut board = ScoreBoard::new();
        assert!(board.submit(ScoreEntry::new("ada", 100)));
        assert!(board.submit(ScoreEntry::new("brian", 300)));
        assert!(board.submit(ScoreEntry::new("chi", 200)));

        let scores: Vec<u32> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
    }

    #[test]
    fn test_submit_caps_the_table() {
        let mut board = ScoreBoard::new();
        for i in 0..ScoreBoard::CAPACITY as u32 {
            board.submit(ScoreEntry::new("p", 1000 - i));
        }
        assert!(!board.submit(ScoreEntry::new("low", 1)));
        assert!(board.submit(ScoreEntry::new("high", 5000)));
        assert_eq!(board.entries().len(), ScoreBoard::CAPACITY);
        assert_eq!(board.entries()[0].score, 5000);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let board = ScoreBoard::load(&temp_path("missing")).unwrap();
        assert!(board.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let path = temp_path("roundtrip");
        let mut board = ScoreBoard::new();
        board.submit(ScoreEntry::new("ada", 1280));
        board.submit(ScoreEntry::new("brian", 640));
        board.save(&path).unwrap();

        let loaded = ScoreBoard::load(&path).unwrap();
        assert_eq!(loaded, board);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_skips_malformed_lines() {
        let path = temp_path("malformed");
        fs::write(&path, "ada,1280\nnot a score line\nbrian,abc\nchi,640\n").unwrap();

        let board = ScoreBoard::load(&path).unwrap();
        assert_eq!(board.entries().len(), 2);
        assert_eq!(board.entries()[0].name, "ada");
        assert_eq!(board.entries()[1].name, "chi");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_best_score_round_trip() {
        let path = temp_path("best");
        assert_eq!(load_best(&path).unwrap(), None);
        save_best(&path, 4321).unwrap();
        assert_eq!(load_best(&path).unwrap(), Some(4321));
        let _ = fs::remove_file(&path);
    }
}

//! Append-only hall of fame: one `name seconds` line per win.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

/// Longest name kept in a record
pub const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub seconds: f64,
}

impl Record {
    /// Parse `"<name> <seconds>"`; the name may itself contain spaces.
    pub fn parse(line: &str) -> Option<Self> {
        let (name, seconds) = line.trim_end().rsplit_once(' ')?;
        Some(Self {
            name: name.to_string(),
            seconds: seconds.parse().ok()?,
        })
    }
}

pub struct HallOfFame {
    path: PathBuf,
}

impl HallOfFame {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record. Blank names are skipped; returns whether one was written.
    pub fn append(&self, name: &str, elapsed: Duration) -> anyhow::Result<bool> {
        let name: String = name
            .trim()
            .chars()
            .filter(|c| !c.is_control())
            .take(MAX_NAME_LEN)
            .collect();
        if name.is_empty() {
            return Ok(false);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("cannot open hall of fame file: {:?}", self.path))?;
        writeln!(file, "{} {:.2}", name, elapsed.as_secs_f64())
            .with_context(|| format!("failed to write hall of fame file: {:?}", self.path))?;
        log::info!("saved {:.2}s for {:?} to {:?}", elapsed.as_secs_f64(), name, self.path);
        Ok(true)
    }

    /// Raw lines of the file, or `None` if nothing has been recorded yet
    pub fn lines(&self) -> anyhow::Result<Option<Vec<String>>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents.lines().map(str::to_string).collect())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("failed to read hall of fame file: {:?}", self.path)),
        }
    }

    /// Parsed records in file order; malformed lines are skipped
    pub fn records(&self) -> anyhow::Result<Vec<Record>> {
        Ok(self
            .lines()?
            .unwrap_or_default()
            .iter()
            .filter_map(|line| Record::parse(line))
            .collect())
    }

    pub fn print(&self) -> anyhow::Result<()> {
        println!("\nHall of Fame:");
        match self.lines()? {
            Some(lines) if !lines.is_empty() => {
                for line in lines {
                    println!("{}", line);
                }
            }
            _ => println!("No previous records"),
        }
        Ok(())
    }
}

use crate::error::TrainerResult;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Append-only log of training progress (level completions, restarts)
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Journal in the config directory (respecting XDG)
    pub fn default_location() -> Self {
        Self::new(crate::config::config_dir().join("progress.log"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Write an entry to the journal
    pub fn log(&self, entry: &str) -> TrainerResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        writeln!(
            file,
            "[{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            entry
        )?;
        Ok(())
    }
}

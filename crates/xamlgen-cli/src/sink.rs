//! Artifact output and user notification.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use xamlgen_codegen::{ArtifactSink, Notifier};

/// Writes artifacts beneath an output directory.
///
/// SDK-style projects pick up new files by glob, so registration only
/// records the path.
#[derive(Debug)]
pub struct FsArtifactSink {
    root: PathBuf,
    registered: Vec<PathBuf>,
}

impl FsArtifactSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            registered: Vec::new(),
        }
    }

    pub fn registered(&self) -> &[PathBuf] {
        &self.registered
    }
}

impl ArtifactSink for FsArtifactSink {
    fn write_artifact(&mut self, path: &Path, text: &str) -> io::Result<()> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, text)?;
        debug!(path = %target.display(), bytes = text.len(), "wrote file");
        Ok(())
    }

    fn register_in_project(&mut self, path: &Path) -> Result<(), String> {
        if !self.root.join(path).is_file() {
            return Err(format!("{} was not written", path.display()));
        }
        self.registered.push(path.to_path_buf());
        Ok(())
    }
}

/// Prints notifications to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn report_success(&self, message: &str) {
        println!("{}", message);
    }

    fn report_error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }
}

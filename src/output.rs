//! Output directory handling and the append-only line sink

use crate::error::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// What to do with a log directory that already has content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingLogs {
    Delete,
    Keep,
    /// Ask on the terminal, but only when the directory is non-empty
    Ask,
}

impl ExistingLogs {
    pub fn from_flags(delete: bool, keep: bool) -> Self {
        match (delete, keep) {
            (true, _) => ExistingLogs::Delete,
            (false, true) => ExistingLogs::Keep,
            (false, false) => ExistingLogs::Ask,
        }
    }
}

fn is_non_empty_dir(dir: &Path) -> Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }
    let mut entries = fs::read_dir(dir).map_err(|e| Error::io("reading", dir, e))?;
    Ok(entries.next().is_some())
}

/// Ask whether to delete `dir` until the answer is yes or no.
///
/// End of input counts as "no".
pub fn ask_delete<I, O>(dir: &Path, input: &mut I, output: &mut O) -> Result<bool>
where
    I: BufRead,
    O: Write,
{
    loop {
        write!(
            output,
            "Log directory '{}' exists and is not empty. Delete existing logs? (yes/no): ",
            dir.display()
        )
        .and_then(|_| output.flush())
        .map_err(Error::Prompt)?;

        let mut answer = String::new();
        if input.read_line(&mut answer).map_err(Error::Prompt)? == 0 {
            writeln!(output).map_err(Error::Prompt)?;
            return Ok(false);
        }

        match answer.trim().to_lowercase().as_str() {
            "yes" | "y" => return Ok(true),
            "no" | "n" => return Ok(false),
            _ => writeln!(output, "Invalid input. Please enter 'yes' or 'no'.").map_err(Error::Prompt)?,
        }
    }
}

/// Apply `policy` to `dir` and make sure it exists afterwards.
pub fn prepare_log_dir<I, O>(
    dir: &Path,
    policy: ExistingLogs,
    input: &mut I,
    output: &mut O,
) -> Result<()>
where
    I: BufRead,
    O: Write,
{
    let delete = match policy {
        ExistingLogs::Delete => true,
        ExistingLogs::Keep => false,
        ExistingLogs::Ask => is_non_empty_dir(dir)? && ask_delete(dir, input, output)?,
    };

    if delete && dir.exists() {
        info!(dir = %dir.display(), "Deleting existing log directory");
        fs::remove_dir_all(dir).map_err(|e| Error::io("deleting", dir, e))?;
    }

    fs::create_dir_all(dir).map_err(|e| Error::io("creating", dir, e))
}

/// Appends lines to the log file and mirrors them to a second writer.
///
/// The file is flushed after every line.
pub struct LogSink<W: Write> {
    path: PathBuf,
    file: File,
    mirror: W,
    lines: u64,
}

impl<W: Write> LogSink<W> {
    pub fn open(path: impl Into<PathBuf>, mirror: W) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::io("opening", &path, e))?;

        Ok(Self {
            path,
            file,
            mirror,
            lines: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines_written(&self) -> u64 {
        self.lines
    }

    /// The file gets the line first; a failing mirror never costs the file a line.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.file, "{line}")
            .and_then(|_| self.file.flush())
            .map_err(|e| Error::io("writing", &self.path, e))?;
        self.lines += 1;

        writeln!(self.mirror, "{line}")
            .and_then(|_| self.mirror.flush())
            .map_err(|e| Error::io("mirroring", "<stdout>", e))
    }

    pub fn into_mirror(self) -> W {
        self.mirror
    }
}

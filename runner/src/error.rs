use std::fmt;

/// A block that failed when the aggregate script ran under `bash -e`.
#[derive(Debug)]
pub struct BlockFailure {
    /// The file the block came from.
    pub file_name: String,
    /// The block's first label.
    pub label: String,
    /// Zero-based position of the block within its bucket's script.
    pub index: usize,
    /// Number of blocks in that script.
    pub block_count: usize,
    /// The block's code, for the failure report.
    pub code: String,
    /// Exit status of the subshell, if it exited normally.
    pub status: Option<i32>,
    /// Captured stderr of the whole run.
    pub stderr: String,
}

impl fmt::Display for BlockFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => writeln!(
                f,
                "block '@{}' ({}/{} in {}) failed with exit status {}",
                self.label,
                self.index + 1,
                self.block_count,
                self.file_name,
                code
            )?,
            None => writeln!(
                f,
                "block '@{}' ({}/{} in {}) was killed by a signal",
                self.label,
                self.index + 1,
                self.block_count,
                self.file_name
            )?,
        }
        writeln!(f, "script was:")?;
        write!(f, "{}", self.code)?;
        if !self.code.ends_with('\n') {
            writeln!(f)?;
        }
        if !self.stderr.is_empty() {
            writeln!(f, "stderr:")?;
            write!(f, "{}", self.stderr)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum RunnerError {
    /// Could not stage or spawn the subshell.
    Io(String),
    /// The subshell ran and a block failed.
    BlockFailed(BlockFailure),
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::Io(msg) => write!(f, "I/O error: {}", msg),
            RunnerError::BlockFailed(failure) => failure.fmt(f),
        }
    }
}

impl std::error::Error for RunnerError {}

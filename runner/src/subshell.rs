use std::io::Write;
use std::process::Command;

use tangle::script::ScriptBucket;

use crate::error::{BlockFailure, RunnerError};

/// Marker echoed to stdout before each block runs, so a failure can be
/// attributed to the block that was executing when `bash -e` bailed out.
const TRACER: &str = "__tangle_block__";

/// Outcome of a successful run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Number of blocks that ran to completion.
    pub completed: usize,
    /// Captured stderr of the subshell (warnings from otherwise
    /// successful commands).
    pub stderr: String,
}

/// Run every block of every bucket as one `bash -e` subshell.
///
/// All blocks execute in a single shell process, so environment
/// variables and the working directory persist from block to block
/// within one invocation. The first failing command stops the run;
/// the failure is reported against the block that contained it.
/// Block stdout (tracer lines stripped) is forwarded to `output`.
pub fn run_in_subshell(
    buckets: &[ScriptBucket],
    output: &mut dyn Write,
) -> Result<RunOutcome, RunnerError> {
    let mut file = tempfile::NamedTempFile::new()
        .map_err(|e| RunnerError::Io(format!("cannot create script file: {}", e)))?;
    file.write_all(aggregate(buckets).as_bytes())
        .map_err(|e| RunnerError::Io(format!("cannot write script file: {}", e)))?;
    file.flush()
        .map_err(|e| RunnerError::Io(format!("cannot write script file: {}", e)))?;

    let out = Command::new("bash")
        .arg("-e")
        .arg(file.path())
        .output()
        .map_err(|e| RunnerError::Io(format!("cannot spawn bash: {}", e)))?;

    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr).into_owned();

    let mut started = 0usize;
    let mut last_started: Option<(usize, usize)> = None;
    for line in stdout.lines() {
        // Only trust tracer lines that name a real block; a block's own
        // output can contain tracer-shaped text.
        match parse_tracer(line) {
            Some((bucket, block)) if block_exists(buckets, bucket, block) => {
                last_started = Some((bucket, block));
                started += 1;
            }
            _ => {
                writeln!(output, "{}", line)
                    .map_err(|e| RunnerError::Io(format!("cannot forward output: {}", e)))?;
            }
        }
    }

    if out.status.success() {
        return Ok(RunOutcome {
            completed: started,
            stderr,
        });
    }

    let Some((bucket_index, block_index)) = last_started else {
        return Err(RunnerError::Io(format!(
            "bash exited with {} before any block ran",
            out.status
        )));
    };
    let bucket = &buckets[bucket_index];
    let block = &bucket.script.blocks[block_index];
    Err(RunnerError::BlockFailed(BlockFailure {
        file_name: bucket.file_name.clone(),
        label: block.display_label().to_string(),
        index: block_index,
        block_count: bucket.script.len(),
        code: block.code.clone(),
        status: out.status.code(),
        stderr,
    }))
}

/// Concatenate all blocks into one script, each preceded by a tracer line.
fn aggregate(buckets: &[ScriptBucket]) -> String {
    let mut script = String::new();
    for (bucket_index, bucket) in buckets.iter().enumerate() {
        for (block_index, block) in bucket.script.blocks.iter().enumerate() {
            script.push_str(&format!(
                "echo '{} {} {}'\n",
                TRACER, bucket_index, block_index
            ));
            script.push_str(&block.code);
            if !block.code.ends_with('\n') {
                script.push('\n');
            }
        }
    }
    script
}

fn block_exists(buckets: &[ScriptBucket], bucket: usize, block: usize) -> bool {
    buckets
        .get(bucket)
        .is_some_and(|b| b.script.blocks.get(block).is_some())
}

fn parse_tracer(line: &str) -> Option<(usize, usize)> {
    let rest = line.strip_prefix(TRACER)?;
    let mut parts = rest.split_whitespace();
    let bucket = parts.next()?.parse().ok()?;
    let block = parts.next()?.parse().ok()?;
    Some((bucket, block))
}

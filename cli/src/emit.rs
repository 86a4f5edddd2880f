use std::io::{self, Write};

use tangle::script::ScriptBucket;

/// Write one bucket's blocks, bracketed by delimiter rows and an `echo`
/// tracer naming the block, so the emitted script narrates its progress.
fn dump_bucket(out: &mut dyn Write, label: &str, bucket: &ScriptBucket) -> io::Result<()> {
    writeln!(out, "#\n# Script @{} from {} \n#", label, bucket.file_name)?;
    let delim = format!("#{}#", "-".repeat(70));
    for (i, block) in bucket.script.blocks.iter().enumerate() {
        writeln!(out, "{}  Start {}", delim, i + 1)?;
        writeln!(
            out,
            "echo \"Block '{}' ({}/{} in {}) of {}\"\n####",
            block.display_label(),
            i + 1,
            bucket.script.len(),
            label,
            bucket.file_name
        )?;
        write!(out, "{}", block.code)?;
        writeln!(out, "{}  End {}", delim, i + 1)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Emit every bucket's script back to back.
pub fn emit_straight_script(
    out: &mut dyn Write,
    label: &str,
    buckets: &[ScriptBucket],
) -> io::Result<()> {
    for bucket in buckets {
        dump_bucket(out, label, bucket)?;
    }
    writeln!(out, "echo \"All done.  No errors.\"")
}

/// Emit the first bucket normally, then wrap the remaining buckets in a
/// `bash -e` heredoc with an error trap.
///
/// The first script runs in the active shell and should only define
/// environment; everything that can fail goes in the subshell, so the
/// aggregate can exit on error without killing the shell that sourced it.
pub fn emit_preambled_script(
    out: &mut dyn Write,
    label: &str,
    buckets: &[ScriptBucket],
) -> io::Result<()> {
    let Some((first, rest)) = buckets.split_first() else {
        return Ok(());
    };
    dump_bucket(out, label, first)?;
    let delim = "HANDLED_SCRIPT";
    writeln!(out, " bash -e <<'{}'", delim)?;
    writeln!(
        out,
        "function handleTrouble() {{ echo \"Unable to continue!\"; exit 1; }}"
    )?;
    writeln!(out, "trap handleTrouble INT TERM EXIT")?;
    for bucket in rest {
        dump_bucket(out, label, bucket)?;
    }
    writeln!(out, "echo \"All done.  No errors.\"")?;
    writeln!(out, "{}", delim)
}

mod emit;

use std::process;

use clap::Parser;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use runner::RunnerError;
use tangle::script::ScriptBucket;

#[derive(Parser)]
#[command(
    name = "tangle",
    version,
    about = "Extract code blocks labeled '<!-- @label -->' from markdown files, \
             and either emit them as one script or run them in a subshell"
)]
struct Cli {
    /// Label of the blocks to extract
    label: String,

    /// Markdown files to read, in order
    #[arg(required = true)]
    files: Vec<String>,

    /// Place all scripts but the first into a subshell program
    #[arg(long)]
    preambled: bool,

    /// Run extracted blocks in a subshell (leaves your env vars and pwd unchanged)
    #[arg(long)]
    subshell: bool,

    /// Swallow errors from the subshell (non-zero exit only on driver problems)
    #[arg(long)]
    swallow: bool,

    /// Disable colored error output
    #[arg(long)]
    no_color: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.swallow && !cli.subshell {
        eprintln!("error: --swallow makes no sense without --subshell");
        process::exit(1);
    }

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    // Set up codespan file database
    let mut files = SimpleFiles::new();
    let mut buckets: Vec<ScriptBucket> = Vec::new();

    for file_name in &cli.files {
        let source = match std::fs::read_to_string(file_name) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", file_name, e);
                process::exit(2);
            }
        };
        let file_id = files.add(file_name.clone(), source.clone());

        let library = match tangle::parser::Parser::new(source, file_id).parse() {
            Ok(library) => library,
            Err(error) => {
                let writer = StandardStream::stderr(color_choice);
                let config = term::Config::default();
                let diagnostic = error.to_diagnostic();
                let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
                process::exit(1);
            }
        };

        match library.get(&cli.label) {
            Some(script) => buckets.push(ScriptBucket::new(file_name.clone(), script.clone())),
            None => {
                let available = library.labels();
                eprintln!(
                    "error: no block labeled '@{}' in '{}' (available labels: {})",
                    cli.label,
                    file_name,
                    if available.is_empty() {
                        "none".to_string()
                    } else {
                        available.join(", ")
                    }
                );
                process::exit(3);
            }
        }
    }

    let mut stdout = std::io::stdout();

    if !cli.subshell {
        let result = if cli.preambled {
            emit::emit_preambled_script(&mut stdout, &cli.label, &buckets)
        } else {
            emit::emit_straight_script(&mut stdout, &cli.label, &buckets)
        };
        if let Err(e) = result {
            eprintln!("error: cannot write script: {}", e);
            process::exit(1);
        }
        return;
    }

    match runner::run_in_subshell(&buckets, &mut stdout) {
        Ok(outcome) => {
            if !outcome.stderr.is_empty() {
                eprint!("{}", outcome.stderr);
            }
        }
        Err(RunnerError::BlockFailed(failure)) => {
            eprint!("{}", failure);
            if !cli.swallow {
                process::exit(1);
            }
        }
        Err(error) => {
            eprintln!("error: {}", error);
            process::exit(1);
        }
    }
}

use runner::{RunOutcome, RunnerError, run_in_subshell};
use tangle::parser::Parser;
use tangle::script::ScriptBucket;

fn bucket(source: &str, label: &str, file_name: &str) -> ScriptBucket {
    let library = Parser::new(source.to_string(), 0)
        .parse()
        .expect("parse failed");
    let script = library.get(label).expect("label not found").clone();
    ScriptBucket::new(file_name, script)
}

fn run(source: &str, label: &str) -> (Result<RunOutcome, RunnerError>, String) {
    let mut output = Vec::new();
    let result = run_in_subshell(&[bucket(source, label, "test.md")], &mut output);
    (result, String::from_utf8(output).expect("non-utf8 output"))
}

#[test]
fn blocks_run_in_document_order() {
    let source = "<!-- @go -->\n```\necho first\n```\n<!-- @go -->\n```\necho second\n```\n";
    let (result, output) = run(source, "go");
    let outcome = result.expect("run failed");
    assert_eq!(outcome.completed, 2);
    assert_eq!(output, "first\nsecond\n");
}

#[test]
fn environment_persists_across_blocks() {
    let source = "<!-- @go -->\n```\nGREETING=hello\n```\n<!-- @go -->\n```\necho $GREETING\n```\n";
    let (result, output) = run(source, "go");
    result.expect("run failed");
    assert_eq!(output, "hello\n");
}

#[test]
fn failing_block_is_identified() {
    let source = "<!-- @first @go -->\n```\necho ok\n```\n\
<!-- @boom @go -->\n```\nexit 3\n```\n\
<!-- @after @go -->\n```\necho never\n```\n";
    let (result, output) = run(source, "go");
    match result {
        Err(RunnerError::BlockFailed(failure)) => {
            assert_eq!(failure.label, "boom");
            assert_eq!(failure.index, 1);
            assert_eq!(failure.block_count, 3);
            assert_eq!(failure.status, Some(3));
            assert_eq!(failure.file_name, "test.md");
        }
        other => panic!("expected block failure, got {:?}", other),
    }
    assert!(output.contains("ok"));
    assert!(!output.contains("never"));
}

#[test]
fn fail_fast_within_a_block() {
    let source = "<!-- @go -->\n```\nfalse\necho after\n```\n";
    let (result, output) = run(source, "go");
    match result {
        Err(RunnerError::BlockFailed(failure)) => {
            assert_eq!(failure.index, 0);
            assert_eq!(failure.status, Some(1));
        }
        other => panic!("expected block failure, got {:?}", other),
    }
    assert!(!output.contains("after"));
}

#[test]
fn stderr_is_captured_on_success() {
    let source = "<!-- @go -->\n```\necho warning >&2\necho done\n```\n";
    let (result, output) = run(source, "go");
    let outcome = result.expect("run failed");
    assert!(outcome.stderr.contains("warning"));
    assert_eq!(output, "done\n");
}

#[test]
fn failure_names_the_right_file() {
    let first = bucket("<!-- @go -->\n```\necho a\n```\n", "go", "a.md");
    let second = bucket("<!-- @go -->\n```\nexit 2\n```\n", "go", "b.md");
    let mut output = Vec::new();
    match run_in_subshell(&[first, second], &mut output) {
        Err(RunnerError::BlockFailed(failure)) => {
            assert_eq!(failure.file_name, "b.md");
            assert_eq!(failure.index, 0);
        }
        other => panic!("expected block failure, got {:?}", other),
    }
}

#[test]
fn tracer_shaped_block_output_is_ordinary_output() {
    let source = "<!-- @go -->\n```\necho '__tangle_block__ 7 7'\nexit 4\n```\n";
    let (result, output) = run(source, "go");
    match result {
        Err(RunnerError::BlockFailed(failure)) => {
            assert_eq!(failure.index, 0);
            assert_eq!(failure.status, Some(4));
            assert_eq!(failure.file_name, "test.md");
        }
        other => panic!("expected block failure, got {:?}", other),
    }
    assert!(output.contains("__tangle_block__ 7 7"));
}

#[test]
fn empty_bucket_list_is_a_no_op() {
    let mut output = Vec::new();
    let outcome = run_in_subshell(&[], &mut output).expect("run failed");
    assert_eq!(outcome.completed, 0);
    assert!(output.is_empty());
}

use std::sync::Arc;

/// One fenced code segment plus the labels that annotate it.
/// Immutable once built; shared by every script whose label it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock {
    /// Labels in annotation order, deduplicated.
    pub labels: Vec<String>,
    /// Verbatim fence contents, newline-preserving.
    pub code: String,
}

impl ScriptBlock {
    pub fn new(labels: Vec<String>, code: String) -> Self {
        ScriptBlock { labels, code }
    }

    /// The label used when reporting on this block: the first one written.
    pub fn display_label(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or("")
    }
}

/// The ordered sequence of blocks associated with one label.
/// Append-only; block order is document order of the originating fences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub blocks: Vec<Arc<ScriptBlock>>,
}

impl Script {
    pub fn empty() -> Self {
        Script { blocks: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }
}

/// The script selected for one requested label from one source file.
/// Built by the driver after extraction; consumed by emission/execution.
#[derive(Debug, Clone)]
pub struct ScriptBucket {
    pub file_name: String,
    pub script: Script,
}

impl ScriptBucket {
    pub fn new(file_name: impl Into<String>, script: Script) -> Self {
        ScriptBucket {
            file_name: file_name.into(),
            script,
        }
    }
}

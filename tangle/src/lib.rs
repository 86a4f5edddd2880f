pub mod lexer;
pub mod parser;
pub mod script;

use std::collections::HashMap;

use crate::script::Script;

/// All labeled scripts extracted from one markdown document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    pub(crate) scripts: HashMap<String, Script>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

impl Library {
    /// Look up the script for a label. Labels are case-sensitive.
    pub fn get(&self, label: &str) -> Option<&Script> {
        self.scripts.get(label)
    }

    /// All labels with at least one block, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.scripts.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

pub mod error;

pub use error::ParseError;

use std::collections::HashMap;
use std::sync::Arc;

use crate::Library;
use crate::lexer::{Lexer, Token};
use crate::script::{Script, ScriptBlock};

/// Parser entry point: drives the lexer over one document and
/// aggregates code blocks under their labels.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse the source into a label -> Script library.
    ///
    /// Consecutive `@label` annotations all apply to the next code block;
    /// the pending run is cleared after each block. A block with no
    /// pending labels is consumed but stored under no label. A lexer
    /// error aborts the parse; no partial library is returned.
    pub fn parse(&self) -> Result<Library, ParseError> {
        let mut lexer = Lexer::new(&self.source);
        let mut scripts: HashMap<String, Script> = HashMap::new();
        let mut pending: Vec<String> = Vec::new();

        loop {
            match lexer.next_token() {
                Token::BlockLabel(label) => {
                    // Applying the same label twice to one block is a no-op.
                    if !pending.contains(&label) {
                        pending.push(label);
                    }
                }
                Token::CodeBlock(code) => {
                    let block = Arc::new(ScriptBlock::new(std::mem::take(&mut pending), code));
                    for label in &block.labels {
                        scripts
                            .entry(label.clone())
                            .or_insert_with(Script::empty)
                            .blocks
                            .push(Arc::clone(&block));
                    }
                }
                Token::Eof => {
                    return Ok(Library {
                        scripts,
                        source_id: self.file_id,
                    });
                }
                Token::Error { message, span } => {
                    return Err(ParseError::new(message, span, self.file_id)
                        .with_note("the input ended before the closing delimiter"));
                }
            }
        }
    }
}

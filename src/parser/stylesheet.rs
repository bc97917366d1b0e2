use super::document::{AtRuleNode, Node, RuleNode, StyleDocument};
use super::Dialect;
use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, SourceLocation, SourcePosition, Token};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

/// What made a stylesheet unparsable
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    #[error("Unclosed block")]
    UnclosedBlock,
    #[error("Unclosed bracket")]
    UnclosedBracket,
    #[error("Unclosed comment")]
    UnclosedComment,
    #[error("Unclosed string")]
    UnclosedString,
    #[error("Unclosed url")]
    BadUrl,
    #[error("Unexpected }}")]
    UnexpectedClose,
    #[error("Invalid syntax")]
    InvalidSyntax,
}

/// Stylesheet errors. Both are local to the stylesheet: the analysis
/// reports them and produces no findings instead of failing the run.
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}:{column}: {reason}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        reason: Malformed,
    },
}

impl StylesheetError {
    pub fn path(&self) -> &Path {
        match self {
            StylesheetError::Read { path, .. } | StylesheetError::Parse { path, .. } => path,
        }
    }
}

/// Builds a rule tree out of `cssparser` tokens
#[derive(Debug, Clone, Copy)]
pub struct StyleParser {
    dialect: Dialect,
}

impl StyleParser {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Parser whose dialect is picked from the file suffix
    pub fn for_path(path: &Path) -> Self {
        Self::new(Dialect::from_path(path))
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Read and parse a stylesheet from disk
    pub fn parse_file(&self, path: &Path) -> Result<StyleDocument, StylesheetError> {
        let contents = std::fs::read_to_string(path).map_err(|source| StylesheetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(path, &contents)
    }

    /// Parse stylesheet text. `path` only identifies the document.
    pub fn parse(&self, path: &Path, contents: &str) -> Result<StyleDocument, StylesheetError> {
        let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
        let source = self.dialect.prepare(contents);
        let mut input = ParserInput::new(&source);
        let mut parser = Parser::new(&mut input);
        let mut walker = BlockWalker {
            source: &source,
            dialect: self.dialect,
            last_block_end: 0,
        };

        let nodes = walker.parse_block(&mut parser).map_err(|error| {
            let reason = match error.kind {
                ParseErrorKind::Custom(reason) => reason,
                ParseErrorKind::Basic(_) => Malformed::InvalidSyntax,
            };
            StylesheetError::Parse {
                path: path.to_path_buf(),
                line: error.location.line as usize + 1,
                column: error.location.column as usize,
                reason,
            }
        })?;

        debug!(
            "Parsed {} as {}: {} top-level nodes",
            path.display(),
            self.dialect,
            nodes.len()
        );

        Ok(StyleDocument {
            path: path.to_path_buf(),
            dialect: self.dialect,
            nodes,
        })
    }
}

type WalkResult<'i, T> = Result<T, ParseError<'i, Malformed>>;

fn malformed<'i>(reason: Malformed, location: SourceLocation) -> ParseError<'i, Malformed> {
    ParseError {
        kind: ParseErrorKind::Custom(reason),
        location,
    }
}

/// Walks one block level at a time. `cssparser` silently closes blocks at
/// end of input, so closing is verified against the raw text: a block is
/// closed when its last byte is the closing delimiter and that byte was not
/// already consumed by an inner block.
struct BlockWalker<'s> {
    source: &'s str,
    dialect: Dialect,
    last_block_end: usize,
}

impl BlockWalker<'_> {
    /// Parse statements until the end of the current block
    fn parse_block<'i>(&mut self, input: &mut Parser<'i, '_>) -> WalkResult<'i, Vec<Node>> {
        let mut nodes = Vec::new();

        loop {
            self.skip_trivia(input)?;

            let start = input.position();
            let location = input.current_source_location();
            let mut prelude_end = start;
            let mut after_hash = false;

            loop {
                let before = input.position();
                let token_location = input.current_source_location();
                let token = match input.next_including_whitespace_and_comments() {
                    Ok(token) => token.clone(),
                    Err(_) => return Ok(nodes),
                };
                let is_hash = matches!(token, Token::Delim('#'));

                match token {
                    Token::Semicolon => break,
                    Token::CurlyBracketBlock if after_hash && self.dialect.supports_interpolation() => {
                        input.parse_nested_block(|nested| self.skip_nested(nested))?;
                        self.close_block(input, b'}', token_location, Malformed::UnclosedBlock)?;
                        prelude_end = input.position();
                    }
                    Token::CurlyBracketBlock => {
                        let prelude = input.slice(start..prelude_end).trim();
                        let children = input.parse_nested_block(|nested| self.parse_block(nested))?;
                        self.close_block(input, b'}', token_location, Malformed::UnclosedBlock)?;
                        trace!("Block at {}:{}: {:?}", location.line + 1, location.column, prelude);
                        nodes.push(node_for(prelude, location, children));
                        break;
                    }
                    Token::CloseCurlyBracket => {
                        return Err(malformed(Malformed::UnexpectedClose, token_location));
                    }
                    Token::WhiteSpace(_) => {}
                    Token::Comment(_) => self.check_comment(input, before, token_location)?,
                    other => {
                        self.check_token(input, &other, before, token_location)?;
                        prelude_end = input.position();
                    }
                }

                after_hash = is_hash;
            }
        }
    }

    /// Consume whitespace and comments, stopping before the next real token
    fn skip_trivia<'i>(&mut self, input: &mut Parser<'i, '_>) -> WalkResult<'i, ()> {
        loop {
            let state = input.state();
            let location = input.current_source_location();
            match input.next_including_whitespace_and_comments() {
                Ok(Token::WhiteSpace(_)) => {}
                Ok(Token::Comment(_)) => self.check_comment(input, state.position(), location)?,
                _ => {
                    input.reset(&state);
                    return Ok(());
                }
            }
        }
    }

    /// Consume the rest of a bracketed block that holds no rules
    fn skip_nested<'i>(&mut self, input: &mut Parser<'i, '_>) -> WalkResult<'i, ()> {
        loop {
            let before = input.position();
            let location = input.current_source_location();
            let token = match input.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => return Ok(()),
            };
            match token {
                Token::CurlyBracketBlock => {
                    input.parse_nested_block(|nested| self.skip_nested(nested))?;
                    self.close_block(input, b'}', location, Malformed::UnclosedBlock)?;
                }
                Token::Comment(_) => self.check_comment(input, before, location)?,
                other => self.check_token(input, &other, before, location)?,
            }
        }
    }

    /// Validate a token that is neither a curly block nor a comment
    fn check_token<'i>(
        &mut self,
        input: &mut Parser<'i, '_>,
        token: &Token<'i>,
        before: SourcePosition,
        location: SourceLocation,
    ) -> WalkResult<'i, ()> {
        match token {
            Token::BadString(_) => Err(malformed(Malformed::UnclosedString, location)),
            // `url($base + '/x.png')` is an expression in SCSS, not a bad url
            Token::BadUrl(_) if self.dialect == Dialect::Extended => {
                if input.slice_from(before).ends_with(')') {
                    Ok(())
                } else {
                    Err(malformed(Malformed::BadUrl, location))
                }
            }
            Token::BadUrl(_) => Err(malformed(Malformed::BadUrl, location)),
            Token::QuotedString(_) => {
                let raw = input.slice_from(before).as_bytes();
                if raw.len() >= 2 && raw[raw.len() - 1] == raw[0] {
                    Ok(())
                } else {
                    Err(malformed(Malformed::UnclosedString, location))
                }
            }
            Token::Function(_) | Token::ParenthesisBlock => {
                input.parse_nested_block(|nested| self.skip_nested(nested))?;
                self.close_block(input, b')', location, Malformed::UnclosedBracket)
            }
            Token::SquareBracketBlock => {
                input.parse_nested_block(|nested| self.skip_nested(nested))?;
                self.close_block(input, b']', location, Malformed::UnclosedBracket)
            }
            _ => Ok(()),
        }
    }

    fn check_comment<'i>(
        &self,
        input: &Parser<'i, '_>,
        start: SourcePosition,
        location: SourceLocation,
    ) -> WalkResult<'i, ()> {
        let raw = input.slice_from(start);
        if raw.len() >= 4 && raw.ends_with("*/") {
            Ok(())
        } else {
            Err(malformed(Malformed::UnclosedComment, location))
        }
    }

    /// Verify that the block just consumed ended on its own delimiter
    fn close_block<'i>(
        &mut self,
        input: &Parser<'i, '_>,
        delimiter: u8,
        opened_at: SourceLocation,
        reason: Malformed,
    ) -> WalkResult<'i, ()> {
        let end = input.position().byte_index();
        let closed = end > self.last_block_end && self.source.as_bytes()[..end].last() == Some(&delimiter);
        self.last_block_end = end;
        if closed {
            Ok(())
        } else {
            Err(malformed(reason, opened_at))
        }
    }
}

fn node_for(prelude: &str, location: SourceLocation, children: Vec<Node>) -> Node {
    let line = location.line as usize + 1;
    let column = location.column as usize;

    match prelude.strip_prefix('@') {
        Some(rest) => {
            let name_end = rest
                .find(|c: char| c.is_whitespace() || c == '(')
                .unwrap_or(rest.len());
            Node::AtRule(AtRuleNode {
                name: rest[..name_end].to_string(),
                params: rest[name_end..].trim().to_string(),
                line,
                column,
                children,
            })
        }
        None => Node::Rule(RuleNode {
            selector: prelude.to_string(),
            line,
            column,
            children,
        }),
    }
}

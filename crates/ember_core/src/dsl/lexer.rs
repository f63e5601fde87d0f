//! Tokenizer for the scene language.
//!
//! Splits source text into words and the two punctuation marks `;` and `:`,
//! tracking the line each token starts on. `//` starts a comment that runs
//! to the end of the line.

use std::fmt;

/// Kinds of tokens in scene text.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Keyword, identifier or number. Interpretation is up to the parser.
    Word(String),
    /// `;` statement terminator
    Semicolon,
    /// `:` separates a material name from its type
    Colon,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Word(word) => write!(f, "{word}"),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Colon => write!(f, ":"),
        }
    }
}

/// A token and the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

/// Split scene text into tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut word_line = 1;
    let mut line = 1;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        let punct = match c {
            ';' => Some(TokenKind::Semicolon),
            ':' => Some(TokenKind::Colon),
            _ => None,
        };

        let is_comment = c == '/' && chars.peek() == Some(&'/');
        if c.is_whitespace() || punct.is_some() || is_comment {
            flush_word(&mut word, word_line, &mut tokens);
        }

        if is_comment {
            // Skip to the newline but leave it for the line counter
            while chars.peek().is_some_and(|&next| next != '\n') {
                chars.next();
            }
        } else if let Some(kind) = punct {
            tokens.push(Token { kind, line });
        } else if c == '\n' {
            line += 1;
        } else if !c.is_whitespace() {
            if word.is_empty() {
                word_line = line;
            }
            word.push(c);
        }
    }
    flush_word(&mut word, word_line, &mut tokens);

    tokens
}

fn flush_word(word: &mut String, line: usize, tokens: &mut Vec<Token>) {
    if !word.is_empty() {
        tokens.push(Token {
            kind: TokenKind::Word(std::mem::take(word)),
            line,
        });
    }
}

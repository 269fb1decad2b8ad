//! Token definitions for annotated query markup
//!
//!     The markup alphabet is tiny: the four brackets, the pipe separator,
//!     and literal runs of everything else. Tokens are defined with the logos
//!     derive macro; literal runs keep their source slice so the parser can
//!     copy them into the raw query text verbatim.

use logos::Logos;

/// All possible tokens in annotated query markup.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupToken {
    #[token("{")]
    OpenEntity,

    #[token("}")]
    CloseEntity,

    #[token("[")]
    OpenGroup,

    #[token("]")]
    CloseGroup,

    #[token("|")]
    Pipe,

    // Literal run: everything that is not markup syntax.
    #[regex(r"[^{}\[\]|]+")]
    Text,
}

/// Tokenize a markup string, keeping each token's source slice.
///
/// The token set covers every character, so lexing cannot fail; the error arm
/// reports the character offset of the offending input if logos ever
/// disagrees.
pub fn tokenize(source: &str) -> Result<Vec<(MarkupToken, &str)>, usize> {
    let mut lexer = MarkupToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.slice())),
            Err(()) => return Err(source[..lexer.span().start].chars().count()),
        }
    }

    Ok(tokens)
}

//! Pluggable value validation.
//!
//! The parser optionally asks a [`ValueValidator`] whether a candidate value
//! is acceptable for a property, mirroring a host's native `supports` check.
//! Without a validator values are accepted optimistically.

use cssparser::{Parser, ParserInput, Token};

use crate::style::Property;

/// Decides whether `value` is acceptable for `property`.
pub trait ValueValidator {
    fn supports(&self, property: &Property, value: &str) -> bool;
}

impl<F> ValueValidator for F
where
    F: Fn(&Property, &str) -> bool,
{
    fn supports(&self, property: &Property, value: &str) -> bool {
        self(property, value)
    }
}

/// Accepts any value that is a well-formed CSS component value list.
///
/// Rejects bad strings and urls, stray closing brackets, and the `;`, `!`,
/// `{` and `}` tokens that would end or escape a declaration. This does not
/// check the value against the property's grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssSyntaxValidator;

impl ValueValidator for CssSyntaxValidator {
    fn supports(&self, _property: &Property, value: &str) -> bool {
        !value.trim().is_empty() && is_complete_css(value)
    }
}

/// Whether `text` can sit between `property:` and `;` without changing the
/// rules around it.
///
/// cssparser closes blocks and strings at the end of input and skips
/// comments, so an unclosed `calc(`, `"` or `/*` tokenizes cleanly but would
/// swallow the rest of a stylesheet. Those are rejected here too.
pub(crate) fn is_complete_css(text: &str) -> bool {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    component_values_ok(&mut parser)
}

fn component_values_ok(parser: &mut Parser<'_, '_>) -> bool {
    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return true,
        };
        match token {
            Token::BadString(_)
            | Token::BadUrl(_)
            | Token::Comment(_)
            | Token::Semicolon
            | Token::Delim('!')
            | Token::CurlyBracketBlock
            | Token::CloseParenthesis
            | Token::CloseSquareBracket
            | Token::CloseCurlyBracket => return false,
            Token::QuotedString(_) => {
                if !string_closed(parser.slice_from(start)) {
                    return false;
                }
            }
            Token::UnquotedUrl(_) => {
                if !parser.slice_from(start).ends_with(')') {
                    return false;
                }
            }
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                let mut contents_end = None;
                let nested = parser.parse_nested_block(|nested| {
                    let ok = component_values_ok(nested);
                    contents_end = Some(nested.position());
                    if ok {
                        Ok(())
                    } else {
                        Err(nested.new_custom_error::<_, ()>(()))
                    }
                });
                if nested.is_err() {
                    return false;
                }
                // A block cut off by the end of input has no closing token.
                let closed = contents_end
                    .is_some_and(|end| parser.position().byte_index() > end.byte_index());
                if !closed {
                    return false;
                }
            }
            _ => {}
        }
    }
}

/// Whether a quoted string token's source text ends with an unescaped
/// closing quote.
fn string_closed(source: &str) -> bool {
    let mut chars = source.chars();
    let (Some(open), Some(close)) = (chars.next(), chars.next_back()) else {
        return false;
    };
    if open != close {
        return false;
    }
    let body = &source[..source.len() - close.len_utf8()];
    let escapes = body.chars().rev().take_while(|c| *c == '\\').count();
    escapes % 2 == 0
}

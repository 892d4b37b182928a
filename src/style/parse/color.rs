//! Colour value parsing.

use cssparser::{ParseError, Parser, ParserInput, Token};

use crate::style::Value;

/// Parse a colour typed into a colour control.
///
/// Hex colours become `hex-color`, `rgb()`/`rgba()` become `rgb`, and any
/// other identifier (named colours, `currentColor`, `transparent`) is kept as
/// a keyword. Anything else is `invalid`.
pub fn parse_color_value(input: &str) -> Value {
    let trimmed = input.trim();
    let mut parser_input = ParserInput::new(trimmed);
    let mut parser = Parser::new(&mut parser_input);

    let parsed = parser
        .try_parse(parse_color)
        .ok()
        .filter(|_| parser.is_exhausted());
    parsed.unwrap_or_else(|| Value::invalid(input))
}

fn parse_color<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i, ()>> {
    let location = input.current_source_location();
    match input.next()?.clone() {
        // cssparser reports `#ff0000` as an ID hash and `#222` as a plain hash
        Token::IDHash(hash) | Token::Hash(hash) => {
            if is_hex_color(&hash) {
                Ok(Value::HexColor {
                    value: format!("#{}", hash.to_ascii_lowercase()),
                })
            } else {
                Err(location.new_custom_error(()))
            }
        }
        Token::Ident(ident) => Ok(Value::keyword(ident.as_ref())),
        Token::Function(name)
            if name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba") =>
        {
            input.parse_nested_block(parse_rgb_arguments)
        }
        _ => Err(location.new_custom_error(())),
    }
}

fn is_hex_color(hash: &str) -> bool {
    matches!(hash.len(), 3 | 4 | 6 | 8) && hash.chars().all(|c| c.is_ascii_hexdigit())
}

/// Parse `r, g, b[, a]` or `r g b[ / a]`.
fn parse_rgb_arguments<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i, ()>> {
    let r = parse_channel(input)?;
    let legacy = input.try_parse(|i| i.expect_comma()).is_ok();
    let g = parse_channel(input)?;
    if legacy {
        input.expect_comma()?;
    }
    let b = parse_channel(input)?;

    let has_alpha = if legacy {
        input.try_parse(|i| i.expect_comma()).is_ok()
    } else {
        input.try_parse(|i| i.expect_delim('/')).is_ok()
    };
    let alpha = if has_alpha { parse_alpha(input)? } else { 1.0 };
    input.expect_exhausted()?;

    Ok(Value::Rgb { r, g, b, alpha })
}

fn parse_channel<'i>(input: &mut Parser<'i, '_>) -> Result<f64, ParseError<'i, ()>> {
    let location = input.current_source_location();
    match input.next()? {
        Token::Number { value, .. } => Ok(f64::from(*value).clamp(0.0, 255.0)),
        Token::Percentage { unit_value, .. } => {
            Ok((f64::from(*unit_value) * 255.0).round().clamp(0.0, 255.0))
        }
        _ => Err(location.new_custom_error(())),
    }
}

fn parse_alpha<'i>(input: &mut Parser<'i, '_>) -> Result<f64, ParseError<'i, ()>> {
    let location = input.current_source_location();
    match input.next()? {
        Token::Number { value, .. } => Ok(f64::from(*value).clamp(0.0, 1.0)),
        Token::Percentage { unit_value, .. } => Ok(f64::from(*unit_value).clamp(0.0, 1.0)),
        _ => Err(location.new_custom_error(())),
    }
}

//! The rule plan a stylesheet is printed from.
//!
//! Generation first lays out every rule (layer, media block, selector,
//! declarations) and only then writes text, so the exact cascade a browser
//! would apply can be inspected without parsing CSS back.

use std::borrow::Cow;
use std::fmt::Write;

use cssparser::serialize_identifier;

use crate::model::BreakpointId;
use crate::style::{Property, ToCss, Value};

/// All cascade layers, in ascending precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StylePlan {
    pub layers: Vec<Layer>,
}

/// One `@layer` block.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Layer {
    pub name: String,
    /// Base block first, then media blocks in cascade order.
    pub blocks: Vec<Block>,
}

/// Rules that apply under one breakpoint.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Block {
    pub breakpoint: BreakpointId,
    /// `None` for the base breakpoint.
    pub media: Option<String>,
    pub rules: Vec<Rule>,
}

/// A class selector with an optional pseudo-state.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Rule {
    pub class: String,
    pub state: Option<String>,
    pub declarations: Vec<(Property, Value)>,
}

/// The selector suffix for a state, or `None` if it cannot be written safely.
///
/// States are stored as `:hover`; a missing leading colon is added.
pub(crate) fn state_suffix(state: &str) -> Option<Cow<'_, str>> {
    let state = state.trim();
    if state.is_empty()
        || state == ":"
        || state.contains(['{', '}', ';', ',', '\\', '\n', '"', '\''])
    {
        return None;
    }
    if state.starts_with(':') {
        Some(Cow::Borrowed(state))
    } else {
        Some(Cow::Owned(format!(":{state}")))
    }
}

/// Whether a property name can be written as-is.
pub(crate) fn is_writable_property(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn write_ident(buf: &mut String, ident: &str) {
    serialize_identifier(ident, buf).unwrap();
}

fn indent(buf: &mut String, depth: usize) {
    for _ in 0..depth {
        buf.push_str("  ");
    }
}

impl StylePlan {
    pub fn rule_count(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|layer| &layer.blocks)
            .map(|block| block.rules.len())
            .sum()
    }
}

impl ToCss for StylePlan {
    fn to_css(&self, buf: &mut String) {
        if self.layers.is_empty() {
            return;
        }

        // Declare the full layer order up front.
        buf.push_str("@layer ");
        for (i, layer) in self.layers.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            write_ident(buf, &layer.name);
        }
        buf.push_str(";\n");

        for layer in &self.layers {
            buf.push('\n');
            layer.to_css(buf);
        }
    }
}

impl ToCss for Layer {
    fn to_css(&self, buf: &mut String) {
        buf.push_str("@layer ");
        write_ident(buf, &self.name);
        buf.push_str(" {\n");
        for block in &self.blocks {
            match &block.media {
                None => {
                    for rule in &block.rules {
                        rule.write_indented(buf, 1);
                    }
                }
                Some(media) => {
                    indent(buf, 1);
                    writeln!(buf, "@media {media} {{").unwrap();
                    for rule in &block.rules {
                        rule.write_indented(buf, 2);
                    }
                    indent(buf, 1);
                    buf.push_str("}\n");
                }
            }
        }
        buf.push_str("}\n");
    }
}

impl Rule {
    fn write_indented(&self, buf: &mut String, depth: usize) {
        indent(buf, depth);
        buf.push('.');
        write_ident(buf, &self.class);
        if let Some(suffix) = self.state.as_deref().and_then(state_suffix) {
            buf.push_str(&suffix);
        }
        buf.push_str(" {\n");
        for (property, value) in &self.declarations {
            indent(buf, depth + 1);
            buf.push_str(property.css_name());
            buf.push_str(": ");
            value.to_css(buf);
            buf.push_str(";\n");
        }
        indent(buf, depth);
        buf.push_str("}\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(class: &str, state: Option<&str>, property: &str, value: Value) -> Rule {
        Rule {
            class: class.to_string(),
            state: state.map(str::to_string),
            declarations: vec![(Property::from(property), value)],
        }
    }

    #[test]
    fn test_state_suffix() {
        assert_eq!(state_suffix(":hover").as_deref(), Some(":hover"));
        assert_eq!(state_suffix("focus-visible").as_deref(), Some(":focus-visible"));
        assert_eq!(state_suffix(":nth-child(2n)").as_deref(), Some(":nth-child(2n)"));
        assert_eq!(state_suffix(""), None);
        assert_eq!(state_suffix(":hover{}"), None);
        assert_eq!(state_suffix(":hover, .x"), None);
    }

    #[test]
    fn test_writable_property() {
        assert!(is_writable_property("background-color"));
        assert!(is_writable_property("--brand"));
        assert!(is_writable_property("-webkit-line-clamp"));
        assert!(!is_writable_property(""));
        assert!(!is_writable_property("color: red; x"));
        assert!(!is_writable_property("1x"));
    }

    #[test]
    fn test_empty_plan_writes_nothing() {
        assert_eq!(StylePlan::default().to_css_string(), "");
    }

    #[test]
    fn test_plan_to_css() {
        let plan = StylePlan {
            layers: vec![Layer {
                name: "s1".to_string(),
                blocks: vec![
                    Block {
                        breakpoint: "base".into(),
                        media: None,
                        rules: vec![rule("s1", None, "backgroundColor", Value::keyword("red"))],
                    },
                    Block {
                        breakpoint: "tablet".into(),
                        media: Some("(max-width: 991px)".to_string()),
                        rules: vec![rule("s1", Some(":hover"), "width", Value::px(10.0))],
                    },
                ],
            }],
        };

        let expected = "\
@layer s1;

@layer s1 {
  .s1 {
    background-color: red;
  }
  @media (max-width: 991px) {
    .s1:hover {
      width: 10px;
    }
  }
}
";
        assert_eq!(plan.to_css_string(), expected);
        assert_eq!(plan.rule_count(), 2);
    }

    #[test]
    fn test_identifiers_are_escaped() {
        let plan = StylePlan {
            layers: vec![Layer {
                name: "1st".to_string(),
                blocks: vec![Block {
                    breakpoint: "base".into(),
                    media: None,
                    rules: vec![rule("9a", None, "color", Value::keyword("red"))],
                }],
            }],
        };
        let css = plan.to_css_string();
        assert!(css.starts_with("@layer \\31 st;"));
        assert!(css.contains(".\\39 a {"));
    }
}

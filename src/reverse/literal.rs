//! Literal and key formatting for the reverse compiler

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::Literal;
use crate::core::{LensError, LensResult, PropertyPath};

static BARE_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_:\-]+$").expect("valid key regex"));

/// Single-quoted string with `\` and `'` escaped
pub fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

/// Property key as written in source; quoted when it is not a plain identifier
pub fn format_key(key: &str) -> String {
    if BARE_KEY.is_match(key) {
        key.to_string()
    } else {
        let escaped = key.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{}\"", escaped)
    }
}

/// Source form of a literal
pub fn format_literal(literal: &Literal, path: &PropertyPath) -> LensResult<String> {
    if !literal.is_renderable() {
        return Err(LensError::UnsupportedLiteral {
            path: path.clone(),
            literal: format!("{} {}", literal.type_name(), literal),
        });
    }
    Ok(match literal {
        Literal::Null => "null".to_string(),
        Literal::Bool(value) => value.to_string(),
        Literal::Integer(value) => value.to_string(),
        Literal::Float(value) => {
            let mut text = value.to_string();
            // floats must not read back as integers
            if !text.contains('.') {
                text.push_str(".0");
            }
            text
        }
        Literal::String(value) => quote_string(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(literal: Literal) -> String {
        format_literal(&literal, &PropertyPath::root()).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(fmt(Literal::Null), "null");
        assert_eq!(fmt(Literal::Bool(false)), "false");
        assert_eq!(fmt(Literal::Integer(42)), "42");
        assert_eq!(fmt(Literal::Float(2.0)), "2.0");
        assert_eq!(fmt(Literal::Float(0.25)), "0.25");
        assert_eq!(fmt(Literal::Float(1e21)), "1000000000000000000000.0");
        assert_eq!(fmt(Literal::String("a'b".to_string())), "'a\\'b'");
    }

    #[test]
    fn test_multiline_string_is_kept_raw() {
        assert_eq!(quote_string("a\nb"), "'a\nb'");
    }

    #[test]
    fn test_keys() {
        assert_eq!(format_key("label"), "label");
        assert_eq!(format_key("Vendor.Site:Button"), "\"Vendor.Site:Button\"");
        assert_eq!(format_key("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_infinity_is_unsupported() {
        let err = format_literal(&Literal::Float(f64::NEG_INFINITY), &PropertyPath::root()).unwrap_err();
        assert_eq!(err.kind(), "UnsupportedLiteral");
    }

    #[test]
    fn test_non_finite_floats_name_their_type() {
        for value in [f64::NAN, f64::INFINITY] {
            match format_literal(&Literal::Float(value), &PropertyPath::root()) {
                Err(LensError::UnsupportedLiteral { literal, .. }) => assert_eq!(literal, format!("float {}", value)),
                other => panic!("expected UnsupportedLiteral, got {:?}", other),
            }
        }
    }
}

//! Coercion of raw form input into typed field values.
//!
//! # Design
//! - Used by view layers only; the resolver never parses strings.
//! - Checks type shape and nothing else (no range or cross-field rules beyond
//!   what the leaf's storage dictates).

use crate::error::{ConfigError, ConfigResult};
use crate::field::{ConfigField, FieldKind, FieldValue};

/// Parse `raw` into a value of the kind `field` declares.
///
/// Booleans accept `true/false`, `on/off`, `yes/no` and `1/0`
/// (case-insensitive). Integers are unsigned decimal. Text is taken verbatim.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidInput`] when `raw` does not parse as the
/// field's kind.
pub fn parse_input(field: ConfigField, raw: &str) -> ConfigResult<FieldValue> {
    let invalid = || ConfigError::InvalidInput {
        path: field.path(),
        kind: field.kind(),
        value: raw.to_string(),
    };

    match field.kind() {
        FieldKind::Bool => parse_bool(raw).map(FieldValue::Bool).ok_or_else(invalid),
        FieldKind::Integer => raw
            .trim()
            .parse::<u64>()
            .map(FieldValue::Integer)
            .map_err(|_| invalid()),
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{BoolField, NumberField, TextField};

    #[test]
    fn parse_bool_variants() {
        let field = ConfigField::Bool(BoolField::UpnpDisable);
        for raw in ["true", "ON", " yes ", "1"] {
            assert_eq!(parse_input(field, raw), Ok(FieldValue::Bool(true)), "{raw}");
        }
        for raw in ["false", "Off", "no", "0"] {
            assert_eq!(parse_input(field, raw), Ok(FieldValue::Bool(false)), "{raw}");
        }
    }

    #[test]
    fn parse_integer_trims_whitespace() {
        let field = ConfigField::Number(NumberField::TcpListenMinPort);
        assert_eq!(parse_input(field, " 6881 "), Ok(FieldValue::Integer(6881)));
    }

    #[test]
    fn parse_integer_rejects_non_numeric() {
        let field = ConfigField::Number(NumberField::PeerConnectTimeout);
        for raw in ["", "abc", "-1", "2.5"] {
            let err = parse_input(field, raw).expect_err("not an unsigned integer");
            assert!(
                matches!(err, ConfigError::InvalidInput { kind: FieldKind::Integer, .. }),
                "{raw}"
            );
        }
    }

    #[test]
    fn parse_text_keeps_input_verbatim() {
        let field = ConfigField::Text(TextField::HttpApiListenAddr);
        assert_eq!(
            parse_input(field, " 0.0.0.0:3030 "),
            Ok(FieldValue::Text(" 0.0.0.0:3030 ".to_string()))
        );
    }
}

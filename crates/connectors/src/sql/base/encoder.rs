use model::core::{
    utils::{escape_single_quotes, format_float},
    value::Value,
};

/// Turns a value into SQL literal text for the destination's statement
/// grammar.
pub trait LiteralEncoder {
    /// Encodes a concrete value into its literal form.
    fn encode_value(&self, value: &Value) -> String;

    /// Encodes a SQL NULL.
    fn encode_null(&self) -> String;

    /// Helper that encodes an optional value, delegating NULL handling.
    fn encode_optional(&self, value: Option<&Value>) -> String {
        match value {
            Some(v) => self.encode_value(v),
            None => self.encode_null(),
        }
    }
}

/// Plain SQL literals: numbers and booleans bare, text single-quoted with
/// embedded quotes doubled.
///
/// Quote doubling is the only escaping applied. Backslashes and control
/// characters pass through untouched, so text from the source must still be
/// treated as untrusted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlLiteralEncoder;

impl SqlLiteralEncoder {
    pub fn new() -> Self {
        Self
    }

    fn quote(text: &str) -> String {
        format!("'{}'", escape_single_quotes(text))
    }
}

impl LiteralEncoder for SqlLiteralEncoder {
    fn encode_value(&self, value: &Value) -> String {
        match value {
            Value::Null => self.encode_null(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) if v.is_finite() => format_float(*v),
            // NaN and infinities only exist as quoted float input
            Value::Float(v) => Self::quote(&format_float(*v)),
            Value::Boolean(v) => v.to_string(),
            Value::Text(s) => Self::quote(s),
        }
    }

    fn encode_null(&self) -> String {
        "NULL".to_string()
    }
}

//! Argument display formatting.
//!
//! Formatting is a capability lookup: a parameter either declares a
//! formatter or it falls back to the default. The engine dispatches through
//! the trait; it never needs to know which concrete formatter ran.

use crate::types::Parameter;
use crate::value::Value;

/// Formats one argument value for display-name output.
pub trait ArgumentFormatter: Send + Sync {
    fn format(&self, value: &Value) -> String;
}

/// The default formatter: strings render as-is, null renders `<null>`,
/// everything else uses its natural string form.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFormatter;

impl ArgumentFormatter for DefaultFormatter {
    fn format(&self, value: &Value) -> String {
        value.to_string()
    }
}

/// Format `value` with the parameter's declared formatter, falling back to
/// the default when the parameter declares none (or is unknown).
pub fn format_argument(parameter: Option<&Parameter>, value: &Value) -> String {
    match parameter.and_then(|p| p.formatter.as_deref()) {
        Some(formatter) => formatter.format(value),
        None => DefaultFormatter.format(value),
    }
}

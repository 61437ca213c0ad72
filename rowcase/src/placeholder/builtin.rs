//! Built-in placeholders.
//!
//! The argument-list placeholders share one subscript grammar:
//! `[i]` is the closed range `[i, i]`, `[from..to]` is a closed range, and
//! negative values address from the end of the row (`-1` is the last
//! argument). Normalization happens against the row's argument count; an
//! index that still falls outside the row afterwards is a resolution error.

use regex::Regex;
use tracing::warn;

use crate::types::Parameter;

use super::format::{format_argument, ArgumentFormatter, DefaultFormatter};
use super::{Placeholder, PlaceholderError, ReplacementData};

/// A raw subscript: closed range over possibly-negative indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArgRange {
    from: i64,
    to: i64,
}

impl ArgRange {
    /// Parse the subscript of a token like `%a[2..-1]`, given the length of
    /// the token's prefix up to and including the opening bracket.
    fn parse(token: &str, prefix_len: usize) -> Result<Self, PlaceholderError> {
        let malformed = || PlaceholderError::Malformed {
            token: token.to_string(),
        };
        let end = token.len().checked_sub(1).ok_or_else(malformed)?;
        let subscript = token.get(prefix_len..end).ok_or_else(malformed)?;
        match subscript.split_once("..") {
            Some((from, to)) => Ok(Self {
                from: from.parse().map_err(|_| malformed())?,
                to: to.parse().map_err(|_| malformed())?,
            }),
            None => {
                let index = subscript.parse().map_err(|_| malformed())?;
                Ok(Self {
                    from: index,
                    to: index,
                })
            }
        }
    }

    /// Normalize against a row of `count` arguments into a half-open index
    /// range. A normalized range may be empty; indices that land outside
    /// the row are errors naming the offending raw index.
    fn normalize(self, count: usize) -> Result<std::ops::Range<usize>, PlaceholderError> {
        let count_i = count as i64;
        let out_of_bounds = |index: i64| PlaceholderError::IndexOutOfBounds {
            index,
            count,
            min: -count_i,
            max: count_i - 1,
        };

        let from = if self.from >= 0 {
            self.from
        } else {
            count_i + self.from
        };
        let to_excl = if self.to >= 0 {
            self.to + 1
        } else {
            count_i + self.to + 1
        };

        if from < 0 || from > count_i {
            return Err(out_of_bounds(self.from));
        }
        if to_excl > count_i || to_excl < from {
            return Err(out_of_bounds(self.to));
        }
        Ok(from as usize..to_excl as usize)
    }
}

/// The parameter declared for argument `index`, accounting for variadic
/// tails where arguments outnumber parameters.
fn parameter_for(data: &ReplacementData, index: usize) -> Option<&Parameter> {
    let parameters = &data.method.signature.parameters;
    parameters.get(index).or_else(|| parameters.last())
}

/// The display name of the parameter declared for argument `index`,
/// falling back to a positional `argN` name when the toolchain discarded
/// parameter names.
fn parameter_name(data: &ReplacementData, index: usize) -> String {
    match parameter_for(data, index).and_then(|p| p.name.clone()) {
        Some(name) => name,
        None => format!("arg{index}"),
    }
}

/// `%aa[i]` / `%aa[from..to]` — named arguments with per-parameter
/// formatting: a comma-separated list of `name=value` pairs.
pub struct NamedArgumentsPlaceholder {
    pattern: Regex,
}

impl NamedArgumentsPlaceholder {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"%aa\[(-?[0-9]+|-?[0-9]+\.\.-?[0-9]+)\]")
                .expect("valid placeholder pattern"),
        }
    }
}

impl Default for NamedArgumentsPlaceholder {
    fn default() -> Self {
        Self::new()
    }
}

impl Placeholder for NamedArgumentsPlaceholder {
    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn replacement(&self, token: &str, data: &ReplacementData) -> Result<String, PlaceholderError> {
        let range = ArgRange::parse(token, "%aa[".len())?.normalize(data.arguments.len())?;
        if range
            .clone()
            .any(|i| parameter_for(data, i).map_or(true, |p| p.name.is_none()))
        {
            warn!(
                method = %data.method,
                "parameter names are not available; using positional names"
            );
        }
        let pairs: Vec<String> = range
            .map(|i| {
                let name = parameter_name(data, i);
                let value = format_argument(parameter_for(data, i), &data.arguments[i]);
                format!("{name}={value}")
            })
            .collect();
        Ok(pairs.join(", "))
    }
}

/// `%a[i]` / `%a[from..to]` — argument values only, default formatting.
pub struct ArgumentsPlaceholder {
    pattern: Regex,
}

impl ArgumentsPlaceholder {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"%a\[(-?[0-9]+|-?[0-9]+\.\.-?[0-9]+)\]")
                .expect("valid placeholder pattern"),
        }
    }
}

impl Default for ArgumentsPlaceholder {
    fn default() -> Self {
        Self::new()
    }
}

impl Placeholder for ArgumentsPlaceholder {
    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn replacement(&self, token: &str, data: &ReplacementData) -> Result<String, PlaceholderError> {
        let range = ArgRange::parse(token, "%a[".len())?.normalize(data.arguments.len())?;
        let values: Vec<String> = range
            .map(|i| DefaultFormatter.format(&data.arguments[i]))
            .collect();
        Ok(values.join(", "))
    }
}

/// `%i` — the zero-based row index.
pub struct IndexPlaceholder {
    pattern: Regex,
}

impl IndexPlaceholder {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new("%i").expect("valid placeholder pattern"),
        }
    }
}

impl Default for IndexPlaceholder {
    fn default() -> Self {
        Self::new()
    }
}

impl Placeholder for IndexPlaceholder {
    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn replacement(&self, _: &str, data: &ReplacementData) -> Result<String, PlaceholderError> {
        Ok(data.index.to_string())
    }
}

/// `%tc` — the total number of rows.
pub struct RowCountPlaceholder {
    pattern: Regex,
}

impl RowCountPlaceholder {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new("%tc").expect("valid placeholder pattern"),
        }
    }
}

impl Default for RowCountPlaceholder {
    fn default() -> Self {
        Self::new()
    }
}

impl Placeholder for RowCountPlaceholder {
    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn replacement(&self, _: &str, data: &ReplacementData) -> Result<String, PlaceholderError> {
        Ok(data.row_count.to_string())
    }
}

/// `%m` — the test method's name.
pub struct MethodNamePlaceholder {
    pattern: Regex,
}

impl MethodNamePlaceholder {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new("%m").expect("valid placeholder pattern"),
        }
    }
}

impl Default for MethodNamePlaceholder {
    fn default() -> Self {
        Self::new()
    }
}

impl Placeholder for MethodNamePlaceholder {
    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn replacement(&self, _: &str, data: &ReplacementData) -> Result<String, PlaceholderError> {
        Ok(data.method.name.clone())
    }
}

/// `%c` — the declaring class's name.
pub struct ClassNamePlaceholder {
    pattern: Regex,
}

impl ClassNamePlaceholder {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new("%c").expect("valid placeholder pattern"),
        }
    }
}

impl Default for ClassNamePlaceholder {
    fn default() -> Self {
        Self::new()
    }
}

impl Placeholder for ClassNamePlaceholder {
    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn replacement(&self, _: &str, data: &ReplacementData) -> Result<String, PlaceholderError> {
        Ok(data.method.class_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ArgumentSet;
    use crate::placeholder::format::ArgumentFormatter;
    use crate::types::{MethodSignature, ParamType, TestMethod};
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn four_arg_data() -> ReplacementData {
        let parameters = ["a", "b", "c", "d"]
            .into_iter()
            .map(|name| Parameter::named(name, ParamType::i32()))
            .collect();
        let method = TestMethod::new("MathTest", "test_sum", MethodSignature::new(parameters));
        let arguments = ArgumentSet::new(vec![
            Value::from(10i32),
            Value::from(20i32),
            Value::from(30i32),
            Value::from(40i32),
        ]);
        ReplacementData::new(method, arguments, 0, 1)
    }

    fn named(token: &str, data: &ReplacementData) -> Result<String, PlaceholderError> {
        NamedArgumentsPlaceholder::new().replacement(token, data)
    }

    // ============================================================
    // Range Parsing and Normalization
    // ============================================================

    #[test]
    fn test_single_index_is_a_closed_range() {
        assert_eq!(
            ArgRange::parse("%aa[2]", 4).unwrap(),
            ArgRange { from: 2, to: 2 }
        );
    }

    #[test]
    fn test_range_subscript_parses_both_ends() {
        assert_eq!(
            ArgRange::parse("%aa[-2..-1]", 4).unwrap(),
            ArgRange { from: -2, to: -1 }
        );
    }

    #[test]
    fn test_normalization_maps_negative_indices_from_the_end() {
        let range = ArgRange { from: -2, to: -1 };
        assert_eq!(range.normalize(4).unwrap(), 2..4);
    }

    #[test]
    fn test_empty_normalized_range_is_allowed() {
        // [0..-1] over an empty row denotes "all arguments" of nothing.
        let range = ArgRange { from: 0, to: -1 };
        assert_eq!(range.normalize(0).unwrap(), 0..0);
    }

    #[test]
    fn test_out_of_bounds_index_is_reported_with_bounds() {
        let err = ArgRange { from: 4, to: 4 }.normalize(4).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Argument index 4 is out of bounds for 4 arguments (valid indices are -4..=3)"
        );

        let err = ArgRange { from: -5, to: -1 }.normalize(4).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Argument index -5 is out of bounds for 4 arguments (valid indices are -4..=3)"
        );
    }

    #[test]
    fn test_overflowing_subscript_is_malformed() {
        let token = "%aa[99999999999999999999]";
        let err = ArgRange::parse(token, 4).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed placeholder token '%aa[99999999999999999999]'"
        );
    }

    // ============================================================
    // Named Arguments
    // ============================================================

    #[test]
    fn test_negative_index_equals_its_absolute_twin() {
        let data = four_arg_data();
        assert_eq!(named("%aa[-1]", &data).unwrap(), named("%aa[3]", &data).unwrap());
        assert_eq!(
            named("%aa[-2..-1]", &data).unwrap(),
            named("%aa[2..3]", &data).unwrap()
        );
    }

    #[test]
    fn test_named_range_renders_name_value_pairs() {
        let data = four_arg_data();
        assert_eq!(named("%aa[1..2]", &data).unwrap(), "b=20, c=30");
        assert_eq!(named("%aa[-1]", &data).unwrap(), "d=40");
    }

    #[test]
    fn test_missing_parameter_names_degrade_to_positional() {
        let method = TestMethod::new(
            "MathTest",
            "test_sum",
            MethodSignature::new(vec![
                Parameter::new(ParamType::i32()),
                Parameter::new(ParamType::i32()),
            ]),
        );
        let arguments = ArgumentSet::new(vec![Value::from(1i32), Value::from(2i32)]);
        let data = ReplacementData::new(method, arguments, 0, 1);
        assert_eq!(named("%aa[0..1]", &data).unwrap(), "arg0=1, arg1=2");
    }

    #[test]
    fn test_declared_formatter_is_used_per_parameter() {
        struct Quoted;
        impl ArgumentFormatter for Quoted {
            fn format(&self, value: &Value) -> String {
                format!("\"{value}\"")
            }
        }

        let method = TestMethod::new(
            "MathTest",
            "test_sum",
            MethodSignature::new(vec![
                Parameter::named("raw", ParamType::i32()),
                Parameter::named("quoted", ParamType::i32()).with_formatter(Arc::new(Quoted)),
            ]),
        );
        let arguments = ArgumentSet::new(vec![Value::from(1i32), Value::from(2i32)]);
        let data = ReplacementData::new(method, arguments, 0, 1);
        assert_eq!(named("%aa[0..-1]", &data).unwrap(), "raw=1, quoted=\"2\"");
    }

    #[test]
    fn test_variadic_surplus_arguments_reuse_the_last_parameter() {
        let method = TestMethod::new(
            "MathTest",
            "test_sum",
            MethodSignature::with_varargs(vec![
                Parameter::named("label", ParamType::string()),
                Parameter::named("values", ParamType::i32()),
            ]),
        );
        let arguments = ArgumentSet::new(vec![
            Value::from("x"),
            Value::from(1i32),
            Value::from(2i32),
        ]);
        let data = ReplacementData::new(method, arguments, 0, 1);
        assert_eq!(
            named("%aa[0..-1]", &data).unwrap(),
            "label=x, values=1, values=2"
        );
    }

    // ============================================================
    // Plain Arguments
    // ============================================================

    #[test]
    fn test_plain_arguments_render_values_only() {
        let data = four_arg_data();
        let placeholder = ArgumentsPlaceholder::new();
        assert_eq!(
            placeholder.replacement("%a[0..-1]", &data).unwrap(),
            "10, 20, 30, 40"
        );
        assert_eq!(placeholder.replacement("%a[-1]", &data).unwrap(), "40");
    }

    #[test]
    fn test_plain_arguments_out_of_bounds_propagates() {
        let data = four_arg_data();
        let err = ArgumentsPlaceholder::new()
            .replacement("%a[7]", &data)
            .unwrap_err();
        assert!(matches!(err, PlaceholderError::IndexOutOfBounds { index: 7, .. }));
    }
}

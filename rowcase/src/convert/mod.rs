//! Raw-row validation and conversion.
//!
//! A data provider yields rows in one of three shapes: a full row of typed
//! values, a single value, or one delimited string. Each shape has its own
//! converter seam so hosts can swap implementations per test method; the
//! defaults cover the standard behavior.
//!
//! All three converge on [`check_arguments`], the argument/parameter
//! contract: required inputs present, arity within bounds, every argument
//! assignable to its declared parameter type. The check short-circuits at
//! the first violation and never re-encodes values; widening acceptance is
//! assignability only, the invocation layer performs the actual conversion.
//!
//! One deliberate permissive case: fewer raw arguments than declared
//! parameters succeeds, leaving the remainder to other provider mechanisms.

use std::ops::Deref;
use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

use crate::compat::is_assignable;
use crate::types::{MethodSignature, ParamType};
use crate::value::Value;

mod string;

pub use string::DefaultStringConverter;

/// Conversion errors.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("'{0}' must not be null")]
    Null(&'static str),

    #[error("Expected at most {expected} arguments for test method but got {actual}.")]
    TooManyArguments { expected: usize, actual: usize },

    #[error("Parameter number {index} is of type '{expected}' but argument given is '{value}' of type '{actual}'")]
    NotAssignable {
        index: usize,
        expected: String,
        value: String,
        actual: String,
    },

    #[error("Cannot convert '{token}' to type '{target}'")]
    CannotParse { token: String, target: String },

    #[error("Invalid row delimiter pattern '{pattern}': {message}")]
    BadDelimiter { pattern: String, message: String },
}

/// Conversion result type.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// A validated, ordered argument list for one test invocation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArgumentSet {
    values: Vec<Value>,
}

impl ArgumentSet {
    /// Wrap an already-validated argument list.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// The argument values, in order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Unwrap into the raw values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl Deref for ArgumentSet {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl FromIterator<Value> for ArgumentSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Check that raw arguments satisfy the declared parameter types.
///
/// Fails when a required input is absent, when a non-variadic signature
/// receives more arguments than parameters, or at the first position whose
/// argument is not assignable to its declared type. Fewer arguments than
/// parameters is accepted. For variadic signatures every trailing argument
/// is checked against the last parameter's element type.
pub fn check_arguments(
    arguments: Option<&[Value]>,
    parameter_types: Option<&[ParamType]>,
    varargs: bool,
) -> ConvertResult<()> {
    let arguments = arguments.ok_or(ConvertError::Null("arguments"))?;
    let types = parameter_types.ok_or(ConvertError::Null("parameterTypes"))?;

    if !varargs && arguments.len() > types.len() {
        return Err(ConvertError::TooManyArguments {
            expected: types.len(),
            actual: arguments.len(),
        });
    }

    for (index, argument) in arguments.iter().enumerate() {
        let target = match types.get(index) {
            Some(ty) => ty,
            // Trailing variadic arguments check against the element type.
            None if varargs => match types.last() {
                Some(ty) => ty,
                None => break,
            },
            None => break,
        };
        if !is_assignable(argument, target) {
            return Err(ConvertError::NotAssignable {
                index,
                expected: target.to_string(),
                value: argument.to_string(),
                actual: argument.type_name().to_string(),
            });
        }
    }
    Ok(())
}

/// Converts a full row of already-typed values.
pub trait ObjectRowConverter: Send + Sync {
    /// Validate a raw row against the signature. `None` models a null row
    /// handed over by the producer.
    fn convert(
        &self,
        arguments: Option<Vec<Value>>,
        signature: &MethodSignature,
        context: &ConverterContext,
    ) -> ConvertResult<ArgumentSet>;
}

/// Converts a row consisting of one single value.
pub trait SingleValueConverter: Send + Sync {
    fn convert(
        &self,
        argument: Value,
        signature: &MethodSignature,
        context: &ConverterContext,
    ) -> ConvertResult<ArgumentSet>;
}

/// Converts a row encoded as one delimited string.
pub trait StringRowConverter: Send + Sync {
    fn convert(
        &self,
        data: &str,
        signature: &MethodSignature,
        context: &ConverterContext,
    ) -> ConvertResult<ArgumentSet>;
}

/// The default object-row converter: the assignability check, then the
/// original values unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultObjectConverter;

impl ObjectRowConverter for DefaultObjectConverter {
    fn convert(
        &self,
        arguments: Option<Vec<Value>>,
        signature: &MethodSignature,
        _context: &ConverterContext,
    ) -> ConvertResult<ArgumentSet> {
        let types = signature.param_types();
        check_arguments(arguments.as_deref(), Some(&types), signature.varargs)?;
        // check_arguments rejected the None case above.
        Ok(ArgumentSet::new(arguments.unwrap_or_default()))
    }
}

/// The default single-value converter: wraps the value as a one-element row.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSingleConverter;

impl SingleValueConverter for DefaultSingleConverter {
    fn convert(
        &self,
        argument: Value,
        signature: &MethodSignature,
        _context: &ConverterContext,
    ) -> ConvertResult<ArgumentSet> {
        let types = signature.param_types();
        let row = [argument];
        check_arguments(Some(&row), Some(&types), signature.varargs)?;
        let [argument] = row;
        Ok(ArgumentSet::new(vec![argument]))
    }
}

/// Immutable conversion configuration for one test method.
///
/// Built once from the provider options and shared read-only across every
/// row of that method; nothing here mutates after construction.
#[derive(Clone)]
pub struct ConverterContext {
    object_converter: Arc<dyn ObjectRowConverter>,
    single_converter: Arc<dyn SingleValueConverter>,
    string_converter: Arc<dyn StringRowConverter>,
    split_by: Regex,
    convert_nulls: bool,
    trim_values: bool,
    ignore_enum_case: bool,
}

impl ConverterContext {
    /// The token a delimited-string cell must equal to be treated as null
    /// when null conversion is enabled.
    pub const NULL_TOKEN: &'static str = "null";

    /// Build a context with the default converters.
    ///
    /// `split_by` is a regex pattern; it is compiled here once so invalid
    /// patterns fail at context build time rather than per row.
    pub fn new(
        split_by: &str,
        convert_nulls: bool,
        trim_values: bool,
        ignore_enum_case: bool,
    ) -> ConvertResult<Self> {
        let split_by = Regex::new(split_by).map_err(|e| ConvertError::BadDelimiter {
            pattern: split_by.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            object_converter: Arc::new(DefaultObjectConverter),
            single_converter: Arc::new(DefaultSingleConverter),
            string_converter: Arc::new(DefaultStringConverter),
            split_by,
            convert_nulls,
            trim_values,
            ignore_enum_case,
        })
    }

    /// Replace the object-row converter.
    pub fn with_object_converter(mut self, converter: Arc<dyn ObjectRowConverter>) -> Self {
        self.object_converter = converter;
        self
    }

    /// Replace the single-value converter.
    pub fn with_single_converter(mut self, converter: Arc<dyn SingleValueConverter>) -> Self {
        self.single_converter = converter;
        self
    }

    /// Replace the string-row converter.
    pub fn with_string_converter(mut self, converter: Arc<dyn StringRowConverter>) -> Self {
        self.string_converter = converter;
        self
    }

    /// The compiled row delimiter.
    pub fn split_by(&self) -> &Regex {
        &self.split_by
    }

    /// Whether the null token is substituted with a real null.
    pub fn convert_nulls(&self) -> bool {
        self.convert_nulls
    }

    /// Whether string cells are trimmed before coercion.
    pub fn trim_values(&self) -> bool {
        self.trim_values
    }

    /// Whether enum variant matching ignores case.
    pub fn ignore_enum_case(&self) -> bool {
        self.ignore_enum_case
    }
}

impl std::fmt::Debug for ConverterContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterContext")
            .field("split_by", &self.split_by.as_str())
            .field("convert_nulls", &self.convert_nulls)
            .field("trim_values", &self.trim_values)
            .field("ignore_enum_case", &self.ignore_enum_case)
            .finish_non_exhaustive()
    }
}

/// One raw unit of provider data, destined to become one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRow {
    /// A full row of values; `None` when the producer yielded a null row.
    Values(Option<Vec<Value>>),
    /// A single-value row.
    Single(Value),
    /// A delimited-string row.
    Text(String),
}

impl RawRow {
    /// A full row of values.
    pub fn values(values: impl IntoIterator<Item = Value>) -> Self {
        RawRow::Values(Some(values.into_iter().collect()))
    }

    /// A null row, as a producer may hand one over.
    pub fn null_row() -> Self {
        RawRow::Values(None)
    }

    /// A single-value row.
    pub fn single(value: impl Into<Value>) -> Self {
        RawRow::Single(value.into())
    }

    /// A delimited-string row.
    pub fn text(data: impl Into<String>) -> Self {
        RawRow::Text(data.into())
    }
}

/// Dispatches each raw row to the converter configured for its shape.
#[derive(Debug, Clone)]
pub struct DataConverter {
    context: ConverterContext,
}

impl DataConverter {
    /// Create a converter over the given context.
    pub fn new(context: ConverterContext) -> Self {
        Self { context }
    }

    /// The underlying context.
    pub fn context(&self) -> &ConverterContext {
        &self.context
    }

    /// Convert one raw row into a validated argument set.
    pub fn convert_row(
        &self,
        row: RawRow,
        signature: &MethodSignature,
    ) -> ConvertResult<ArgumentSet> {
        match row {
            RawRow::Values(values) => {
                self.context
                    .object_converter
                    .convert(values, signature, &self.context)
            }
            RawRow::Single(value) => {
                self.context
                    .single_converter
                    .convert(value, signature, &self.context)
            }
            RawRow::Text(data) => {
                self.context
                    .string_converter
                    .convert(&data, signature, &self.context)
            }
        }
    }

    /// Convert every row, failing on the first row that does not convert.
    pub fn convert(
        &self,
        rows: impl IntoIterator<Item = RawRow>,
        signature: &MethodSignature,
    ) -> ConvertResult<Vec<ArgumentSet>> {
        rows.into_iter()
            .map(|row| self.convert_row(row, signature))
            .collect()
    }
}

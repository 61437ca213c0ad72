//! Provider Configuration
//!
//! Defines the configuration surface a host runner reads off a provider
//! declaration. One `ProviderOptions` is built per annotated test method
//! and turned into the immutable contexts the engine actually runs on.

use serde::{Deserialize, Serialize};

use crate::convert::{ConvertResult, ConverterContext};
use crate::placeholder::{DisplayNameContext, DEFAULT_FORMAT};
use crate::resolver::ResolveStrategy;

/// Configuration for one data-provider declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
    /// Regex pattern splitting delimited-string rows into cells.
    pub split_by: String,

    /// Substitute the literal `null` cell with a real null.
    pub convert_nulls: bool,

    /// Trim whitespace around string cells before coercion.
    pub trim_values: bool,

    /// Match enum variants case-insensitively.
    pub ignore_enum_case: bool,

    /// How candidate locations are searched during resolution.
    pub resolve_strategy: ResolveStrategy,

    /// The display-name template.
    pub format: String,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            split_by: ",".to_string(),
            convert_nulls: true,
            trim_values: true,
            ignore_enum_case: false,
            resolve_strategy: ResolveStrategy::UntilFirstMatch,
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

impl ProviderOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the conversion context these options describe.
    pub fn converter_context(&self) -> ConvertResult<ConverterContext> {
        ConverterContext::new(
            &self.split_by,
            self.convert_nulls,
            self.trim_values,
            self.ignore_enum_case,
        )
    }

    /// Build the display-name context these options describe, over the
    /// default placeholder set.
    pub fn display_name_context(&self) -> DisplayNameContext {
        DisplayNameContext::with_default_placeholders(self.format.clone())
    }
}

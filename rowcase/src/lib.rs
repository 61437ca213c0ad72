//! Data-driven test parameterization.
//!
//! Rowcase turns raw data-provider rows into validated, named test
//! invocations. The host runner discovers test methods and physically
//! invokes providers and tests; this crate owns the three precise parts in
//! between:
//!
//! 1. **Resolution** ([`resolver`]): given a test method, a provider name
//!    (explicit or by convention), and an ordered list of candidate
//!    locations, find exactly one provider method. Zero or multiple
//!    survivors are hard errors.
//! 2. **Conversion** ([`convert`], [`compat`]): verify each raw row against
//!    the method's declared parameter types, honoring the host's widening
//!    rules, variadic tails, and delimited-string rows with trim/null/enum
//!    policies.
//! 3. **Naming** ([`placeholder`]): render a display name per row from a
//!    template with positional and ranged placeholders.
//!
//! The engine is purely computational: no I/O, no blocking, no shared
//! mutable state. Contexts are built once per test method and shared
//! read-only across concurrently running rows.
//!
//! ```
//! use rowcase::convert::{DataConverter, RawRow};
//! use rowcase::options::ProviderOptions;
//! use rowcase::placeholder::ReplacementData;
//! use rowcase::types::{MethodSignature, ParamType, Parameter, TestMethod};
//!
//! let method = TestMethod::new(
//!     "CalculatorTest",
//!     "test_add",
//!     MethodSignature::new(vec![
//!         Parameter::named("lhs", ParamType::i32()),
//!         Parameter::named("rhs", ParamType::i32()),
//!     ]),
//! );
//!
//! let options = ProviderOptions::default();
//! let converter = DataConverter::new(options.converter_context().unwrap());
//! let names = options.display_name_context();
//!
//! let arguments = converter
//!     .convert_row(RawRow::text("1, 2"), &method.signature)
//!     .unwrap();
//! let data = ReplacementData::new(method, arguments, 0, 1);
//! assert_eq!(names.resolve(&data).unwrap(), "test_add[0: 1, 2]");
//! ```

pub mod compat;
pub mod convert;
pub mod options;
pub mod placeholder;
pub mod resolver;
pub mod types;
pub mod value;

pub use compat::{is_assignable, widens_to};
pub use convert::{
    check_arguments, ArgumentSet, ConvertError, ConverterContext, DataConverter, RawRow,
};
pub use options::ProviderOptions;
pub use placeholder::{
    DisplayNameContext, Placeholder, PlaceholderError, PlaceholderRegistry, ReplacementData,
};
pub use resolver::{
    resolve_data_provider, ProviderLocation, ProviderMethod, ResolveError, ResolveStrategy,
    ResolverContext,
};
pub use types::{EnumType, MethodSignature, ParamType, Parameter, PrimitiveKind, TestMethod};
pub use value::{EnumValue, ObjectValue, Value};

//! Parameter type descriptors and test-method metadata.
//!
//! The engine never inspects the host runtime itself. Whatever discovers the
//! test method (a proc macro, a registry, a reflection shim) builds these
//! descriptors once and hands them in; everything downstream is pure
//! computation over them.
//!
//! Variable arity is a property of the whole signature: when
//! [`MethodSignature::varargs`] is set, the last parameter's type describes
//! the *element* type of the trailing variadic parameter.

use std::fmt;
use std::sync::Arc;

use crate::placeholder::format::ArgumentFormatter;

/// The primitive kinds a parameter can declare.
///
/// These mirror the numeric tower the widening rules in [`crate::compat`]
/// are defined over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
        };
        f.write_str(name)
    }
}

/// An enum parameter type: the type name plus its declared variants.
///
/// Variants are supplied by the host inspector so delimited-string rows can
/// be coerced without the engine ever touching the host's type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    /// The enum's type name.
    pub name: String,
    /// The declared variant names, in declaration order.
    pub variants: Vec<String>,
}

impl EnumType {
    /// Create an enum type descriptor.
    pub fn new(name: impl Into<String>, variants: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }
}

/// A target parameter type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// A primitive kind (never accepts null).
    Primitive(PrimitiveKind),
    /// An owned string parameter.
    Str,
    /// An enum parameter with known variants.
    Enum(EnumType),
    /// Any other reference type, identified by name.
    Reference(String),
}

impl ParamType {
    /// Shorthand for `Primitive(Bool)`.
    pub fn bool() -> Self {
        ParamType::Primitive(PrimitiveKind::Bool)
    }

    /// Shorthand for `Primitive(Char)`.
    pub fn char() -> Self {
        ParamType::Primitive(PrimitiveKind::Char)
    }

    /// Shorthand for `Primitive(I8)`.
    pub fn i8() -> Self {
        ParamType::Primitive(PrimitiveKind::I8)
    }

    /// Shorthand for `Primitive(I16)`.
    pub fn i16() -> Self {
        ParamType::Primitive(PrimitiveKind::I16)
    }

    /// Shorthand for `Primitive(I32)`.
    pub fn i32() -> Self {
        ParamType::Primitive(PrimitiveKind::I32)
    }

    /// Shorthand for `Primitive(I64)`.
    pub fn i64() -> Self {
        ParamType::Primitive(PrimitiveKind::I64)
    }

    /// Shorthand for `Primitive(F32)`.
    pub fn f32() -> Self {
        ParamType::Primitive(PrimitiveKind::F32)
    }

    /// Shorthand for `Primitive(F64)`.
    pub fn f64() -> Self {
        ParamType::Primitive(PrimitiveKind::F64)
    }

    /// Shorthand for the string parameter type.
    pub fn string() -> Self {
        ParamType::Str
    }

    /// A reference parameter type with the given name.
    pub fn reference(name: impl Into<String>) -> Self {
        ParamType::Reference(name.into())
    }

    /// An enum parameter type.
    pub fn enumeration(ty: EnumType) -> Self {
        ParamType::Enum(ty)
    }

    /// The primitive kind, if this is a primitive parameter type.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            ParamType::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Primitive(kind) => write!(f, "{kind}"),
            ParamType::Str => f.write_str("String"),
            ParamType::Enum(ty) => f.write_str(&ty.name),
            ParamType::Reference(name) => f.write_str(name),
        }
    }
}

/// A single declared parameter of a test method.
///
/// The name is optional: toolchains may discard formal parameter names, in
/// which case display-name generation degrades to positional `arg0`-style
/// names instead of failing.
#[derive(Clone)]
pub struct Parameter {
    /// The declared parameter name, when the toolchain preserved it.
    pub name: Option<String>,
    /// The declared parameter type.
    pub ty: ParamType,
    /// An optional per-parameter display formatter.
    pub formatter: Option<Arc<dyn ArgumentFormatter>>,
}

impl Parameter {
    /// An unnamed parameter of the given type.
    pub fn new(ty: ParamType) -> Self {
        Self {
            name: None,
            ty,
            formatter: None,
        }
    }

    /// A named parameter of the given type.
    pub fn named(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            formatter: None,
        }
    }

    /// Attach a per-parameter display formatter.
    pub fn with_formatter(mut self, formatter: Arc<dyn ArgumentFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("formatter", &self.formatter.as_ref().map(|_| "..."))
            .finish()
    }
}

/// The declared signature of a test method.
#[derive(Debug, Clone, Default)]
pub struct MethodSignature {
    /// The declared parameters, in order.
    pub parameters: Vec<Parameter>,
    /// Whether the last parameter is variable-arity. When set, the last
    /// parameter's type is the element type of the variadic tail.
    pub varargs: bool,
}

impl MethodSignature {
    /// A fixed-arity signature.
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self {
            parameters,
            varargs: false,
        }
    }

    /// A signature whose last parameter is variable-arity.
    pub fn with_varargs(parameters: Vec<Parameter>) -> Self {
        Self {
            parameters,
            varargs: true,
        }
    }

    /// The declared parameter types, in order.
    pub fn param_types(&self) -> Vec<ParamType> {
        self.parameters.iter().map(|p| p.ty.clone()).collect()
    }

    /// The number of declared parameters.
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// A reference to the test method an invocation is being generated for.
#[derive(Debug, Clone)]
pub struct TestMethod {
    /// The simple name of the declaring test class or module.
    pub class_name: String,
    /// The method name.
    pub name: String,
    /// The declared signature.
    pub signature: MethodSignature,
}

impl TestMethod {
    /// Create a test-method reference.
    pub fn new(
        class_name: impl Into<String>,
        name: impl Into<String>,
        signature: MethodSignature,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            name: name.into(),
            signature,
        }
    }
}

impl fmt::Display for TestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class_name, self.name)
    }
}

//! Delimited-string row conversion.
//!
//! One provider row can arrive as a single string, `"1, two, true"`. The
//! converter splits it on the context's delimiter (trailing empty cells are
//! kept), applies the trimming and null-token policies, coerces each cell
//! into its declared parameter type, and finally runs the same assignability
//! check every other row shape goes through.

use crate::types::{EnumType, MethodSignature, ParamType, PrimitiveKind};
use crate::value::{EnumValue, Value};

use super::{
    check_arguments, ArgumentSet, ConvertError, ConvertResult, ConverterContext,
    StringRowConverter,
};

/// The default delimited-string converter.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultStringConverter;

impl StringRowConverter for DefaultStringConverter {
    fn convert(
        &self,
        data: &str,
        signature: &MethodSignature,
        context: &ConverterContext,
    ) -> ConvertResult<ArgumentSet> {
        let types = signature.param_types();
        let tokens: Vec<&str> = context.split_by().split(data).collect();

        if !signature.varargs && tokens.len() > types.len() {
            return Err(ConvertError::TooManyArguments {
                expected: types.len(),
                actual: tokens.len(),
            });
        }

        let mut values = Vec::with_capacity(tokens.len());
        for (index, raw) in tokens.into_iter().enumerate() {
            let target = match types.get(index) {
                Some(ty) => ty,
                None => match types.last() {
                    Some(ty) => ty,
                    None => break,
                },
            };
            let token = if context.trim_values() { raw.trim() } else { raw };
            if context.convert_nulls() && token == ConverterContext::NULL_TOKEN {
                values.push(Value::Null);
                continue;
            }
            values.push(coerce_token(token, target, context)?);
        }

        check_arguments(Some(&values), Some(&types), signature.varargs)?;
        Ok(ArgumentSet::new(values))
    }
}

/// Coerce one string cell into the declared parameter type.
fn coerce_token(token: &str, target: &ParamType, context: &ConverterContext) -> ConvertResult<Value> {
    let cannot_parse = || ConvertError::CannotParse {
        token: token.to_string(),
        target: target.to_string(),
    };

    match target {
        ParamType::Str => Ok(Value::Str(token.to_string())),
        ParamType::Primitive(kind) => coerce_primitive(token, *kind).ok_or_else(cannot_parse),
        ParamType::Enum(ty) => coerce_enum(token, ty, context.ignore_enum_case())
            .map(Value::Enum)
            .ok_or_else(cannot_parse),
        // Arbitrary reference types have no string form the engine can parse.
        ParamType::Reference(_) => Err(cannot_parse()),
    }
}

fn coerce_primitive(token: &str, kind: PrimitiveKind) -> Option<Value> {
    match kind {
        PrimitiveKind::Bool => token.parse().ok().map(Value::Bool),
        PrimitiveKind::Char => {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
        PrimitiveKind::I8 => token.parse().ok().map(Value::I8),
        PrimitiveKind::I16 => token.parse().ok().map(Value::I16),
        PrimitiveKind::I32 => token.parse().ok().map(Value::I32),
        PrimitiveKind::I64 => token.parse().ok().map(Value::I64),
        PrimitiveKind::F32 => token.parse().ok().map(Value::F32),
        PrimitiveKind::F64 => token.parse().ok().map(Value::F64),
    }
}

fn coerce_enum(token: &str, ty: &EnumType, ignore_case: bool) -> Option<EnumValue> {
    let variant = if ignore_case {
        ty.variants.iter().find(|v| v.eq_ignore_ascii_case(token))
    } else {
        ty.variants.iter().find(|v| *v == token)
    }?;
    // The declared variant spelling wins over the cell's.
    Some(EnumValue::new(&ty.name, variant))
}

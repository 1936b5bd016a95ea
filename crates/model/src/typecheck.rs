//! Runtime type checks for bound arguments

use crate::descriptor::Param;
use crate::foundation::{TypeError, TypeSet, TypeTag, Value};

/// Whether `value` satisfies `types`.
///
/// Null and missing values pass only when `allows_absent` is set. A union
/// passes when any member does.
#[must_use]
pub fn check(value: Option<&Value>, types: &TypeSet, allows_absent: bool) -> bool {
    match value {
        None | Some(Value::Null) => allows_absent,
        Some(value) => types.tags().iter().any(|tag| matches(value, tag)),
    }
}

/// Checks the value bound to `param`, naming `type_name` in the error.
pub fn ensure(type_name: &'static str, param: &Param, value: Option<&Value>) -> Result<(), TypeError> {
    if check(value, param.types(), param.allows_absent()) {
        return Ok(());
    }

    Err(TypeError {
        type_name,
        parameter: param.name().to_owned(),
        expected: param.expected(),
        given: value.map_or("null", Value::kind_name).to_owned(),
    })
}

fn matches(value: &Value, tag: &TypeTag) -> bool {
    match (tag, value) {
        (TypeTag::Mixed, _) => true,
        (TypeTag::Bool, Value::Bool(_))
        | (TypeTag::Int, Value::Int(_))
        | (TypeTag::Float, Value::Int(_) | Value::Float(_))
        | (TypeTag::String, Value::String(_))
        | (TypeTag::Array, Value::Array(_))
        | (TypeTag::Map, Value::Map(_)) => true,
        (TypeTag::Class(name), Value::Object(object)) => object.conforms_to(name),
        _ => false,
    }
}

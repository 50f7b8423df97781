//! # Atomicity Classifier
//!
//! Decides which values are immutable and value-like, and therefore shared
//! by reference instead of copied.
//!
//! The set is fixed and closed:
//! - boolean, integer, floating-point and character scalars, primitive or boxed
//! - text strings
//! - any enumerated-constant type

use crate::types::{Type, Value};

/// True if instances of `ty` are safe to share by reference.
#[must_use]
pub fn is_atomic(ty: &Type) -> bool {
    matches!(
        ty,
        Type::Scalar(_) | Type::Boxed(_) | Type::Str | Type::Enum(_)
    )
}

/// True if `value` is atomic by its runtime type. `Null` is not atomic.
#[must_use]
pub fn is_atomic_value(value: &Value) -> bool {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => false,
        other => other.runtime_type().is_some_and(|ty| is_atomic(&ty)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArrayRef, ClassBuilder, EnumType, ScalarKind};

    #[test]
    fn scalars_strings_and_enums_are_atomic() {
        for kind in ScalarKind::ALL {
            assert!(is_atomic(&Type::Scalar(kind)));
            assert!(is_atomic(&Type::Boxed(kind)));
        }
        assert!(is_atomic(&Type::Str));
        assert!(is_atomic(&Type::enumeration("Color")));
    }

    #[test]
    fn composites_and_arrays_are_not_atomic() {
        assert!(!is_atomic(&Type::Object));
        assert!(!is_atomic(&Type::class("Car")));
        assert!(!is_atomic(&Type::array(Type::INT)));
    }

    #[test]
    fn values_classify_through_runtime_type() {
        let color = EnumType::new("Color", &["RED"]);
        let unit = ClassBuilder::new("Unit")
            .constructor(vec![], |_, _| Ok(()))
            .build();

        assert!(is_atomic_value(&Value::Double(1.5)));
        assert!(is_atomic_value(&Value::string("s")));
        assert!(is_atomic_value(
            &color.constant(0).map(Value::Enum).unwrap_or_default()
        ));
        assert!(!is_atomic_value(&Value::Null));
        assert!(!is_atomic_value(&Value::Array(ArrayRef::new(Type::INT, 1))));
        assert!(!is_atomic_value(&Value::Object(
            unit.instantiate(0, &[]).expect("unit")
        )));
    }
}

//! # Core Type Definitions
//!
//! This module contains the managed object model the copy engine works on:
//! - Declared types (`Type`, `ScalarKind`)
//! - Runtime values and handles (`Value`, `ObjRef`, `ArrayRef`, `EnumConst`)
//! - Type registry entries (`Class`, `ClassBuilder`, `FieldDecl`, `Constructor`)
//! - Error types (`Fault`, `CopyError`, `ReplicaError`)
//!
//! ## Registry instead of reflection
//!
//! A type takes part in copying by describing itself once through a
//! [`ClassBuilder`]: its member slots and its constructors. Nothing else is
//! asked of it. The engine discovers everything else (minimal constructors,
//! canonical constructors, slot layout) from that description.

mod class;
mod error;
mod value;

pub use class::{
    Class, ClassBuilder, ClassId, ClassKind, Constructor, ConstructorBody, FieldDecl, Slot,
    Storage,
};
pub(crate) use class::signature_of;
pub use error::{CopyError, Fault, ReplicaError};
pub use value::{ArrayRef, EnumConst, EnumType, GraphValue, Identity, ObjRef, Value};

use std::fmt;
use std::sync::Arc;

// =============================================================================
// SCALAR KINDS
// =============================================================================

/// The closed set of scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarKind {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
}

impl ScalarKind {
    /// Every scalar kind, in declaration order.
    pub const ALL: [ScalarKind; 8] = [
        ScalarKind::Bool,
        ScalarKind::Byte,
        ScalarKind::Short,
        ScalarKind::Int,
        ScalarKind::Long,
        ScalarKind::Float,
        ScalarKind::Double,
        ScalarKind::Char,
    ];

    /// The zero value of this kind (`false`, `0`, `0.0`, `'\0'`).
    #[must_use]
    pub fn zero(self) -> Value {
        match self {
            ScalarKind::Bool => Value::Bool(false),
            ScalarKind::Byte => Value::Byte(0),
            ScalarKind::Short => Value::Short(0),
            ScalarKind::Int => Value::Int(0),
            ScalarKind::Long => Value::Long(0),
            ScalarKind::Float => Value::Float(0.0),
            ScalarKind::Double => Value::Double(0.0),
            ScalarKind::Char => Value::Char('\0'),
        }
    }

    /// Primitive spelling, e.g. `int`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "boolean",
            ScalarKind::Byte => "byte",
            ScalarKind::Short => "short",
            ScalarKind::Int => "int",
            ScalarKind::Long => "long",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::Char => "char",
        }
    }

    /// Boxed spelling, e.g. `Integer`.
    #[must_use]
    pub const fn boxed_name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "Boolean",
            ScalarKind::Byte => "Byte",
            ScalarKind::Short => "Short",
            ScalarKind::Int => "Integer",
            ScalarKind::Long => "Long",
            ScalarKind::Float => "Float",
            ScalarKind::Double => "Double",
            ScalarKind::Char => "Character",
        }
    }
}

// =============================================================================
// DECLARED TYPES
// =============================================================================

/// Declared type of a slot, a constructor parameter or an array component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Primitive scalar. Never absent.
    Scalar(ScalarKind),
    /// Boxed scalar. May be absent.
    Boxed(ScalarKind),
    /// Text string.
    Str,
    /// Enumerated-constant type, by name.
    Enum(Arc<str>),
    /// Array of the component type.
    Array(Box<Type>),
    /// A registered class (or any subclass of it), by name.
    Class(Arc<str>),
    /// The generic reference type.
    Object,
}

impl Type {
    pub const BOOL: Type = Type::Scalar(ScalarKind::Bool);
    pub const BYTE: Type = Type::Scalar(ScalarKind::Byte);
    pub const SHORT: Type = Type::Scalar(ScalarKind::Short);
    pub const INT: Type = Type::Scalar(ScalarKind::Int);
    pub const LONG: Type = Type::Scalar(ScalarKind::Long);
    pub const FLOAT: Type = Type::Scalar(ScalarKind::Float);
    pub const DOUBLE: Type = Type::Scalar(ScalarKind::Double);
    pub const CHAR: Type = Type::Scalar(ScalarKind::Char);

    /// Array type with the given component.
    #[must_use]
    pub fn array(component: Type) -> Type {
        Type::Array(Box::new(component))
    }

    /// Boxed scalar type.
    #[must_use]
    pub const fn boxed(kind: ScalarKind) -> Type {
        Type::Boxed(kind)
    }

    /// Reference to a registered class by name.
    #[must_use]
    pub fn class(name: impl Into<Arc<str>>) -> Type {
        Type::Class(name.into())
    }

    /// Reference to an enumerated type by name.
    #[must_use]
    pub fn enumeration(name: impl Into<Arc<str>>) -> Type {
        Type::Enum(name.into())
    }

    /// True for primitive scalars only (boxed scalars are references).
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Type::Scalar(_))
    }

    /// Value a freshly allocated slot of this type holds.
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            Type::Scalar(kind) => kind.zero(),
            _ => Value::Null,
        }
    }

    /// Static assignability: can a value declared as `other` be stored here?
    ///
    /// Arrays are covariant for reference components. Class names are only
    /// compared for equality; subclassing is checked at runtime by [`Type::accepts`].
    #[must_use]
    pub fn is_assignable_from(&self, other: &Type) -> bool {
        if self == other {
            return true;
        }
        match (self, other) {
            (Type::Object, other) => !other.is_scalar(),
            (Type::Array(component), Type::Array(other_component)) => {
                !other_component.is_scalar() && component.is_assignable_from(other_component)
            }
            _ => false,
        }
    }

    /// Runtime assignability of a concrete value.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Type::Scalar(_), Value::Null) => false,
            (_, Value::Null) => true,
            (Type::Object, _) => true,
            (Type::Scalar(kind) | Type::Boxed(kind), value) => value.scalar_kind() == Some(*kind),
            (Type::Str, Value::Str(_)) => true,
            (Type::Enum(name), Value::Enum(constant)) => constant.enum_type().name() == &**name,
            (Type::Array(component), Value::Array(array)) => {
                component.is_assignable_from(array.component())
            }
            (Type::Class(name), Value::Object(object)) => object.class().is_subclass_of(name),
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Scalar(kind) => f.write_str(kind.name()),
            Type::Boxed(kind) => f.write_str(kind.boxed_name()),
            Type::Str => f.write_str("String"),
            Type::Enum(name) | Type::Class(name) => f.write_str(name),
            Type::Array(component) => write!(f, "{}[]", component),
            Type::Object => f.write_str("Object"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_slots_default_to_zero() {
        for kind in ScalarKind::ALL {
            let zero = Type::Scalar(kind).default_value();
            assert_eq!(zero.scalar_kind(), Some(kind));
        }
        assert!(Type::Boxed(ScalarKind::Int).default_value().is_null());
        assert!(Type::Str.default_value().is_null());
    }

    #[test]
    fn primitive_rejects_null_but_boxed_accepts_it() {
        assert!(!Type::INT.accepts(&Value::Null));
        assert!(Type::boxed(ScalarKind::Int).accepts(&Value::Null));
        assert!(Type::INT.accepts(&Value::Int(4)));
        assert!(!Type::INT.accepts(&Value::Long(4)));
    }

    #[test]
    fn object_array_is_covariant_for_references_only() {
        let objects = Type::array(Type::Object);
        assert!(objects.is_assignable_from(&Type::array(Type::Str)));
        assert!(!objects.is_assignable_from(&Type::array(Type::INT)));
        assert!(Type::array(Type::INT).is_assignable_from(&Type::array(Type::INT)));
    }

    #[test]
    fn display_spells_types() {
        assert_eq!(Type::INT.to_string(), "int");
        assert_eq!(Type::boxed(ScalarKind::Char).to_string(), "Character");
        assert_eq!(Type::array(Type::array(Type::Str)).to_string(), "String[][]");
        assert_eq!(Type::class("Car").to_string(), "Car");
    }
}

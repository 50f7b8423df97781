//! Runtime values and the reference handles of the managed heap.

use super::{Class, Fault, ScalarKind, Type};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

// =============================================================================
// IDENTITY
// =============================================================================

/// Reference identity of a heap node (array or object).
///
/// Derived from the handle address, so it is only meaningful while the node
/// is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(usize);

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

// =============================================================================
// ENUMS
// =============================================================================

/// An enumerated-constant type: a name and its ordered constants.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumType {
    name: Arc<str>,
    constants: Vec<Arc<str>>,
}

impl EnumType {
    /// Create an enum type with the given constants, in ordinal order.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, constants: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            constants: constants.iter().map(|c| Arc::from(*c)).collect(),
        })
    }

    /// Name of the enum type.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of constants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    /// True if the enum declares no constants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// The constant at `ordinal`.
    #[must_use]
    pub fn constant(self: &Arc<Self>, ordinal: usize) -> Option<EnumConst> {
        (ordinal < self.constants.len()).then(|| EnumConst {
            ty: Arc::clone(self),
            ordinal,
        })
    }

    /// The constant named `name`.
    #[must_use]
    pub fn value_of(self: &Arc<Self>, name: &str) -> Option<EnumConst> {
        let ordinal = self.constants.iter().position(|c| &**c == name)?;
        self.constant(ordinal)
    }
}

/// One constant of an [`EnumType`].
#[derive(Debug, Clone)]
pub struct EnumConst {
    ty: Arc<EnumType>,
    ordinal: usize,
}

impl EnumConst {
    #[must_use]
    pub fn enum_type(&self) -> &Arc<EnumType> {
        &self.ty
    }

    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.ty
            .constants
            .get(self.ordinal)
            .map(|c| &**c)
            .unwrap_or_default()
    }
}

impl PartialEq for EnumConst {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ty, &other.ty) && self.ordinal == other.ordinal
    }
}

impl Eq for EnumConst {}

// =============================================================================
// VALUE
// =============================================================================

/// A runtime value: absent, a scalar, a string, an enum constant, or a
/// handle to an array or object on the managed heap.
///
/// Cloning a `Value` never copies heap nodes; the clone aliases them.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Str(Arc<str>),
    Enum(EnumConst),
    Array(ArrayRef),
    Object(ObjRef),
}

impl Value {
    /// Create a string value.
    #[must_use]
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Scalar kind of a scalar value.
    #[must_use]
    pub const fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Value::Bool(_) => Some(ScalarKind::Bool),
            Value::Byte(_) => Some(ScalarKind::Byte),
            Value::Short(_) => Some(ScalarKind::Short),
            Value::Int(_) => Some(ScalarKind::Int),
            Value::Long(_) => Some(ScalarKind::Long),
            Value::Float(_) => Some(ScalarKind::Float),
            Value::Double(_) => Some(ScalarKind::Double),
            Value::Char(_) => Some(ScalarKind::Char),
            _ => None,
        }
    }

    /// Dynamic type of the value. `None` for `Null`.
    ///
    /// A scalar seen as a value is always boxed.
    #[must_use]
    pub fn runtime_type(&self) -> Option<Type> {
        match self {
            Value::Null => None,
            Value::Str(_) => Some(Type::Str),
            Value::Enum(constant) => Some(Type::Enum(Arc::clone(&constant.ty.name))),
            Value::Array(array) => Some(Type::array(array.component().clone())),
            Value::Object(object) => Some(Type::Class(Arc::clone(object.class().name_arc()))),
            scalar => scalar.scalar_kind().map(Type::Boxed),
        }
    }

    /// Short name of the value's shape, used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Str(_) => "string",
            Value::Enum(_) => "enum constant",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            _ => "scalar",
        }
    }

    /// Identity of a heap node. `None` for values that are not heap nodes.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Value::Array(array) => Some(array.identity()),
            Value::Object(object) => Some(object.identity()),
            _ => None,
        }
    }

    /// Reference identity.
    ///
    /// Heap handles and strings compare by address, enum constants by type
    /// and ordinal, scalars by bit pattern.
    #[must_use]
    pub fn same_ref(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => Arc::ptr_eq(a, b),
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Fail with [`Fault::MissingValue`] if the value is absent.
    ///
    /// Constructor bodies use this where a non-null argument is required.
    pub fn require(&self, what: &str) -> Result<&Value, Fault> {
        if self.is_null() {
            Err(Fault::MissingValue(what.to_string()))
        } else {
            Ok(self)
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&ObjRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::Str(s) => f.write_str(s),
            Value::Enum(constant) => f.write_str(constant.name()),
            Value::Array(array) => write!(f, "{:?}", array),
            Value::Object(object) => write!(f, "{:?}", object),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
    EnumConst => Enum,
    ArrayRef => Array,
    ObjRef => Object,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

// =============================================================================
// ARRAYS
// =============================================================================

#[derive(Debug)]
struct ArrayCell {
    component: Type,
    elements: RefCell<Vec<Value>>,
}

/// Handle to a fixed-length array on the managed heap.
#[derive(Clone)]
pub struct ArrayRef(Rc<ArrayCell>);

impl ArrayRef {
    /// Allocate an array of `len` default elements of `component`.
    #[must_use]
    pub fn new(component: Type, len: usize) -> Self {
        let elements = vec![component.default_value(); len];
        Self(Rc::new(ArrayCell {
            component,
            elements: RefCell::new(elements),
        }))
    }

    /// Allocate an array holding `values`, checking each against `component`.
    pub fn from_values(component: Type, values: Vec<Value>) -> Result<Self, Fault> {
        if let Some(bad) = values.iter().find(|v| !component.accepts(v)) {
            return Err(Fault::IllegalArgument(format!(
                "array store of {} into {}[]",
                bad.kind_name(),
                component
            )));
        }
        Ok(Self(Rc::new(ArrayCell {
            component,
            elements: RefCell::new(values),
        })))
    }

    #[must_use]
    pub fn component(&self) -> &Type {
        &self.0.component
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.elements.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index` (aliased, not copied).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.elements.borrow().get(index).cloned()
    }

    /// Store `value` at `index`.
    pub fn set(&self, index: usize, value: Value) -> Result<(), Fault> {
        if !self.0.component.accepts(&value) {
            return Err(Fault::IllegalArgument(format!(
                "array store of {} into {}[]",
                value.kind_name(),
                self.0.component
            )));
        }
        let mut elements = self.0.elements.borrow_mut();
        let len = elements.len();
        let slot = elements.get_mut(index).ok_or_else(|| {
            Fault::IllegalArgument(format!("index {} out of bounds for length {}", index, len))
        })?;
        *slot = value;
        Ok(())
    }

    /// Snapshot of the elements (aliased, not copied).
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.elements.borrow().clone()
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity(Rc::as_ptr(&self.0) as usize)
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[]@{}", self.0.component, self.identity())
    }
}

// =============================================================================
// OBJECTS
// =============================================================================

struct ObjectCell {
    class: Arc<Class>,
    slots: RefCell<Vec<Value>>,
}

/// Handle to an instance of a registered [`Class`].
///
/// Slots follow the class instance layout: inherited slots first, then the
/// class's own, static fields excluded.
#[derive(Clone)]
pub struct ObjRef(Rc<ObjectCell>);

impl ObjRef {
    /// Allocate an instance whose slots hold their declared defaults.
    pub(crate) fn allocate(class: &Arc<Class>) -> Self {
        let slots = class
            .layout()
            .iter()
            .map(|slot| slot.ty.default_value())
            .collect();
        Self(Rc::new(ObjectCell {
            class: Arc::clone(class),
            slots: RefCell::new(slots),
        }))
    }

    #[must_use]
    pub fn class(&self) -> &Arc<Class> {
        &self.0.class
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.0.slots.borrow().len()
    }

    /// Slot value by layout index (aliased, not copied).
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<Value> {
        self.0.slots.borrow().get(index).cloned()
    }

    /// Write a slot by layout index, checking the declared slot type.
    pub fn set_slot(&self, index: usize, value: Value) -> Result<(), Fault> {
        let class = &self.0.class;
        let slot = class.layout().get(index).ok_or_else(|| {
            Fault::IllegalArgument(format!("{} has no slot #{}", class.name(), index))
        })?;
        if !slot.ty.accepts(&value) {
            return Err(Fault::IllegalArgument(format!(
                "cannot assign {} to {}.{} of type {}",
                value.kind_name(),
                class.name(),
                slot.name,
                slot.ty
            )));
        }
        if let Some(target) = self.0.slots.borrow_mut().get_mut(index) {
            *target = value;
        }
        Ok(())
    }

    /// Read a field by name.
    pub fn get(&self, name: &str) -> Result<Value, Fault> {
        let index = self.index_of(name)?;
        Ok(self.slot(index).unwrap_or_default())
    }

    /// Write a field by name.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), Fault> {
        let index = self.index_of(name)?;
        self.set_slot(index, value.into())
    }

    fn index_of(&self, name: &str) -> Result<usize, Fault> {
        self.0.class.slot_index(name).ok_or_else(|| {
            Fault::IllegalArgument(format!("{} has no field {}", self.0.class.name(), name))
        })
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity(Rc::as_ptr(&self.0) as usize)
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &ObjRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.0.class.name(), self.identity())
    }
}

// =============================================================================
// STATIC HANDLE TYPES
// =============================================================================

/// A statically typed view of a [`Value`].
///
/// Lets the copy API hand back the same handle type it was given.
pub trait GraphValue: Sized {
    /// The value this handle stands for (aliased, not copied).
    fn to_value(&self) -> Value;

    /// Recover the handle from a value of the matching shape.
    fn from_value(value: Value) -> Option<Self>;
}

impl GraphValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl GraphValue for ObjRef {
    fn to_value(&self) -> Value {
        Value::Object(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl GraphValue for ArrayRef {
    fn to_value(&self) -> Value {
        Value::Array(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }
}

impl<T: GraphValue> GraphValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map(GraphValue::to_value).unwrap_or_default()
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            value => T::from_value(value).map(Some),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

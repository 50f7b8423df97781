//! Type registry entries: classes, their fields and their constructors.

use super::{Fault, ObjRef, Type, Value};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a built [`Class`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(pub u64);

impl ClassId {
    fn next() -> Self {
        Self(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Shape of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// Arbitrary, usually mutable, composite.
    Plain,
    /// Immutable product type rebuilt through its canonical constructor.
    Record,
}

/// Where a field's value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// One value per instance. Part of the instance layout.
    Instance,
    /// Process-wide. Never part of an instance and never copied.
    Static,
}

/// A declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: Arc<str>,
    pub ty: Type,
    pub storage: Storage,
}

/// One entry of a class instance layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub name: Arc<str>,
    pub ty: Type,
    /// Name of the class that declared the field.
    pub owner: Arc<str>,
}

/// Constructor body: runs against a freshly allocated instance.
pub type ConstructorBody = Arc<dyn Fn(&ObjRef, &[Value]) -> Result<(), Fault> + Send + Sync>;

/// A declared constructor.
#[derive(Clone)]
pub struct Constructor {
    params: Vec<Type>,
    body: ConstructorBody,
}

impl Constructor {
    #[must_use]
    pub fn params(&self) -> &[Type] {
        &self.params
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Parameter list as source would spell it, e.g. `(int, String)`.
    #[must_use]
    pub fn signature(&self) -> String {
        signature_of(&self.params)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constructor{}", self.signature())
    }
}

pub(crate) fn signature_of(params: &[Type]) -> String {
    let names: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("({})", names.join(", "))
}

// =============================================================================
// CLASS
// =============================================================================

/// A registered composite type.
///
/// Describes the member slots of its instances and how to construct them.
/// Built once through [`ClassBuilder`] and shared as `Arc<Class>`.
pub struct Class {
    id: ClassId,
    name: Arc<str>,
    kind: ClassKind,
    parent: Option<Arc<Class>>,
    fields: Vec<FieldDecl>,
    constructors: Vec<Constructor>,
    layout: Vec<Slot>,
}

impl Class {
    #[must_use]
    pub fn id(&self) -> ClassId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    #[must_use]
    pub fn is_record(&self) -> bool {
        self.kind == ClassKind::Record
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Arc<Class>> {
        self.parent.as_ref()
    }

    /// Fields declared by this class itself, statics included.
    #[must_use]
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// Constructors in declaration order.
    #[must_use]
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Instance layout: inherited slots first (root-most ancestor first),
    /// then this class's own instance fields, in declaration order.
    #[must_use]
    pub fn layout(&self) -> &[Slot] {
        &self.layout
    }

    /// Declared types of the instance layout, in order.
    #[must_use]
    pub fn layout_signature(&self) -> Vec<Type> {
        self.layout.iter().map(|slot| slot.ty.clone()).collect()
    }

    /// Layout index of the field named `name`.
    ///
    /// A field redeclared by a subclass shadows the inherited one.
    #[must_use]
    pub fn slot_index(&self, name: &str) -> Option<usize> {
        self.layout.iter().rposition(|slot| &*slot.name == name)
    }

    /// True if this class or one of its ancestors is named `name`.
    #[must_use]
    pub fn is_subclass_of(&self, name: &str) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class.name() == name {
                return true;
            }
            current = class.parent.as_deref();
        }
        false
    }

    /// Run constructor `index` with `args`.
    ///
    /// Arity and argument types are checked first. The body then runs on an
    /// instance whose slots hold their defaults; a fault it raises comes
    /// back wrapped.
    pub fn instantiate(self: &Arc<Self>, index: usize, args: &[Value]) -> Result<ObjRef, Fault> {
        let constructor = self.constructors.get(index).ok_or_else(|| {
            Fault::IllegalArgument(format!("{} has no constructor #{}", self.name, index))
        })?;

        if constructor.params.len() != args.len() {
            return Err(Fault::IllegalArgument(format!(
                "wrong number of arguments for {}{}: expected {}, got {}",
                self.name,
                constructor.signature(),
                constructor.params.len(),
                args.len()
            )));
        }

        for (position, (param, arg)) in constructor.params.iter().zip(args).enumerate() {
            if !param.accepts(arg) {
                return Err(Fault::IllegalArgument(format!(
                    "argument {} of {}{}: expected {}, got {}",
                    position,
                    self.name,
                    constructor.signature(),
                    param,
                    arg.kind_name()
                )));
            }
        }

        let instance = ObjRef::allocate(self);
        (constructor.body)(&instance, args).map_err(|fault| {
            fault.wrap(format!(
                "constructor {}{} failed",
                self.name,
                constructor.signature()
            ))
        })?;
        Ok(instance)
    }

    /// Run the first constructor that accepts `args`.
    pub fn construct(self: &Arc<Self>, args: Vec<Value>) -> Result<ObjRef, Fault> {
        let index = self
            .constructors
            .iter()
            .position(|ctor| {
                ctor.params.len() == args.len()
                    && ctor.params.iter().zip(&args).all(|(param, arg)| param.accepts(arg))
            })
            .ok_or_else(|| {
                let kinds: Vec<&str> = args.iter().map(Value::kind_name).collect();
                Fault::IllegalArgument(format!(
                    "no constructor of {} accepts ({})",
                    self.name,
                    kinds.join(", ")
                ))
            })?;
        self.instantiate(index, &args)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("layout", &self.layout)
            .field("constructors", &self.constructors)
            .finish()
    }
}

// =============================================================================
// CLASS BUILDER
// =============================================================================

/// Builder for [`Class`] registry entries.
///
/// ```
/// use replica_core::{ClassBuilder, Type, Value};
///
/// let car = ClassBuilder::new("Car")
///     .field("id", Type::INT)
///     .field("next", Type::class("Car"))
///     .constructor(vec![Type::INT, Type::class("Car")], |this, args| {
///         this.set("id", args[0].clone())?;
///         this.set("next", args[1].clone())
///     })
///     .build();
///
/// let first = car.construct(vec![Value::Int(1), Value::Null]).expect("construct");
/// assert_eq!(first.get("id").expect("id").as_int(), Some(1));
/// ```
pub struct ClassBuilder {
    name: Arc<str>,
    kind: ClassKind,
    parent: Option<Arc<Class>>,
    fields: Vec<FieldDecl>,
    constructors: Vec<Constructor>,
}

impl ClassBuilder {
    /// Start a plain class.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Plain,
            parent: None,
            fields: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Start a record. Its fields are its components; a canonical
    /// constructor is generated unless one is declared.
    #[must_use]
    pub fn record(name: impl Into<Arc<str>>) -> Self {
        Self {
            kind: ClassKind::Record,
            ..Self::new(name)
        }
    }

    #[must_use]
    pub fn extends(mut self, parent: &Arc<Class>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Declare an instance field.
    #[must_use]
    pub fn field(mut self, name: impl Into<Arc<str>>, ty: Type) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            ty,
            storage: Storage::Instance,
        });
        self
    }

    /// Declare a static field.
    #[must_use]
    pub fn static_field(mut self, name: impl Into<Arc<str>>, ty: Type) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            ty,
            storage: Storage::Static,
        });
        self
    }

    /// Declare a constructor.
    #[must_use]
    pub fn constructor<F>(mut self, params: Vec<Type>, body: F) -> Self
    where
        F: Fn(&ObjRef, &[Value]) -> Result<(), Fault> + Send + Sync + 'static,
    {
        self.constructors.push(Constructor {
            params,
            body: Arc::new(body),
        });
        self
    }

    #[must_use]
    pub fn build(self) -> Arc<Class> {
        let mut layout = self
            .parent
            .as_ref()
            .map(|parent| parent.layout.clone())
            .unwrap_or_default();
        layout.extend(
            self.fields
                .iter()
                .filter(|field| field.storage == Storage::Instance)
                .map(|field| Slot {
                    name: Arc::clone(&field.name),
                    ty: field.ty.clone(),
                    owner: Arc::clone(&self.name),
                }),
        );

        let mut constructors = self.constructors;
        if self.kind == ClassKind::Record {
            let signature: Vec<Type> = layout.iter().map(|slot| slot.ty.clone()).collect();
            if !constructors.iter().any(|ctor| ctor.params == signature) {
                constructors.push(Constructor {
                    params: signature,
                    body: Arc::new(assign_all_slots),
                });
            }
        }

        Arc::new(Class {
            id: ClassId::next(),
            name: self.name,
            kind: self.kind,
            parent: self.parent,
            fields: self.fields,
            constructors,
            layout,
        })
    }
}

fn assign_all_slots(this: &ObjRef, args: &[Value]) -> Result<(), Fault> {
    for (index, arg) in args.iter().enumerate() {
        this.set_slot(index, arg.clone())?;
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

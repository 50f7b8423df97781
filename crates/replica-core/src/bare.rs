//! # Bare Instance Builder
//!
//! Manufactures an empty, populatable instance of an arbitrary class without
//! running meaningful constructor logic.
//!
//! ## Algorithm
//!
//! 1. Pick the declared constructor with the fewest parameters (first in
//!    declaration order on ties). Fewer parameters means fewer preconditions
//!    a placeholder can violate.
//! 2. Supply a placeholder per parameter:
//!    - zero for primitive scalars,
//!    - an empty `Object[]` for a parameter declared exactly `Object[]`
//!      (the variadic-last-parameter case),
//!    - `Null` for everything else.
//! 3. Invoke it and classify the outcome as success, absence violation or
//!    general failure.
//!
//! The chosen constructor and placeholders form a [`ConstructionPlan`],
//! computed once per class and cached process-wide in a [`PlanCache`].

use crate::types::{ArrayRef, Class, ClassId, CopyError, Fault, ObjRef, ScalarKind, Type, Value};
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

// =============================================================================
// PLACEHOLDERS
// =============================================================================

/// Argument supplied to a constructor while building a bare instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Zero value of a primitive scalar parameter.
    Zero(ScalarKind),
    /// A fresh empty `Object[]`.
    EmptyObjectArray,
    /// `Null`.
    Absent,
}

impl Placeholder {
    /// Placeholder for a parameter declared as `ty`.
    ///
    /// Only an exact `Object[]` gets an empty array; other array types get
    /// `Null`.
    #[must_use]
    pub fn for_param(ty: &Type) -> Self {
        match ty {
            Type::Scalar(kind) => Placeholder::Zero(*kind),
            Type::Array(component) if **component == Type::Object => {
                Placeholder::EmptyObjectArray
            }
            _ => Placeholder::Absent,
        }
    }

    /// Materialize as an argument value.
    #[must_use]
    pub fn to_value(self) -> Value {
        match self {
            Placeholder::Zero(kind) => kind.zero(),
            Placeholder::EmptyObjectArray => Value::Array(ArrayRef::new(Type::Object, 0)),
            Placeholder::Absent => Value::Null,
        }
    }
}

// =============================================================================
// CONSTRUCTION PLAN
// =============================================================================

/// How to build a bare instance of one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionPlan {
    constructor: usize,
    placeholders: Vec<Placeholder>,
}

impl ConstructionPlan {
    /// Compute the plan for `class`.
    ///
    /// Fails with [`CopyError::NoConstructors`] if the class declares none.
    pub fn for_class(class: &Class) -> Result<Self, CopyError> {
        let (constructor, chosen) = class
            .constructors()
            .iter()
            .enumerate()
            .min_by_key(|(_, ctor)| ctor.arity())
            .ok_or_else(|| CopyError::NoConstructors {
                type_name: class.name().to_string(),
            })?;

        Ok(Self {
            constructor,
            placeholders: chosen.params().iter().map(Placeholder::for_param).collect(),
        })
    }

    /// Index of the chosen constructor.
    #[must_use]
    pub fn constructor(&self) -> usize {
        self.constructor
    }

    #[must_use]
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Fresh argument vector for one invocation.
    #[must_use]
    pub fn arguments(&self) -> Vec<Value> {
        self.placeholders.iter().map(|p| p.to_value()).collect()
    }
}

// =============================================================================
// INSTANTIATION OUTCOME
// =============================================================================

/// Outcome of building a bare instance.
#[derive(Debug)]
pub enum Instantiation {
    /// A populatable instance.
    Success(ObjRef),
    /// The constructor rejected a placeholder as illegally missing.
    AbsenceViolation(Fault),
    /// Any other constructor fault.
    GeneralFailure(Fault),
}

/// How instances of a class are copied, learned from the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Bare instance, then member-wise copy.
    BareInstance,
    /// Canonical reconstruction.
    CanonicalProduct,
    /// Bare instances are rejected and no canonical constructor exists.
    Unsupported,
}

// =============================================================================
// PLAN CACHE
// =============================================================================

static GLOBAL_CACHE: OnceLock<PlanCache> = OnceLock::new();

/// Append-only cache of construction plans and learned strategies, keyed by
/// [`ClassId`].
///
/// Safe for concurrent read/insert. Two callers racing on the same class may
/// both compute its plan; the first insert wins and both get the same `Arc`.
#[derive(Debug, Default)]
pub struct PlanCache {
    plans: DashMap<ClassId, Arc<ConstructionPlan>>,
    strategies: DashMap<ClassId, Strategy>,
}

impl PlanCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache.
    pub fn global() -> &'static PlanCache {
        GLOBAL_CACHE.get_or_init(PlanCache::new)
    }

    /// Cached plan for `class`, computing it on first use.
    ///
    /// A class without constructors is an error and is not cached.
    pub fn plan_for(&self, class: &Class) -> Result<Arc<ConstructionPlan>, CopyError> {
        if let Some(plan) = self.plans.get(&class.id()) {
            return Ok(Arc::clone(plan.value()));
        }

        let plan = Arc::new(ConstructionPlan::for_class(class)?);
        tracing::debug!(
            class = class.name(),
            constructor = plan.constructor,
            arity = plan.placeholders.len(),
            "construction plan built"
        );
        Ok(Arc::clone(
            self.plans.entry(class.id()).or_insert(plan).value(),
        ))
    }

    /// Build a bare instance of `class`.
    ///
    /// The outer `Err` is reserved for configuration errors; constructor
    /// faults are classified into the returned [`Instantiation`].
    pub fn instantiate(&self, class: &Arc<Class>) -> Result<Instantiation, CopyError> {
        let plan = self.plan_for(class)?;
        Ok(match class.instantiate(plan.constructor, &plan.arguments()) {
            Ok(instance) => Instantiation::Success(instance),
            Err(fault) if fault.absence().is_some() => Instantiation::AbsenceViolation(fault),
            Err(fault) => Instantiation::GeneralFailure(fault),
        })
    }

    /// Learned strategy for a class.
    #[must_use]
    pub fn strategy(&self, class: ClassId) -> Option<Strategy> {
        self.strategies.get(&class).map(|entry| *entry.value())
    }

    /// Record the strategy for a class. The first recorded strategy sticks.
    pub fn record_strategy(&self, class: ClassId, strategy: Strategy) -> Strategy {
        let recorded = *self.strategies.entry(class).or_insert(strategy).value();
        if recorded == strategy {
            tracing::debug!(class = class.0, ?strategy, "copy strategy learned");
        }
        recorded
    }

    /// Number of cached plans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// True if a plan for `class` is cached.
    #[must_use]
    pub fn contains(&self, class: ClassId) -> bool {
        self.plans.contains_key(&class)
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! # Graph Copier
//!
//! Walks an object graph and produces an independent copy of it.
//!
//! One recursive visit per reachable node, dispatched by shape:
//! 1. `Null` and atomic values are returned as they are (shared).
//! 2. A node already copied returns its copy (cycles and shared references).
//! 3. Arrays: a new array is registered before its elements are copied, so
//!    an array that contains itself resolves to the new array.
//! 4. Composites: a bare instance is registered before its slots are copied;
//!    records, and classes that reject bare construction for lack of a value,
//!    are rebuilt through their canonical constructor instead.
//!
//! ## Bounds
//!
//! Every visit counts against the configured ceiling. Recursion grows the
//! stack on demand, so long chains fail on the ceiling, never on the stack.
//!
//! ## Canonical cycles
//!
//! A canonical node can only be registered once its constructor has run.
//! Reaching it again while its slots are still being copied is rejected with
//! [`CopyError::CanonicalCycle`].

use crate::atomic;
use crate::bare::{Instantiation, PlanCache, Strategy};
use crate::canonical;
use crate::config::CopyConfig;
use crate::primitives::{RED_ZONE, STACK_PER_RECURSION};
use crate::types::{ArrayRef, Class, CopyError, Identity, ObjRef, Value};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// State of one top-level copy.
///
/// Owns the identity map and the node counter; both are discarded with it.
pub struct GraphCopier<'c> {
    cache: &'c PlanCache,
    limit: usize,
    visits: usize,
    visited: FxHashMap<Identity, Value>,
    in_construction: FxHashSet<Identity>,
}

impl<'c> GraphCopier<'c> {
    #[must_use]
    pub fn new(cache: &'c PlanCache, config: &CopyConfig) -> Self {
        Self {
            cache,
            limit: config.max_graph_size,
            visits: 0,
            visited: FxHashMap::default(),
            in_construction: FxHashSet::default(),
        }
    }

    /// Nodes visited so far, leaves included.
    #[must_use]
    pub fn visits(&self) -> usize {
        self.visits
    }

    /// Number of distinct arrays and objects copied so far.
    #[must_use]
    pub fn copied_nodes(&self) -> usize {
        self.visited.len()
    }

    /// Copy `original` and everything reachable from it.
    pub fn copy(&mut self, original: &Value) -> Result<Value, CopyError> {
        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || self.copy_node(original))
    }

    fn copy_node(&mut self, original: &Value) -> Result<Value, CopyError> {
        self.visits += 1;
        if self.visits > self.limit {
            return Err(CopyError::SizeLimit {
                limit: self.limit,
                context: original.to_string(),
            });
        }

        if original.is_null() || atomic::is_atomic_value(original) {
            return Ok(original.clone());
        }

        if let Some(copy) = original.identity().and_then(|id| self.visited.get(&id)) {
            return Ok(copy.clone());
        }

        match original {
            Value::Array(array) => self.copy_array(array),
            Value::Object(object) => {
                if self.in_construction.contains(&object.identity()) {
                    return Err(CopyError::CanonicalCycle {
                        type_name: object.class().name().to_string(),
                    });
                }
                self.copy_composite(object)
            }
            // Every other shape is atomic and returned above.
            other => Ok(other.clone()),
        }
    }

    fn copy_array(&mut self, array: &ArrayRef) -> Result<Value, CopyError> {
        let copy = ArrayRef::new(array.component().clone(), array.len());
        self.visited
            .insert(array.identity(), Value::Array(copy.clone()));

        for index in 0..array.len() {
            let element = array.get(index).unwrap_or_default();
            let element_copy = self.copy(&element)?;
            copy.set(index, element_copy)
                .map_err(|fault| CopyError::SlotAccess {
                    type_name: format!("{}[]", array.component()),
                    slot: index.to_string(),
                    fault,
                })?;
        }

        Ok(Value::Array(copy))
    }

    fn copy_composite(&mut self, object: &ObjRef) -> Result<Value, CopyError> {
        let class = Arc::clone(object.class());
        if class.is_record() {
            return self.copy_canonical(object, &class);
        }

        // Unsupported classes fail inside copy_canonical on the missing
        // constructor, before any slot is visited.
        let learned = self.cache.strategy(class.id());
        if matches!(
            learned,
            Some(Strategy::CanonicalProduct | Strategy::Unsupported)
        ) {
            return self.copy_canonical(object, &class);
        }

        match self.cache.instantiate(&class)? {
            Instantiation::Success(instance) => {
                if learned.is_none() {
                    self.cache.record_strategy(class.id(), Strategy::BareInstance);
                }
                self.visited
                    .insert(object.identity(), Value::Object(instance.clone()));
                self.copy_slots(object, &instance)?;
                Ok(Value::Object(instance))
            }
            Instantiation::AbsenceViolation(fault) => {
                tracing::debug!(
                    class = class.name(),
                    %fault,
                    "bare instance rejected a placeholder, rebuilding canonically"
                );
                let strategy = if canonical::canonical_constructor(&class).is_some() {
                    Strategy::CanonicalProduct
                } else {
                    Strategy::Unsupported
                };
                self.cache.record_strategy(class.id(), strategy);
                self.copy_canonical(object, &class)
            }
            Instantiation::GeneralFailure(fault) => Err(CopyError::Instantiation {
                type_name: class.name().to_string(),
                fault,
            }),
        }
    }

    fn copy_slots(&mut self, original: &ObjRef, instance: &ObjRef) -> Result<(), CopyError> {
        for index in 0..original.slot_count() {
            let value = original.slot(index).unwrap_or_default();
            let value_copy = self.copy(&value)?;
            instance
                .set_slot(index, value_copy)
                .map_err(|fault| slot_access(original.class(), index, fault))?;
        }
        Ok(())
    }

    fn copy_canonical(&mut self, object: &ObjRef, class: &Arc<Class>) -> Result<Value, CopyError> {
        let constructor = canonical::resolve(class)?;
        let identity = object.identity();

        self.in_construction.insert(identity);
        let slots = self.copy_slot_values(object);
        self.in_construction.remove(&identity);

        let copy = canonical::reconstruct(class, constructor, &slots?)?;
        self.visited.insert(identity, Value::Object(copy.clone()));
        Ok(Value::Object(copy))
    }

    fn copy_slot_values(&mut self, object: &ObjRef) -> Result<Vec<Value>, CopyError> {
        let mut copies = Vec::with_capacity(object.slot_count());
        for index in 0..object.slot_count() {
            let value = object.slot(index).unwrap_or_default();
            copies.push(self.copy(&value)?);
        }
        Ok(copies)
    }
}

fn slot_access(class: &Class, index: usize, fault: crate::types::Fault) -> CopyError {
    CopyError::SlotAccess {
        type_name: class.name().to_string(),
        slot: class
            .layout()
            .get(index)
            .map(|slot| slot.name.to_string())
            .unwrap_or_else(|| index.to_string()),
        fault,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassBuilder, Fault, Type};

    fn node_class() -> Arc<Class> {
        ClassBuilder::new("Node")
            .field("label", Type::Str)
            .field("next", Type::class("Node"))
            .constructor(vec![], |_, _| Ok(()))
            .build()
    }

    fn node(class: &Arc<Class>, label: &str) -> ObjRef {
        let n = class.instantiate(0, &[]).expect("node");
        n.set("label", label).expect("label");
        n
    }

    #[test]
    fn shared_child_is_copied_once() {
        let cache = PlanCache::new();
        let class = node_class();
        let pair = ArrayRef::new(Type::class("Node"), 2);
        let shared = node(&class, "shared");
        pair.set(0, Value::Object(shared.clone())).expect("set");
        pair.set(1, Value::Object(shared)).expect("set");

        let mut copier = GraphCopier::new(&cache, &CopyConfig::default());
        let copy = copier.copy(&Value::Array(pair)).expect("copy");
        let copy = copy.as_array().expect("array");

        let first = copy.get(0).unwrap_or_default();
        let second = copy.get(1).unwrap_or_default();
        assert!(first.same_ref(&second));
        assert_eq!(copier.copied_nodes(), 2);
    }

    #[test]
    fn every_visit_counts_against_the_ceiling() {
        let cache = PlanCache::new();
        let class = node_class();
        let head = node(&class, "a");
        let tail = node(&class, "b");
        head.set("next", tail).expect("next");

        // head, label, next(tail), label, next(null)
        let mut exact = GraphCopier::new(&cache, &CopyConfig::with_max_graph_size(5));
        assert!(exact.copy(&Value::Object(head.clone())).is_ok());
        assert_eq!(exact.visits(), 5);

        let mut short = GraphCopier::new(&cache, &CopyConfig::with_max_graph_size(4));
        let result = short.copy(&Value::Object(head));
        assert!(matches!(result, Err(CopyError::SizeLimit { limit: 4, .. })));
    }

    #[test]
    fn strategy_is_learned_after_absence_violation() {
        let cache = PlanCache::new();
        let boxed = ClassBuilder::new("Boxed")
            .field("inner", Type::Str)
            .constructor(vec![Type::Str], |this, args| {
                this.set("inner", args[0].require("inner")?.clone())
            })
            .build();
        let original = boxed
            .construct(vec![Value::string("x")])
            .expect("construct");

        let mut copier = GraphCopier::new(&cache, &CopyConfig::default());
        copier.copy(&Value::Object(original)).expect("copy");

        assert_eq!(cache.strategy(boxed.id()), Some(Strategy::CanonicalProduct));
    }

    #[test]
    fn unsupported_class_fails_fast_on_later_copies() {
        let cache = PlanCache::new();
        let stubborn = ClassBuilder::new("Stubborn")
            .field("first", Type::INT)
            .field("second", Type::Object)
            .constructor(vec![Type::Object], |this, args| {
                this.set("second", args[0].require("second")?.clone())
            })
            .build();
        let original = stubborn
            .construct(vec![Value::string("payload")])
            .expect("construct");

        for _ in 0..2 {
            let mut copier = GraphCopier::new(&cache, &CopyConfig::default());
            let result = copier.copy(&Value::Object(original.clone()));
            assert!(matches!(
                result,
                Err(CopyError::NoCanonicalConstructor { .. })
            ));
        }
        assert_eq!(cache.strategy(stubborn.id()), Some(Strategy::Unsupported));
    }

    #[test]
    fn slot_access_names_the_field() {
        let class = node_class();
        let err = slot_access(&class, 1, Fault::IllegalState("frozen".into()));
        assert!(matches!(
            err,
            CopyError::SlotAccess { ref slot, .. } if slot == "next"
        ));
    }
}

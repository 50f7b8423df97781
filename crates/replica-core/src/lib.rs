//! # replica-core
//!
//! Generic deep-copy engine for arbitrary object graphs - THE LOGIC.
//!
//! Given any value, produces a structurally equivalent, fully independent
//! copy: every reachable array and object is freshly allocated, immutable
//! leaves are shared, and the aliasing topology of the original (shared
//! children, self references, cycles) is reproduced in the copy.
//!
//! ## Object Model
//!
//! Types take part by registering a [`Class`] through a [`ClassBuilder`]:
//! their member slots and their constructors. The engine needs nothing else
//! from them; it picks constructors, fills placeholders and walks slots on
//! its own.
//!
//! ## Architectural Constraints
//!
//! - Single-threaded per copy; graphs are `Rc`-based and never cross threads
//! - The only shared state is the append-only [`PlanCache`]
//! - Every copy is bounded by a node-count ceiling ([`CopyConfig`])
//! - A failed copy returns nothing of the partial copy
//!
//! ```
//! use replica_core::{ClassBuilder, ObjRef, Type, Value, deep_copy, structurally_equal};
//!
//! let node = ClassBuilder::new("Node")
//!     .field("name", Type::Str)
//!     .field("next", Type::class("Node"))
//!     .constructor(vec![], |_, _| Ok(()))
//!     .build();
//!
//! let head = node.instantiate(0, &[]).expect("node");
//! head.set("name", "head").expect("name");
//! head.set("next", head.clone()).expect("next");
//!
//! let copy: ObjRef = deep_copy(&head).expect("copy");
//! assert!(!copy.ptr_eq(&head));
//! assert!(copy.get("next").expect("next").same_ref(&Value::Object(copy.clone())));
//! assert!(structurally_equal(&Value::Object(copy), &Value::Object(head)));
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod atomic;
pub mod bare;
pub mod canonical;
pub mod compare;
pub mod config;
pub mod copier;
pub mod primitives;
pub mod types;

// =============================================================================
// RE-EXPORTS: Object Model (from types module)
// =============================================================================

pub use types::{
    ArrayRef, Class, ClassBuilder, ClassId, ClassKind, Constructor, ConstructorBody, CopyError,
    EnumConst, EnumType, Fault, FieldDecl, GraphValue, Identity, ObjRef, ReplicaError,
    ScalarKind, Slot, Storage, Type, Value,
};

// =============================================================================
// RE-EXPORTS: Copy Engine
// =============================================================================

pub use atomic::{is_atomic, is_atomic_value};
pub use bare::{ConstructionPlan, Instantiation, Placeholder, PlanCache, Strategy};
pub use compare::{distinct_structurally_equal, structurally_equal};
pub use config::CopyConfig;
pub use copier::GraphCopier;
pub use primitives::MAX_OBJECT_GRAPH_SIZE;

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Configured deep-copy entry point.
///
/// Borrows a [`PlanCache`] (the process-wide one by default) and owns the
/// [`CopyConfig`] applied to every call. Each call runs with a fresh identity
/// map and node counter.
#[derive(Debug, Clone)]
pub struct DeepCopier<'c> {
    cache: &'c PlanCache,
    config: CopyConfig,
}

impl Default for DeepCopier<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl DeepCopier<'static> {
    /// Copier using the process-wide plan cache and the default ceiling.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cache(PlanCache::global())
    }
}

impl<'c> DeepCopier<'c> {
    /// Copier using a caller-owned plan cache.
    #[must_use]
    pub fn with_cache(cache: &'c PlanCache) -> Self {
        Self {
            cache,
            config: CopyConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: CopyConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &CopyConfig {
        &self.config
    }

    /// Deep-copy `original`.
    ///
    /// The copy comes back as the same handle type. Absent input comes back
    /// unchanged.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn copy<T: GraphValue>(&self, original: &T) -> Result<T, ReplicaError> {
        let root = original.to_value();
        let mut copier = GraphCopier::new(self.cache, &self.config);

        let copied = copier
            .copy(&root)
            .and_then(|copy| {
                let found = copy.kind_name();
                T::from_value(copy).ok_or(CopyError::ShapeMismatch {
                    expected: std::any::type_name::<T>(),
                    found,
                })
            })
            .map_err(|cause| ReplicaError::CopyFailed {
                original: root.to_string(),
                cause,
            })?;

        tracing::debug!(
            visits = copier.visits(),
            nodes = copier.copied_nodes(),
            "deep copy complete"
        );
        Ok(copied)
    }
}

/// Deep-copy `original` with the default configuration and the process-wide
/// plan cache.
pub fn deep_copy<T: GraphValue>(original: &T) -> Result<T, ReplicaError> {
    DeepCopier::new().copy(original)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_input_is_returned_unchanged() {
        assert!(deep_copy(&Value::Null).expect("copy").is_null());
        let none: Option<ObjRef> = None;
        assert!(deep_copy(&none).expect("copy").is_none());
    }

    #[test]
    fn failure_names_the_original() {
        let cache = PlanCache::new();
        let copier = DeepCopier::with_cache(&cache).with_config(CopyConfig::with_max_graph_size(1));
        let array = ArrayRef::from_values(Type::INT, vec![Value::Int(1)]).expect("array");

        let err = copier.copy(&array).expect_err("ceiling");
        assert!(err.to_string().starts_with("Unable to make deep copy of int[]@"));
        assert!(matches!(
            err.copy_error(),
            Some(CopyError::SizeLimit { limit: 1, .. })
        ));
    }

    #[test]
    fn custom_cache_is_used() {
        let cache = PlanCache::new();
        let empty = ClassBuilder::new("Empty")
            .constructor(vec![], |_, _| Ok(()))
            .build();
        let original = empty.instantiate(0, &[]).expect("empty");

        let copy = DeepCopier::with_cache(&cache).copy(&original).expect("copy");
        assert!(!copy.ptr_eq(&original));
        assert!(cache.contains(empty.id()));
        assert_eq!(DeepCopier::with_cache(&cache).config(), &CopyConfig::default());
    }
}

//! # Canonical Reconstruction
//!
//! Copies immutable product types by rebuilding them: every slot is copied
//! and the copies are passed to the one constructor whose ordered parameter
//! types equal the class instance layout.
//!
//! Used for record classes, and as the fallback when a plain class rejects
//! bare construction with an absence violation. The slot walk itself lives in
//! the graph copier; this module finds and invokes the constructor.

use crate::types::{Class, CopyError, ObjRef, Value, signature_of};
use std::sync::Arc;

/// Index of the canonical constructor of `class`, if it has one.
#[must_use]
pub fn canonical_constructor(class: &Class) -> Option<usize> {
    let signature = class.layout_signature();
    class
        .constructors()
        .iter()
        .position(|ctor| ctor.params() == signature.as_slice())
}

/// Index of the canonical constructor, or the error naming the signature
/// that was looked for.
pub fn resolve(class: &Class) -> Result<usize, CopyError> {
    canonical_constructor(class).ok_or_else(|| CopyError::NoCanonicalConstructor {
        type_name: class.name().to_string(),
        signature: signature_of(&class.layout_signature()),
    })
}

/// Invoke constructor `constructor` of `class` with already-copied slots.
pub fn reconstruct(
    class: &Arc<Class>,
    constructor: usize,
    slots: &[Value],
) -> Result<ObjRef, CopyError> {
    class
        .instantiate(constructor, slots)
        .map_err(|fault| CopyError::Instantiation {
            type_name: class.name().to_string(),
            fault,
        })
}

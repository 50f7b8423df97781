//! # Structural Comparison
//!
//! Decides whether two graphs have the same shape and the same leaves.
//!
//! Two values are structurally equal when:
//! - atomic leaves are equal (strings by content, floats by bit pattern so
//!   NaN equals NaN),
//! - arrays have the same component type, length and elements,
//! - objects have the same class and equal slots,
//! - and the pairing of left nodes to right nodes is a bijection, so the
//!   aliasing topology (shared children, cycles) matches.
//!
//! The walk keeps an explicit work stack and never recurses, so it handles
//! graphs of any depth.

use crate::types::{Identity, Value};
use rustc_hash::FxHashMap;

/// Node pairing discovered while walking two graphs side by side.
#[derive(Default)]
struct Pairing {
    forward: FxHashMap<Identity, Identity>,
    backward: FxHashMap<Identity, Identity>,
}

enum Pair {
    /// First time this pair is seen: compare its contents.
    Fresh,
    /// Already compared.
    Known,
    /// One side is already paired with a different node.
    Conflict,
}

impl Pairing {
    fn pair(&mut self, left: Identity, right: Identity) -> Pair {
        match (self.forward.get(&left), self.backward.get(&right)) {
            (Some(mapped), _) if *mapped == right => Pair::Known,
            (None, None) => {
                self.forward.insert(left, right);
                self.backward.insert(right, left);
                Pair::Fresh
            }
            _ => Pair::Conflict,
        }
    }
}

/// True if `left` and `right` are structurally equal.
#[must_use]
pub fn structurally_equal(left: &Value, right: &Value) -> bool {
    bisimulate(left, right).is_some()
}

/// True if `left` and `right` are structurally equal and share no array or
/// object node.
///
/// This is what a deep copy must satisfy against its original.
#[must_use]
pub fn distinct_structurally_equal(left: &Value, right: &Value) -> bool {
    bisimulate(left, right).is_some_and(|pairing| {
        pairing
            .forward
            .keys()
            .all(|node| !pairing.backward.contains_key(node))
    })
}

fn bisimulate(left: &Value, right: &Value) -> Option<Pairing> {
    let mut pairing = Pairing::default();
    let mut pending = vec![(left.clone(), right.clone())];

    while let Some((left, right)) = pending.pop() {
        match (&left, &right) {
            (Value::Array(a), Value::Array(b)) => match pairing.pair(a.identity(), b.identity()) {
                Pair::Known => {}
                Pair::Conflict => return None,
                Pair::Fresh => {
                    if a.component() != b.component() || a.len() != b.len() {
                        return None;
                    }
                    pending.extend(a.to_vec().into_iter().zip(b.to_vec()));
                }
            },
            (Value::Object(a), Value::Object(b)) => match pairing.pair(a.identity(), b.identity()) {
                Pair::Known => {}
                Pair::Conflict => return None,
                Pair::Fresh => {
                    if a.class().id() != b.class().id() {
                        return None;
                    }
                    for index in 0..a.slot_count() {
                        pending.push((
                            a.slot(index).unwrap_or_default(),
                            b.slot(index).unwrap_or_default(),
                        ));
                    }
                }
            },
            (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
                return None;
            }
            (left, right) => {
                if !leaves_equal(left, right) {
                    return None;
                }
            }
        }
    }

    Some(pairing)
}

fn leaves_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Str(a), Value::Str(b)) => a == b,
        // Bit patterns already cover every scalar kind, floats included.
        (a, b) => a.same_ref(b),
    }
}

// =============================================================================
// TESTS
// =============================================================================

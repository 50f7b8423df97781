//! # Sample Graphs
//!
//! Domain classes the demo commands copy: a person with a reading list, a
//! circular chain of cars, and classes with awkward constructors.

use replica_core::{
    ArrayRef, Class, ClassBuilder, Fault, ObjRef, ReplicaError, ScalarKind, Type, Value,
};
use std::sync::Arc;

// =============================================================================
// MAN
// =============================================================================

/// `Man { name, age, favorite_books }`, built through its only constructor.
pub fn man_class() -> Arc<Class> {
    ClassBuilder::new("Man")
        .field("name", Type::Str)
        .field("age", Type::INT)
        .field("favorite_books", Type::array(Type::Str))
        .constructor(
            vec![Type::Str, Type::INT, Type::array(Type::Str)],
            |this, args| {
                this.set("name", args[0].clone())?;
                this.set("age", args[1].clone())?;
                this.set("favorite_books", args[2].clone())
            },
        )
        .build()
}

pub fn sample_man(name: &str, age: i32, books: &[&str]) -> Result<ObjRef, ReplicaError> {
    let books = ArrayRef::from_values(Type::Str, books.iter().map(|b| Value::from(*b)).collect())?;
    let man = man_class().construct(vec![Value::from(name), Value::Int(age), Value::Array(books)])?;
    Ok(man)
}

// =============================================================================
// CAR RING
// =============================================================================

pub fn car_class() -> Arc<Class> {
    ClassBuilder::new("Car")
        .field("id", Type::INT)
        .field("next", Type::class("Car"))
        .constructor(vec![Type::INT, Type::class("Car")], |this, args| {
            this.set("id", args[0].clone())?;
            this.set("next", args[1].clone())
        })
        .build()
}

/// Circular chain of `size` cars, numbered from 0. Returns the head.
pub fn make_ring(size: usize) -> Result<ObjRef, ReplicaError> {
    let car = car_class();
    let head = car.construct(vec![Value::Int(0), Value::Null])?;

    let mut tail = head.clone();
    for id in 1..size {
        let next = car.construct(vec![Value::Int(id as i32), Value::Null])?;
        tail.set("next", next.clone())?;
        tail = next;
    }
    tail.set("next", head.clone())?;
    Ok(head)
}

// =============================================================================
// TRICKY CONSTRUCTORS
// =============================================================================

/// One object with an awkward constructor and what copying it should do.
pub struct TrickySample {
    pub name: &'static str,
    pub expectation: &'static str,
    pub original: ObjRef,
}

/// The constructor edge cases, in a fixed order.
pub fn tricky_samples() -> Result<Vec<TrickySample>, ReplicaError> {
    Ok(vec![
        TrickySample {
            name: "absence fallback",
            expectation: "copied through the canonical constructor",
            original: absence_fallback()?,
        },
        TrickySample {
            name: "required canonical arguments",
            expectation: "copied through the canonical constructor",
            original: required_arguments()?,
        },
        TrickySample {
            name: "non-canonical absence",
            expectation: "fails: no canonical constructor",
            original: non_canonical_absence()?,
        },
        TrickySample {
            name: "general failure",
            expectation: "fails: minimal constructor error",
            original: general_failure()?,
        },
    ])
}

/// No-argument constructor rejects the absent value it would need; the
/// canonical `(Long)` constructor works.
fn absence_fallback() -> Result<ObjRef, ReplicaError> {
    let class = ClassBuilder::new("LazyBox")
        .field("first", Type::boxed(ScalarKind::Long))
        .constructor(vec![], |_, _| Err(Fault::MissingValue("first".into())))
        .constructor(vec![Type::boxed(ScalarKind::Long)], |this, args| {
            this.set("first", args[0].clone())
        })
        .build();
    class.construct(vec![Value::Long(1)]).map_err(ReplicaError::from)
}

/// Single canonical constructor that refuses absent arguments.
fn required_arguments() -> Result<ObjRef, ReplicaError> {
    let stamp = ClassBuilder::new("Stamp")
        .field("millis", Type::LONG)
        .constructor(vec![], |this, _| this.set("millis", 1_700_000_000_000_i64))
        .build();
    let class = ClassBuilder::new("Letter")
        .field("first", Type::Str)
        .field("second", Type::class("Stamp"))
        .constructor(vec![Type::Str, Type::class("Stamp")], |this, args| {
            this.set("first", args[0].require("first")?.clone())?;
            this.set("second", args[1].require("second")?.clone())
        })
        .build();
    let stamp = stamp.instantiate(0, &[])?;
    class
        .construct(vec![Value::from("dvs"), Value::Object(stamp)])
        .map_err(ReplicaError::from)
}

/// Only constructor takes one of two slots and rejects absence.
fn non_canonical_absence() -> Result<ObjRef, ReplicaError> {
    let class = ClassBuilder::new("HalfBuilt")
        .field("first", Type::INT)
        .field("second", Type::Object)
        .constructor(vec![Type::Object], |this, args| {
            let second = args[0].require("second")?;
            this.set("first", 123)?;
            this.set("second", second.clone())
        })
        .build();
    class.construct(vec![Value::from("payload")]).map_err(ReplicaError::from)
}

/// Minimal constructor always fails; the two-argument one works.
fn general_failure() -> Result<ObjRef, ReplicaError> {
    let class = ClassBuilder::new("Grumpy")
        .field("first", Type::INT)
        .constructor(vec![Type::INT], |_, _| {
            Err(Fault::IllegalArgument("intentional error".into()))
        })
        .constructor(vec![Type::INT, Type::INT], |this, _| this.set("first", 123))
        .build();
    class
        .construct(vec![Value::Int(0), Value::Int(0)])
        .map_err(ReplicaError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_closes_on_head() {
        let head = make_ring(3).expect("ring");
        let mut cursor = head.clone();
        for _ in 0..3 {
            cursor = cursor
                .get("next")
                .expect("next")
                .as_object()
                .cloned()
                .expect("linked");
        }
        assert!(cursor.ptr_eq(&head));
    }

    #[test]
    fn man_holds_books() {
        let man = sample_man("Sid", 91, &["dark-blue", "the second"]).expect("man");
        let books = man.get("favorite_books").expect("books");
        assert_eq!(books.as_array().map(ArrayRef::len), Some(2));
    }

    #[test]
    fn tricky_samples_construct() {
        assert_eq!(tricky_samples().expect("samples").len(), 4);
    }
}

//! Error types.
//!
//! - [`Fault`]: raised by constructor bodies and slot access inside the
//!   managed object model.
//! - [`CopyError`]: why one top-level copy failed.
//! - [`ReplicaError`]: what callers see.

use thiserror::Error;

/// An error raised inside the managed object model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// A required value was absent (the null dereference of the model).
    #[error("missing value: {0}")]
    MissingValue(String),

    /// An argument or stored value was rejected.
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// The object was in a state that forbids the operation.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Another fault, with context.
    #[error("{message}")]
    Wrapped {
        message: String,
        #[source]
        cause: Box<Fault>,
    },
}

impl Fault {
    /// Wrap this fault with a context message.
    #[must_use]
    pub fn wrap(self, message: impl Into<String>) -> Fault {
        Fault::Wrapped {
            message: message.into(),
            cause: Box::new(self),
        }
    }

    /// First [`Fault::MissingValue`] along the cause chain, if any.
    #[must_use]
    pub fn absence(&self) -> Option<&Fault> {
        let mut current = self;
        loop {
            match current {
                Fault::MissingValue(_) => return Some(current),
                Fault::Wrapped { cause, .. } => current = &**cause,
                _ => return None,
            }
        }
    }

    /// The innermost fault of the cause chain.
    #[must_use]
    pub fn root_cause(&self) -> &Fault {
        let mut current = self;
        while let Fault::Wrapped { cause, .. } = current {
            current = &**cause;
        }
        current
    }
}

/// Why a top-level copy failed.
#[derive(Debug, Error)]
pub enum CopyError {
    /// A reachable class declares no constructors at all.
    #[error("No constructors found for class: {type_name}")]
    NoConstructors { type_name: String },

    /// Canonical reconstruction needed a constructor matching every slot.
    #[error("No canonical constructor {type_name}{signature}")]
    NoCanonicalConstructor { type_name: String, signature: String },

    /// A constructor faulted with something other than an absent value,
    /// or faulted during canonical reconstruction.
    #[error("Failed instantiation for class: {type_name}")]
    Instantiation {
        type_name: String,
        #[source]
        fault: Fault,
    },

    /// Reading or writing a member slot failed.
    #[error("Cannot access {type_name}.{slot}")]
    SlotAccess {
        type_name: String,
        slot: String,
        #[source]
        fault: Fault,
    },

    /// The node-count ceiling was exceeded.
    #[error("Maximum copy size ({limit}) exceeded. Context: {context}.")]
    SizeLimit { limit: usize, context: String },

    /// A reference cycle came back to a canonical node still being rebuilt.
    #[error("Reference cycle through {type_name} while it is being reconstructed")]
    CanonicalCycle { type_name: String },

    /// The copy does not fit the handle type the caller asked for.
    #[error("Copy produced {found}, expected {expected}")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Errors that can occur in the Replica system.
#[derive(Debug, Error)]
pub enum ReplicaError {
    /// A deep copy failed. Nothing of the partial copy is returned.
    #[error("Unable to make deep copy of {original}")]
    CopyFailed {
        original: String,
        #[source]
        cause: CopyError,
    },

    /// Configuration was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Building or mutating an object outside of a copy failed.
    #[error("Object model error: {0}")]
    Model(#[from] Fault),
}

impl ReplicaError {
    /// The copy failure behind this error, if it is one.
    #[must_use]
    pub fn copy_error(&self) -> Option<&CopyError> {
        match self {
            ReplicaError::CopyFailed { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn absence_is_found_through_wrapping() {
        let fault = Fault::MissingValue("name".into())
            .wrap("constructor failed")
            .wrap("outer");
        assert_eq!(fault.absence(), Some(&Fault::MissingValue("name".into())));
        assert_eq!(fault.root_cause(), &Fault::MissingValue("name".into()));
    }

    #[test]
    fn unrelated_fault_is_not_an_absence() {
        let fault = Fault::IllegalArgument("intentional error".into()).wrap("ctor");
        assert!(fault.absence().is_none());
    }

    #[test]
    fn copy_failure_chains_sources() {
        let err = ReplicaError::CopyFailed {
            original: "Thing@1".into(),
            cause: CopyError::Instantiation {
                type_name: "Thing".into(),
                fault: Fault::IllegalArgument("intentional error".into()).wrap("ctor"),
            },
        };

        assert_eq!(err.to_string(), "Unable to make deep copy of Thing@1");
        let cause = err.source().map(ToString::to_string);
        assert_eq!(cause.as_deref(), Some("Failed instantiation for class: Thing"));
        assert!(matches!(
            err.copy_error(),
            Some(CopyError::Instantiation { .. })
        ));
    }

    #[test]
    fn faults_convert_into_model_errors() {
        let err: ReplicaError = Fault::IllegalState("frozen".into()).into();
        assert_eq!(err.to_string(), "Object model error: illegal state: frozen");
        assert!(err.copy_error().is_none());
    }
}

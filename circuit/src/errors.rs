//! Error types for circuit compilation, witness generation and commitment decoding.
//!
//! None of these carry field values: a failing row or wire is identified by its
//! index or declared name only, so errors are safe to log and to surface.

use field::ParseFieldError;
use thiserror::Error;

/// Errors raised while building or compiling a circuit.
///
/// These are definition errors and are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    /// A constraint references a variable that was never declared.
    #[error("constraint {constraint} references undeclared variable `{name}`")]
    UnresolvedVariable { constraint: usize, name: String },

    /// The same variable name was declared twice.
    #[error("variable `{name}` is declared more than once")]
    DuplicateVariable { name: String },

    /// A non-input wire is not determined by any constraint.
    #[error("wire `{name}` is not determined by any constraint")]
    UndeterminedWire { name: String },

    /// The circuit does not have the number of private inputs its consumer needs.
    #[error("circuit declares {found} private inputs, expected {expected}")]
    InputCount { expected: usize, found: usize },

    /// The circuit declares no public variable, so it commits to nothing.
    #[error("circuit `{circuit}` declares no public variable")]
    NoPublicOutput { circuit: String },
}

/// Errors raised while producing or checking a witness.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum WitnessError {
    /// A compiled row does not hold under the evaluated assignment.
    #[error("constraint row {row} is not satisfied")]
    ConstraintViolation { row: usize },

    /// The number of supplied inputs does not match the circuit.
    #[error("expected {expected} input values, got {got}")]
    InputCount { expected: usize, got: usize },

    /// A full assignment of the wrong length was supplied.
    #[error("expected an assignment of {expected} wires, got {got}")]
    AssignmentLength { expected: usize, got: usize },

    /// A scheduled wire could not be solved because its coefficient vanished.
    #[error("wire {wire} could not be determined")]
    Unsolvable { wire: usize },
}

/// Errors raised when decoding a commitment from its wire format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("empty commitment")]
    Empty,

    #[error("commitment element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: ParseFieldError,
    },

    /// Binary encodings must be a whole number of 32-byte elements.
    #[error("commitment byte length {len} is not a multiple of {element}")]
    ByteLength { len: usize, element: usize },
}

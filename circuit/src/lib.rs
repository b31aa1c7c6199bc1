//! # Commitment Circuits
//!
//! Rank-1 arithmetic circuits over the BN254 scalar field that bind a private
//! secret to a public commitment.
//!
//! ## Pipeline
//!
//! ```text
//! Circuit ──compile──▶ ConstraintSystem            (once, at startup)
//! secret ──generate_witness──▶ Witness ──extract_public──▶ Commitment
//! ```
//!
//! - [`Circuit`] is declarative data: named variables tagged
//!   [`Visibility::Private`] or [`Visibility::Public`], and constraints
//!   `left · right = result` over linear combinations ([`Expr`]).
//! - [`compile`] assigns wires (private first, then public, in declaration
//!   order), lowers every constraint to an `A · B = C` row and derives the
//!   order in which derived wires are solved.
//! - [`generate_witness`] evaluates every wire from the private inputs and
//!   checks every row; a violated row is [`WitnessError::ConstraintViolation`].
//! - [`extract_public`] keeps only the public wires. A [`Commitment`] is the
//!   only value meant to leave the process.
//!
//! ## Example
//!
//! ```
//! use circuit::{compile, define_circuit, extract_public, generate_witness};
//! use field::Fr;
//!
//! let system = compile(&define_circuit()).expect("square circuit compiles");
//! let witness = generate_witness(&system, &[Fr::from(7u64)]).expect("witness");
//! let commitment = extract_public(&witness, &system);
//! assert_eq!(commitment.to_string(), "49");
//! ```
//!
//! ## Bundled relations
//!
//! - [`define_circuit`]: `secret · secret = commitment`
//! - [`quintic_circuit`]: `commitment = (secret + 7)^5` through two
//!   intermediate private wires
//!
//! Both are selectable at runtime through [`CommitmentRelation`].

mod commitment;
mod compiler;
mod definition;
mod errors;
mod relations;
mod witness;


pub use commitment::{extract_public, Commitment};
pub use compiler::{compile, ConstraintRow, ConstraintSystem, LinearCombination, WireInfo};
pub use definition::{Circuit, CircuitBuilder, Constraint, Expr, Variable, Visibility};
pub use errors::{CircuitError, EncodingError, WitnessError};
pub use relations::{
    define_circuit, quintic_circuit, CommitmentRelation, COMMITMENT_WIRE, QUINTIC_ROUND_CONSTANT,
    SECRET_WIRE,
};
pub use witness::{generate_witness, Witness};

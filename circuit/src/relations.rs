//! Commitment relations available to the authentication engine.

use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use field::Fr;
use serde::{Deserialize, Serialize};

use crate::definition::{Circuit, Expr};

/// Name of the private input wire in every bundled relation.
pub const SECRET_WIRE: &str = "secret";

/// Name of the public output wire in every bundled relation.
pub const COMMITMENT_WIRE: &str = "commitment";

/// Additive round constant of the quintic relation.
pub const QUINTIC_ROUND_CONSTANT: u64 = 7;

/// `secret · secret = commitment`.
pub fn define_circuit() -> Circuit {
    Circuit::builder("square")
        .private_input(SECRET_WIRE)
        .public(COMMITMENT_WIRE)
        .constrain(SECRET_WIRE, SECRET_WIRE, COMMITMENT_WIRE)
        .build()
        .expect("square circuit declares distinct variables")
}

/// `commitment = (secret + 7)^5`, one MiMC-style round over three rows.
pub fn quintic_circuit() -> Circuit {
    let shifted =
        || Expr::var(SECRET_WIRE).plus_constant(Fr::from_canonical_u64(QUINTIC_ROUND_CONSTANT));

    Circuit::builder("quintic")
        .private_input(SECRET_WIRE)
        .private("t2")
        .private("t4")
        .public(COMMITMENT_WIRE)
        .constrain(shifted(), shifted(), "t2")
        .constrain("t2", "t2", "t4")
        .constrain("t4", shifted(), COMMITMENT_WIRE)
        .build()
        .expect("quintic circuit declares distinct variables")
}

/// Selector for the bundled relations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentRelation {
    #[default]
    Square,
    Quintic,
}

impl CommitmentRelation {
    pub fn circuit(self) -> Circuit {
        match self {
            CommitmentRelation::Square => define_circuit(),
            CommitmentRelation::Quintic => quintic_circuit(),
        }
    }
}

impl Display for CommitmentRelation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CommitmentRelation::Square => f.write_str("square"),
            CommitmentRelation::Quintic => f.write_str("quintic"),
        }
    }
}

impl FromStr for CommitmentRelation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "square" => Ok(CommitmentRelation::Square),
            "quintic" => Ok(CommitmentRelation::Quintic),
            other => Err(format!("unknown commitment relation `{other}`")),
        }
    }
}

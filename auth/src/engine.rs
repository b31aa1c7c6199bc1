//! The two entry points: enrollment and authentication.

use std::sync::Arc;

use circuit::{
    compile, extract_public, generate_witness, Circuit, CircuitError, Commitment,
    CommitmentRelation, ConstraintSystem, WitnessError,
};
use tracing::info;

use crate::errors::AuthError;
use crate::secret::Secret;
use crate::verify::{verify, VerifyOutcome};

/// Compiled commitment circuit shared by every request.
///
/// Cloning is cheap; clones share one read-only [`ConstraintSystem`].
#[derive(Clone, Debug)]
pub struct CommitmentEngine {
    system: Arc<ConstraintSystem>,
}

impl CommitmentEngine {
    /// Compile `circuit`. It must take exactly one private input and expose
    /// at least one public wire.
    pub fn new(circuit: &Circuit) -> Result<Self, CircuitError> {
        let inputs = circuit.num_inputs();
        if inputs != 1 {
            return Err(CircuitError::InputCount {
                expected: 1,
                found: inputs,
            });
        }

        let system = compile(circuit)?;
        if system.public_wires().is_empty() {
            return Err(CircuitError::NoPublicOutput {
                circuit: circuit.name().to_string(),
            });
        }

        info!(
            circuit = system.name(),
            wires = system.num_wires(),
            rows = system.rows().len(),
            "commitment circuit ready"
        );
        Ok(Self {
            system: Arc::new(system),
        })
    }

    pub fn from_relation(relation: CommitmentRelation) -> Result<Self, CircuitError> {
        Self::new(&relation.circuit())
    }

    pub fn system(&self) -> &ConstraintSystem {
        &self.system
    }

    /// Derive the commitment for `secret`. The witness does not outlive this call.
    pub fn commit(&self, secret: &Secret) -> Result<Commitment, WitnessError> {
        let witness = generate_witness(&self.system, &[secret.value()])?;
        Ok(extract_public(&witness, &self.system))
    }

    /// The commitment to store against a username.
    pub fn enroll(&self, secret: &Secret) -> Result<Commitment, AuthError> {
        Ok(self.commit(secret)?)
    }

    /// Recompute the commitment for `secret` and compare it with `stored`.
    pub fn authenticate(
        &self,
        secret: &Secret,
        stored: &Commitment,
    ) -> Result<VerifyOutcome, AuthError> {
        let candidate = self.commit(secret)?;
        Ok(verify(&candidate, stored))
    }
}

impl Default for CommitmentEngine {
    fn default() -> Self {
        Self::from_relation(CommitmentRelation::Square)
            .expect("square relation is a valid commitment circuit")
    }
}

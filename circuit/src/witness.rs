//! Witness generation: evaluate every wire from the private inputs and check
//! the compiled rows.

use core::fmt::{self, Debug, Formatter};

use field::Fr;

use crate::compiler::ConstraintSystem;
use crate::errors::WitnessError;

/// A full assignment of values to the wires of one constraint system.
///
/// Holds private values; `Debug` prints only the wire count.
#[derive(Clone, PartialEq, Eq)]
pub struct Witness {
    values: Vec<Fr>,
}

impl Witness {
    /// Value of one wire.
    pub fn value(&self, wire: usize) -> Option<Fr> {
        self.values.get(wire).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Validate a caller-supplied assignment against `system`.
    ///
    /// Rejects assignments of the wrong length or that violate any row.
    pub fn from_assignment(system: &ConstraintSystem, values: Vec<Fr>) -> Result<Self, WitnessError> {
        check(system, &values)?;
        Ok(Self { values })
    }
}

impl Debug for Witness {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Witness")
            .field("wires", &self.values.len())
            .finish_non_exhaustive()
    }
}

/// Generate the witness for `inputs`, given in input-declaration order.
///
/// Derived wires are filled by following the compile-time solving schedule,
/// then every row is checked.
pub fn generate_witness(system: &ConstraintSystem, inputs: &[Fr]) -> Result<Witness, WitnessError> {
    let input_wires = system.input_wires();
    if inputs.len() != input_wires.len() {
        return Err(WitnessError::InputCount {
            expected: input_wires.len(),
            got: inputs.len(),
        });
    }

    let mut partial: Vec<Option<Fr>> = vec![None; system.num_wires()];
    for (&wire, &value) in input_wires.iter().zip(inputs) {
        partial[wire] = Some(value);
    }

    for row in system.rows() {
        if let Some(wire) = row.solves {
            let (wire, value) = row.solve(&partial).ok_or(WitnessError::Unsolvable { wire })?;
            partial[wire] = Some(value);
        }
    }

    let values = partial
        .into_iter()
        .enumerate()
        .map(|(wire, value)| value.ok_or(WitnessError::Unsolvable { wire }))
        .collect::<Result<Vec<_>, _>>()?;

    check(system, &values)?;
    Ok(Witness { values })
}

fn check(system: &ConstraintSystem, values: &[Fr]) -> Result<(), WitnessError> {
    match system.first_violation(values)? {
        Some(row) => Err(WitnessError::ConstraintViolation { row }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::relations::{define_circuit, quintic_circuit};

    #[test]
    fn test_square_witness() {
        let system = compile(&define_circuit()).expect("compile");
        let witness = generate_witness(&system, &[Fr::from(7u64)]).expect("witness");
        assert_eq!(witness.len(), 2);
        assert_eq!(witness.value(0), Some(Fr::from(7u64)));
        assert_eq!(witness.value(1), Some(Fr::from(49u64)));
    }

    #[test]
    fn test_quintic_witness() {
        let system = compile(&quintic_circuit()).expect("compile");
        let witness = generate_witness(&system, &[Fr::from(3u64)]).expect("witness");
        let public = system.public_wires().start;
        assert_eq!(witness.value(public), Some(Fr::from(100_000u64)));
    }

    #[test]
    fn test_input_count() {
        let system = compile(&define_circuit()).expect("compile");
        assert_eq!(
            generate_witness(&system, &[]),
            Err(WitnessError::InputCount { expected: 1, got: 0 })
        );
    }

    #[test]
    fn test_inconsistent_assignment_is_rejected() {
        let system = compile(&define_circuit()).expect("compile");
        let bad = vec![Fr::from(7u64), Fr::from(50u64)];
        assert_eq!(
            Witness::from_assignment(&system, bad),
            Err(WitnessError::ConstraintViolation { row: 0 })
        );

        let good = vec![Fr::from(7u64), Fr::from(49u64)];
        assert!(Witness::from_assignment(&system, good).is_ok());

        assert_eq!(
            Witness::from_assignment(&system, vec![Fr::ONE]),
            Err(WitnessError::AssignmentLength { expected: 2, got: 1 })
        );
    }

    #[test]
    fn test_debug_does_not_print_values() {
        let system = compile(&define_circuit()).expect("compile");
        let secret = Fr::from(987_654_321u64);
        let witness = generate_witness(&system, &[secret]).expect("witness");
        let rendered = format!("{:?}", witness);
        assert!(!rendered.contains("987654321"));
        assert!(rendered.contains("wires: 2"));
    }
}

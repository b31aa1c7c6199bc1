//! Compilation of a [`Circuit`] into a wire-indexed constraint system.
//!
//! Wire layout: private wires first, then public wires, each group in
//! declaration order. Consumers of the public projection rely on this layout.

use std::collections::HashMap;
use std::ops::Range;

use field::Fr;
use tracing::debug;

use crate::definition::{Circuit, Expr, Visibility};
use crate::errors::{CircuitError, WitnessError};

/// Linear combination over wire indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinearCombination {
    /// Distinct wires with nonzero coefficients, in first-appearance order.
    pub terms: Vec<(usize, Fr)>,
    pub constant: Fr,
}

impl LinearCombination {
    /// Evaluate against a complete assignment.
    ///
    /// `values` must cover every wire; [`ConstraintSystem::first_violation`]
    /// checks the length before any row is evaluated.
    pub(crate) fn evaluate(&self, values: &[Fr]) -> Fr {
        self.constant
            + self
                .terms
                .iter()
                .map(|&(wire, coeff)| coeff * values[wire])
                .sum::<Fr>()
    }

    /// Evaluate against a partial assignment, `None` if any wire is unset.
    fn evaluate_partial(&self, values: &[Option<Fr>]) -> Option<Fr> {
        let mut acc = self.constant;
        for &(wire, coeff) in &self.terms {
            acc += coeff * values[wire]?;
        }
        Some(acc)
    }

    fn wires(&self) -> impl Iterator<Item = usize> + '_ {
        self.terms.iter().map(|&(wire, _)| wire)
    }
}

/// A compiled `A · B = C` row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintRow {
    pub a: LinearCombination,
    pub b: LinearCombination,
    pub c: LinearCombination,
    /// Wire this row determines during witness generation, if any.
    pub solves: Option<usize>,
}

impl ConstraintRow {
    pub(crate) fn is_satisfied(&self, values: &[Fr]) -> bool {
        self.a.evaluate(values) * self.b.evaluate(values) == self.c.evaluate(values)
    }

    /// Solve `C` for the scheduled wire given every other wire of the row.
    ///
    /// Returns `None` when the row has no scheduled wire, an operand is still
    /// unknown, or the wire's coefficient is zero.
    pub(crate) fn solve(&self, values: &[Option<Fr>]) -> Option<(usize, Fr)> {
        let wire = self.solves?;
        let product = self.a.evaluate_partial(values)? * self.b.evaluate_partial(values)?;

        let mut rest = self.c.constant;
        let mut coeff = Fr::ZERO;
        for &(w, c) in &self.c.terms {
            if w == wire {
                coeff = c;
            } else {
                rest += c * values[w]?;
            }
        }

        let inverse = coeff.try_inverse()?;
        Some((wire, (product - rest) * inverse))
    }
}

/// Metadata for one wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireInfo {
    pub name: String,
    pub visibility: Visibility,
    pub input: bool,
}

/// The compiled, immutable form of a circuit.
///
/// Deterministic in its source circuit and safe to share across threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintSystem {
    name: String,
    wires: Vec<WireInfo>,
    rows: Vec<ConstraintRow>,
    index: HashMap<String, usize>,
    inputs: Vec<usize>,
    num_private: usize,
}

impl ConstraintSystem {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[ConstraintRow] {
        &self.rows
    }

    pub fn wires(&self) -> &[WireInfo] {
        &self.wires
    }

    pub fn num_wires(&self) -> usize {
        self.wires.len()
    }

    pub fn wire_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Input wires in declaration order.
    pub fn input_wires(&self) -> &[usize] {
        &self.inputs
    }

    /// Public wires occupy the tail of the wire vector.
    pub fn public_wires(&self) -> Range<usize> {
        self.num_private..self.wires.len()
    }

    /// Index of the first row that does not hold, if any.
    ///
    /// Fails with [`WitnessError::AssignmentLength`] unless `values` holds
    /// exactly one value per wire.
    pub fn first_violation(&self, values: &[Fr]) -> Result<Option<usize>, WitnessError> {
        if values.len() != self.wires.len() {
            return Err(WitnessError::AssignmentLength {
                expected: self.wires.len(),
                got: values.len(),
            });
        }
        Ok(self.rows.iter().position(|row| !row.is_satisfied(values)))
    }
}

/// Compile a circuit into its constraint system.
///
/// Fails with [`CircuitError::UnresolvedVariable`] if a constraint names an
/// undeclared variable, and with [`CircuitError::UndeterminedWire`] if a
/// derived wire cannot be computed from the inputs by walking rows in order.
pub fn compile(circuit: &Circuit) -> Result<ConstraintSystem, CircuitError> {
    let (private, public): (Vec<_>, Vec<_>) = circuit
        .variables()
        .iter()
        .partition(|v| v.visibility == Visibility::Private);
    let num_private = private.len();

    let wires: Vec<WireInfo> = private
        .into_iter()
        .chain(public)
        .map(|v| WireInfo {
            name: v.name.clone(),
            visibility: v.visibility,
            input: v.input,
        })
        .collect();

    let index: HashMap<String, usize> = wires
        .iter()
        .enumerate()
        .map(|(i, wire)| (wire.name.clone(), i))
        .collect();

    // Inputs keep declaration order, not wire order.
    let inputs = circuit
        .variables()
        .iter()
        .filter(|v| v.input)
        .map(|v| index[&v.name])
        .collect();

    let mut rows = Vec::with_capacity(circuit.constraints().len());
    for (i, constraint) in circuit.constraints().iter().enumerate() {
        rows.push(ConstraintRow {
            a: lower(&constraint.left, &index, i)?,
            b: lower(&constraint.right, &index, i)?,
            c: lower(&constraint.result, &index, i)?,
            solves: None,
        });
    }

    schedule(&mut rows, &wires)?;

    debug!(
        circuit = circuit.name(),
        wires = wires.len(),
        public = wires.len() - num_private,
        rows = rows.len(),
        "compiled circuit"
    );

    Ok(ConstraintSystem {
        name: circuit.name().to_string(),
        wires,
        rows,
        index,
        inputs,
        num_private,
    })
}

fn lower(
    expr: &Expr,
    index: &HashMap<String, usize>,
    constraint: usize,
) -> Result<LinearCombination, CircuitError> {
    let mut terms: Vec<(usize, Fr)> = Vec::with_capacity(expr.terms.len());
    for (coeff, name) in &expr.terms {
        let wire = *index
            .get(name)
            .ok_or_else(|| CircuitError::UnresolvedVariable {
                constraint,
                name: name.clone(),
            })?;
        match terms.iter_mut().find(|(w, _)| *w == wire) {
            Some((_, existing)) => *existing += *coeff,
            None => terms.push((wire, *coeff)),
        }
    }
    terms.retain(|(_, coeff)| !coeff.is_zero());

    Ok(LinearCombination {
        terms,
        constant: expr.constant,
    })
}

/// Walk rows in order and mark, for each, the single unknown wire in `C` it
/// determines once `A` and `B` are known.
fn schedule(rows: &mut [ConstraintRow], wires: &[WireInfo]) -> Result<(), CircuitError> {
    let mut known: Vec<bool> = wires.iter().map(|w| w.input).collect();

    for row in rows.iter_mut() {
        let operands_known = row.a.wires().chain(row.b.wires()).all(|w| known[w]);
        if !operands_known {
            continue;
        }

        let mut unknown = row.c.wires().filter(|&w| !known[w]);
        if let (Some(wire), None) = (unknown.next(), unknown.next()) {
            row.solves = Some(wire);
            known[wire] = true;
        }
    }

    match known.iter().position(|k| !k) {
        Some(wire) => Err(CircuitError::UndeterminedWire {
            name: wires[wire].name.clone(),
        }),
        None => Ok(()),
    }
}

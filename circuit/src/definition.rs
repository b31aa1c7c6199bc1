//! Declarative circuit definitions.
//!
//! A [`Circuit`] is plain data: a list of named variables tagged with their
//! visibility, and an ordered list of rank-1 constraints
//! `left · right = result` whose sides are linear combinations of those
//! variables. Nothing here is evaluated; the compiler assigns wires and the
//! witness generator evaluates.

use std::collections::HashSet;

use field::Fr;

use crate::errors::CircuitError;

/// Whether a variable's value may leave the prover.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Private,
    Public,
}

/// A declared circuit variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub visibility: Visibility,
    /// Inputs are supplied by the caller; every other wire is derived.
    pub input: bool,
}

/// Linear combination `Σ cᵢ·varᵢ + k` over named variables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expr {
    pub terms: Vec<(Fr, String)>,
    pub constant: Fr,
}

impl Expr {
    /// A single variable with coefficient one.
    pub fn var(name: impl Into<String>) -> Self {
        Self::scaled(Fr::ONE, name)
    }

    pub fn scaled(coeff: Fr, name: impl Into<String>) -> Self {
        Self {
            terms: vec![(coeff, name.into())],
            constant: Fr::ZERO,
        }
    }

    pub fn constant(value: Fr) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    /// Append `coeff · name`.
    pub fn plus_term(mut self, coeff: Fr, name: impl Into<String>) -> Self {
        self.terms.push((coeff, name.into()));
        self
    }

    pub fn plus_constant(mut self, value: Fr) -> Self {
        self.constant += value;
        self
    }

    /// Names referenced by this expression, in order of appearance.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|(_, name)| name.as_str())
    }
}

impl From<&str> for Expr {
    fn from(name: &str) -> Self {
        Expr::var(name)
    }
}

impl From<Fr> for Expr {
    fn from(value: Fr) -> Self {
        Expr::constant(value)
    }
}

/// One rank-1 relation: `left · right = result`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub left: Expr,
    pub right: Expr,
    pub result: Expr,
}

/// An immutable relation between private and public variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circuit {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
}

impl Circuit {
    pub fn builder(name: impl Into<String>) -> CircuitBuilder {
        CircuitBuilder {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variables in declaration order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of caller-supplied inputs.
    pub fn num_inputs(&self) -> usize {
        self.variables.iter().filter(|v| v.input).count()
    }
}

/// Incremental construction of a [`Circuit`].
///
/// The builder only rejects duplicate declarations; references to undeclared
/// variables are reported by the compiler.
#[derive(Clone, Debug)]
pub struct CircuitBuilder {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
}

impl CircuitBuilder {
    /// Declare a private variable supplied by the caller.
    pub fn private_input(self, name: impl Into<String>) -> Self {
        self.declare(name, Visibility::Private, true)
    }

    /// Declare a private intermediate wire.
    pub fn private(self, name: impl Into<String>) -> Self {
        self.declare(name, Visibility::Private, false)
    }

    /// Declare a public wire; it is part of the commitment.
    pub fn public(self, name: impl Into<String>) -> Self {
        self.declare(name, Visibility::Public, false)
    }

    /// Add `left · right = result`.
    pub fn constrain(
        mut self,
        left: impl Into<Expr>,
        right: impl Into<Expr>,
        result: impl Into<Expr>,
    ) -> Self {
        self.constraints.push(Constraint {
            left: left.into(),
            right: right.into(),
            result: result.into(),
        });
        self
    }

    pub fn build(self) -> Result<Circuit, CircuitError> {
        let mut seen = HashSet::with_capacity(self.variables.len());
        for variable in &self.variables {
            if !seen.insert(variable.name.as_str()) {
                return Err(CircuitError::DuplicateVariable {
                    name: variable.name.clone(),
                });
            }
        }

        Ok(Circuit {
            name: self.name,
            variables: self.variables,
            constraints: self.constraints,
        })
    }

    fn declare(mut self, name: impl Into<String>, visibility: Visibility, input: bool) -> Self {
        self.variables.push(Variable {
            name: name.into(),
            visibility,
            input,
        });
        self
    }
}

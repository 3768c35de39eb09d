//! Formulation State

use std::fmt;

use good_lp::{Expression, ProblemVariables, Variable, variable};

/// Relation operator for a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintRelation {
    /// Equality (`lhs == rhs`)
    Eq,

    /// Less than or equal (`lhs <= rhs`)
    Leq,

    /// Greater than or equal (`lhs >= rhs`)
    Geq,
}

impl ConstraintRelation {
    /// Operator symbol, for logs and rendering.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Leq => "<=",
            Self::Geq => ">=",
        }
    }
}

/// Which family a constraint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Exact demand for one good
    Demand,

    /// Forces a vendor's buy-flag on when anything is bought from it
    BuyFlagLinkage,

    /// Minimum spend at a vendor that is bought from
    MinimumSpend,
}

/// Recorded linear constraint emitted during model construction.
#[derive(Debug, Clone)]
pub(crate) struct RecordedConstraint {
    /// Constraint family
    pub(crate) kind: ConstraintKind,

    /// Good or vendor the constraint is about
    pub(crate) label: String,

    /// Left-hand side expression
    pub(crate) lhs: Expression,

    /// Relation operator
    pub(crate) relation: ConstraintRelation,

    /// Right-hand side scalar
    pub(crate) rhs: f64,
}

/// Integer variable and the bounds it was declared with.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BoundedVariable {
    pub(crate) var: Variable,
    pub(crate) lower: f64,
    pub(crate) upper: f64,
}

/// Builder state for the allocation MILP.
///
/// Everything added to the model is also recorded here so the solved assignment can be
/// re-checked against the exact same constraints afterwards.
pub(crate) struct FormulationState {
    pb: ProblemVariables,
    cost: Expression,
    variables: Vec<BoundedVariable>,
    constraints: Vec<RecordedConstraint>,
}

impl fmt::Debug for FormulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulationState")
            .field("pb", &"<ProblemVariables>")
            .field("cost", &"<Expression>")
            .field(
                "variables",
                &format!("[{} variables]", self.variables.len()),
            )
            .field(
                "constraints",
                &format!("[{} constraints]", self.constraints.len()),
            )
            .finish()
    }
}

impl FormulationState {
    pub(crate) fn new() -> Self {
        Self {
            pb: ProblemVariables::new(),
            cost: Expression::default(),
            variables: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Declare an integer variable bounded to `[0, upper]`.
    pub(crate) fn add_integer(&mut self, upper: f64) -> Variable {
        let var = self.pb.add(variable().integer().min(0).max(upper));

        self.variables.push(BoundedVariable {
            var,
            lower: 0.0,
            upper,
        });

        var
    }

    /// Declare a binary variable.
    pub(crate) fn add_binary(&mut self) -> Variable {
        let var = self.pb.add(variable().binary());

        self.variables.push(BoundedVariable {
            var,
            lower: 0.0,
            upper: 1.0,
        });

        var
    }

    /// Add a term to the minimisation objective.
    pub(crate) fn add_to_objective(&mut self, var: Variable, coefficient: f64) {
        self.cost += var * coefficient;
    }

    /// Record a constraint to be applied to the model.
    pub(crate) fn add_constraint(
        &mut self,
        kind: ConstraintKind,
        label: String,
        lhs: Expression,
        relation: ConstraintRelation,
        rhs: f64,
    ) {
        self.constraints.push(RecordedConstraint {
            kind,
            label,
            lhs,
            relation,
            rhs,
        });
    }

    pub(crate) fn constraints(&self) -> &[RecordedConstraint] {
        &self.constraints
    }

    /// Extract the problem variables, objective, declared variables and recorded constraints.
    pub(crate) fn into_parts(
        self,
    ) -> (
        ProblemVariables,
        Expression,
        Vec<BoundedVariable>,
        Vec<RecordedConstraint>,
    ) {
        (self.pb, self.cost, self.variables, self.constraints)
    }
}

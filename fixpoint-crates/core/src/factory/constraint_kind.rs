use enum_map::Enum;
use enumset::EnumSetType;

/// The closed set of constraint kinds the engine has propagators for.
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Debug, Hash, Enum, EnumSetType)]
pub enum ConstraintKind {
    /// Implication `x => y` or equivalence `x <=> y` over binaries.
    Logic,
    /// `lhs <= x + c * y <= rhs`.
    VariableBound,
    /// Bounds on the number of binaries which are 1.
    Cardinality,
    /// Non-negative weights over non-negative bounded variables.
    Knapsack,
    /// Any linear row.
    Linear,
    /// Lexicographic ordering `x <=_lex y` of two sequences.
    Lexicographic,
}

impl ConstraintKind {
    /// The order in which the kinds are tried when classifying a row; lower goes first. Kinds
    /// without a priority are only built on request.
    pub fn priority(self) -> Option<u32> {
        match self {
            ConstraintKind::Logic => Some(10),
            ConstraintKind::VariableBound => Some(20),
            ConstraintKind::Cardinality => Some(1000),
            ConstraintKind::Knapsack => Some(2000),
            ConstraintKind::Linear => Some(10000),
            ConstraintKind::Lexicographic => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ConstraintKind::Logic => "logic",
            ConstraintKind::VariableBound => "variable_bound",
            ConstraintKind::Cardinality => "cardinality",
            ConstraintKind::Knapsack => "knapsack",
            ConstraintKind::Linear => "linear",
            ConstraintKind::Lexicographic => "lexicographic",
        }
    }
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

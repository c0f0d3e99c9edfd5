use enumset::EnumSet;

use crate::create_statistics_struct;
use crate::factory::ConstraintKind;

/// Options of the [`PropagatorFactory`](super::PropagatorFactory).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FactoryOptions {
    /// Whether rows with a badly scaled coefficient range are dropped instead of propagated. Only
    /// rows without an explicit kind are filtered.
    pub filter_constraints: bool,
    /// The dynamism above which a row over continuous or fixed variables is dropped.
    pub continuous_dynamism_limit: f64,
    /// The dynamism above which any row is dropped.
    pub dynamism_limit: f64,
    /// The kinds tried when classifying a row. Explicitly requested kinds are always built.
    pub enabled_kinds: EnumSet<ConstraintKind>,
}

impl Default for FactoryOptions {
    fn default() -> Self {
        FactoryOptions {
            filter_constraints: true,
            continuous_dynamism_limit: 10.0,
            dynamism_limit: 1000.0,
            enabled_kinds: EnumSet::all(),
        }
    }
}

create_statistics_struct!(
    /// How the rows handed to the [`PropagatorFactory`](super::PropagatorFactory) were handled.
    FactoryStatistics {
        num_rows: u64,
        /// Rows dropped because of their dynamism.
        num_filtered: u64,
        num_logic: u64,
        num_variable_bound: u64,
        num_cardinality: u64,
        num_knapsack: u64,
        num_linear: u64,
        num_lexicographic: u64,
});

impl FactoryStatistics {
    pub(crate) fn record(&mut self, kind: ConstraintKind) {
        let counter = match kind {
            ConstraintKind::Logic => &mut self.num_logic,
            ConstraintKind::VariableBound => &mut self.num_variable_bound,
            ConstraintKind::Cardinality => &mut self.num_cardinality,
            ConstraintKind::Knapsack => &mut self.num_knapsack,
            ConstraintKind::Linear => &mut self.num_linear,
            ConstraintKind::Lexicographic => &mut self.num_lexicographic,
        };
        *counter += 1;
    }

    /// The number of rows built as `kind`.
    pub fn num_of_kind(&self, kind: ConstraintKind) -> u64 {
        match kind {
            ConstraintKind::Logic => self.num_logic,
            ConstraintKind::VariableBound => self.num_variable_bound,
            ConstraintKind::Cardinality => self.num_cardinality,
            ConstraintKind::Knapsack => self.num_knapsack,
            ConstraintKind::Linear => self.num_linear,
            ConstraintKind::Lexicographic => self.num_lexicographic,
        }
    }
}

use itertools::Itertools;
use log::debug;

use crate::basic_types::InvalidConstraintDescription;
use crate::engine::PropagationEngine;
use crate::engine::VariableId;
use crate::engine::VariableType;
use crate::factory::ConstraintDescription;
use crate::factory::ConstraintKind;
use crate::factory::FactoryOptions;
use crate::factory::FactoryStatistics;
use crate::math::tolerance::ceil_eps;
use crate::math::tolerance::floor_eps;
use crate::math::tolerance::is_equal;
use crate::math::tolerance::is_greater;
use crate::math::tolerance::normalise_bound;
use crate::propagation::Domains;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorId;
use crate::propagation::ReadDomains;
use crate::propagators::CardinalityPropagatorArgs;
use crate::propagators::KnapsackPropagatorArgs;
use crate::propagators::LexicographicPropagatorArgs;
use crate::propagators::LinearPropagatorArgs;
use crate::propagators::LogicPropagatorArgs;
use crate::propagators::LogicRelation;
use crate::propagators::VariableBoundPropagatorArgs;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// Turns [`ConstraintDescription`]s into propagators of an engine.
///
/// A description with an explicit kind is built as that kind or rejected. A description without
/// a kind is classified: the enabled kinds are tried in ascending
/// [priority](ConstraintKind::priority) and the first one that accepts the row builds its
/// propagator. Linear accepts every row, so classification only fails when it is disabled.
#[derive(Clone, Debug, Default)]
pub struct PropagatorFactory {
    options: FactoryOptions,
    statistics: FactoryStatistics,
}

/// A validated description, ready to be handed to the engine.
#[derive(Clone, Debug)]
enum Recipe {
    Logic(LogicPropagatorArgs),
    VariableBound(VariableBoundPropagatorArgs),
    Cardinality(CardinalityPropagatorArgs),
    Knapsack(KnapsackPropagatorArgs),
    Linear(LinearPropagatorArgs),
    Lexicographic(LexicographicPropagatorArgs),
}

type Analysis = Result<Recipe, &'static str>;

impl PropagatorFactory {
    pub fn new(options: FactoryOptions) -> Self {
        PropagatorFactory {
            options,
            statistics: FactoryStatistics::default(),
        }
    }

    pub fn options(&self) -> &FactoryOptions {
        &self.options
    }

    pub fn statistics(&self) -> &FactoryStatistics {
        &self.statistics
    }

    /// Adds the propagator for `description` to `engine`.
    ///
    /// Returns `None` if the row was dropped by the dynamism filter. The propagator is enqueued
    /// but not run.
    pub fn install(
        &mut self,
        engine: &mut PropagationEngine,
        description: &ConstraintDescription,
    ) -> Result<Option<PropagatorId>, InvalidConstraintDescription> {
        self.statistics.num_rows += 1;

        let recipe = {
            let domains = engine.current_domains();
            validate_scope(domains, description)?;

            match description.kind {
                Some(kind) => analyze(kind, domains, description).map_err(|reason| {
                    InvalidConstraintDescription::Unsupported {
                        name: description.name.clone(),
                        kind,
                        reason,
                    }
                })?,
                None => {
                    if self.options.filter_constraints && self.is_badly_scaled(domains, description)
                    {
                        debug!(
                            "constraint '{}' filtered out with dynamism {:?}",
                            description.name,
                            description.dynamism()
                        );
                        self.statistics.num_filtered += 1;
                        return Ok(None);
                    }
                    self.classify(domains, description)?
                }
            }
        };

        let kind = recipe.kind();
        let propagator_id = recipe.install(engine, description.name.clone())?;
        debug!("constraint '{}' built as {kind}", description.name);
        self.statistics.record(kind);

        Ok(Some(propagator_id))
    }

    pub fn log_statistics(&self) {
        if should_log_statistics() {
            self.statistics.log(StatisticLogger::new("factory"));
        }
    }

    fn classify(
        &self,
        domains: Domains<'_>,
        description: &ConstraintDescription,
    ) -> Result<Recipe, InvalidConstraintDescription> {
        self.options
            .enabled_kinds
            .iter()
            .filter_map(|kind| kind.priority().map(|priority| (priority, kind)))
            .sorted_by_key(|(priority, _)| *priority)
            .find_map(|(_, kind)| analyze(kind, domains, description).ok())
            .ok_or_else(|| InvalidConstraintDescription::Unclassified {
                name: description.name.clone(),
            })
    }

    fn is_badly_scaled(&self, domains: Domains<'_>, description: &ConstraintDescription) -> bool {
        let Some(dynamism) = description.dynamism() else {
            return false;
        };

        let all_continuous_or_fixed = description.non_zero_terms().all(|(variable, _)| {
            domains.variable_type(variable) == VariableType::Continuous
                || domains.is_fixed(variable)
        });

        (all_continuous_or_fixed && is_greater(dynamism, self.options.continuous_dynamism_limit))
            || is_greater(dynamism, self.options.dynamism_limit)
    }
}

impl Recipe {
    fn kind(&self) -> ConstraintKind {
        match self {
            Recipe::Logic(_) => ConstraintKind::Logic,
            Recipe::VariableBound(_) => ConstraintKind::VariableBound,
            Recipe::Cardinality(_) => ConstraintKind::Cardinality,
            Recipe::Knapsack(_) => ConstraintKind::Knapsack,
            Recipe::Linear(_) => ConstraintKind::Linear,
            Recipe::Lexicographic(_) => ConstraintKind::Lexicographic,
        }
    }

    fn install(
        self,
        engine: &mut PropagationEngine,
        name: String,
    ) -> Result<PropagatorId, InvalidConstraintDescription> {
        match self {
            Recipe::Logic(args) => add_to(engine, name, args),
            Recipe::VariableBound(args) => add_to(engine, name, args),
            Recipe::Cardinality(args) => add_to(engine, name, args),
            Recipe::Knapsack(args) => add_to(engine, name, args),
            Recipe::Linear(args) => add_to(engine, name, args),
            Recipe::Lexicographic(args) => add_to(engine, name, args),
        }
    }
}

fn add_to<Constructor: PropagatorConstructor>(
    engine: &mut PropagationEngine,
    name: String,
    constructor: Constructor,
) -> Result<PropagatorId, InvalidConstraintDescription>
where
    Constructor::PropagatorImpl: 'static,
{
    engine
        .add_named_propagator(name, constructor)
        .map(|handle| handle.untyped())
}

/// Checks what every analysis relies on: known variables and, for rows, one coefficient per
/// variable.
fn validate_scope(
    domains: Domains<'_>,
    description: &ConstraintDescription,
) -> Result<(), InvalidConstraintDescription> {
    if let Some(&variable) = description
        .variables
        .iter()
        .find(|&&variable| !domains.contains_variable(variable))
    {
        return Err(InvalidConstraintDescription::UnknownVariable {
            name: description.name.clone(),
            variable,
        });
    }

    if description.kind != Some(ConstraintKind::Lexicographic)
        && description.variables.len() != description.coefficients.len()
    {
        return Err(InvalidConstraintDescription::LengthMismatch {
            name: description.name.clone(),
            variables: description.variables.len(),
            coefficients: description.coefficients.len(),
        });
    }

    Ok(())
}

fn analyze(
    kind: ConstraintKind,
    domains: Domains<'_>,
    description: &ConstraintDescription,
) -> Analysis {
    match kind {
        ConstraintKind::Logic => analyze_logic(domains, description),
        ConstraintKind::VariableBound => analyze_variable_bound(domains, description),
        ConstraintKind::Cardinality => analyze_cardinality(domains, description),
        ConstraintKind::Knapsack => analyze_knapsack(domains, description),
        ConstraintKind::Linear => Ok(Recipe::Linear(LinearPropagatorArgs {
            variables: description.variables.as_slice().into(),
            coefficients: description.coefficients.as_slice().into(),
            lhs: description.lhs,
            rhs: description.rhs,
        })),
        ConstraintKind::Lexicographic => analyze_lexicographic(description),
    }
}

fn two_terms(description: &ConstraintDescription) -> Result<[(VariableId, f64); 2], &'static str> {
    let terms = description.non_zero_terms().collect::<Vec<_>>();
    match terms.as_slice() {
        &[first, second] => Ok([first, second]),
        _ => Err("the row must have exactly two variables"),
    }
}

/// `a - c <= 0` is the implication `a -> c`, `a - c >= 0` is `c -> a` and `a - c = 0` is the
/// equivalence.
fn analyze_logic(domains: Domains<'_>, description: &ConstraintDescription) -> Analysis {
    let [first, second] = two_terms(description)?;
    if !domains.is_binary(first.0) || !domains.is_binary(second.0) {
        return Err("both variables must be binary");
    }

    let (positive, negative) = if is_equal(first.1, 1.0) && is_equal(second.1, -1.0) {
        (first.0, second.0)
    } else if is_equal(first.1, -1.0) && is_equal(second.1, 1.0) {
        (second.0, first.0)
    } else {
        return Err("the coefficients must be 1 and -1");
    };

    let lhs = normalise_bound(description.lhs);
    let rhs = normalise_bound(description.rhs);
    let (antecedent, consequent, relation) = if lhs.is_infinite() && is_equal(rhs, 0.0) {
        (positive, negative, LogicRelation::Implication)
    } else if is_equal(lhs, 0.0) && rhs.is_infinite() {
        (negative, positive, LogicRelation::Implication)
    } else if is_equal(lhs, 0.0) && is_equal(rhs, 0.0) {
        (positive, negative, LogicRelation::Equivalence)
    } else {
        return Err("the sides must be 0 on the bounded side");
    };

    Ok(Recipe::Logic(LogicPropagatorArgs {
        antecedent,
        consequent,
        relation,
    }))
}

/// The bounded variable is the non-binary one, or the continuous one next to an integer.
fn analyze_variable_bound(domains: Domains<'_>, description: &ConstraintDescription) -> Analysis {
    let [first, second] = two_terms(description)?;
    let first_type = domains.variable_type(first.0);
    let second_type = domains.variable_type(second.0);

    let num_binary = [first_type, second_type]
        .iter()
        .filter(|&&variable_type| variable_type == VariableType::Binary)
        .count();
    let num_continuous = [first_type, second_type]
        .iter()
        .filter(|&&variable_type| variable_type == VariableType::Continuous)
        .count();
    if num_binary == 2 || num_continuous == 2 {
        return Err("the variables must not both be binary or both be continuous");
    }

    let second_is_bounded = if num_binary == 1 {
        first_type == VariableType::Binary
    } else {
        first_type == VariableType::Integer
    };
    let (x, y) = if second_is_bounded {
        (second, first)
    } else {
        (first, second)
    };

    let lhs = normalise_bound(description.lhs) / x.1;
    let rhs = normalise_bound(description.rhs) / x.1;
    let (lhs, rhs) = if x.1 > 0.0 { (lhs, rhs) } else { (rhs, lhs) };

    Ok(Recipe::VariableBound(VariableBoundPropagatorArgs {
        x: x.0,
        y: y.0,
        coefficient: y.1 / x.1,
        lhs,
        rhs,
    }))
}

fn analyze_cardinality(domains: Domains<'_>, description: &ConstraintDescription) -> Analysis {
    let variables = description
        .non_zero_terms()
        .map(|(variable, coefficient)| {
            if domains.is_binary(variable) && is_equal(coefficient, 1.0) {
                Ok(variable)
            } else {
                Err("every variable must be binary with coefficient 1")
            }
        })
        .collect::<Result<Box<[_]>, _>>()?;
    if variables.is_empty() {
        return Err("the row has no variables");
    }

    let lhs = normalise_bound(description.lhs);
    let rhs = normalise_bound(description.rhs);
    let min_count = if lhs.is_finite() { ceil_eps(lhs).max(0.0) } else { 0.0 };
    let max_count = if rhs.is_finite() {
        floor_eps(rhs).min(variables.len() as f64)
    } else {
        variables.len() as f64
    };
    if max_count < 0.0 || min_count > max_count {
        return Err("no count lies between the sides");
    }

    Ok(Recipe::Cardinality(CardinalityPropagatorArgs {
        variables,
        min_count: min_count as u32,
        max_count: max_count as u32,
    }))
}

fn analyze_knapsack(domains: Domains<'_>, description: &ConstraintDescription) -> Analysis {
    let (variables, weights): (Vec<_>, Vec<_>) = description.non_zero_terms().unzip();
    if variables.is_empty() {
        return Err("the row has no variables");
    }
    if weights.iter().any(|&weight| weight < 0.0) {
        return Err("weights must be non-negative");
    }
    if variables.iter().any(|&variable| {
        domains.lower_bound(variable) < 0.0 || !domains.upper_bound(variable).is_finite()
    }) {
        return Err("variables must be non-negative and bounded");
    }

    Ok(Recipe::Knapsack(KnapsackPropagatorArgs {
        variables: variables.into(),
        weights: weights.into(),
        demand: description.lhs,
        capacity: description.rhs,
    }))
}

fn analyze_lexicographic(description: &ConstraintDescription) -> Analysis {
    if description.variables.len() % 2 != 0 {
        return Err("the scope must consist of two sequences of equal length");
    }

    let (x, y) = description.variables.split_at(description.variables.len() / 2);
    Ok(Recipe::Lexicographic(LexicographicPropagatorArgs {
        x: x.into(),
        y: y.into(),
    }))
}

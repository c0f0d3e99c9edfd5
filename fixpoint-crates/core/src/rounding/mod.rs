//! Rounding a fractional point while propagating each rounding decision.
//!
//! The integral variables are rounded one at a time. Every rounded value is imposed on the engine
//! as a fixing decision, so that the variables it forces are fixed to consistent values before
//! their own turn comes.
use itertools::Itertools;
use log::debug;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

use crate::create_statistics_struct;
use crate::engine::Conflict;
use crate::engine::DecisionBound;
use crate::engine::Domain;
use crate::engine::PropagationEngine;
use crate::engine::VariableId;
use crate::engine::VariableType;
use crate::fixpoint_assert_simple;
use crate::propagation::ReadDomains;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The order in which the integral variables are rounded.
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VariableRanking {
    /// Nearly integral values first; ties are broken by index.
    #[default]
    Fractionality,
    Index,
}

/// The fractional part from which a value is rounded up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ThresholdPolicy {
    Fixed(f64),
    /// A threshold drawn uniformly from `[0.3, 0.7)` for every rounded point.
    Random,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundingOptions {
    pub threshold: ThresholdPolicy,
    pub ranking: VariableRanking,
    /// Whether general integer variables are rounded with propagation as well; otherwise only
    /// binaries are, and general integers keep their input value unless propagation fixes them.
    pub round_general_integers: bool,
    pub seed: u64,
}

impl Default for RoundingOptions {
    fn default() -> Self {
        RoundingOptions {
            threshold: ThresholdPolicy::Fixed(0.5),
            ranking: VariableRanking::default(),
            round_general_integers: true,
            seed: 42,
        }
    }
}

/// The outcome of [`PropagationRounding::round`].
#[derive(Clone, Debug, PartialEq)]
pub struct RoundingResult {
    /// The rounded point, one value per variable.
    pub values: Vec<f64>,
    /// The first conflict met. The variables ranked after it were rounded without propagation.
    pub conflict: Option<Conflict>,
    /// The number of variables whose value was determined by propagation instead of rounding.
    pub num_fixed_by_propagation: usize,
}

create_statistics_struct!(RoundingStatistics {
    num_points: u64,
    num_conflicts: u64,
    num_fixed_by_propagation: u64,
});

/// Rounds fractional points against a [`PropagationEngine`].
#[derive(Clone, Debug)]
pub struct PropagationRounding {
    options: RoundingOptions,
    random_generator: SmallRng,
    statistics: RoundingStatistics,
}

impl Default for PropagationRounding {
    fn default() -> Self {
        PropagationRounding::new(RoundingOptions::default())
    }
}

impl PropagationRounding {
    pub fn new(options: RoundingOptions) -> Self {
        PropagationRounding {
            options,
            random_generator: SmallRng::seed_from_u64(options.seed),
            statistics: RoundingStatistics::default(),
        }
    }

    pub fn statistics(&self) -> &RoundingStatistics {
        &self.statistics
    }

    /// Rounds `point`, which holds one value per variable of `engine`.
    ///
    /// The engine is reset to its root first and is left in the state reached by the last
    /// decision. Continuous variables keep their value.
    pub fn round(&mut self, engine: &mut PropagationEngine, point: &[f64]) -> RoundingResult {
        fixpoint_assert_simple!(
            point.len() == engine.num_variables(),
            "the point has one value per variable"
        );
        self.statistics.num_points += 1;

        engine.reset();
        let threshold = self.threshold();
        let mut values = point.to_vec();
        let mut conflict = None;
        let mut num_fixed_by_propagation = 0;

        for variable in self.ranked_variables(engine, point) {
            let index = variable.index();

            if conflict.is_some() {
                values[index] = round_with_threshold(point[index], threshold);
                continue;
            }

            let domains = engine.current_domains();
            if let Some(value) = domains.fixed_value(variable) {
                values[index] = value;
                continue;
            }

            let value = round_into_domain(domains.domain(variable), point[index], threshold);
            values[index] = value;

            match engine.apply_decision(variable, DecisionBound::Fix(value)) {
                Ok(()) => {
                    let domains = engine.current_domains();
                    for &fixed in engine.last_fixed() {
                        values[fixed.index()] = domains.lower_bound(fixed);
                        num_fixed_by_propagation += 1;
                    }
                }
                Err(found) => {
                    debug!("rounding {variable} to {value} led to {found:?}");
                    conflict = Some(found);
                }
            }
        }

        self.statistics.num_fixed_by_propagation += num_fixed_by_propagation as u64;
        if conflict.is_some() {
            self.statistics.num_conflicts += 1;
        }

        RoundingResult {
            values,
            conflict,
            num_fixed_by_propagation,
        }
    }

    pub fn log_statistics(&self) {
        if should_log_statistics() {
            self.statistics.log(StatisticLogger::new("rounding"));
        }
    }

    fn threshold(&mut self) -> f64 {
        match self.options.threshold {
            ThresholdPolicy::Fixed(threshold) => threshold,
            ThresholdPolicy::Random => self.random_generator.gen_range(0.3..0.7),
        }
    }

    fn ranked_variables(&self, engine: &PropagationEngine, point: &[f64]) -> Vec<VariableId> {
        let domains = engine.current_domains();
        let candidates = domains.variables().filter(|&variable| {
            match domains.variable_type(variable) {
                VariableType::Binary => true,
                VariableType::Integer => self.options.round_general_integers,
                VariableType::Continuous => false,
            }
        });

        match self.options.ranking {
            VariableRanking::Index => candidates.collect(),
            VariableRanking::Fractionality => candidates
                .sorted_by(|&lhs, &rhs| {
                    fractionality(point[lhs.index()])
                        .total_cmp(&fractionality(point[rhs.index()]))
                        .then(lhs.cmp(&rhs))
                })
                .collect(),
        }
    }
}

/// Rounds up exactly when the fractional part reaches `threshold`.
fn round_with_threshold(value: f64, threshold: f64) -> f64 {
    (value + 1.0 - threshold).floor()
}

/// Rounds `value` to one of the two admissible values of `domain` around it, going up exactly when
/// the relative position of `value` between them reaches `threshold`. Values outside the bounds
/// are mapped onto the nearer bound.
fn round_into_domain(domain: &Domain, value: f64, threshold: f64) -> f64 {
    let lower_bound = domain.lower_bound();
    let upper_bound = domain.upper_bound();
    if value <= lower_bound {
        return lower_bound;
    }
    if value >= upper_bound {
        return upper_bound;
    }

    let below = domain
        .round_upper_bound(value)
        .filter(|&below| below >= lower_bound);
    let above = domain
        .round_lower_bound(value)
        .filter(|&above| above <= upper_bound);

    match (below, above) {
        (Some(below), Some(above)) if above > below => {
            if (value - below) / (above - below) >= threshold {
                above
            } else {
                below
            }
        }
        (Some(below), _) => below,
        (None, Some(above)) => above,
        (None, None) => lower_bound,
    }
}

fn fractionality(value: f64) -> f64 {
    (value - value.round()).abs()
}

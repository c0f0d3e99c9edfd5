#![allow(dead_code, reason = "not every test binary uses every helper")]

use fixpoint_core::engine::Domain;
use fixpoint_core::engine::EngineOptions;
use fixpoint_core::engine::VariableId;
use fixpoint_core::factory::ConstraintDescription;
use fixpoint_core::factory::EngineBuilder;
use fixpoint_core::factory::FactoryOptions;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A random model together with one of its solutions.
pub struct RandomModel {
    pub domains: Vec<Domain>,
    pub descriptions: Vec<ConstraintDescription>,
    pub solution: Vec<f64>,
}

impl RandomModel {
    /// Integer and binary variables with non-negative bounds and `<=` rows with a positive
    /// right-hand side, so that zero is a solution.
    pub fn generate(seed: u64, num_variables: usize, num_rows: usize) -> RandomModel {
        let mut rng = SmallRng::seed_from_u64(seed);

        let domains = (0..num_variables)
            .map(|index| {
                if index % 3 == 0 {
                    Domain::binary()
                } else {
                    let upper = rng.gen_range(2..8) as f64;
                    Domain::integer(0.0, upper).expect("valid integer domain")
                }
            })
            .collect::<Vec<_>>();

        let all_variables = (0..num_variables as u32)
            .map(VariableId::new)
            .collect::<Vec<_>>();
        let descriptions = (0..num_rows)
            .map(|row| {
                let size = rng.gen_range(2..5);
                let variables = all_variables
                    .choose_multiple(&mut rng, size)
                    .copied()
                    .collect::<Vec<_>>();
                let coefficients = random_coefficients(&mut rng, size);
                let rhs = rng.gen_range(2..12) as f64;
                ConstraintDescription::less_than_or_equals(
                    format!("row{row}"),
                    variables,
                    coefficients,
                    rhs,
                )
            })
            .collect();

        RandomModel {
            domains,
            descriptions,
            solution: vec![0.0; num_variables],
        }
    }

    /// Binary, integer, sparse and continuous variables with `<=`, `>=`, ranged and equality rows.
    ///
    /// Every row holds at most one continuous variable, and every row is satisfied by a random
    /// point which is kept as the solution. Equality rows always contain the continuous variable.
    pub fn generate_mixed(seed: u64, num_variables: usize, num_rows: usize) -> RandomModel {
        let mut rng = SmallRng::seed_from_u64(seed);

        let mut domains = Vec::with_capacity(num_variables);
        let mut solution = Vec::with_capacity(num_variables);
        for index in 0..num_variables {
            let (domain, value) = match index % 4 {
                0 => (Domain::binary(), rng.gen_range(0..2) as f64),
                3 => {
                    let upper = rng.gen_range(4..12) as f64;
                    let domain = Domain::continuous(-2.0, upper).expect("valid continuous domain");
                    // Halves keep every activity exact.
                    let value = rng.gen_range(-4..=2 * upper as i32) as f64 / 2.0;
                    (domain, value)
                }
                _ if index % 5 == 2 => {
                    let values = [0, 1, 2, 3, 5, 8, 13]
                        .choose_multiple(&mut rng, 3)
                        .map(|&value| value as f64)
                        .collect::<Vec<_>>();
                    let value = *values.choose(&mut rng).expect("three values");
                    (Domain::sparse(values).expect("valid sparse domain"), value)
                }
                _ => {
                    let lower = rng.gen_range(-3..1) as f64;
                    let upper = rng.gen_range(2..8) as f64;
                    let value = rng.gen_range(lower as i32..=upper as i32) as f64;
                    (
                        Domain::integer(lower, upper).expect("valid integer domain"),
                        value,
                    )
                }
            };
            domains.push(domain);
            solution.push(value);
        }

        let (continuous, integral): (Vec<_>, Vec<_>) = (0..num_variables as u32)
            .map(VariableId::new)
            .partition(|variable| variable.index() % 4 == 3);

        let descriptions = (0..num_rows)
            .map(|row| {
                let with_continuous = !continuous.is_empty() && rng.gen_bool(0.5);
                let num_integral = rng.gen_range(1..4) + usize::from(!with_continuous);
                let mut variables = integral
                    .choose_multiple(&mut rng, num_integral)
                    .copied()
                    .collect::<Vec<_>>();
                if with_continuous {
                    variables.extend(continuous.choose(&mut rng).copied());
                }

                let coefficients = random_coefficients(&mut rng, variables.len());
                let activity = variables
                    .iter()
                    .zip(&coefficients)
                    .map(|(variable, coefficient)| coefficient * solution[variable.index()])
                    .sum::<f64>();
                let shape = rng.gen_range(0..4);
                let mut slack = || rng.gen_range(0..4) as f64;

                let name = format!("row{row}");
                match shape {
                    0 => ConstraintDescription::less_than_or_equals(
                        name,
                        variables,
                        coefficients,
                        activity + slack(),
                    ),
                    1 => ConstraintDescription::greater_than_or_equals(
                        name,
                        variables,
                        coefficients,
                        activity - slack(),
                    ),
                    2 if with_continuous => {
                        ConstraintDescription::equals(name, variables, coefficients, activity)
                    }
                    _ => {
                        let lhs = activity - slack();
                        let rhs = activity + slack();
                        ConstraintDescription::row(name, variables, coefficients, lhs, rhs)
                    }
                }
            })
            .collect();

        RandomModel {
            domains,
            descriptions,
            solution,
        }
    }

    /// A builder with the constraints added in an order shuffled by `seed`.
    pub fn builder(&self, seed: Option<u64>) -> EngineBuilder {
        self.builder_with_options(EngineOptions::default(), seed)
    }

    pub fn builder_with_options(&self, options: EngineOptions, seed: Option<u64>) -> EngineBuilder {
        let mut builder = EngineBuilder::new(options, FactoryOptions::default());
        for domain in &self.domains {
            let _ = builder.add_variable(domain.clone());
        }

        let mut descriptions = self.descriptions.clone();
        if let Some(seed) = seed {
            descriptions.shuffle(&mut SmallRng::seed_from_u64(seed));
        }
        for description in descriptions {
            let _ = builder.add_constraint(description);
        }

        builder
    }
}

fn random_coefficients(rng: &mut SmallRng, size: usize) -> Vec<f64> {
    (0..size)
        .map(|_| {
            let magnitude = rng.gen_range(1..4) as f64;
            if rng.gen_bool(0.3) {
                -magnitude
            } else {
                magnitude
            }
        })
        .collect()
}

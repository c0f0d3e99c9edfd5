use enumset::EnumSet;
use log::info;

use crate::basic_types::FixpointError;
use crate::containers::HashMap;
use crate::engine::Conflict;
use crate::engine::Domain;
use crate::engine::EngineOptions;
use crate::engine::PropagationEngine;
use crate::engine::VariableId;
use crate::factory::ConstraintDescription;
use crate::factory::ConstraintKind;
use crate::factory::FactoryOptions;
use crate::factory::FactoryStatistics;
use crate::factory::PropagatorFactory;

/// Collects the variables and constraints of a problem and wires them into a
/// [`PropagationEngine`].
///
/// # Example
/// ```
/// # use fixpoint_core::engine::Domain;
/// # use fixpoint_core::factory::ConstraintDescription;
/// # use fixpoint_core::factory::EngineBuilder;
/// # use fixpoint_core::propagation::ReadDomains;
/// let mut builder = EngineBuilder::default();
/// let x = builder.add_named_variable("x", Domain::binary()).unwrap();
/// let y = builder.add_named_variable("y", Domain::binary()).unwrap();
/// builder.add_constraint(ConstraintDescription::greater_than_or_equals(
///     "cover",
///     vec![x, y],
///     vec![1.0, 1.0],
///     2.0,
/// ));
///
/// let built = builder.build().unwrap();
///
/// assert!(built.root_conflict.is_none());
/// assert!(built.engine.current_domains().is_fixed(x));
/// ```
#[derive(Debug, Default)]
pub struct EngineBuilder {
    engine: PropagationEngine,
    factory: PropagatorFactory,
    variable_names: HashMap<String, VariableId>,
    descriptions: Vec<ConstraintDescription>,
}

/// The result of [`EngineBuilder::build`].
#[derive(Debug)]
pub struct BuiltEngine {
    pub engine: PropagationEngine,
    pub variable_names: HashMap<String, VariableId>,
    pub factory_statistics: FactoryStatistics,
    /// The conflict found by the initial propagation. If set, the problem is infeasible and the
    /// engine is left in its conflict state.
    pub root_conflict: Option<Conflict>,
}

impl EngineBuilder {
    pub fn new(engine_options: EngineOptions, factory_options: FactoryOptions) -> Self {
        EngineBuilder {
            engine: PropagationEngine::new(engine_options),
            factory: PropagatorFactory::new(factory_options),
            variable_names: HashMap::default(),
            descriptions: Vec::new(),
        }
    }

    pub fn add_variable(&mut self, domain: Domain) -> VariableId {
        self.engine.new_variable(domain)
    }

    pub fn add_named_variable(
        &mut self,
        name: impl Into<String>,
        domain: Domain,
    ) -> Result<VariableId, FixpointError> {
        let name = name.into();
        if self.variable_names.contains_key(&name) {
            return Err(FixpointError::DuplicateVariableName { name });
        }

        let variable = self.engine.new_variable(domain);
        let _ = self.variable_names.insert(name, variable);
        Ok(variable)
    }

    /// The variable added under `name`.
    pub fn variable(&self, name: &str) -> Option<VariableId> {
        self.variable_names.get(name).copied()
    }

    pub fn add_constraint(&mut self, description: ConstraintDescription) -> &mut Self {
        self.descriptions.push(description);
        self
    }

    /// Installs every constraint, propagates to the root fixpoint and marks it as the state
    /// [`PropagationEngine::reset`] returns to.
    pub fn build(self) -> Result<BuiltEngine, FixpointError> {
        let EngineBuilder {
            mut engine,
            mut factory,
            variable_names,
            descriptions,
        } = self;

        for description in &descriptions {
            let _ = factory.install(&mut engine, description)?;
        }

        let root_conflict = engine.propagate().err();
        match root_conflict {
            Some(conflict) => info!("the problem is infeasible at the root: {conflict:?}"),
            None => engine.commit_root(),
        }

        let statistics = *factory.statistics();
        info!(
            "built engine with {} variables and {} propagators ({} rows filtered)",
            engine.num_variables(),
            engine.num_propagators(),
            statistics.num_filtered
        );
        for kind in EnumSet::<ConstraintKind>::all() {
            let count = statistics.num_of_kind(kind);
            if count > 0 {
                info!("{count} {kind} propagators");
            }
        }
        factory.log_statistics();

        Ok(BuiltEngine {
            engine,
            variable_names,
            factory_statistics: statistics,
            root_conflict,
        })
    }
}

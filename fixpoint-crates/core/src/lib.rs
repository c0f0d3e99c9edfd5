//! # fixpoint-core
//! A domain propagation engine for mixed-integer programming heuristics.
//!
//! The engine keeps the bounds of binary, integer and continuous variables, runs a family of
//! propagators (linear, cardinality, knapsack, implication/equivalence, variable bound and
//! lexicographic ordering) until no bound can be tightened any further or a conflict is found,
//! and records every change on a trail so that tentative decisions can be rolled back.
//!
//! # Building an engine
//! Problems are described declaratively through [`factory::ConstraintDescription`]s; the
//! [`factory::EngineBuilder`] classifies each row into the most specific propagator that can
//! handle it and propagates the root:
//! ```rust
//! # use fixpoint_core::engine::DecisionBound;
//! # use fixpoint_core::engine::Domain;
//! # use fixpoint_core::factory::ConstraintDescription;
//! # use fixpoint_core::factory::EngineBuilder;
//! # use fixpoint_core::propagation::ReadDomains;
//! let mut builder = EngineBuilder::default();
//! let items = (0..3)
//!     .map(|_| builder.add_variable(Domain::binary()))
//!     .collect::<Vec<_>>();
//!
//! // 3 x0 + 3 x1 + 3 x2 <= 5
//! builder.add_constraint(ConstraintDescription::less_than_or_equals(
//!     "capacity",
//!     items.clone(),
//!     vec![3.0, 3.0, 3.0],
//!     5.0,
//! ));
//! let mut engine = builder.build().unwrap().engine;
//! ```
//!
//! # Decisions and rollback
//! A search procedure takes a [`engine::Checkpoint`] before a tentative decision and rolls back
//! to it when the decision turns out to be infeasible:
//! ```rust
//! # use fixpoint_core::engine::DecisionBound;
//! # use fixpoint_core::engine::Domain;
//! # use fixpoint_core::factory::ConstraintDescription;
//! # use fixpoint_core::factory::EngineBuilder;
//! # use fixpoint_core::propagation::ReadDomains;
//! # let mut builder = EngineBuilder::default();
//! # let items = (0..3)
//! #     .map(|_| builder.add_variable(Domain::binary()))
//! #     .collect::<Vec<_>>();
//! # builder.add_constraint(ConstraintDescription::less_than_or_equals(
//! #     "capacity",
//! #     items.clone(),
//! #     vec![3.0, 3.0, 3.0],
//! #     5.0,
//! # ));
//! # let mut engine = builder.build().unwrap().engine;
//! let checkpoint = engine.checkpoint();
//! engine
//!     .apply_decision(items[0], DecisionBound::Fix(1.0))
//!     .unwrap();
//! assert_eq!(engine.current_domains().upper_bound(items[1]), 0.0);
//!
//! let conflict = engine.apply_decision(items[1], DecisionBound::LowerBound(1.0));
//! assert!(conflict.is_err());
//!
//! engine.rollback_to(checkpoint).unwrap();
//! assert_eq!(engine.current_domains().upper_bound(items[1]), 1.0);
//! ```
//!
//! # Numerical tolerance
//! Bounds are compared with the absolute tolerance [`math::tolerance::EPSILON`]: a bound which
//! moves by less is not considered changed, and magnitudes from
//! [`math::tolerance::INFINITE_BOUND`] on are treated as infinite.
pub mod asserts;
pub mod basic_types;
pub mod containers;
pub mod engine;
pub mod factory;
pub mod math;
pub mod propagation;
pub mod propagators;
pub mod rounding;
pub mod statistics;

pub use basic_types::FixpointError;
pub use engine::Conflict;
pub use engine::PropagationEngine;

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

mod beam;
mod boundary;
mod config;
mod errors;
mod evaluator;
mod integrator;
mod load;
mod load_function;
mod resolver;
mod singularity;
mod solver;
mod support;

pub use beam::{Beam, BeamBuilder};
pub use boundary::{
    boundary_stations, BoundaryCatalog, BoundaryEntry, BoundaryKind, BoundaryStation,
    BoundaryValue,
};
pub use config::{
    BoundaryOverride, ExplicitSection, LoadDefinition, ProblemDefinition, RectangleSection,
    SectionDefinition, SupportDefinition,
};
pub use errors::{AnalysisError, BeamEditError, ErrorKind};
pub use evaluator::{
    bending_stress, rectangular_second_moment, sample, Extreme, SamplingOptions, Samples,
    Section, StressField, DEFAULT_FORCE_POINTS,
};
pub use integrator::{integrate, AnalysisMode, EquationChain, Quantity};
pub use load::{Load, LoadCategory};
pub use load_function::{build_load_function, load_terms, LoadFunctionOptions};
pub use resolver::{candidate_equations, resolve_constants, BoundaryEquation, Resolution};
pub use singularity::{Constant, ConstantTerm, ConstantValues, Expression, Limit, LinearForm, Term};
pub use solver::{Reaction, Solution, Solver};
pub use support::{Support, SupportCategory};

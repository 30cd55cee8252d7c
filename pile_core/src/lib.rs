//! # pile_core - Pressiometric Pile Calculation Engine
//!
//! `pile_core` computes the axial behavior of deep foundation piles from
//! Menard pressuremeter data, following NF P94-262: ultimate and
//! characteristic bearing resistances, and the full head-load vs.
//! head-settlement curve through a nonlinear load-transfer equilibrium
//! solve.
//!
//! ## Design Philosophy
//!
//! - **Stateless sweeps**: piles and meshes are immutable; every
//!   equilibrium sweep returns an isolated snapshot, so independent loads
//!   (or piles) can be solved concurrently with no shared mutable state
//! - **JSON-First**: all inputs, results and errors serialize cleanly
//! - **Rich Errors**: structured error types, not just strings
//! - **Consistent SI units**: metres, MPa, MN - no conversion layer
//!
//! ## Quick Start
//!
//! ```rust
//! use pile_core::nf_factors::PileCategory;
//! use pile_core::pile::{Pile, PileInput};
//! use pile_core::settlement::SettlementOptions;
//! use pile_core::soil::{Lithology, SoilLayer, SoilType};
//! use pile_core::solver::NewtonRaphson;
//!
//! let pile = Pile::new(
//!     PileInput {
//!         label: "P-1".to_string(),
//!         category: PileCategory::BoredSimple,
//!         level_top_m: 0.0,
//!         level_bottom_m: -10.0,
//!         modulus_mpa: 20_000.0,
//!         tip_diameter_m: 0.6,
//!         shaft_diameter_m: 0.6,
//!         slice_thickness_m: 0.2,
//!     },
//!     Lithology::new(vec![SoilLayer {
//!         name: "Clay".to_string(),
//!         level_top_m: 0.0,
//!         level_bottom_m: -14.0,
//!         soil_type: SoilType::ClaySilt,
//!         limit_pressure_mpa: 1.5,
//!         creep_pressure_mpa: 0.8,
//!         menard_modulus_mpa: 15.0,
//!     }]),
//! )
//! .unwrap();
//!
//! let finder = NewtonRaphson::default();
//! let curve = pile
//!     .settlement_curve(&finder, SettlementOptions::default())
//!     .unwrap();
//! assert!(!curve.points.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`pile`] - Pile definition, validation and cached mesh
//! - [`soil`] - Soil layers, lithology and pressiometric lookups
//! - [`mesh`] - Layer-respecting slice discretization
//! - [`slice`] - Per-slice nonlinear equilibrium
//! - [`settlement`] - Outer tip-displacement solve and settlement curve
//! - [`resistance`] - Ultimate/characteristic resistances and capacities
//! - [`mobilization`] - Frank-Zhao mobilization laws
//! - [`solver`] - Scalar root-finding abstraction
//! - [`nf_factors`] - NF P94-262 classification and partial factors
//! - [`loads`] - Head load cases with situation/combination checks
//! - [`errors`] - Structured error types
//! - [`project`] - Project container and metadata
//! - [`file_io`] - File operations with atomic saves and locking

pub mod errors;
pub mod file_io;
pub mod loads;
pub mod mesh;
pub mod mobilization;
pub mod nf_factors;
pub mod pile;
pub mod project;
pub mod resistance;
pub mod settlement;
pub mod slice;
pub mod soil;
pub mod solver;

// Re-export commonly used types at crate root for convenience
pub use errors::{PileError, PileResult};
pub use file_io::{load_project, save_project, FileLock};
pub use pile::{Pile, PileInput};
pub use project::{PileProject, PileRecord, ProjectMetadata};
pub use settlement::{SettlementCurve, SettlementOptions, SettlementPoint};
pub use solver::{NewtonRaphson, RootFinder};

//! # Pile Definition
//!
//! The [`Pile`] is the root object of an analysis: geometry, material,
//! installation category, the lithology it is embedded in, and the cached
//! slice mesh derived from them.
//!
//! A pile is immutable once built. Changing geometry or lithology means
//! building a new pile, which re-validates the stratigraphy and re-meshes;
//! this keeps every equilibrium sweep free of shared mutable state.
//!
//! ## Example
//!
//! ```rust
//! use pile_core::nf_factors::PileCategory;
//! use pile_core::pile::{Pile, PileInput};
//! use pile_core::soil::{Lithology, SoilLayer, SoilType};
//!
//! let input = PileInput {
//!     label: "P-1".to_string(),
//!     category: PileCategory::BoredSimple,
//!     level_top_m: 0.0,
//!     level_bottom_m: -10.0,
//!     modulus_mpa: 20_000.0,
//!     tip_diameter_m: 0.6,
//!     shaft_diameter_m: 0.6,
//!     slice_thickness_m: 0.2,
//! };
//! let lithology = Lithology::new(vec![SoilLayer {
//!     name: "Clay".to_string(),
//!     level_top_m: 0.0,
//!     level_bottom_m: -14.0,
//!     soil_type: SoilType::ClaySilt,
//!     limit_pressure_mpa: 1.5,
//!     creep_pressure_mpa: 0.8,
//!     menard_modulus_mpa: 15.0,
//! }]);
//!
//! let pile = Pile::new(input, lithology).unwrap();
//! assert_eq!(pile.class(), 1);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::errors::{PileError, PileResult};
use crate::mesh::PileMesh;
use crate::nf_factors::{default_tables, NormTables, PartialFactors, PileCategory};
use crate::slice::ShaftProperties;
use crate::soil::Lithology;

/// Default target slice thickness for the discretization (m)
pub const DEFAULT_SLICE_THICKNESS_M: f64 = 0.20;

fn default_slice_thickness() -> f64 {
    DEFAULT_SLICE_THICKNESS_M
}

/// Input parameters of a pile.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "P-1",
///   "category": "BoredSimple",
///   "level_top_m": 0.0,
///   "level_bottom_m": -10.0,
///   "modulus_mpa": 20000.0,
///   "tip_diameter_m": 0.6,
///   "shaft_diameter_m": 0.6,
///   "slice_thickness_m": 0.2
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PileInput {
    /// User label (e.g., "P-1", "Abutment pile")
    pub label: String,

    /// Installation category (Table A.1)
    pub category: PileCategory,

    /// Head level (m, elevation)
    pub level_top_m: f64,

    /// Tip level (m, elevation)
    pub level_bottom_m: f64,

    /// Young's modulus of the pile material Eb (MPa)
    pub modulus_mpa: f64,

    /// Equivalent diameter for the tip section Dp (m)
    pub tip_diameter_m: f64,

    /// Equivalent diameter for the friction perimeter Ds (m)
    pub shaft_diameter_m: f64,

    /// Target slice thickness for the discretization (m)
    #[serde(default = "default_slice_thickness")]
    pub slice_thickness_m: f64,
}

impl PileInput {
    /// Validate input parameters.
    pub fn validate(&self) -> PileResult<()> {
        if self.level_top_m <= self.level_bottom_m {
            return Err(PileError::invalid_input(
                "level_top_m",
                format!("{} / {}", self.level_top_m, self.level_bottom_m),
                "Head level must be above tip level",
            ));
        }
        if self.modulus_mpa <= 0.0 {
            return Err(PileError::invalid_input(
                "modulus_mpa",
                self.modulus_mpa.to_string(),
                "Young's modulus must be positive",
            ));
        }
        if self.tip_diameter_m <= 0.0 {
            return Err(PileError::invalid_input(
                "tip_diameter_m",
                self.tip_diameter_m.to_string(),
                "Tip diameter must be positive",
            ));
        }
        if self.shaft_diameter_m <= 0.0 {
            return Err(PileError::invalid_input(
                "shaft_diameter_m",
                self.shaft_diameter_m.to_string(),
                "Shaft diameter must be positive",
            ));
        }
        if self.slice_thickness_m <= 0.0 {
            return Err(PileError::invalid_input(
                "slice_thickness_m",
                self.slice_thickness_m.to_string(),
                "Slice thickness must be positive",
            ));
        }
        Ok(())
    }
}

/// A deep foundation pile with its lithology and cached slice mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pile {
    input: PileInput,
    lithology: Lithology,
    partial_factors: PartialFactors,
    mesh: PileMesh,
}

impl Pile {
    /// Build a pile against the default (NF P94-262) tables.
    ///
    /// Validates the input, checks the stratigraphy and builds the mesh;
    /// any failure aborts construction.
    pub fn new(input: PileInput, lithology: Lithology) -> PileResult<Self> {
        Pile::with_tables(input, lithology, default_tables())
    }

    /// Build a pile against a substituted table set.
    pub fn with_tables(
        input: PileInput,
        lithology: Lithology,
        tables: &NormTables,
    ) -> PileResult<Self> {
        input.validate()?;
        let partial_factors = tables.partial_factors_for(input.category)?;
        let mesh = PileMesh::build(
            ShaftProperties {
                category: input.category,
                modulus_mpa: input.modulus_mpa,
                tip_diameter_m: input.tip_diameter_m,
                shaft_diameter_m: input.shaft_diameter_m,
            },
            &lithology,
            input.level_top_m,
            input.level_bottom_m,
            input.slice_thickness_m,
        )?;
        Ok(Pile {
            input,
            lithology,
            partial_factors,
            mesh,
        })
    }

    /// Substitute the model partial factors (deterministic testing, other
    /// standard revisions).
    pub fn with_partial_factors(mut self, factors: PartialFactors) -> Self {
        self.partial_factors = factors;
        self
    }

    /// The validated input
    pub fn input(&self) -> &PileInput {
        &self.input
    }

    /// User label
    pub fn label(&self) -> &str {
        &self.input.label
    }

    /// Installation category
    pub fn category(&self) -> PileCategory {
        self.input.category
    }

    /// Pile class (1 to 8) per Table A.1
    pub fn class(&self) -> u8 {
        self.input.category.class()
    }

    /// Category abbreviation per Table A.1
    pub fn abbreviation(&self) -> &'static str {
        self.input.category.abbreviation()
    }

    /// Category description per Table A.1
    pub fn description(&self) -> &'static str {
        self.input.category.description()
    }

    /// Head level (m)
    pub fn level_top_m(&self) -> f64 {
        self.input.level_top_m
    }

    /// Tip level (m)
    pub fn level_bottom_m(&self) -> f64 {
        self.input.level_bottom_m
    }

    /// Total pile height (m)
    pub fn height_m(&self) -> f64 {
        self.input.level_top_m - self.input.level_bottom_m
    }

    /// Tip section area A = pi * Dp^2 / 4 (m^2)
    pub fn tip_area_m2(&self) -> f64 {
        PI * self.input.tip_diameter_m * self.input.tip_diameter_m / 4.0
    }

    /// Shaft perimeter p = pi * Ds (m)
    pub fn perimeter_m(&self) -> f64 {
        PI * self.input.shaft_diameter_m
    }

    /// Shared shaft parameters passed to every slice
    pub fn shaft(&self) -> ShaftProperties {
        ShaftProperties {
            category: self.input.category,
            modulus_mpa: self.input.modulus_mpa,
            tip_diameter_m: self.input.tip_diameter_m,
            shaft_diameter_m: self.input.shaft_diameter_m,
        }
    }

    /// The lithology the pile is embedded in
    pub fn lithology(&self) -> &Lithology {
        &self.lithology
    }

    /// The cached slice mesh, head to tip
    pub fn mesh(&self) -> &PileMesh {
        &self.mesh
    }

    /// The model partial factors in force
    pub fn partial_factors(&self) -> PartialFactors {
        self.partial_factors
    }
}

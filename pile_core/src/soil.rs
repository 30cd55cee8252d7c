//! # Soil Layers and Pressiometric Parameters
//!
//! Soil description for pressiometric pile design: layers with their Menard
//! test parameters (limit pressure pl, creep pressure pf, modulus Em) and the
//! category- and class-dependent lookups derived from them.
//!
//! ## Parameter chain
//!
//! ```text
//! pl  --> fsol curve --> alpha x fsol, capped at qs,max --> qs (unit skin friction)
//! Em  --> kt, kq     --> Frank-Zhao mobilization slopes
//! pl  --> ple*, kp   --> qb (unit base resistance)
//! ```
//!
//! ## Reference
//!
//! NF P94-262: Tables F.5.2.1 (alpha), F.5.2.2 (fsol curves), F.5.2.3
//! (qs,max), F.4.2.1 (kp,max), Annex L (kt, kq).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{PileError, PileResult};
use crate::nf_factors::PileCategory;

/// Level comparison tolerance for stratigraphy checks (m)
const LEVEL_TOLERANCE: f64 = 1.0e-6;

/// Reference width for the Menard subgrade reaction modulus (m)
const MENARD_REFERENCE_WIDTH: f64 = 0.6;

// ============================================================================
// Soil types
// ============================================================================

/// Soil nature, selecting the friction curve, the ceiling friction values,
/// the bearing factors and the mobilization-law slopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    /// Clays and silts (Q1 curve)
    ClaySilt,
    /// Sands and gravels (Q2 curve)
    SandGravel,
    /// Chalk (Q3 curve)
    Chalk,
    /// Marl and marly limestone (Q4 curve)
    MarlLimestone,
    /// Weathered or fragmented rock (Q5 curve)
    WeatheredRock,
}

impl SoilType {
    /// All soil types, in friction-curve order
    pub const ALL: [SoilType; 5] = [
        SoilType::ClaySilt,
        SoilType::SandGravel,
        SoilType::Chalk,
        SoilType::MarlLimestone,
        SoilType::WeatheredRock,
    ];

    /// Column index in the category/class tables below
    fn index(&self) -> usize {
        match self {
            SoilType::ClaySilt => 0,
            SoilType::SandGravel => 1,
            SoilType::Chalk => 2,
            SoilType::MarlLimestone => 3,
            SoilType::WeatheredRock => 4,
        }
    }

    /// Fine-grained soils take the stiffer Annex L mobilization slopes;
    /// granular soils the softer ones.
    pub fn is_fine(&self) -> bool {
        !matches!(self, SoilType::SandGravel)
    }

    /// Coefficients (a, b, c) of the friction curve
    /// `fsol(pl) = (a * pl + b) * (1 - exp(-c * pl))` (Table F.5.2.2),
    /// with pl and fsol in MPa.
    pub fn fsol_coefficients(&self) -> (f64, f64, f64) {
        match self {
            SoilType::ClaySilt => (0.003, 0.04, 3.5),
            SoilType::SandGravel => (0.01, 0.06, 1.2),
            SoilType::Chalk => (0.007, 0.07, 1.3),
            SoilType::MarlLimestone => (0.008, 0.08, 3.0),
            SoilType::WeatheredRock => (0.01, 0.08, 3.0),
        }
    }

    /// Menard rheological coefficient, used by the subgrade reaction modulus.
    pub fn rheological_coefficient(&self) -> f64 {
        match self {
            SoilType::ClaySilt => 2.0 / 3.0,
            SoilType::SandGravel => 1.0 / 3.0,
            SoilType::Chalk => 0.5,
            SoilType::MarlLimestone => 2.0 / 3.0,
            SoilType::WeatheredRock => 0.5,
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            SoilType::ClaySilt => "Clay / silt",
            SoilType::SandGravel => "Sand / gravel",
            SoilType::Chalk => "Chalk",
            SoilType::MarlLimestone => "Marl / marly limestone",
            SoilType::WeatheredRock => "Weathered rock",
        }
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Category / class tables
// ============================================================================

/// Pile-soil adhesion factor alpha (Table F.5.2.1).
/// Rows: category 1-20. Columns: [clay/silt, sand/gravel, chalk, marl, rock].
const ALPHA: [[f64; 5]; 20] = [
    [1.10, 1.00, 1.80, 1.50, 1.60], // 1  FS
    [1.25, 1.40, 1.80, 1.50, 1.60], // 2  FB
    [0.70, 0.60, 0.50, 0.90, 0.90], // 3  FTP
    [1.25, 1.40, 1.70, 1.40, 1.40], // 4  FTR
    [1.30, 1.40, 1.80, 1.50, 1.60], // 5  FSR, FBR, PU
    [1.50, 1.80, 2.10, 1.60, 1.60], // 6  FTC, FTCD
    [1.90, 2.10, 1.70, 1.70, 1.70], // 7  VM
    [0.60, 0.60, 1.00, 0.70, 0.70], // 8  VT
    [1.10, 1.40, 1.00, 0.90, 0.90], // 9  BPF, BPR
    [2.00, 2.10, 1.90, 1.60, 1.60], // 10 BE
    [1.20, 1.40, 2.10, 1.00, 1.00], // 11 BM
    [0.80, 1.20, 0.40, 0.90, 0.90], // 12 BAF
    [1.20, 0.70, 0.50, 1.00, 1.00], // 13 BAO
    [1.10, 1.00, 0.40, 1.00, 0.90], // 14 HB
    [2.70, 2.90, 2.40, 2.40, 2.40], // 15 HBi
    [0.90, 0.80, 0.40, 1.20, 1.20], // 16 PP
    [1.10, 1.00, 1.80, 1.50, 1.60], // 17 M1
    [1.25, 1.40, 1.80, 1.50, 1.60], // 18 M2
    [2.70, 2.90, 2.40, 2.40, 2.40], // 19 PIGU, MIGU
    [3.40, 3.80, 3.10, 3.10, 3.10], // 20 PIRS, MIRS
];

/// Ceiling unit skin friction qs,max in MPa (Table F.5.2.3).
/// Rows: category 1-20. Columns as [`ALPHA`].
const QS_MAX: [[f64; 5]; 20] = [
    [0.090, 0.090, 0.200, 0.170, 0.200], // 1  FS
    [0.090, 0.090, 0.200, 0.170, 0.200], // 2  FB
    [0.050, 0.050, 0.050, 0.050, 0.080], // 3  FTP
    [0.090, 0.090, 0.170, 0.170, 0.170], // 4  FTR
    [0.090, 0.090, 0.200, 0.170, 0.200], // 5  FSR, FBR, PU
    [0.090, 0.170, 0.200, 0.200, 0.200], // 6  FTC, FTCD
    [0.130, 0.200, 0.170, 0.170, 0.170], // 7  VM
    [0.050, 0.090, 0.090, 0.090, 0.090], // 8  VT
    [0.130, 0.130, 0.090, 0.090, 0.090], // 9  BPF, BPR
    [0.170, 0.260, 0.200, 0.200, 0.200], // 10 BE
    [0.090, 0.130, 0.260, 0.200, 0.200], // 11 BM
    [0.090, 0.090, 0.050, 0.090, 0.090], // 12 BAF
    [0.090, 0.050, 0.050, 0.090, 0.090], // 13 BAO
    [0.090, 0.130, 0.050, 0.090, 0.090], // 14 HB
    [0.200, 0.380, 0.320, 0.320, 0.320], // 15 HBi
    [0.090, 0.090, 0.050, 0.090, 0.090], // 16 PP
    [0.090, 0.090, 0.200, 0.170, 0.200], // 17 M1
    [0.090, 0.090, 0.200, 0.170, 0.200], // 18 M2
    [0.200, 0.380, 0.320, 0.320, 0.320], // 19 PIGU, MIGU
    [0.200, 0.440, 0.440, 0.440, 0.500], // 20 PIRS, MIRS
];

/// Maximum pressiometric bearing factor kp,max (Table F.4.2.1).
/// Rows: pile class 1-8. Columns as [`ALPHA`].
const KP_MAX: [[f64; 5]; 8] = [
    [1.15, 1.10, 1.45, 1.45, 1.45], // class 1
    [1.30, 1.65, 1.60, 2.00, 2.00], // class 2
    [1.55, 3.20, 2.35, 2.10, 2.10], // class 3
    [1.35, 3.10, 2.30, 2.30, 2.30], // class 4
    [1.00, 1.90, 1.40, 1.40, 1.20], // class 5
    [1.20, 3.10, 1.70, 2.20, 1.50], // class 6
    [1.00, 1.00, 1.00, 1.00, 1.20], // class 7
    [1.15, 1.10, 1.45, 1.45, 1.45], // class 8
];

// ============================================================================
// Soil layer
// ============================================================================

/// A soil layer described by a Menard pressuremeter profile.
///
/// Immutable for the duration of an analysis. Levels are elevations
/// (positive up); `level_top_m > level_bottom_m`.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Silty clay",
///   "level_top_m": 0.0,
///   "level_bottom_m": -8.5,
///   "soil_type": "ClaySilt",
///   "limit_pressure_mpa": 1.2,
///   "creep_pressure_mpa": 0.7,
///   "menard_modulus_mpa": 12.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLayer {
    /// Layer name (e.g., "Silty clay", "Dense sand")
    pub name: String,

    /// Upper level of the layer (m, elevation)
    pub level_top_m: f64,

    /// Lower level of the layer (m, elevation)
    pub level_bottom_m: f64,

    /// Soil nature
    pub soil_type: SoilType,

    /// Limit pressure pl (MPa)
    pub limit_pressure_mpa: f64,

    /// Creep pressure pf (MPa)
    pub creep_pressure_mpa: f64,

    /// Menard pressuremeter modulus Em (MPa)
    pub menard_modulus_mpa: f64,
}

impl SoilLayer {
    /// Validate the layer parameters.
    pub fn validate(&self) -> PileResult<()> {
        if self.level_top_m <= self.level_bottom_m {
            return Err(PileError::invalid_input(
                "level_top_m",
                format!("{} / {}", self.level_top_m, self.level_bottom_m),
                "Layer top must be above layer bottom",
            ));
        }
        if self.limit_pressure_mpa <= 0.0 {
            return Err(PileError::invalid_input(
                "limit_pressure_mpa",
                self.limit_pressure_mpa.to_string(),
                "Limit pressure must be positive",
            ));
        }
        if self.creep_pressure_mpa < 0.0 || self.creep_pressure_mpa > self.limit_pressure_mpa {
            return Err(PileError::invalid_input(
                "creep_pressure_mpa",
                self.creep_pressure_mpa.to_string(),
                "Creep pressure must lie between 0 and the limit pressure",
            ));
        }
        if self.menard_modulus_mpa <= 0.0 {
            return Err(PileError::invalid_input(
                "menard_modulus_mpa",
                self.menard_modulus_mpa.to_string(),
                "Menard modulus must be positive",
            ));
        }
        Ok(())
    }

    /// Layer thickness (m)
    pub fn thickness_m(&self) -> f64 {
        self.level_top_m - self.level_bottom_m
    }

    /// Whether a level falls inside the layer (bounds included).
    pub fn contains(&self, level_m: f64) -> bool {
        (self.level_bottom_m - LEVEL_TOLERANCE..=self.level_top_m + LEVEL_TOLERANCE)
            .contains(&level_m)
    }

    /// Friction curve value fsol(pl) in MPa (Table F.5.2.2).
    pub fn fsol_mpa(&self) -> f64 {
        let (a, b, c) = self.soil_type.fsol_coefficients();
        let pl = self.limit_pressure_mpa;
        (a * pl + b) * (1.0 - (-c * pl).exp())
    }

    /// Pile-soil adhesion factor alpha for a category (Table F.5.2.1).
    pub fn adhesion_factor(&self, category: PileCategory) -> f64 {
        ALPHA[category.number() as usize - 1][self.soil_type.index()]
    }

    /// Ceiling unit skin friction qs,max in MPa for a category
    /// (Table F.5.2.3).
    pub fn max_skin_friction_mpa(&self, category: PileCategory) -> f64 {
        QS_MAX[category.number() as usize - 1][self.soil_type.index()]
    }

    /// Design unit skin friction qs = min(alpha x fsol, qs,max) in MPa
    /// (article F.5.2).
    pub fn limit_skin_friction_mpa(&self, category: PileCategory) -> f64 {
        let qs = self.adhesion_factor(category) * self.fsol_mpa();
        qs.min(self.max_skin_friction_mpa(category))
    }

    /// Maximum bearing factor kp,max for a pile class (Table F.4.2.1).
    pub fn bearing_factor_max(&self, pile_class: u8) -> f64 {
        let row = (pile_class.clamp(1, 8) - 1) as usize;
        KP_MAX[row][self.soil_type.index()]
    }

    /// Frank-Zhao skin friction slope kt in MPa/m (Annex L), as a function
    /// of the friction diameter Ds.
    pub fn friction_modulus(&self, shaft_diameter_m: f64) -> f64 {
        if self.soil_type.is_fine() {
            2.0 * self.menard_modulus_mpa / shaft_diameter_m
        } else {
            0.8 * self.menard_modulus_mpa / shaft_diameter_m
        }
    }

    /// Frank-Zhao end-bearing slope kq in MPa/m (Annex L), as a function of
    /// the friction diameter Ds.
    pub fn base_modulus(&self, shaft_diameter_m: f64) -> f64 {
        if self.soil_type.is_fine() {
            11.0 * self.menard_modulus_mpa / shaft_diameter_m
        } else {
            4.8 * self.menard_modulus_mpa / shaft_diameter_m
        }
    }

    /// Menard horizontal subgrade reaction modulus kf(B) in MPa/m, for a
    /// loaded width B.
    pub fn subgrade_modulus(&self, width_m: f64) -> f64 {
        let alpha = self.soil_type.rheological_coefficient();
        let em = self.menard_modulus_mpa;
        let b0 = MENARD_REFERENCE_WIDTH;
        if width_m >= b0 {
            12.0 * em / ((4.0 / 3.0) * b0 * (2.65 * width_m / b0).powf(alpha) + alpha * width_m)
        } else {
            12.0 * em / (width_m * ((4.0 / 3.0) * 2.65_f64.powf(alpha) + alpha))
        }
    }
}

// ============================================================================
// Lithology
// ============================================================================

/// An ordered (top to bottom) sequence of soil layers.
///
/// This is the soil-layer provider of an analysis: it resolves the layer
/// containing a level and integrates the stepwise limit-pressure profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lithology {
    layers: Vec<SoilLayer>,
}

impl Lithology {
    /// Wrap an ordered list of layers.
    pub fn new(layers: Vec<SoilLayer>) -> Self {
        Lithology { layers }
    }

    /// The layers, top to bottom.
    pub fn layers(&self) -> &[SoilLayer] {
        &self.layers
    }

    /// The layer containing a level, if any.
    pub fn layer_at(&self, level_m: f64) -> Option<&SoilLayer> {
        self.layers.iter().find(|layer| layer.contains(level_m))
    }

    /// Deepest described level (m), if any layer exists.
    pub fn deepest_level_m(&self) -> Option<f64> {
        self.layers
            .iter()
            .map(|layer| layer.level_bottom_m)
            .reduce(f64::min)
    }

    /// Check that the layers contiguously and monotonically cover the
    /// interval [bottom, top].
    ///
    /// Each layer's lower bound must equal the next layer's upper bound, the
    /// first layer must reach the top of the interval and the last layer its
    /// bottom. Violations are fatal to mesh construction.
    pub fn check_coverage(&self, top_m: f64, bottom_m: f64) -> PileResult<()> {
        if self.layers.is_empty() {
            return Err(PileError::stratigraphy("No soil layers described"));
        }
        for layer in &self.layers {
            layer.validate()?;
        }
        for pair in self.layers.windows(2) {
            let gap = pair[0].level_bottom_m - pair[1].level_top_m;
            if gap.abs() > LEVEL_TOLERANCE {
                return Err(PileError::stratigraphy(format!(
                    "Layers '{}' and '{}' are not contiguous: {} m vs {} m",
                    pair[0].name, pair[1].name, pair[0].level_bottom_m, pair[1].level_top_m,
                )));
            }
        }
        let first = &self.layers[0];
        if first.level_top_m < top_m - LEVEL_TOLERANCE {
            return Err(PileError::stratigraphy(format!(
                "Lithology starts at {} m, below the required top level {} m",
                first.level_top_m, top_m,
            )));
        }
        let last = &self.layers[self.layers.len() - 1];
        if last.level_bottom_m > bottom_m + LEVEL_TOLERANCE {
            return Err(PileError::stratigraphy(format!(
                "Lithology stops at {} m, above the required bottom level {} m",
                last.level_bottom_m, bottom_m,
            )));
        }
        Ok(())
    }

    /// Integral of the stepwise limit-pressure profile over [bottom, top],
    /// in MPa.m. Portions of the interval outside the described profile
    /// contribute nothing.
    pub fn integrate_limit_pressure(&self, top_m: f64, bottom_m: f64) -> f64 {
        if top_m <= bottom_m {
            return 0.0;
        }
        self.layers
            .iter()
            .map(|layer| {
                let upper = layer.level_top_m.min(top_m);
                let lower = layer.level_bottom_m.max(bottom_m);
                (upper - lower).max(0.0) * layer.limit_pressure_mpa
            })
            .sum()
    }

    /// Mean limit pressure over [bottom, top] in MPa.
    pub fn mean_limit_pressure(&self, top_m: f64, bottom_m: f64) -> f64 {
        let height = top_m - bottom_m;
        if height <= 0.0 {
            return 0.0;
        }
        self.integrate_limit_pressure(top_m, bottom_m) / height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clay(top: f64, bottom: f64) -> SoilLayer {
        SoilLayer {
            name: "Clay".to_string(),
            level_top_m: top,
            level_bottom_m: bottom,
            soil_type: SoilType::ClaySilt,
            limit_pressure_mpa: 1.2,
            creep_pressure_mpa: 0.7,
            menard_modulus_mpa: 12.0,
        }
    }

    fn sand(top: f64, bottom: f64) -> SoilLayer {
        SoilLayer {
            name: "Sand".to_string(),
            level_top_m: top,
            level_bottom_m: bottom,
            soil_type: SoilType::SandGravel,
            limit_pressure_mpa: 2.0,
            creep_pressure_mpa: 1.1,
            menard_modulus_mpa: 20.0,
        }
    }

    #[test]
    fn test_fsol_positive_and_increasing() {
        for soil_type in SoilType::ALL {
            let mut layer = clay(0.0, -5.0);
            layer.soil_type = soil_type;

            layer.limit_pressure_mpa = 0.5;
            let low = layer.fsol_mpa();
            layer.limit_pressure_mpa = 3.0;
            let high = layer.fsol_mpa();

            assert!(low > 0.0, "{soil_type:?} fsol must be positive");
            assert!(high > low, "{soil_type:?} fsol must grow with pl");
        }
    }

    #[test]
    fn test_limit_skin_friction_is_capped() {
        // IRS-grouted piles have a large alpha; friction must still be
        // capped at qs,max.
        let mut layer = clay(0.0, -5.0);
        layer.limit_pressure_mpa = 5.0;
        let category = crate::nf_factors::PileCategory::GroutedIrs;

        let uncapped = layer.adhesion_factor(category) * layer.fsol_mpa();
        let qs = layer.limit_skin_friction_mpa(category);
        assert!(qs <= layer.max_skin_friction_mpa(category) + 1e-12);
        assert!(qs <= uncapped);
    }

    #[test]
    fn test_frank_zhao_moduli() {
        let fine = clay(0.0, -5.0);
        let granular = sand(0.0, -5.0);
        let ds = 0.6;

        assert!((fine.friction_modulus(ds) - 2.0 * 12.0 / 0.6).abs() < 1e-12);
        assert!((fine.base_modulus(ds) - 11.0 * 12.0 / 0.6).abs() < 1e-12);
        assert!((granular.friction_modulus(ds) - 0.8 * 20.0 / 0.6).abs() < 1e-12);
        assert!((granular.base_modulus(ds) - 4.8 * 20.0 / 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_subgrade_modulus_decreases_with_width() {
        let layer = clay(0.0, -5.0);
        let narrow = layer.subgrade_modulus(0.4);
        let reference = layer.subgrade_modulus(0.6);
        let wide = layer.subgrade_modulus(1.2);
        assert!(narrow > reference);
        assert!(reference > wide);
    }

    #[test]
    fn test_layer_at_resolves_boundaries() {
        let lithology = Lithology::new(vec![clay(0.0, -4.0), sand(-4.0, -12.0)]);

        assert_eq!(lithology.layer_at(-2.0).unwrap().name, "Clay");
        assert_eq!(lithology.layer_at(-8.0).unwrap().name, "Sand");
        // Shared boundary resolves to the first containing layer.
        assert_eq!(lithology.layer_at(-4.0).unwrap().name, "Clay");
        assert!(lithology.layer_at(-15.0).is_none());
        assert!(lithology.layer_at(2.0).is_none());
    }

    #[test]
    fn test_coverage_accepts_contiguous_profile() {
        let lithology = Lithology::new(vec![clay(0.0, -4.0), sand(-4.0, -12.0)]);
        assert!(lithology.check_coverage(0.0, -10.0).is_ok());
    }

    #[test]
    fn test_coverage_rejects_gap() {
        let lithology = Lithology::new(vec![clay(0.0, -4.0), sand(-5.0, -12.0)]);
        let err = lithology.check_coverage(0.0, -10.0).unwrap_err();
        assert_eq!(err.error_code(), "STRATIGRAPHY");
    }

    #[test]
    fn test_coverage_rejects_short_profile() {
        let lithology = Lithology::new(vec![clay(0.0, -4.0)]);
        let err = lithology.check_coverage(0.0, -10.0).unwrap_err();
        assert_eq!(err.error_code(), "STRATIGRAPHY");

        let empty = Lithology::new(vec![]);
        assert!(empty.check_coverage(0.0, -10.0).is_err());
    }

    #[test]
    fn test_limit_pressure_integration() {
        let lithology = Lithology::new(vec![clay(0.0, -4.0), sand(-4.0, -12.0)]);

        // 2 m of clay at 1.2 MPa + 4 m of sand at 2.0 MPa
        let integral = lithology.integrate_limit_pressure(-2.0, -8.0);
        assert!((integral - (2.0 * 1.2 + 4.0 * 2.0)).abs() < 1e-12);

        let mean = lithology.mean_limit_pressure(-2.0, -8.0);
        assert!((mean - integral / 6.0).abs() < 1e-12);

        // Window reaching below the profile only counts the described part.
        let clipped = lithology.integrate_limit_pressure(-10.0, -20.0);
        assert!((clipped - 2.0 * 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_layer_serialization() {
        let layer = sand(-1.0, -7.5);
        let json = serde_json::to_string_pretty(&layer).unwrap();
        let roundtrip: SoilLayer = serde_json::from_str(&json).unwrap();
        assert_eq!(layer, roundtrip);
    }
}

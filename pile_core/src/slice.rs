//! # Pile Slices
//!
//! A slice is a fixed-height axial segment of a pile, the unit of the
//! load-transfer discretization. Slices are immutable once the mesh is
//! built; all solve state lives in the per-sweep [`SliceState`] value so
//! that concurrent sweeps over the same mesh cannot interfere.
//!
//! ## Per-slice equilibrium
//!
//! Given the force and displacement at the slice bottom, the mid-slice
//! displacement z satisfies the fixed-point condition
//!
//! ```text
//! F(z) = dz_bott + ksi_a + ksi_b * tau(z) - z = 0
//!
//! ksi_a = 2 * Q_bott * dh / (pi * Dp^2 * Eb)     elastic stretch from Q_bott
//! ksi_b = Ds * dh^2 / (2 * Dp^2 * Eb)            friction-stretch coupling
//! ```
//!
//! i.e. the mid displacement equals the displacement inherited from below
//! plus the elastic elongation due to the bottom force plus the elongation
//! due to the (self-referential) mobilized friction. The root is found by a
//! [`RootFinder`] from an initial guess of zero, the bottom displacement
//! acting as the equation's parameter.
//!
//! Top force and top displacement are derived, not stored: the force is
//! assumed to vary linearly over the slice (uniformly distributed mobilized
//! friction), so `Q_top = 2 * Q_mid - Q_bott`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::errors::{PileError, PileResult};
use crate::mobilization::{self, ReactionCurve};
use crate::nf_factors::{LoadingStage, PileCategory};
use crate::soil::SoilLayer;
use crate::solver::RootFinder;

// ============================================================================
// Shared shaft data
// ============================================================================

/// Pile-level parameters shared by every slice of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShaftProperties {
    /// Installation category (Table A.1)
    pub category: PileCategory,

    /// Young's modulus of the pile material Eb (MPa)
    pub modulus_mpa: f64,

    /// Equivalent diameter for the tip section Dp (m)
    pub tip_diameter_m: f64,

    /// Equivalent diameter for the friction perimeter Ds (m)
    pub shaft_diameter_m: f64,
}

impl ShaftProperties {
    /// Tip section area A = pi * Dp^2 / 4 (m^2)
    pub fn tip_area_m2(&self) -> f64 {
        PI * self.tip_diameter_m * self.tip_diameter_m / 4.0
    }

    /// Shaft perimeter p = pi * Ds (m)
    pub fn perimeter_m(&self) -> f64 {
        PI * self.shaft_diameter_m
    }

    /// Axial rigidity term pi * Dp^2 * Eb (MN)
    fn axial_rigidity(&self) -> f64 {
        PI * self.tip_diameter_m * self.tip_diameter_m * self.modulus_mpa
    }
}

// ============================================================================
// Solve state
// ============================================================================

/// Ephemeral equilibrium state of one slice within one sweep.
///
/// Valid only for the sweep that produced it; a new sweep produces fresh
/// values and never writes back into the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceState {
    /// Axial force at the slice bottom (MN)
    pub q_bottom_mn: f64,

    /// Vertical displacement at the slice bottom (m)
    pub dz_bottom_m: f64,

    /// Solved mid-slice displacement (m)
    pub dz_middle_m: f64,
}

// ============================================================================
// Slice
// ============================================================================

/// A fixed-height axial segment of a pile.
///
/// Owns its local geometry and a copy of the (immutable) soil layer
/// containing its midpoint, plus the shared shaft parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    /// Upper level of the slice (m, elevation)
    pub level_top_m: f64,

    /// Slice height delta_h (m), always positive
    pub height_m: f64,

    /// Soil layer containing the slice midpoint
    pub layer: SoilLayer,

    /// Shared pile-level parameters
    pub shaft: ShaftProperties,
}

impl Slice {
    /// Mid-point level of the slice (m)
    pub fn level_middle_m(&self) -> f64 {
        self.level_top_m - self.height_m / 2.0
    }

    /// Bottom level of the slice (m)
    pub fn level_bottom_m(&self) -> f64 {
        self.level_top_m - self.height_m
    }

    /// Shaft perimeter (m)
    pub fn perimeter_m(&self) -> f64 {
        self.shaft.perimeter_m()
    }

    /// Tip section area (m^2)
    pub fn tip_area_m2(&self) -> f64 {
        self.shaft.tip_area_m2()
    }

    /// Design unit skin friction qs of the slice (MPa)
    pub fn limit_skin_friction_mpa(&self) -> f64 {
        self.layer.limit_skin_friction_mpa(self.shaft.category)
    }

    /// Frank-Zhao shaft slope kt of the slice (MPa/m)
    pub fn friction_modulus(&self) -> f64 {
        self.layer.friction_modulus(self.shaft.shaft_diameter_m)
    }

    /// Frank-Zhao base slope kq of the slice (MPa/m)
    pub fn base_modulus(&self) -> f64 {
        self.layer.base_modulus(self.shaft.shaft_diameter_m)
    }

    /// Mobilized unit skin friction tau(z) at a displacement (MPa)
    pub fn tau(&self, displacement_m: f64) -> f64 {
        mobilization::skin_friction(
            displacement_m,
            self.limit_skin_friction_mpa(),
            self.friction_modulus(),
        )
    }

    /// Mobilized unit end-bearing stress q(z) at a tip displacement, for an
    /// ultimate unit base resistance qb (MPa).
    pub fn end_bearing_stress_mpa(&self, qb_mpa: f64, displacement_m: f64) -> f64 {
        mobilization::end_bearing(displacement_m, qb_mpa, self.base_modulus())
    }

    /// Elastic stretch contribution of the bottom force:
    /// `ksi_a = 2 * Q_bott * dh / (pi * Dp^2 * Eb)` (m)
    pub fn ksi_a(&self, q_bottom_mn: f64) -> f64 {
        2.0 * q_bottom_mn * self.height_m / self.shaft.axial_rigidity()
    }

    /// Friction-stretch coupling coefficient:
    /// `ksi_b = Ds * dh^2 / (2 * Dp^2 * Eb)` (m per MPa of mobilized friction)
    pub fn ksi_b(&self) -> f64 {
        self.shaft.shaft_diameter_m * self.height_m * self.height_m
            / (2.0
                * self.shaft.tip_diameter_m
                * self.shaft.tip_diameter_m
                * self.shaft.modulus_mpa)
    }

    /// Solve the per-slice equilibrium for a given bottom force and bottom
    /// displacement.
    ///
    /// Returns the solved state, from which top force and top displacement
    /// are derived. A root-finder failure propagates as
    /// [`PileError::NoEquilibrium`]; the result is never silently zero.
    pub fn equilibrium<R: RootFinder>(
        &self,
        finder: &R,
        q_bottom_mn: f64,
        dz_bottom_m: f64,
    ) -> PileResult<SliceState> {
        let ksi_a = self.ksi_a(q_bottom_mn);
        let ksi_b = self.ksi_b();

        let residual = |z: f64| dz_bottom_m + ksi_a + ksi_b * self.tau(z) - z;

        let dz_middle_m = finder.find_root(residual, 0.0).map_err(|err| {
            PileError::no_equilibrium(format!(
                "slice at {:.3} m: {}",
                self.level_top_m, err
            ))
        })?;

        Ok(SliceState {
            q_bottom_mn,
            dz_bottom_m,
            dz_middle_m,
        })
    }

    /// Axial force at mid-height:
    /// `Q_mid = Q_bott + p * dh/2 * tau(dz_mid)` (MN)
    pub fn q_middle_mn(&self, state: &SliceState) -> f64 {
        state.q_bottom_mn + self.perimeter_m() * self.height_m / 2.0 * self.tau(state.dz_middle_m)
    }

    /// Axial force at the slice top, assuming linear force variation:
    /// `Q_top = 2 * Q_mid - Q_bott` (MN)
    pub fn q_top_mn(&self, state: &SliceState) -> f64 {
        2.0 * self.q_middle_mn(state) - state.q_bottom_mn
    }

    /// Vertical displacement at the slice top:
    /// `dz_top = dz_bott + 4 * Q_mid * dh / (pi * Dp^2 * Eb)` (m)
    pub fn dz_top_m(&self, state: &SliceState) -> f64 {
        state.dz_bottom_m
            + 4.0 * self.q_middle_mn(state) * self.height_m / self.shaft.axial_rigidity()
    }

    /// Mobilized unit skin friction at the solved state (MPa)
    pub fn mobilized_friction_mpa(&self, state: &SliceState) -> f64 {
        self.tau(state.dz_middle_m)
    }

    /// Lateral soil reaction curve of the slice for an external beam model.
    ///
    /// The curve is already scaled by the slice height; `width_m` is the
    /// loaded width B. No lateral analysis happens here, this is a pure
    /// data export.
    pub fn reaction_curve(&self, width_m: f64, stage: LoadingStage) -> ReactionCurve {
        let dh = self.height_m;
        let pf = self.layer.creep_pressure_mpa;
        let pl = self.layer.limit_pressure_mpa;
        let kf = self.layer.subgrade_modulus(width_m);

        match stage {
            LoadingStage::ShortTerm => ReactionCurve {
                q1: dh * width_m * pf,
                k1: dh * kf,
                second: None,
            },
            LoadingStage::LongTerm => ReactionCurve {
                q1: dh * width_m * pf,
                k1: dh * kf / 2.0,
                second: None,
            },
            LoadingStage::Uls => ReactionCurve {
                q1: dh * width_m * pf,
                k1: dh * kf,
                second: Some((dh * width_m * pl, dh * kf / 2.0)),
            },
            LoadingStage::Seismic => ReactionCurve {
                q1: dh * width_m * pl,
                k1: dh * kf * 3.0,
                second: None,
            },
        }
    }

    /// Linearized lateral spring stiffness of the slice (MN/m).
    pub fn linear_spring_stiffness(&self, width_m: f64, stage: LoadingStage) -> f64 {
        let kf = self.height_m * self.layer.subgrade_modulus(width_m);
        match stage {
            LoadingStage::ShortTerm | LoadingStage::Uls => kf,
            LoadingStage::LongTerm => kf / 2.0,
            LoadingStage::Seismic => kf * 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::SoilType;
    use crate::solver::NewtonRaphson;

    fn test_slice() -> Slice {
        Slice {
            level_top_m: -4.0,
            height_m: 0.5,
            layer: SoilLayer {
                name: "Clay".to_string(),
                level_top_m: 0.0,
                level_bottom_m: -12.0,
                soil_type: SoilType::ClaySilt,
                limit_pressure_mpa: 1.2,
                creep_pressure_mpa: 0.7,
                menard_modulus_mpa: 12.0,
            },
            shaft: ShaftProperties {
                category: PileCategory::BoredSimple,
                modulus_mpa: 20_000.0,
                tip_diameter_m: 0.6,
                shaft_diameter_m: 0.6,
            },
        }
    }

    #[test]
    fn test_geometry() {
        let slice = test_slice();
        assert!((slice.level_middle_m() - (-4.25)).abs() < 1e-12);
        assert!((slice.level_bottom_m() - (-4.5)).abs() < 1e-12);
        assert!((slice.perimeter_m() - PI * 0.6).abs() < 1e-12);
        assert!((slice.tip_area_m2() - PI * 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_equilibrium_residual_vanishes() {
        let slice = test_slice();
        let finder = NewtonRaphson::default();

        let state = slice.equilibrium(&finder, 0.1, 0.002).unwrap();
        let residual = state.dz_bottom_m + slice.ksi_a(state.q_bottom_mn)
            + slice.ksi_b() * slice.tau(state.dz_middle_m)
            - state.dz_middle_m;
        assert!(residual.abs() < 1e-8);
    }

    #[test]
    fn test_force_identities() {
        let slice = test_slice();
        let finder = NewtonRaphson::default();
        let state = slice.equilibrium(&finder, 0.15, 0.003).unwrap();

        let q_mid = slice.q_middle_mn(&state);
        let expected_mid = state.q_bottom_mn
            + slice.perimeter_m() * slice.height_m / 2.0 * slice.tau(state.dz_middle_m);
        assert!((q_mid - expected_mid).abs() < 1e-12);

        let q_top = slice.q_top_mn(&state);
        assert!((q_top - (2.0 * q_mid - state.q_bottom_mn)).abs() < 1e-12);

        // Compression: force and displacement increase from bottom to top.
        assert!(q_top > state.q_bottom_mn);
        assert!(slice.dz_top_m(&state) > state.dz_bottom_m);
    }

    #[test]
    fn test_equilibrium_is_deterministic() {
        let slice = test_slice();
        let finder = NewtonRaphson::default();

        let a = slice.equilibrium(&finder, 0.08, 0.0015).unwrap();
        let b = slice.equilibrium(&finder, 0.08, 0.0015).unwrap();
        assert_eq!(a.dz_middle_m, b.dz_middle_m);
    }

    #[test]
    fn test_trivial_equilibrium() {
        let slice = test_slice();
        let finder = NewtonRaphson::default();

        let state = slice.equilibrium(&finder, 0.0, 0.0).unwrap();
        assert!(state.dz_middle_m.abs() < 1e-9);
        assert!(slice.q_top_mn(&state).abs() < 1e-9);
        assert!(slice.dz_top_m(&state).abs() < 1e-9);
    }

    #[test]
    fn test_reaction_curve_stages() {
        let slice = test_slice();
        let b = 0.6;

        let short = slice.reaction_curve(b, LoadingStage::ShortTerm);
        let long = slice.reaction_curve(b, LoadingStage::LongTerm);
        let uls = slice.reaction_curve(b, LoadingStage::Uls);
        let seismic = slice.reaction_curve(b, LoadingStage::Seismic);

        assert!((short.k1 - 2.0 * long.k1).abs() < 1e-12);
        assert!(short.second.is_none());
        assert!(uls.second.is_some());
        // Seismic plateau is driven by pl, not pf.
        assert!(seismic.q1 > short.q1);
        assert!((seismic.k1 - 3.0 * short.k1).abs() < 1e-9);

        let stiffness = slice.linear_spring_stiffness(b, LoadingStage::ShortTerm);
        assert!((stiffness - short.k1).abs() < 1e-12);
    }
}

//! # Load-Transfer Equilibrium and Settlement Curve
//!
//! The outer solve of the engine: find the tip displacement reproducing a
//! prescribed head load, and repeat over a load sweep to build the head
//! load vs. head settlement curve.
//!
//! ## Nested solve structure
//!
//! ```text
//! settlement_curve            load sweep, one target per step
//!   solve_head_load           root search on the tip displacement
//!     equilibrium_at_tip_..   tip-to-head sweep over the mesh
//!       Slice::equilibrium    per-slice scalar root search
//! ```
//!
//! Each sweep produces an isolated [`PileEquilibrium`] snapshot; nothing is
//! written back into the mesh, so sweeps at different loads (or on other
//! threads) cannot interfere.
//!
//! A load level that admits no equilibrium (typically a target above the
//! ultimate resistance) is reported as a gap in the curve, not as a fatal
//! error.

use serde::{Deserialize, Serialize};

use crate::errors::{PileError, PileResult};
use crate::pile::Pile;
use crate::resistance::SWEEP_MARGIN_MN;
use crate::slice::SliceState;
use crate::solver::RootFinder;

/// Displacement below which an outer-solve root is considered trivial (m)
const TRIVIAL_DISPLACEMENT_M: f64 = 1.0e-12;

/// Head load below which the trivial equilibrium is the legitimate answer (MN)
const NEGLIGIBLE_LOAD_MN: f64 = 1.0e-9;

/// Default number of load steps of a settlement sweep
pub const DEFAULT_SWEEP_STEPS: usize = 20;

/// Equilibrium snapshot of a full pile for one tip displacement.
///
/// `states` follows the mesh storage order (head to tip).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PileEquilibrium {
    /// Axial force at the pile head (MN)
    pub head_force_mn: f64,

    /// Imposed tip displacement (m)
    pub tip_displacement_m: f64,

    /// Resulting head displacement (m)
    pub head_displacement_m: f64,

    /// Per-slice solved states, head to tip
    pub states: Vec<SliceState>,
}

/// One point of the settlement curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettlementPoint {
    /// Head load (MN)
    pub head_load_mn: f64,

    /// Head settlement (m)
    pub head_settlement_m: f64,
}

/// A head-load vs. head-settlement curve.
///
/// Load levels that found no equilibrium are listed in `skipped_loads_mn`;
/// the curve then carries fewer points than requested steps. This is an
/// accepted, reported degeneracy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementCurve {
    /// Converged (load, settlement) pairs, in load order
    pub points: Vec<SettlementPoint>,

    /// Load levels skipped for lack of equilibrium (MN)
    pub skipped_loads_mn: Vec<f64>,
}

/// Options of a settlement sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettlementOptions {
    /// Maximum head load (MN); defaults to the ultimate total resistance
    /// minus a small margin
    pub max_load_mn: Option<f64>,

    /// Number of load steps
    pub steps: usize,
}

impl Default for SettlementOptions {
    fn default() -> Self {
        SettlementOptions {
            max_load_mn: None,
            steps: DEFAULT_SWEEP_STEPS,
        }
    }
}

impl Pile {
    /// Local equilibrium of the whole pile for an imposed tip displacement.
    ///
    /// The tip force follows from the end-bearing mobilization law at the
    /// imposed displacement; the mesh is then swept from the bottommost
    /// slice to the topmost (reverse storage order), each slice's derived
    /// top force and displacement feeding the next slice's bottom state.
    pub fn equilibrium_at_tip_displacement<R: RootFinder>(
        &self,
        finder: &R,
        tip_displacement_m: f64,
    ) -> PileResult<PileEquilibrium> {
        let qb_mpa = self.ultimate_unit_base_resistance_mpa()?;
        let tip_slice = self.mesh().tip_slice();

        let mut force_mn =
            tip_slice.tip_area_m2() * tip_slice.end_bearing_stress_mpa(qb_mpa, tip_displacement_m);
        let mut displacement_m = tip_displacement_m;

        let slices = self.mesh().slices();
        let mut states = Vec::with_capacity(slices.len());
        for slice in slices.iter().rev() {
            let state = slice.equilibrium(finder, force_mn, displacement_m)?;
            force_mn = slice.q_top_mn(&state);
            displacement_m = slice.dz_top_m(&state);
            states.push(state);
        }
        states.reverse();

        Ok(PileEquilibrium {
            head_force_mn: force_mn,
            tip_displacement_m,
            head_displacement_m: displacement_m,
            states,
        })
    }

    /// Head force sustained at an imposed tip displacement (MN).
    ///
    /// Monotone non-decreasing in the tip displacement for physically sane
    /// inputs: more tip penetration mobilizes more friction and
    /// end-bearing.
    pub fn head_force_mn<R: RootFinder>(
        &self,
        finder: &R,
        tip_displacement_m: f64,
    ) -> PileResult<f64> {
        Ok(self
            .equilibrium_at_tip_displacement(finder, tip_displacement_m)?
            .head_force_mn)
    }

    /// Find the pile equilibrium carrying a prescribed head load.
    ///
    /// Root search on `head_force(dz_tip) - target = 0`. The initial guess
    /// is the target force value itself - dimensionally inconsistent but
    /// kept as the established, empirically adequate seeding of this solve.
    ///
    /// A trivial zero root for a non-negligible target, or any root-finder
    /// failure, is reported as [`PileError::NoEquilibrium`]. A negligible
    /// target legitimately takes the trivial equilibrium.
    pub fn solve_head_load<R: RootFinder>(
        &self,
        finder: &R,
        target_head_load_mn: f64,
    ) -> PileResult<PileEquilibrium> {
        let residual = |dz_tip: f64| {
            match self.equilibrium_at_tip_displacement(finder, dz_tip) {
                Ok(equilibrium) => equilibrium.head_force_mn - target_head_load_mn,
                // Surfaced as divergence by the root finder.
                Err(_) => f64::NAN,
            }
        };

        let tip_displacement_m = finder
            .find_root(residual, target_head_load_mn)
            .map_err(|err| {
                PileError::no_equilibrium(format!(
                    "head load {target_head_load_mn:.4} MN: {err}"
                ))
            })?;

        if tip_displacement_m.abs() < TRIVIAL_DISPLACEMENT_M
            && target_head_load_mn.abs() > NEGLIGIBLE_LOAD_MN
        {
            return Err(PileError::no_equilibrium(format!(
                "head load {target_head_load_mn:.4} MN: solver returned the trivial root"
            )));
        }

        self.equilibrium_at_tip_displacement(finder, tip_displacement_m)
    }

    /// Build the head-load vs. head-settlement curve.
    ///
    /// Loads start at half a step and grow by uniform increments up to the
    /// maximum. A load level with no equilibrium is recorded in
    /// `skipped_loads_mn` and the sweep continues.
    pub fn settlement_curve<R: RootFinder>(
        &self,
        finder: &R,
        options: SettlementOptions,
    ) -> PileResult<SettlementCurve> {
        if options.steps == 0 {
            return Err(PileError::invalid_input(
                "steps",
                "0",
                "A settlement sweep needs at least one load step",
            ));
        }
        let max_load_mn = match options.max_load_mn {
            Some(value) => value,
            None => self.total_resistance_mn()? - SWEEP_MARGIN_MN,
        };
        if max_load_mn <= 0.0 {
            return Err(PileError::invalid_input(
                "max_load_mn",
                max_load_mn.to_string(),
                "Maximum sweep load must be positive",
            ));
        }

        let steps = options.steps;
        let mut points = Vec::with_capacity(steps + 1);
        let mut skipped_loads_mn = Vec::new();

        let mut load_mn = 0.5 * max_load_mn / steps as f64;
        let mut index = 0;
        while index <= steps {
            match self.solve_head_load(finder, load_mn) {
                Ok(equilibrium) => points.push(SettlementPoint {
                    head_load_mn: equilibrium.head_force_mn,
                    head_settlement_m: equilibrium.head_displacement_m,
                }),
                Err(PileError::NoEquilibrium { .. }) => skipped_loads_mn.push(load_mn),
                Err(other) => return Err(other),
            }
            index += 1;
            load_mn = index as f64 * max_load_mn / steps as f64;
        }

        Ok(SettlementCurve {
            points,
            skipped_loads_mn,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nf_factors::PileCategory;
    use crate::pile::PileInput;
    use crate::soil::{Lithology, SoilLayer, SoilType};
    use crate::solver::NewtonRaphson;

    fn uniform_pile() -> Pile {
        let input = PileInput {
            label: "P-1".to_string(),
            category: PileCategory::BoredSimple,
            level_top_m: 0.0,
            level_bottom_m: -10.0,
            modulus_mpa: 20_000.0,
            tip_diameter_m: 0.6,
            shaft_diameter_m: 0.6,
            slice_thickness_m: 0.2,
        };
        let lithology = Lithology::new(vec![SoilLayer {
            name: "Clay".to_string(),
            level_top_m: 0.0,
            level_bottom_m: -14.0,
            soil_type: SoilType::ClaySilt,
            limit_pressure_mpa: 1.5,
            creep_pressure_mpa: 0.8,
            menard_modulus_mpa: 15.0,
        }]);
        Pile::new(input, lithology).unwrap()
    }

    #[test]
    fn test_zero_load_is_trivial_equilibrium() {
        let pile = uniform_pile();
        let finder = NewtonRaphson::default();

        let equilibrium = pile.solve_head_load(&finder, 0.0).unwrap();
        assert!(equilibrium.tip_displacement_m.abs() < 1e-9);
        assert!(equilibrium.head_displacement_m.abs() < 1e-9);
        assert!(equilibrium.head_force_mn.abs() < 1e-9);
    }

    #[test]
    fn test_head_force_monotone_in_tip_displacement() {
        let pile = uniform_pile();
        let finder = NewtonRaphson::default();

        let mut previous = 0.0;
        for i in 1..=40 {
            let dz = i as f64 * 5.0e-4;
            let head = pile.head_force_mn(&finder, dz).unwrap();
            assert!(
                head + 1e-9 >= previous,
                "head force must not decrease (dz = {dz})"
            );
            previous = head;
        }
    }

    #[test]
    fn test_sweep_state_chain_is_consistent() {
        let pile = uniform_pile();
        let finder = NewtonRaphson::default();

        let equilibrium = pile
            .equilibrium_at_tip_displacement(&finder, 0.002)
            .unwrap();
        let slices = pile.mesh().slices();
        assert_eq!(equilibrium.states.len(), slices.len());

        // Each slice's bottom state is the derived top state of the slice
        // below it (index + 1 in head-to-tip storage).
        for i in 0..slices.len() - 1 {
            let below = &equilibrium.states[i + 1];
            let q_top_below = slices[i + 1].q_top_mn(below);
            let dz_top_below = slices[i + 1].dz_top_m(below);
            assert!((equilibrium.states[i].q_bottom_mn - q_top_below).abs() < 1e-12);
            assert!((equilibrium.states[i].dz_bottom_m - dz_top_below).abs() < 1e-12);
        }

        // Head quantities come from the topmost slice.
        let head = &equilibrium.states[0];
        assert!((equilibrium.head_force_mn - slices[0].q_top_mn(head)).abs() < 1e-12);
        assert!(
            (equilibrium.head_displacement_m - slices[0].dz_top_m(head)).abs() < 1e-12
        );
    }

    #[test]
    fn test_solve_head_load_reaches_target() {
        let pile = uniform_pile();
        let finder = NewtonRaphson::default();
        let target = 0.5 * pile.total_resistance_mn().unwrap();

        let equilibrium = pile.solve_head_load(&finder, target).unwrap();
        assert!((equilibrium.head_force_mn - target).abs() < 1e-6);
        assert!(equilibrium.tip_displacement_m > 0.0);
        assert!(equilibrium.head_displacement_m > equilibrium.tip_displacement_m);
    }

    #[test]
    fn test_solve_head_load_is_deterministic() {
        let pile = uniform_pile();
        let finder = NewtonRaphson::default();

        let a = pile.solve_head_load(&finder, 0.4).unwrap();
        let b = pile.solve_head_load(&finder, 0.4).unwrap();
        assert_eq!(a.tip_displacement_m, b.tip_displacement_m);
        assert_eq!(a.head_displacement_m, b.head_displacement_m);
    }

    #[test]
    fn test_load_above_ultimate_is_no_equilibrium() {
        let pile = uniform_pile();
        let finder = NewtonRaphson::default();
        let ultimate = pile.total_resistance_mn().unwrap();

        let err = pile.solve_head_load(&finder, 1.2 * ultimate).unwrap_err();
        assert_eq!(err.error_code(), "NO_EQUILIBRIUM");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_settlement_curve_end_to_end() {
        let pile = uniform_pile();
        let finder = NewtonRaphson::default();
        let ultimate = pile.total_resistance_mn().unwrap();

        let curve = pile
            .settlement_curve(&finder, SettlementOptions::default())
            .unwrap();

        assert!(!curve.points.is_empty());

        // First point: near-zero load, near-zero settlement.
        let first = &curve.points[0];
        assert!(first.head_load_mn < 0.1 * ultimate);
        assert!(first.head_settlement_m >= 0.0);
        assert!(first.head_settlement_m < 0.01);

        // Loads never exceed the ultimate resistance and grow monotonically,
        // as do settlements.
        for pair in curve.points.windows(2) {
            assert!(pair[0].head_load_mn < pair[1].head_load_mn);
            assert!(pair[0].head_settlement_m <= pair[1].head_settlement_m);
        }
        let last = curve.points.last().unwrap();
        assert!(last.head_load_mn <= ultimate + 1e-6);
    }

    #[test]
    fn test_sweep_skips_infeasible_levels_and_continues() {
        let pile = uniform_pile();
        let finder = NewtonRaphson::default();
        let ultimate = pile.total_resistance_mn().unwrap();

        let curve = pile
            .settlement_curve(
                &finder,
                SettlementOptions {
                    max_load_mn: Some(1.4 * ultimate),
                    steps: 10,
                },
            )
            .unwrap();

        // Levels above the ultimate resistance are skipped, feasible ones
        // still converge, and every level is accounted for.
        assert!(!curve.points.is_empty());
        assert!(!curve.skipped_loads_mn.is_empty());
        assert_eq!(curve.points.len() + curve.skipped_loads_mn.len(), 11);
        for load in &curve.skipped_loads_mn {
            assert!(*load > ultimate - 1e-6);
        }
    }

    #[test]
    fn test_zero_steps_rejected() {
        let pile = uniform_pile();
        let finder = NewtonRaphson::default();
        let err = pile
            .settlement_curve(
                &finder,
                SettlementOptions {
                    max_load_mn: None,
                    steps: 0,
                },
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}

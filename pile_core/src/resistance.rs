//! # Static Design Resistances
//!
//! Aggregates the per-slice limiting skin friction and the end-bearing
//! capacity into ultimate and characteristic resistances (NF P94-262 F.4
//! and F.5), plus the allowable loads per combination.
//!
//! These values bound the settlement-curve load sweep and feed the capacity
//! report:
//!
//! ```text
//! Rs = sum over slices of p * qs * dh        (F.5)
//! Rb = A * kp * ple*                         (F.4)
//! Rc = Rs + Rb
//! ```
//!
//! The equivalent net limit pressure ple* averages the limit-pressure
//! profile over the window [tip - 3a, tip + b]; the effective embedment Def
//! integrates the same profile over ten shaft diameters above the tip and
//! divides by ple* (Eq. F.4.2.6) - a self-referential relation resolved
//! once with the closed-form window, not iteratively.

use serde::{Deserialize, Serialize};

use crate::errors::{PileError, PileResult};
use crate::nf_factors::Combination;
use crate::pile::Pile;

/// Margin subtracted from the ultimate resistance when it bounds a load
/// sweep (MN)
pub const SWEEP_MARGIN_MN: f64 = 1.0e-4;

/// Allowable capacities of a pile per combination (MN).
///
/// Tension values are negative, matching the sign convention of the
/// characteristic tension resistance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityTable {
    /// Serviceability, quasi-permanent
    pub els_qp_mn: f64,
    /// Serviceability, characteristic
    pub els_car_mn: f64,
    /// Ultimate, fundamental
    pub elu_mn: f64,
    /// Ultimate, accidental
    pub ela_mn: f64,
}

/// Serializable aggregate of the resistance model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceSummary {
    /// Ultimate shaft resistance Rs (MN)
    pub skin_friction_mn: f64,
    /// Ultimate base resistance Rb (MN)
    pub base_mn: f64,
    /// Ultimate total resistance Rc = Rs + Rb (MN)
    pub total_mn: f64,
    /// Characteristic base resistance Rb;k (MN)
    pub characteristic_base_mn: f64,
    /// Characteristic shaft resistance in compression Rs;k (MN)
    pub characteristic_skin_friction_compression_mn: f64,
    /// Characteristic shaft resistance in tension (MN, negative)
    pub characteristic_skin_friction_tension_mn: f64,
    /// Characteristic creep load Rc;cr;k (MN)
    pub creep_load_mn: f64,
    /// Equivalent net limit pressure ple* (MPa)
    pub equivalent_limit_pressure_mpa: f64,
    /// Effective embedment depth Def (m)
    pub effective_embedment_m: f64,
    /// Retained bearing factor kp
    pub bearing_factor: f64,
    /// Allowable compression loads
    pub compression: CapacityTable,
    /// Allowable tension loads (negative)
    pub tension: CapacityTable,
}

impl Pile {
    /// Window half-length a = max(Dp/2, 0.5 m) for ple* (F.4.2 (3)).
    pub fn a_length_m(&self) -> f64 {
        (self.input().tip_diameter_m / 2.0).max(0.5)
    }

    /// Window length b = min(a, pile height) for ple* (F.4.2 (3)).
    pub fn b_length_m(&self) -> f64 {
        self.a_length_m().min(self.height_m())
    }

    /// Equivalent net limit pressure ple* (MPa): mean limit pressure over
    /// [tip - 3a, tip + b], the lower bound clamped to the deepest described
    /// level.
    pub fn equivalent_limit_pressure_mpa(&self) -> f64 {
        let tip = self.level_bottom_m();
        let window_top = tip + self.b_length_m();
        let mut window_bottom = tip - 3.0 * self.a_length_m();
        if let Some(deepest) = self.lithology().deepest_level_m() {
            window_bottom = window_bottom.max(deepest);
        }
        self.lithology()
            .mean_limit_pressure(window_top, window_bottom)
    }

    /// Effective embedment depth Def (m), Eq. F.4.2.6: the limit-pressure
    /// integral over ten shaft diameters above the tip, divided by ple*.
    pub fn effective_embedment_m(&self) -> PileResult<f64> {
        let ple = self.equivalent_limit_pressure_mpa();
        if ple <= 0.0 {
            return Err(PileError::stratigraphy(
                "Limit-pressure profile is empty over the bearing window",
            ));
        }
        let tip = self.level_bottom_m();
        let window_top = tip + 10.0 * self.input().shaft_diameter_m;
        Ok(self.lithology().integrate_limit_pressure(window_top, tip) / ple)
    }

    /// Retained bearing factor kp (F.4.2): kp,max at full effective
    /// embedment, reduced linearly below Def / Ds = 5.
    pub fn bearing_factor(&self) -> PileResult<f64> {
        let tip_layer = self
            .lithology()
            .layer_at(self.level_bottom_m())
            .ok_or_else(|| {
                PileError::stratigraphy(format!(
                    "No soil layer at the pile tip level {} m",
                    self.level_bottom_m()
                ))
            })?;
        let kp_max = tip_layer.bearing_factor_max(self.class());
        let embedment_ratio = self.effective_embedment_m()? / self.input().shaft_diameter_m;
        if embedment_ratio >= 5.0 {
            Ok(kp_max)
        } else {
            Ok(1.0 + (kp_max - 1.0) * embedment_ratio / 5.0)
        }
    }

    /// Ultimate unit base resistance qb = kp * ple* (MPa).
    pub fn ultimate_unit_base_resistance_mpa(&self) -> PileResult<f64> {
        Ok(self.bearing_factor()? * self.equivalent_limit_pressure_mpa())
    }

    /// Ultimate base resistance Rb (MN), article F.4.
    pub fn base_resistance_mn(&self) -> PileResult<f64> {
        Ok(self.tip_area_m2() * self.ultimate_unit_base_resistance_mpa()?)
    }

    /// Ultimate shaft resistance Rs (MN), article F.5.
    pub fn skin_friction_resistance_mn(&self) -> f64 {
        self.mesh()
            .slices()
            .iter()
            .map(|slice| slice.perimeter_m() * slice.limit_skin_friction_mpa() * slice.height_m)
            .sum()
    }

    /// Ultimate total resistance Rc = Rs + Rb (MN).
    pub fn total_resistance_mn(&self) -> PileResult<f64> {
        Ok(self.base_resistance_mn()? + self.skin_friction_resistance_mn())
    }

    /// Characteristic base resistance Rb;k (MN).
    pub fn characteristic_base_mn(&self) -> PileResult<f64> {
        Ok(self.base_resistance_mn()? / self.partial_factors().compression_divisor())
    }

    /// Characteristic shaft resistance in compression Rs;k (MN).
    pub fn characteristic_skin_friction_compression_mn(&self) -> f64 {
        self.skin_friction_resistance_mn() / self.partial_factors().compression_divisor()
    }

    /// Characteristic shaft resistance in tension (MN, negative).
    pub fn characteristic_skin_friction_tension_mn(&self) -> f64 {
        -self.skin_friction_resistance_mn() / self.partial_factors().tension_divisor()
    }

    /// Characteristic creep load Rc;cr;k = 0.5 Rb;k + 0.7 Rs;k (MN).
    pub fn creep_load_mn(&self) -> PileResult<f64> {
        Ok(0.5 * self.characteristic_base_mn()?
            + 0.7 * self.characteristic_skin_friction_compression_mn())
    }

    /// Characteristic creep load in tension (MN, negative).
    pub fn creep_tension_load_mn(&self) -> f64 {
        0.7 * self.characteristic_skin_friction_tension_mn()
    }

    /// Allowable compression load for a combination (MN).
    pub fn allowable_compression_mn(&self, combination: Combination) -> PileResult<f64> {
        match combination {
            Combination::ElsQp => Ok(self.creep_load_mn()? / 1.1),
            Combination::ElsCar => Ok(self.creep_load_mn()? / 0.9),
            Combination::Elu => Ok(self.characteristic_base_mn()? / 1.1
                + self.characteristic_skin_friction_compression_mn() / 1.1),
            Combination::Ela => Ok(self.characteristic_base_mn()?
                + self.characteristic_skin_friction_compression_mn()),
        }
    }

    /// Allowable tension load for a combination (MN, negative).
    pub fn allowable_tension_mn(&self, combination: Combination) -> f64 {
        match combination {
            Combination::ElsQp => self.creep_tension_load_mn() / 1.5,
            Combination::ElsCar => self.creep_tension_load_mn() / 1.1,
            Combination::Elu => self.characteristic_skin_friction_tension_mn() / 1.15,
            Combination::Ela => self.characteristic_skin_friction_tension_mn() / 1.05,
        }
    }

    /// Full resistance summary for reporting and serialization.
    pub fn resistance_summary(&self) -> PileResult<ResistanceSummary> {
        let skin_friction_mn = self.skin_friction_resistance_mn();
        let base_mn = self.base_resistance_mn()?;
        Ok(ResistanceSummary {
            skin_friction_mn,
            base_mn,
            total_mn: skin_friction_mn + base_mn,
            characteristic_base_mn: self.characteristic_base_mn()?,
            characteristic_skin_friction_compression_mn: self
                .characteristic_skin_friction_compression_mn(),
            characteristic_skin_friction_tension_mn: self
                .characteristic_skin_friction_tension_mn(),
            creep_load_mn: self.creep_load_mn()?,
            equivalent_limit_pressure_mpa: self.equivalent_limit_pressure_mpa(),
            effective_embedment_m: self.effective_embedment_m()?,
            bearing_factor: self.bearing_factor()?,
            compression: CapacityTable {
                els_qp_mn: self.allowable_compression_mn(Combination::ElsQp)?,
                els_car_mn: self.allowable_compression_mn(Combination::ElsCar)?,
                elu_mn: self.allowable_compression_mn(Combination::Elu)?,
                ela_mn: self.allowable_compression_mn(Combination::Ela)?,
            },
            tension: CapacityTable {
                els_qp_mn: self.allowable_tension_mn(Combination::ElsQp),
                els_car_mn: self.allowable_tension_mn(Combination::ElsCar),
                elu_mn: self.allowable_tension_mn(Combination::Elu),
                ela_mn: self.allowable_tension_mn(Combination::Ela),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nf_factors::PileCategory;
    use crate::pile::PileInput;
    use crate::soil::{Lithology, SoilLayer, SoilType};

    fn clay_layer(top: f64, bottom: f64, pl: f64) -> SoilLayer {
        SoilLayer {
            name: "Clay".to_string(),
            level_top_m: top,
            level_bottom_m: bottom,
            soil_type: SoilType::ClaySilt,
            limit_pressure_mpa: pl,
            creep_pressure_mpa: pl / 2.0,
            menard_modulus_mpa: 15.0,
        }
    }

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
        Pile::new(input, Lithology::new(vec![clay_layer(0.0, -14.0, 1.5)])).unwrap()
    }

    #[test]
    fn test_window_lengths() {
        let pile = uniform_pile();
        // a = max(0.3, 0.5) = 0.5 ; b = min(0.5, 10) = 0.5
        assert!((pile.a_length_m() - 0.5).abs() < 1e-12);
        assert!((pile.b_length_m() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_profile_resistances() {
        let pile = uniform_pile();

        // Uniform pl: ple* is the layer's limit pressure.
        assert!((pile.equivalent_limit_pressure_mpa() - 1.5).abs() < 1e-9);

        // Def = (10 Ds * pl) / ple* = 6 m, ratio 10 >= 5: kp = kp,max.
        let def = pile.effective_embedment_m().unwrap();
        assert!((def - 6.0).abs() < 1e-9);
        let layer = clay_layer(0.0, -14.0, 1.5);
        let kp = pile.bearing_factor().unwrap();
        assert!((kp - layer.bearing_factor_max(1)).abs() < 1e-12);

        // Rs = p * qs * H for a uniform profile.
        let qs = layer.limit_skin_friction_mpa(PileCategory::BoredSimple);
        let expected_rs = pile.perimeter_m() * qs * pile.height_m();
        assert!((pile.skin_friction_resistance_mn() - expected_rs).abs() < 1e-9);

        // Rb = A * kp * ple*.
        let expected_rb = pile.tip_area_m2() * kp * 1.5;
        assert!((pile.base_resistance_mn().unwrap() - expected_rb).abs() < 1e-9);

        let total = pile.total_resistance_mn().unwrap();
        assert!((total - (expected_rs + expected_rb)).abs() < 1e-9);
    }

    #[test]
    fn test_characteristic_values_use_partial_factors() {
        let pile = uniform_pile();
        let factors = pile.partial_factors();

        let rs = pile.skin_friction_resistance_mn();
        let rsk = pile.characteristic_skin_friction_compression_mn();
        assert!((rsk - rs / (factors.gamma_rd1_comp * factors.gamma_rd2)).abs() < 1e-12);

        let rsk_tension = pile.characteristic_skin_friction_tension_mn();
        assert!(rsk_tension < 0.0);
        assert!(
            (rsk_tension + rs / (factors.gamma_rd1_trac * factors.gamma_rd2)).abs() < 1e-12
        );
    }

    #[test]
    fn test_allowable_loads_ordering() {
        let pile = uniform_pile();

        let qp = pile.allowable_compression_mn(Combination::ElsQp).unwrap();
        let car = pile.allowable_compression_mn(Combination::ElsCar).unwrap();
        let elu = pile.allowable_compression_mn(Combination::Elu).unwrap();
        let ela = pile.allowable_compression_mn(Combination::Ela).unwrap();

        // Quasi-permanent is the most restrictive serviceability level and
        // the accidental ULS the least restrictive overall.
        assert!(qp < car);
        assert!(elu < ela);
        assert!(ela <= pile.total_resistance_mn().unwrap());

        for combination in Combination::ALL {
            assert!(pile.allowable_tension_mn(combination) < 0.0);
        }
    }

    #[test]
    fn test_bearing_factor_reduced_at_low_embedment() {
        // Soft clay above a strong marl bearing layer just above the tip:
        // the effective embedment stays below 5 Ds and kp is reduced.
        let soft = clay_layer(0.0, -9.7, 0.4);
        let mut marl = clay_layer(-9.7, -14.0, 3.0);
        marl.name = "Marl".to_string();
        marl.soil_type = SoilType::MarlLimestone;

        let input = PileInput {
            label: "P-2".to_string(),
            category: PileCategory::BoredSimple,
            level_top_m: 0.0,
            level_bottom_m: -10.0,
            modulus_mpa: 20_000.0,
            tip_diameter_m: 0.6,
            shaft_diameter_m: 0.6,
            slice_thickness_m: 0.2,
        };
        let pile = Pile::new(input, Lithology::new(vec![soft, marl.clone()])).unwrap();

        let ratio = pile.effective_embedment_m().unwrap() / 0.6;
        assert!(ratio < 5.0);

        let kp = pile.bearing_factor().unwrap();
        let kp_max = marl.bearing_factor_max(1);
        assert!(kp > 1.0);
        assert!(kp < kp_max);
    }

    #[test]
    fn test_summary_serialization() {
        let pile = uniform_pile();
        let summary = pile.resistance_summary().unwrap();

        assert!(summary.total_mn > summary.skin_friction_mn);
        assert!(summary.creep_load_mn < summary.total_mn);

        let json = serde_json::to_string_pretty(&summary).unwrap();
        let roundtrip: ResistanceSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, roundtrip);
    }
}

//! # Load Cases
//!
//! A load case is the wrench applied at the pile head in global axes,
//! tagged with its design situation and combination family. The pair is
//! validated for consistency before any capacity check.

use serde::{Deserialize, Serialize};

use crate::errors::{PileError, PileResult};
use crate::nf_factors::{Combination, DesignSituation};

/// A head load wrench in global axes.
///
/// Axial force is positive in compression. Tension checks read a negative
/// `nz_mn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    /// User label (e.g., "G + Q", "Seismic X+")
    pub label: String,

    /// Horizontal force along x (MN)
    pub hx_mn: f64,

    /// Horizontal force along y (MN)
    pub hy_mn: f64,

    /// Axial force, positive in compression (MN)
    pub nz_mn: f64,

    /// Bending moment about x (MN.m)
    pub mx_mnm: f64,

    /// Bending moment about y (MN.m)
    pub my_mnm: f64,

    /// Design situation of the case
    pub situation: DesignSituation,

    /// Combination family of the case
    pub combination: Combination,
}

impl LoadCase {
    /// Check that the combination family is meaningful in the declared
    /// design situation.
    pub fn validate(&self) -> PileResult<()> {
        if !self.combination.is_allowed_for(self.situation) {
            return Err(PileError::invalid_configuration(
                "combination",
                self.combination.to_string(),
                format!("a combination valid in a {} situation", self.situation),
            ));
        }
        Ok(())
    }

    /// Resultant horizontal force (MN)
    pub fn horizontal_resultant_mn(&self) -> f64 {
        self.hx_mn.hypot(self.hy_mn)
    }

    /// Whether the case pulls the pile (axial tension)
    pub fn is_tension(&self) -> bool {
        self.nz_mn < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(situation: DesignSituation, combination: Combination) -> LoadCase {
        LoadCase {
            label: "G + Q".to_string(),
            hx_mn: 0.03,
            hy_mn: 0.04,
            nz_mn: 0.8,
            mx_mnm: 0.0,
            my_mnm: 0.01,
            situation,
            combination,
        }
    }

    #[test]
    fn test_valid_pairs() {
        assert!(case(DesignSituation::Durable, Combination::ElsQp).validate().is_ok());
        assert!(case(DesignSituation::Transient, Combination::Elu).validate().is_ok());
        assert!(case(DesignSituation::Seismic, Combination::Ela).validate().is_ok());
    }

    #[test]
    fn test_invalid_pair_is_configuration_error() {
        let err = case(DesignSituation::Durable, Combination::Ela)
            .validate()
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIGURATION");

        let err = case(DesignSituation::Accidental, Combination::Elu)
            .validate()
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIGURATION");
    }

    #[test]
    fn test_resultants() {
        let load = case(DesignSituation::Durable, Combination::Elu);
        assert!((load.horizontal_resultant_mn() - 0.05).abs() < 1e-12);
        assert!(!load.is_tension());

        let mut pull = load.clone();
        pull.nz_mn = -0.2;
        assert!(pull.is_tension());
    }
}

//! # Mobilization Laws
//!
//! Frank-Zhao tri-linear mobilization laws relating a local displacement to
//! the locally resisted stress (NF P94-262 Annex L).
//!
//! Both the shaft and the base law share the same shape: an initial slope k
//! up to half the limiting stress, a reduced slope k/5 up to the limiting
//! stress, then a plateau:
//!
//! ```text
//! stress
//!   q  |            ________
//!       |          /
//! q/2  |        /   slope k/5
//!       |      /
//!       |    /  slope k
//!       |  /
//!       +-------------------- displacement
//! ```
//!
//! All laws are odd-symmetric (sign-consistent with the displacement
//! direction), zero at zero displacement, monotone and saturating.

use serde::{Deserialize, Serialize};

/// Generic odd-symmetric tri-linear law.
///
/// First branch: slope `k1` up to stress `q1`. Optional second branch:
/// slope `k2` up to stress `q2`. Plateau beyond the last branch.
pub fn tri_linear(displacement: f64, q1: f64, k1: f64, second: Option<(f64, f64)>) -> f64 {
    let magnitude = displacement.abs();
    let z1 = q1 / k1;

    let stress = if magnitude <= z1 {
        k1 * magnitude
    } else if let Some((q2, k2)) = second {
        let z2 = z1 + (q2 - q1) / k2;
        if magnitude <= z2 {
            q1 + k2 * (magnitude - z1)
        } else {
            q2
        }
    } else {
        q1
    };

    if displacement < 0.0 {
        -stress
    } else {
        stress
    }
}

/// Mobilized unit skin friction tau(z) in MPa for a shaft displacement z.
///
/// Knee at half the limiting friction, second slope kt/5, plateau at the
/// limiting friction.
pub fn skin_friction(displacement_m: f64, limit_mpa: f64, kt_mpa_per_m: f64) -> f64 {
    tri_linear(
        displacement_m,
        limit_mpa / 2.0,
        kt_mpa_per_m,
        Some((limit_mpa, kt_mpa_per_m / 5.0)),
    )
}

/// Mobilized unit end-bearing stress q(z) in MPa for a tip displacement z.
///
/// Same shape as the shaft law, built on kq and the ultimate unit base
/// resistance.
pub fn end_bearing(displacement_m: f64, limit_mpa: f64, kq_mpa_per_m: f64) -> f64 {
    tri_linear(
        displacement_m,
        limit_mpa / 2.0,
        kq_mpa_per_m,
        Some((limit_mpa, kq_mpa_per_m / 5.0)),
    )
}

/// A tri-linear soil reaction curve exported for an external beam model.
///
/// Holds the branch parameters of a lateral reaction law, already scaled
/// for the slice it belongs to (forces per unit displacement).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionCurve {
    /// First-branch limiting reaction (MN/m of pile)
    pub q1: f64,
    /// First-branch stiffness (MN/m per m of displacement)
    pub k1: f64,
    /// Optional second branch (limiting reaction, stiffness)
    pub second: Option<(f64, f64)>,
}

impl ReactionCurve {
    /// Reaction mobilized at a lateral displacement (MN/m of pile).
    pub fn reaction(&self, displacement_m: f64) -> f64 {
        tri_linear(displacement_m, self.q1, self.k1, self.second)
    }

    /// Initial (first-branch) stiffness.
    pub fn initial_stiffness(&self) -> f64 {
        self.k1
    }
}

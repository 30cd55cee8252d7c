//! # Pile Mesh
//!
//! Partitions a pile's height into layer-respecting, roughly-uniform
//! slices.
//!
//! ## Algorithm
//!
//! For each soil layer overlapping the pile's vertical extent:
//!
//! 1. Clip the layer interval to [pile bottom, pile top]; skip layers with
//!    no positive clipped extent.
//! 2. Within the clipped interval choose `n = ceil(h / target)` slices, so
//!    the actual slice height `h / n` never exceeds the target and no slice
//!    straddles a layer boundary.
//! 3. Emit slices top to bottom, resolving each slice's soil layer at its
//!    midpoint.
//!
//! Slices are stored head-to-tip (top level descending). The tip-to-head
//! equilibrium sweep therefore traverses the storage in reverse.

use serde::{Deserialize, Serialize};

use crate::errors::{PileError, PileResult};
use crate::slice::{ShaftProperties, Slice};
use crate::soil::Lithology;

/// The ordered slice decomposition of a pile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PileMesh {
    slices: Vec<Slice>,
}

impl PileMesh {
    /// Build the mesh for a pile extent over a lithology.
    ///
    /// Fails with [`PileError::Stratigraphy`] when the lithology does not
    /// contiguously cover [level_bottom, level_top]; no mesh is built in
    /// that case.
    pub fn build(
        shaft: ShaftProperties,
        lithology: &Lithology,
        level_top_m: f64,
        level_bottom_m: f64,
        target_thickness_m: f64,
    ) -> PileResult<Self> {
        lithology.check_coverage(level_top_m, level_bottom_m)?;

        let mut slices = Vec::new();
        for layer in lithology.layers() {
            let clipped_top = layer.level_top_m.min(level_top_m);
            let clipped_bottom = layer.level_bottom_m.max(level_bottom_m);
            let extent = clipped_top - clipped_bottom;
            if extent <= 0.0 {
                // Layer entirely above or below the pile.
                continue;
            }

            let count = (extent / target_thickness_m).ceil().max(1.0) as usize;
            let height = extent / count as f64;

            for i in 0..count {
                let slice_top = clipped_top - i as f64 * height;
                let midpoint = slice_top - height / 2.0;
                let slice_layer = lithology.layer_at(midpoint).ok_or_else(|| {
                    PileError::stratigraphy(format!(
                        "No soil layer found at level {midpoint:.3} m"
                    ))
                })?;
                slices.push(Slice {
                    level_top_m: slice_top,
                    height_m: height,
                    layer: slice_layer.clone(),
                    shaft,
                });
            }
        }

        if slices.is_empty() {
            return Err(PileError::stratigraphy(
                "Discretization produced no slices (zero pile height?)",
            ));
        }

        Ok(PileMesh { slices })
    }

    /// The slices, head to tip (top level descending).
    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Number of slices
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Whether the mesh holds no slices (never true for a built mesh)
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Sum of all slice heights (m); equals the pile height for a valid
    /// build.
    pub fn total_height_m(&self) -> f64 {
        self.slices.iter().map(|slice| slice.height_m).sum()
    }

    /// Topmost slice
    pub fn head_slice(&self) -> &Slice {
        &self.slices[0]
    }

    /// Bottommost slice
    pub fn tip_slice(&self) -> &Slice {
        &self.slices[self.slices.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nf_factors::PileCategory;
    use crate::soil::{SoilLayer, SoilType};

    fn shaft() -> ShaftProperties {
        ShaftProperties {
            category: PileCategory::BoredSimple,
            modulus_mpa: 20_000.0,
            tip_diameter_m: 0.6,
            shaft_diameter_m: 0.6,
        }
    }

    fn layer(name: &str, top: f64, bottom: f64, soil_type: SoilType) -> SoilLayer {
        SoilLayer {
            name: name.to_string(),
            level_top_m: top,
            level_bottom_m: bottom,
            soil_type,
            limit_pressure_mpa: 1.5,
            creep_pressure_mpa: 0.8,
            menard_modulus_mpa: 15.0,
        }
    }

    fn two_layer_lithology() -> Lithology {
        Lithology::new(vec![
            layer("Clay", 0.0, -4.3, SoilType::ClaySilt),
            layer("Sand", -4.3, -15.0, SoilType::SandGravel),
        ])
    }

    #[test]
    fn test_mesh_covers_pile_height() {
        let mesh =
            PileMesh::build(shaft(), &two_layer_lithology(), 0.0, -10.0, 0.2).unwrap();
        assert!((mesh.total_height_m() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_slice_straddles_a_layer() {
        let mesh =
            PileMesh::build(shaft(), &two_layer_lithology(), 0.0, -10.0, 0.2).unwrap();
        for slice in mesh.slices() {
            assert!(slice.level_top_m <= slice.layer.level_top_m + 1e-9);
            assert!(slice.level_bottom_m() >= slice.layer.level_bottom_m - 1e-9);
        }
    }

    #[test]
    fn test_slice_heights_respect_target() {
        let mesh =
            PileMesh::build(shaft(), &two_layer_lithology(), 0.0, -10.0, 0.2).unwrap();
        for slice in mesh.slices() {
            assert!(slice.height_m > 0.0);
            assert!(slice.height_m <= 0.2 + 1e-9);
        }
    }

    #[test]
    fn test_head_to_tip_ordering() {
        let mesh =
            PileMesh::build(shaft(), &two_layer_lithology(), 0.0, -10.0, 0.2).unwrap();
        for pair in mesh.slices().windows(2) {
            assert!(pair[0].level_top_m > pair[1].level_top_m);
        }
        assert!((mesh.head_slice().level_top_m - 0.0).abs() < 1e-12);
        assert!((mesh.tip_slice().level_bottom_m() - (-10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_layers_below_pile_are_skipped() {
        // Lithology described down to -15 m, pile stops at -10 m: no slice
        // below the pile tip, and no degenerate zero-height slice.
        let mesh =
            PileMesh::build(shaft(), &two_layer_lithology(), 0.0, -10.0, 0.2).unwrap();
        for slice in mesh.slices() {
            assert!(slice.level_bottom_m() >= -10.0 - 1e-9);
        }
    }

    #[test]
    fn test_missing_depth_range_fails_before_meshing() {
        let gappy = Lithology::new(vec![
            layer("Clay", 0.0, -4.0, SoilType::ClaySilt),
            layer("Sand", -6.0, -15.0, SoilType::SandGravel),
        ]);
        let err = PileMesh::build(shaft(), &gappy, 0.0, -10.0, 0.2).unwrap_err();
        assert_eq!(err.error_code(), "STRATIGRAPHY");
    }

    #[test]
    fn test_midpoint_layer_resolution() {
        let mesh =
            PileMesh::build(shaft(), &two_layer_lithology(), 0.0, -10.0, 0.2).unwrap();
        for slice in mesh.slices() {
            let mid = slice.level_middle_m();
            if mid > -4.3 {
                assert_eq!(slice.layer.name, "Clay");
            } else {
                assert_eq!(slice.layer.name, "Sand");
            }
        }
    }
}

//! # Pilecalc CLI Application
//!
//! Terminal front-end for the pile_core calculation engine: prompts for the
//! main pile parameters, runs the bearing-capacity model and the settlement
//! sweep on a two-layer demo profile, and prints the results (plus their
//! JSON form for API use).

use std::io::{self, BufRead, Write};

use pile_core::nf_factors::{Combination, PileCategory};
use pile_core::pile::{Pile, PileInput};
use pile_core::settlement::SettlementOptions;
use pile_core::soil::{Lithology, SoilLayer, SoilType};
use pile_core::solver::NewtonRaphson;

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn main() {
    println!("Pilecalc CLI - Pressiometric Pile Calculator (NF P94-262)");
    println!("=========================================================");
    println!();

    let length_m = prompt_f64("Enter pile length (m) [10.0]: ", 10.0);
    let diameter_m = prompt_f64("Enter pile diameter (m) [0.6]: ", 0.6);

    println!();
    println!("Calculating bored pile (FS) in a clay-over-sand profile...");
    println!();

    let lithology = Lithology::new(vec![
        SoilLayer {
            name: "Silty clay".to_string(),
            level_top_m: 0.0,
            level_bottom_m: -0.4 * length_m,
            soil_type: SoilType::ClaySilt,
            limit_pressure_mpa: 0.9,
            creep_pressure_mpa: 0.5,
            menard_modulus_mpa: 9.0,
        },
        SoilLayer {
            name: "Dense sand".to_string(),
            level_top_m: -0.4 * length_m,
            level_bottom_m: -(length_m + 5.0),
            soil_type: SoilType::SandGravel,
            limit_pressure_mpa: 2.2,
            creep_pressure_mpa: 1.3,
            menard_modulus_mpa: 22.0,
        },
    ]);

    let input = PileInput {
        label: "CLI-Demo".to_string(),
        category: PileCategory::BoredSimple,
        level_top_m: 0.0,
        level_bottom_m: -length_m,
        modulus_mpa: 20_000.0,
        tip_diameter_m: diameter_m,
        shaft_diameter_m: diameter_m,
        slice_thickness_m: 0.2,
    };

    let pile = match Pile::new(input, lithology) {
        Ok(pile) => pile,
        Err(e) => {
            report_error(&e);
            return;
        }
    };

    let finder = NewtonRaphson::default();
    let summary = match pile.resistance_summary() {
        Ok(summary) => summary,
        Err(e) => {
            report_error(&e);
            return;
        }
    };

    println!("═══════════════════════════════════════");
    println!("  PILE CAPACITY RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Pile:");
    println!("  Type:      {} - {}", pile.abbreviation(), pile.description());
    println!("  Class:     {}", pile.class());
    println!("  Length:    {:.1} m", pile.height_m());
    println!("  Section:   {:.4} m²", pile.tip_area_m2());
    println!("  Perimeter: {:.3} m", pile.perimeter_m());
    println!();
    println!("Resistances:");
    println!("  Rs    = {:8.1} kN   (shaft)", 1000.0 * summary.skin_friction_mn);
    println!("  Rb    = {:8.1} kN   (base)", 1000.0 * summary.base_mn);
    println!("  Rc    = {:8.1} kN   (total)", 1000.0 * summary.total_mn);
    println!("  Rb;k  = {:8.1} kN", 1000.0 * summary.characteristic_base_mn);
    println!(
        "  Rs;k  = {:8.1} kN",
        1000.0 * summary.characteristic_skin_friction_compression_mn
    );
    println!("  ple*  = {:8.3} MPa", summary.equivalent_limit_pressure_mpa);
    println!("  Def   = {:8.2} m", summary.effective_embedment_m);
    println!("  kp    = {:8.3}", summary.bearing_factor);
    println!();
    println!("Allowable compression:");
    for combination in Combination::ALL {
        match pile.allowable_compression_mn(combination) {
            Ok(value) => println!("  {:8} ≤ {:8.1} kN", combination.to_string(), 1000.0 * value),
            Err(e) => {
                report_error(&e);
                return;
            }
        }
    }

    println!();
    println!("Settlement curve (load steps up to Rc):");
    match pile.settlement_curve(&finder, SettlementOptions::default()) {
        Ok(curve) => {
            println!("  {:>12}  {:>14}", "Load (kN)", "Settlement (mm)");
            for point in &curve.points {
                println!(
                    "  {:>12.1}  {:>14.2}",
                    1000.0 * point.head_load_mn,
                    1000.0 * point.head_settlement_m
                );
            }
            if !curve.skipped_loads_mn.is_empty() {
                println!(
                    "  ({} load level(s) without equilibrium were skipped)",
                    curve.skipped_loads_mn.len()
                );
            }

            println!();
            println!("JSON Output (for API use):");
            if let Ok(json) = serde_json::to_string_pretty(&curve) {
                println!("{}", json);
            }
        }
        Err(e) => report_error(&e),
    }
}

fn report_error(e: &pile_core::PileError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

//! # NF P94-262 Classification and Partial Factors
//!
//! Static design-code data for deep foundations per NF P94-262 (French
//! application standard of Eurocode 7 for piles).
//!
//! ## Overview
//!
//! Characteristic resistances are obtained from computed resistances through
//! model partial factors:
//!
//! ```text
//! Rb;k = Rb / (gamma_rd1 × gamma_rd2)
//! Rs;k = Rs / (gamma_rd1 × gamma_rd2)
//! ```
//!
//! where gamma_rd1 depends on the pile category (and on compression vs.
//! tension) and gamma_rd2 is a spread factor.
//!
//! ## Tables
//!
//! | Table   | Content                                  |
//! |---------|------------------------------------------|
//! | A.1     | Pile categories, classes, abbreviations  |
//! | F.2.1   | Model factors gamma_rd1, gamma_rd2       |
//!
//! All tables are immutable data. The default set is exposed through
//! [`default_tables`] and can be substituted wholesale for a different
//! standard revision.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{PileError, PileResult};

// ============================================================================
// NF P94-262 Code Section References
// ============================================================================

/// NF P94-262 section references for resistance checks and factors.
///
/// These constants provide traceable references to the standard.
pub mod nf_ref {
    /// Pile categories and classes
    pub const CLASSIFICATION: &str = "NF P94-262 Annex A, Table A.1";
    /// Model partial factors gamma_rd1 / gamma_rd2
    pub const MODEL_FACTORS: &str = "NF P94-262 Table F.2.1";
    /// Unit skin friction qs
    pub const SKIN_FRICTION: &str = "NF P94-262 F.5.2";
    /// Ceiling values qs,max
    pub const MAX_SKIN_FRICTION: &str = "NF P94-262 Table F.5.2.3";
    /// Pile-soil adhesion factor alpha
    pub const ADHESION_FACTOR: &str = "NF P94-262 Table F.5.2.1";
    /// fsol friction curves
    pub const FSOL_CURVES: &str = "NF P94-262 Table F.5.2.2";
    /// Base resistance Rb
    pub const BASE_RESISTANCE: &str = "NF P94-262 F.4";
    /// Pressiometric bearing factor kp
    pub const BEARING_FACTOR: &str = "NF P94-262 F.4.2";
    /// Equivalent net limit pressure ple*
    pub const EQUIVALENT_LIMIT_PRESSURE: &str = "NF P94-262 F.4.2 (3)";
    /// Effective embedment depth Def
    pub const EFFECTIVE_EMBEDMENT: &str = "NF P94-262 Eq. F.4.2.6";
    /// Frank-Zhao mobilization laws
    pub const MOBILIZATION_LAWS: &str = "NF P94-262 Annex L";
}

// ============================================================================
// Pile categories (Table A.1)
// ============================================================================

/// Pile installation category per NF P94-262 Annex A, Table A.1.
///
/// The category fixes the pile class (used for the bearing factor kp,max),
/// the adhesion factor alpha and the ceiling friction qs,max, and the model
/// partial factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PileCategory {
    /// 1 - Bored, no support fluid (piles and barrettes)
    BoredSimple,
    /// 2 - Bored under slurry (piles and barrettes)
    BoredSlurry,
    /// 3 - Bored and cased, casing left in place
    BoredCasedLost,
    /// 4 - Bored and cased, casing recovered
    BoredCasedRecovered,
    /// 5 - Bored (dry or slurry) with grooved shaft, or hand-dug shafts
    BoredGrooved,
    /// 6 - Continuous flight auger, single or double rotation
    ContinuousFlightAuger,
    /// 7 - Screw cast-in-place
    ScrewCast,
    /// 8 - Screw with lost casing
    ScrewCased,
    /// 9 - Driven precast or prestressed concrete
    DrivenPrecast,
    /// 10 - Driven coated (concrete, mortar, grout)
    DrivenCoated,
    /// 11 - Driven cast-in-place
    DrivenCastInPlace,
    /// 12 - Driven closed-end steel
    DrivenSteelClosed,
    /// 13 - Driven open-end steel
    DrivenSteelOpen,
    /// 14 - Driven H section
    DrivenHSection,
    /// 15 - Driven grouted H section
    DrivenHSectionGrouted,
    /// 16 - Driven sheet piles
    DrivenSheetPile,
    /// 17 - Type I micropile
    MicropileTypeI,
    /// 18 - Type II micropile
    MicropileTypeII,
    /// 19 - Pile or micropile grouted, IGU mode (type III)
    GroutedIgu,
    /// 20 - Pile or micropile grouted, IRS mode (type IV)
    GroutedIrs,
}

impl PileCategory {
    /// All categories, in Table A.1 order
    pub const ALL: [PileCategory; 20] = [
        PileCategory::BoredSimple,
        PileCategory::BoredSlurry,
        PileCategory::BoredCasedLost,
        PileCategory::BoredCasedRecovered,
        PileCategory::BoredGrooved,
        PileCategory::ContinuousFlightAuger,
        PileCategory::ScrewCast,
        PileCategory::ScrewCased,
        PileCategory::DrivenPrecast,
        PileCategory::DrivenCoated,
        PileCategory::DrivenCastInPlace,
        PileCategory::DrivenSteelClosed,
        PileCategory::DrivenSteelOpen,
        PileCategory::DrivenHSection,
        PileCategory::DrivenHSectionGrouted,
        PileCategory::DrivenSheetPile,
        PileCategory::MicropileTypeI,
        PileCategory::MicropileTypeII,
        PileCategory::GroutedIgu,
        PileCategory::GroutedIrs,
    ];

    /// Category number in Table A.1 (1 to 20)
    pub fn number(&self) -> u8 {
        PileCategory::ALL
            .iter()
            .position(|c| c == self)
            .map(|i| i as u8 + 1)
            .unwrap_or(0)
    }

    /// Look up a category by its Table A.1 number.
    pub fn from_number(number: u8) -> PileResult<Self> {
        if (1..=20).contains(&number) {
            Ok(PileCategory::ALL[number as usize - 1])
        } else {
            Err(PileError::invalid_input(
                "category",
                number.to_string(),
                "Pile category must be between 1 and 20 (Table A.1)",
            ))
        }
    }

    /// Pile class (1 to 8) per Table A.1, used for the bearing factor kp,max.
    pub fn class(&self) -> u8 {
        match self {
            PileCategory::BoredSimple
            | PileCategory::BoredSlurry
            | PileCategory::BoredCasedLost
            | PileCategory::BoredCasedRecovered
            | PileCategory::BoredGrooved
            | PileCategory::MicropileTypeI
            | PileCategory::MicropileTypeII => 1,
            PileCategory::ContinuousFlightAuger => 2,
            PileCategory::ScrewCast | PileCategory::ScrewCased => 3,
            PileCategory::DrivenPrecast
            | PileCategory::DrivenCoated
            | PileCategory::DrivenCastInPlace
            | PileCategory::DrivenSteelClosed => 4,
            PileCategory::DrivenSteelOpen => 5,
            PileCategory::DrivenHSection | PileCategory::DrivenHSectionGrouted => 6,
            PileCategory::DrivenSheetPile => 7,
            PileCategory::GroutedIgu | PileCategory::GroutedIrs => 8,
        }
    }

    /// Abbreviation used in Table A.1
    pub fn abbreviation(&self) -> &'static str {
        match self {
            PileCategory::BoredSimple => "FS",
            PileCategory::BoredSlurry => "FB",
            PileCategory::BoredCasedLost => "FTP",
            PileCategory::BoredCasedRecovered => "FTR",
            PileCategory::BoredGrooved => "FSR, FBR, PU",
            PileCategory::ContinuousFlightAuger => "FTC, FTCD",
            PileCategory::ScrewCast => "VM",
            PileCategory::ScrewCased => "VT",
            PileCategory::DrivenPrecast => "BPF, BPR",
            PileCategory::DrivenCoated => "BE",
            PileCategory::DrivenCastInPlace => "BM",
            PileCategory::DrivenSteelClosed => "BAF",
            PileCategory::DrivenSteelOpen => "BAO",
            PileCategory::DrivenHSection => "HB",
            PileCategory::DrivenHSectionGrouted => "HBi",
            PileCategory::DrivenSheetPile => "PP",
            PileCategory::MicropileTypeI => "M1",
            PileCategory::MicropileTypeII => "M2",
            PileCategory::GroutedIgu => "PIGU, MIGU",
            PileCategory::GroutedIrs => "PIRS, MIRS",
        }
    }

    /// Human-readable description from Table A.1
    pub fn description(&self) -> &'static str {
        match self {
            PileCategory::BoredSimple => "Bored pile, no support fluid (piles and barrettes)",
            PileCategory::BoredSlurry => "Bored pile under slurry (piles and barrettes)",
            PileCategory::BoredCasedLost => "Bored and cased pile (casing left in place)",
            PileCategory::BoredCasedRecovered => "Bored and cased pile (casing recovered)",
            PileCategory::BoredGrooved => "Bored pile with grooved shaft, or hand-dug shaft",
            PileCategory::ContinuousFlightAuger => {
                "Continuous flight auger pile, single or double rotation"
            }
            PileCategory::ScrewCast => "Screw cast-in-place pile",
            PileCategory::ScrewCased => "Screw pile with lost casing",
            PileCategory::DrivenPrecast => "Driven precast or prestressed concrete pile",
            PileCategory::DrivenCoated => "Driven coated pile (concrete, mortar, grout)",
            PileCategory::DrivenCastInPlace => "Driven cast-in-place pile",
            PileCategory::DrivenSteelClosed => "Driven closed-end steel pile",
            PileCategory::DrivenSteelOpen => "Driven open-end steel pile",
            PileCategory::DrivenHSection => "Driven H-section pile",
            PileCategory::DrivenHSectionGrouted => "Driven grouted H-section pile",
            PileCategory::DrivenSheetPile => "Driven sheet piles",
            PileCategory::MicropileTypeI => "Type I micropile",
            PileCategory::MicropileTypeII => "Type II micropile",
            PileCategory::GroutedIgu => "Grouted pile or micropile, IGU mode (type III)",
            PileCategory::GroutedIrs => "Grouted pile or micropile, IRS mode (type IV)",
        }
    }
}

impl fmt::Display for PileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.abbreviation(), self.description())
    }
}

// ============================================================================
// Model partial factors (Table F.2.1)
// ============================================================================

/// Model partial factors per pile category, Table F.2.1.
///
/// Characteristic resistances divide the computed resistance by
/// `gamma_rd1 × gamma_rd2`, with gamma_rd1 depending on the loading
/// direction (compression vs. tension).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartialFactors {
    /// gamma_rd1 in compression
    pub gamma_rd1_comp: f64,
    /// gamma_rd1 in tension
    pub gamma_rd1_trac: f64,
    /// gamma_rd2 (spread factor)
    pub gamma_rd2: f64,
}

impl PartialFactors {
    /// Combined divisor for characteristic compression resistance
    pub fn compression_divisor(&self) -> f64 {
        self.gamma_rd1_comp * self.gamma_rd2
    }

    /// Combined divisor for characteristic tension resistance
    pub fn tension_divisor(&self) -> f64 {
        self.gamma_rd1_trac * self.gamma_rd2
    }
}

// ============================================================================
// Injectable table set
// ============================================================================

/// The injectable set of design-code tables.
///
/// Built once with the NF P94-262 values; substitute a whole set to run an
/// analysis against a different standard revision deterministically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormTables {
    /// Model factors per category number (Table F.2.1)
    pub partial_factors: BTreeMap<u8, PartialFactors>,
}

impl NormTables {
    /// The NF P94-262 table set.
    pub fn nf_p94_262() -> Self {
        let mut partial_factors = BTreeMap::new();
        for category in PileCategory::ALL {
            // Table F.2.1: piles with a grout or coating interface carry
            // gamma_rd1 = 2.0; all others 1.4 (compression) / 1.7 (tension).
            let factors = match category {
                PileCategory::DrivenCoated
                | PileCategory::DrivenHSectionGrouted
                | PileCategory::MicropileTypeI
                | PileCategory::MicropileTypeII
                | PileCategory::GroutedIgu
                | PileCategory::GroutedIrs => PartialFactors {
                    gamma_rd1_comp: 2.0,
                    gamma_rd1_trac: 2.0,
                    gamma_rd2: 1.1,
                },
                _ => PartialFactors {
                    gamma_rd1_comp: 1.4,
                    gamma_rd1_trac: 1.7,
                    gamma_rd2: 1.1,
                },
            };
            partial_factors.insert(category.number(), factors);
        }
        NormTables { partial_factors }
    }

    /// Model factors for a category.
    pub fn partial_factors_for(&self, category: PileCategory) -> PileResult<PartialFactors> {
        self.partial_factors
            .get(&category.number())
            .copied()
            .ok_or_else(|| {
                PileError::invalid_input(
                    "category",
                    category.number().to_string(),
                    "No model factors defined for this category",
                )
            })
    }
}

impl Default for NormTables {
    fn default() -> Self {
        NormTables::nf_p94_262()
    }
}

static DEFAULT_TABLES: Lazy<NormTables> = Lazy::new(NormTables::nf_p94_262);

/// The default (NF P94-262) table set, built lazily and shared.
pub fn default_tables() -> &'static NormTables {
    &DEFAULT_TABLES
}

// ============================================================================
// Design situations and combinations
// ============================================================================

/// Design situation of a load case (EN 1990 families).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DesignSituation {
    /// Persistent situations
    #[default]
    Durable,
    /// Transient situations (construction stages, maintenance)
    Transient,
    /// Accidental situations
    Accidental,
    /// Seismic situations
    Seismic,
}

impl DesignSituation {
    /// All situations, for UI selection
    pub const ALL: [DesignSituation; 4] = [
        DesignSituation::Durable,
        DesignSituation::Transient,
        DesignSituation::Accidental,
        DesignSituation::Seismic,
    ];

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            DesignSituation::Durable => "Durable",
            DesignSituation::Transient => "Transient",
            DesignSituation::Accidental => "Accidental",
            DesignSituation::Seismic => "Seismic",
        }
    }
}

impl fmt::Display for DesignSituation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for DesignSituation {
    type Err = PileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "durable" | "persistent" => Ok(DesignSituation::Durable),
            "transient" => Ok(DesignSituation::Transient),
            "accidental" => Ok(DesignSituation::Accidental),
            "seismic" => Ok(DesignSituation::Seismic),
            _ => Err(PileError::invalid_configuration(
                "situation",
                s,
                "one of: durable, transient, accidental, seismic",
            )),
        }
    }
}

/// Load combination family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combination {
    /// Serviceability, quasi-permanent
    ElsQp,
    /// Serviceability, characteristic
    ElsCar,
    /// Ultimate, fundamental
    Elu,
    /// Ultimate, accidental
    Ela,
}

impl Combination {
    /// All combinations, for UI selection
    pub const ALL: [Combination; 4] = [
        Combination::ElsQp,
        Combination::ElsCar,
        Combination::Elu,
        Combination::Ela,
    ];

    /// Whether this combination is meaningful in a given design situation.
    ///
    /// Persistent and transient situations use ELS QP / ELS CAR / ELU;
    /// accidental and seismic situations use ELA.
    pub fn is_allowed_for(&self, situation: DesignSituation) -> bool {
        match situation {
            DesignSituation::Durable | DesignSituation::Transient => matches!(
                self,
                Combination::ElsQp | Combination::ElsCar | Combination::Elu
            ),
            DesignSituation::Accidental | DesignSituation::Seismic => {
                matches!(self, Combination::Ela)
            }
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Combination::ElsQp => "ELS QP",
            Combination::ElsCar => "ELS CAR",
            Combination::Elu => "ELU",
            Combination::Ela => "ELA",
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Combination {
    type Err = PileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s
            .trim()
            .to_ascii_uppercase()
            .replace(' ', "_")
            .replace('-', "_")
            .as_str()
        {
            "ELS_QP" => Ok(Combination::ElsQp),
            "ELS_CAR" => Ok(Combination::ElsCar),
            "ELU" => Ok(Combination::Elu),
            "ELA" => Ok(Combination::Ela),
            _ => Err(PileError::invalid_configuration(
                "combination",
                s,
                "one of: ELS_QP, ELS_CAR, ELU, ELA",
            )),
        }
    }
}

/// Loading stage selecting a soil-reaction mobilization law.
///
/// The subgrade reaction exported for an external beam model differs between
/// short-term, long-term, ULS and seismic loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LoadingStage {
    /// Short-term loading
    #[default]
    ShortTerm,
    /// Long-term (sustained) loading
    LongTerm,
    /// Ultimate limit state loading
    Uls,
    /// Seismic loading
    Seismic,
}

impl LoadingStage {
    /// All stages, for UI selection
    pub const ALL: [LoadingStage; 4] = [
        LoadingStage::ShortTerm,
        LoadingStage::LongTerm,
        LoadingStage::Uls,
        LoadingStage::Seismic,
    ];

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            LoadingStage::ShortTerm => "Short-term",
            LoadingStage::LongTerm => "Long-term",
            LoadingStage::Uls => "ULS",
            LoadingStage::Seismic => "Seismic",
        }
    }
}

impl fmt::Display for LoadingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for LoadingStage {
    type Err = PileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s
            .trim()
            .to_ascii_lowercase()
            .replace(' ', "-")
            .replace('_', "-")
            .as_str()
        {
            "short-term" => Ok(LoadingStage::ShortTerm),
            "long-term" => Ok(LoadingStage::LongTerm),
            "uls" => Ok(LoadingStage::Uls),
            "seismic" => Ok(LoadingStage::Seismic),
            _ => Err(PileError::invalid_configuration(
                "loading_stage",
                s,
                "one of: short-term, long-term, uls, seismic",
            )),
        }
    }
}

//! # Project Data Structures
//!
//! The `PileProject` struct is the root container for an analysis campaign.
//! Projects serialize to `.pile` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! PileProject
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: AnalysisSettings (standard, discretization default)
//! └── items: HashMap<Uuid, PileRecord> (pile + lithology definitions)
//! ```
//!
//! A [`PileRecord`] is pure input data; [`PileRecord::build`] turns it into
//! an engine [`Pile`] (validating stratigraphy and meshing on the way).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::PileResult;
use crate::pile::{Pile, PileInput, DEFAULT_SLICE_THICKNESS_M};
use crate::soil::Lithology;

/// Current schema version for .pile files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// A pile definition together with the lithology it is embedded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PileRecord {
    /// Pile input parameters
    pub input: PileInput,

    /// Soil profile, top to bottom
    pub lithology: Lithology,
}

impl PileRecord {
    /// Build the engine pile from this record.
    pub fn build(&self) -> PileResult<Pile> {
        Pile::new(self.input.clone(), self.lithology.clone())
    }
}

/// Root project container serialized to `.pile` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PileProject {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Analysis settings (standard revision, defaults)
    pub settings: AnalysisSettings,

    /// All pile records, keyed by UUID
    pub items: HashMap<Uuid, PileRecord>,
}

impl PileProject {
    /// Create a new empty project.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pile_core::project::PileProject;
    ///
    /// let project = PileProject::new("Jane Engineer", "26-042", "ACME Corp");
    /// assert_eq!(project.meta.engineer, "Jane Engineer");
    /// ```
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        PileProject {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: AnalysisSettings::default(),
            items: HashMap::new(),
        }
    }

    /// Add a pile record; returns its assigned UUID.
    pub fn add_item(&mut self, record: PileRecord) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, record);
        self.touch();
        id
    }

    /// Remove a pile record by UUID; returns it if it existed.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<PileRecord> {
        let record = self.items.remove(id);
        if record.is_some() {
            self.touch();
        }
        record
    }

    /// Get a pile record by UUID.
    pub fn get_item(&self, id: &Uuid) -> Option<&PileRecord> {
        self.items.get(id)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Number of pile records
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl Default for PileProject {
    fn default() -> Self {
        PileProject::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Analysis settings shared by all records of a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Design standard revision (e.g., "NF P94-262:2012+A1")
    pub standard: String,

    /// Default target slice thickness for new piles (m)
    pub default_slice_thickness_m: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            standard: "NF P94-262:2012+A1".to_string(),
            default_slice_thickness_m: DEFAULT_SLICE_THICKNESS_M,
        }
    }
}

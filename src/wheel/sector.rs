use std::f64::consts::TAU;
use std::fmt;
use std::path::PathBuf;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::tuning::WheelTuning;

/// One wedge of the wheel: prize label, draw weight, display color.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sector {
    pub label: String,
    /// Relative draw weight. Weights are normalized by their total, so they
    /// need not sum to 1.
    pub probability: f64,
    /// sRGB triple; converted to a render color only in the UI layer.
    pub color: [f32; 3],
}

/// Ordered sector list. Order is significant: sector `i` occupies the arc
/// `[i * arc, (i + 1) * arc)` with `arc = TAU / len`. Configured once at
/// startup, immutable afterwards.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct SectorTable {
    sectors: Vec<Sector>,
}

/// Rejected sector configurations. All of these are fatal at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum SectorConfigError {
    Empty,
    BadWeight { label: String, weight: f64 },
    ZeroTotalWeight,
}

impl fmt::Display for SectorConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "sector list is empty"),
            Self::BadWeight { label, weight } => {
                write!(f, "sector {label:?} has invalid weight {weight}")
            }
            Self::ZeroTotalWeight => write!(f, "no sector has a positive weight"),
        }
    }
}

impl SectorTable {
    /// Validate and build a table. Empty lists, negative or non-finite
    /// weights, and an all-zero total are rejected here so the selector
    /// never has to.
    pub fn new(sectors: Vec<Sector>) -> Result<Self, SectorConfigError> {
        if sectors.is_empty() {
            return Err(SectorConfigError::Empty);
        }
        for sector in &sectors {
            if !sector.probability.is_finite() || sector.probability < 0.0 {
                return Err(SectorConfigError::BadWeight {
                    label: sector.label.clone(),
                    weight: sector.probability,
                });
            }
        }
        let total: f64 = sectors.iter().map(|s| s.probability).sum();
        if total <= 0.0 {
            return Err(SectorConfigError::ZeroTotalWeight);
        }
        Ok(Self { sectors })
    }

    /// The built-in prize table.
    pub fn with_defaults() -> Self {
        Self::new(vec![
            Sector {
                label: "Stack".into(),
                probability: 0.40,
                color: [1.0, 0.533, 0.133],
            },
            Sector {
                label: "10".into(),
                probability: 0.35,
                color: [0.0, 0.733, 1.0],
            },
            Sector {
                label: "50".into(),
                probability: 0.20,
                color: [0.0, 1.0, 0.733],
            },
            Sector {
                label: "100".into(),
                probability: 0.04,
                color: [1.0, 0.733, 0.0],
            },
            Sector {
                label: "200".into(),
                probability: 0.01,
                color: [0.733, 0.0, 1.0],
            },
        ])
        .expect("built-in sector table is valid")
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    /// Angular width of one sector.
    pub fn arc(&self) -> f64 {
        TAU / self.sectors.len() as f64
    }

    pub fn total_weight(&self) -> f64 {
        self.sectors.iter().map(|s| s.probability).sum()
    }

    /// Weight of sector `index`, normalized by the table total.
    pub fn normalized(&self, index: usize) -> f64 {
        self.sectors[index].probability / self.total_weight()
    }

    pub fn get(&self, index: usize) -> &Sector {
        &self.sectors[index]
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// Path to the sectors file.
    pub fn file_path() -> PathBuf {
        WheelTuning::data_dir().join("sectors.ron")
    }

    /// Load from file, or create the defaults if not found. An unreadable or
    /// unparseable file falls back to the defaults; a file that parses into
    /// an invalid table is an error for the caller to treat as fatal.
    pub fn load_or_default() -> Result<Self, SectorConfigError> {
        let path = Self::file_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match ron::from_str::<SectorTable>(&contents) {
                    Ok(parsed) => return Self::new(parsed.sectors),
                    Err(e) => {
                        warn!("Failed to parse sectors.ron: {e}, using defaults");
                    }
                },
                Err(e) => {
                    warn!("Failed to read sectors.ron: {e}, using defaults");
                }
            }
        }
        let table = Self::with_defaults();
        table.save();
        Ok(table)
    }

    /// Save the current table to file.
    pub fn save(&self) {
        let path = Self::file_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let pretty = ron::ser::PrettyConfig::default();
        match ron::ser::to_string_pretty(self, pretty) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    warn!("Failed to write sectors.ron: {e}");
                }
            }
            Err(e) => {
                warn!("Failed to serialize sectors: {e}");
            }
        }
    }
}

use rand::Rng;
use serde::Serialize;

use super::sector::SectorTable;
use super::selector;

/// Observed draw frequencies for a batch of selector-only spins.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub num_spins: u64,
    /// One row per sector, in table order.
    pub rows: Vec<SimulationRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationRow {
    pub label: String,
    pub count: u64,
    /// Observed frequency over the batch.
    pub observed: f64,
    /// Configured probability, normalized by total weight.
    pub configured: f64,
}

/// Draw `num_spins` outcomes through the weighted selector alone and count
/// them per sector. Exercises none of the animation machinery; this is the
/// statistical-validation path, not the interactive one.
pub fn simulate<R: Rng + ?Sized>(
    rng: &mut R,
    table: &SectorTable,
    num_spins: u64,
) -> SimulationReport {
    let mut counts = vec![0u64; table.len()];
    for _ in 0..num_spins {
        counts[selector::pick(rng, table)] += 1;
    }

    let rows = table
        .sectors()
        .iter()
        .enumerate()
        .map(|(i, sector)| SimulationRow {
            label: sector.label.clone(),
            count: counts[i],
            observed: if num_spins == 0 {
                0.0
            } else {
                counts[i] as f64 / num_spins as f64
            },
            configured: table.normalized(i),
        })
        .collect();

    SimulationReport { num_spins, rows }
}

impl SimulationReport {
    /// Plain-text table for the CLI.
    pub fn print(&self) {
        println!("Simulated {} spins:", self.num_spins);
        for row in &self.rows {
            println!(
                "  {:<12} {:>8}  observed {:>6.2}%  configured {:>6.2}%",
                row.label,
                row.count,
                row.observed * 100.0,
                row.configured * 100.0,
            );
        }
    }
}

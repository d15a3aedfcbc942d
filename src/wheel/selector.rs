use rand::Rng;

use super::sector::SectorTable;

/// Draw one sector index with probability proportional to its weight.
///
/// Pure apart from the RNG: no state, reentrant.
pub fn pick<R: Rng + ?Sized>(rng: &mut R, table: &SectorTable) -> usize {
    let roll = rng.random_range(0.0..table.total_weight());
    index_for_roll(table, roll)
}

/// Resolve a roll in `[0, total_weight)` to a sector index by cumulative
/// scan. A roll exactly on a cumulative boundary resolves to the earlier
/// index.
fn index_for_roll(table: &SectorTable, roll: f64) -> usize {
    let mut cumulative = 0.0;
    for (i, sector) in table.sectors().iter().enumerate() {
        cumulative += sector.probability;
        if roll <= cumulative {
            return i;
        }
    }
    // The table is validated to have a positive total weight, the roll is
    // strictly below that total, and the scan accumulates the exact same sum,
    // so falling through is a logic error rather than a data error.
    unreachable!("weighted scan exhausted a validated sector table")
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::wheel::sector::Sector;

    fn table(weights: &[f64]) -> SectorTable {
        SectorTable::new(
            weights
                .iter()
                .enumerate()
                .map(|(i, &probability)| Sector {
                    label: format!("s{i}"),
                    probability,
                    color: [0.0, 0.0, 0.0],
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn roll_inside_first_arc_picks_first() {
        let t = table(&[0.4, 0.35, 0.2, 0.04, 0.01]);
        assert_eq!(index_for_roll(&t, 0.0), 0);
        assert_eq!(index_for_roll(&t, 0.39), 0);
    }

    #[test]
    fn boundary_roll_resolves_to_the_earlier_index() {
        let t = table(&[0.25, 0.25, 0.5]);
        assert_eq!(index_for_roll(&t, 0.25), 0);
        assert_eq!(index_for_roll(&t, 0.5), 1);
    }

    #[test]
    fn roll_walks_every_sector() {
        let t = table(&[1.0, 2.0, 1.0]);
        assert_eq!(index_for_roll(&t, 0.5), 0);
        assert_eq!(index_for_roll(&t, 1.5), 1);
        assert_eq!(index_for_roll(&t, 3.5), 2);
    }

    #[test]
    fn pick_always_returns_a_valid_index() {
        let t = table(&[0.4, 0.35, 0.2, 0.04, 0.01]);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..10_000 {
            assert!(pick(&mut rng, &t) < t.len());
        }
    }

    #[test]
    fn zero_weight_sector_is_never_drawn() {
        // Rolls at the 1.0 boundary tie toward index 0, so the zero-weight
        // sector in the middle is unreachable.
        let t = table(&[1.0, 0.0, 1.0]);
        assert_eq!(index_for_roll(&t, 1.0), 0);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10_000 {
            assert_ne!(pick(&mut rng, &t), 1);
        }
    }
}

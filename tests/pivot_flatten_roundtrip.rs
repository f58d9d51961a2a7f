use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};
use winprob_report::data::{Column, Dataset, DuplicatePolicy, Observation, pivot};

fn bits(t: (f64, f64, f64)) -> (u64, u64, u64) {
    (t.0.to_bits(), t.1.to_bits(), t.2.to_bits())
}

#[test]
fn flatten_reproduces_source_triples() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let r_values = [0.5, 1.0, 1.5, 2.0, 2.5];
    let l_values = [0.5, 1.0, 1.5, 2.0, 2.5];

    for _ in 0..50 {
        let mut pairs: Vec<(f64, f64)> = r_values
            .iter()
            .flat_map(|&r| l_values.iter().map(move |&l| (r, l)))
            .collect();
        pairs.shuffle(&mut rng);
        let keep = rng.random_range(1..=pairs.len());
        pairs.truncate(keep);

        let rows: Vec<Observation> = pairs
            .iter()
            .map(|&(r, l)| Observation {
                r: Some(r),
                l: Some(l),
                n: None,
                win_probability: rng.random::<f64>(),
            })
            .collect();
        let expected: BTreeSet<_> = rows
            .iter()
            .map(|o| bits((o.r.unwrap(), o.l.unwrap(), o.win_probability)))
            .collect();

        let ds = Dataset::from_rows("generated", &[Column::R, Column::L], rows).unwrap();
        let grid = pivot(
            &ds,
            Column::R,
            Column::L,
            Column::WinProbability,
            DuplicatePolicy::Reject,
        )
        .unwrap();

        let flat = grid.flatten();
        assert_eq!(flat.len(), expected.len(), "no cells added or lost");
        let actual: BTreeSet<_> = flat.into_iter().map(bits).collect();
        assert_eq!(actual, expected);
        assert_eq!(
            grid.missing_cells().len(),
            grid.n_rows() * grid.n_cols() - keep
        );
    }
}

#[test]
fn grid_keys_are_ascending() {
    let mut rng = StdRng::seed_from_u64(7);
    let rows: Vec<Observation> = (0..40)
        .map(|i| Observation {
            r: None,
            l: Some(rng.random_range(0..8) as f64 * 0.5),
            n: Some(((i % 6) as f64 + 2.0).powi(2)),
            win_probability: rng.random::<f64>(),
        })
        .collect();
    let ds = Dataset::from_rows("generated", &[Column::L, Column::N], rows).unwrap();
    let grid = pivot(
        &ds,
        Column::L,
        Column::N,
        Column::WinProbability,
        DuplicatePolicy::LastWins,
    )
    .unwrap();
    assert!(grid.row_keys().windows(2).all(|w| w[0] < w[1]));
    assert!(grid.col_keys().windows(2).all(|w| w[0] < w[1]));
}

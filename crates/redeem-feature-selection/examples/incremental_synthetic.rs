use log::LevelFilter;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use redeem_feature_selection::scorers::{univariate_scores, MutualInformation};
use redeem_feature_selection::{IncrementalSelection, SelectionConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("REDEEM_LOG", "error,redeem_feature_selection=debug"))
        .init();

    // Synthetic discrete dataset: 200 samples, 6 features
    // y = x0 XOR x1, x2 is a copy of x0, x3..x5 are noise
    let n_samples = 200;
    let mut rng = StdRng::seed_from_u64(2024);
    let mut data = Vec::with_capacity(n_samples * 6);
    let mut labels = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let x0: i64 = rng.gen_range(0..2);
        let x1: i64 = rng.gen_range(0..2);
        data.extend_from_slice(&[
            x0,
            x1,
            x0,
            rng.gen_range(0..2),
            rng.gen_range(0..3),
            rng.gen_range(0..2),
        ]);
        labels.push(x0 ^ x1);
    }
    let x = Array2::from_shape_vec((n_samples, 6), data)?;
    let y = Array1::from_vec(labels);

    let scorer = MutualInformation::new(x, y)?;
    println!("Univariate MI: {:?}", univariate_scores(&scorer, scorer.n_features())?);

    for remove_redundant in [false, true] {
        let config = SelectionConfig::new(0.2, 2)
            .with_remove_redundant(remove_redundant)
            .with_parallel(true);
        let selection = IncrementalSelection::new(config).select(&scorer.features(), &scorer)?;

        println!(
            "remove_redundant={} -> selected {} ({} scorer calls, {} cache hits)",
            remove_redundant, selection.features, selection.cache.misses, selection.cache.hits
        );
        for tier in &selection.tiers {
            println!(
                "  size {}: {} subsets, relevant {}, redundant {}",
                tier.size, tier.candidates, tier.relevant, tier.redundant
            );
        }
    }

    Ok(())
}

//! Integration tests running the selection search on the reference scorers.

use ndarray::{Array1, Array2};

use redeem_feature_selection::scorers::{univariate_scores, MutualInformation, RSquared};
use redeem_feature_selection::{FeatureSet, IncrementalSelection, SelectionConfig};

/// Columns: [target copy, duplicate of column 0, unrelated, constant].
fn discrete_data() -> (Array2<i64>, Array1<i64>) {
    let y = Array1::from_vec(vec![0, 1, 0, 1, 1, 0, 1, 0]);
    let x = Array2::from_shape_vec(
        (8, 4),
        vec![
            0, 0, 0, 5,
            1, 1, 0, 5,
            0, 0, 1, 5,
            1, 1, 1, 5,
            1, 1, 0, 5,
            0, 0, 0, 5,
            1, 1, 1, 5,
            0, 0, 1, 5,
        ],
    )
    .unwrap();
    (x, y)
}

// ---------------------------------------------------------------------------
// Mutual information
// ---------------------------------------------------------------------------

#[test]
fn mutual_information_keeps_informative_columns() {
    let (x, y) = discrete_data();
    let scorer = MutualInformation::new(x, y).unwrap();

    let selection = IncrementalSelection::new(SelectionConfig::new(0.1, 1))
        .select(&scorer.features(), &scorer)
        .unwrap();
    assert_eq!(selection.features, [0, 1].into());
}

#[test]
fn mutual_information_prunes_the_duplicate_column() {
    let (x, y) = discrete_data();
    let scorer = MutualInformation::new(x, y).unwrap();

    let selection = IncrementalSelection::new(
        SelectionConfig::new(0.1, 1).with_remove_redundant(true),
    )
    .select(&scorer.features(), &scorer)
    .unwrap();

    // column 0 is examined first in {0, 1} and adds nothing beyond column 1
    assert_eq!(selection.tiers[0].redundant, [0].into());
    assert_eq!(selection.features, [1].into());
}

#[test]
fn univariate_scores_rank_columns() {
    let (x, y) = discrete_data();
    let scorer = MutualInformation::new(x, y).unwrap();

    let scores = univariate_scores(&scorer, scorer.n_features()).unwrap();
    assert_eq!(scores.len(), 4);
    assert!((scores[0] - 2f64.ln()).abs() < 1e-12);
    assert!((scores[0] - scores[1]).abs() < 1e-12);
    assert!(scores[2] < 1e-12);
    assert!(scores[3] < 1e-12);
}

// ---------------------------------------------------------------------------
// R²
// ---------------------------------------------------------------------------

#[test]
fn r_squared_selection_finds_the_signal_column() {
    // y depends on column 1 only
    let x = Array2::from_shape_vec(
        (6, 3),
        vec![
            0.1, 1.0, 0.0,
            -0.2, 2.0, 1.0,
            0.3, 3.0, 0.0,
            0.0, 4.0, 1.0,
            -0.1, 5.0, 0.0,
            0.2, 6.0, 1.0,
        ],
    )
    .unwrap();
    let y = x.column(1).mapv(|v| 3.0 * v - 2.0);
    let scorer = RSquared::new(x, y).unwrap();

    let selection = IncrementalSelection::new(
        SelectionConfig::new(0.5, 2).with_remove_redundant(true),
    )
    .select(&scorer.features(), &scorer)
    .unwrap();

    assert_eq!(selection.features, FeatureSet::from([1]));
}

use crate::feature_set::FeatureSet;

/// A scoring function over feature sets.
///
/// Implementations must be deterministic: the same feature set always
/// yields the same score. The selection search relies on that to memoize
/// results. The scorer must also accept the empty set, which is queried
/// when a pair is tested for redundancy.
pub trait Scorer<F> {
    fn score(&self, features: &FeatureSet<F>) -> anyhow::Result<f64>;
}

impl<F, G> Scorer<F> for G
where
    G: Fn(&FeatureSet<F>) -> anyhow::Result<f64>,
{
    fn score(&self, features: &FeatureSet<F>) -> anyhow::Result<f64> {
        self(features)
    }
}

/// Adapter for scoring functions that cannot fail.
#[derive(Debug, Clone, Copy)]
pub struct Infallible<G>(G);

impl<F, G> Scorer<F> for Infallible<G>
where
    G: Fn(&FeatureSet<F>) -> f64,
{
    fn score(&self, features: &FeatureSet<F>) -> anyhow::Result<f64> {
        Ok((self.0)(features))
    }
}

/// Wraps an infallible closure as a [`Scorer`].
pub fn from_fn<G>(f: G) -> Infallible<G> {
    Infallible(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_scorers() {
        let size = |fs: &FeatureSet<u8>| -> anyhow::Result<f64> { Ok(fs.len() as f64) };
        let fs: FeatureSet<u8> = [1, 2, 3].into();
        assert_eq!(size.score(&fs).unwrap(), 3.0);

        let constant = from_fn(|_: &FeatureSet<u8>| 0.25);
        assert_eq!(constant.score(&FeatureSet::<u8>::new()).unwrap(), 0.25);
    }

    #[test]
    fn failures_pass_through() {
        let failing =
            |_: &FeatureSet<u8>| -> anyhow::Result<f64> { anyhow::bail!("model did not converge") };
        let fs: FeatureSet<u8> = [1].into();
        let err = failing.score(&fs).unwrap_err();
        assert!(err.to_string().contains("did not converge"));
    }
}

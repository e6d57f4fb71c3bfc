use serde::{Deserialize, Serialize};

pub struct Math {}
impl Math {
    pub fn mean(nums: &[f64]) -> Option<f64> {
        if nums.is_empty() {
            return None;
        }

        let sum: f64 = nums.iter().sum();
        Some(sum / nums.len() as f64)
    }

    /// # quantile of sorted samples
    /// linear interpolation between the closest ranks, `h = (n - 1) * p`.
    /// the samples have to be sorted ascending
    pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
        if sorted.is_empty() {
            return None;
        }

        let h = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
        let lower = h.floor() as usize;
        let upper = h.ceil() as usize;

        let value = sorted[lower] + (h - lower as f64) * (sorted[upper] - sorted[lower]);
        Some(value.clamp(sorted[lower], sorted[upper]))
    }

    pub fn median(sorted: &[f64]) -> Option<f64> {
        Math::quantile(sorted, 0.5)
    }
}

/// # box plot statistics
/// the five number summary of a set of lap times with outliers flagged
/// using the 1.5 * IQR rule
#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct BoxStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    pub iqr: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    /// smallest sample inside the fences
    pub lower_whisker: f64,
    /// largest sample inside the fences
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// # compute the statistics of samples
    /// samples that are not finite are ignored
    ///
    /// ## Arguments
    /// * `samples` - the samples, in any order
    ///
    /// ## Returns
    /// * `Option<BoxStats>` - `None` when there are no usable samples
    pub fn from_samples(samples: &[f64]) -> Option<BoxStats> {
        let mut sorted: Vec<f64> = samples.iter().copied().filter(|e| e.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = Math::quantile(&sorted, 0.25)?;
        let median = Math::median(&sorted)?;
        let q3 = Math::quantile(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let lower_fence = q1 - 1.5 * iqr;
        let upper_fence = q3 + 1.5 * iqr;

        let inside = |e: &&f64| **e >= lower_fence && **e <= upper_fence;
        // the median is always inside the fences, so both whiskers exist
        let lower_whisker = sorted.iter().find(inside).copied().unwrap_or(q1);
        let upper_whisker = sorted.iter().rev().find(inside).copied().unwrap_or(q3);

        let outliers = sorted
            .iter()
            .filter(|e| **e < lower_fence || **e > upper_fence)
            .copied()
            .collect();

        Some(BoxStats {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            mean: Math::mean(&sorted)?,
            iqr,
            lower_fence,
            upper_fence,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn quantiles_interpolate_between_ranks() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(Math::quantile(&sorted, 0.25), Some(1.75));
        assert_eq!(Math::median(&sorted), Some(2.5));
        assert_eq!(Math::quantile(&sorted, 0.75), Some(3.25));
        assert_eq!(Math::quantile(&[], 0.5), None);
        assert_eq!(Math::quantile(&[7.0], 0.25), Some(7.0));
    }

    #[test]
    fn slow_lap_is_an_outlier() {
        let stats = BoxStats::from_samples(&[20.0, 21.0, 20.5, 19.8, 20.2, 45.0]).unwrap();

        assert_eq!(stats.count, 6);
        assert_eq!(stats.min, 19.8);
        assert_eq!(stats.max, 45.0);
        assert_eq!(stats.outliers, vec![45.0]);
        assert_eq!(stats.upper_whisker, 21.0);
        assert_eq!(stats.lower_whisker, 19.8);
    }

    #[test]
    fn single_sample() {
        let stats = BoxStats::from_samples(&[12.5]).unwrap();
        assert_eq!(stats.q1, 12.5);
        assert_eq!(stats.median, 12.5);
        assert_eq!(stats.q3, 12.5);
        assert_eq!(stats.iqr, 0.0);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn no_usable_samples() {
        assert_eq!(BoxStats::from_samples(&[]), None);
        assert_eq!(BoxStats::from_samples(&[f64::NAN, f64::INFINITY]), None);
    }

    proptest! {
        #[test]
        fn box_stats_are_ordered(samples in prop::collection::vec(5.0f64..120.0, 1..60)) {
            let stats = BoxStats::from_samples(&samples).unwrap();

            prop_assert!(stats.min <= stats.q1);
            prop_assert!(stats.q1 <= stats.median);
            prop_assert!(stats.median <= stats.q3);
            prop_assert!(stats.q3 <= stats.max);
            prop_assert!(stats.lower_whisker >= stats.lower_fence);
            prop_assert!(stats.upper_whisker <= stats.upper_fence);
            prop_assert!(stats.outliers.iter().all(|e| *e < stats.lower_fence || *e > stats.upper_fence));
            prop_assert_eq!(stats.count, samples.len());
        }
    }
}

use std::fmt;

/// Smoothing factor of the duration trend line.
pub const EWMA_ALPHA: f64 = 0.01;

/// Bucket count of the duration histogram.
pub const HISTOGRAM_BUCKETS: usize = 1000;

/// Quantile reported as "99th percentile".
pub const P99: f64 = 0.99;

// ---------------------------------------------------------------------------
// Primitive statistics
// ---------------------------------------------------------------------------

/// Exponentially weighted moving average, computed front to back.
///
/// `out[0] = x[0]`, `out[i] = alpha * x[i] + (1 - alpha) * out[i - 1]`.
pub fn ewma(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &x in values {
        let next = match prev {
            None => x,
            Some(p) => alpha * x + (1.0 - alpha) * p,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Undefined below two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Quantile by linear interpolation between closest ranks.
///
/// Ranks are 0-indexed over the sorted values: `rank = q * (n - 1)`, and the
/// result interpolates between `sorted[floor(rank)]` and `sorted[ceil(rank)]`.
/// For 1..=100 and `q = 0.99` that is rank 98.01, giving 99.01.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bucket counts over the range of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Left edge of the first bucket.
    pub start: f64,
    pub bucket_width: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Partition `[min, max]` into `buckets` equal buckets, right edge inclusive.
    ///
    /// A constant series gets the range `[v - 0.5, v + 0.5]`. Returns `None`
    /// for an empty series or zero buckets.
    pub fn compute(values: &[f64], buckets: usize) -> Option<Self> {
        if values.is_empty() || buckets == 0 {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let (start, end) = if max > min {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };
        let bucket_width = (end - start) / buckets as f64;

        let mut counts = vec![0u64; buckets];
        for &v in values {
            let idx = (((v - start) / bucket_width) as usize).min(buckets - 1);
            counts[idx] += 1;
        }

        Some(Histogram {
            start,
            bucket_width,
            counts,
        })
    }

    /// Midpoint of bucket `i`.
    pub fn bucket_center(&self, i: usize) -> f64 {
        self.start + (i as f64 + 0.5) * self.bucket_width
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

// ---------------------------------------------------------------------------
// SummaryStats – everything the duration view shows
// ---------------------------------------------------------------------------

/// Statistics of a duration series. `None` means undefined for this input.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub p99: Option<f64>,
    /// EWMA trend, same length and order as the input.
    pub smoothed: Vec<f64>,
    pub histogram: Option<Histogram>,
}

impl SummaryStats {
    pub fn compute(values: &[f64]) -> Self {
        SummaryStats {
            count: values.len(),
            mean: mean(values),
            std_dev: std_dev(values),
            p99: quantile(values, P99),
            smoothed: ewma(values, EWMA_ALPHA),
            histogram: Histogram::compute(values, HISTOGRAM_BUCKETS),
        }
    }
}

/// Formats an optional statistic, `n/a` when undefined.
pub struct OptStat(pub Option<f64>);

impl fmt::Display for OptStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => write!(f, "n/a"),
        }
    }
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mean: {}", OptStat(self.mean))?;
        writeln!(f, "std: {}", OptStat(self.std_dev))?;
        write!(f, "99th percentile: {}", OptStat(self.p99))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn scenario_two_measured_calls() {
        let stats = SummaryStats::compute(&[5.0, 7.0]);

        assert_eq!(stats.count, 2);
        assert!(close(stats.mean.unwrap(), 6.0));
        assert!(close(stats.std_dev.unwrap(), 2f64.sqrt()));
        assert_eq!(stats.smoothed.len(), 2);
        assert!(close(stats.smoothed[0], 5.0));
        assert!(close(stats.smoothed[1], 5.02));
    }

    #[test]
    fn ewma_follows_recurrence() {
        let out = ewma(&[10.0, 0.0, 0.0], 0.5);

        assert_eq!(out, vec![10.0, 5.0, 2.5]);
    }

    #[test]
    fn ewma_is_repeatable_for_fixed_input() {
        let values: Vec<f64> = (0..500).map(|i| ((i * 37) % 101) as f64).collect();

        assert_eq!(ewma(&values, EWMA_ALPHA), ewma(&values, EWMA_ALPHA));
    }

    #[test]
    fn ewma_of_empty_is_empty() {
        assert!(ewma(&[], EWMA_ALPHA).is_empty());
    }

    #[test]
    fn p99_of_one_to_hundred_interpolates() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();

        assert!(close(quantile(&values, P99).unwrap(), 99.01));
    }

    #[test]
    fn quantile_ignores_input_order() {
        let values = [9.0, 1.0, 5.0, 3.0, 7.0];

        assert!(close(quantile(&values, 0.5).unwrap(), 5.0));
        assert!(close(quantile(&values, 0.99).unwrap(), 8.92));
        assert!(close(quantile(&values, 0.0).unwrap(), 1.0));
        assert!(close(quantile(&values, 1.0).unwrap(), 9.0));
    }

    #[test]
    fn single_value_has_mean_and_p99_but_no_std() {
        let stats = SummaryStats::compute(&[3.5]);

        assert_eq!(stats.mean, Some(3.5));
        assert_eq!(stats.std_dev, None);
        assert_eq!(stats.p99, Some(3.5));
        assert_eq!(stats.smoothed, vec![3.5]);
    }

    #[test]
    fn empty_series_is_all_undefined() {
        let stats = SummaryStats::compute(&[]);

        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.std_dev, None);
        assert_eq!(stats.p99, None);
        assert!(stats.smoothed.is_empty());
        assert!(stats.histogram.is_none());
        assert_eq!(
            stats.to_string(),
            "mean: n/a\nstd: n/a\n99th percentile: n/a"
        );
    }

    #[test]
    fn report_prints_each_statistic() {
        let stats = SummaryStats::compute(&[5.0, 7.0]);

        let text = stats.to_string();

        assert!(text.starts_with("mean: 6\n"));
        assert!(text.contains("std: 1.414"));
        assert!(text.contains("99th percentile: 6.9"));
    }

    #[test]
    fn histogram_spreads_range_over_buckets() {
        let values: Vec<f64> = (0..=10).map(f64::from).collect();

        let hist = Histogram::compute(&values, 10).unwrap();

        assert_eq!(hist.start, 0.0);
        assert!(close(hist.bucket_width, 1.0));
        assert_eq!(hist.counts, vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 2]);
        assert_eq!(hist.total(), 11);
        assert!(close(hist.bucket_center(0), 0.5));
    }

    #[test]
    fn duration_histogram_has_fixed_bucket_count() {
        let values: Vec<f64> = (0..5000).map(|i| (i % 97) as f64 * 0.3).collect();

        let hist = SummaryStats::compute(&values).histogram.unwrap();

        assert_eq!(hist.counts.len(), HISTOGRAM_BUCKETS);
        assert_eq!(hist.total(), 5000);
    }

    #[test]
    fn constant_series_fills_one_bucket() {
        let hist = Histogram::compute(&[2.0, 2.0, 2.0], 4).unwrap();

        assert_eq!(hist.start, 1.5);
        assert_eq!(hist.counts, vec![0, 0, 3, 0]);
    }
}

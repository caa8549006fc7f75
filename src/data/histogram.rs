// ---------------------------------------------------------------------------
// Equal-width histogram over observed values
// ---------------------------------------------------------------------------

/// A histogram of equal-width buckets. `edges` has `counts.len() + 1` entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bucket `values` into `bins` equal-width buckets spanning their
    /// observed range. Non-finite values are ignored.
    ///
    /// * no finite values or `bins == 0` → zero buckets
    /// * a single distinct value → range widened by 0.5 on each side
    /// * the last bucket is closed on the right so the maximum is counted
    pub fn from_values(values: impl IntoIterator<Item = f64>, bins: usize) -> Self {
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if values.is_empty() || bins == 0 {
            return Histogram::default();
        }

        let mut min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let mut max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            min -= 0.5;
            max += 0.5;
        }

        let width = (max - min) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();

        let mut counts = vec![0usize; bins];
        for v in values {
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Histogram { edges, counts }
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Bucket width (all buckets share it).
    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [a, b, ..] => b - a,
            _ => 0.0,
        }
    }

    /// `(left edge, right edge, count)` per bucket.
    pub fn buckets(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(e, &c)| (e[0], e[1], c))
    }
}

use super::model::DisplacementPoint;

// ---------------------------------------------------------------------------
// Averaging runs by sample index
// ---------------------------------------------------------------------------

/// Average several run series into one, index by index.
///
/// The result has the length of the shortest run. Times come from the first
/// run; runs are assumed near-synchronous, so no interpolation is done.
/// NaN values propagate into the mean.
pub fn average_runs(runs: &[Vec<DisplacementPoint>]) -> Vec<DisplacementPoint> {
    let Some(first) = runs.first() else {
        return Vec::new();
    };
    let min_len = runs.iter().map(Vec::len).min().unwrap_or(0);
    let count = runs.len() as f64;

    (0..min_len)
        .map(|i| {
            let total: f64 = runs.iter().map(|run| run[i].disp).sum();
            DisplacementPoint {
                time_s: first[i].time_s,
                disp: total / count,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Shared time axis
// ---------------------------------------------------------------------------

/// Closed time interval shared by every cumulative chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeDomain {
    pub min: f64,
    pub max: f64,
}

impl TimeDomain {
    /// Fallback when there is no data at all.
    pub const EMPTY: TimeDomain = TimeDomain { min: 0.0, max: 0.0 };

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl Default for TimeDomain {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Global `[min, max]` of `time_s` across all given series.
///
/// NaN times are skipped. With no finite time at all the result is
/// [`TimeDomain::EMPTY`].
pub fn time_domain<'a, I>(series: I) -> TimeDomain
where
    I: IntoIterator<Item = &'a [DisplacementPoint]>,
{
    series
        .into_iter()
        .flatten()
        .map(|p| p.time_s)
        .filter(|t| !t.is_nan())
        .fold(None, |acc: Option<TimeDomain>, t| {
            Some(match acc {
                None => TimeDomain { min: t, max: t },
                Some(d) => TimeDomain {
                    min: d.min.min(t),
                    max: d.max.max(t),
                },
            })
        })
        .unwrap_or(TimeDomain::EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(points: &[(f64, f64)]) -> Vec<DisplacementPoint> {
        points
            .iter()
            .map(|&(time_s, disp)| DisplacementPoint { time_s, disp })
            .collect()
    }

    #[test]
    fn truncates_to_shortest_run() {
        let runs = vec![
            series(&[(0.0, 1.0), (0.1, 2.0), (0.2, 3.0), (0.3, 4.0), (0.4, 5.0)]),
            series(&[(0.0, 3.0), (0.11, 4.0), (0.21, 5.0)]),
        ];
        let avg = average_runs(&runs);
        assert_eq!(avg.len(), 3);
        assert_relative_eq!(avg[0].disp, 2.0);
        assert_relative_eq!(avg[1].disp, 3.0);
        assert_relative_eq!(avg[2].disp, 4.0);
        // Time axis follows the first run.
        assert_relative_eq!(avg[1].time_s, 0.1);
    }

    #[test]
    fn single_run_is_unchanged() {
        let run = series(&[(0.0, 0.3), (0.5, 0.7), (1.0, 1.1)]);
        assert_eq!(average_runs(std::slice::from_ref(&run)), run);
    }

    #[test]
    fn empty_inputs_degrade_to_empty() {
        assert!(average_runs(&[]).is_empty());
        assert!(average_runs(&[series(&[(0.0, 1.0)]), Vec::new()]).is_empty());
    }

    #[test]
    fn nan_propagates_into_mean() {
        let runs = vec![series(&[(0.0, f64::NAN)]), series(&[(0.0, 1.0)])];
        assert!(average_runs(&runs)[0].disp.is_nan());
    }

    #[test]
    fn domain_spans_all_series() {
        let a = series(&[(0.0, 1.0), (4.0, 1.0)]);
        let b = series(&[(-1.0, 1.0), (2.5, 1.0), (f64::NAN, 1.0)]);
        let d = time_domain([a.as_slice(), b.as_slice()]);
        assert_eq!(d, TimeDomain { min: -1.0, max: 4.0 });
        assert_relative_eq!(d.span(), 5.0);
    }

    #[test]
    fn domain_of_nothing_is_zero() {
        assert_eq!(time_domain(std::iter::empty()), TimeDomain::EMPTY);
        assert_eq!(TimeDomain::EMPTY.span(), 0.0);
        let nan_only = series(&[(f64::NAN, 0.0)]);
        assert_eq!(time_domain([nan_only.as_slice()]), TimeDomain::EMPTY);
    }
}

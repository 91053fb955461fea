use std::collections::HashMap;
use std::hash::Hash;

use super::aggregate::average_runs;
use super::model::{AggregatedGenreSeries, DisplacementPoint, GenreSeries, Sample};

// ---------------------------------------------------------------------------
// Computation modes
// ---------------------------------------------------------------------------

/// How displacement is derived from a run of samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplacementMode {
    /// Frame-to-frame distance, one series per (genre, block), absolute time.
    Instantaneous,
    /// Distance from origin on a run-relative clock, averaged per genre.
    Cumulative,
}

/// Compute displacement series for `records` in the given mode.
///
/// Cumulative series come back with `block == None`.
pub fn compute<'a, I>(records: I, mode: DisplacementMode) -> Vec<GenreSeries>
where
    I: IntoIterator<Item = &'a Sample>,
{
    match mode {
        DisplacementMode::Instantaneous => instantaneous_by_genre(records),
        DisplacementMode::Cumulative => cumulative_by_genre(records)
            .into_iter()
            .map(GenreSeries::from)
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Instantaneous (Mode A)
// ---------------------------------------------------------------------------

/// Frame-to-frame displacement, one series per (genre, block).
///
/// Genres and blocks appear in the order they are first seen in `records`.
pub fn instantaneous_by_genre<'a, I>(records: I) -> Vec<GenreSeries>
where
    I: IntoIterator<Item = &'a Sample>,
{
    let mut out = Vec::new();
    for (genre, of_genre) in partition_by(records, |s: &'a Sample| &s.genre) {
        for (block, mut run) in partition_by(of_genre, |s: &'a Sample| s.block.as_str()) {
            sort_by_time(&mut run);
            out.push(GenreSeries {
                genre: genre.clone(),
                block: Some(block.to_string()),
                series: instantaneous_series(&run),
            });
        }
    }
    out
}

/// Distance of each sample from its predecessor; the first point is 0.
///
/// `run` must already be in time order.
pub fn instantaneous_series(run: &[&Sample]) -> Vec<DisplacementPoint> {
    let Some(first) = run.first() else {
        return Vec::new();
    };
    std::iter::once(DisplacementPoint {
        time_s: first.time_s,
        disp: 0.0,
    })
    .chain(run.windows(2).map(|pair| DisplacementPoint {
        time_s: pair[1].time_s,
        disp: pair[1].distance_to(pair[0]),
    }))
    .collect()
}

// ---------------------------------------------------------------------------
// Cumulative (Mode B)
// ---------------------------------------------------------------------------

/// Per-genre average of time-zeroed absolute displacement over all runs.
///
/// Each run is rebased to start at `t = 0`; the runs of a genre are then
/// averaged index by index (see [`average_runs`]).
pub fn cumulative_by_genre<'a, I>(records: I) -> Vec<AggregatedGenreSeries>
where
    I: IntoIterator<Item = &'a Sample>,
{
    let mut out = Vec::new();
    for (genre, of_genre) in partition_by(records, |s: &'a Sample| &s.genre) {
        let runs: Vec<Vec<DisplacementPoint>> = partition_by(of_genre, Sample::run_key)
            .into_iter()
            .map(|(_, mut run)| {
                sort_by_time(&mut run);
                rebased_series(&run)
            })
            .collect();

        if runs.is_empty() {
            continue;
        }
        log::debug!("{genre}: averaging {} runs", runs.len());
        out.push(AggregatedGenreSeries {
            genre: genre.clone(),
            runs: runs.len(),
            series: average_runs(&runs),
        });
    }
    out
}

/// Run-relative time and distance from origin for each sample.
///
/// `run` must already be in time order.
pub fn rebased_series(run: &[&Sample]) -> Vec<DisplacementPoint> {
    let Some(t0) = run.first().map(|s| s.time_s) else {
        return Vec::new();
    };
    run.iter()
        .map(|s| DisplacementPoint {
            time_s: s.time_s - t0,
            disp: s.norm(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Stable sort by `time_s`; NaN times sort last.
fn sort_by_time(run: &mut [&Sample]) {
    run.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
}

/// Split `items` by key, keeping partitions in first-seen order.
fn partition_by<T, K, F, I>(items: I, key: F) -> Vec<(K, Vec<T>)>
where
    I: IntoIterator<Item = T>,
    T: Copy,
    K: Eq + Hash + Copy,
    F: Fn(T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut parts: Vec<(K, Vec<T>)> = Vec::new();
    for item in items {
        let k = key(item);
        match index.get(&k) {
            Some(&i) => parts[i].1.push(item),
            None => {
                index.insert(k, parts.len());
                parts.push((k, vec![item]));
            }
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{sample, Genre};
    use approx::assert_relative_eq;

    #[test]
    fn two_sample_run_in_both_modes() {
        let records = vec![
            sample("G", "M", "salsa", "1", 0.0, [0.0, 0.0, 0.0]),
            sample("G", "M", "salsa", "1", 1.0, [3.0, 4.0, 0.0]),
        ];

        let inst = instantaneous_by_genre(&records);
        assert_eq!(inst.len(), 1);
        assert_eq!(inst[0].block.as_deref(), Some("1"));
        let disp: Vec<f64> = inst[0].series.iter().map(|p| p.disp).collect();
        assert_eq!(disp, vec![0.0, 5.0]);

        let cum = cumulative_by_genre(&records);
        assert_eq!(cum.len(), 1);
        assert_eq!(cum[0].runs, 1);
        let disp: Vec<f64> = cum[0].series.iter().map(|p| p.disp).collect();
        let time: Vec<f64> = cum[0].series.iter().map(|p| p.time_s).collect();
        assert_eq!(disp, vec![0.0, 5.0]);
        assert_eq!(time, vec![0.0, 1.0]);
    }

    #[test]
    fn instantaneous_sorts_unordered_input() {
        let records = vec![
            sample("G", "M", "edm", "1", 2.0, [1.0, 1.0, 1.0]),
            sample("G", "M", "edm", "1", 0.0, [0.0, 0.0, 0.0]),
            sample("G", "M", "edm", "1", 1.0, [1.0, 0.0, 0.0]),
        ];
        let inst = instantaneous_by_genre(&records);
        let s = &inst[0].series;
        assert_eq!(s.iter().map(|p| p.time_s).collect::<Vec<_>>(), vec![0.0, 1.0, 2.0]);
        assert_relative_eq!(s[0].disp, 0.0);
        assert_relative_eq!(s[1].disp, 1.0);
        assert_relative_eq!(s[2].disp, 2.0_f64.sqrt());
    }

    #[test]
    fn instantaneous_splits_by_genre_then_block() {
        let records = vec![
            sample("G", "M", "salsa", "2", 0.0, [0.0; 3]),
            sample("G", "M", "edm", "1", 0.0, [0.0; 3]),
            sample("G", "M", "salsa", "1", 0.0, [0.0; 3]),
            sample("G", "M", "salsa", "2", 1.0, [0.0; 3]),
        ];
        let inst = instantaneous_by_genre(&records);
        let keys: Vec<(Genre, Option<&str>, usize)> = inst
            .iter()
            .map(|g| (g.genre.clone(), g.block.as_deref(), g.series.len()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Genre::Salsa, Some("2"), 2),
                (Genre::Salsa, Some("1"), 1),
                (Genre::Edm, Some("1"), 1),
            ]
        );
    }

    #[test]
    fn cumulative_rebases_time_and_uses_absolute_norm() {
        let records = vec![
            sample("G", "M", "meditation", "1", 10.5, [1.0, 2.0, 2.0]),
            sample("G", "M", "meditation", "1", 10.0, [0.0, 0.0, 2.0]),
        ];
        let cum = cumulative_by_genre(&records);
        let s = &cum[0].series;
        assert_relative_eq!(s[0].time_s, 0.0);
        assert_relative_eq!(s[0].disp, 2.0);
        assert_relative_eq!(s[1].time_s, 0.5);
        assert_relative_eq!(s[1].disp, 3.0);
    }

    #[test]
    fn cumulative_averages_runs_across_groups_and_blocks() {
        let mut records = Vec::new();
        for i in 0..5 {
            records.push(sample("G", "M", "salsa", "1", i as f64, [2.0, 0.0, 0.0]));
        }
        for i in 0..3 {
            records.push(sample("H", "M", "salsa", "1", 100.0 + i as f64, [4.0, 0.0, 0.0]));
        }
        let cum = cumulative_by_genre(&records);
        assert_eq!(cum.len(), 1);
        assert_eq!(cum[0].runs, 2);
        assert_eq!(cum[0].series.len(), 3);
        for p in &cum[0].series {
            assert_relative_eq!(p.disp, 3.0);
        }
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let none: Vec<Sample> = Vec::new();
        assert!(instantaneous_by_genre(&none).is_empty());
        assert!(cumulative_by_genre(&none).is_empty());
        assert!(instantaneous_series(&[]).is_empty());
        assert!(rebased_series(&[]).is_empty());
    }

    #[test]
    fn compute_dispatches_on_mode() {
        let records = vec![
            sample("G", "M", "salsa", "1", 0.0, [0.0, 0.0, 1.0]),
            sample("G", "M", "salsa", "2", 0.0, [0.0, 0.0, 3.0]),
        ];
        let inst = compute(&records, DisplacementMode::Instantaneous);
        assert_eq!(inst.len(), 2);

        let cum = compute(&records, DisplacementMode::Cumulative);
        assert_eq!(cum.len(), 1);
        assert!(cum[0].block.is_none());
        assert_relative_eq!(cum[0].series[0].disp, 2.0);
    }

    #[test]
    fn rerun_is_bit_identical() {
        let records: Vec<Sample> = (0..20)
            .map(|i| {
                let t = i as f64 * 0.01;
                sample("G", "M", "edm", if i % 2 == 0 { "1" } else { "2" }, t, [t.sin(), t.cos(), t])
            })
            .collect();
        assert_eq!(instantaneous_by_genre(&records), instantaneous_by_genre(&records));
        assert_eq!(cumulative_by_genre(&records), cumulative_by_genre(&records));
    }
}

use std::collections::BTreeSet;

use super::model::{Genre, Sample};

// ---------------------------------------------------------------------------
// Selection predicate: one value per selector
// ---------------------------------------------------------------------------

/// Silence is recorded once per session; only its first block is shown.
pub const SILENCE_BLOCK: &str = "1";

/// The three selector values of the filter panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub group: String,
    pub marker: String,
    pub genre: Genre,
}

impl Selection {
    /// A sample passes when group, marker and genre all match exactly.
    /// Silence additionally requires block [`SILENCE_BLOCK`].
    pub fn matches(&self, sample: &Sample) -> bool {
        sample.group == self.group
            && sample.marker == self.marker
            && sample.genre == self.genre
            && (self.genre != Genre::Silence || sample.block == SILENCE_BLOCK)
    }
}

/// Return the samples that pass `selection`, in input order.
///
/// Values that match nothing give an empty result rather than an error.
/// The output is not time-sorted.
pub fn select<'a>(records: &'a [Sample], selection: &Selection) -> Vec<&'a Sample> {
    records.iter().filter(|s| selection.matches(s)).collect()
}

/// Every sample of one group.
pub fn select_group<'a>(records: &'a [Sample], group: &str) -> Vec<&'a Sample> {
    records.iter().filter(|s| s.group == group).collect()
}

/// Every sample of one participant whose genre is enabled.
///
/// No silence block constraint is applied here; all silence blocks feed
/// the participant's averaged curve.
pub fn select_participant<'a>(
    records: &'a [Sample],
    group: &str,
    marker: &str,
    genres: &BTreeSet<Genre>,
) -> Vec<&'a Sample> {
    records
        .iter()
        .filter(|s| s.group == group && s.marker == marker && genres.contains(&s.genre))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::sample;

    fn selection(group: &str, marker: &str, genre: &str) -> Selection {
        Selection {
            group: group.to_string(),
            marker: marker.to_string(),
            genre: Genre::parse(genre),
        }
    }

    #[test]
    fn silence_keeps_only_first_block() {
        let records = vec![
            sample("G", "M", "silence", "1", 0.0, [0.0; 3]),
            sample("G", "M", "silence", "2", 0.0, [0.0; 3]),
            sample("G", "M", "silence", "1", 0.1, [0.0; 3]),
            sample("G", "M", "silence", "2", 0.1, [0.0; 3]),
        ];
        let picked = select(&records, &selection("G", "M", "silence"));
        assert_eq!(picked.len(), 2);
        assert!(picked.iter().all(|s| s.block == "1"));
    }

    #[test]
    fn other_genres_keep_every_block() {
        let records = vec![
            sample("G", "M", "salsa", "1", 0.0, [0.0; 3]),
            sample("G", "M", "salsa", "2", 0.0, [0.0; 3]),
            sample("G", "M", "edm", "1", 0.0, [0.0; 3]),
        ];
        let picked = select(&records, &selection("G", "M", "salsa"));
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn preserves_input_order() {
        let records = vec![
            sample("G", "M", "edm", "1", 2.0, [0.0; 3]),
            sample("H", "M", "edm", "1", 0.5, [0.0; 3]),
            sample("G", "M", "edm", "1", 1.0, [0.0; 3]),
        ];
        let times: Vec<f64> = select(&records, &selection("G", "M", "edm"))
            .iter()
            .map(|s| s.time_s)
            .collect();
        assert_eq!(times, vec![2.0, 1.0]);
    }

    #[test]
    fn unknown_values_yield_empty() {
        let records = vec![sample("G", "M", "edm", "1", 0.0, [0.0; 3])];
        assert!(select(&records, &selection("nope", "M", "edm")).is_empty());
        assert!(select(&[], &selection("G", "M", "edm")).is_empty());
    }

    #[test]
    fn participant_selection_honours_genre_set() {
        let records = vec![
            sample("G", "M", "silence", "2", 0.0, [0.0; 3]),
            sample("G", "M", "salsa", "1", 0.0, [0.0; 3]),
            sample("G", "N", "salsa", "1", 0.0, [0.0; 3]),
            sample("G", "M", "edm", "1", 0.0, [0.0; 3]),
        ];
        let genres: BTreeSet<Genre> = [Genre::Silence, Genre::Salsa].into_iter().collect();
        let picked = select_participant(&records, "G", "M", &genres);
        assert_eq!(picked.len(), 2);
        assert!(picked.iter().any(|s| s.block == "2"));

        assert_eq!(select_group(&records, "G").len(), 4);
        assert!(select_group(&records, "H").is_empty());
    }
}

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Genre – the stimulus condition of a run
// ---------------------------------------------------------------------------

/// Experimental condition applied during a run.
///
/// The four known labels get their own variants; anything else is kept
/// verbatim in [`Genre::Other`] so new conditions load without changes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Genre {
    Silence,
    Salsa,
    Meditation,
    Edm,
    Other(String),
}

impl Genre {
    /// The four conditions recorded by the study, in display order.
    pub const KNOWN: [Genre; 4] = [Genre::Silence, Genre::Salsa, Genre::Meditation, Genre::Edm];

    pub fn parse(label: &str) -> Self {
        match label {
            "silence" => Genre::Silence,
            "salsa" => Genre::Salsa,
            "meditation" => Genre::Meditation,
            "edm" => Genre::Edm,
            other => Genre::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Genre::Silence => "silence",
            Genre::Salsa => "salsa",
            Genre::Meditation => "meditation",
            Genre::Edm => "edm",
            Genre::Other(label) => label,
        }
    }
}

impl From<String> for Genre {
    fn from(label: String) -> Self {
        match Genre::parse(&label) {
            Genre::Other(_) => Genre::Other(label),
            known => known,
        }
    }
}

impl From<Genre> for String {
    fn from(genre: Genre) -> Self {
        match genre {
            Genre::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sample – one row of the source table
// ---------------------------------------------------------------------------

/// A single motion-capture reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub group: String,
    pub marker: String,
    pub block: String,
    pub genre: Genre,
    pub time_s: f64,
    pub x_mm: f64,
    pub y_mm: f64,
    pub z_mm: f64,
}

impl Sample {
    /// Identity of the recording run this sample belongs to.
    pub fn run_key(&self) -> RunKey<'_> {
        RunKey {
            group: &self.group,
            marker: &self.marker,
            genre: &self.genre,
            block: &self.block,
        }
    }

    /// Euclidean distance between the positions of two samples.
    pub fn distance_to(&self, other: &Sample) -> f64 {
        let dx = self.x_mm - other.x_mm;
        let dy = self.y_mm - other.y_mm;
        let dz = self.z_mm - other.z_mm;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Euclidean distance of the position from the origin.
    pub fn norm(&self) -> f64 {
        (self.x_mm * self.x_mm + self.y_mm * self.y_mm + self.z_mm * self.z_mm).sqrt()
    }
}

/// (group, marker, genre, block) – one continuous recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunKey<'a> {
    pub group: &'a str,
    pub marker: &'a str,
    pub genre: &'a Genre,
    pub block: &'a str,
}

impl fmt::Display for RunKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}-{}", self.group, self.marker, self.genre, self.block)
    }
}

// ---------------------------------------------------------------------------
// Derived series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementPoint {
    pub time_s: f64,
    /// Millimetres; frame-to-frame distance or distance from origin
    /// depending on how the series was computed.
    pub disp: f64,
}

/// Displacement series for one genre, optionally narrowed to one block.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreSeries {
    pub genre: Genre,
    pub block: Option<String>,
    pub series: Vec<DisplacementPoint>,
}

/// One representative series per genre, averaged over its runs.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedGenreSeries {
    pub genre: Genre,
    /// Number of runs that contributed to the average.
    pub runs: usize,
    pub series: Vec<DisplacementPoint>,
}

impl AggregatedGenreSeries {
    /// Mean displacement over the whole series, `None` when empty.
    pub fn mean_disp(&self) -> Option<f64> {
        if self.series.is_empty() {
            return None;
        }
        let total: f64 = self.series.iter().map(|p| p.disp).sum();
        Some(total / self.series.len() as f64)
    }
}

impl From<AggregatedGenreSeries> for GenreSeries {
    fn from(agg: AggregatedGenreSeries) -> Self {
        GenreSeries {
            genre: agg.genre,
            block: None,
            series: agg.series,
        }
    }
}

// ---------------------------------------------------------------------------
// RecordStore – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All loaded samples with the selector vocabularies pre-computed.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    samples: Vec<Sample>,
    /// Sorted unique `group` values.
    pub groups: BTreeSet<String>,
    /// Sorted unique `marker` values.
    pub markers: BTreeSet<String>,
    /// Sorted unique `genre` values.
    pub genres: BTreeSet<Genre>,
}

impl RecordStore {
    /// Build the selector indices from the loaded samples.
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        let mut groups = BTreeSet::new();
        let mut markers = BTreeSet::new();
        let mut genres = BTreeSet::new();

        for s in &samples {
            groups.insert(s.group.clone());
            markers.insert(s.marker.clone());
            genres.insert(s.genre.clone());
        }

        RecordStore {
            samples,
            groups,
            markers,
            genres,
        }
    }

    /// Concatenate the samples of several sources, in source order.
    pub fn from_sources(sources: Vec<Vec<Sample>>) -> Self {
        Self::from_samples(sources.into_iter().flatten().collect())
    }

    /// A new store holding this store's samples followed by `more`.
    pub fn with_more(&self, more: Vec<Sample>) -> Self {
        let mut samples = self.samples.clone();
        samples.extend(more);
        Self::from_samples(samples)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of distinct runs in the store.
    pub fn run_count(&self) -> usize {
        self.samples
            .iter()
            .map(Sample::run_key)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn sample(group: &str, marker: &str, genre: &str, block: &str, t: f64, xyz: [f64; 3]) -> Sample {
    Sample {
        group: group.to_string(),
        marker: marker.to_string(),
        block: block.to_string(),
        genre: Genre::parse(genre),
        time_s: t,
        x_mm: xyz[0],
        y_mm: xyz[1],
        z_mm: xyz[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn genre_labels_round_trip_through_strings() {
        for genre in Genre::KNOWN {
            assert_eq!(Genre::parse(genre.as_str()), genre);
        }
        let other = Genre::from("tango".to_string());
        assert_eq!(other, Genre::Other("tango".to_string()));
        assert_eq!(String::from(other), "tango");
    }

    #[test]
    fn genre_labels_are_case_sensitive() {
        assert_eq!(Genre::parse("Silence"), Genre::Other("Silence".to_string()));
    }

    #[test]
    fn distance_and_norm() {
        let a = sample("G", "M", "salsa", "1", 0.0, [0.0, 0.0, 0.0]);
        let b = sample("G", "M", "salsa", "1", 1.0, [3.0, 4.0, 0.0]);
        assert_relative_eq!(b.distance_to(&a), 5.0);
        assert_relative_eq!(b.norm(), 5.0);
        assert_relative_eq!(a.norm(), 0.0);
    }

    #[test]
    fn store_collects_sorted_vocabularies() {
        let store = RecordStore::from_sources(vec![
            vec![sample("NM0004", "P2", "salsa", "1", 0.0, [0.0; 3])],
            vec![],
            vec![
                sample("NM0001", "P1", "silence", "1", 0.0, [0.0; 3]),
                sample("NM0001", "P1", "silence", "1", 0.1, [0.0; 3]),
            ],
        ]);

        assert_eq!(store.len(), 3);
        assert_eq!(store.run_count(), 2);
        assert_eq!(
            store.groups.iter().cloned().collect::<Vec<_>>(),
            vec!["NM0001".to_string(), "NM0004".to_string()]
        );
        assert_eq!(
            store.genres.iter().cloned().collect::<Vec<_>>(),
            vec![Genre::Silence, Genre::Salsa]
        );
        // Source order is preserved.
        assert_eq!(store.samples()[0].group, "NM0004");
    }

    #[test]
    fn with_more_appends_without_touching_original() {
        let store = RecordStore::from_samples(vec![sample("G", "M", "edm", "1", 0.0, [0.0; 3])]);
        let grown = store.with_more(vec![sample("H", "M", "edm", "1", 0.0, [0.0; 3])]);
        assert_eq!(store.len(), 1);
        assert_eq!(grown.len(), 2);
        assert!(grown.groups.contains("H"));
    }

    #[test]
    fn mean_disp_of_empty_series_is_none() {
        let agg = AggregatedGenreSeries {
            genre: Genre::Edm,
            runs: 0,
            series: Vec::new(),
        };
        assert!(agg.mean_disp().is_none());
    }
}

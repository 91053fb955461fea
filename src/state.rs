use std::collections::BTreeSet;

use crate::color::GenreColors;
use crate::config::ViewerConfig;
use crate::data::aggregate::{TimeDomain, time_domain};
use crate::data::displacement::{cumulative_by_genre, instantaneous_by_genre};
use crate::data::filter::{Selection, select, select_group, select_participant};
use crate::data::loader::load_sources;
use crate::data::model::{AggregatedGenreSeries, Genre, GenreSeries, RecordStore, Sample};
use crate::playback::Playback;
use crate::projection::View;

// ---------------------------------------------------------------------------
// View state: everything the derived series depend on
// ---------------------------------------------------------------------------

/// The user's current choices.  Replaced wholesale on every control change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub selection: Selection,
    pub view: View,
    /// Genres shown in the participant chart.
    pub participant_genres: BTreeSet<Genre>,
}

impl ViewState {
    /// First group and marker, silence if present, all genres enabled.
    /// `None` when the store is empty.
    pub fn initial(store: &RecordStore) -> Option<Self> {
        let genre = if store.genres.contains(&Genre::Silence) {
            Genre::Silence
        } else {
            store.genres.first()?.clone()
        };
        Some(ViewState {
            selection: Selection {
                group: store.groups.first()?.clone(),
                marker: store.markers.first()?.clone(),
                genre,
            },
            view: View::default(),
            participant_genres: store.genres.clone(),
        })
    }

    pub fn with_group(&self, group: String) -> Self {
        let mut next = self.clone();
        next.selection.group = group;
        next
    }

    pub fn with_marker(&self, marker: String) -> Self {
        let mut next = self.clone();
        next.selection.marker = marker;
        next
    }

    pub fn with_genre(&self, genre: Genre) -> Self {
        let mut next = self.clone();
        next.selection.genre = genre;
        next
    }

    pub fn with_view(&self, view: View) -> Self {
        Self { view, ..self.clone() }
    }

    /// Toggle a genre in the participant chart.
    pub fn toggling_participant_genre(&self, genre: &Genre) -> Self {
        let mut next = self.clone();
        if !next.participant_genres.remove(genre) {
            next.participant_genres.insert(genre.clone());
        }
        next
    }
}

// ---------------------------------------------------------------------------
// Derived series for one view state
// ---------------------------------------------------------------------------

/// Everything recomputed from scratch when the view state changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedSeries {
    /// Samples of the current selection, in source order.
    pub filtered: Vec<Sample>,
    /// Frame-to-frame displacement of the selection, per block.
    pub instantaneous: Vec<GenreSeries>,
    /// Cumulative per-genre averages over the selected group.
    pub group: Vec<AggregatedGenreSeries>,
    /// Cumulative per-genre averages over the selected participant.
    pub participant: Vec<AggregatedGenreSeries>,
}

impl DerivedSeries {
    pub fn compute(store: &RecordStore, view: &ViewState) -> Self {
        let records = store.samples();
        let sel = &view.selection;

        let filtered = select(records, sel);
        let instantaneous = instantaneous_by_genre(filtered.iter().copied());
        let group = cumulative_by_genre(select_group(records, &sel.group));
        let participant = cumulative_by_genre(select_participant(
            records,
            &sel.group,
            &sel.marker,
            &view.participant_genres,
        ));

        DerivedSeries {
            filtered: filtered.into_iter().cloned().collect(),
            instantaneous,
            group,
            participant,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Loaded samples (empty until a source loads).
    pub store: RecordStore,

    /// Cumulative per-genre averages over every sample.
    pub overview: Vec<AggregatedGenreSeries>,

    /// Time extent of `overview`, shared by every cumulative chart.
    pub time_domain: TimeDomain,

    /// Current choices; `None` while the store is empty.
    pub view: Option<ViewState>,

    /// Series derived from `view`.
    pub derived: DerivedSeries,

    pub colors: GenreColors,

    /// Head animation over `derived.filtered`.
    pub playback: Playback,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            store: RecordStore::default(),
            overview: Vec::new(),
            time_domain: TimeDomain::EMPTY,
            view: None,
            derived: DerivedSeries::default(),
            colors: GenreColors::default(),
            playback: Playback::default(),
            status_message: None,
        }
    }

    /// Load the configured sources.  Failed sources are reported in the
    /// status line and otherwise skipped.
    pub fn load_configured_sources(&mut self, now: f64) {
        let report = load_sources(&self.config.source_paths());
        self.status_message = (!report.failures.is_empty())
            .then(|| format!("Failed to load: {}", report.failures.join("; ")));
        self.set_store(RecordStore::from_sources(report.sources), now);
    }

    /// Ingest a newly loaded store and reset the view.
    pub fn set_store(&mut self, store: RecordStore, now: f64) {
        log::info!(
            "{} samples in {} runs across groups {:?}",
            store.len(),
            store.run_count(),
            store.groups
        );
        self.overview = cumulative_by_genre(store.samples());
        self.time_domain = time_domain(self.overview.iter().map(|s| s.series.as_slice()));
        self.colors = GenreColors::new(&store.genres);

        // Keep the current choices when they still make sense.  Genres new
        // to this store start enabled in the participant chart.
        let view = match self.view.take() {
            Some(mut v)
                if store.groups.contains(&v.selection.group)
                    && store.markers.contains(&v.selection.marker) =>
            {
                v.participant_genres
                    .extend(store.genres.difference(&self.store.genres).cloned());
                Some(v)
            }
            _ => ViewState::initial(&store),
        };
        self.store = store;
        match view {
            Some(v) => self.apply_view(v, now),
            None => {
                self.derived = DerivedSeries::default();
                self.playback = Playback::default();
            }
        }
    }

    /// Add samples from one more source.
    pub fn append_samples(&mut self, samples: Vec<Sample>, now: f64) {
        let store = self.store.with_more(samples);
        self.set_store(store, now);
    }

    /// Switch to `next`, recomputing derived series.  The head animation
    /// restarts only when the selection or the projection changed.  No-op
    /// when nothing changed.
    pub fn apply_view(&mut self, next: ViewState, now: f64) {
        if self.view.as_ref() == Some(&next) {
            return;
        }
        let restart = !matches!(
            &self.view,
            Some(v) if v.selection == next.selection && v.view == next.view
        );
        self.derived = DerivedSeries::compute(&self.store, &next);
        log::debug!(
            "Selection {:?}: {} samples, {} block series",
            next.selection,
            self.derived.filtered.len(),
            self.derived.instantaneous.len()
        );
        if restart {
            let pb = &self.config.playback;
            self.playback.start(self.derived.filtered.len(), pb.step, pb.interval_s, now);
        }
        self.view = Some(next);
    }

    /// Sample the head is currently at, if the animation has started.
    pub fn current_sample(&self) -> Option<&Sample> {
        self.derived.filtered.get(self.playback.current()?)
    }
}

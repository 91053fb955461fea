//! Head motion viewer.
//!
//! Loads motion-capture head positions (group, marker, block, genre, time,
//! x/y/z in mm), filters them by group / marker / genre and derives two kinds
//! of displacement series:
//!
//! * **instantaneous** – frame-to-frame distance per (genre, block), see
//!   [`data::displacement::instantaneous_by_genre`];
//! * **cumulative** – distance from origin on a run-relative clock, averaged
//!   over the runs of each genre, see [`data::displacement::cumulative_by_genre`].
//!
//! The egui front end in [`app`] renders them next to an animated head and
//! front/top/side projections.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod playback;
pub mod projection;
pub mod state;
pub mod ui;

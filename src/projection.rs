use std::fmt;

use crate::data::model::Sample;

// ---------------------------------------------------------------------------
// Coordinate axes and camera views
// ---------------------------------------------------------------------------

/// One of the three coordinate columns of a [`Sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisField {
    X,
    Y,
    Z,
}

impl AxisField {
    pub fn value(self, sample: &Sample) -> f64 {
        match self {
            AxisField::X => sample.x_mm,
            AxisField::Y => sample.y_mm,
            AxisField::Z => sample.z_mm,
        }
    }

    /// Source column name, used as the plot axis label.
    pub fn column(self) -> &'static str {
        match self {
            AxisField::X => "x_mm",
            AxisField::Y => "y_mm",
            AxisField::Z => "z_mm",
        }
    }
}

/// Direction the head is looked at from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Front,
    Top,
    Side,
}

impl View {
    pub const ALL: [View; 3] = [View::Front, View::Top, View::Side];

    /// Horizontal and vertical axes of the projection scatter.
    pub fn axes(self) -> (AxisField, AxisField) {
        match self {
            View::Front => (AxisField::X, AxisField::Z),
            View::Top => (AxisField::X, AxisField::Y),
            View::Side => (AxisField::Y, AxisField::Z),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            View::Front => "Front",
            View::Top => "Top",
            View::Side => "Side",
        })
    }
}

/// 2D coordinates of `records` on the chosen axis pair, in input order.
pub fn scatter_points<'a, I>(records: I, x: AxisField, y: AxisField) -> Vec<[f64; 2]>
where
    I: IntoIterator<Item = &'a Sample>,
{
    records
        .into_iter()
        .map(|s| [x.value(s), y.value(s)])
        .collect()
}

/// Screen-space offset of the head for `sample` seen from `view`.
///
/// Screen y grows downward, so the vertical axis is negated.
pub fn head_offset(view: View, sample: &Sample, scale: f64) -> [f64; 2] {
    let (h, v) = view.axes();
    [h.value(sample) * scale, -v.value(sample) * scale]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::sample;

    #[test]
    fn views_pick_their_axis_pairs() {
        let s = sample("G", "M", "edm", "1", 0.0, [1.0, 2.0, 3.0]);
        assert_eq!(head_offset(View::Front, &s, 1.5), [1.5, -4.5]);
        assert_eq!(head_offset(View::Top, &s, 1.5), [1.5, -3.0]);
        assert_eq!(head_offset(View::Side, &s, 1.5), [3.0, -4.5]);
    }

    #[test]
    fn scatter_follows_input_order() {
        let records = vec![
            sample("G", "M", "edm", "1", 1.0, [1.0, 2.0, 3.0]),
            sample("G", "M", "edm", "1", 0.0, [4.0, 5.0, 6.0]),
        ];
        let (x, y) = View::Side.axes();
        assert_eq!(scatter_points(&records, x, y), vec![[2.0, 3.0], [5.0, 6.0]]);
        assert_eq!(x.column(), "y_mm");
    }
}

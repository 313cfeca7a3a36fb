//! Time axis and envelope interpolation

use ndarray::{Array1, ArrayView1};

/// Mapping from audio sample index to time and to field column position.
///
/// Sample `0` sits at t = 0 and field column 0; the last sample sits at
/// t = `duration` and field position `width`, past the last column.
#[derive(Debug, Clone, Copy)]
pub struct TimeAxis {
    samples: usize,
    duration: f64,
    width: usize,
}

impl TimeAxis {
    pub fn new(samples: usize, duration: f64, width: usize) -> Self {
        Self { samples, duration, width }
    }

    pub fn len(&self) -> usize {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    fn fraction(&self, index: usize) -> f64 {
        if self.samples < 2 {
            return 0.0;
        }
        index as f64 / (self.samples - 1) as f64
    }

    pub fn time(&self, index: usize) -> f64 {
        self.fraction(index) * self.duration
    }

    pub fn field_position(&self, index: usize) -> f64 {
        self.fraction(index) * self.width as f64
    }
}

/// Interpolation weights for a fractional position inside a row of `len`
/// points. Positions before the first point or past the last one hold the
/// edge value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lerp {
    pub lower: usize,
    pub upper: usize,
    pub fraction: f64,
}

impl Lerp {
    pub fn at(position: f64, len: usize) -> Self {
        let last = len.saturating_sub(1);
        if position <= 0.0 || last == 0 {
            return Self { lower: 0, upper: 0, fraction: 0.0 };
        }
        if position >= last as f64 {
            return Self { lower: last, upper: last, fraction: 0.0 };
        }
        let lower = position.floor() as usize;
        Self { lower, upper: lower + 1, fraction: position - lower as f64 }
    }

    pub fn apply(&self, row: &[f64]) -> f64 {
        let a = row[self.lower];
        a + (row[self.upper] - a) * self.fraction
    }
}

/// Stretch one field row over the audio time axis
pub fn envelope(row: ArrayView1<f32>, axis: &TimeAxis) -> Array1<f64> {
    let values: Vec<f64> = row.iter().map(|&v| v as f64).collect();
    Array1::from_shape_fn(axis.len(), |i| Lerp::at(axis.field_position(i), values.len()).apply(&values))
}

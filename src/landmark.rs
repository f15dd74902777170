use ndarray::{Array3, ArrayView3, Axis};

use crate::{setting::ClampBound, Error, Result};

pub type LandmarkArray = ndarray::Array<f32, ndarray::Dim<[usize; 3]>>;

/// Landmark batch of shape `[batch, points, coords]`, with `coords >= 2`.
/// Column 0 is x (heatmap column) and column 1 is y (heatmap row).
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks(pub LandmarkArray);

/// Integer pixel location of a landmark on the heatmap grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub row: usize,
    pub col: usize,
}

impl Landmarks {
    pub fn new(array: LandmarkArray) -> Result<Self> {
        if array.dim().2 < 2 {
            return Err(Error::InvalidInputShape(format!(
                "landmarks need at least 2 coordinates per point, got {}",
                array.dim().2
            )));
        }
        Ok(Self(array))
    }

    /// Zero-sample batch that still carries its point and coordinate counts.
    pub fn empty(points: usize, coords: usize) -> Result<Self> {
        Self::new(Array3::zeros((0, points, coords)))
    }

    /// Builds a `[batch, points, 2]` set; every sample must hold the same number of points.
    ///
    /// An empty `samples` cannot tell its point count, use [`Landmarks::empty`] instead.
    pub fn from_points(samples: Vec<Vec<[f32; 2]>>) -> Result<Self> {
        let points = samples.first().map_or(0, Vec::len);
        if let Some(ragged) = samples.iter().position(|s| s.len() != points) {
            return Err(Error::InvalidInputShape(format!(
                "sample {} has {} points, expected {}",
                ragged,
                samples[ragged].len(),
                points
            )));
        }

        let batch = samples.len();
        let flat: Vec<f32> = samples.into_iter().flatten().flatten().collect();
        Self::new(Array3::from_shape_vec((batch, points, 2), flat)?)
    }

    /// Parses nested `[[[x, y, ...], ...], ...]` arrays. `[]` yields a `[0, 0, 2]` set.
    pub fn from_json(json: &str) -> Result<Self> {
        let samples: Vec<Vec<Vec<f32>>> =
            serde_json::from_str(json).map_err(Error::SerializationError)?;
        let batch = samples.len();
        let points = samples.first().map_or(0, Vec::len);
        let coords = samples
            .first()
            .and_then(|s| s.first())
            .map_or(2, Vec::len);

        if samples
            .iter()
            .any(|s| s.len() != points || s.iter().any(|p| p.len() != coords))
        {
            return Err(Error::InvalidInputShape(
                "landmark json is ragged".to_string(),
            ));
        }

        let flat: Vec<f32> = samples.into_iter().flatten().flatten().collect();
        Self::new(Array3::from_shape_vec((batch, points, coords), flat)?)
    }

    pub fn batch(&self) -> usize {
        self.0.dim().0
    }

    pub fn points(&self) -> usize {
        self.0.dim().1
    }

    pub fn view(&self) -> ArrayView3<f32> {
        self.0.view()
    }

    /// Truncates every (x, y) toward zero and clamps it onto the grid.
    ///
    /// With [`ClampBound::Height`] both coordinates share the `height - 1` bound,
    /// so a column may still land past `width - 1` on a tall grid.
    pub fn to_pixels(&self, height: usize, width: usize, clamp: ClampBound) -> Vec<Vec<Pixel>> {
        let (row_max, col_max) = match clamp {
            ClampBound::Height => (height.saturating_sub(1), height.saturating_sub(1)),
            ClampBound::PerAxis => (height.saturating_sub(1), width.saturating_sub(1)),
        };

        self.0
            .axis_iter(Axis(0))
            .map(|sample| {
                sample
                    .outer_iter()
                    .map(|point| Pixel {
                        row: truncate_clamp(point[1], row_max),
                        col: truncate_clamp(point[0], col_max),
                    })
                    .collect::<Vec<Pixel>>()
            })
            .collect()
    }
}

// `as` truncates toward zero, saturates at the integer bounds and maps NaN to 0.
fn truncate_clamp(coord: f32, max: usize) -> usize {
    (coord as i64).clamp(0, max as i64) as usize
}

impl From<Landmarks> for LandmarkArray {
    fn from(value: Landmarks) -> Self {
        value.0
    }
}

impl TryFrom<LandmarkArray> for Landmarks {
    type Error = Error;

    fn try_from(value: LandmarkArray) -> Result<Self> {
        Self::new(value)
    }
}

impl std::ops::Deref for Landmarks {
    type Target = LandmarkArray;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use ndarray::Array3;

    use super::{Landmarks, Pixel};
    use crate::setting::ClampBound;

    #[test]
    fn truncates_toward_zero() {
        let landmarks = Landmarks::from_points(vec![vec![[10.9, 3.2], [-0.7, 99.99]]])
            .expect("Failed to build landmarks");
        let pixels = landmarks.to_pixels(256, 256, ClampBound::Height);

        assert_eq!(pixels[0][0], Pixel { row: 3, col: 10 });
        assert_eq!(pixels[0][1], Pixel { row: 99, col: 0 });
    }

    #[test]
    fn clamps_outliers_onto_the_grid() {
        let landmarks = Landmarks::from_points(vec![vec![[-5., 266.], [f32::NAN, f32::INFINITY]]])
            .expect("Failed to build landmarks");
        let pixels = landmarks.to_pixels(256, 256, ClampBound::Height);

        assert_eq!(pixels[0][0], Pixel { row: 255, col: 0 });
        assert_eq!(pixels[0][1], Pixel { row: 255, col: 0 });
    }

    #[test]
    fn height_bound_applies_to_both_axes() {
        let landmarks =
            Landmarks::from_points(vec![vec![[300., 300.]]]).expect("Failed to build landmarks");

        assert_eq!(
            landmarks.to_pixels(64, 128, ClampBound::Height)[0][0],
            Pixel { row: 63, col: 63 }
        );
        assert_eq!(
            landmarks.to_pixels(64, 128, ClampBound::PerAxis)[0][0],
            Pixel { row: 63, col: 127 }
        );
    }

    #[test]
    fn ignores_extra_coordinates() {
        let landmarks = Landmarks::new(Array3::from_shape_fn((2, 3, 3), |(b, p, k)| {
            (b * 10 + p) as f32 + k as f32 * 100.
        }))
        .expect("Failed to build landmarks");
        let pixels = landmarks.to_pixels(512, 512, ClampBound::Height);

        assert_eq!(pixels.len(), 2);
        assert_eq!(pixels[1][2], Pixel { row: 112, col: 12 });
    }

    #[test]
    fn rejects_single_coordinate_points() {
        assert!(matches!(
            Landmarks::new(Array3::zeros((1, 68, 1))),
            Err(crate::Error::InvalidInputShape(_))
        ));
    }

    #[test]
    fn rejects_ragged_samples() {
        assert!(matches!(
            Landmarks::from_points(vec![vec![[1., 1.]], vec![]]),
            Err(crate::Error::InvalidInputShape(_))
        ));
        assert!(matches!(
            Landmarks::from_json("[[[1, 2], [3]]]"),
            Err(crate::Error::InvalidInputShape(_))
        ));
    }

    #[test]
    fn empty_batch_keeps_point_count() {
        let landmarks = Landmarks::empty(68, 3).expect("Failed to build landmarks");

        assert_eq!(landmarks.dim(), (0, 68, 3));
        assert_eq!((landmarks.batch(), landmarks.points()), (0, 68));
        assert!(landmarks.to_pixels(256, 256, ClampBound::Height).is_empty());
        assert!(matches!(
            Landmarks::empty(68, 1),
            Err(crate::Error::InvalidInputShape(_))
        ));
    }

    #[test]
    fn view_reads_landmarks_in_place() {
        let landmarks = Landmarks::from_points(vec![vec![[1.5, 2.5]], vec![[3.5, 4.5]]])
            .expect("Failed to build landmarks");
        let view = landmarks.view();

        assert_eq!(view.dim(), (2, 1, 2));
        assert_eq!(view[(1, 0, 0)], 3.5);
        assert_eq!(view[(0, 0, 1)], 2.5);
    }

    #[test]
    fn parses_json_landmarks() {
        let landmarks =
            Landmarks::from_json("[[[10, 10, 0.9], [100, 200, 0.4]]]").expect("Failed to parse");

        assert_eq!(landmarks.dim(), (1, 2, 3));
        assert_eq!(landmarks[(0, 1, 1)], 200.);
    }
}

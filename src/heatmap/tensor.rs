use rayon::iter::{IntoParallelIterator, ParallelIterator};

pub type HeatmapData = ndarray::Array<f32, ndarray::Dim<[usize; 4]>>;

/// `[batch, channels, height, width]` heatmap stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap(pub HeatmapData);

/// Location and value of a plane's maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub row: usize,
    pub col: usize,
    pub value: f32,
}

impl Heatmap {
    pub fn new(array: HeatmapData) -> Self {
        Self(array)
    }

    pub fn into_inner(self) -> HeatmapData {
        self.0
    }

    pub fn max(&self) -> f32 {
        self.0.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Arg-max per (batch, channel); ties resolve to the first pixel in row-major order.
    pub fn peaks(&self) -> Vec<Vec<Peak>> {
        let (n, c, _, _) = self.dim();
        (0..n)
            .into_par_iter()
            .map(|b| (0..c).map(|ch| self.plane_peak(b, ch)).collect::<Vec<Peak>>())
            .collect()
    }

    pub fn to_image(&self, batch: usize, channel: usize) -> Option<image::GrayImage> {
        let (n, c, height, width) = self.dim();
        if batch >= n || channel >= c {
            return None;
        }
        Some(image::GrayImage::from_par_fn(
            width as u32,
            height as u32,
            |x, y| {
                let value = self[[batch, channel, y as usize, x as usize]];
                image::Luma([(value.clamp(0., 1.) * 255.) as u8])
            },
        ))
    }

    fn plane_peak(&self, batch: usize, channel: usize) -> Peak {
        let plane = self.0.slice(ndarray::s![batch, channel, .., ..]);
        plane.indexed_iter().fold(
            Peak {
                row: 0,
                col: 0,
                value: f32::NEG_INFINITY,
            },
            |best, ((row, col), &value)| {
                if value > best.value {
                    Peak { row, col, value }
                } else {
                    best
                }
            },
        )
    }
}

impl From<HeatmapData> for Heatmap {
    fn from(value: HeatmapData) -> Self {
        Self(value)
    }
}

impl From<Heatmap> for HeatmapData {
    fn from(value: Heatmap) -> Self {
        value.0
    }
}

impl std::ops::Deref for Heatmap {
    type Target = HeatmapData;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for Heatmap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

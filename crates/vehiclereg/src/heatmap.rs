//! Heatmap payload for the external map renderer.
//!
//! The renderer is not part of this crate. It receives the points to plot,
//! the map center, and the initial zoom as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::vehicle::Coordinate;

/// Default initial zoom level.
pub const DEFAULT_ZOOM_START: u8 = 6;

/// Data needed to draw a vehicle distribution heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    /// Map center: the mean of all points.
    pub center: Coordinate,
    /// Initial zoom level.
    pub zoom_start: u8,
    /// Points to plot.
    pub points: Vec<Coordinate>,
}

impl Heatmap {
    /// Build a heatmap from `points`, centered on their mean.
    ///
    /// Returns `None` when there are no points to plot.
    #[must_use]
    pub fn from_points(points: Vec<Coordinate>, zoom_start: u8) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let n = points.len() as f64;
        let (lat_sum, lon_sum) = points.iter().fold((0.0, 0.0), |(lat, lon), p| {
            (lat + p.latitude, lon + p.longitude)
        });

        Some(Self {
            center: Coordinate::new(lat_sum / n, lon_sum / n),
            zoom_start,
            points,
        })
    }

    /// Number of points on the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the heatmap has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Serialize the payload as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON payload to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        info!(points = self.len(), "Wrote heatmap to {}", path.display());
        Ok(())
    }
}

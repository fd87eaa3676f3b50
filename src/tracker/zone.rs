//! Named rectangular zones and position classification.

use std::collections::BTreeMap;
use std::path::Path;

use nalgebra::Point2;
use thiserror::Error;

use crate::tracker::rect::Rect;

/// Label of the implicit zone covering everything outside the defined
/// rectangles. A subject that matches no zone is "in the center".
pub const CENTER_LABEL: &str = "center";

/// Error type for loading a zone-definitions file.
#[derive(Debug, Error)]
pub enum ZoneSetError {
    /// The definitions file could not be read.
    #[error("failed to read zone definitions {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The definitions file is not a valid label-to-rectangle map.
    #[error("failed to parse zone definitions {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// A zone label collides with the reserved center label.
    #[error("zone label {0:?} is reserved")]
    ReservedLabel(String),
}

/// A named rectangular region of interest within the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    /// User-visible zone label
    pub label: String,
    /// Zone rectangle in frame coordinates
    pub rect: Rect,
}

impl Zone {
    pub fn new(label: impl Into<String>, rect: Rect) -> Self {
        Self {
            label: label.into(),
            rect,
        }
    }
}

/// Immutable, ordered collection of zones.
///
/// The sequence order is the priority order: when user-drawn rectangles
/// overlap, the first zone whose rectangle contains the position wins.
/// Overlap is a supported, deterministic case, not an error.
#[derive(Debug, Clone, Default)]
pub struct ZoneSet {
    zones: Vec<Zone>,
}

impl ZoneSet {
    /// Create a zone set with an explicit priority order.
    ///
    /// Labels must not collide with [`CENTER_LABEL`].
    pub fn new(zones: Vec<Zone>) -> Result<Self, ZoneSetError> {
        for zone in &zones {
            if zone.label == CENTER_LABEL {
                return Err(ZoneSetError::ReservedLabel(zone.label.clone()));
            }
        }
        Ok(Self { zones })
    }

    /// Create a zone set from interactively drawn rectangles.
    ///
    /// Rectangles are labelled `"Area {index}"` in draw order, matching the
    /// run-time mapping produced by ROI selection.
    pub fn from_rects(rects: impl IntoIterator<Item = Rect>) -> Self {
        let zones = rects
            .into_iter()
            .enumerate()
            .map(|(idx, rect)| Zone::new(format!("Area {idx}"), rect))
            .collect();
        Self { zones }
    }

    /// Load a zone set from a JSON definitions file.
    ///
    /// The file is a map of `label -> [x, y, width, height]`, conventionally
    /// named after the video's base name. JSON objects carry no order, so
    /// zones are prioritized by ascending label.
    pub fn from_definitions_file(path: impl AsRef<Path>) -> Result<Self, ZoneSetError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ZoneSetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let defs: BTreeMap<String, [f32; 4]> =
            serde_json::from_str(&contents).map_err(|source| ZoneSetError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let zones = defs
            .into_iter()
            .map(|(label, [x, y, w, h])| Zone::new(label, Rect::new(x, y, w, h)))
            .collect();
        Self::new(zones)
    }

    /// Number of defined zones, not counting the implicit center.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Iterate over zones in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    /// Zone labels in priority order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(|z| z.label.as_str())
    }

    /// Classify a candidate position into a zone label.
    ///
    /// `None` means "no detection this frame": the center label is returned
    /// without any membership test, and callers must key counter updates off
    /// the absent position, not the returned label.
    ///
    /// For a concrete position, zones are tested in priority order and the
    /// first containing rectangle wins; a position inside no rectangle is
    /// classified [`CENTER_LABEL`].
    pub fn classify(&self, position: Option<Point2<f32>>) -> &str {
        let Some(point) = position else {
            return CENTER_LABEL;
        };
        self.zones
            .iter()
            .find(|zone| zone.rect.contains(point))
            .map_or(CENTER_LABEL, |zone| zone.label.as_str())
    }
}

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use shared_models::Coordinates;

use crate::models::{Doctor, DoctorError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerTarget {
    Doctor { doctor_id: String },
    Facility { name: String, category: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub id: String,
    pub label: String,
    pub coords: Coordinates,
    pub target: MarkerTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// A non-doctor place to plot, such as a facility suggested alongside a match.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPlace {
    pub name: String,
    pub category: String,
    pub coords: Option<Coordinates>,
}

/// Receives marker activations. Implemented by whatever owns the selection state.
pub trait MarkerSelectionHandler {
    fn on_marker_selected(&mut self, target: &MarkerTarget) -> Result<(), DoctorError>;
}

/// Renderer-independent projection of doctors and places onto map markers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MapView {
    markers: Vec<MapMarker>,
}

impl MapView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doctors(mut self, doctors: &[Doctor]) -> Self {
        for doctor in doctors {
            let Some(coords) = doctor.coords else {
                debug!("Doctor {} has no coordinates, not plotted", doctor.id);
                continue;
            };

            self.markers.push(MapMarker {
                id: format!("doctor:{}", doctor.id),
                label: format!("{} ({})", doctor.name, doctor.hospital),
                coords,
                target: MarkerTarget::Doctor { doctor_id: doctor.id.clone() },
            });
        }
        self
    }

    /// Places keep their position in `places` as marker id, so ids stay stable
    /// even when some places lack coordinates.
    pub fn with_places(mut self, places: &[MapPlace]) -> Self {
        for (index, place) in places.iter().enumerate() {
            let Some(coords) = place.coords.filter(Coordinates::is_valid) else {
                continue;
            };

            self.markers.push(MapMarker {
                id: format!("facility:{}", index),
                label: place.name.clone(),
                coords,
                target: MarkerTarget::Facility {
                    name: place.name.clone(),
                    category: place.category.clone(),
                },
            });
        }
        self
    }

    pub fn markers(&self) -> &[MapMarker] {
        &self.markers
    }

    /// Smallest box holding every marker, `None` on an empty map.
    pub fn bounds(&self) -> Option<MapBounds> {
        let first = self.markers.first()?.coords;
        let initial = MapBounds {
            south: first.lat,
            west: first.lng,
            north: first.lat,
            east: first.lng,
        };

        Some(self.markers.iter().fold(initial, |b, m| MapBounds {
            south: b.south.min(m.coords.lat),
            west: b.west.min(m.coords.lng),
            north: b.north.max(m.coords.lat),
            east: b.east.max(m.coords.lng),
        }))
    }

    pub fn activate(
        &self,
        marker_id: &str,
        handler: &mut dyn MarkerSelectionHandler,
    ) -> Result<MarkerTarget, DoctorError> {
        let marker = self
            .markers
            .iter()
            .find(|m| m.id == marker_id)
            .ok_or_else(|| {
                warn!("Activation of unknown marker {}", marker_id);
                DoctorError::UnknownMarker(marker_id.to_string())
            })?;

        debug!("Marker {} activated", marker.id);
        handler.on_marker_selected(&marker.target)?;
        Ok(marker.target.clone())
    }
}

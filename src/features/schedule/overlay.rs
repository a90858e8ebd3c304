//! Map overlay descriptions for a booking's route.
//!
//! The path is a cosmetic curve between the two endpoints, not a road route. Real
//! directions are handed off to Google Maps.

use std::collections::HashMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::schedule::board::{Coordinate, RouteEndpoints};

pub const CURVE_SEGMENTS: usize = 20;
pub const CURVE_AMPLITUDE: f64 = 0.001;
pub const INITIAL_ZOOM: u8 = 13;
const DIRECTIONS_BASE_URL: &str = "https://www.google.com/maps/dir/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OverlayVariant {
    /// Booking details before pickup: vehicle near the pickup, curved path
    Details,
    /// Accepted or arrived booking: vehicle mid-route, dashed path through it
    Ongoing,
}

impl OverlayVariant {
    pub fn default_container(&self) -> &'static str {
        match self {
            OverlayVariant::Details => "bookingMap",
            OverlayVariant::Ongoing => "ongoingBookingMap",
        }
    }

    fn padding_px(&self) -> u16 {
        match self {
            OverlayVariant::Details => 60,
            OverlayVariant::Ongoing => 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Pickup,
    Dropoff,
    Vehicle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub position: Coordinate,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoutePath {
    pub points: Vec<Coordinate>,
    pub dashed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    /// Smallest box containing every point; `None` for an empty set
    pub fn covering(points: &[Coordinate]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Bounds {
            south_west: *first,
            north_east: *first,
        };
        for point in &points[1..] {
            bounds.south_west.lat = bounds.south_west.lat.min(point.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(point.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(point.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(point.lng);
        }
        Some(bounds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Viewport {
    pub center: Coordinate,
    pub zoom: u8,
    pub bounds: Bounds,
    pub padding_px: u16,
}

/// Everything a map widget needs to draw one booking's route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MapOverlay {
    pub container: String,
    pub booking_id: Uuid,
    pub variant: OverlayVariant,
    pub markers: Vec<MapMarker>,
    pub path: RoutePath,
    pub viewport: Viewport,
    pub directions_url: String,
}

fn midpoint(a: Coordinate, b: Coordinate) -> Coordinate {
    Coordinate::new((a.lat + b.lat) / 2.0, (a.lng + b.lng) / 2.0)
}

/// Linear interpolation bent sideways by `sin(pi * t) * 0.001`, `CURVE_SEGMENTS + 1` points
pub fn curved_path(pickup: Coordinate, dropoff: Coordinate) -> Vec<Coordinate> {
    (0..=CURVE_SEGMENTS)
        .map(|i| {
            let t = i as f64 / CURVE_SEGMENTS as f64;
            let lat = pickup.lat + (dropoff.lat - pickup.lat) * t;
            let lng = pickup.lng + (dropoff.lng - pickup.lng) * t;
            let curve = (t * PI).sin() * CURVE_AMPLITUDE;
            Coordinate::new(lat + curve, lng + curve * 0.5)
        })
        .collect()
}

pub fn directions_url(pickup: Coordinate, dropoff: Coordinate) -> String {
    format!(
        "{}?api=1&origin={},{}&destination={},{}&travelmode=driving",
        DIRECTIONS_BASE_URL, pickup.lat, pickup.lng, dropoff.lat, dropoff.lng
    )
}

impl MapOverlay {
    pub fn build(
        container: impl Into<String>,
        booking_id: Uuid,
        variant: OverlayVariant,
        endpoints: RouteEndpoints,
        pickup_label: &str,
        dropoff_label: &str,
    ) -> Self {
        let RouteEndpoints { pickup, dropoff } = endpoints;
        let center = midpoint(pickup, dropoff);

        let (vehicle, path) = match variant {
            OverlayVariant::Details => (
                pickup.offset(-0.002, -0.002),
                RoutePath {
                    points: curved_path(pickup, dropoff),
                    dashed: false,
                },
            ),
            OverlayVariant::Ongoing => {
                let vehicle = center.offset(0.002, -0.001);
                (
                    vehicle,
                    RoutePath {
                        points: vec![pickup, vehicle, dropoff],
                        dashed: true,
                    },
                )
            }
        };

        let markers = vec![
            MapMarker {
                kind: MarkerKind::Pickup,
                position: pickup,
                label: pickup_label.to_string(),
            },
            MapMarker {
                kind: MarkerKind::Dropoff,
                position: dropoff,
                label: dropoff_label.to_string(),
            },
            MapMarker {
                kind: MarkerKind::Vehicle,
                position: vehicle,
                label: "Your Location".to_string(),
            },
        ];

        let positions: Vec<Coordinate> = markers.iter().map(|m| m.position).collect();
        let bounds = Bounds::covering(&positions).unwrap_or(Bounds {
            south_west: center,
            north_east: center,
        });

        Self {
            container: container.into(),
            booking_id,
            variant,
            markers,
            path,
            viewport: Viewport {
                center,
                zoom: INITIAL_ZOOM,
                bounds,
                padding_px: variant.padding_px(),
            },
            directions_url: directions_url(pickup, dropoff),
        }
    }
}

/// Open overlays of one driver, at most one per container
#[derive(Debug, Default)]
pub struct OverlayRegistry {
    overlays: HashMap<String, MapOverlay>,
}

impl OverlayRegistry {
    /// Binds `overlay` to its container, returning whatever it displaced
    pub fn open(&mut self, overlay: MapOverlay) -> Option<MapOverlay> {
        self.overlays.insert(overlay.container.clone(), overlay)
    }

    /// Unknown containers are a no-op
    pub fn close(&mut self, container: &str) -> Option<MapOverlay> {
        self.overlays.remove(container)
    }

    /// Tears down every overlay showing `booking_id`, returns how many
    pub fn close_for_booking(&mut self, booking_id: Uuid) -> usize {
        let before = self.overlays.len();
        self.overlays.retain(|_, o| o.booking_id != booking_id);
        before - self.overlays.len()
    }

    /// Containers with an open overlay, sorted
    pub fn containers(&self) -> Vec<String> {
        let mut containers: Vec<String> = self.overlays.keys().cloned().collect();
        containers.sort();
        containers
    }

    #[cfg(test)]
    pub fn get(&self, container: &str) -> Option<&MapOverlay> {
        self.overlays.get(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn endpoints() -> RouteEndpoints {
        RouteEndpoints {
            pickup: Coordinate::new(14.6560, 121.0320),
            dropoff: Coordinate::new(14.6488, 121.0499),
        }
    }

    fn close(a: Coordinate, b: Coordinate) -> bool {
        (a.lat - b.lat).abs() < EPS && (a.lng - b.lng).abs() < EPS
    }

    fn within(bounds: &Bounds, point: &Coordinate) -> bool {
        (bounds.south_west.lat..=bounds.north_east.lat).contains(&point.lat)
            && (bounds.south_west.lng..=bounds.north_east.lng).contains(&point.lng)
    }

    #[test]
    fn test_curved_path_shape() {
        let RouteEndpoints { pickup, dropoff } = endpoints();
        let path = curved_path(pickup, dropoff);

        assert_eq!(path.len(), 21);
        assert!(close(path[0], pickup));
        assert!(close(path[20], dropoff));

        let mid = midpoint(pickup, dropoff);
        assert!(close(path[10], mid.offset(0.001, 0.0005)));
    }

    #[test]
    fn test_details_overlay() {
        let id = Uuid::now_v7();
        let overlay = MapOverlay::build(
            "bookingMap",
            id,
            OverlayVariant::Details,
            endpoints(),
            "SM North EDSA",
            "QC Circle",
        );

        let vehicle = overlay
            .markers
            .iter()
            .find(|m| m.kind == MarkerKind::Vehicle)
            .unwrap();
        assert!(close(vehicle.position, Coordinate::new(14.6540, 121.0300)));
        assert_eq!(overlay.viewport.zoom, 13);
        assert_eq!(overlay.viewport.padding_px, 60);
        assert!(close(
            overlay.viewport.center,
            Coordinate::new(14.6524, 121.04095)
        ));
        assert!(overlay
            .markers
            .iter()
            .all(|m| within(&overlay.viewport.bounds, &m.position)));
        assert!(!overlay.path.dashed);
        assert_eq!(
            overlay.directions_url,
            "https://www.google.com/maps/dir/?api=1&origin=14.656,121.032&destination=14.6488,121.0499&travelmode=driving"
        );
    }

    #[test]
    fn test_ongoing_overlay_routes_through_vehicle() {
        let overlay = MapOverlay::build(
            "ongoingBookingMap",
            Uuid::now_v7(),
            OverlayVariant::Ongoing,
            endpoints(),
            "SM North EDSA",
            "QC Circle",
        );

        assert_eq!(overlay.path.points.len(), 3);
        assert!(overlay.path.dashed);
        assert!(close(
            overlay.path.points[1],
            Coordinate::new(14.6544, 121.03995)
        ));
        assert_eq!(overlay.viewport.padding_px, 50);
    }

    #[test]
    fn test_registry_reopen_replaces_instance() {
        let mut registry = OverlayRegistry::default();
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();
        let build = |id| {
            MapOverlay::build("bookingMap", id, OverlayVariant::Details, endpoints(), "A", "B")
        };

        assert!(registry.open(build(first)).is_none());
        let displaced = registry.open(build(second)).unwrap();
        assert_eq!(displaced.booking_id, first);
        assert_eq!(registry.containers(), vec!["bookingMap"]);
        assert_eq!(registry.get("bookingMap").unwrap().booking_id, second);

        assert!(registry.close("bookingMap").is_some());
        assert!(registry.close("bookingMap").is_none());
        assert!(registry.containers().is_empty());
    }
}

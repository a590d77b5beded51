use crate::models::{Coordinates, GeoBoundingBox};
use geo::{HaversineDistance, Point};

/// Kilometres per degree of latitude
const KM_PER_DEGREE: f64 = 111.0;

/// Great-circle distance between two points in kilometres
#[inline]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let from = Point::new(a.lon, a.lat);
    let to = Point::new(b.lon, b.lat);

    from.haversine_distance(&to) / 1000.0
}

/// Calculate a bounding box around a center point
///
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude)
///
/// # Arguments
/// * `center` - Center point in degrees
/// * `radius_km` - Radius in kilometers
pub fn bounding_box_around(center: Coordinates, radius_km: f64) -> GeoBoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE;
    let lon_delta = radius_km / (KM_PER_DEGREE * center.lat.to_radians().cos().abs());

    GeoBoundingBox {
        top: center.lat + lat_delta,
        bottom: center.lat - lat_delta,
        left: center.lon - lon_delta,
        right: center.lon + lon_delta,
    }
}

#[inline]
pub fn is_within_bounding_box(point: Coordinates, bbox: &GeoBoundingBox) -> bool {
    point.lat >= bbox.bottom
        && point.lat <= bbox.top
        && point.lon >= bbox.left
        && point.lon <= bbox.right
}

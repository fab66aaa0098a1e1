// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geographic positions, bounds, and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean earth radius used for great-circle distances, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Number of decimals kept for coordinates captured from map clicks.
pub const COORDINATE_DECIMALS: u32 = 6;

/// A WGS84 position in decimal degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude, positive north.
    pub latitude: f64,
    /// Longitude, positive east.
    pub longitude: f64,
}

impl LatLng {
    /// Create a position from latitude and longitude.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components lie in their WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle (haversine) distance to `other`, in kilometers.
    pub fn haversine_km(&self, other: &Self) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }

    /// Round both components to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self::new(
            round_to(self.latitude, decimals),
            round_to(self.longitude, decimals),
        )
    }
}

/// Round `value` to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10_f64.powi(decimals.min(15) as i32);
    (value * scale).round() / scale
}

/// An axis-aligned box in latitude/longitude space.
///
/// Bounds never wrap the antimeridian; `west <= east` and `south <= north`
/// hold for every value built through the constructors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Northern latitude edge.
    pub north: f64,
    /// Southern latitude edge.
    pub south: f64,
    /// Eastern longitude edge.
    pub east: f64,
    /// Western longitude edge.
    pub west: f64,
}

impl GeoBounds {
    /// The bounds spanned by two opposite corners, in any order.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            north: a.latitude.max(b.latitude),
            south: a.latitude.min(b.latitude),
            east: a.longitude.max(b.longitude),
            west: a.longitude.min(b.longitude),
        }
    }

    /// The tightest bounds around `points`, or `None` when empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a LatLng>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self::from_corners(first, first), |acc, p| {
            acc.union(&Self::from_corners(*p, *p))
        }))
    }

    /// Bounds around a circle of `radius_m` meters centered at `center`.
    pub fn around_circle(center: LatLng, radius_m: f64) -> Self {
        let d_lat = (radius_m / 1000.0 / EARTH_RADIUS_KM).to_degrees();
        let cos = center.latitude.to_radians().cos().abs().max(1e-9);
        let d_lon = d_lat / cos;
        Self {
            north: center.latitude + d_lat,
            south: center.latitude - d_lat,
            east: center.longitude + d_lon,
            west: center.longitude - d_lon,
        }
    }

    /// Whether `point` lies inside or on the edge of these bounds.
    pub fn contains(&self, point: &LatLng) -> bool {
        point.latitude >= self.south
            && point.latitude <= self.north
            && point.longitude >= self.west
            && point.longitude <= self.east
    }

    /// The smallest bounds containing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            north: self.north.max(other.north),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            west: self.west.min(other.west),
        }
    }
}

/// Human-readable distance: whole meters below one kilometer, else kilometers
/// with two decimals.
///
/// ```
/// use fibermap_model::format_distance;
/// assert_eq!(format_distance(0.85), "850m");
/// assert_eq!(format_distance(1.254), "1.25km");
/// ```
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0}m", km * 1000.0)
    } else {
        format!("{km:.2}km")
    }
}

/// Human-readable position with hemisphere suffixes, six decimals each.
pub fn format_coordinates(position: &LatLng) -> String {
    let ns = if position.latitude >= 0.0 { 'N' } else { 'S' };
    let ew = if position.longitude >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.6}° {ns}, {:.6}° {ew}",
        position.latitude.abs(),
        position.longitude.abs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_matches_known_distance() {
        // Kyiv to Lviv is roughly 468 km along the great circle.
        let kyiv = LatLng::new(50.4501, 30.5234);
        let lviv = LatLng::new(49.8397, 24.0297);
        let d = kyiv.haversine_km(&lviv);
        assert!((d - 468.0).abs() < 5.0, "unexpected distance {d}");
        assert!((d - lviv.haversine_km(&kyiv)).abs() < 1e-9, "not symmetric");
        assert_eq!(kyiv.haversine_km(&kyiv), 0.0);
    }

    #[test]
    fn validity_checks_both_ranges() {
        assert!(LatLng::new(90.0, -180.0).is_valid());
        assert!(!LatLng::new(90.5, 0.0).is_valid());
        assert!(!LatLng::new(0.0, 181.0).is_valid());
    }

    #[test]
    fn rounding_keeps_six_decimals() {
        let p = LatLng::new(50.123_456_789, 30.987_654_321).rounded(COORDINATE_DECIMALS);
        assert_eq!(p, LatLng::new(50.123_457, 30.987_654));
    }

    #[test]
    fn bounds_are_inclusive_and_order_free() {
        let b = GeoBounds::from_corners(LatLng::new(2.0, 2.0), LatLng::new(1.0, 1.0));
        assert_eq!(b.north, 2.0);
        assert_eq!(b.west, 1.0);
        assert!(b.contains(&LatLng::new(1.0, 2.0)));
        assert!(b.contains(&LatLng::new(1.5, 1.5)));
        assert!(!b.contains(&LatLng::new(2.1, 1.5)));
    }

    #[test]
    fn bounds_from_points() {
        assert!(GeoBounds::from_points(&[]).is_none());
        let pts = [
            LatLng::new(1.0, 5.0),
            LatLng::new(-1.0, 3.0),
            LatLng::new(0.0, 4.0),
        ];
        let b = GeoBounds::from_points(&pts).unwrap();
        assert_eq!((b.north, b.south, b.east, b.west), (1.0, -1.0, 5.0, 3.0));
    }

    #[test]
    fn circle_bounds_cover_radius() {
        let center = LatLng::new(50.0, 30.0);
        let b = GeoBounds::around_circle(center, 1000.0);
        let north_edge = LatLng::new(b.north, 30.0);
        assert!((center.haversine_km(&north_edge) - 1.0).abs() < 1e-6);
        assert!(b.contains(&center));
    }

    #[test]
    fn distance_and_coordinate_formatting() {
        assert_eq!(format_distance(0.0), "0m");
        assert_eq!(format_distance(0.9994), "999m");
        assert_eq!(format_distance(12.0), "12.00km");
        assert_eq!(
            format_coordinates(&LatLng::new(-33.5, 151.25)),
            "33.500000° S, 151.250000° E"
        );
    }
}

// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::Coordinate;

/// Mean radius of Earth, in kilometers.
/// Source: https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius
const EARTH_RADIUS: f64 = 6371.0088;

/// Mean diameter of Earth, in kilometers.
const EARTH_DIAMETER: f64 = EARTH_RADIUS + EARTH_RADIUS;

/// Calculates the great-circle distance between two positions
/// on Earth using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
/// Returns the result in kilometers.
pub fn earth_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lon1 = a.lon.to_radians();
    let lat2 = b.lat.to_radians();
    let lon2 = b.lon.to_radians();

    let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    // Rounding may push h marginally above 1 for antipodal points
    EARTH_DIAMETER * h.sqrt().min(1.0).asin()
}

/// Calculates the length of a polyline as the sum of [earth_distance]
/// between consecutive points, in kilometers.
///
/// Polylines with less than 2 points have zero length.
pub fn line_length(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| earth_distance(pair[0], pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr, $eps:expr) => {
            assert!(
                (($a - $b).abs() < $eps),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    #[test]
    fn earth_distance_one_degree() {
        // One degree along the equator and along a meridian: 2πR / 360
        let expected = EARTH_DIAMETER * std::f64::consts::PI / 360.0;
        let origin = Coordinate::new(0.0, 0.0);
        assert_almost_eq!(
            earth_distance(origin, Coordinate::new(1.0, 0.0)),
            expected,
            1e-9
        );
        assert_almost_eq!(
            earth_distance(origin, Coordinate::new(0.0, 1.0)),
            expected,
            1e-9
        );
    }

    #[test]
    fn earth_distance_is_symmetric() {
        let a = Coordinate::new(21.0122, 52.2297);
        let b = Coordinate::new(19.9450, 50.0647);
        assert_eq!(earth_distance(a, b), earth_distance(b, a));
        assert_almost_eq!(earth_distance(a, b), 252.1, 1.0);
        assert_eq!(earth_distance(a, a), 0.0);
    }

    #[test]
    fn line_length_accumulates_segments() {
        let points = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(1.0, 1.0),
        ];
        let expected = earth_distance(points[0], points[1]) + earth_distance(points[1], points[2]);
        assert_almost_eq!(line_length(&points), expected, 1e-12);
        assert_eq!(line_length(&points[..1]), 0.0);
        assert_eq!(line_length(&[]), 0.0);
    }
}

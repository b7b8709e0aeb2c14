//! Great-circle distance helpers used by geofence queries.

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two WGS84 points, in kilometres
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Whether a coordinate pair is a valid latitude/longitude
pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}

/// Lat/lon rectangle enclosing a circle; used to narrow candidates before
/// the exact haversine check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Slack so points right on the circle's edge are never cut by the box
    const MARGIN: f64 = 1.01;

    pub fn around(lat: f64, lon: f64, radius_km: f64) -> Self {
        let angular = radius_km * Self::MARGIN / EARTH_RADIUS_KM;
        let delta_lat = angular.to_degrees();
        let min_lat = lat - delta_lat;
        let max_lat = lat + delta_lat;

        // A circle that reaches a pole spans every longitude
        if min_lat <= -90.0 || max_lat >= 90.0 {
            return Self {
                min_lat: min_lat.max(-90.0),
                max_lat: max_lat.min(90.0),
                min_lon: -180.0,
                max_lon: 180.0,
            };
        }

        // Widest longitude reached by the circle, which lies poleward of the centre
        let ratio = (angular.sin() / lat.to_radians().cos()).min(1.0);
        let delta_lon = ratio.asin().to_degrees();
        let wraps = lon - delta_lon < -180.0 || lon + delta_lon > 180.0;
        let (min_lon, max_lon) = if wraps {
            (-180.0, 180.0)
        } else {
            (lon - delta_lon, lon + delta_lon)
        };

        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat)
            && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Jakarta to Bandung, approx 116km great-circle
        let jakarta = (-6.2088, 106.8456);
        let bandung = (-6.9175, 107.6191);

        let distance = haversine_km(jakarta.0, jakarta.1, bandung.0, bandung.1);

        assert!(distance > 110.0 && distance < 125.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let distance = haversine_km(-6.2088, 106.8456, -6.2088, 106.8456);
        assert!(distance < 0.001);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let a = haversine_km(14.5995, 120.9842, 10.3157, 123.8854);
        let b = haversine_km(10.3157, 123.8854, 14.5995, 120.9842);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(is_valid_coordinate(0.0, 0.0));
        assert!(is_valid_coordinate(-90.0, 180.0));
        assert!(!is_valid_coordinate(91.0, 0.0));
        assert!(!is_valid_coordinate(0.0, -181.0));
        assert!(!is_valid_coordinate(f64::NAN, 0.0));
    }

    #[test]
    fn test_bounding_box_contains_circle() {
        let (lat, lon) = (10.3157, 123.8854);
        let bbox = BoundingBox::around(lat, lon, 25.0);

        // A point 20km north is inside both the circle and the box
        let north = lat + 20.0 / 111.32;
        assert!(haversine_km(lat, lon, north, lon) <= 25.0);
        assert!(bbox.contains(north, lon));

        // A point 50km east is outside the box
        let east = lon + 50.0 / (111.32 * lat.to_radians().cos());
        assert!(!bbox.contains(lat, east));
    }

    #[test]
    fn test_bounding_box_wraps_antimeridian() {
        let bbox = BoundingBox::around(0.0, 179.9, 50.0);
        assert_eq!(bbox.min_lon, -180.0);
        assert_eq!(bbox.max_lon, 180.0);
        assert!(bbox.contains(0.0, -179.9));
    }

    #[test]
    fn test_bounding_box_covers_high_latitude_circle() {
        let bbox = BoundingBox::around(80.0, 0.0, 500.0);

        // Inside the circle but east of a span taken at the centre's latitude
        let (lat, lon) = (81.05, 26.5);
        assert!(haversine_km(80.0, 0.0, lat, lon) <= 500.0);
        assert!(bbox.contains(lat, lon));
        assert!(bbox.max_lat < 90.0);
    }

    #[test]
    fn test_bounding_box_around_pole_spans_all_longitudes() {
        let bbox = BoundingBox::around(88.0, 0.0, 500.0);

        let (lat, lon) = (89.5, 180.0);
        assert!(haversine_km(88.0, 0.0, lat, lon) <= 500.0);
        assert!(bbox.contains(lat, lon));
        assert_eq!(bbox.max_lat, 90.0);
        assert_eq!((bbox.min_lon, bbox.max_lon), (-180.0, 180.0));

        let south = BoundingBox::around(-89.0, 45.0, 200.0);
        assert_eq!(south.min_lat, -90.0);
        assert!(south.contains(-89.9, -135.0));
    }
}

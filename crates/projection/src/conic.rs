//! Albers conic equal-area projection.
//!
//! Equal-area conic with two standard parallels, the building block of the
//! composite USA projection. Parameters follow the usual web-cartography
//! conventions:
//! - Standard parallels: phi0, phi1
//! - Rotation: degrees added to every input longitude before projecting
//! - Center: the (rotated) point that lands on the translate position
//! - Scale: pixels per unit of projected distance on the unit sphere
//! - Translate: pixel position of the center
//!
//! Screen y grows downward.

use std::f64::consts::PI;

const TO_RAD: f64 = PI / 180.0;
const TO_DEG: f64 = 180.0 / PI;

/// Conic equal-area projection parameters.
#[derive(Debug, Clone)]
pub struct ConicEqualArea {
    /// Longitude rotation in radians
    pub rotate: f64,
    /// Pixels per unit of projected distance
    pub scale: f64,
    /// Pixel position of the projection center
    pub translate: (f64, f64),
    /// Cone constant
    n: f64,
    /// C constant
    c: f64,
    /// Rho at the origin latitude
    rho0: f64,
    /// Pixel offset in X after centering
    dx: f64,
    /// Pixel offset in Y after centering
    dy: f64,
}

impl ConicEqualArea {
    /// Create a conic equal-area projection.
    ///
    /// # Arguments
    /// * `parallels_deg` - Standard parallels (degrees)
    /// * `rotate_deg` - Longitude rotation (degrees)
    /// * `center_deg` - Projection center as (lon, lat) in the rotated frame (degrees)
    /// * `scale` - Scale factor in pixels
    /// * `translate` - Pixel position of the center
    pub fn new(
        parallels_deg: (f64, f64),
        rotate_deg: f64,
        center_deg: (f64, f64),
        scale: f64,
        translate: (f64, f64),
    ) -> Self {
        let phi0 = parallels_deg.0 * TO_RAD;
        let phi1 = parallels_deg.1 * TO_RAD;

        let sin_phi0 = phi0.sin();
        let n = (sin_phi0 + phi1.sin()) / 2.0;
        let c = 1.0 + sin_phi0 * (2.0 * n - sin_phi0);
        let rho0 = c.sqrt() / n;

        let mut projection = Self {
            rotate: (rotate_deg % 360.0) * TO_RAD,
            scale,
            translate,
            n,
            c,
            rho0,
            dx: 0.0,
            dy: 0.0,
        };

        // The center is given in the rotated frame, so it skips the rotation
        let (cx, cy) = projection.forward_raw(center_deg.0 * TO_RAD, center_deg.1 * TO_RAD);
        projection.dx = translate.0 - cx * scale;
        projection.dy = translate.1 + cy * scale;

        projection
    }

    /// Project geographic coordinates (degrees) to pixel coordinates.
    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lambda = wrap_longitude(lon_deg * TO_RAD + self.rotate);
        let (x, y) = self.forward_raw(lambda, lat_deg * TO_RAD);
        (self.dx + x * self.scale, self.dy - y * self.scale)
    }

    /// Convert pixel coordinates back to geographic coordinates (degrees).
    ///
    /// Returns (lon, lat).
    pub fn invert(&self, x: f64, y: f64) -> (f64, f64) {
        let (lambda, phi) = self.invert_raw((x - self.dx) / self.scale, (self.dy - y) / self.scale);
        let lon = wrap_longitude(lambda - self.rotate);
        (lon * TO_DEG, phi * TO_DEG)
    }

    /// Cone constant of this projection.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    fn forward_raw(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let rho = (self.c - 2.0 * self.n * phi.sin()).sqrt() / self.n;
        let theta = lambda * self.n;
        (rho * theta.sin(), self.rho0 - rho * theta.cos())
    }

    fn invert_raw(&self, x: f64, y: f64) -> (f64, f64) {
        let rho0_y = self.rho0 - y;
        let lambda = x.atan2(rho0_y) / self.n;
        let sin_phi = (self.c - (x * x + rho0_y * rho0_y) * self.n * self.n) / (2.0 * self.n);
        (lambda, sin_phi.clamp(-1.0, 1.0).asin())
    }
}

/// Normalize a longitude in radians to [-π, π].
fn wrap_longitude(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - 2.0 * PI
    } else if lambda < -PI {
        lambda + 2.0 * PI
    } else {
        lambda
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower48() -> ConicEqualArea {
        ConicEqualArea::new((29.5, 45.5), 96.0, (-0.6, 38.7), 1070.0, (480.0, 250.0))
    }

    #[test]
    fn test_center_maps_to_translate() {
        let proj = lower48();

        let (x, y) = proj.project(-96.6, 38.7);
        assert!((x - 480.0).abs() < 1e-9, "x should be 480, got {}", x);
        assert!((y - 250.0).abs() < 1e-9, "y should be 250, got {}", y);
    }

    #[test]
    fn test_roundtrip() {
        let proj = lower48();

        for (lon, lat) in [(-122.4, 37.8), (-74.0, 40.7), (-80.2, 25.8), (-104.9, 39.7)] {
            let (x, y) = proj.project(lon, lat);
            let (lon2, lat2) = proj.invert(x, y);
            assert!((lon - lon2).abs() < 1e-9, "lon roundtrip failed: {} vs {}", lon, lon2);
            assert!((lat - lat2).abs() < 1e-9, "lat roundtrip failed: {} vs {}", lat, lat2);
        }
    }

    #[test]
    fn test_orientation() {
        let proj = lower48();

        // New York is east of San Francisco; Miami is south of Chicago
        let (sf_x, _) = proj.project(-122.4, 37.8);
        let (ny_x, _) = proj.project(-74.0, 40.7);
        let (_, chi_y) = proj.project(-87.6, 41.9);
        let (_, mia_y) = proj.project(-80.2, 25.8);

        assert!(ny_x > sf_x);
        assert!(mia_y > chi_y, "screen y grows southward");
    }

    #[test]
    fn test_cone_constant() {
        let proj = lower48();
        let expected = ((29.5f64).to_radians().sin() + (45.5f64).to_radians().sin()) / 2.0;
        assert!((proj.cone_constant() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_scale_is_linear_around_center() {
        let a = ConicEqualArea::new((29.5, 45.5), 96.0, (-0.6, 38.7), 1000.0, (0.0, 0.0));
        let b = ConicEqualArea::new((29.5, 45.5), 96.0, (-0.6, 38.7), 2000.0, (0.0, 0.0));

        let (ax, ay) = a.project(-90.0, 35.0);
        let (bx, by) = b.project(-90.0, 35.0);
        assert!((bx - 2.0 * ax).abs() < 1e-9);
        assert!((by - 2.0 * ay).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_longitude() {
        assert!((wrap_longitude(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((wrap_longitude(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert_eq!(wrap_longitude(1.0), 1.0);
    }
}

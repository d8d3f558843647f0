//! Directions, spherical angles, and per-sublattice reference frames.
use std::f64::consts::PI;
use super::mat3::Mat3;
use super::vecn::Vec3;

quick_error! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum GeometryError {
        ZeroVector {
            display("direction vector has zero length")
        }
        NotFinite {
            display("direction vector contains non-finite components")
        }
        WrongCount(expected: usize, got: usize) {
            display("expected {} direction vectors, got {}", expected, got)
        }
    }
}

/// Spherical decomposition `(r, θ, φ)` of a vector: θ is the polar
/// angle from +ẑ, φ the azimuth from +x̂.  At the poles (and for the
/// zero vector) the azimuth is fixed to π/2 so that repeated
/// conversions of nearby vectors stay stable.
pub fn vector_to_angles(v: Vec3<f64>, in_degrees: bool) -> (f64, f64, f64) {
    let r = v.norm();
    let in_plane = v[0].hypot(v[1]);
    let (theta, phi) = if in_plane == 0.0 {
        let theta = if v[2] < 0.0 { PI } else { 0.0 };
        (theta, PI / 2.0)
    } else {
        (in_plane.atan2(v[2]), v[1].atan2(v[0]))
    };
    if in_degrees {
        (r, theta.to_degrees(), phi.to_degrees())
    } else {
        (r, theta, phi)
    }
}

/// Right-handed orthonormal triad `(x̂, ŷ, ẑ)` with ẑ = n/‖n‖.
///
/// For n along +ẑ the global basis is returned; for n along −ẑ the
/// fixed basis `(x̂, −ŷ, −ẑ)`.  Any other direction rotates the global
/// triad by the Rodrigues rotation that carries ẑ onto n.
pub fn span_local_rf(n: Vec3<f64>) -> Result<[Vec3<f64>; 3], GeometryError> {
    if !n.is_finite() {
        return Err(GeometryError::NotFinite);
    }
    let n = n.normalized().ok_or(GeometryError::ZeroVector)?;
    let cos = n[2];
    if cos >= 1.0 - 1e-12 {
        return Ok([
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]);
    }
    if cos <= -1.0 + 1e-12 {
        return Ok([
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
        ]);
    }
    // R = I + [a]× + [a]×²/(1+cos) with a = ẑ×n, ‖a‖ = sin
    let a = Vec3::new(0.0, 0.0, 1.0).cross(n);
    let k = Mat3([
        [0.0, -a[2], a[1]],
        [a[2], 0.0, -a[0]],
        [-a[1], a[0], 0.0],
    ]);
    let r = Mat3::identity() + k + (k * k).scale(1.0 / (1.0 + cos));
    Ok([r.col(0), r.col(1), r.col(2)])
}

/// Validate and normalize a list of ground-state direction vectors,
/// one per sublattice.
pub fn check_directions(
    count: usize,
    directions: &[Vec3<f64>],
) -> Result<Vec<Vec3<f64>>, GeometryError> {
    if directions.len() != count {
        return Err(GeometryError::WrongCount(count, directions.len()));
    }
    directions.iter().map(|&v| {
        if !v.is_finite() {
            Err(GeometryError::NotFinite)
        } else {
            v.normalized().ok_or(GeometryError::ZeroVector)
        }
    }).collect()
}

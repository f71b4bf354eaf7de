//! Compass directions for wind bearings

const POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Convert a bearing in degrees to a 16-point compass direction
///
/// Negative and >360 bearings are normalised first.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compass_direction(degrees: f64) -> &'static str {
    if !degrees.is_finite() {
        return POINTS[0];
    }
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid keeps the value in [0, 360), so the index is in [0, 16]
    let index = (normalized / 22.5).round() as usize % POINTS.len();
    POINTS[index]
}

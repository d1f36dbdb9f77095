use super::error::EphemerisError;

/// Magnitude of a velocity vector, in the units of its components.
pub fn speed(velocity: [f64; 3]) -> Result<f64, EphemerisError> {
    if velocity.iter().any(|c| !c.is_finite()) {
        return Err(EphemerisError::NonFinite("velocity"));
    }
    let [vx, vy, vz] = velocity;
    Ok((vx * vx + vy * vy + vz * vz).sqrt())
}

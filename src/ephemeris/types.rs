use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::EphemerisError;

/// One component of a state vector as published in the ephemeris, e.g.
/// `{"@units": "km", "#text": "-4745.0297891"}`.
///
/// The decimal is kept as text so stored records come back byte-for-byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Component {
    #[serde(rename = "@units", default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(rename = "#text")]
    pub text: String,
}

impl Component {
    pub fn new(text: impl Into<String>, units: Option<&str>) -> Self {
        Self {
            units: units.map(String::from),
            text: text.into(),
        }
    }

    fn value(&self, field: &'static str) -> Result<f64, EphemerisError> {
        let value: f64 = self
            .text
            .trim()
            .parse()
            .map_err(|_| EphemerisError::InvalidNumber {
                field,
                value: self.text.clone(),
            })?;
        if !value.is_finite() {
            return Err(EphemerisError::NonFinite(field));
        }
        Ok(value)
    }
}

/// A single observation of the tracked spacecraft, keyed by its epoch.
/// Position is in km and velocity in km/s, both in the J2000 inertial frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct StateVector {
    pub epoch: String,
    pub x: Component,
    pub y: Component,
    pub z: Component,
    pub x_dot: Component,
    pub y_dot: Component,
    pub z_dot: Component,
}

impl StateVector {
    pub fn position(&self) -> Result<[f64; 3], EphemerisError> {
        Ok([
            self.x.value("X")?,
            self.y.value("Y")?,
            self.z.value("Z")?,
        ])
    }

    pub fn velocity(&self) -> Result<[f64; 3], EphemerisError> {
        Ok([
            self.x_dot.value("X_DOT")?,
            self.y_dot.value("Y_DOT")?,
            self.z_dot.value("Z_DOT")?,
        ])
    }
}

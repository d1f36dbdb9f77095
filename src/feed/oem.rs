use crate::ephemeris::{parse_epoch, Component, StateVector};

/// Parse a CCSDS OEM ephemeris in KVN (text) form.
///
/// Only the data lines are kept: `EPOCH X Y Z X_DOT Y_DOT Z_DOT`, optionally
/// followed by three accelerations. Header and metadata `KEY = VALUE` lines,
/// comments and covariance blocks are skipped. Malformed data lines are
/// logged and dropped.
pub fn parse_oem(content: &str) -> Vec<StateVector> {
    let mut records = Vec::new();
    let mut in_covariance = false;

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("COMMENT") || line.contains('=') {
            continue;
        }
        match line {
            "META_START" | "META_STOP" => continue,
            "COVARIANCE_START" => {
                in_covariance = true;
                continue;
            }
            "COVARIANCE_STOP" => {
                in_covariance = false;
                continue;
            }
            _ => {}
        }
        if in_covariance {
            continue;
        }

        match parse_data_line(line) {
            Ok(record) => records.push(record),
            Err(reason) => log::warn!("Skipping OEM line {}: {}", index + 1, reason),
        }
    }

    records
}

fn parse_data_line(line: &str) -> Result<StateVector, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 7 && tokens.len() != 10 {
        return Err(format!("expected 7 or 10 fields, got {}", tokens.len()));
    }

    let epoch = canonical_epoch(tokens[0]);
    parse_epoch(&epoch).map_err(|e| e.to_string())?;

    for token in &tokens[1..] {
        let value = token
            .parse::<f64>()
            .map_err(|_| format!("invalid number '{}'", token))?;
        if !value.is_finite() {
            return Err(format!("non-finite number '{}'", token));
        }
    }

    let km = |t: &str| Component::new(t, Some("km"));
    let km_s = |t: &str| Component::new(t, Some("km/s"));

    Ok(StateVector {
        epoch,
        x: km(tokens[1]),
        y: km(tokens[2]),
        z: km(tokens[3]),
        x_dot: km_s(tokens[4]),
        y_dot: km_s(tokens[5]),
        z_dot: km_s(tokens[6]),
    })
}

/// Keys always carry the trailing `Z`, whether or not the feed wrote one.
fn canonical_epoch(token: &str) -> String {
    if token.ends_with('Z') {
        token.to_string()
    } else {
        format!("{}Z", token)
    }
}

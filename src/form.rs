use crate::types::WorkoutKind;
use thiserror::Error;

/// Raw values of the entry form, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct WorkoutForm {
    pub kind: String,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

/// A validated submission: every number is finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry {
    Running {
        distance: f64,
        duration: f64,
        cadence: f64,
    },
    Cycling {
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Unknown workout type: {0:?}")]
    UnknownKind(String),
    #[error("Inputs have to be positive numbers! ({field})")]
    NotPositive { field: &'static str },
}

/// Numeric coercion of a text input: surrounding whitespace is ignored, an
/// empty field is `0`, anything unparseable is `NaN`.
pub fn coerce_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

fn positive(field: &'static str, raw: &str) -> Result<f64, InputError> {
    let v = coerce_number(raw);
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(InputError::NotPositive { field })
    }
}

impl WorkoutForm {
    pub fn validate(&self) -> Result<Entry, InputError> {
        let kind: WorkoutKind = self
            .kind
            .parse()
            .map_err(|_| InputError::UnknownKind(self.kind.clone()))?;

        let distance = positive("distance", &self.distance)?;
        let duration = positive("duration", &self.duration)?;

        Ok(match kind {
            WorkoutKind::Running => Entry::Running {
                distance,
                duration,
                cadence: positive("cadence", &self.cadence)?,
            },
            WorkoutKind::Cycling => Entry::Cycling {
                distance,
                duration,
                elevation_gain: positive("elevation", &self.elevation)?,
            },
        })
    }
}

//! Health records: one symptom check taken for a patient at a point in time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patient::PatientId;

/// Lowest body temperature accepted for a symptom check, in °C.
pub const TEMPERATURE_MIN_CELSIUS: f32 = 25.0;
/// Highest body temperature accepted for a symptom check, in °C.
pub const TEMPERATURE_MAX_CELSIUS: f32 = 45.0;

/// Validation errors raised while building symptom checks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HealthRecordValidationError {
    /// Temperature was NaN, infinite, or outside the accepted range.
    #[error("temperature must be between 25 and 45 °C, got {value}")]
    TemperatureOutOfRange { value: f32 },
}

/// Body temperature in degrees Celsius.
///
/// # Examples
/// ```
/// use patient_monitor::domain::Temperature;
///
/// assert!(Temperature::new(36.5).is_ok());
/// assert!(Temperature::new(f32::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Temperature(f32);

impl Temperature {
    /// Validate and wrap a temperature reading.
    pub fn new(celsius: f32) -> Result<Self, HealthRecordValidationError> {
        if celsius.is_finite()
            && (TEMPERATURE_MIN_CELSIUS..=TEMPERATURE_MAX_CELSIUS).contains(&celsius)
        {
            Ok(Self(celsius))
        } else {
            Err(HealthRecordValidationError::TemperatureOutOfRange { value: celsius })
        }
    }

    /// Reading in degrees Celsius.
    pub fn celsius(self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for Temperature {
    type Error = HealthRecordValidationError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Temperature> for f32 {
    fn from(value: Temperature) -> Self {
        value.0
    }
}

/// Symptom checklist answered during a check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptoms {
    pub cough: bool,
    pub headache: bool,
    pub throat_ache: bool,
    pub diarrhea: bool,
    pub join_pain: bool,
    pub muscle_pain: bool,
    pub palpitations: bool,
    pub phlegm: bool,
    pub respiratory_distress: bool,
    pub smell_taste_loss: bool,
}

impl Symptoms {
    /// Number of symptoms reported as present.
    pub fn reported_count(&self) -> usize {
        [
            self.cough,
            self.headache,
            self.throat_ache,
            self.diarrhea,
            self.join_pain,
            self.muscle_pain,
            self.palpitations,
            self.phlegm,
            self.respiratory_distress,
            self.smell_taste_loss,
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

/// Answers submitted for one symptom check, before a timestamp is assigned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymptomCheck {
    pub symptoms: Symptoms,
    pub temperature: Temperature,
}

/// One symptom check recorded for a patient.
///
/// Records are immutable once created; the timestamp is assigned by the
/// service that records the check.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthRecord {
    patient_id: PatientId,
    created_on: DateTime<Utc>,
    symptoms: Symptoms,
    temperature: Temperature,
}

impl HealthRecord {
    /// Build a record for `patient_id` taken at `created_on`.
    pub fn new(patient_id: PatientId, check: SymptomCheck, created_on: DateTime<Utc>) -> Self {
        Self {
            patient_id,
            created_on,
            symptoms: check.symptoms,
            temperature: check.temperature,
        }
    }

    /// Owning patient.
    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    /// Moment the check was recorded.
    pub fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }

    /// Reported symptoms.
    pub fn symptoms(&self) -> &Symptoms {
        &self.symptoms
    }

    /// Measured temperature.
    pub fn temperature(&self) -> Temperature {
        self.temperature
    }
}

/// Order records most recent first.
///
/// The sort is stable: records sharing a timestamp keep their relative order.
pub fn sort_most_recent_first(records: &mut [HealthRecord]) {
    records.sort_by(|left, right| right.created_on.cmp(&left.created_on));
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::order_update::non_blank;

/// Body measurements in centimetres. Every field is optional: the admin
/// records whatever was taken at the fitting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementValues {
    pub chest: Option<f64>,
    pub shoulder: Option<f64>,
    pub arm_length: Option<f64>,
    pub bicep: Option<f64>,
    pub wrist: Option<f64>,
    pub neck: Option<f64>,
    pub waist: Option<f64>,
    pub hip: Option<f64>,
    pub inseam: Option<f64>,
    pub outseam: Option<f64>,
    pub thigh: Option<f64>,
    pub height: Option<f64>,
    pub notes: Option<String>,
}

impl MeasurementValues {
    /// Reads a form field. Blank or non-numeric input means "not taken".
    pub fn parse_field(value: &str) -> Option<f64> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        value.parse::<f64>().ok().filter(|n| n.is_finite())
    }

    fn fields(&self) -> [(&'static str, Option<f64>); 12] {
        [
            ("chest", self.chest),
            ("shoulder", self.shoulder),
            ("arm_length", self.arm_length),
            ("bicep", self.bicep),
            ("wrist", self.wrist),
            ("neck", self.neck),
            ("waist", self.waist),
            ("hip", self.hip),
            ("inseam", self.inseam),
            ("outseam", self.outseam),
            ("thigh", self.thigh),
            ("height", self.height),
        ]
    }

    /// Number of measurements actually recorded.
    pub fn taken(&self) -> usize {
        self.fields().iter().filter(|(_, value)| value.is_some()).count()
    }

    /// Rejects non-positive or non-finite values and normalises the notes.
    pub fn validated(self) -> Result<Self, String> {
        for (name, value) in self.fields() {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(format!("{} must be a positive number, got {}", name, value));
                }
            }
        }
        Ok(Self {
            notes: non_blank(self.notes),
            ..self
        })
    }
}

/// One customer's measurement record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub id: String,
    pub customer_id: String,
    #[serde(flatten)]
    pub values: MeasurementValues,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementsCreate {
    pub customer_id: String,
    pub values: MeasurementValues,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_treats_junk_as_missing() {
        assert_eq!(MeasurementValues::parse_field(" 96.5 "), Some(96.5));
        assert_eq!(MeasurementValues::parse_field(""), None);
        assert_eq!(MeasurementValues::parse_field("abc"), None);
        assert_eq!(MeasurementValues::parse_field("NaN"), None);
    }

    #[test]
    fn test_validation() {
        let values = MeasurementValues {
            chest: Some(96.0),
            waist: Some(81.5),
            notes: Some("  ".to_string()),
            ..Default::default()
        }
        .validated()
        .unwrap();
        assert_eq!(values.taken(), 2);
        assert_eq!(values.notes, None);

        let negative = MeasurementValues { hip: Some(-3.0), ..Default::default() };
        assert!(negative.validated().unwrap_err().contains("hip"));
    }
}

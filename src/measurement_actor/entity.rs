use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{MeasurementValues, Measurements, MeasurementsCreate};

impl Entity for Measurements {
    type Id = String;
    type CreatePayload = MeasurementsCreate;
    type Patch = MeasurementValues;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.customer_id)
    }

    fn from_create(id: String, payload: MeasurementsCreate) -> Result<Self, String> {
        if payload.customer_id.trim().is_empty() {
            return Err("Measurements must belong to a customer".to_string());
        }
        let now = Utc::now();
        Ok(Self {
            id,
            customer_id: payload.customer_id,
            values: payload.values.validated()?,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces every value: a field left empty on the form is cleared.
    fn on_update(&mut self, patch: MeasurementValues) -> Result<(), String> {
        self.values = patch.validated()?;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_replaces_all_values() {
        let mut record = Measurements::from_create(
            "measurements_1".into(),
            MeasurementsCreate {
                customer_id: "customer_1".into(),
                values: MeasurementValues { chest: Some(96.0), neck: Some(38.0), ..Default::default() },
            },
        )
        .unwrap();

        record
            .on_update(MeasurementValues { chest: Some(97.0), ..Default::default() })
            .unwrap();
        assert_eq!(record.values.chest, Some(97.0));
        assert_eq!(record.values.neck, None);
        assert!(record.updated_at >= record.created_at);

        assert!(record
            .on_update(MeasurementValues { waist: Some(0.0), ..Default::default() })
            .is_err());
        assert_eq!(record.values.chest, Some(97.0));
    }

    #[test]
    fn test_requires_customer() {
        let payload = MeasurementsCreate { customer_id: " ".into(), values: MeasurementValues::default() };
        assert!(Measurements::from_create("measurements_1".into(), payload).is_err());
    }
}

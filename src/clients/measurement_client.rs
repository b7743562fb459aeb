use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::{Predicate, ResourceClient};
use crate::clients::CustomerClient;
use crate::customer_actor::CustomerError;
use crate::domain::{MeasurementValues, Measurements, MeasurementsCreate, Session};
use crate::measurement_actor::MeasurementError;

/// Client for interacting with the measurements actor.
///
/// Each customer has at most one record; the admin writes it and the customer
/// may only read their own.
#[derive(Clone)]
pub struct MeasurementClient {
    inner: ResourceClient<Measurements>,
    customer_client: CustomerClient,
}

fn for_customer(customer_id: &str) -> Predicate<Measurements> {
    let customer_id = customer_id.to_string();
    Box::new(move |record: &Measurements| record.customer_id == customer_id)
}

impl MeasurementClient {
    pub fn new(inner: ResourceClient<Measurements>, customer_client: CustomerClient) -> Self {
        Self { inner, customer_client }
    }

    /// Creates the customer's record, or replaces its values if one exists.
    #[instrument(skip(self, session, values), fields(user_id = %session.user_id))]
    pub async fn upsert_measurements(
        &self,
        session: &Session,
        customer_id: String,
        values: MeasurementValues,
    ) -> Result<Measurements, MeasurementError> {
        if !session.is_admin() {
            warn!("Measurement write refused");
            return Err(MeasurementError::AuthorizationError(
                "only the admin can record measurements".to_string(),
            ));
        }

        match self.customer_client.get_customer(session, customer_id.clone()).await {
            Ok(Some(_)) => debug!("Customer validation successful"),
            Ok(None) => {
                error!("Customer not found");
                return Err(MeasurementError::InvalidCustomer(customer_id));
            }
            Err(CustomerError::DataAccessError(reason)) => {
                error!(error = %reason, "Customer store unreachable");
                return Err(MeasurementError::DataAccessError(reason));
            }
            Err(e) => {
                error!(error = %e, "Customer validation failed");
                return Err(MeasurementError::InvalidCustomer(format!("Customer validation failed: {}", e)));
            }
        }

        let existing = self.current(&customer_id).await?;
        let record = match existing {
            Some(record) => self.inner.update(record.id, values).await?,
            None => {
                let id = self
                    .inner
                    .create(MeasurementsCreate { customer_id: customer_id.clone(), values })
                    .await?;
                self.inner
                    .get(id.clone())
                    .await?
                    .ok_or(MeasurementError::NotFound(id))?
            }
        };
        info!(measurements_id = %record.id, taken = record.values.taken(), "Measurements saved");
        Ok(record)
    }

    /// The customer's record, or `None` when absent or not visible to the session.
    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub async fn get_measurements(
        &self,
        session: &Session,
        customer_id: String,
    ) -> Result<Option<Measurements>, MeasurementError> {
        if !session.can_access(&customer_id) {
            return Ok(None);
        }
        self.current(&customer_id).await
    }

    /// All records for the admin, most recently updated first; a customer gets only their own.
    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub async fn list_measurements(&self, session: &Session) -> Result<Vec<Measurements>, MeasurementError> {
        let filter = if session.is_admin() { None } else { Some(for_customer(&session.user_id)) };
        let mut records = self.inner.list(filter).await?;
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }

    async fn current(&self, customer_id: &str) -> Result<Option<Measurements>, MeasurementError> {
        let records = self.inner.list(Some(for_customer(customer_id))).await?;
        Ok(records.into_iter().max_by_key(|record| record.updated_at))
    }
}

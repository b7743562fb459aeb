use tracing::{debug, info, instrument, warn};

use crate::actor_framework::{Predicate, ResourceClient};
use crate::customer_actor::CustomerError;
use crate::domain::{CustomerCreate, CustomerPatch, CustomerProfile, Session};

/// Client for interacting with the customer profile actor.
#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<CustomerProfile>,
}

impl CustomerClient {
    pub fn new(inner: ResourceClient<CustomerProfile>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, session, payload), fields(user_id = %session.user_id))]
    pub async fn create_customer(&self, session: &Session, payload: CustomerCreate) -> Result<String, CustomerError> {
        if !session.is_admin() {
            warn!("Customer creation refused");
            return Err(CustomerError::AuthorizationError("only the admin can add customers".to_string()));
        }
        let id = self.inner.create(payload).await?;
        info!(customer_id = %id, "Customer created");
        Ok(id)
    }

    /// Profiles the session may not see are reported as absent.
    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub async fn get_customer(&self, session: &Session, id: String) -> Result<Option<CustomerProfile>, CustomerError> {
        debug!("Sending request");
        if !session.can_access(&id) {
            return Ok(None);
        }
        Ok(self.inner.get(id).await?)
    }

    /// All profiles for the admin, sorted by display name; a customer gets only their own.
    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub async fn list_customers(&self, session: &Session) -> Result<Vec<CustomerProfile>, CustomerError> {
        debug!("Sending request");
        let filter: Option<Predicate<CustomerProfile>> = if session.is_admin() {
            None
        } else {
            let user_id = session.user_id.clone();
            let own: Predicate<CustomerProfile> = Box::new(move |profile| profile.id == user_id);
            Some(own)
        };
        let mut customers = self.inner.list(filter).await?;
        customers.sort_by_key(|profile| profile.display_name().to_lowercase());
        Ok(customers)
    }

    #[instrument(skip(self, session, patch), fields(user_id = %session.user_id))]
    pub async fn update_customer(
        &self,
        session: &Session,
        id: String,
        patch: CustomerPatch,
    ) -> Result<CustomerProfile, CustomerError> {
        if !session.can_access(&id) {
            warn!(customer_id = %id, "Profile update refused");
            return Err(CustomerError::AuthorizationError(format!("cannot edit profile {}", id)));
        }
        Ok(self.inner.update(id, patch).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::{sequential_ids, ResourceActor};

    fn start() -> CustomerClient {
        let (actor, inner) = ResourceActor::<CustomerProfile>::new("customers", 8, 8, sequential_ids("customer"));
        tokio::spawn(actor.run());
        CustomerClient::new(inner)
    }

    #[tokio::test]
    async fn test_admin_manages_profiles() {
        let client = start();
        let admin = Session::admin("owner");

        let zara = client.create_customer(&admin, CustomerCreate::new("Zara", "zara@example.com")).await.unwrap();
        let ada = client.create_customer(&admin, CustomerCreate::new("Ada", "ada@example.com")).await.unwrap();

        let names: Vec<String> = client
            .list_customers(&admin)
            .await
            .unwrap()
            .iter()
            .map(|c| c.display_name().to_string())
            .collect();
        assert_eq!(names, vec!["Ada", "Zara"]);

        let as_ada = Session::customer(ada.clone());
        assert_eq!(client.list_customers(&as_ada).await.unwrap().len(), 1);
        assert_eq!(client.get_customer(&as_ada, zara.clone()).await.unwrap(), None);
        assert!(client.get_customer(&as_ada, ada).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_customer_cannot_create_or_edit_others() {
        let client = start();
        let admin = Session::admin("owner");
        let id = client.create_customer(&admin, CustomerCreate::new("Ada", "ada@example.com")).await.unwrap();

        let stranger = Session::customer("customer_99");
        let err = client
            .create_customer(&stranger, CustomerCreate::new("Eve", "eve@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::AuthorizationError(_)));

        let err = client.update_customer(&stranger, id.clone(), CustomerPatch::default()).await.unwrap_err();
        assert!(matches!(err, CustomerError::AuthorizationError(_)));

        let own = Session::customer(id.clone());
        let patched = client
            .update_customer(&own, id, CustomerPatch { phone: Some("0801".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(patched.phone.as_deref(), Some("0801"));
    }
}

use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::{Change, Predicate, ResourceClient};
use crate::clients::CustomerClient;
use crate::customer_actor::CustomerError;
use crate::domain::{Order, OrderCreate, OrderStats, OrderUpdate, OrderUpdateCreate, Session};
use crate::live_view::{LiveView, ViewRegistry};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};

/// Client for interacting with the Order actor.
///
/// Order creation validates the customer reference against the customer
/// profiles before the row is written.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    customer_client: CustomerClient,
    views: ViewRegistry,
}

fn require_admin(session: &Session, what: &str) -> Result<(), OrderError> {
    if session.is_admin() {
        Ok(())
    } else {
        warn!(user_id = %session.user_id, "{} refused", what);
        Err(OrderError::AuthorizationError(format!("{} requires the admin role", what)))
    }
}

/// Whether a change notification falls inside what `session` can see.
fn visible_to(session: &Session, change: &Change<String>) -> bool {
    match change.owner.as_deref() {
        Some(owner) => session.can_access(owner),
        None => session.is_admin(),
    }
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, customer_client: CustomerClient) -> Self {
        Self {
            inner,
            customer_client,
            views: ViewRegistry::default(),
        }
    }

    /// Live views spawned by this client and its clones.
    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    /// Orders visible to the session, newest first.
    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub async fn list_orders(&self, session: &Session) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        let filter: Option<Predicate<Order>> = if session.is_admin() {
            None
        } else {
            let user_id = session.user_id.clone();
            let own: Predicate<Order> = Box::new(move |order| order.customer_id == user_id);
            Some(own)
        };
        let mut orders = self.inner.list(filter).await?;
        // Rows arrive in insertion order; reverse first so ties keep newest-first.
        orders.reverse();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Orders the session may not see are reported as absent.
    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub async fn get_order(&self, session: &Session, id: String) -> Result<Option<Order>, OrderError> {
        debug!("Sending request");
        let order = self.inner.get(id).await?;
        Ok(order.filter(|order| session.can_access(&order.customer_id)))
    }

    #[instrument(skip(self, session, payload), fields(user_id = %session.user_id, customer_id = %payload.customer_id))]
    pub async fn create_order(&self, session: &Session, payload: OrderCreate) -> Result<String, OrderError> {
        require_admin(session, "Creating orders")?;

        match self
            .customer_client
            .get_customer(session, payload.customer_id.clone())
            .await
        {
            Ok(Some(customer)) => debug!(customer = %customer.display_name(), "Customer validation successful"),
            Ok(None) => {
                error!("Customer not found");
                return Err(OrderError::InvalidCustomer(payload.customer_id));
            }
            Err(CustomerError::DataAccessError(reason)) => {
                error!(error = %reason, "Customer store unreachable");
                return Err(OrderError::DataAccessError(reason));
            }
            Err(e) => {
                error!(error = %e, "Customer validation failed");
                return Err(OrderError::InvalidCustomer(format!("Customer validation failed: {}", e)));
            }
        }

        let id = self.inner.create(payload).await?;
        info!(order_id = %id, "Order created");
        Ok(id)
    }

    /// Appends a status update; the order's status changes in the same write.
    #[instrument(skip(self, session, draft), fields(user_id = %session.user_id, status = %draft.status))]
    pub async fn add_update(
        &self,
        session: &Session,
        order_id: String,
        draft: OrderUpdateCreate,
    ) -> Result<OrderUpdate, OrderError> {
        require_admin(session, "Updating order status")?;
        let OrderActionResult::Recorded(update) = self
            .inner
            .perform_action(order_id, OrderAction::RecordUpdate(draft))
            .await?;
        info!(update_id = %update.id, "Order status updated");
        Ok(update)
    }

    /// Update log for one order, newest first. Empty when the order is not visible.
    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub async fn list_updates(&self, session: &Session, order_id: String) -> Result<Vec<OrderUpdate>, OrderError> {
        let order = self.get_order(session, order_id).await?;
        Ok(order
            .map(|order| order.updates().newest_first().cloned().collect())
            .unwrap_or_default())
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub async fn order_stats(&self, session: &Session) -> Result<OrderStats, OrderError> {
        let orders = self.list_orders(session).await?;
        Ok(OrderStats::from_orders(&orders))
    }

    /// Live list of the session's orders, reloaded on every visible change.
    pub fn watch_orders(&self, session: &Session) -> LiveView<Vec<Order>> {
        let changes = self.inner.subscribe();
        let scope = session.clone();
        let client = self.clone();
        let session = session.clone();
        let view = LiveView::spawn(
            changes,
            move |change: &Change<String>| visible_to(&scope, change),
            move || {
                let client = client.clone();
                let session = session.clone();
                async move { client.list_orders(&session).await }
            },
        );
        self.views.track(&view);
        view
    }

    /// Live update log for one order, reloaded whenever that order changes.
    pub fn watch_updates(&self, session: &Session, order_id: String) -> LiveView<Vec<OrderUpdate>> {
        let changes = self.inner.subscribe();
        let watched = order_id.clone();
        let client = self.clone();
        let session = session.clone();
        let view = LiveView::spawn(
            changes,
            move |change: &Change<String>| change.id == watched,
            move || {
                let client = client.clone();
                let session = session.clone();
                let order_id = order_id.clone();
                async move { client.list_updates(&session, order_id).await }
            },
        );
        self.views.track(&view);
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ChangeKind;

    fn change(owner: Option<&str>) -> Change<String> {
        Change {
            table: "orders",
            kind: ChangeKind::Insert,
            id: "order_1".to_string(),
            owner: owner.map(str::to_owned),
        }
    }

    #[test]
    fn test_change_visibility() {
        let admin = Session::admin("owner");
        let alice = Session::customer("customer_1");

        assert!(visible_to(&admin, &change(Some("customer_2"))));
        assert!(visible_to(&alice, &change(Some("customer_1"))));
        assert!(!visible_to(&alice, &change(Some("customer_2"))));
        assert!(!visible_to(&alice, &change(None)));
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&Session::admin("owner"), "Creating orders").is_ok());
        assert!(matches!(
            require_admin(&Session::customer("customer_1"), "Creating orders"),
            Err(OrderError::AuthorizationError(_))
        ));
    }
}

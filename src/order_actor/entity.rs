use chrono::Utc;

use super::actions::{OrderAction, OrderActionResult};
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate};

impl Entity for Order {
    type Id = String;
    type CreatePayload = OrderCreate;
    type Patch = ();
    type Action = OrderAction;
    type ActionResult = OrderActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.customer_id)
    }

    /// Creates a new Order from creation parameters.
    ///
    /// # Notes
    /// The order starts with an empty update log, so its status is `pending`.
    fn from_create(id: String, payload: OrderCreate) -> Result<Self, String> {
        let payload = payload.validated()?;
        Ok(Order::open(id, payload, Utc::now()))
    }

    /// Orders change only by recording status updates.
    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Orders are changed by recording status updates".to_string())
    }

    fn on_delete(&self) -> Result<(), String> {
        Err(format!("Order {} cannot be deleted", self.id))
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, String> {
        match action {
            OrderAction::RecordUpdate(draft) => {
                let update = self.record_update(draft, Utc::now());
                Ok(OrderActionResult::Recorded(update))
            }
        }
    }
}

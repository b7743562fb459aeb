use tracing::{error, info, instrument};

use super::SystemError;
use crate::actor_framework::{sequential_ids, ResourceActor};
use crate::clients::{BookingClient, CustomerClient, MeasurementClient, NoteClient, OrderClient};
use crate::config::SystemConfig;
use crate::domain::{Booking, CustomerNote, CustomerProfile, Measurements, Order};

/// Starts the resource actors, wires the clients together and handles shutdown.
pub struct ShopSystem {
    pub order_client: OrderClient,
    pub customer_client: CustomerClient,
    pub measurement_client: MeasurementClient,
    pub booking_client: BookingClient,
    pub note_client: NoteClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl ShopSystem {
    #[instrument(name = "shop_system", skip(config))]
    pub fn new(config: &SystemConfig) -> Self {
        info!("Starting shop system");
        let buffer = config.channel_buffer;
        let feed = config.feed_capacity;

        // 1. Customer profiles (no dependencies)
        let (customer_actor, customer_resource_client) =
            ResourceActor::<CustomerProfile>::new("customers", buffer, feed, sequential_ids("customer"));
        let customer_client = CustomerClient::new(customer_resource_client);

        // 2. Orders and measurements, which validate against customers
        let (order_actor, order_resource_client) =
            ResourceActor::<Order>::new("orders", buffer, feed, sequential_ids("order"));
        let order_client = OrderClient::new(order_resource_client, customer_client.clone());

        let (measurement_actor, measurement_resource_client) =
            ResourceActor::<Measurements>::new("measurements", buffer, feed, sequential_ids("measurements"));
        let measurement_client = MeasurementClient::new(measurement_resource_client, customer_client.clone());

        // 3. Bookings and notes (standalone)
        let (booking_actor, booking_resource_client) =
            ResourceActor::<Booking>::new("bookings", buffer, feed, sequential_ids("booking"));
        let (note_actor, note_resource_client) =
            ResourceActor::<CustomerNote>::new("customer_notes", buffer, feed, sequential_ids("note"));

        let handles = vec![
            tokio::spawn(customer_actor.run()),
            tokio::spawn(order_actor.run()),
            tokio::spawn(measurement_actor.run()),
            tokio::spawn(booking_actor.run()),
            tokio::spawn(note_actor.run()),
        ];

        Self {
            order_client,
            customer_client,
            measurement_client,
            booking_client: BookingClient::new(booking_resource_client),
            note_client: NoteClient::new(note_resource_client),
            handles,
        }
    }

    /// Stops live views, drops the clients so each actor's channel closes,
    /// then waits for the actors.
    ///
    /// Client clones made outside the system still keep their actor alive.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down shop system");
        let aborted = self.order_client.views().abort_all();
        if aborted > 0 {
            info!(aborted, "Stopped live views");
        }
        drop(self.order_client);
        drop(self.customer_client);
        drop(self.measurement_client);
        drop(self.booking_client);
        drop(self.note_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        }

        info!("Shop system shutdown complete");
        Ok(())
    }
}

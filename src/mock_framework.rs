//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_action`] to assert behavior.

use tokio::sync::{broadcast, mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, Predicate, ResourceClient, ResourceRequest};

/// Creates a mock client and a receiver for asserting requests.
///
/// The test plays the actor: it reads each request off `receiver`, checks it,
/// and answers through the request's oneshot sender. Success, failure and
/// ordering are then fully deterministic.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (feed, _) = broadcast::channel(buffer_size.max(1));
    (ResourceClient::with_feed(sender, feed), receiver)
}

type Reply<R> = oneshot::Sender<Result<R, FrameworkError>>;

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreatePayload, Reply<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { payload, respond_to }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Reply<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Option<Predicate<T>>, Reply<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Reply<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::CustomerClient;
    use crate::domain::{CustomerCreate, CustomerProfile, Session};

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver) = create_mock_client::<CustomerProfile>(10);
        let client = CustomerClient::new(inner);

        let create_task = tokio::spawn(async move {
            let admin = Session::admin("owner");
            client
                .create_customer(&admin, CustomerCreate::new("Test", "test@example.com"))
                .await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.full_name.as_deref(), Some("Test"));
        responder.send(Ok("customer_1".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok("customer_1".to_string()));
    }
}

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, DTOs, and Actions)
// =============================================================================

/// Trait that any table row must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    /// Get the ID of the row
    fn id(&self) -> &Self::Id;

    /// Owner key attached to change notifications so subscribers can scope them.
    fn owner(&self) -> Option<&str> {
        None
    }

    /// Construct the full row from the ID and payload
    fn from_create(id: Self::Id, payload: Self::CreatePayload) -> Result<Self, String>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), String>;
    fn on_delete(&self) -> Result<(), String> {
        Ok(())
    }

    // --- Action Handler ---

    /// Handle a custom domain-specific action. A successful action counts as an update.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;
}

/// Errors surfaced by the generic actor and client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped the response")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Rejected: {0}")]
    Rejected(String),
}

// =============================================================================
// 2. CHANGE FEED
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// One row-level change notification, published after the write is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change<Id> {
    pub table: &'static str,
    pub kind: ChangeKind,
    pub id: Id,
    pub owner: Option<String>,
}

pub type ChangeFeed<T> = broadcast::Sender<Change<<T as Entity>::Id>>;

// =============================================================================
// 3. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Row filter evaluated inside the actor.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

pub enum ResourceRequest<T: Entity> {
    Create {
        payload: T::CreatePayload,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        filter: Option<Predicate<T>>,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

/// Returns an id generator producing `{prefix}_1`, `{prefix}_2`, ...
pub fn sequential_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}

// =============================================================================
// 4. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    table: &'static str,
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    // insertion order, so List is stable
    order: Vec<T::Id>,
    feed: ChangeFeed<T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        table: &'static str,
        buffer_size: usize,
        feed_capacity: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (feed, _) = broadcast::channel(feed_capacity.max(1));
        let actor = Self {
            table,
            receiver,
            store: HashMap::new(),
            order: Vec::new(),
            feed: feed.clone(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient::with_feed(sender, feed);
        (actor, client)
    }

    #[instrument(name = "resource_actor", skip(self), fields(table = self.table))]
    pub async fn run(mut self) {
        info!("Actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { payload, respond_to } => {
                    let _ = respond_to.send(self.handle_create(payload));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let _ = respond_to.send(Ok(self.handle_list(filter)));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, patch));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action));
                }
            }
        }
        info!("Actor stopped");
    }

    fn handle_create(&mut self, payload: T::CreatePayload) -> Result<T::Id, FrameworkError> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create(id.clone(), payload).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;
        debug!(id = %id, "Row created");
        self.publish(ChangeKind::Insert, &item);
        self.store.insert(id.clone(), item);
        self.order.push(id.clone());
        Ok(id)
    }

    fn handle_list(&self, filter: Option<Predicate<T>>) -> Vec<T> {
        self.order
            .iter()
            .filter_map(|id| self.store.get(id))
            .filter(|item| filter.as_ref().map_or(true, |keep| keep(*item)))
            .cloned()
            .collect()
    }

    fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_update(patch).map_err(FrameworkError::Rejected)?;
        let item = item.clone();
        self.publish(ChangeKind::Update, &item);
        Ok(item)
    }

    fn handle_delete(&mut self, id: T::Id) -> Result<(), FrameworkError> {
        let item = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete().map_err(FrameworkError::Rejected)?;
        if let Some(item) = self.store.remove(&id) {
            self.order.retain(|existing| existing != &id);
            self.publish(ChangeKind::Delete, &item);
        }
        Ok(())
    }

    fn handle_action(&mut self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let result = item.handle_action(action).map_err(FrameworkError::Rejected)?;
        let item = item.clone();
        self.publish(ChangeKind::Update, &item);
        Ok(result)
    }

    fn publish(&self, kind: ChangeKind, item: &T) {
        let change = Change {
            table: self.table,
            kind,
            id: item.id().clone(),
            owner: item.owner().map(str::to_owned),
        };
        // No subscribers is not an error.
        if self.feed.send(change).is_err() {
            debug!(?kind, "No change subscribers");
        }
    }
}

// =============================================================================
// 5. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
    feed: ChangeFeed<T>,
}

// Manual impl: derive would require `T: Clone` bounds on the channel types.
impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            feed: self.feed.clone(),
        }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn with_feed(sender: mpsc::Sender<ResourceRequest<T>>, feed: ChangeFeed<T>) -> Self {
        Self { sender, feed }
    }

    /// Subscribe to changes published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Change<T::Id>> {
        self.feed.subscribe()
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(build(respond_to)).await.map_err(|_| {
            warn!("Actor closed");
            FrameworkError::ActorClosed
        })?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, payload: T::CreatePayload) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { payload, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self, filter: Option<Predicate<T>>) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { filter, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }
}

// =============================================================================
// 6. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Swatch {
        id: String,
        fabric: String,
        meters: u32,
        owner: String,
    }

    #[derive(Debug)]
    struct SwatchCreate {
        fabric: String,
        meters: u32,
        owner: String,
    }

    #[derive(Debug)]
    struct SwatchPatch {
        fabric: Option<String>,
    }

    #[derive(Debug)]
    enum SwatchAction {
        Cut(u32),
    }

    impl Entity for Swatch {
        type Id = String;
        type CreatePayload = SwatchCreate;
        type Patch = SwatchPatch;
        type Action = SwatchAction;
        type ActionResult = u32;

        fn id(&self) -> &String {
            &self.id
        }

        fn owner(&self) -> Option<&str> {
            Some(&self.owner)
        }

        fn from_create(id: String, payload: SwatchCreate) -> Result<Self, String> {
            if payload.fabric.is_empty() {
                return Err("fabric is required".to_string());
            }
            Ok(Self {
                id,
                fabric: payload.fabric,
                meters: payload.meters,
                owner: payload.owner,
            })
        }

        fn on_update(&mut self, patch: SwatchPatch) -> Result<(), String> {
            if let Some(fabric) = patch.fabric {
                self.fabric = fabric;
            }
            Ok(())
        }

        fn on_delete(&self) -> Result<(), String> {
            if self.meters > 0 {
                return Err("swatch still has fabric".to_string());
            }
            Ok(())
        }

        fn handle_action(&mut self, action: SwatchAction) -> Result<u32, String> {
            match action {
                SwatchAction::Cut(amount) if amount <= self.meters => {
                    self.meters -= amount;
                    Ok(self.meters)
                }
                SwatchAction::Cut(amount) => Err(format!("only {} left, {} requested", self.meters, amount)),
            }
        }
    }

    fn start() -> ResourceClient<Swatch> {
        let (actor, client) = ResourceActor::new("swatches", 10, 10, sequential_ids("swatch"));
        tokio::spawn(actor.run());
        client
    }

    fn silk(owner: &str) -> SwatchCreate {
        SwatchCreate { fabric: "silk".into(), meters: 3, owner: owner.into() }
    }

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let client = start();

        let id = client.create(silk("alice")).await.unwrap();
        assert_eq!(id, "swatch_1");

        let left = client.perform_action(id.clone(), SwatchAction::Cut(2)).await.unwrap();
        assert_eq!(left, 1);

        let err = client.perform_action(id.clone(), SwatchAction::Cut(5)).await.unwrap_err();
        assert!(matches!(err, FrameworkError::Rejected(_)));

        let swatch = client.get(id.clone()).await.unwrap().unwrap();
        assert_eq!(swatch.meters, 1);
    }

    #[tokio::test]
    async fn test_create_rejected_by_entity() {
        let client = start();
        let payload = SwatchCreate { fabric: String::new(), meters: 1, owner: "alice".into() };
        let err = client.create(payload).await.unwrap_err();
        assert_eq!(err, FrameworkError::Rejected("fabric is required".to_string()));
        assert!(client.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order_and_filters() {
        let client = start();
        for owner in ["alice", "bob", "alice"] {
            client.create(silk(owner)).await.unwrap();
        }

        let all: Vec<String> = client.list(None).await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(all, vec!["swatch_1", "swatch_2", "swatch_3"]);

        let alice: Predicate<Swatch> = Box::new(|s| s.owner == "alice");
        let only_alice = client.list(Some(alice)).await.unwrap();
        assert_eq!(only_alice.len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_hooks() {
        let client = start();
        let id = client.create(silk("alice")).await.unwrap();

        let patched = client
            .update(id.clone(), SwatchPatch { fabric: Some("linen".into()) })
            .await
            .unwrap();
        assert_eq!(patched.fabric, "linen");

        // on_delete refuses while fabric remains
        assert!(matches!(client.delete(id.clone()).await, Err(FrameworkError::Rejected(_))));
        client.perform_action(id.clone(), SwatchAction::Cut(3)).await.unwrap();
        client.delete(id.clone()).await.unwrap();

        assert_eq!(client.get(id.clone()).await.unwrap(), None);
        assert_eq!(client.delete(id).await, Err(FrameworkError::NotFound("swatch_1".into())));
    }

    #[tokio::test]
    async fn test_changes_are_published() {
        let client = start();
        let mut changes = client.subscribe();

        let id = client.create(silk("alice")).await.unwrap();
        client.perform_action(id.clone(), SwatchAction::Cut(1)).await.unwrap();

        let insert = changes.recv().await.unwrap();
        assert_eq!(insert.kind, ChangeKind::Insert);
        assert_eq!(insert.table, "swatches");
        assert_eq!(insert.owner.as_deref(), Some("alice"));

        let update = changes.recv().await.unwrap();
        assert_eq!(update.kind, ChangeKind::Update);
        assert_eq!(update.id, id);
    }

    #[tokio::test]
    async fn test_closed_actor_reports_error() {
        let (actor, client) = ResourceActor::<Swatch>::new("swatches", 1, 1, sequential_ids("swatch"));
        drop(actor);
        assert_eq!(client.get("swatch_1".into()).await, Err(FrameworkError::ActorClosed));
    }
}

use crate::{
    error::AppError,
    inflight::InFlight,
    models::{Item, ItemStatus, NewItemRequest, User},
    policy::{self, Denial},
};
use async_trait::async_trait;
use chrono::Utc;
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::sync::RwLock;

/// ItemRepository
///
/// Abstract contract for everything that reads or writes item reports. Handlers only
/// see this trait (`Arc<dyn ItemRepository>`), so tests can swap in a mock.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    // --- Writes ---
    // Creates a pending report owned by `reporter`.
    async fn add_item(&self, reporter: &User, req: NewItemRequest) -> Result<Item, AppError>;
    // Admin-only. Replaces status and admin_id, nothing else.
    async fn update_item_status(
        &self,
        id: u64,
        status: ItemStatus,
        acting: &User,
    ) -> Result<Item, AppError>;

    // --- Reads ---
    async fn get_item_by_id(&self, id: u64) -> Option<Item>;
    // Insertion order.
    async fn list_all(&self) -> Vec<Item>;
    async fn list_for_user(&self, user_id: &str) -> Vec<Item>;
}

/// ItemState
///
/// The concrete type used to share the item repository across the application state.
pub type ItemState = Arc<dyn ItemRepository>;

/// InMemoryItemRepository
///
/// The in-process implementation. Ids come from a counter that only moves forward,
/// so they stay unique even if removal is ever added.
pub struct InMemoryItemRepository {
    items: RwLock<Vec<Item>>,
    next_id: AtomicU64,
    add_latency: Duration,
    update_latency: Duration,
    in_flight: InFlight,
}

impl InMemoryItemRepository {
    pub fn new(add_latency: Duration, update_latency: Duration) -> Self {
        Self::with_items(Vec::new(), add_latency, update_latency)
    }

    /// Starts from seed records; the counter resumes after the highest seeded id.
    pub fn with_items(items: Vec<Item>, add_latency: Duration, update_latency: Duration) -> Self {
        let next = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        Self {
            items: RwLock::new(items),
            next_id: AtomicU64::new(next),
            add_latency,
            update_latency,
            in_flight: InFlight::new(),
        }
    }
}

async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    /// add_item
    ///
    /// Snapshots the reporter's id and name into the record, sets `pending` and the
    /// creation timestamp, and appends. One submission per reporter at a time.
    async fn add_item(&self, reporter: &User, req: NewItemRequest) -> Result<Item, AppError> {
        let req = req.normalize(reporter)?;
        let _ticket = self.in_flight.begin(format!("add-item:{}", reporter.id))?;
        simulate_latency(self.add_latency).await;

        let mut items = self.items.write().await;
        let item = Item {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id: reporter.id.clone(),
            user_name: reporter.name.clone(),
            item_name: req.item_name,
            item_type: req.item_type,
            description: req.description,
            date: req.date.unwrap_or_else(|| Utc::now().date_naive()),
            location: req.location,
            image_url: req.image_url,
            contact_info: req.contact_info.unwrap_or_default(),
            status: ItemStatus::Pending,
            created_at: Utc::now(),
            admin_id: None,
        };
        items.push(item.clone());
        tracing::info!(item_id = item.id, user_id = %item.user_id, "item reported");
        Ok(item)
    }

    /// update_item_status
    ///
    /// The role check lives here rather than in the route, so no caller can skip it.
    /// Backward moves (e.g. resolved → pending) are accepted as written.
    async fn update_item_status(
        &self,
        id: u64,
        status: ItemStatus,
        acting: &User,
    ) -> Result<Item, AppError> {
        if !policy::can_update_status(acting) {
            tracing::warn!(user_id = %acting.id, item_id = id, "status change refused for non-admin");
            return Err(Denial::AdminRequired.into());
        }
        let _ticket = self.in_flight.begin(format!("item-status:{id}"))?;
        simulate_latency(self.update_latency).await;

        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(AppError::ItemNotFound(id))?;
        item.status = status;
        item.admin_id = Some(acting.id.clone());
        tracing::info!(item_id = id, status = status.as_str(), admin_id = %acting.id, "item status updated");
        Ok(item.clone())
    }

    async fn get_item_by_id(&self, id: u64) -> Option<Item> {
        self.items.read().await.iter().find(|i| i.id == id).cloned()
    }

    async fn list_all(&self) -> Vec<Item> {
        self.items.read().await.clone()
    }

    async fn list_for_user(&self, user_id: &str) -> Vec<Item> {
        self.items
            .read()
            .await
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect()
    }
}

use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::debug;

pub trait Entity: Clone + Send + Sync {
    fn id(&self) -> &str;
}

/// In-memory append-only table. Rows keep their insertion order; every read
/// and write goes through the same lock, so a row inserted by one caller is
/// visible to the next reader.
pub struct Table<T>
where
    T: Entity,
{
    name: &'static str,
    rows: RwLock<Vec<T>>,
}

impl<T> Table<T>
where
    T: Entity,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: RwLock::new(vec![]),
        }
    }

    pub async fn insert(&self, item: T) -> T {
        self.rows.write().await.push(item.clone());
        debug!(table = self.name, id = item.id(), "row inserted");
        item
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.id() == id)
            .cloned()
    }

    pub async fn list(&self) -> Vec<T> {
        self.rows.read().await.clone()
    }

    pub async fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows
            .read()
            .await
            .iter()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    /// Most recently inserted row matching the predicate.
    pub async fn find_last<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows
            .read()
            .await
            .iter()
            .rev()
            .find(|row| predicate(row))
            .cloned()
    }

    /// Exclusive access for read-modify-write sequences that must not
    /// interleave with other writers.
    pub async fn lock(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.rows.write().await
    }
}

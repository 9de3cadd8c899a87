use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::anyhow;
use async_trait::async_trait;

use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::object_storage::ObjectStorage;
use crate::application::ports::restaurant_repository::RestaurantRepository;
use crate::domain::files::restaurant_file::{NewRestaurantFile, RestaurantFile};
use crate::domain::restaurants::restaurant::Restaurant;

pub const MB: i64 = 1024 * 1024;

/// Restaurants and file rows kept in memory, standing in for Postgres.
#[derive(Default)]
pub struct InMemoryStore {
    restaurants: Mutex<Vec<Restaurant>>,
    files: Mutex<Vec<RestaurantFile>>,
    pub fail_reads: AtomicBool,
    pub fail_insert: AtomicBool,
    pub calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_restaurant(&self, id: &str, user_id: &str) {
        self.restaurants.lock().unwrap().push(Restaurant {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: format!("Restaurant {id}"),
            created_at: chrono::Utc::now(),
        });
    }

    /// Seeds a row directly; `age_secs` pushes `created_at` into the past.
    pub fn seed_file(&self, restaurant_id: &str, name: &str, size: i64, age_secs: i64) {
        self.files.lock().unwrap().push(RestaurantFile {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            size,
            content_type: "application/pdf".into(),
            url: format!("https://storage.googleapis.com/test-bucket/{name}"),
            restaurant_id: restaurant_id.to_string(),
            created_at: chrono::Utc::now() - chrono::Duration::seconds(age_secs),
        });
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("connection reset by peer"));
        }
        Ok(())
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryStore {
    async fn find_owned(&self, id: &str, user_id: &str) -> anyhow::Result<Option<Restaurant>> {
        self.touch()?;
        Ok(self
            .restaurants
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl FilesRepository for InMemoryStore {
    async fn list_for_restaurant(
        &self,
        restaurant_id: &str,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<RestaurantFile>> {
        self.touch()?;
        let mut rows: Vec<RestaurantFile> = self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(n) = limit {
            rows.truncate(n as usize);
        }
        Ok(rows)
    }

    async fn total_bytes_for_owner(&self, user_id: &str) -> anyhow::Result<i64> {
        self.touch()?;
        let owned: Vec<String> = self
            .restaurants
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.id.clone())
            .collect();
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| owned.contains(&f.restaurant_id))
            .map(|f| f.size)
            .sum())
    }

    async fn insert_file(&self, file: &NewRestaurantFile) -> anyhow::Result<RestaurantFile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(anyhow!("unique constraint violated"));
        }
        let row = RestaurantFile {
            id: uuid::Uuid::new_v4().to_string(),
            name: file.name.clone(),
            size: file.size,
            content_type: file.content_type.clone(),
            url: file.url.clone(),
            restaurant_id: file.restaurant_id.clone(),
            created_at: chrono::Utc::now(),
        };
        self.files.lock().unwrap().push(row.clone());
        Ok(row)
    }
}

/// Bucket double. A failing put still leaves a partial object behind so
/// cleanup can be observed.
#[derive(Default)]
pub struct InMemoryObjectStorage {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    deleted: Mutex<Vec<String>>,
    pub fail_put: AtomicBool,
    pub fail_delete: AtomicBool,
    pub puts: AtomicUsize,
}

impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn content_type_of(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, ct)| ct.clone())
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let failing = self.fail_put.load(Ordering::SeqCst);
        let stored = if failing {
            bytes[..bytes.len() / 2].to_vec()
        } else {
            bytes
        };
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (stored, content_type.to_string()));
        if failing {
            return Err(anyhow!("stream closed before upload completed"));
        }
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        self.deleted.lock().unwrap().push(key.to_string());
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(anyhow!("permission denied"));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://storage.googleapis.com/test-bucket/{key}")
    }
}

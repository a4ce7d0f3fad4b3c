//! Cache-aside in front of a slow "repository", with write-path invalidation.
//!
//! Run with `RUST_LOG=rcache=debug cargo run --example cache_aside`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rcache::key::entity_key;
use rcache::{CacheConfig, SharedCache, Tag};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Post {
    id: u32,
    title: String,
}

#[derive(Debug, thiserror::Error)]
#[error("post {0} not found")]
struct NotFound(u32);

/// Stand-in for a database table.
#[derive(Clone, Default)]
struct PostRepository {
    rows: Arc<Mutex<HashMap<u32, String>>>,
}

impl PostRepository {
    async fn find(&self, id: u32) -> Result<Post, NotFound> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        rows.get(&id)
            .map(|title| Post {
                id,
                title: title.clone(),
            })
            .ok_or(NotFound(id))
    }

    fn update(&self, id: u32, title: &str) {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, title.to_owned());
    }
}

/// Application service: reads go through the cache, writes invalidate it.
struct PostService {
    repo: PostRepository,
    cache: SharedCache<String, Post>,
}

impl PostService {
    async fn get(&self, id: u32) -> Result<Post, rcache::CacheError<NotFound>> {
        let repo = self.repo.clone();
        self.cache
            .get_or_compute(
                entity_key("post", id),
                || async move { repo.find(id).await },
                Some(Duration::from_secs(30)),
                [Tag::from("post"), Tag::new(format!("post-{id}"))],
            )
            .await
    }

    fn rename(&self, id: u32, title: &str) -> Result<(), rcache::PoisonedLock> {
        self.repo.update(id, title);
        self.cache.invalidate_by_tag(format!("post-{id}").as_str())?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rcache=debug")),
        )
        .init();

    let config = CacheConfig::from_json(r#"{ "capacity": 128, "default_ttl_ms": 60000 }"#)?;
    let service = Arc::new(PostService {
        repo: PostRepository::default(),
        cache: SharedCache::with_config(config)?,
    });
    service.repo.update(42, "Hello, cache");

    // Ten concurrent readers, one repository call.
    let readers: Vec<_> = (0..10)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.get(42).await })
        })
        .collect();
    for reader in readers {
        let post = reader.await??;
        info!(id = post.id, title = %post.title, "read");
    }

    service.rename(42, "Hello again")?;
    let post = service.get(42).await?;
    info!(id = post.id, title = %post.title, "read after write");

    match service.get(7).await {
        Err(rcache::CacheError::Supplier(e)) => info!(error = %e, "miss propagated"),
        other => info!(result = ?other.map(|p| p.title), "unexpected"),
    }

    let stats = service.cache.stats()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

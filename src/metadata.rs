//! Memoized editor metadata with in-flight de-duplication.
//!
//! State transitions:
//!
//! | state    | call          | next                      |
//! |----------|---------------|---------------------------|
//! | Empty    | any           | Pending (new fetch)       |
//! | Pending  | normal        | Pending (join the fetch)  |
//! | Pending  | forced        | Pending (new fetch)       |
//! | Resolved | normal        | Resolved (cached value)   |
//! | Resolved | forced        | Pending (new fetch)       |
//! | Pending  | fetch Ok/Err  | Resolved / Empty          |
//!
//! A fetch that was superseded by a forced refresh never overwrites the newer one.

use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex};

use crate::client::PrtgClient;
use crate::error::Result;
use crate::models::metadata::Metadata;

type MetadataFuture = Shared<BoxFuture<'static, Result<Arc<Metadata>>>>;

enum CacheState {
    Empty,
    Pending {
        generation: u64,
        future: MetadataFuture,
    },
    Resolved(Arc<Metadata>),
}

struct Inner {
    state: CacheState,
    generation: u64,
}

pub struct MetadataCache {
    client: PrtgClient,
    limit: u64,
    inner: Mutex<Inner>,
}

impl MetadataCache {
    pub fn new(client: PrtgClient, limit: u64) -> Self {
        Self {
            client,
            limit,
            inner: Mutex::new(Inner {
                state: CacheState::Empty,
                generation: 0,
            }),
        }
    }

    pub async fn get(&self, force_refresh: bool) -> Result<Arc<Metadata>> {
        let (generation, future) = {
            let mut inner = self.inner.lock().unwrap();

            let existing = if force_refresh {
                None
            } else {
                match &inner.state {
                    CacheState::Resolved(metadata) => return Ok(metadata.clone()),
                    CacheState::Pending { generation, future } => Some((*generation, future.clone())),
                    CacheState::Empty => None,
                }
            };

            match existing {
                Some(pending) => pending,
                None => {
                    inner.generation += 1;
                    let generation = inner.generation;
                    let future = self.start_fetch();
                    inner.state = CacheState::Pending {
                        generation,
                        future: future.clone(),
                    };
                    (generation, future)
                }
            }
        };

        let result = future.await;

        let mut inner = self.inner.lock().unwrap();
        let current = matches!(
            inner.state,
            CacheState::Pending { generation: g, .. } if g == generation
        );
        if current {
            inner.state = match &result {
                Ok(metadata) => CacheState::Resolved(metadata.clone()),
                Err(e) => {
                    tracing::error!("Failed to fetch PRTG metadata: {e}");
                    CacheState::Empty
                }
            };
        }

        result
    }

    fn start_fetch(&self) -> MetadataFuture {
        let client = self.client.clone();
        let limit = self.limit;
        async move { client.get_metadata(limit).await.map(Arc::new) }
            .boxed()
            .shared()
    }
}

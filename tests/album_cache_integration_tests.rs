//! Integration tests for the album cache
//!
//! Exercises the public contract the album-management layer relies on:
//! miss signaling, batch writes, invalidation, store failures and
//! concurrent callers.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use album_cache::{
    Album, AlbumCache, Backend, BackingStore, CacheError, Config, MemoryStore, Result, ResultExt,
    ShardedStore, StoreBackedCache,
};

// == Helper Functions ==

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "album_cache=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn albums(titles: &[&str]) -> Vec<Album> {
    titles.iter().map(|t| Album::with_title(*t)).collect()
}

/// Memory store with switchable failures.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    /// Puts that succeed before every later put fails
    puts_before_failure: Option<usize>,
    puts: AtomicUsize,
    unavailable: AtomicBool,
}

impl FlakyStore {
    fn failing_after(puts: usize) -> Self {
        Self {
            puts_before_failure: Some(puts),
            ..Self::default()
        }
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CacheError::Store("store offline".to_string()));
        }
        Ok(())
    }
}

impl BackingStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check_available()?;
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.check_available()?;
        let n = self.puts.fetch_add(1, Ordering::SeqCst);
        if self.puts_before_failure.is_some_and(|limit| n >= limit) {
            return Err(CacheError::Store("disk full".to_string()));
        }
        self.inner.put(key, value)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        self.check_available()?;
        self.inner.delete(key)
    }

    fn len(&self) -> Result<usize> {
        self.inner.len()
    }
}

// == Contract Tests ==

#[test]
fn test_miss_put_get_invalidate_scenario() {
    init_tracing();
    let cache = StoreBackedCache::in_memory();

    assert!(matches!(cache.get_album("x"), Err(CacheError::Miss(_))));

    cache.put_album(&Album::with_title("x")).unwrap();
    assert_eq!(cache.get_album("x").unwrap(), Album::with_title("x"));

    cache.invalidate_album("x").unwrap();
    assert!(matches!(cache.get_album("x"), Err(CacheError::Miss(_))));
}

#[test]
fn test_get_album_table() {
    let cases: Vec<(&str, Vec<&str>, &str, bool)> = vec![
        ("empty cache", vec![], "foo", true),
        ("existing key", vec!["foo", "bar"], "foo", false),
        ("non-existent key", vec!["foo", "bar"], "baz", true),
    ];

    for (name, populated, input, expect_miss) in cases {
        let cache = StoreBackedCache::in_memory();
        cache.put_many_albums(&albums(&populated)).unwrap();

        let result = cache.get_album(input);
        if expect_miss {
            assert!(matches!(result, Err(CacheError::Miss(_))), "{}", name);
        } else {
            assert_eq!(result.unwrap().title, input, "{}", name);
        }
    }
}

#[test]
fn test_put_many_then_unrelated_key_misses() {
    let cache = StoreBackedCache::in_memory();
    let batch = albums(&["T1", "T2", "T3"]);

    cache.put_many_albums(&batch).unwrap();

    for album in &batch {
        assert_eq!(&cache.get_album(&album.title).unwrap(), album);
    }
    assert!(cache.get_album("T4").unwrap_err().is_miss());
}

#[test]
fn test_caller_fallback_flow() {
    // The album-management layer: look up, on miss create remotely, then cache
    let cache = StoreBackedCache::in_memory();
    let mut remote_calls = 0;

    for _ in 0..3 {
        let album = match cache.get_album("Trip").found().unwrap() {
            Some(album) => album,
            None => {
                remote_calls += 1;
                let created = Album {
                    id: "remote-1".to_string(),
                    ..Album::with_title("Trip")
                };
                cache.put_album(&created).unwrap();
                created
            }
        };
        assert_eq!(album.id, "remote-1");
    }

    assert_eq!(remote_calls, 1);
}

// == Store Failure Tests ==

#[test]
fn test_put_many_failure_keeps_earlier_albums() {
    init_tracing();
    let cache = StoreBackedCache::new(FlakyStore::failing_after(2));

    let result = cache.put_many_albums(&albums(&["a", "b", "c", "d"]));

    assert!(matches!(result, Err(CacheError::Store(_))));
    assert!(cache.get_album("a").is_ok());
    assert!(cache.get_album("b").is_ok());
    assert!(cache.get_album("c").unwrap_err().is_miss());
    assert!(cache.get_album("d").unwrap_err().is_miss());
    assert_eq!(cache.stats().unwrap().writes, 2);
}

#[test]
fn test_store_failure_is_never_a_miss() {
    let store = Arc::new(FlakyStore::default());
    let cache = StoreBackedCache::new(Arc::clone(&store));
    cache.put_album(&Album::with_title("a")).unwrap();

    store.unavailable.store(true, Ordering::SeqCst);

    let err = cache.get_album("a").unwrap_err();
    assert!(matches!(err, CacheError::Store(_)));
    assert!(!err.is_miss());
    assert!(matches!(cache.get_album("a").found(), Err(CacheError::Store(_))));
    assert!(matches!(
        cache.put_album(&Album::with_title("b")),
        Err(CacheError::Store(_))
    ));
    assert!(matches!(
        cache.invalidate_album("a"),
        Err(CacheError::Store(_))
    ));
    assert_eq!(cache.stats().unwrap().misses, 0);

    store.unavailable.store(false, Ordering::SeqCst);
    assert_eq!(cache.get_album("a").unwrap().title, "a");
}

#[test]
fn test_corrupted_entry_is_decode_error() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let cache = StoreBackedCache::new(Arc::clone(&store));

    store.put("broken", b"{not json".to_vec()).unwrap();

    let err = cache.get_album("broken").unwrap_err();
    assert!(matches!(err, CacheError::Decode { ref key, .. } if key == "broken"));
    assert!(!err.is_miss());

    // An unreadable entry is neither a hit nor a miss
    let stats = cache.stats().unwrap();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);

    // Overwriting through the cache repairs the entry
    cache.put_album(&Album::with_title("broken")).unwrap();
    assert_eq!(cache.get_album("broken").unwrap().title, "broken");
}

// == Configuration Tests ==

#[test]
fn test_from_config_backends() {
    for backend in [Backend::Memory, Backend::Sharded] {
        let cache = StoreBackedCache::from_config(&Config {
            backend,
            max_entries: None,
        });

        cache.put_many_albums(&albums(&["a", "b"])).unwrap();
        cache.invalidate_album("a").unwrap();

        assert!(cache.get_album("a").unwrap_err().is_miss());
        assert!(cache.get_album("b").is_ok());
    }
}

#[test]
fn test_bounded_memory_store_reports_evictions() {
    let cache = StoreBackedCache::new(MemoryStore::bounded(3));

    cache
        .put_many_albums(&albums(&["a", "b", "c", "d", "e"]))
        .unwrap();

    let stats = cache.stats().unwrap();
    assert_eq!(stats.evictions, 2);
    assert_eq!(stats.total_entries, 3);
    assert!(cache.get_album("a").unwrap_err().is_miss());
    assert!(cache.get_album("e").is_ok());
}

#[test]
fn test_evictions_reported_through_configured_store() {
    let bounded = StoreBackedCache::from_config(&Config {
        backend: Backend::Memory,
        max_entries: Some(1),
    });
    let sharded = StoreBackedCache::from_config(&Config {
        backend: Backend::Sharded,
        max_entries: None,
    });

    for cache in [&bounded, &sharded] {
        cache.put_many_albums(&albums(&["a", "b", "c"])).unwrap();
    }

    assert_eq!(bounded.stats().unwrap().evictions, 2);
    assert_eq!(bounded.stats().unwrap().total_entries, 1);
    assert_eq!(sharded.stats().unwrap().evictions, 0);
    assert_eq!(sharded.stats().unwrap().total_entries, 3);
}

// == Concurrency Tests ==

async fn run_parallel_uploads<C>(cache: Arc<C>)
where
    C: AlbumCache + 'static,
{
    let handles: Vec<_> = (0..16)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            tokio::task::spawn_blocking(move || {
                for i in 0..50 {
                    // Workers share titles so lookups race with writes
                    let title = format!("album-{}", i % 10);
                    match cache.get_album(&title) {
                        Ok(album) => assert_eq!(album.title, title),
                        Err(err) if err.is_miss() => {
                            let album = Album {
                                id: format!("w{}", worker),
                                ..Album::with_title(title.clone())
                            };
                            cache.put_album(&album).unwrap();
                        }
                        Err(err) => panic!("unexpected error: {}", err),
                    }
                    if i % 7 == 0 {
                        cache.invalidate_album(&title).unwrap();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_memory_store() {
    init_tracing();
    let cache = Arc::new(StoreBackedCache::in_memory());

    run_parallel_uploads(Arc::clone(&cache)).await;

    let stats = cache.stats().unwrap();
    assert_eq!(stats.hits + stats.misses, 16 * 50);
    assert!(stats.total_entries <= 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_sharded_store() {
    let cache = Arc::new(StoreBackedCache::new(ShardedStore::new()));

    run_parallel_uploads(Arc::clone(&cache)).await;

    let stats = cache.stats().unwrap();
    assert_eq!(stats.hits + stats.misses, 16 * 50);
    assert!(stats.total_entries <= 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_during_batch_see_complete_albums() {
    let cache = Arc::new(StoreBackedCache::in_memory());
    let batch: Vec<Album> = (0..500)
        .map(|i| Album {
            id: format!("id-{}", i),
            ..Album::with_title(format!("album-{}", i))
        })
        .collect();

    let writer = {
        let cache = Arc::clone(&cache);
        let batch = batch.clone();
        tokio::task::spawn_blocking(move || cache.put_many_albums(&batch))
    };
    let reader = {
        let cache = Arc::clone(&cache);
        tokio::task::spawn_blocking(move || {
            for i in (0..500).rev() {
                // Partial visibility is allowed, torn albums are not
                match cache.get_album(&format!("album-{}", i)) {
                    Ok(album) => assert_eq!(album.id, format!("id-{}", i)),
                    Err(err) => assert!(err.is_miss(), "unexpected error: {}", err),
                }
            }
        })
    };

    writer.await.unwrap().unwrap();
    reader.await.unwrap();

    for album in &batch {
        assert_eq!(&cache.get_album(&album.title).unwrap(), album);
    }
}

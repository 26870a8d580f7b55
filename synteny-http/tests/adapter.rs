use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use futures::{
    FutureExt, StreamExt, TryStreamExt,
    future::{self, AbortHandle, BoxFuture},
};
use serde_json::{Value, json};
use synteny_core::{Feature, Region};
use synteny_http::{Adapter, Builder, Error, Options, Source};

/// How a fetch from the test source behaves.
#[derive(Clone, Copy)]
enum Behavior {
    Ready,
    Yield,
    Sleep(Duration),
    Pending,
    Fail,
}

struct TestSource {
    body: Value,
    fetches: Arc<AtomicUsize>,
    behaviors: Vec<Behavior>,
}

impl TestSource {
    fn new(body: Value) -> Self {
        Self {
            body,
            fetches: Arc::new(AtomicUsize::new(0)),
            behaviors: Vec::new(),
        }
    }

    /// Sets the behaviors of consecutive fetches. Fetches past the last one are ready.
    fn with_behaviors(mut self, behaviors: Vec<Behavior>) -> Self {
        self.behaviors = behaviors;
        self
    }

    fn fetches(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.fetches)
    }
}

impl Source for TestSource {
    fn fetch(&self, _: &Region) -> BoxFuture<'static, Result<Value, Error>> {
        let i = self.fetches.fetch_add(1, Ordering::SeqCst);
        let behavior = self.behaviors.get(i).copied().unwrap_or(Behavior::Ready);
        let body = self.body.clone();

        match behavior {
            Behavior::Ready => future::ready(Ok(body)).boxed(),
            Behavior::Yield => async move {
                tokio::task::yield_now().await;
                Ok(body)
            }
            .boxed(),
            Behavior::Sleep(duration) => async move {
                tokio::time::sleep(duration).await;
                Ok(body)
            }
            .boxed(),
            Behavior::Pending => future::pending().boxed(),
            Behavior::Fail => {
                future::ready(Err(Error::Other(Arc::new(io::Error::other("unavailable"))))).boxed()
            }
        }
    }
}

fn build_body() -> Value {
    json!({
        "alignments": [
            {
                "query": { "name": "chr1", "start": 100, "end": 200, "length": 50000 },
                "target": { "name": "chr5", "start": 3000, "end": 3100, "length": 60000 },
                "strand": "+"
            },
            {
                "query": { "name": "chr1", "start": 1000, "end": 1500, "length": 50000 },
                "target": { "name": "chr5", "start": 3000, "end": 3500, "length": 60000 },
                "strand": "-"
            },
            {
                "query": { "name": "chr2", "start": 150, "end": 160, "length": 40000 },
                "target": { "name": "chr6", "start": 10, "end": 20, "length": 70000 }
            }
        ]
    })
}

fn builder() -> Builder {
    Builder::default().set_assembly_names(vec![String::from("A"), String::from("B")])
}

fn region(name: &str, start: u64, end: u64) -> Result<Region, synteny_core::region::NewError> {
    Region::new(name, start, end).map(|region| region.with_assembly_name("A"))
}

async fn collect(
    adapter: &Adapter<TestSource>,
    region: &Region,
) -> Result<Vec<Feature>, Error> {
    adapter
        .features(region, Options::default())
        .try_collect()
        .await
}

#[tokio::test]
async fn test_features() -> Result<(), Box<dyn std::error::Error>> {
    let adapter = builder().build_from_source(TestSource::new(build_body()))?;

    let features = collect(&adapter, &region("chr1", 0, 10000)?).await?;
    assert_eq!(features.len(), 3);
    assert_eq!(features[0].region().name(), "chr1");
    assert_eq!(features[0].mate().assembly_name(), Some("B"));

    Ok(())
}

#[tokio::test]
async fn test_features_deduplicates_concurrent_fetches() -> Result<(), Box<dyn std::error::Error>>
{
    let source = TestSource::new(build_body()).with_behaviors(vec![Behavior::Yield]);
    let fetches = source.fetches();
    let adapter = builder().build_from_source(source)?;

    let region = region("chr1", 0, 10000)?;

    let (a, b) = tokio::join!(collect(&adapter, &region), collect(&adapter, &region));
    let (a, b) = (a?, b?);

    assert_eq!(fetches.load(Ordering::SeqCst), 1);
    assert_eq!(a, b);
    assert_eq!(a.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_features_with_cache_disabled() -> Result<(), Box<dyn std::error::Error>> {
    let source = TestSource::new(build_body());
    let fetches = source.fetches();
    let adapter = builder()
        .set_cache_timeout(Duration::ZERO)
        .build_from_source(source)?;

    let region = region("chr1", 0, 10000)?;
    collect(&adapter, &region).await?;
    collect(&adapter, &region).await?;

    assert_eq!(fetches.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_features_with_expired_cache() -> Result<(), Box<dyn std::error::Error>> {
    let source = TestSource::new(build_body());
    let fetches = source.fetches();
    let adapter = builder()
        .set_cache_timeout(Duration::from_millis(1000))
        .build_from_source(source)?;

    let region = region("chr1", 0, 10000)?;

    collect(&adapter, &region).await?;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_millis(999)).await;
    collect(&adapter, &region).await?;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_millis(2)).await;
    collect(&adapter, &region).await?;
    assert_eq!(fetches.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn test_features_with_server_side_filter() -> Result<(), Box<dyn std::error::Error>> {
    let source = TestSource::new(build_body());
    let fetches = source.fetches();
    let adapter = builder().build_from_source(source)?;

    // The response is taken as is, and each region is cached separately.
    let features = collect(&adapter, &region("chr1", 300, 400)?).await?;
    assert_eq!(features.len(), 3);

    collect(&adapter, &region("chr1", 300, 400)?).await?;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    collect(&adapter, &region("chr1", 300, 401)?).await?;
    collect(&adapter, &region("chr1", 300, 400)?.with_assembly_name("B")).await?;
    assert_eq!(fetches.load(Ordering::SeqCst), 3);

    Ok(())
}

#[tokio::test]
async fn test_features_with_client_side_filter() -> Result<(), Box<dyn std::error::Error>> {
    let source = TestSource::new(build_body());
    let fetches = source.fetches();
    let adapter = builder()
        .client_side_filter(true)
        .build_from_source(source)?;

    let features = collect(&adapter, &region("chr1", 150, 160)?).await?;
    let ids: Vec<_> = features.iter().map(|f| f.id()).collect();
    assert_eq!(ids, ["chr1:100-200_chr5:3000-3100"]);

    let features = collect(&adapter, &region("chr1", 300, 400)?).await?;
    assert!(features.is_empty());

    let features = collect(&adapter, &region("chr2", 0, 1000)?).await?;
    assert_eq!(features.len(), 1);

    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    // The other assembly has its own dataset, viewed from the target side.
    let region = Region::new("chr5", 3050, 3060)?.with_assembly_name("B");
    let features = collect(&adapter, &region).await?;
    let ids: Vec<_> = features.iter().map(|f| f.id()).collect();
    assert_eq!(
        ids,
        ["chr1:100-200_chr5:3000-3100", "chr1:1000-1500_chr5:3000-3500"]
    );
    assert_eq!(fetches.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn test_features_with_malformed_response() -> Result<(), Box<dyn std::error::Error>> {
    let body = json!({ "alignments": { "query": { "name": "chr1" } } });
    let adapter = builder().build_from_source(TestSource::new(body))?;

    let features = collect(&adapter, &region("chr1", 0, 10000)?).await?;
    assert!(features.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_features_with_failed_fetch() -> Result<(), Box<dyn std::error::Error>> {
    let source = TestSource::new(build_body()).with_behaviors(vec![Behavior::Fail]);
    let fetches = source.fetches();
    let adapter = builder().build_from_source(source)?;

    let region = region("chr1", 0, 10000)?;

    let mut features = adapter.features(&region, Options::default());
    assert!(matches!(features.next().await, Some(Err(Error::Other(_)))));
    assert!(features.next().await.is_none());

    // The failure is neither cached nor left in flight.
    let features = collect(&adapter, &region).await?;
    assert_eq!(features.len(), 3);
    assert_eq!(fetches.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn test_features_with_aborted_fetch() -> Result<(), Box<dyn std::error::Error>> {
    let source = TestSource::new(build_body()).with_behaviors(vec![Behavior::Pending]);
    let fetches = source.fetches();
    let adapter = builder().build_from_source(source)?;

    let region = region("chr1", 0, 10000)?;

    let (abort_handle, abort_registration) = AbortHandle::new_pair();
    let mut a = adapter.features(
        &region,
        Options::default().set_abort_registration(abort_registration),
    );
    let mut b = adapter.features(&region, Options::default());

    assert!(futures::poll!(a.next()).is_pending());
    assert!(futures::poll!(b.next()).is_pending());

    abort_handle.abort();

    // Aborting the fetch fails every caller sharing it.
    assert!(matches!(a.next().await, Some(Err(Error::Aborted))));
    assert!(a.next().await.is_none());
    assert!(matches!(b.next().await, Some(Err(Error::Aborted))));
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    let features = collect(&adapter, &region).await?;
    assert_eq!(features.len(), 3);
    assert_eq!(fetches.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn test_features_with_aborted_wait() -> Result<(), Box<dyn std::error::Error>> {
    let source = TestSource::new(build_body()).with_behaviors(vec![Behavior::Yield]);
    let fetches = source.fetches();
    let adapter = builder().build_from_source(source)?;

    let region = region("chr1", 0, 10000)?;

    let mut a = adapter.features(&region, Options::default());
    assert!(futures::poll!(a.next()).is_pending());

    let (abort_handle, abort_registration) = AbortHandle::new_pair();
    abort_handle.abort();

    let mut b = adapter.features(
        &region,
        Options::default().set_abort_registration(abort_registration),
    );

    // Only the joining caller gives up; the shared fetch continues.
    assert!(matches!(b.next().await, Some(Err(Error::Aborted))));

    let mut n = 0;

    while let Some(feature) = a.try_next().await? {
        assert_eq!(feature.region().assembly_name(), Some("A"));
        n += 1;
    }

    assert_eq!(n, 3);
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn test_features_with_abandoned_fetch() -> Result<(), Box<dyn std::error::Error>> {
    let source = TestSource::new(build_body())
        .with_behaviors(vec![Behavior::Pending, Behavior::Yield]);
    let fetches = source.fetches();
    let adapter = builder().build_from_source(source)?;

    let region = region("chr1", 0, 10000)?;

    let mut a = adapter.features(&region, Options::default());
    assert!(futures::poll!(a.next()).is_pending());
    drop(a);

    // The next caller starts a new fetch rather than waiting on the dropped one.
    let mut b = adapter.features(&region, Options::default());
    let mut c = adapter.features(&region, Options::default());
    assert!(futures::poll!(b.next()).is_pending());
    assert!(futures::poll!(c.next()).is_pending());
    drop(b);

    // A remaining waiter keeps the fetch alive.
    let mut n = 0;

    while c.try_next().await?.is_some() {
        n += 1;
    }

    assert_eq!(n, 3);
    assert_eq!(fetches.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn test_features_with_abandoned_fetches_across_regions()
-> Result<(), Box<dyn std::error::Error>> {
    let source = TestSource::new(build_body()).with_behaviors(vec![Behavior::Pending; 8]);
    let fetches = source.fetches();
    let adapter = builder().build_from_source(source)?;

    for i in 0..8 {
        let region = region("chr1", i * 100, i * 100 + 50)?;
        let mut features = adapter.features(&region, Options::default());
        assert!(futures::poll!(features.next()).is_pending());
    }

    // Each abandoned region is fetched anew.
    for i in 0..8 {
        let region = region("chr1", i * 100, i * 100 + 50)?;
        let features = collect(&adapter, &region).await?;
        assert_eq!(features.len(), 3);
    }

    assert_eq!(fetches.load(Ordering::SeqCst), 16);

    Ok(())
}

#[tokio::test]
async fn test_drop_releases_source() -> Result<(), Box<dyn std::error::Error>> {
    let source = TestSource::new(build_body()).with_behaviors(vec![Behavior::Pending]);
    let fetches = source.fetches();
    let adapter = builder().build_from_source(source)?;

    let mut features = adapter.features(&region("chr1", 0, 10000)?, Options::default());
    assert!(futures::poll!(features.next()).is_pending());

    drop(adapter);
    assert_eq!(Arc::strong_count(&fetches), 2);

    drop(features);
    assert_eq!(Arc::strong_count(&fetches), 1);

    Ok(())
}

#[tokio::test]
async fn test_release() -> Result<(), Box<dyn std::error::Error>> {
    let source = TestSource::new(build_body());
    let fetches = source.fetches();
    let adapter = builder().build_from_source(source)?;

    let a = region("chr1", 0, 10000)?;
    let b = region("chr2", 0, 10000)?;

    collect(&adapter, &a).await?;
    collect(&adapter, &b).await?;
    assert_eq!(fetches.load(Ordering::SeqCst), 2);

    adapter.release(&a);
    collect(&adapter, &a).await?;
    collect(&adapter, &b).await?;
    assert_eq!(fetches.load(Ordering::SeqCst), 3);

    adapter.release_all();
    collect(&adapter, &a).await?;
    collect(&adapter, &b).await?;
    assert_eq!(fetches.load(Ordering::SeqCst), 5);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_refresh_interval() -> Result<(), Box<dyn std::error::Error>> {
    let source = TestSource::new(build_body());
    let fetches = source.fetches();
    let adapter = builder()
        .set_refresh_interval(Duration::from_millis(500))
        .build_from_source(source)?;

    let region = region("chr1", 0, 10000)?;

    collect(&adapter, &region).await?;
    collect(&adapter, &region).await?;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(600)).await;
    collect(&adapter, &region).await?;
    assert_eq!(fetches.load(Ordering::SeqCst), 2);

    // Releasing everything stops the periodic clearing.
    adapter.release_all();
    collect(&adapter, &region).await?;
    assert_eq!(fetches.load(Ordering::SeqCst), 3);

    tokio::time::sleep(Duration::from_millis(1200)).await;
    collect(&adapter, &region).await?;
    assert_eq!(fetches.load(Ordering::SeqCst), 3);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_refresh_interval_during_fetch() -> Result<(), Box<dyn std::error::Error>> {
    let source = TestSource::new(build_body())
        .with_behaviors(vec![Behavior::Sleep(Duration::from_millis(300))]);
    let fetches = source.fetches();
    let adapter = builder()
        .set_refresh_interval(Duration::from_millis(500))
        .build_from_source(source)?;

    let region = region("chr1", 0, 10000)?;

    // The fetch runs from 400 ms to 700 ms, across the clear at 500 ms.
    tokio::time::sleep(Duration::from_millis(400)).await;
    let features = collect(&adapter, &region).await?;
    assert_eq!(features.len(), 3);

    let features = collect(&adapter, &region).await?;
    assert_eq!(features.len(), 3);
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn test_ref_names() -> Result<(), Box<dyn std::error::Error>> {
    let adapter = builder().build_from_source(TestSource::new(build_body()))?;
    assert!(adapter.ref_names().is_empty());
    assert!(adapter.has_data_for_ref_name("chr1"));
    Ok(())
}

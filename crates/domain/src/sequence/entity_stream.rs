use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio_stream::{Stream, StreamExt};

use crate::errors::CatalogResult;

type DynStream<T> = Pin<Box<dyn Stream<Item = CatalogResult<T>> + Send + 'static>>;
type ScanFuture<T> = Pin<Box<dyn Future<Output = CatalogResult<Vec<T>>> + Send + 'static>>;

/// A finite, asynchronous sequence of catalog values.
///
/// Backed either by an already-materialized buffer or by a boxed stream
/// that produces values on demand. Store scans use [`EntityStream::deferred`]
/// so nothing is read until the stream is first polled.
pub struct EntityStream<T> {
    buffer: VecDeque<CatalogResult<T>>,
    stream: Option<DynStream<T>>,
}

impl<T> EntityStream<T> {
    /// An empty stream.
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::new(),
            stream: None,
        }
    }

    /// A stream over an already-materialized collection.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            buffer: items.into_iter().map(Ok).collect(),
            stream: None,
        }
    }

    /// Wrap an arbitrary async stream of results.
    pub fn from_stream(stream: impl Stream<Item = CatalogResult<T>> + Send + 'static) -> Self {
        Self {
            buffer: VecDeque::new(),
            stream: Some(Box::pin(stream)),
        }
    }
}

impl<T: Send + Unpin + 'static> EntityStream<T> {
    /// A stream that pulls items out of an iterator one poll at a time.
    pub fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = CatalogResult<T>>,
        I::IntoIter: Send + Unpin + 'static,
    {
        Self::from_stream(Iter {
            inner: iter.into_iter(),
        })
    }

    /// A stream whose underlying scan runs only once the stream is polled.
    ///
    /// This is how store listings stay lazy: building the stream is free,
    /// and each new stream re-issues the scan, which makes `list*` calls
    /// restartable.
    pub fn deferred<F>(scan: F) -> Self
    where
        F: Future<Output = CatalogResult<Vec<T>>> + Send + 'static,
    {
        Self::from_stream(DeferredScan {
            scan: Some(Box::pin(scan)),
            items: VecDeque::new(),
        })
    }

    /// Next value in the stream, `None` once exhausted.
    pub async fn next(&mut self) -> Option<CatalogResult<T>> {
        StreamExt::next(self).await
    }

    /// Drain the stream into a `Vec`, failing on the first stored error.
    pub async fn collect(mut self) -> CatalogResult<Vec<T>> {
        let mut out = Vec::with_capacity(self.buffer.len());
        while let Some(res) = self.next().await {
            out.push(res?);
        }
        Ok(out)
    }

    /// Number of values in the stream.
    pub async fn count(mut self) -> CatalogResult<usize> {
        let mut n = 0;
        while let Some(res) = self.next().await {
            res?;
            n += 1;
        }
        Ok(n)
    }

    /// Keep only values matching the predicate. Errors pass through so the
    /// consumer still observes store failures.
    pub fn filter<F>(self, mut predicate: F) -> EntityStream<T>
    where
        F: FnMut(&T) -> bool + Send + 'static,
    {
        Self::from_stream(StreamExt::filter(self, move |res| match res {
            Ok(item) => predicate(item),
            Err(_) => true,
        }))
    }

    /// Transform each value, leaving errors untouched.
    pub fn map<U, F>(self, mut f: F) -> EntityStream<U>
    where
        U: Send + Unpin + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        EntityStream::from_stream(StreamExt::map(self, move |res| res.map(&mut f)))
    }
}

impl<T> Default for EntityStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Unpin> Stream for EntityStream<T> {
    type Item = CatalogResult<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if let Some(item) = this.buffer.pop_front() {
            return Poll::Ready(Some(item));
        }
        match this.stream.as_mut() {
            Some(stream) => stream.as_mut().poll_next(cx),
            None => Poll::Ready(None),
        }
    }
}

struct Iter<I> {
    inner: I,
}

impl<T, I> Stream for Iter<I>
where
    I: Iterator<Item = CatalogResult<T>> + Unpin,
{
    type Item = CatalogResult<T>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.get_mut().inner.next())
    }
}

/// Runs the scan future on first poll, then drains the returned rows.
struct DeferredScan<T> {
    scan: Option<ScanFuture<T>>,
    items: VecDeque<T>,
}

impl<T: Unpin> Stream for DeferredScan<T> {
    type Item = CatalogResult<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if let Some(scan) = this.scan.as_mut() {
            match scan.as_mut().poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Ok(rows)) => {
                    this.items = rows.into();
                    this.scan = None;
                }
                Poll::Ready(Err(e)) => {
                    this.scan = None;
                    return Poll::Ready(Some(Err(e)));
                }
            }
        }
        Poll::Ready(this.items.pop_front().map(Ok))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CatalogError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_from_vec_collects_in_order() {
        let stream = EntityStream::from_vec(vec![1, 2, 3]);
        assert_eq!(stream.collect().await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_stream_is_exhausted() {
        let mut stream: EntityStream<i32> = EntityStream::new();
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_deferred_scan_runs_only_when_polled() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let mut stream = EntityStream::deferred(async move {
            flag.store(true, Ordering::SeqCst);
            Ok(vec![10, 20])
        });

        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(stream.next().await.unwrap().unwrap(), 10);
        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(stream.next().await.unwrap().unwrap(), 20);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_deferred_scan_failure_surfaces_once() {
        let mut stream: EntityStream<i32> =
            EntityStream::deferred(async { Err(CatalogError::storage("scan failed")) });
        assert_eq!(
            stream.next().await.unwrap(),
            Err(CatalogError::Storage("scan failed".to_string()))
        );
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_filter_keeps_errors_visible() {
        let stream = EntityStream::from_iter(vec![
            Ok(1),
            Err(CatalogError::storage("boom")),
            Ok(2),
        ]);
        let res = stream.filter(|n| *n > 1).collect().await;
        assert_eq!(res, Err(CatalogError::Storage("boom".to_string())));
    }

    #[tokio::test]
    async fn test_filter_and_map_compose() {
        let stream = EntityStream::from_vec(vec![1, 2, 3, 4]);
        let doubled_evens = stream.filter(|n| n % 2 == 0).map(|n| n * 2);
        assert_eq!(doubled_evens.collect().await.unwrap(), vec![4, 8]);
    }

    #[tokio::test]
    async fn test_from_iter_is_pulled_on_demand() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulled);
        let mut items = (1..=5).map(Ok);
        let mut stream = EntityStream::from_iter(std::iter::from_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            items.next()
        }));

        assert_eq!(pulled.load(Ordering::SeqCst), 0);
        stream.next().await;
        stream.next().await;
        assert_eq!(pulled.load(Ordering::SeqCst), 2);
    }
}

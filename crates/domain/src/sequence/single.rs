use crate::errors::{CatalogError, CatalogResult};

use super::EntityStream;

/// Narrow a sequence to exactly one value.
///
/// Zero values or more than one value both fail with the caller-supplied
/// error kind; this is the single choke point every "fetch exactly one"
/// path in the catalog goes through, so not-found semantics stay uniform.
///
/// Consumes at most two elements from the stream, so a lazy source is never
/// evaluated further than needed to decide. Store errors coming out of the
/// stream itself take precedence over the supplied kind.
pub async fn single_or<T>(mut stream: EntityStream<T>, missing: CatalogError) -> CatalogResult<T>
where
    T: Send + Unpin + 'static,
{
    let first = match stream.next().await {
        None => return Err(missing),
        Some(Err(e)) => return Err(e),
        Some(Ok(value)) => value,
    };
    match stream.next().await {
        None => Ok(first),
        Some(Err(e)) => Err(e),
        Some(Ok(_)) => Err(missing),
    }
}

/// Filter first, then apply the same exactly-one rule.
pub async fn single_match_or<T, F>(
    stream: EntityStream<T>,
    predicate: F,
    missing: CatalogError,
) -> CatalogResult<T>
where
    T: Send + Unpin + 'static,
    F: FnMut(&T) -> bool + Send + 'static,
{
    single_or(stream.filter(predicate), missing).await
}

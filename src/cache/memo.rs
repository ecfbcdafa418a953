//! Memoization Module
//!
//! Wraps an arbitrary async producer function and a key-derivation rule
//! into a cache-backed version of that function.

use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use crate::cache::Cache;
use crate::error::FetchError;

// == Memoized ==
/// A cache-backed version of a producer function.
///
/// Each call derives a cache key from the argument and routes through
/// [`Cache::get_or_fetch`]: the underlying producer runs only when the
/// derived key misses. The same compute-once, reuse-many contract applies,
/// including the absence of single-flight deduplication.
pub struct Memoized<A, V, K, F> {
    cache: Cache<V>,
    key_fn: K,
    producer: F,
    ttl: Option<Duration>,
    _arg: PhantomData<fn(A)>,
}

impl<A, V, K, F, Fut, E> Memoized<A, V, K, F>
where
    V: Clone + Send + Sync + 'static,
    K: Fn(&A) -> String,
    F: Fn(A) -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    // == Constructor ==
    /// Wraps `producer` so its results are cached under keys derived by
    /// `key_fn`, with `ttl` applied to every stored result.
    pub fn new(cache: Cache<V>, key_fn: K, producer: F, ttl: Option<Duration>) -> Self {
        Self {
            cache,
            key_fn,
            producer,
            ttl,
            _arg: PhantomData,
        }
    }

    // == Call ==
    /// Invokes the cache-backed function.
    pub async fn call(&self, arg: A) -> Result<V, FetchError<E>> {
        let key = (self.key_fn)(&arg);
        self.cache
            .get_or_fetch(&key, || (self.producer)(arg), self.ttl)
            .await
    }
}

//! Query and mutation descriptors.
//!
//! # Design
//! A descriptor pairs a caller-supplied key with a fetch function and does
//! nothing else: no I/O at construction, no caching, no retries. The function
//! is stored as given and `call` returns its future untouched, so whatever
//! runtime consumes the descriptor sees exactly the errors the transport
//! produced. `Query` and `Mutation` differ only in how a runtime is expected
//! to treat them.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use futures::future::BoxFuture;
use serde::Serialize;

use crate::error::ApiError;
use crate::key::QueryKey;

/// Type-erased fetch function, used where descriptors are stored in structs.
pub type BoxFetch<P, R> = Box<dyn Fn(P) -> BoxFuture<'static, Result<R, ApiError>> + Send + Sync>;

pub type QueryFetcher<F> = Descriptor<Query, F>;
pub type MutationFetcher<F> = Descriptor<Mutation, F>;

/// Boxed query descriptor taking `P` and resolving to `R`.
pub type BoxedQuery<P, R> = QueryFetcher<BoxFetch<P, R>>;
/// Boxed mutation descriptor taking `P` and resolving to `R`.
pub type BoxedMutation<P, R> = MutationFetcher<BoxFetch<P, R>>;

pub trait Kind {
    const NAME: &'static str;
    /// Whether a runtime may cache results under the descriptor's key.
    const CACHEABLE: bool;
}

/// Read operation. Safe to repeat and to run concurrently.
#[derive(Debug, Clone, Copy)]
pub struct Query;

/// Write operation. Runs only on explicit trigger.
#[derive(Debug, Clone, Copy)]
pub struct Mutation;

impl Kind for Query {
    const NAME: &'static str = "query";
    const CACHEABLE: bool = true;
}

impl Kind for Mutation {
    const NAME: &'static str = "mutation";
    const CACHEABLE: bool = false;
}

pub struct Descriptor<K, F> {
    query_key: String,
    fetch: F,
    invalidates: Vec<String>,
    kind: PhantomData<K>,
}

/// Wrap a read operation.
pub fn to_query_fetcher<F>(query_key: &str, fetch: F) -> QueryFetcher<F> {
    Descriptor::new(query_key, fetch)
}

/// Wrap a write operation.
pub fn to_mutation_fetcher<F>(query_key: &str, fetch: F) -> MutationFetcher<F> {
    Descriptor::new(query_key, fetch)
}

impl<K: Kind, F> Descriptor<K, F> {
    fn new(query_key: &str, fetch: F) -> Self {
        Self {
            query_key: query_key.to_string(),
            fetch,
            invalidates: Vec::new(),
            kind: PhantomData,
        }
    }

    pub fn query_key(&self) -> &str {
        &self.query_key
    }

    pub fn fetch_fn(&self) -> &F {
        &self.fetch
    }

    pub fn kind(&self) -> &'static str {
        K::NAME
    }

    pub fn is_cacheable(&self) -> bool {
        K::CACHEABLE
    }

    /// Invoke the wrapped function.
    pub fn call<P, Fut>(&self, params: P) -> Fut
    where
        F: Fn(P) -> Fut,
        Fut: Future,
    {
        (self.fetch)(params)
    }

    /// Structured cache key for a call with `params`.
    pub fn key_for<P: Serialize + ?Sized>(&self, params: &P) -> Result<QueryKey, ApiError> {
        QueryKey::for_params(&self.query_key, params)
    }
}

impl<F> Descriptor<Mutation, F> {
    /// Record query keys a runtime should refetch after this succeeds.
    pub fn invalidates(mut self, query_keys: &[&str]) -> Self {
        self.invalidates = query_keys.iter().map(|key| key.to_string()).collect();
        self
    }

    pub fn invalidated_keys(&self) -> &[String] {
        &self.invalidates
    }
}

impl<K: Kind, F> fmt::Debug for Descriptor<K, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("kind", &K::NAME)
            .field("query_key", &self.query_key)
            .field("invalidates", &self.invalidates)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{ready, FutureExt, Ready};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn double(n: u32) -> Ready<Result<u32, ApiError>> {
        ready(Ok(n * 2))
    }

    #[test]
    fn factory_preserves_key_and_function() {
        let f: fn(u32) -> Ready<Result<u32, ApiError>> = double;
        let fetcher = to_query_fetcher("doubleApi", f);
        assert_eq!(fetcher.query_key(), "doubleApi");
        assert_eq!(*fetcher.fetch_fn() as usize, f as usize);
    }

    #[test]
    fn factory_does_not_invoke_the_function() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let _fetcher = to_query_fetcher("countApi", move |_: ()| {
            counter.fetch_add(1, Ordering::SeqCst);
            ready(Ok::<_, ApiError>(()))
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn each_call_runs_the_function_again() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let fetcher = to_query_fetcher("countApi", move |n: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
            ready(Ok::<_, ApiError>(n))
        });
        assert_eq!(fetcher.call(7).await.unwrap(), 7);
        assert_eq!(fetcher.call(7).await.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn mutation_rejection_is_unmodified() {
        let fetcher = to_mutation_fetcher("createProductApi", |_: ()| {
            ready(Err::<(), _>(ApiError::Transport {
                status: 422,
                body: None,
                raw: "name is required".to_string(),
            }))
        });
        let err = fetcher.call(()).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Transport { status: 422, ref raw, .. } if raw == "name is required"
        ));
    }

    #[tokio::test]
    async fn boxed_descriptors_call_through() {
        let fetch: BoxFetch<u32, u32> = Box::new(|n: u32| async move { Ok::<_, ApiError>(n + 1) }.boxed());
        let fetcher: BoxedQuery<u32, u32> = to_query_fetcher("incApi", fetch);
        assert_eq!(fetcher.call(1).await.unwrap(), 2);
    }

    #[test]
    fn kinds_differ_only_in_cacheability() {
        let query = to_query_fetcher("q", double);
        let mutation = to_mutation_fetcher("m", double).invalidates(&["q"]);
        assert!(query.is_cacheable());
        assert!(!mutation.is_cacheable());
        assert_eq!(query.kind(), "query");
        assert_eq!(mutation.kind(), "mutation");
        assert_eq!(mutation.invalidated_keys(), &["q".to_string()]);
    }

    #[test]
    fn key_for_uses_descriptor_key_as_operation() {
        let fetcher = to_query_fetcher("getBrandApi", double);
        let key = fetcher.key_for("b-1").unwrap();
        assert_eq!(key.operation(), "getBrandApi");
        assert_eq!(key.to_string(), r#"getBrandApi{"value":"b-1"}"#);
    }
}

use std::future::Future;
use std::sync::Arc;

use citespine_core::errors::BackendError;

use super::http::HttpTransport;
use super::loopback::LoopbackTransport;
use super::protocol::{QueryRequest, QueryResponse, StatsRequest, StatsResponse, UpsertRequest, UpsertResponse};

/// Request/response channel to a hosted index. One call, one attempt.
pub trait IRemoteTransport: Send + Sync {
    fn upsert(
        &self,
        request: &UpsertRequest,
    ) -> impl Future<Output = Result<UpsertResponse, BackendError>> + Send;

    fn query(
        &self,
        request: &QueryRequest,
    ) -> impl Future<Output = Result<QueryResponse, BackendError>> + Send;

    fn stats(
        &self,
        request: &StatsRequest,
    ) -> impl Future<Output = Result<StatsResponse, BackendError>> + Send;
}

/// Transport chosen at runtime from configuration.
pub enum RemoteTransport {
    Http(HttpTransport),
    Loopback(Arc<LoopbackTransport>),
}

impl IRemoteTransport for RemoteTransport {
    async fn upsert(&self, request: &UpsertRequest) -> Result<UpsertResponse, BackendError> {
        match self {
            RemoteTransport::Http(t) => t.upsert(request).await,
            RemoteTransport::Loopback(t) => t.upsert(request).await,
        }
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, BackendError> {
        match self {
            RemoteTransport::Http(t) => t.query(request).await,
            RemoteTransport::Loopback(t) => t.query(request).await,
        }
    }

    async fn stats(&self, request: &StatsRequest) -> Result<StatsResponse, BackendError> {
        match self {
            RemoteTransport::Http(t) => t.stats(request).await,
            RemoteTransport::Loopback(t) => t.stats(request).await,
        }
    }
}

impl<T: IRemoteTransport> IRemoteTransport for Arc<T> {
    fn upsert(
        &self,
        request: &UpsertRequest,
    ) -> impl Future<Output = Result<UpsertResponse, BackendError>> + Send {
        (**self).upsert(request)
    }

    fn query(
        &self,
        request: &QueryRequest,
    ) -> impl Future<Output = Result<QueryResponse, BackendError>> + Send {
        (**self).query(request)
    }

    fn stats(
        &self,
        request: &StatsRequest,
    ) -> impl Future<Output = Result<StatsResponse, BackendError>> + Send {
        (**self).stats(request)
    }
}

use crate::abort::AbortSignal;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Executes a query against the remote document store.
///
/// Implementations must stop as soon as `signal` fires and report
/// [`crate::error::WorksError::Aborted`] rather than a network error.
#[async_trait]
pub trait ContentStorePort: Send + Sync {
    async fn fetch(&self, query: &str, params: &[(String, Value)], signal: &AbortSignal) -> Result<Value>;
}

/// Session-scoped string key-value storage. Writes may fail (quota, disk);
/// callers treat the store as advisory.
pub trait SessionStorePort: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str);
}

/// The page's navigable address. Updates replace the current entry.
pub trait AddressPort: Send + Sync {
    fn query_param(&self, name: &str) -> Option<String>;
    fn replace_query_param(&self, name: &str, value: Option<&str>);
    fn href(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

/// Platform share sheet, when the host has one.
#[async_trait]
pub trait NativeSharePort: Send + Sync {
    fn is_available(&self) -> bool;
    async fn share(&self, payload: &SharePayload) -> Result<()>;
}

#[async_trait]
pub trait ClipboardPort: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

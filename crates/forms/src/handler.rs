//! Persistence callbacks injected into pages.

use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// A business rule refused the save; the message is meant for the user.
    #[error("{0}")]
    Rejected(String),

    #[error("record not found")]
    NotFound,

    #[error("storage failure: {0}")]
    Storage(String),
}

impl HandlerError {
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Message safe to show to the user, if any.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Rejected(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Save/delete for single master records.
#[async_trait::async_trait]
pub trait RecordHandler<R>: Send + Sync
where
    R: Send + Sync + 'static,
{
    /// Store `record` (insert when new, update otherwise) and return the stored copy.
    async fn save(&self, record: R) -> Result<R, HandlerError>;

    async fn delete(&self, record: &R) -> Result<(), HandlerError>;
}

#[async_trait::async_trait]
impl<R, T> RecordHandler<R> for Arc<T>
where
    R: Send + Sync + 'static,
    T: RecordHandler<R> + ?Sized,
{
    async fn save(&self, record: R) -> Result<R, HandlerError> {
        (**self).save(record).await
    }

    async fn delete(&self, record: &R) -> Result<(), HandlerError> {
        (**self).delete(record).await
    }
}

/// Save/delete for header + line-item documents.
#[async_trait::async_trait]
pub trait TransactionHandler<H, L>: Send + Sync
where
    H: Default + Send + Sync + 'static,
    L: Send + Sync + 'static,
{
    /// Header for a new document; documents that number themselves override this.
    async fn new_header(&self) -> Result<H, HandlerError> {
        Ok(H::default())
    }

    async fn lines(&self, header: &H) -> Result<Vec<L>, HandlerError>;

    async fn save(&self, header: H, lines: Vec<L>) -> Result<H, HandlerError>;

    async fn delete(&self, header: &H) -> Result<(), HandlerError>;
}

#[async_trait::async_trait]
impl<H, L, T> TransactionHandler<H, L> for Arc<T>
where
    H: Default + Send + Sync + 'static,
    L: Send + Sync + 'static,
    T: TransactionHandler<H, L> + ?Sized,
{
    async fn new_header(&self) -> Result<H, HandlerError> {
        (**self).new_header().await
    }

    async fn lines(&self, header: &H) -> Result<Vec<L>, HandlerError> {
        (**self).lines(header).await
    }

    async fn save(&self, header: H, lines: Vec<L>) -> Result<H, HandlerError> {
        (**self).save(header, lines).await
    }

    async fn delete(&self, header: &H) -> Result<(), HandlerError> {
        (**self).delete(header).await
    }
}

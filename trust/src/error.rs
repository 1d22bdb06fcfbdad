use thiserror::Error;

use att_store::StoreError;

#[derive(Debug, Error)]
pub enum TrustError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

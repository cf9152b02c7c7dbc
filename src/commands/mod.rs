//! Page-facing operations organized by domain.
//!
//! Each submodule adds the operations for one host feature to `Bridge`.
//! `spawn_sync` runs a sync without awaiting it, the way the page fires
//! `my.syncTradePay()` and moves on.

pub mod auth_code;
pub mod trade_pay;
pub mod user_consent;

use serde::{Deserialize, Serialize};
use specta::Type;
use tokio::task::JoinHandle;

use crate::api::types::{OperationKey, Outcome};
use crate::runtime::bridge::Bridge;

/// A sync operation that pulls a result from the host into the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "camelCase")]
pub enum SyncOperation {
    AuthCode,
    TradePay,
    UserConsent,
}

impl SyncOperation {
    /// The registry key this sync dispatches to.
    pub fn key(&self) -> OperationKey {
        match self {
            SyncOperation::AuthCode => OperationKey::SyncAuthCodeData,
            SyncOperation::TradePay => OperationKey::SyncTradePayData,
            SyncOperation::UserConsent => OperationKey::SyncUserConsentData,
        }
    }
}

impl Bridge {
    /// Run a sync operation to completion.
    pub async fn sync(&self, operation: SyncOperation) -> Outcome {
        match operation {
            SyncOperation::AuthCode => self.sync_auth_code().await,
            SyncOperation::TradePay => self.sync_trade_pay().await,
            SyncOperation::UserConsent => self.sync_user_consent().await,
        }
    }

    /// Start a sync operation on the current tokio runtime without awaiting it.
    ///
    /// Results reach the registered callbacks; the handle is only needed by
    /// callers that want to wait anyway.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn spawn_sync(&self, operation: SyncOperation) -> JoinHandle<Outcome> {
        let bridge = self.clone();
        log::debug!("Spawning sync: operation={operation:?}, key={}", operation.key());
        tokio::spawn(async move { bridge.sync(operation).await })
    }
}

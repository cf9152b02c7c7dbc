//! Auth code operations.
//!
//! `get_auth_code` sends client details to the host and reports to a one-shot
//! pair; `sync_auth_code` pulls the resulting code into the registry.

use crate::api::types::{OperationKey, Outcome, Payload};
use crate::runtime::bridge::Bridge;
use crate::runtime::registry::CallbackPair;

/// Field an auth code sync result must carry.
pub const AUTH_CODE_REQUIRED_FIELD: &str = "code";

impl Bridge {
    /// Ask the host for an auth code.
    ///
    /// # Arguments
    /// * `data` - Client details (e.g. `clientId`, `redirectUrl`) forwarded to `my.getAuthCode`
    /// * `callbacks` - Receives the host's response or the failure
    pub async fn get_auth_code(&self, data: Payload, callbacks: CallbackPair) -> Outcome {
        let handler = self.config().handlers.get_auth_code.clone();
        log::info!("get_auth_code: handler={handler}");
        self.request_then_invoke(&handler, Some(data), callbacks)
            .await
    }

    /// Pull the latest auth code and dispatch it to `syncAuthCodeData`.
    ///
    /// A result without a truthy `code` is delivered to the fail callbacks.
    pub async fn sync_auth_code(&self) -> Outcome {
        let handler = self.config().handlers.sync_auth_code.clone();
        log::info!("sync_auth_code: handler={handler}");
        self.request_then_dispatch(
            &handler,
            OperationKey::SyncAuthCodeData,
            None,
            Some(AUTH_CODE_REQUIRED_FIELD),
        )
        .await
    }
}

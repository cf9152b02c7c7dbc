//! Trade pay operations.
//!
//! `get_trade_pay` starts a payment and reports to a one-shot pair;
//! `sync_trade_pay` pulls the latest payment result into the registry.

use crate::api::types::{OperationKey, Outcome, Payload};
use crate::runtime::bridge::Bridge;
use crate::runtime::registry::CallbackPair;

/// Field a trade pay sync result must carry.
pub const TRADE_PAY_REQUIRED_FIELD: &str = "auxNo";

impl Bridge {
    /// Start a trade payment on the host.
    ///
    /// # Arguments
    /// * `data` - Payment request forwarded to `my.getTradePay`
    /// * `callbacks` - Receives the host's response or the failure
    pub async fn get_trade_pay(&self, data: Payload, callbacks: CallbackPair) -> Outcome {
        let handler = self.config().handlers.get_trade_pay.clone();
        log::info!("get_trade_pay: handler={handler}");
        self.request_then_invoke(&handler, Some(data), callbacks)
            .await
    }

    /// Pull the latest trade pay result and dispatch it to `syncTradePayData`.
    ///
    /// A result without a truthy `auxNo` is delivered to the fail callbacks.
    pub async fn sync_trade_pay(&self) -> Outcome {
        let handler = self.config().handlers.sync_trade_pay.clone();
        log::info!("sync_trade_pay: handler={handler}");
        self.request_then_dispatch(
            &handler,
            OperationKey::SyncTradePayData,
            None,
            Some(TRADE_PAY_REQUIRED_FIELD),
        )
        .await
    }
}

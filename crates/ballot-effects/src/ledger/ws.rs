//! WebSocket JSON-RPC handler for the ledger program.
//!
//! One persistent connection, lazily established and re-established after
//! transport errors. Calls are serialized over the connection; responses
//! are matched by request id, and stale ids from abandoned calls are
//! skipped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use ballot_core::effects::{LedgerEffects, LedgerError};
use ballot_core::identity::Signer;
use ballot_core::{Address, OptionId, PollId, RecordIdentity, SharedRecord, TxRef};

use super::envelope::CallEnvelope;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    id: u64,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Production [`LedgerEffects`] handler over a signed WebSocket RPC.
pub struct WsLedger {
    url: String,
    signer: Arc<dyn Signer>,
    conn: Mutex<Option<WsStream>>,
    next_id: AtomicU64,
}

impl WsLedger {
    /// Create a handler bound to a caller identity. No connection is opened
    /// until the first call.
    pub fn new(url: impl Into<String>, signer: Arc<dyn Signer>) -> Self {
        Self {
            url: url.into(),
            signer,
            conn: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    async fn call(
        &self,
        method: &str,
        params: Value,
        co_signer: Option<&dyn Signer>,
    ) -> Result<Value, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut envelope = CallEnvelope::new(id, method, params);
        envelope.sign_with(self.signer.as_ref());
        if let Some(extra) = co_signer {
            envelope.sign_with(extra);
        }
        let frame = serde_json::to_string(&envelope)
            .map_err(|e| LedgerError::Protocol(format!("encode request: {e}")))?;

        let mut guard = self.conn.lock().await;
        if guard.is_none() {
            tracing::debug!(url = %self.url, "connecting to ledger");
            let (stream, _) = connect_async(self.url.as_str())
                .await
                .map_err(|e| LedgerError::Unreachable(e.to_string()))?;
            *guard = Some(stream);
        }
        let Some(stream) = guard.as_mut() else {
            return Err(LedgerError::Unreachable("no connection".to_string()));
        };

        if let Err(e) = stream.send(Message::Text(frame)).await {
            *guard = None;
            return Err(LedgerError::Unreachable(e.to_string()));
        }

        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    let response: RpcResponse = serde_json::from_str(&text)
                        .map_err(|e| LedgerError::Protocol(format!("decode response: {e}")))?;
                    if response.id != id {
                        // Response to an earlier, abandoned request.
                        tracing::debug!(got = response.id, want = id, "skipping stale response");
                        continue;
                    }
                    return match (response.result, response.error) {
                        (_, Some(message)) => Err(LedgerError::Rejected(message)),
                        (Some(result), None) => Ok(result),
                        (None, None) => Err(LedgerError::Protocol(
                            "response carries neither result nor error".to_string(),
                        )),
                    };
                }
                Some(Ok(Message::Close(_))) | None => {
                    *guard = None;
                    return Err(LedgerError::Unreachable("connection closed".to_string()));
                }
                // Control frames; tungstenite answers pings itself.
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    *guard = None;
                    return Err(LedgerError::Unreachable(e.to_string()));
                }
            }
        }
    }

    fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, LedgerError> {
        serde_json::from_value(value)
            .map_err(|e| LedgerError::Protocol(format!("undecodable result: {e}")))
    }
}

#[async_trait]
impl LedgerEffects for WsLedger {
    async fn account_exists(&self, address: &Address) -> Result<bool, LedgerError> {
        let result = self
            .call("account_exists", json!({ "address": address }), None)
            .await?;
        Self::decode(result)
    }

    async fn initialize_record(&self, record: &RecordIdentity) -> Result<TxRef, LedgerError> {
        let params = json!({
            "address": record.address(),
            "owner": self.signer.address(),
        });
        let result = self
            .call("initialize_record", params, Some(record as &dyn Signer))
            .await?;
        Self::decode(result)
    }

    async fn fetch_record(&self, address: &Address) -> Result<SharedRecord, LedgerError> {
        let result = self
            .call("fetch_record", json!({ "address": address }), None)
            .await?;
        Self::decode(result)
    }

    async fn create_poll(
        &self,
        address: &Address,
        title: &str,
        options: &[String],
    ) -> Result<TxRef, LedgerError> {
        let params = json!({
            "address": address,
            "author": self.signer.address(),
            "title": title,
            "options": options,
        });
        let result = self.call("create_poll", params, None).await?;
        Self::decode(result)
    }

    async fn vote(
        &self,
        address: &Address,
        poll_id: PollId,
        option: OptionId,
    ) -> Result<TxRef, LedgerError> {
        let params = json!({
            "address": address,
            "voter": self.signer.address(),
            "poll_id": poll_id,
            "option": option,
        });
        let result = self.call("vote", params, None).await?;
        Self::decode(result)
    }

    async fn balance(&self) -> Result<u64, LedgerError> {
        let result = self
            .call("balance", json!({ "address": self.signer.address() }), None)
            .await?;
        Self::decode(result)
    }

    async fn request_top_up(&self, amount: u64) -> Result<TxRef, LedgerError> {
        let params = json!({
            "address": self.signer.address(),
            "amount": amount,
        });
        let result = self.call("request_top_up", params, None).await?;
        Self::decode(result)
    }
}

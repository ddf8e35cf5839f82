//! Error types for the dApp client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cryptodevs_types::{Action, ButtonState};
use std::fmt;

/// dApp client error type.
#[derive(Debug)]
pub enum Error {
    /// Configuration error.
    Config(String),
    /// Wallet is connected to the wrong chain. Raised before any contract call.
    NetworkMismatch { expected: u64, actual: u64 },
    /// Transport or JSON-RPC failure talking to the wallet provider.
    Rpc(String),
    /// The wallet refused or could not serve the request (user rejection, no account).
    Wallet(String),
    /// Contract returned data that does not decode to the expected type.
    Abi(String),
    /// Transaction was mined with a failure status.
    Reverted { tx_hash: String },
    /// The rendered control does not offer this action.
    ActionUnavailable { action: Action, button: ButtonState },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::NetworkMismatch { expected, actual } => {
                write!(f, "network mismatch: expected chain {expected}, wallet is on {actual}")
            }
            Error::Rpc(msg) => write!(f, "rpc error: {msg}"),
            Error::Wallet(msg) => write!(f, "wallet error: {msg}"),
            Error::Abi(msg) => write!(f, "abi error: {msg}"),
            Error::Reverted { tx_hash } => write!(f, "transaction {tx_hash} reverted"),
            Error::ActionUnavailable { action, button } => {
                write!(f, "action {action:?} not available while showing {button:?}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::NetworkMismatch { .. } => StatusCode::PRECONDITION_FAILED,
            Error::Rpc(_) | Error::Wallet(_) | Error::Abi(_) => StatusCode::BAD_GATEWAY,
            Error::Reverted { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::ActionUnavailable { .. } => StatusCode::CONFLICT,
        };
        let body = serde_json::json!({
            "success": false,
            "error": self.to_string()
        });
        (status, Json(body)).into_response()
    }
}

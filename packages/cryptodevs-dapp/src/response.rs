//! Response types for the dApp API.

use cryptodevs_types::{Action, ButtonState};
use serde::Serialize;

use crate::alerts::Alert;
use crate::state::PageSnapshot;

pub const TITLE: &str = "Welcome to Crypto Devs!";
pub const TAGLINE: &str = "Its an NFT collection for developers in Crypto.";

/// Response from the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub wallet_url: String,
    pub contract: String,
    pub required_chain_id: u64,
    pub wallet_connected: bool,
    pub uptime_secs: u64,
    pub requests: u64,
}

/// The single control shown below the counter.
#[derive(Serialize)]
pub struct ButtonView {
    pub state: ButtonState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    /// `None` when the control is inert.
    pub action: Option<Action>,
}

impl From<ButtonState> for ButtonView {
    fn from(state: ButtonState) -> Self {
        Self {
            state,
            label: state.label(),
            description: state.description(),
            action: state.action(),
        }
    }
}

/// Rendered page view.
#[derive(Serialize)]
pub struct PageView {
    pub title: &'static str,
    pub tagline: &'static str,
    pub minted: String,
    pub button: ButtonView,
    pub state: PageSnapshot,
}

impl PageView {
    pub fn render(state: PageSnapshot, max_supply: u64) -> Self {
        Self {
            title: TITLE,
            tagline: TAGLINE,
            minted: format!("{}/{} have been minted", state.token_ids_minted, max_supply),
            button: state.button().into(),
            state,
        }
    }
}

/// Response from the action endpoints.
#[derive(Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub action: Action,
    pub accepted: bool,
}

impl ActionResponse {
    pub fn accepted(action: Action) -> Self {
        Self {
            success: true,
            action,
            accepted: true,
        }
    }
}

#[derive(Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<Alert>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_line() {
        let state = PageSnapshot {
            token_ids_minted: "7".into(),
            ..PageSnapshot::default()
        };
        let view = PageView::render(state, 20);
        assert_eq!(view.minted, "7/20 have been minted");
        assert_eq!(view.button.state, ButtonState::ConnectWallet);
        assert_eq!(view.button.action, Some(Action::Connect));
    }

    #[test]
    fn test_inert_button_serializes_null_action() {
        let state = PageSnapshot {
            connected: true,
            ..PageSnapshot::default()
        };
        let json = serde_json::to_value(PageView::render(state, 20)).unwrap();
        assert_eq!(json["button"]["state"], "presale_not_started");
        assert!(json["button"]["action"].is_null());
    }
}

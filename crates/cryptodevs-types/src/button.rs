//! Mint control selection.
//!
//! The rendered control has no state of its own: it is derived from the page
//! flags every time it is drawn.

use serde::Serialize;

/// Page flags the control depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonInputs {
    pub connected: bool,
    pub loading: bool,
    pub is_owner: bool,
    pub presale_started: bool,
    pub presale_ended: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonState {
    ConnectWallet,
    Loading,
    StartPresale,
    PresaleNotStarted,
    PresaleMint,
    PublicMint,
}

/// What clicking the rendered control does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Connect,
    StartPresale,
    PresaleMint,
    PublicMint,
}

/// Priority: not connected > loading > owner > not started > active > ended.
pub fn select_button(inputs: ButtonInputs) -> ButtonState {
    if !inputs.connected {
        return ButtonState::ConnectWallet;
    }
    if inputs.loading {
        return ButtonState::Loading;
    }
    if inputs.is_owner {
        return ButtonState::StartPresale;
    }
    if !inputs.presale_started {
        return ButtonState::PresaleNotStarted;
    }
    if !inputs.presale_ended {
        ButtonState::PresaleMint
    } else {
        ButtonState::PublicMint
    }
}

impl ButtonState {
    /// Button caption. `None` when only a description is shown.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::ConnectWallet => Some("Connect Wallet"),
            Self::Loading => Some("Loading..."),
            Self::StartPresale => Some("Start Presale"),
            Self::PresaleNotStarted => None,
            Self::PresaleMint => Some("Presale Mint 🚀"),
            Self::PublicMint => Some("Public Mint 🚀"),
        }
    }

    pub fn description(self) -> Option<&'static str> {
        match self {
            Self::PresaleNotStarted => Some("Presale hasn't started"),
            Self::PresaleMint => Some(
                "Presale has started!!! If your address is whitelisted, Mint a Crypto Dev 🥳",
            ),
            _ => None,
        }
    }

    /// `None` for controls that cannot be clicked.
    pub fn action(self) -> Option<Action> {
        match self {
            Self::ConnectWallet => Some(Action::Connect),
            Self::StartPresale => Some(Action::StartPresale),
            Self::PresaleMint => Some(Action::PresaleMint),
            Self::PublicMint => Some(Action::PublicMint),
            Self::Loading | Self::PresaleNotStarted => None,
        }
    }
}

//! Shared types and pure-logic utilities for the Crypto Devs mint dApp.
//! No chain or I/O dependency: everything here is a pure function of its inputs.

mod button;
mod interface;
mod presale;

pub use button::{Action, ButtonInputs, ButtonState, select_button};
pub use interface::ICryptoDevs;
pub use presale::{has_ended, unix_now};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cryptocurrency tag assigned to an address or transfer.
///
/// Only ETH, BTC and TRX have a data source behind them; the remaining
/// tags exist so address detection can still name the chain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eth,
    Btc,
    Trx,
    Ada,
    Atom,
    Xrp,
    Xlm,
    Unknown,
}

impl Currency {
    /// Uppercase ticker code used in logs, reports and wire payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eth => "ETH",
            Currency::Btc => "BTC",
            Currency::Trx => "TRX",
            Currency::Ada => "ADA",
            Currency::Atom => "ATOM",
            Currency::Xrp => "XRP",
            Currency::Xlm => "XLM",
            Currency::Unknown => "UNKNOWN",
        }
    }

    /// Whether transfers for this currency can be fetched and analyzed.
    pub fn is_supported(&self) -> bool {
        matches!(self, Currency::Eth | Currency::Btc | Currency::Trx)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

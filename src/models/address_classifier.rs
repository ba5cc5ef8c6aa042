use crate::models::Currency;

/// Address classifier for determining which chain an address belongs to
///
/// Classification is purely syntactic: prefix and length rules applied in a
/// fixed order, first match wins. The rules are heuristics, not checksum
/// validation; a string that merely looks like a Bitcoin address classifies
/// as BTC.
pub struct AddressClassifier;

impl AddressClassifier {
    /// Classify an address by its format. Case-insensitive, total: every
    /// input maps to some currency tag, unrecognized formats to UNKNOWN.
    ///
    /// Rule order matters. `1`/`3` prefixed Bitcoin addresses are claimed
    /// before the TRON rule, and the TRON rule additionally requires a
    /// length of exactly 34, so a short `t` address falls through to the
    /// later rules.
    pub fn classify(address: &str) -> Currency {
        let normalized = address.trim().to_lowercase();

        if normalized.starts_with("0x") {
            Currency::Eth
        } else if normalized.starts_with("bc1")
            || normalized.starts_with('1')
            || normalized.starts_with('3')
        {
            Currency::Btc
        } else if normalized.starts_with('t') && normalized.len() == 34 {
            Currency::Trx
        } else if normalized.starts_with("addr") {
            Currency::Ada
        } else if normalized.starts_with("cosmos") {
            Currency::Atom
        } else if normalized.starts_with('r') {
            Currency::Xrp
        } else if normalized.starts_with('g') {
            Currency::Xlm
        } else {
            Currency::Unknown
        }
    }

    /// Whether the address classifies as a currency with a transfer source.
    pub fn is_fully_supported(address: &str) -> bool {
        Self::classify(address).is_supported()
    }
}

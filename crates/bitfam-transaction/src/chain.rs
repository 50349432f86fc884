//! Chain flavor a transaction is built for.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The Bitcoin-family network a transaction targets.
///
/// The flavor decides whether witness data can appear on the wire and
/// which signature hash algorithm each input uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    /// Bitcoin: legacy and BIP143 witness digests, segwit serialization.
    Bitcoin,
    /// BitcoinCash: fork-id digests for every input, no witness data.
    BitcoinCash,
}

impl Chain {
    /// Whether transactions on this chain may carry witness data.
    pub fn supports_witness(&self) -> bool {
        matches!(self, Chain::Bitcoin)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::Bitcoin => f.write_str("bitcoin"),
            Chain::BitcoinCash => f.write_str("bitcoincash"),
        }
    }
}

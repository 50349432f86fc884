/// Bitcoin and BitcoinCash transactions: model, wire format, signature
/// hashing, signing and coin selection.
///
/// A transaction is built from unspent outputs by the unspent template,
/// funded by the fee calculator, signed input by input with the chain's
/// unlocking template and serialized for broadcast.

pub mod chain;
pub mod settings;
pub mod witness;
pub mod input;
pub mod output;
pub mod transaction;
pub mod sighash;
pub mod template;
pub mod signer;
pub mod fee;
pub mod unspent;

mod error;
pub use error::TransactionError;
pub use chain::Chain;
pub use settings::{TransactionSettings, WitnessFlag};
pub use transaction::Transaction;
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use sighash::SighashType;
pub use fee::{CoinSelection, FeeCalculator};
pub use unspent::UnspentOutput;
pub use template::unspent::UnspentTransactionTemplate;

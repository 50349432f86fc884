/// Script parsing, classification and address handling.
///
/// Provides the `Script` type, opcode definitions, element parsing,
/// standard template classification and legacy address decoding for
/// Bitcoin and BitcoinCash.

pub mod script;
pub mod opcodes;
pub mod element;
pub mod script_type;
pub mod address;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use address::{Address, AddressType, Network};
pub use element::ScriptElement;
pub use script_type::{MultisigInfo, ScriptType};

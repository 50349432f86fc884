//! Fee estimation and coin selection.
//!
//! The fee depends on the transaction size, the size depends on how many
//! inputs are selected, and the inputs selected depend on the fee. The
//! calculator iterates selection and fee estimation until the fee stops
//! changing. Selection walks the UTXOs in the order given and only ever
//! grows with the target, so the loop is bounded by the UTXO count.
//!
//! [`FeeCalculator::calculate`] is a pure function of the calculator and
//! the fee rate: it returns a fresh [`CoinSelection`] on every call.

use bitfam_script::ScriptType;

use crate::settings::TransactionSettings;
use crate::unspent::UnspentOutput;
use crate::TransactionError;

/// Smallest change amount worth creating, in satoshis.
pub const DEFAULT_DUST: u64 = 1000;

/// Bytes of a P2PKH input with a compressed key.
pub const LEGACY_INPUT_SIZE: u64 = 148;

/// Bytes of a P2PKH output.
pub const OUTPUT_SIZE: u64 = 34;

/// Version, counts and lock time.
pub const TX_OVERHEAD: u64 = 10;

/// Segwit marker and flag.
pub const WITNESS_OVERHEAD: u64 = 2;

/// Non-witness and witness bytes an input of `script_type` adds to a
/// witness transaction.
fn witness_input_size(script_type: ScriptType) -> (u64, u64) {
    match script_type {
        ScriptType::P2PK => (114, 1),
        ScriptType::P2WPKH => (41, 108),
        ScriptType::P2SH => (64, 108),
        ScriptType::P2WSH => (41, 110),
        _ => (LEGACY_INPUT_SIZE, 1),
    }
}

/// Estimate the size in bytes (virtual bytes for witness settings) of a
/// transaction spending inputs of `input_types` into `output_count`
/// outputs.
pub fn estimate_size(
    settings: &TransactionSettings,
    input_types: &[ScriptType],
    output_count: usize,
) -> u64 {
    let outputs = OUTPUT_SIZE * output_count as u64;

    if !settings.is_witness() {
        return LEGACY_INPUT_SIZE * input_types.len() as u64 + outputs + TX_OVERHEAD;
    }

    let (base, witness) = input_types.iter().fold(
        (TX_OVERHEAD + outputs, WITNESS_OVERHEAD),
        |(base, witness), script_type| {
            let (b, w) = witness_input_size(*script_type);
            (base + b, witness + w)
        },
    );
    let weight = 3 * base + base + witness;
    // Round up, as `Transaction::vsize` does.
    (weight + 3) / 4
}

/// Result of a fee calculation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinSelection {
    /// UTXOs to spend, in the order they were offered.
    pub selected: Vec<UnspentOutput>,
    /// Fee in satoshis for a transaction spending `selected`.
    pub fee: u64,
}

impl CoinSelection {
    /// Sum of the selected values.
    pub fn total(&self) -> u64 {
        self.selected.iter().fold(0u64, |acc, u| acc.saturating_add(u.value))
    }
}

/// Picks UTXOs for a payment and computes its fee.
#[derive(Clone, Debug)]
pub struct FeeCalculator {
    /// Amount to send; ignored when `send_all` is set.
    pub amount: u64,
    /// Candidate UTXOs, in preference order.
    pub utxos: Vec<UnspentOutput>,
    /// Spend every allowed UTXO into a single output.
    pub send_all: bool,
    /// Minimum change kept on top of amount and fee.
    pub dust: u64,
    /// Settings of the transaction being funded.
    pub settings: TransactionSettings,
}

impl FeeCalculator {
    /// Create a calculator with the default dust threshold.
    pub fn new(
        amount: u64,
        utxos: Vec<UnspentOutput>,
        send_all: bool,
        settings: TransactionSettings,
    ) -> Self {
        FeeCalculator {
            amount,
            utxos,
            send_all,
            dust: DEFAULT_DUST,
            settings,
        }
    }

    /// Override the dust threshold.
    pub fn with_dust(mut self, dust: u64) -> Self {
        self.dust = dust;
        self
    }

    fn spendable(&self) -> impl Iterator<Item = &UnspentOutput> + '_ {
        self.utxos
            .iter()
            .filter(move |u| self.settings.allows(u.script_type()))
    }

    /// Sum of the UTXOs the settings allow spending.
    pub fn available(&self) -> u64 {
        self.spendable()
            .fold(0u64, |acc, u| acc.saturating_add(u.value))
    }

    /// Shortest prefix of the spendable UTXOs worth at least `target`, or
    /// all of them.
    fn select(&self, target: u64) -> Vec<UnspentOutput> {
        let mut selected = Vec::new();
        let mut sum = 0u64;
        for utxo in self.spendable() {
            selected.push(utxo.clone());
            sum = sum.saturating_add(utxo.value);
            if sum >= target {
                break;
            }
        }
        selected
    }

    fn fee_for(&self, selected: &[UnspentOutput], fee_per_byte: u64) -> u64 {
        let output_count = if self.send_all { 1 } else { 2 };
        let types: Vec<ScriptType> = selected.iter().map(UnspentOutput::script_type).collect();
        estimate_size(&self.settings, &types, output_count).saturating_mul(fee_per_byte)
    }

    /// Select UTXOs and compute the fee at `fee_per_byte` satoshis per
    /// (virtual) byte.
    ///
    /// # Returns
    /// The selected UTXOs and the fee for a transaction spending exactly
    /// them. `ZeroAmount` when there is nothing to send, `InsufficientFunds`
    /// when amount, dust and fee exceed the spendable balance.
    pub fn calculate(&self, fee_per_byte: u64) -> Result<CoinSelection, TransactionError> {
        let available = self.available();
        let target = if self.send_all { available } else { self.amount };
        if target == 0 {
            return Err(TransactionError::ZeroAmount);
        }
        let dust = if self.send_all { 0 } else { self.dust };

        let mut selected = self.select(target.saturating_add(dust));
        let mut fee = self.fee_for(&selected, fee_per_byte);
        if fee >= available {
            return Err(TransactionError::InsufficientFunds {
                required: fee,
                available,
            });
        }

        if !self.send_all {
            loop {
                let required = target.saturating_add(dust).saturating_add(fee);
                if required > available {
                    return Err(TransactionError::InsufficientFunds {
                        required,
                        available,
                    });
                }
                selected = self.select(required);
                let next = self.fee_for(&selected, fee_per_byte);
                if next == fee {
                    break;
                }
                fee = next;
            }
        }

        tracing::debug!(
            amount = target,
            inputs = selected.len(),
            fee,
            fee_per_byte,
            "coin selection settled"
        );
        Ok(CoinSelection { selected, fee })
    }
}

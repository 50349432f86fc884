//! Unsigned transaction assembly from a UTXO set.
//!
//! The template pays `amount` to one address and returns the rest, less
//! the fee, to a change address. It either takes the fee as given
//! ([`UnspentTransactionTemplate::build_with_fee`]) or lets the
//! [`FeeCalculator`] work it out from a fee rate
//! ([`UnspentTransactionTemplate::build_with_fee_rate`]).

use bitfam_script::{Address, Script};

use crate::chain::Chain;
use crate::fee::{FeeCalculator, DEFAULT_DUST};
use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::settings::TransactionSettings;
use crate::transaction::Transaction;
use crate::unspent::UnspentOutput;
use crate::TransactionError;

/// A payment to build from a set of unspent outputs.
#[derive(Clone, Debug)]
pub struct UnspentTransactionTemplate {
    /// Chain the transaction is for.
    pub chain: Chain,
    /// Satoshis paid to `address`.
    pub amount: u64,
    /// Recipient address.
    pub address: String,
    /// Change address; empty for no change output.
    pub change_address: String,
    /// Minimum change kept when selecting inputs.
    pub dust: u64,
    /// UTXOs available for spending.
    pub utxos: Vec<UnspentOutput>,
    /// Spend everything into the recipient output.
    pub send_all: bool,
    /// Settings of the built transaction.
    pub settings: TransactionSettings,
}

impl UnspentTransactionTemplate {
    /// Create a template with the chain's default settings and dust.
    pub fn new(
        chain: Chain,
        amount: u64,
        address: &str,
        change_address: &str,
        utxos: Vec<UnspentOutput>,
        send_all: bool,
    ) -> Self {
        UnspentTransactionTemplate {
            chain,
            amount,
            address: address.to_string(),
            change_address: change_address.to_string(),
            dust: DEFAULT_DUST,
            utxos,
            send_all,
            settings: TransactionSettings::for_chain(chain),
        }
    }

    /// Replace the transaction settings.
    pub fn with_settings(mut self, settings: TransactionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Override the dust threshold.
    pub fn with_dust(mut self, dust: u64) -> Self {
        self.dust = dust;
        self
    }

    /// A fee calculator over this template's payment.
    pub fn fee_calculator(&self) -> FeeCalculator {
        FeeCalculator::new(
            self.amount,
            self.utxos.clone(),
            self.send_all,
            self.settings.clone(),
        )
        .with_dust(self.dust)
    }

    /// Build the unsigned transaction paying a fixed `fee`.
    ///
    /// UTXOs are spent largest first until they exceed amount plus dust.
    /// Each input carries the locking script it spends, ready for
    /// [`Transaction::sign`].
    pub fn build_with_fee(&self, fee: u64) -> Result<Transaction, TransactionError> {
        let dust = if self.send_all { 0 } else { self.dust };
        let threshold = self.amount.saturating_add(dust);

        let mut sorted: Vec<&UnspentOutput> = self.utxos.iter().collect();
        sorted.sort_by(|a, b| b.value.cmp(&a.value));

        let mut selected = Vec::new();
        let mut total = 0u64;
        for utxo in sorted {
            if self.settings.allows(utxo.script_type()) {
                total = total.saturating_add(utxo.value);
                selected.push(utxo);
            }
            if total > threshold {
                break;
            }
        }

        let inputs = selected.into_iter().map(UnspentOutput::to_input).collect();
        self.assemble(inputs, total, fee)
    }

    /// Build the unsigned transaction with the fee calculated at
    /// `fee_per_byte`.
    ///
    /// # Returns
    /// The transaction and the fee it pays.
    pub fn build_with_fee_rate(
        &self,
        fee_per_byte: u64,
    ) -> Result<(Transaction, u64), TransactionError> {
        let selection = self.fee_calculator().calculate(fee_per_byte)?;
        let total = selection.total();
        let inputs = selection.selected.iter().map(UnspentOutput::to_input).collect();
        let tx = self.assemble(inputs, total, selection.fee)?;
        Ok((tx, selection.fee))
    }

    fn assemble(
        &self,
        inputs: Vec<TransactionInput>,
        total: u64,
        fee: u64,
    ) -> Result<Transaction, TransactionError> {
        let required = self.amount.saturating_add(fee);
        let change = total
            .checked_sub(required)
            .ok_or(TransactionError::InsufficientFunds {
                required,
                available: total,
            })?;

        let recipient = Address::from_string(&self.address)?;
        let mut outputs = vec![TransactionOutput::new(
            self.amount,
            Script::from_address(&recipient),
        )];
        if !self.send_all && !self.change_address.is_empty() {
            let change_address = Address::from_string(&self.change_address)?;
            outputs.push(TransactionOutput::new(
                change,
                Script::from_address(&change_address),
            ));
        }

        tracing::debug!(
            chain = %self.chain,
            inputs = inputs.len(),
            outputs = outputs.len(),
            total,
            fee,
            change,
            "assembled unsigned transaction"
        );
        Ok(Transaction::new(self.chain, inputs, outputs, self.settings.clone()))
    }
}

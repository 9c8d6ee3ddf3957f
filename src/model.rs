use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest-unit denomination: how many base units make up one whole coin.
/// All amounts in this crate are integer counts of the smallest unit.
pub const UNITS_PER_COIN: u64 = 100_000_000;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Canonical spendable output, cross-referenced against its parent
/// transaction. Transient: recomputed from the ledger on every request,
/// never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnspentOutput {
    pub transaction_id: TransactionId,
    /// Position within the parent transaction's output list, or
    /// [`UnspentOutput::UNRESOLVED_INDEX`] if no output matched.
    pub output_index: i64,
    pub address: Address,
    pub locking_script: Vec<u8>,
    pub amount: u64,
}

impl UnspentOutput {
    /// Sentinel for a summary that could not be matched to an output of
    /// its parent transaction.
    pub const UNRESOLVED_INDEX: i64 = -1;

    pub fn is_resolved(&self) -> bool {
        self.output_index >= 0
    }
}

/// Derived view over a UTXO set; the list and count are exposed for
/// observability.
#[derive(Clone, Debug)]
pub struct BalanceSnapshot {
    pub total: u64,
    pub utxos: Vec<UnspentOutput>,
}

impl BalanceSnapshot {
    pub fn new(utxos: Vec<UnspentOutput>) -> Self {
        let total = utxos.iter().map(|utxo| utxo.amount).sum();
        Self { total, utxos }
    }

    pub fn utxo_count(&self) -> usize {
        self.utxos.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftInput {
    pub transaction_id: TransactionId,
    pub output_index: i64,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftOutput {
    pub address: Address,
    pub amount: u64,
}

/// A to-be-signed transaction. Invariant: input total equals output total
/// plus fee, exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentDraft {
    pub inputs: Vec<DraftInput>,
    pub outputs: Vec<DraftOutput>,
    pub fee: u64,
}

impl PaymentDraft {
    pub fn new(spending: &[UnspentOutput], outputs: Vec<DraftOutput>, fee: u64) -> Self {
        let inputs = spending
            .iter()
            .map(|utxo| DraftInput {
                transaction_id: utxo.transaction_id.clone(),
                output_index: utxo.output_index,
                amount: utxo.amount,
            })
            .collect();
        Self {
            inputs,
            outputs,
            fee,
        }
    }

    pub fn input_total(&self) -> u64 {
        self.inputs.iter().map(|input| input.amount).sum()
    }

    pub fn output_total(&self) -> u64 {
        self.outputs.iter().map(|output| output.amount).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.input_total() == self.output_total() + self.fee
    }
}

/// Result of the `instant_balance` operation.
#[derive(Clone, Debug, Serialize)]
pub struct InstantBalance {
    pub address: Address,
    /// Whole-coin representation, for display only.
    pub balance: f64,
    pub balance_units: u64,
    pub utxo_count: usize,
    pub utxo_amounts: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use crate::model::{
        Address, BalanceSnapshot, DraftOutput, PaymentDraft, TransactionId, UnspentOutput,
    };

    fn utxo(id: &str, index: i64, amount: u64) -> UnspentOutput {
        UnspentOutput {
            transaction_id: TransactionId::new(id),
            output_index: index,
            address: Address::new("source"),
            locking_script: vec![],
            amount,
        }
    }

    #[test]
    fn snapshot_totals_amounts() {
        let snapshot = BalanceSnapshot::new(vec![utxo("a", 0, 100), utxo("b", 1, 250)]);
        assert_eq!(snapshot.total, 350);
        assert_eq!(snapshot.utxo_count(), 2);

        let empty = BalanceSnapshot::new(vec![]);
        assert_eq!(empty.total, 0);
    }

    #[test]
    fn draft_balance_check() {
        let spending = vec![utxo("a", 0, 1000)];
        let balanced = PaymentDraft::new(
            &spending,
            vec![
                DraftOutput {
                    address: Address::new("pay"),
                    amount: 600,
                },
                DraftOutput {
                    address: Address::new("change"),
                    amount: 300,
                },
            ],
            100,
        );
        assert!(balanced.is_balanced());
        assert_eq!(balanced.input_total(), 1000);
        assert_eq!(balanced.output_total(), 900);

        let unbalanced = PaymentDraft::new(
            &spending,
            vec![DraftOutput {
                address: Address::new("pay"),
                amount: 600,
            }],
            100,
        );
        assert!(!unbalanced.is_balanced());
    }

    #[test]
    fn unresolved_sentinel() {
        assert!(!utxo("a", UnspentOutput::UNRESOLVED_INDEX, 10).is_resolved());
        assert!(utxo("a", 0, 10).is_resolved());
    }
}

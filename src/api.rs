use crate::assembler::TxAssembler;
use crate::error::WalletError;
use crate::fees::{absorb_dust_post_estimate, absorb_dust_pre_estimate, estimate_fee, FLAT_FEE};
use crate::ledger::LedgerQuery;
use crate::model::{Address, DraftOutput, InstantBalance, PaymentDraft, UNITS_PER_COIN};
use crate::normalize::fetch_normalized;
use crate::selection::{balance, select_inputs};

/// Balance view over the current UTXO set of an address.
pub async fn instant_balance<L: LedgerQuery>(
    ledger: &L,
    address: &Address,
) -> anyhow::Result<InstantBalance> {
    let utxos = fetch_normalized(ledger, address).await?;
    let total = balance(&utxos);

    Ok(InstantBalance {
        address: address.clone(),
        balance: total as f64 / UNITS_PER_COIN as f64,
        balance_units: total,
        utxo_count: utxos.len(),
        utxo_amounts: utxos.iter().map(|utxo| utxo.amount).collect(),
    })
}

/// Payment construction over a ledger query service and a transaction
/// assembly library. Every operation recomputes the UTXO set from scratch;
/// no state survives between calls.
pub struct WalletApi<L, A> {
    ledger: L,
    assembler: A,
}

impl<L: LedgerQuery, A: TxAssembler> WalletApi<L, A> {
    pub fn new(ledger: L, assembler: A) -> Self {
        Self { ledger, assembler }
    }

    pub async fn instant_balance(&self, address: &Address) -> anyhow::Result<InstantBalance> {
        instant_balance(&self.ledger, address).await
    }

    /// Builds a signed payment of `amount` smallest units to `destination`,
    /// returning unspent value to `change_address` (the funding address
    /// when not given).
    ///
    /// Two passes: a provisional draft with zero fee is signed only to
    /// measure its serialized size, then the final draft is rebuilt with
    /// the estimated fee and an exact change remainder.
    pub async fn create_payment(
        &self,
        private_key: &str,
        destination: &Address,
        amount: u64,
        change_address: Option<&Address>,
    ) -> anyhow::Result<A::Signed> {
        let source = self.assembler.derive_address(private_key)?;
        let change_address = change_address.unwrap_or(&source).clone();

        let candidates = fetch_normalized(&self.ledger, &source).await?;
        let target = amount + FLAT_FEE;
        let selected = select_inputs(&candidates, target);
        if selected.is_empty() {
            return Err(WalletError::InsufficientFunds {
                address: source,
                needed: target,
                available: balance(&candidates),
            }
            .into());
        }
        let selected_balance = balance(&selected);
        tracing::debug!(
            "selected {} of {} utxos for {}, covering {}",
            selected.len(),
            candidates.len(),
            source,
            selected_balance
        );

        let amount = absorb_dust_pre_estimate(selected_balance, amount);

        let provisional = PaymentDraft::new(
            &selected,
            payment_outputs(
                destination,
                amount,
                &change_address,
                selected_balance - amount,
            ),
            0,
        );
        let size = self.assembler.signed_size(&provisional, private_key)?;
        let fee = estimate_fee(size);

        let amount = absorb_dust_post_estimate(selected_balance, amount, fee);
        let change = selected_balance as i128 - amount as i128 - fee as i128;
        if change < 0 {
            return Err(WalletError::InsufficientFunds {
                address: source,
                needed: amount + fee,
                available: selected_balance,
            }
            .into());
        }

        let draft = PaymentDraft::new(
            &selected,
            payment_outputs(destination, amount, &change_address, change as u64),
            fee,
        );
        debug_assert!(draft.is_balanced());
        tracing::debug!(
            "paying {} to {} with fee {} and change {}",
            amount,
            destination,
            fee,
            change
        );

        self.assembler.sign(&draft, private_key)
    }

    /// Sweeps the entire balance of the key's address to `destination`: all
    /// UTXOs are spent, no change output, everything after the fee goes to
    /// the destination. The provisional pass assumes a flat placeholder fee
    /// instead of zero.
    pub async fn create_balance_transfer(
        &self,
        private_key: &str,
        destination: &Address,
    ) -> anyhow::Result<A::Signed> {
        let source = self.assembler.derive_address(private_key)?;

        let utxos = fetch_normalized(&self.ledger, &source).await?;
        let total = balance(&utxos);
        if total <= FLAT_FEE {
            return Err(WalletError::InsufficientFunds {
                address: source,
                needed: FLAT_FEE,
                available: total,
            }
            .into());
        }

        let provisional = PaymentDraft::new(
            &utxos,
            vec![DraftOutput {
                address: destination.clone(),
                amount: total - FLAT_FEE,
            }],
            FLAT_FEE,
        );
        let size = self.assembler.signed_size(&provisional, private_key)?;
        let fee = estimate_fee(size);

        let amount = total.checked_sub(fee).ok_or(WalletError::InsufficientFunds {
            address: source,
            needed: fee,
            available: total,
        })?;

        let draft = PaymentDraft::new(
            &utxos,
            vec![DraftOutput {
                address: destination.clone(),
                amount,
            }],
            fee,
        );
        debug_assert!(draft.is_balanced());
        tracing::debug!(
            "sweeping {} utxos totalling {} to {} with fee {}",
            draft.inputs.len(),
            total,
            destination,
            fee
        );

        self.assembler.sign(&draft, private_key)
    }
}

fn payment_outputs(
    destination: &Address,
    amount: u64,
    change_address: &Address,
    change: u64,
) -> Vec<DraftOutput> {
    let mut outputs = vec![DraftOutput {
        address: destination.clone(),
        amount,
    }];
    if change > 0 {
        outputs.push(DraftOutput {
            address: change_address.clone(),
            amount: change,
        });
    }
    outputs
}

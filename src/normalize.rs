use crate::ledger::{LedgerQuery, RawTransaction, RawUtxoSummary};
use crate::model::{Address, UnspentOutput, UNITS_PER_COIN};
use anyhow::Context;

/// Converts a whole-coin decimal string to smallest units. The conversion
/// must match the reported amount exactly, so the rounding rule is fixed:
/// `round(value * UNITS_PER_COIN)`.
pub fn units_from_decimal(value: &str) -> anyhow::Result<u64> {
    let coins: f64 = value
        .parse()
        .with_context(|| format!("can't parse decimal amount: {value:?}"))?;
    Ok((coins * UNITS_PER_COIN as f64).round() as u64)
}

/// Scans the parent transaction for the output this summary refers to: the
/// locking-address set must contain the summary's address and the converted
/// value must equal the reported amount. The lowest matching index wins when
/// several outputs tie on both address and amount.
fn locate_output(summary: &RawUtxoSummary, transaction: &RawTransaction) -> i64 {
    for (index, output) in transaction.outputs.iter().enumerate() {
        if !output.script_pub_key.addresses.contains(&summary.address) {
            continue;
        }
        match units_from_decimal(&output.value) {
            Ok(units) if units == summary.amount => return index as i64,
            // an unparseable value can't match the reported amount
            _ => continue,
        }
    }
    UnspentOutput::UNRESOLVED_INDEX
}

/// Cross-references one raw summary against its parent transaction body,
/// producing the canonical record. Pure transform: the same pair always
/// yields the same output. A summary with no matching output is still
/// emitted, carrying the unresolved sentinel index.
pub fn normalize(
    summary: &RawUtxoSummary,
    transaction: &RawTransaction,
) -> anyhow::Result<UnspentOutput> {
    let locking_script = hex::decode(&summary.script_pub_key)
        .with_context(|| format!("can't decode locking script for utxo of {}", summary.txid))?;

    Ok(UnspentOutput {
        transaction_id: summary.txid.clone(),
        output_index: locate_output(summary, transaction),
        address: summary.address.clone(),
        locking_script,
        amount: summary.amount,
    })
}

/// Fetches the raw UTXO set for an address and normalizes every entry.
/// Lookups run sequentially; each one depends only on its own summary, so
/// there is no cross-item coordination to get wrong.
pub async fn fetch_normalized<L: LedgerQuery>(
    ledger: &L,
    address: &Address,
) -> anyhow::Result<Vec<UnspentOutput>> {
    let summaries = ledger.unspent_outputs(address).await?;

    let mut utxos = Vec::with_capacity(summaries.len());
    for summary in summaries.iter() {
        let transaction = ledger
            .transaction(&summary.txid)
            .await
            .with_context(|| format!("can't fetch parent transaction {}", summary.txid))?;
        let utxo = normalize(summary, &transaction)?;
        if !utxo.is_resolved() {
            tracing::warn!(
                "no output of {} matches utxo for {} with amount {}",
                summary.txid,
                summary.address,
                summary.amount
            );
        }
        utxos.push(utxo);
    }

    Ok(utxos)
}

#[cfg(test)]
mod tests {
    use crate::ledger::{RawLockingScript, RawTransaction, RawTxOutput, RawUtxoSummary};
    use crate::model::{Address, TransactionId, UnspentOutput};
    use crate::normalize::{normalize, units_from_decimal};

    fn summary(amount: u64) -> RawUtxoSummary {
        RawUtxoSummary {
            txid: TransactionId::new("aa"),
            address: Address::new("owner"),
            amount,
            script_pub_key: "76a914".to_string(),
        }
    }

    fn output(value: &str, addresses: Vec<&str>) -> RawTxOutput {
        RawTxOutput {
            value: value.to_string(),
            script_pub_key: RawLockingScript {
                addresses: addresses.into_iter().map(Address::new).collect(),
            },
        }
    }

    #[test]
    fn decimal_conversion_rounds_to_units() {
        assert_eq!(units_from_decimal("0.10000000").unwrap(), 10_000_000);
        assert_eq!(units_from_decimal("1.25").unwrap(), 125_000_000);
        // 0.3 is not representable exactly; rounding must absorb the drift
        assert_eq!(units_from_decimal("0.3").unwrap(), 30_000_000);
        assert!(units_from_decimal("not-a-number").is_err());
    }

    #[test]
    fn finds_output_by_address_and_amount() {
        let tx = RawTransaction {
            outputs: vec![
                output("0.50000000", vec!["other"]),
                output("0.10000000", vec!["owner"]),
            ],
        };
        let utxo = normalize(&summary(10_000_000), &tx).unwrap();
        assert_eq!(utxo.output_index, 1);
        assert_eq!(utxo.amount, 10_000_000);
        assert_eq!(utxo.locking_script, vec![0x76, 0xa9, 0x14]);
    }

    #[test]
    fn lowest_index_wins_among_ties() {
        let tx = RawTransaction {
            outputs: vec![
                output("0.10000000", vec!["owner"]),
                output("0.10000000", vec!["owner"]),
            ],
        };
        let utxo = normalize(&summary(10_000_000), &tx).unwrap();
        assert_eq!(utxo.output_index, 0);
    }

    #[test]
    fn amount_mismatch_yields_sentinel() {
        let tx = RawTransaction {
            outputs: vec![output("0.20000000", vec!["owner"])],
        };
        let utxo = normalize(&summary(10_000_000), &tx).unwrap();
        assert_eq!(utxo.output_index, UnspentOutput::UNRESOLVED_INDEX);
        assert!(!utxo.is_resolved());
    }

    #[test]
    fn normalization_is_idempotent() {
        let tx = RawTransaction {
            outputs: vec![output("0.10000000", vec!["owner"])],
        };
        let first = normalize(&summary(10_000_000), &tx).unwrap();
        let second = normalize(&summary(10_000_000), &tx).unwrap();
        assert_eq!(first, second);
    }
}

use crate::model::{Address, TransactionId};
use anyhow::{anyhow, Context};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;

/// Raw unspent-output summary as reported by the ledger query service.
/// Amounts are already in smallest units; the locking script comes hex
/// encoded on the wire.
#[derive(Clone, Debug, Deserialize)]
pub struct RawUtxoSummary {
    pub txid: TransactionId,
    pub address: Address,
    #[serde(rename = "satoshis")]
    pub amount: u64,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawLockingScript {
    #[serde(default)]
    pub addresses: Vec<Address>,
}

/// One output of a raw transaction body. The value is a whole-coin decimal
/// string, the way the query service serializes it.
#[derive(Clone, Debug, Deserialize)]
pub struct RawTxOutput {
    pub value: String,
    #[serde(rename = "scriptPubKey", default)]
    pub script_pub_key: RawLockingScript,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawTransaction {
    #[serde(rename = "vout")]
    pub outputs: Vec<RawTxOutput>,
}

/// Capability interface to the remote ledger query service. The core only
/// ever needs these two lookups; tests substitute an in-memory ledger.
#[allow(async_fn_in_trait)]
pub trait LedgerQuery {
    async fn unspent_outputs(&self, address: &Address) -> anyhow::Result<Vec<RawUtxoSummary>>;
    async fn transaction(&self, id: &TransactionId) -> anyhow::Result<RawTransaction>;
}

/// Insight-API-style HTTP implementation of [`LedgerQuery`].
pub struct InsightLedger {
    client: Client,
    endpoint: String,
}

impl InsightLedger {
    pub fn new(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP Client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn url(&self, api: impl fmt::Display) -> String {
        format!("{endpoint}/{api}", endpoint = self.endpoint)
    }
}

impl LedgerQuery for InsightLedger {
    async fn unspent_outputs(&self, address: &Address) -> anyhow::Result<Vec<RawUtxoSummary>> {
        let req = self
            .client
            .get(self.url(format!("addr/{address}/utxo")))
            .send()
            .await
            .context("Failed to get unspent outputs from the ledger endpoint")?;

        match req.status() {
            StatusCode::OK => {
                let utxos: Vec<RawUtxoSummary> = req
                    .json()
                    .await
                    .context("Expect the endpoint to return unspent output data")?;
                Ok(utxos)
            }
            code => Err(anyhow!("error fetching utxos for {}: {:?}", address, code)),
        }
    }

    async fn transaction(&self, id: &TransactionId) -> anyhow::Result<RawTransaction> {
        let req = self
            .client
            .get(self.url(format!("tx/{id}")))
            .send()
            .await
            .context("Failed to get transaction from the ledger endpoint")?;

        match req.status() {
            StatusCode::OK => {
                let tx: RawTransaction = req
                    .json()
                    .await
                    .context("Expect the endpoint to return transaction data")?;
                Ok(tx)
            }
            code => Err(anyhow!("error fetching transaction {}: {:?}", id, code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ledger::{RawTransaction, RawUtxoSummary};

    #[test]
    fn parses_utxo_summary_payload() {
        let body = r#"[
            {
                "address": "XcAq6Wm4j4b2PYrWyainx8Yxx9AHCWsVWX",
                "txid": "f92e66edc9c8da41de71073ef08d62c56f8752a3f4e29ced6c515e0b1c074a38",
                "vout": 1,
                "scriptPubKey": "76a914f92e66edc9c8da41de71073ef08d62c588ac",
                "amount": 0.1,
                "satoshis": 10000000,
                "height": 1638655,
                "confirmations": 12
            }
        ]"#;
        let utxos: Vec<RawUtxoSummary> = serde_json::from_str(body).unwrap();
        assert_eq!(utxos.len(), 1);
        assert_eq!(utxos[0].amount, 10_000_000);
        assert_eq!(
            utxos[0].address.as_ref(),
            "XcAq6Wm4j4b2PYrWyainx8Yxx9AHCWsVWX"
        );
    }

    #[test]
    fn parses_transaction_payload() {
        let body = r#"{
            "txid": "f92e66edc9c8da41de71073ef08d62c56f8752a3f4e29ced6c515e0b1c074a38",
            "vout": [
                {
                    "value": "0.10000000",
                    "scriptPubKey": {
                        "hex": "76a914f92e66edc9c8da41de71073ef08d62c588ac",
                        "addresses": ["XcAq6Wm4j4b2PYrWyainx8Yxx9AHCWsVWX"]
                    }
                },
                {
                    "value": "1.25000000",
                    "scriptPubKey": {}
                }
            ]
        }"#;
        let tx: RawTransaction = serde_json::from_str(body).unwrap();
        assert_eq!(tx.outputs.len(), 2);
        assert_eq!(tx.outputs[0].value, "0.10000000");
        assert_eq!(tx.outputs[0].script_pub_key.addresses.len(), 1);
        assert!(tx.outputs[1].script_pub_key.addresses.is_empty());
    }
}

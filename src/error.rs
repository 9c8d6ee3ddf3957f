use crate::model::Address;
use std::error::Error;
use std::fmt;

/// Failures the core surfaces to its caller. Upstream ledger-query errors
/// are not wrapped here; they propagate unmodified through the `anyhow`
/// chain with context attached at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Candidate balance is below the requested amount plus fee margin.
    InsufficientFunds {
        address: Address,
        needed: u64,
        available: u64,
    },
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::InsufficientFunds {
                address,
                needed,
                available,
            } => write!(
                f,
                "not enough funds available in utxos for {address}: needed {needed}, available {available}"
            ),
        }
    }
}

impl Error for WalletError {}

#[cfg(test)]
mod tests {
    use crate::error::WalletError;
    use crate::model::Address;

    #[test]
    fn survives_anyhow_downcast() {
        let err: anyhow::Error = WalletError::InsufficientFunds {
            address: Address::new("addr"),
            needed: 1500,
            available: 200,
        }
        .into();
        match err.downcast_ref::<WalletError>() {
            Some(WalletError::InsufficientFunds {
                needed, available, ..
            }) => {
                assert_eq!(*needed, 1500);
                assert_eq!(*available, 200);
            }
            None => panic!("expected a wallet error"),
        }
    }
}

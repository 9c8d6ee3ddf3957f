use crate::model::{Address, PaymentDraft};

/// Seam to the external transaction-construction and signing library. The
/// core stays free of any concrete wire format or cryptography; tests
/// substitute an in-memory assembler.
pub trait TxAssembler {
    /// Fully signed transaction, ready to hand to a broadcaster.
    type Signed;

    /// Address owned by the given private key (the funding and default
    /// change address).
    fn derive_address(&self, private_key: &str) -> anyhow::Result<Address>;

    /// Byte length of the draft once serialized and signed. Provisional
    /// drafts exist only to be measured here.
    fn signed_size(&self, draft: &PaymentDraft, private_key: &str) -> anyhow::Result<usize>;

    fn sign(&self, draft: &PaymentDraft, private_key: &str) -> anyhow::Result<Self::Signed>;
}

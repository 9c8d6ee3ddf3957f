/// Smallest change amount worth creating as its own output.
pub const DUST_THRESHOLD: u64 = 546;

/// Conservative flat fee bound, used as the margin before the real fee is
/// known: for coin selection (target = amount + FLAT_FEE) and as the
/// balance-transfer placeholder fee.
pub const FLAT_FEE: u64 = 1_000;

/// Safety margin on top of the size-proportional fee: the final draft may
/// serialize a few bytes away from the provisional one it was measured on.
const FEE_MARGIN: u64 = 10;

/// Static linear fee model: one smallest unit per serialized byte, plus the
/// fixed margin. Deliberately not a feerate-market query.
pub fn estimate_fee(serialized_len: usize) -> u64 {
    FEE_MARGIN + serialized_len as u64
}

/// Pre-estimate dust check, applied before the real fee is known. When the
/// prospective change could not exceed dust plus the flat fee bound, the
/// whole balance goes to the payment and no change output is created.
pub fn absorb_dust_pre_estimate(balance: u64, amount: u64) -> u64 {
    if balance as i128 - amount as i128 <= (DUST_THRESHOLD + FLAT_FEE) as i128 {
        balance
    } else {
        amount
    }
}

/// Post-estimate dust check, applied once the real fee is known. Dust-sized
/// change is redirected into the payment instead of its own output.
pub fn absorb_dust_post_estimate(balance: u64, amount: u64, fee: u64) -> u64 {
    if balance as i128 - amount as i128 - fee as i128 <= DUST_THRESHOLD as i128 {
        balance.saturating_sub(fee)
    } else {
        amount
    }
}

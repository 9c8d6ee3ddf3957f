use crate::model::UnspentOutput;
use itertools::Itertools;

/// `balance(utxos) = sum of amounts`. The set is small enough per address
/// that u64 covers total supply in smallest units.
pub fn balance(utxos: &[UnspentOutput]) -> u64 {
    utxos.iter().map(|utxo| utxo.amount).sum()
}

/// Picks inputs covering `target` from the candidate set, or an empty
/// selection when the whole set cannot cover it.
///
/// Two passes over the candidates sorted by amount, descending:
/// 1. Track the last coin scanned whose amount strictly exceeds the target,
///    stopping at the first coin that does not. Because the scan order is
///    descending, the survivor is the smallest single coin that alone
///    exceeds the target; spending it avoids fragmenting larger coins.
/// 2. If no single coin qualifies, accumulate largest-first until the
///    running total reaches the target. Greedy: minimizes input count, not
///    waste.
///
/// A coin exactly equal to the target fails the strict comparison in pass
/// one and is picked up by pass two instead.
pub fn select_inputs(candidates: &[UnspentOutput], target: u64) -> Vec<UnspentOutput> {
    if balance(candidates) < target {
        return vec![];
    }

    let sorted: Vec<&UnspentOutput> = candidates
        .iter()
        .sorted_by(|a, b| b.amount.cmp(&a.amount))
        .collect();

    let mut single: Option<&UnspentOutput> = None;
    for utxo in sorted.iter() {
        if utxo.amount <= target {
            break;
        }
        single = Some(*utxo);
    }
    if let Some(utxo) = single {
        return vec![utxo.clone()];
    }

    let mut included = vec![];
    let mut total = 0u64;
    for utxo in sorted.iter() {
        included.push((*utxo).clone());
        total += utxo.amount;
        if total >= target {
            break;
        }
    }
    included
}

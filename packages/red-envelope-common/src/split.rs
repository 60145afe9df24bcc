//! Share computation for a single claim.
//!
//! Everything here is a pure function of its arguments. The registry owns the
//! seed derivation and the state transition; this module only answers "how much
//! does the next claimant get".

use cosmwasm_std::Uint128;
use thiserror::Error;

use crate::types::SplitPolicy;

/// Smallest indivisible unit every slot is guaranteed to receive.
pub const MIN_SHARE: u128 = 1;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SplitError {
    #[error("no claim slots left")]
    NoSlotsLeft,

    #[error("remaining amount {remaining} cannot cover {slots_left} slots")]
    RemainderTooSmall { remaining: Uint128, slots_left: u32 },
}

/// Result of one share computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareDraw {
    pub amount: Uint128,
    /// The value read from the seed, present only when the policy actually drew one.
    pub random_value: Option<u128>,
}

/// Compute the amount owed to the next claimant.
///
/// `remaining` and `slots_left` describe the envelope before this claim. The
/// result always lies in `[1, remaining - (slots_left - 1)]`, so every slot
/// still open afterwards can be paid at least one unit. With one slot left the
/// share is exactly `remaining` under every policy.
pub fn next_share(
    remaining: Uint128,
    slots_left: u32,
    policy: &SplitPolicy,
    seed: &[u8; 32],
) -> Result<ShareDraw, SplitError> {
    if slots_left == 0 {
        return Err(SplitError::NoSlotsLeft);
    }
    let slots = u128::from(slots_left);
    let remaining_raw = remaining.u128();
    if remaining_raw < slots * MIN_SHARE {
        return Err(SplitError::RemainderTooSmall {
            remaining,
            slots_left,
        });
    }

    if slots_left == 1 {
        return Ok(ShareDraw {
            amount: remaining,
            random_value: None,
        });
    }

    match policy {
        SplitPolicy::Even => Ok(ShareDraw {
            amount: Uint128::new(remaining_raw / slots),
            random_value: None,
        }),
        SplitPolicy::Random => {
            let random_value = random_value_from_seed(seed);
            let average = remaining_raw / slots;
            // 2 * average - 1, written so it cannot overflow; average >= 1 here.
            let span = average + (average - 1);
            let max_share = remaining_raw - (slots - 1) * MIN_SHARE;
            let share = (MIN_SHARE + random_value % span).clamp(MIN_SHARE, max_share);
            Ok(ShareDraw {
                amount: Uint128::new(share),
                random_value: Some(random_value),
            })
        }
    }
}

/// Big-endian u128 from the first 16 bytes of the seed.
pub fn random_value_from_seed(seed: &[u8; 32]) -> u128 {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&seed[0..16]);
    u128::from_be_bytes(bytes)
}

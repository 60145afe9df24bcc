use sha2::{Digest, Sha256};

/// Domain tag so a claim seed can never collide with another sha256 use of the same bytes.
const SEED_DOMAIN: &[u8] = b"red-envelope/claim-seed/v1";

/// Everything a claim seed is derived from.
///
/// The block fields are public and a block producer can influence them, so the
/// resulting seed is predictable to a motivated validator. That is an accepted
/// property of the random split, not something this function tries to hide.
pub struct SeedInput<'a> {
    pub chain_id: &'a str,
    pub block_height: u64,
    pub block_time_nanos: u64,
    /// Position of the transaction in its block, when the host reports it.
    pub tx_index: Option<u32>,
    pub envelope_id: u64,
    pub claimant: &'a str,
    pub remaining_count: u32,
    pub remaining_amount: u128,
}

/// Compute the per-claim entropy seed.
///
/// `seed = sha256( domain || len(chain_id) || chain_id || height_be || time_be
///                 || tx_flag || tx_index_be || envelope_id_be
///                 || len(claimant) || claimant || remaining_count_be || remaining_amount_be )`
///
/// Length prefixes keep variable-width fields from sliding into each other.
/// The claimant and the remaining count are mixed in so two claims landing in
/// the same block still read different seeds.
pub fn compute_entropy_seed(input: &SeedInput) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(SEED_DOMAIN);
    hasher.update((input.chain_id.len() as u32).to_be_bytes());
    hasher.update(input.chain_id.as_bytes());
    hasher.update(input.block_height.to_be_bytes());
    hasher.update(input.block_time_nanos.to_be_bytes());
    match input.tx_index {
        Some(index) => {
            hasher.update([0x01]);
            hasher.update(index.to_be_bytes());
        }
        None => hasher.update([0x00]),
    }
    hasher.update(input.envelope_id.to_be_bytes());
    hasher.update((input.claimant.len() as u32).to_be_bytes());
    hasher.update(input.claimant.as_bytes());
    hasher.update(input.remaining_count.to_be_bytes());
    hasher.update(input.remaining_amount.to_be_bytes());
    hasher.finalize().into()
}

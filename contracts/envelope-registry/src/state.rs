use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};
use red_envelope_common::types::SplitPolicy;

pub const CONFIG: Item<RegistryConfig> = Item::new("config");
/// Next envelope id; equals the number of envelopes ever created.
pub const NEXT_ENVELOPE_ID: Item<u64> = Item::new("next_envelope_id");
pub const ENVELOPES: Map<u64, Envelope> = Map::new("envelopes");
/// (envelope_id, claimant) -> claim. Presence means "already claimed".
pub const CLAIMS: Map<(u64, &Addr), ClaimRecord> = Map::new("claims");
/// (envelope_id, claim sequence) -> claimant, so claimers list in claim order.
pub const CLAIM_ORDER: Map<(u64, u32), Addr> = Map::new("claim_order");
/// Secondary index of envelopes by their creator.
pub const CREATOR_ENVELOPES: Map<(&Addr, u64), ()> = Map::new("creator_envelopes");

#[cw_serde]
pub struct RegistryConfig {
    pub admin: Addr,
    /// The only native denom envelopes can be funded with
    pub denom: String,
    /// Upper bound on claim slots per envelope
    pub max_count: u32,
    /// Upper bound on message length in bytes
    pub max_message_length: u32,
}

#[cw_serde]
pub struct Envelope {
    pub id: u64,
    pub creator: Addr,
    pub total_amount: Uint128,
    pub remaining_amount: Uint128,
    pub total_count: u32,
    pub remaining_count: u32,
    pub policy: SplitPolicy,
    pub message: String,
    pub created_at: Timestamp,
    /// False once every slot is claimed or the creator refunded the remainder
    pub active: bool,
}

impl Envelope {
    /// Number of claims recorded so far; also the sequence number of the next claim.
    pub fn claimed_count(&self) -> u32 {
        self.total_count - self.remaining_count
    }
}

#[cw_serde]
pub struct ClaimRecord {
    pub envelope_id: u64,
    pub claimant: Addr,
    pub amount: Uint128,
    pub claimed_at: Timestamp,
    /// 0-based position of this claim within its envelope
    pub sequence: u32,
    /// Value drawn from the entropy seed (Random policy, non-final slots only)
    pub random_value: Option<Uint128>,
}

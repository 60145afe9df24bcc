use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Timestamp, Uint128};
use red_envelope_common::types::SplitPolicy;

use crate::state::{ClaimRecord, Envelope, RegistryConfig};

#[cw_serde]
pub struct InstantiateMsg {
    /// Native denom envelopes are funded and paid out in
    pub denom: String,
    pub max_count: u32,
    pub max_message_length: u32,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Fund a new envelope. Must be sent with exactly `total_amount` of the configured denom.
    CreateEnvelope {
        total_amount: Uint128,
        total_count: u32,
        policy: SplitPolicy,
        message: String,
    },
    /// Claim one slot of an envelope. The sender is the claimant.
    ClaimEnvelope { envelope_id: u64 },
    /// Return the unclaimed remainder to the creator and close the envelope. Creator only.
    RefundEnvelope { envelope_id: u64 },
    /// Update configuration. Admin only.
    UpdateConfig {
        max_count: Option<u32>,
        max_message_length: Option<u32>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

/// Arguments of `ExecuteMsg::CreateEnvelope`, unpacked for the handler.
pub struct CreateEnvelopeParams {
    pub total_amount: Uint128,
    pub total_count: u32,
    pub policy: SplitPolicy,
    pub message: String,
}

pub struct UpdateConfigParams {
    pub max_count: Option<u32>,
    pub max_message_length: Option<u32>,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(RegistryConfig)]
    Config {},
    #[returns(EnvelopeInfoResponse)]
    EnvelopeInfo { envelope_id: u64 },
    #[returns(EnvelopesResponse)]
    Envelopes {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(CreatorEnvelopesResponse)]
    EnvelopesByCreator {
        creator: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(bool)]
    HasClaimed { envelope_id: u64, account: String },
    #[returns(Uint128)]
    ClaimAmount { envelope_id: u64, account: String },
    #[returns(ClaimersResponse)]
    Claimers {
        envelope_id: u64,
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(ClaimsResponse)]
    Claims {
        envelope_id: u64,
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(u64)]
    TotalEnvelopes {},
}

/// Flat snapshot of one envelope, as rendered by clients.
#[cw_serde]
pub struct EnvelopeInfoResponse {
    pub creator: Addr,
    pub total_amount: Uint128,
    pub remaining_amount: Uint128,
    pub total_count: u32,
    pub remaining_count: u32,
    pub is_random: bool,
    pub is_active: bool,
    pub message: String,
    pub created_at: Timestamp,
}

impl From<Envelope> for EnvelopeInfoResponse {
    fn from(envelope: Envelope) -> Self {
        EnvelopeInfoResponse {
            creator: envelope.creator,
            total_amount: envelope.total_amount,
            remaining_amount: envelope.remaining_amount,
            total_count: envelope.total_count,
            remaining_count: envelope.remaining_count,
            is_random: envelope.policy.is_random(),
            is_active: envelope.active,
            message: envelope.message,
            created_at: envelope.created_at,
        }
    }
}

#[cw_serde]
pub struct EnvelopesResponse {
    pub envelopes: Vec<Envelope>,
}

#[cw_serde]
pub struct CreatorEnvelopesResponse {
    pub creator: String,
    pub envelope_ids: Vec<u64>,
}

#[cw_serde]
pub struct ClaimersResponse {
    pub envelope_id: u64,
    pub claimers: Vec<Addr>,
}

#[cw_serde]
pub struct ClaimsResponse {
    pub envelope_id: u64,
    pub claims: Vec<ClaimRecord>,
}

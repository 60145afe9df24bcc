use cosmwasm_std::{to_json_binary, Addr, Binary, Deps, Order, StdError, StdResult, Uint128};
use cw_storage_plus::Bound;

use crate::execute::HARD_MAX_COUNT;
use crate::msg::{
    ClaimersResponse, ClaimsResponse, CreatorEnvelopesResponse, EnvelopeInfoResponse,
    EnvelopesResponse,
};
use crate::state::{
    Envelope, CLAIMS, CLAIM_ORDER, CONFIG, CREATOR_ENVELOPES, ENVELOPES, NEXT_ENVELOPE_ID,
};

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

fn load_envelope(deps: Deps, envelope_id: u64) -> StdResult<Envelope> {
    ENVELOPES
        .may_load(deps.storage, envelope_id)?
        .ok_or_else(|| StdError::not_found(format!("envelope {envelope_id}")))
}

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_envelope_info(deps: Deps, envelope_id: u64) -> StdResult<Binary> {
    let envelope = load_envelope(deps, envelope_id)?;
    to_json_binary(&EnvelopeInfoResponse::from(envelope))
}

pub fn query_envelopes(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let envelopes = ENVELOPES
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, envelope)| envelope))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&EnvelopesResponse { envelopes })
}

pub fn query_envelopes_by_creator(
    deps: Deps,
    creator: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&creator)?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let envelope_ids = CREATOR_ENVELOPES
        .prefix(&addr)
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .collect::<StdResult<Vec<u64>>>()?;

    to_json_binary(&CreatorEnvelopesResponse {
        creator,
        envelope_ids,
    })
}

/// False for an account that never claimed; errors only for an unknown envelope.
///
/// The account is only used as a lookup key, so a string that is not a valid
/// address simply finds no claim.
pub fn query_has_claimed(deps: Deps, envelope_id: u64, account: String) -> StdResult<Binary> {
    load_envelope(deps, envelope_id)?;
    let addr = Addr::unchecked(account);
    to_json_binary(&CLAIMS.has(deps.storage, (envelope_id, &addr)))
}

/// Zero for an account that never claimed; errors only for an unknown envelope.
pub fn query_claim_amount(deps: Deps, envelope_id: u64, account: String) -> StdResult<Binary> {
    load_envelope(deps, envelope_id)?;
    let addr = Addr::unchecked(account);
    let amount = CLAIMS
        .may_load(deps.storage, (envelope_id, &addr))?
        .map(|claim| claim.amount)
        .unwrap_or(Uint128::zero());
    to_json_binary(&amount)
}

/// Claimant accounts in claim order. Without a limit the whole list comes back,
/// which is bounded by the slot ceiling.
pub fn query_claimers(
    deps: Deps,
    envelope_id: u64,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    load_envelope(deps, envelope_id)?;
    let limit = limit.unwrap_or(HARD_MAX_COUNT).min(HARD_MAX_COUNT) as usize;
    let start = start_after.map(Bound::exclusive);

    let claimers = CLAIM_ORDER
        .prefix(envelope_id)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, claimant)| claimant))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&ClaimersResponse {
        envelope_id,
        claimers,
    })
}

pub fn query_claims(
    deps: Deps,
    envelope_id: u64,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    load_envelope(deps, envelope_id)?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let claims = CLAIM_ORDER
        .prefix(envelope_id)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (_, claimant) = item?;
            CLAIMS.load(deps.storage, (envelope_id, &claimant))
        })
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&ClaimsResponse {
        envelope_id,
        claims,
    })
}

pub fn query_total_envelopes(deps: Deps) -> StdResult<Binary> {
    let total = NEXT_ENVELOPE_ID.load(deps.storage)?;
    to_json_binary(&total)
}

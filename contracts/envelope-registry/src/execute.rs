use cosmwasm_std::{
    coins, to_json_binary, BankMsg, DepsMut, Env, Event, MessageInfo, Response, Uint128,
};
use red_envelope_common::entropy::{compute_entropy_seed, SeedInput};
use red_envelope_common::split::{next_share, ShareDraw};

use crate::error::ContractError;
use crate::msg::{CreateEnvelopeParams, UpdateConfigParams};
use crate::state::{
    ClaimRecord, Envelope, CLAIMS, CLAIM_ORDER, CONFIG, CREATOR_ENVELOPES, ENVELOPES,
    NEXT_ENVELOPE_ID,
};

/// Ceiling for `max_count`; keeps per-envelope claim bookkeeping bounded.
pub const HARD_MAX_COUNT: u32 = 1000;
/// Ceiling for `max_message_length`, in bytes.
pub const HARD_MAX_MESSAGE_LENGTH: u32 = 512;

pub fn validate_config_bounds(
    max_count: u32,
    max_message_length: u32,
) -> Result<(), ContractError> {
    if max_count == 0 || max_count > HARD_MAX_COUNT {
        return Err(ContractError::InvalidConfig {
            reason: format!("max_count must be between 1 and {HARD_MAX_COUNT}, got {max_count}"),
        });
    }
    if max_message_length > HARD_MAX_MESSAGE_LENGTH {
        return Err(ContractError::InvalidConfig {
            reason: format!(
                "max_message_length must be at most {HARD_MAX_MESSAGE_LENGTH}, got {max_message_length}"
            ),
        });
    }
    Ok(())
}

/// The attached funds are the creator's debit: exactly one coin of `denom` for exactly `expected`.
fn must_pay_exact(info: &MessageInfo, denom: &str, expected: Uint128) -> Result<(), ContractError> {
    let sent = match info.funds.as_slice() {
        [] => {
            return Err(ContractError::TransferFailed {
                reason: format!("no {denom} sent to fund the envelope"),
            })
        }
        [coin] => coin,
        _ => {
            return Err(ContractError::TransferFailed {
                reason: "must send exactly one coin".to_string(),
            })
        }
    };
    if sent.denom != denom {
        return Err(ContractError::TransferFailed {
            reason: format!("must send {denom}, got {}", sent.denom),
        });
    }
    if sent.amount != expected {
        return Err(ContractError::TransferFailed {
            reason: format!("sent {} but total_amount is {expected}", sent.amount),
        });
    }
    Ok(())
}

fn reject_funds(info: &MessageInfo, action: &str) -> Result<(), ContractError> {
    if !info.funds.is_empty() {
        return Err(ContractError::InvalidParameters {
            reason: format!("{action} does not accept funds"),
        });
    }
    Ok(())
}

/// Create and fund a new envelope.
///
/// All parameter checks run before the funds check, so a bad request reports
/// the parameter problem even when the attached coin is also wrong. Nothing is
/// stored unless every check passes.
pub fn create_envelope(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: CreateEnvelopeParams,
) -> Result<Response, ContractError> {
    let CreateEnvelopeParams {
        total_amount,
        total_count,
        policy,
        message,
    } = params;

    let config = CONFIG.load(deps.storage)?;

    if total_amount.is_zero() {
        return Err(ContractError::InvalidParameters {
            reason: "total_amount must be positive".to_string(),
        });
    }
    if total_count == 0 || total_count > config.max_count {
        return Err(ContractError::InvalidParameters {
            reason: format!(
                "total_count must be between 1 and {}, got {total_count}",
                config.max_count
            ),
        });
    }
    if message.len() > config.max_message_length as usize {
        return Err(ContractError::InvalidParameters {
            reason: format!(
                "message is {} bytes, limit is {}",
                message.len(),
                config.max_message_length
            ),
        });
    }
    // Every slot must be able to receive at least one base unit.
    if total_amount < Uint128::from(total_count) {
        return Err(ContractError::InsufficientAmount {
            amount: total_amount,
            count: total_count,
        });
    }

    must_pay_exact(&info, &config.denom, total_amount)?;

    let envelope_id = NEXT_ENVELOPE_ID.load(deps.storage)?;
    NEXT_ENVELOPE_ID.save(deps.storage, &(envelope_id + 1))?;

    let envelope = Envelope {
        id: envelope_id,
        creator: info.sender.clone(),
        total_amount,
        remaining_amount: total_amount,
        total_count,
        remaining_count: total_count,
        policy: policy.clone(),
        message: message.clone(),
        created_at: env.block.time,
        active: true,
    };
    ENVELOPES.save(deps.storage, envelope_id, &envelope)?;
    CREATOR_ENVELOPES.save(deps.storage, (&info.sender, envelope_id), &())?;

    Ok(Response::new()
        .set_data(to_json_binary(&envelope_id)?)
        .add_attribute("action", "create_envelope")
        .add_attribute("envelope_id", envelope_id.to_string())
        .add_attribute("creator", info.sender.to_string())
        .add_event(
            Event::new("envelope_created")
                .add_attribute("envelope_id", envelope_id.to_string())
                .add_attribute("creator", info.sender.to_string())
                .add_attribute("total_amount", total_amount.to_string())
                .add_attribute("total_count", total_count.to_string())
                .add_attribute("is_random", policy.is_random().to_string())
                .add_attribute("policy", policy.as_str())
                .add_attribute("message", message)
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Claim one slot of an envelope for the sender.
///
/// 1. Eligibility: exists, active, not the creator, not claimed before
/// 2. Share: the last open slot takes exactly the remainder, otherwise ask the split engine
/// 3. Record the claim and decrement the envelope
/// 4. Pay the claimant; a failed payout reverts the whole transaction
/// 5. Close the envelope when the last slot is taken
pub fn claim_envelope(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    envelope_id: u64,
) -> Result<Response, ContractError> {
    reject_funds(&info, "claim")?;

    let config = CONFIG.load(deps.storage)?;
    let mut envelope = ENVELOPES
        .may_load(deps.storage, envelope_id)?
        .ok_or(ContractError::NotFound { envelope_id })?;

    if !envelope.active || envelope.remaining_count == 0 {
        return Err(ContractError::NotActive { envelope_id });
    }
    if info.sender == envelope.creator {
        return Err(ContractError::SelfClaimForbidden { envelope_id });
    }
    if CLAIMS.has(deps.storage, (envelope_id, &info.sender)) {
        return Err(ContractError::AlreadyClaimed {
            envelope_id,
            claimant: info.sender.to_string(),
        });
    }

    let seed = compute_entropy_seed(&SeedInput {
        chain_id: &env.block.chain_id,
        block_height: env.block.height,
        block_time_nanos: env.block.time.nanos(),
        tx_index: env.transaction.as_ref().map(|tx| tx.index),
        envelope_id,
        claimant: info.sender.as_str(),
        remaining_count: envelope.remaining_count,
        remaining_amount: envelope.remaining_amount.u128(),
    });

    let draw = if envelope.remaining_count == 1 {
        ShareDraw {
            amount: envelope.remaining_amount,
            random_value: None,
        }
    } else {
        next_share(
            envelope.remaining_amount,
            envelope.remaining_count,
            &envelope.policy,
            &seed,
        )?
    };

    let sequence = envelope.claimed_count();
    envelope.remaining_amount = envelope.remaining_amount.checked_sub(draw.amount)?;
    envelope.remaining_count -= 1;
    let completed = envelope.remaining_count == 0;
    if completed {
        envelope.active = false;
    }
    ENVELOPES.save(deps.storage, envelope_id, &envelope)?;

    let record = ClaimRecord {
        envelope_id,
        claimant: info.sender.clone(),
        amount: draw.amount,
        claimed_at: env.block.time,
        sequence,
        random_value: draw.random_value.map(Uint128::new),
    };
    CLAIMS.save(deps.storage, (envelope_id, &info.sender), &record)?;
    CLAIM_ORDER.save(deps.storage, (envelope_id, sequence), &info.sender)?;

    let send_msg = BankMsg::Send {
        to_address: info.sender.to_string(),
        amount: coins(draw.amount.u128(), &config.denom),
    };

    let mut claimed_event = Event::new("envelope_claimed")
        .add_attribute("envelope_id", envelope_id.to_string())
        .add_attribute("claimant", info.sender.to_string())
        .add_attribute("amount", draw.amount.to_string())
        .add_attribute("remaining_count", envelope.remaining_count.to_string())
        .add_attribute("remaining_amount", envelope.remaining_amount.to_string())
        .add_attribute("sequence", sequence.to_string())
        .add_attribute("policy", envelope.policy.as_str());
    if let Some(random_value) = draw.random_value {
        claimed_event = claimed_event
            .add_attribute("seed", hex::encode(seed))
            .add_attribute("random_value", random_value.to_string());
    }

    let mut response = Response::new()
        .add_message(send_msg)
        .set_data(to_json_binary(&draw.amount)?)
        .add_attribute("action", "claim_envelope")
        .add_attribute("envelope_id", envelope_id.to_string())
        .add_attribute("claimant", info.sender.to_string())
        .add_attribute("amount", draw.amount.to_string())
        .add_event(claimed_event);

    if completed {
        response = response.add_event(
            Event::new("envelope_completed")
                .add_attribute("envelope_id", envelope_id.to_string())
                .add_attribute("creator", envelope.creator.to_string())
                .add_attribute("total_amount", envelope.total_amount.to_string())
                .add_attribute("total_count", envelope.total_count.to_string()),
        );
    }

    Ok(response)
}

/// Return the unclaimed remainder to the creator and close the envelope.
///
/// Existing claims are untouched and `remaining_count` keeps its value, so the
/// forfeited slots stay visible in the envelope snapshot.
pub fn refund_envelope(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    envelope_id: u64,
) -> Result<Response, ContractError> {
    reject_funds(&info, "refund")?;

    let config = CONFIG.load(deps.storage)?;
    let mut envelope = ENVELOPES
        .may_load(deps.storage, envelope_id)?
        .ok_or(ContractError::NotFound { envelope_id })?;

    if info.sender != envelope.creator {
        return Err(ContractError::NotCreator { envelope_id });
    }
    // Completion and refund both leave a zero remainder behind.
    if !envelope.active || envelope.remaining_amount.is_zero() {
        return Err(ContractError::NothingToRefund { envelope_id });
    }

    let refund_amount = envelope.remaining_amount;
    envelope.remaining_amount = Uint128::zero();
    envelope.active = false;
    ENVELOPES.save(deps.storage, envelope_id, &envelope)?;

    let send_msg = BankMsg::Send {
        to_address: envelope.creator.to_string(),
        amount: coins(refund_amount.u128(), &config.denom),
    };

    Ok(Response::new()
        .add_message(send_msg)
        .set_data(to_json_binary(&refund_amount)?)
        .add_attribute("action", "refund_envelope")
        .add_attribute("envelope_id", envelope_id.to_string())
        .add_attribute("refund_amount", refund_amount.to_string())
        .add_event(
            Event::new("envelope_refunded")
                .add_attribute("envelope_id", envelope_id.to_string())
                .add_attribute("creator", envelope.creator.to_string())
                .add_attribute("refund_amount", refund_amount.to_string())
                .add_attribute("forfeited_slots", envelope.remaining_count.to_string()),
        ))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let UpdateConfigParams {
        max_count,
        max_message_length,
    } = params;

    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    if let Some(count) = max_count {
        config.max_count = count;
    }
    if let Some(length) = max_message_length {
        config.max_message_length = length;
    }
    validate_config_bounds(config.max_count, config.max_message_length)?;

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_attribute("max_count", config.max_count.to_string())
        .add_attribute("max_message_length", config.max_message_length.to_string()))
}

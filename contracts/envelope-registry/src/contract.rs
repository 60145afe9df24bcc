use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{
    CreateEnvelopeParams, ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, UpdateConfigParams,
};
use crate::query;
use crate::state::{RegistryConfig, CONFIG, NEXT_ENVELOPE_ID};

const CONTRACT_NAME: &str = "crates.io:red-envelope-registry";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    execute::validate_config_bounds(msg.max_count, msg.max_message_length)?;
    if msg.denom.trim().is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "denom must not be empty".to_string(),
        });
    }

    let config = RegistryConfig {
        admin: info.sender.clone(),
        denom: msg.denom,
        max_count: msg.max_count,
        max_message_length: msg.max_message_length,
    };
    CONFIG.save(deps.storage, &config)?;
    NEXT_ENVELOPE_ID.save(deps.storage, &0)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "envelope-registry")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("denom", config.denom))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateEnvelope {
            total_amount,
            total_count,
            policy,
            message,
        } => execute::create_envelope(
            deps,
            env,
            info,
            CreateEnvelopeParams {
                total_amount,
                total_count,
                policy,
                message,
            },
        ),
        ExecuteMsg::ClaimEnvelope { envelope_id } => {
            execute::claim_envelope(deps, env, info, envelope_id)
        }
        ExecuteMsg::RefundEnvelope { envelope_id } => {
            execute::refund_envelope(deps, env, info, envelope_id)
        }
        ExecuteMsg::UpdateConfig {
            max_count,
            max_message_length,
        } => execute::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                max_count,
                max_message_length,
            },
        ),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::EnvelopeInfo { envelope_id } => query::query_envelope_info(deps, envelope_id),
        QueryMsg::Envelopes { start_after, limit } => {
            query::query_envelopes(deps, start_after, limit)
        }
        QueryMsg::EnvelopesByCreator {
            creator,
            start_after,
            limit,
        } => query::query_envelopes_by_creator(deps, creator, start_after, limit),
        QueryMsg::HasClaimed {
            envelope_id,
            account,
        } => query::query_has_claimed(deps, envelope_id, account),
        QueryMsg::ClaimAmount {
            envelope_id,
            account,
        } => query::query_claim_amount(deps, envelope_id, account),
        QueryMsg::Claimers {
            envelope_id,
            start_after,
            limit,
        } => query::query_claimers(deps, envelope_id, start_after, limit),
        QueryMsg::Claims {
            envelope_id,
            start_after,
            limit,
        } => query::query_claims(deps, envelope_id, start_after, limit),
        QueryMsg::TotalEnvelopes {} => query::query_total_envelopes(deps),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}

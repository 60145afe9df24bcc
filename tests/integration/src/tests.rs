//! Integration tests for the red envelope registry.
//!
//! These tests drive the contract only through its `instantiate` /
//! `execute` / `query` entry points using `cosmwasm_std::testing` mocks,
//! and read state back exclusively through query responses.
//!
//! Run:
//! ```bash
//! cargo test -p red-envelope-integration-tests
//! ```

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coins, from_json, Addr, BankMsg, CosmosMsg, MemoryStorage, OwnedDeps, Response, Uint128,
};
use red_envelope_common::split::next_share;
use red_envelope_common::types::SplitPolicy;
use red_envelope_registry::contract::{execute, instantiate, query};
use red_envelope_registry::msg::{
    ClaimersResponse, ClaimsResponse, CreatorEnvelopesResponse, EnvelopeInfoResponse,
    EnvelopesResponse, ExecuteMsg, InstantiateMsg, QueryMsg,
};
use red_envelope_registry::ContractError;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

type Deps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Constants ───

const DENOM: &str = "uatom";

// ─── Helpers ───

fn setup_registry() -> Deps {
    let mut deps = mock_dependencies();
    let admin = deps.api.addr_make("admin");
    let info = message_info(&admin, &[]);
    instantiate(
        deps.as_mut(),
        mock_env(),
        info,
        InstantiateMsg {
            denom: DENOM.to_string(),
            max_count: 50,
            max_message_length: 128,
        },
    )
    .unwrap();
    deps
}

fn create_envelope(
    deps: &mut Deps,
    creator: &Addr,
    amount: u128,
    count: u32,
    policy: SplitPolicy,
) -> Result<u64, ContractError> {
    let info = message_info(creator, &coins(amount, DENOM));
    let res = execute(
        deps.as_mut(),
        mock_env(),
        info,
        ExecuteMsg::CreateEnvelope {
            total_amount: Uint128::new(amount),
            total_count: count,
            policy,
            message: "恭喜发财".to_string(),
        },
    )?;
    Ok(from_json(res.data.unwrap()).unwrap())
}

fn claim_envelope(
    deps: &mut Deps,
    claimant: &Addr,
    envelope_id: u64,
) -> Result<Response, ContractError> {
    let info = message_info(claimant, &[]);
    execute(
        deps.as_mut(),
        mock_env(),
        info,
        ExecuteMsg::ClaimEnvelope { envelope_id },
    )
}

fn refund_envelope(
    deps: &mut Deps,
    caller: &Addr,
    envelope_id: u64,
) -> Result<Response, ContractError> {
    let info = message_info(caller, &[]);
    execute(
        deps.as_mut(),
        mock_env(),
        info,
        ExecuteMsg::RefundEnvelope { envelope_id },
    )
}

fn query_as<T: DeserializeOwned>(deps: &Deps, msg: QueryMsg) -> T {
    from_json(query(deps.as_ref(), mock_env(), msg).unwrap()).unwrap()
}

fn envelope_info(deps: &Deps, envelope_id: u64) -> EnvelopeInfoResponse {
    query_as(deps, QueryMsg::EnvelopeInfo { envelope_id })
}

/// Amount paid out by a claim or refund response, checked against its bank message.
fn paid_to(res: &Response, recipient: &Addr) -> Uint128 {
    let sends: Vec<_> = res
        .messages
        .iter()
        .filter_map(|m| match &m.msg {
            CosmosMsg::Bank(BankMsg::Send { to_address, amount }) => {
                Some((to_address.clone(), amount.clone()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(sends.len(), 1, "expected exactly one bank send");
    let (to, amount) = &sends[0];
    assert_eq!(to, recipient.as_str());
    assert_eq!(amount, &coins(amount[0].amount.u128(), DENOM));
    amount[0].amount
}

fn event_attr(res: &Response, ty: &str, key: &str) -> Option<String> {
    res.events
        .iter()
        .find(|e| e.ty == ty)
        .and_then(|e| e.attributes.iter().find(|a| a.key == key))
        .map(|a| a.value.clone())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_even_envelope_full_lifecycle() {
    let mut deps = setup_registry();
    let creator = deps.api.addr_make("creator");
    let id = create_envelope(&mut deps, &creator, 10, 3, SplitPolicy::Even).unwrap();
    assert_eq!(id, 0);

    let info = envelope_info(&deps, id);
    assert_eq!(info.total_amount, Uint128::new(10));
    assert_eq!(info.remaining_amount, Uint128::new(10));
    assert_eq!(info.total_count, 3);
    assert_eq!(info.remaining_count, 3);
    assert!(!info.is_random);
    assert!(info.is_active);
    assert_eq!(info.message, "恭喜发财");

    let mut shares = vec![];
    let mut claimants = vec![];
    for i in 0..3 {
        let claimant = deps.api.addr_make(&format!("user{i}"));
        let res = claim_envelope(&mut deps, &claimant, id).unwrap();
        let share = paid_to(&res, &claimant);
        assert_eq!(
            event_attr(&res, "envelope_claimed", "amount"),
            Some(share.to_string())
        );
        shares.push(share.u128());
        claimants.push(claimant);

        let info = envelope_info(&deps, id);
        let paid: u128 = shares.iter().sum();
        assert_eq!(info.total_amount.u128(), info.remaining_amount.u128() + paid);
    }
    assert_eq!(shares, vec![3, 3, 4]);

    let info = envelope_info(&deps, id);
    assert_eq!(info.remaining_amount, Uint128::zero());
    assert_eq!(info.remaining_count, 0);
    assert!(!info.is_active);

    let claimers: ClaimersResponse = query_as(
        &deps,
        QueryMsg::Claimers {
            envelope_id: id,
            start_after: None,
            limit: None,
        },
    );
    assert_eq!(claimers.claimers, claimants);

    for (claimant, share) in claimants.iter().zip(&shares) {
        let amount: Uint128 = query_as(
            &deps,
            QueryMsg::ClaimAmount {
                envelope_id: id,
                account: claimant.to_string(),
            },
        );
        assert_eq!(amount.u128(), *share);
    }
}

#[test]
fn test_completion_event_only_on_last_claim() {
    let mut deps = setup_registry();
    let creator = deps.api.addr_make("creator");
    let id = create_envelope(&mut deps, &creator, 9, 3, SplitPolicy::Even).unwrap();

    for i in 0..3 {
        let claimant = deps.api.addr_make(&format!("user{i}"));
        let res = claim_envelope(&mut deps, &claimant, id).unwrap();
        assert_eq!(paid_to(&res, &claimant), Uint128::new(3));
        let completed = event_attr(&res, "envelope_completed", "total_amount");
        if i == 2 {
            assert_eq!(completed, Some("9".to_string()));
            assert_eq!(
                event_attr(&res, "envelope_completed", "creator"),
                Some(creator.to_string())
            );
        } else {
            assert_eq!(completed, None);
        }
    }
}

#[test]
fn test_random_envelope_drains_exactly() {
    let mut deps = setup_registry();
    let creator = deps.api.addr_make("creator");
    let id = create_envelope(&mut deps, &creator, 100, 5, SplitPolicy::Random).unwrap();
    assert!(envelope_info(&deps, id).is_random);

    let mut total = 0u128;
    for i in 0..5 {
        let claimant = deps.api.addr_make(&format!("user{i}"));
        let res = claim_envelope(&mut deps, &claimant, id).unwrap();
        let share = paid_to(&res, &claimant).u128();
        assert!(share >= 1);
        total += share;

        let info = envelope_info(&deps, id);
        assert!(info.remaining_amount.u128() >= u128::from(info.remaining_count));
    }
    assert_eq!(total, 100);

    let claims: ClaimsResponse = query_as(
        &deps,
        QueryMsg::Claims {
            envelope_id: id,
            start_after: None,
            limit: None,
        },
    );
    assert_eq!(claims.claims.len(), 5);
    assert_eq!(
        claims.claims.iter().map(|c| c.amount.u128()).sum::<u128>(),
        100
    );
    for (i, record) in claims.claims.iter().enumerate() {
        assert_eq!(record.sequence as usize, i);
        assert_eq!(record.random_value.is_some(), i < 4);
    }
}

#[test]
fn test_random_share_is_auditable_from_event() {
    let mut deps = setup_registry();
    let creator = deps.api.addr_make("creator");
    let id = create_envelope(&mut deps, &creator, 1_000, 4, SplitPolicy::Random).unwrap();

    let claimant = deps.api.addr_make("auditor");
    let res = claim_envelope(&mut deps, &claimant, id).unwrap();
    let share = paid_to(&res, &claimant);

    // Anyone can recompute the share from the published seed.
    let seed_hex = event_attr(&res, "envelope_claimed", "seed").unwrap();
    let seed: [u8; 32] = hex::decode(seed_hex).unwrap().try_into().unwrap();
    let recomputed = next_share(Uint128::new(1_000), 4, &SplitPolicy::Random, &seed).unwrap();
    assert_eq!(recomputed.amount, share);
    assert_eq!(
        event_attr(&res, "envelope_claimed", "random_value"),
        recomputed.random_value.map(|v| v.to_string())
    );
}

#[test]
fn test_same_block_claimants_get_distinct_seeds() {
    let mut deps = setup_registry();
    let creator = deps.api.addr_make("creator");
    let first = create_envelope(&mut deps, &creator, 1_000_000, 10, SplitPolicy::Random).unwrap();
    let second = create_envelope(&mut deps, &creator, 1_000_000, 10, SplitPolicy::Random).unwrap();

    let alice = deps.api.addr_make("alice");
    let bob = deps.api.addr_make("bob");
    let res_a = claim_envelope(&mut deps, &alice, first).unwrap();
    let res_b = claim_envelope(&mut deps, &bob, second).unwrap();
    let seed_a = event_attr(&res_a, "envelope_claimed", "seed");
    let seed_b = event_attr(&res_b, "envelope_claimed", "seed");
    assert!(seed_a.is_some());
    assert_ne!(seed_a, seed_b);
}

#[test]
fn test_insufficient_amount_scenario() {
    let mut deps = setup_registry();
    let creator = deps.api.addr_make("creator");
    let err = create_envelope(&mut deps, &creator, 4, 5, SplitPolicy::Random).unwrap_err();
    assert!(
        format!("{:?}", err).contains("InsufficientAmount"),
        "Expected InsufficientAmount, got: {:?}",
        err
    );

    let total: u64 = query_as(&deps, QueryMsg::TotalEnvelopes {});
    assert_eq!(total, 0);
}

#[test]
fn test_refund_after_two_of_five_claims() {
    let mut deps = setup_registry();
    let creator = deps.api.addr_make("creator");
    let id = create_envelope(&mut deps, &creator, 500, 5, SplitPolicy::Random).unwrap();

    let mut claimed = Uint128::zero();
    for i in 0..2 {
        let claimant = deps.api.addr_make(&format!("user{i}"));
        let res = claim_envelope(&mut deps, &claimant, id).unwrap();
        claimed += paid_to(&res, &claimant);
    }

    // Non-creators cannot close it.
    let outsider = deps.api.addr_make("user0");
    let err = refund_envelope(&mut deps, &outsider, id).unwrap_err();
    assert!(matches!(err, ContractError::NotCreator { .. }));

    let res = refund_envelope(&mut deps, &creator, id).unwrap();
    let refunded = paid_to(&res, &creator);
    assert_eq!(refunded + claimed, Uint128::new(500));
    assert_eq!(
        event_attr(&res, "envelope_refunded", "refund_amount"),
        Some(refunded.to_string())
    );
    assert_eq!(
        event_attr(&res, "envelope_refunded", "forfeited_slots"),
        Some("3".to_string())
    );

    let info = envelope_info(&deps, id);
    assert!(!info.is_active);
    assert_eq!(info.remaining_amount, Uint128::zero());
    assert_eq!(info.remaining_count, 3);

    let late = deps.api.addr_make("late");
    let err = claim_envelope(&mut deps, &late, id).unwrap_err();
    assert!(matches!(err, ContractError::NotActive { .. }));

    let err = refund_envelope(&mut deps, &creator, id).unwrap_err();
    assert!(matches!(err, ContractError::NothingToRefund { .. }));

    // prior claims are still on record
    let claimers: ClaimersResponse = query_as(
        &deps,
        QueryMsg::Claimers {
            envelope_id: id,
            start_after: None,
            limit: None,
        },
    );
    assert_eq!(claimers.claimers.len(), 2);
}

#[test]
fn test_envelope_listing_and_pagination() {
    let mut deps = setup_registry();
    let alice = deps.api.addr_make("alice");
    let bob = deps.api.addr_make("bob");

    for i in 0..5u128 {
        let creator = if i % 2 == 0 { &alice } else { &bob };
        create_envelope(&mut deps, creator, 10 + i, 2, SplitPolicy::Even).unwrap();
    }

    let total: u64 = query_as(&deps, QueryMsg::TotalEnvelopes {});
    assert_eq!(total, 5);

    let page: EnvelopesResponse = query_as(
        &deps,
        QueryMsg::Envelopes {
            start_after: None,
            limit: Some(2),
        },
    );
    assert_eq!(page.envelopes.iter().map(|e| e.id).collect::<Vec<_>>(), vec![0, 1]);

    let page: EnvelopesResponse = query_as(
        &deps,
        QueryMsg::Envelopes {
            start_after: Some(1),
            limit: Some(10),
        },
    );
    assert_eq!(page.envelopes.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 3, 4]);

    let by_alice: CreatorEnvelopesResponse = query_as(
        &deps,
        QueryMsg::EnvelopesByCreator {
            creator: alice.to_string(),
            start_after: None,
            limit: None,
        },
    );
    assert_eq!(by_alice.envelope_ids, vec![0, 2, 4]);

    let by_bob: CreatorEnvelopesResponse = query_as(
        &deps,
        QueryMsg::EnvelopesByCreator {
            creator: bob.to_string(),
            start_after: Some(1),
            limit: None,
        },
    );
    assert_eq!(by_bob.envelope_ids, vec![3]);
}

#[test]
fn test_claimers_pagination_follows_claim_order() {
    let mut deps = setup_registry();
    let creator = deps.api.addr_make("creator");
    let id = create_envelope(&mut deps, &creator, 100, 6, SplitPolicy::Even).unwrap();

    let mut expected = vec![];
    for name in ["zed", "amy", "kim", "bo"] {
        let claimant = deps.api.addr_make(name);
        claim_envelope(&mut deps, &claimant, id).unwrap();
        expected.push(claimant);
    }

    let page: ClaimersResponse = query_as(
        &deps,
        QueryMsg::Claimers {
            envelope_id: id,
            start_after: Some(1),
            limit: Some(2),
        },
    );
    assert_eq!(page.claimers, expected[2..4].to_vec());
}

#[test]
fn test_queries_on_missing_envelope_fail() {
    let deps = setup_registry();
    let anyone = deps.api.addr_make("anyone");

    for msg in [
        QueryMsg::EnvelopeInfo { envelope_id: 3 },
        QueryMsg::HasClaimed {
            envelope_id: 3,
            account: anyone.to_string(),
        },
        QueryMsg::ClaimAmount {
            envelope_id: 3,
            account: anyone.to_string(),
        },
        QueryMsg::Claimers {
            envelope_id: 3,
            start_after: None,
            limit: None,
        },
    ] {
        let err = query(deps.as_ref(), mock_env(), msg).unwrap_err();
        assert!(
            format!("{:?}", err).contains("NotFound"),
            "Expected NotFound, got: {:?}",
            err
        );
    }
}

#[test]
fn test_many_random_envelopes_conserve_value() {
    let mut deps = setup_registry();
    let creator = deps.api.addr_make("creator");

    for round in 0..10u32 {
        let count = 2 + round % 7;
        let amount = u128::from(count) + u128::from(round) * 37;
        let id = create_envelope(&mut deps, &creator, amount, count, SplitPolicy::Random).unwrap();

        let mut paid = 0u128;
        for slot in 0..count {
            let tag: [u8; 32] = Sha256::digest(format!("{round}-{slot}")).into();
            let claimant = deps.api.addr_make(&hex::encode(&tag[..8]));
            let res = claim_envelope(&mut deps, &claimant, id).unwrap();
            paid += paid_to(&res, &claimant).u128();
        }
        assert_eq!(paid, amount);
        let info = envelope_info(&deps, id);
        assert_eq!(info.remaining_amount, Uint128::zero());
        assert!(!info.is_active);
    }
}

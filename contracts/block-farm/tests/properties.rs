#![allow(clippy::arithmetic_side_effects)]
//! Property-based tests for pool accounting.
//!
//! Invariants tested:
//! - `total_staked` always equals the sum of every user's staked amount
//! - `acc_reward_per_share` never decreases
//! - settling twice in one block changes nothing
//! - the farm never pays or owes more than `reward_per_block` × blocks elapsed

use block_farm::{FarmContract, FarmContractClient};
use proptest::prelude::*;
use soroban_sdk::testutils::{Address as _, Ledger, LedgerInfo};
use soroban_sdk::{token, Address, Env};

const RATE: i128 = 10_000_000;
const FUNDING: i128 = 1_000_000 * RATE;
const USERS: usize = 3;
const USER_BALANCE: i128 = 1_000_000_000_000;

// ── Helpers ───────────────────────────────────────────────────────────────────

struct Farm {
    env: Env,
    contract_id: Address,
    users: [Address; USERS],
}

impl Farm {
    fn client(&self) -> FarmContractClient<'_> {
        FarmContractClient::new(&self.env, &self.contract_id)
    }

    fn advance(&self, blocks: u32) {
        self.env.ledger().with_mut(|li| li.sequence_number += blocks);
    }

    fn staked_sum(&self) -> i128 {
        let client = self.client();
        self.users
            .iter()
            .map(|u| client.get_user_stake(&0, u).amount)
            .sum()
    }
}

/// One pool, window open, three users each holding `USER_BALANCE` stake tokens.
fn setup() -> Farm {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set(LedgerInfo {
        timestamp: 1000,
        protocol_version: 22,
        sequence_number: 100,
        network_id: [0u8; 32],
        base_reserve: 10,
        min_temp_entry_ttl: 100_000,
        min_persistent_entry_ttl: 100_000,
        max_entry_ttl: 10_000_000,
    });

    let admin = Address::generate(&env);
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(FarmContract, ());

    let client = FarmContractClient::new(&env, &contract_id);
    client.initialize(&admin, &reward_token, &RATE, &u32::MAX);
    client.add_pool(&admin, &stake_token, &100, &false);
    client.open_reward_window(&admin);
    token::StellarAssetClient::new(&env, &reward_token).mint(&contract_id, &FUNDING);

    let users = [
        Address::generate(&env),
        Address::generate(&env),
        Address::generate(&env),
    ];
    let minter = token::StellarAssetClient::new(&env, &stake_token);
    for user in users.iter() {
        minter.mint(user, &USER_BALANCE);
    }

    Farm {
        env,
        contract_id,
        users,
    }
}

#[derive(Clone, Debug)]
enum Op {
    Deposit(usize, i128),
    Withdraw(usize, i128),
    Claim(usize),
    Advance(u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..USERS, 1i128..1_000_000_000).prop_map(|(u, a)| Op::Deposit(u, a)),
        (0..USERS, 0i128..1_000_000_000).prop_map(|(u, a)| Op::Withdraw(u, a)),
        (0..USERS).prop_map(Op::Claim),
        (0u32..20).prop_map(Op::Advance),
    ]
}

fn apply(farm: &Farm, op: &Op) {
    let client = farm.client();
    match *op {
        Op::Deposit(u, amount) => client.deposit(&farm.users[u], &0, &amount),
        Op::Withdraw(u, amount) => {
            let staked = client.get_user_stake(&0, &farm.users[u]).amount;
            client.withdraw(&farm.users[u], &0, &amount.min(staked));
        }
        Op::Claim(u) => {
            client.claim_reward(&farm.users[u], &0);
        }
        Op::Advance(blocks) => farm.advance(blocks),
    }
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn total_staked_matches_user_sum(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let farm = setup();
        for op in ops.iter() {
            apply(&farm, op);
            prop_assert_eq!(farm.client().get_pool(&0).total_staked, farm.staked_sum());
        }
    }

    #[test]
    fn accumulator_never_decreases(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let farm = setup();
        let mut last_acc = 0i128;
        let mut last_block = 0u32;
        for op in ops.iter() {
            apply(&farm, op);
            let pool = farm.client().settle_pool(&0);
            prop_assert!(pool.acc_reward_per_share >= last_acc);
            prop_assert!(pool.last_settled_block >= last_block);
            last_acc = pool.acc_reward_per_share;
            last_block = pool.last_settled_block;
        }
    }

    #[test]
    fn settle_twice_in_block_is_noop(
        ops in prop::collection::vec(op_strategy(), 1..20),
        gap in 0u32..50,
    ) {
        let farm = setup();
        for op in ops.iter() {
            apply(&farm, op);
        }
        farm.advance(gap);

        let client = farm.client();
        let first = client.settle_pool(&0);
        let second = client.settle_pool(&0);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn never_distributes_more_than_emitted(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let farm = setup();
        let mut blocks: i128 = 0;
        for op in ops.iter() {
            if let Op::Advance(n) = op {
                blocks += *n as i128;
            }
            apply(&farm, op);
        }

        let client = farm.client();
        let paid = FUNDING - client.reward_balance();
        let owed: i128 = farm
            .users
            .iter()
            .map(|u| client.pending_reward(&0, u))
            .sum();
        prop_assert!(owed >= 0);
        prop_assert!(paid + owed <= RATE * blocks);
    }
}

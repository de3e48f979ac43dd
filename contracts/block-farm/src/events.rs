use soroban_sdk::{contracttype, symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the farm is bootstrapped.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_token: Address,
    pub reward_per_block: i128,
    pub max_reward_block: u32,
    pub block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pool_id: u32,
    pub stake_token: Address,
    pub alloc_weight: u64,
    pub total_alloc_weight: u64,
    pub block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolWeightSetEvent {
    pub pool_id: u32,
    pub old_weight: u64,
    pub new_weight: u64,
    pub total_alloc_weight: u64,
    pub block: u32,
}

/// Fired when a user adds stake to a pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub new_user_amount: i128,
    pub block: u32,
}

/// Fired when a user takes stake out, with any reward paid alongside it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub remaining: i128,
    pub reward_paid: i128,
    pub block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub block: u32,
}

/// Fired when accrued reward is discarded on withdrawal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardForfeitedEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawnEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRateSetEvent {
    pub old_rate: i128,
    pub new_rate: i128,
    pub block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MaxRewardBlockSetEvent {
    pub old_max: u32,
    pub new_max: u32,
    pub block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardWindowOpenedEvent {
    pub block: u32,
}

/// Fired when the administrator sweeps the reward balance.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsRedeemedEvent {
    pub to: Address,
    pub amount: i128,
    pub block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundedEvent {
    pub funder: Address,
    pub amount: i128,
    pub block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminSetEvent {
    pub old_admin: Address,
    pub new_admin: Address,
    pub block: u32,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    reward_token: Address,
    reward_per_block: i128,
    max_reward_block: u32,
) {
    env.events().publish(
        (symbol_short!("INIT"), admin.clone()),
        InitializedEvent {
            admin,
            reward_token,
            reward_per_block,
            max_reward_block,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_added(
    env: &Env,
    pool_id: u32,
    stake_token: Address,
    alloc_weight: u64,
    total_alloc_weight: u64,
) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), pool_id),
        PoolAddedEvent {
            pool_id,
            stake_token,
            alloc_weight,
            total_alloc_weight,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_weight_set(
    env: &Env,
    pool_id: u32,
    old_weight: u64,
    new_weight: u64,
    total_alloc_weight: u64,
) {
    env.events().publish(
        (symbol_short!("POOL_WGT"), pool_id),
        PoolWeightSetEvent {
            pool_id,
            old_weight,
            new_weight,
            total_alloc_weight,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_deposited(
    env: &Env,
    user: Address,
    pool_id: u32,
    amount: i128,
    new_user_amount: i128,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), user.clone(), pool_id),
        DepositedEvent {
            user,
            pool_id,
            amount,
            new_user_amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    user: Address,
    pool_id: u32,
    amount: i128,
    remaining: i128,
    reward_paid: i128,
) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), user.clone(), pool_id),
        WithdrawnEvent {
            user,
            pool_id,
            amount,
            remaining,
            reward_paid,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, user: Address, pool_id: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("CLAIMED"), user.clone(), pool_id),
        RewardClaimedEvent {
            user,
            pool_id,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_reward_forfeited(env: &Env, user: Address, pool_id: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("FORFEIT"), user.clone(), pool_id),
        RewardForfeitedEvent {
            user,
            pool_id,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_emergency_withdrawn(env: &Env, user: Address, pool_id: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), user.clone(), pool_id),
        EmergencyWithdrawnEvent {
            user,
            pool_id,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_reward_rate_set(env: &Env, old_rate: i128, new_rate: i128) {
    env.events().publish(
        (symbol_short!("RATE_SET"),),
        RewardRateSetEvent {
            old_rate,
            new_rate,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_max_reward_block_set(env: &Env, old_max: u32, new_max: u32) {
    env.events().publish(
        (symbol_short!("MAXBLK"),),
        MaxRewardBlockSetEvent {
            old_max,
            new_max,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_reward_window_opened(env: &Env) {
    env.events().publish(
        (symbol_short!("WINDOW"),),
        RewardWindowOpenedEvent {
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_rewards_redeemed(env: &Env, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("REDEEM"), to.clone()),
        RewardsRedeemedEvent {
            to,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_funded(env: &Env, funder: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("FUNDED"), funder.clone()),
        FundedEvent {
            funder,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_set(env: &Env, old_admin: Address, new_admin: Address) {
    env.events().publish(
        (symbol_short!("ADMIN"), new_admin.clone()),
        AdminSetEvent {
            old_admin,
            new_admin,
            block: env.ledger().sequence(),
        },
    );
}

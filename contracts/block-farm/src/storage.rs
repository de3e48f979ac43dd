use soroban_sdk::{contracttype, Address, Env};

use crate::errors::ContractError;

// Storage TTL constants (in ledgers, ~5 seconds each)
const INSTANCE_TTL_THRESHOLD: u32 = 17_280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518_400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17_280; // ~1 day
const PERSISTENT_TTL_EXTEND: u32 = 518_400; // ~30 days

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
    PoolCount,
    Pool(u32),
    PoolByToken(Address),
    Stake(u32, Address),
}

/// Farm-wide parameters. One record per contract instance.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FarmConfig {
    pub admin: Address,
    pub reward_token: Address,
    pub reward_per_block: i128,
    pub total_alloc_weight: u64,
    pub max_reward_block: u32,
    pub window_open: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub stake_token: Address,
    pub alloc_weight: u64,
    pub last_settled_block: u32,
    pub acc_reward_per_share: i128,
    pub total_staked: i128,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserStake {
    pub amount: i128,
    pub reward_debt: i128,
    pub pending_reward: i128,
}

// --- Instance storage helpers (Config, PoolCount) ---

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<FarmConfig, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_config(env: &Env, config: &FarmConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_pool_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::PoolCount)
        .unwrap_or(0)
}

pub fn set_pool_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::PoolCount, &count);
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

// --- Persistent storage helpers (Pool, PoolByToken, Stake) ---

pub fn get_pool(env: &Env, pool_id: u32) -> Result<Pool, ContractError> {
    let key = DataKey::Pool(pool_id);
    let pool: Pool = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::PoolNotFound)?;
    extend_persistent(env, &key);
    Ok(pool)
}

pub fn set_pool(env: &Env, pool_id: u32, pool: &Pool) {
    let key = DataKey::Pool(pool_id);
    env.storage().persistent().set(&key, pool);
    extend_persistent(env, &key);
}

pub fn has_pool_for_token(env: &Env, stake_token: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::PoolByToken(stake_token.clone()))
}

pub fn set_pool_for_token(env: &Env, stake_token: &Address, pool_id: u32) {
    let key = DataKey::PoolByToken(stake_token.clone());
    env.storage().persistent().set(&key, &pool_id);
    extend_persistent(env, &key);
}

/// Missing entries read as an empty stake.
pub fn get_stake(env: &Env, pool_id: u32, user: &Address) -> UserStake {
    let key = DataKey::Stake(pool_id, user.clone());
    match env.storage().persistent().get::<_, UserStake>(&key) {
        Some(stake) => {
            extend_persistent(env, &key);
            stake
        }
        None => UserStake::default(),
    }
}

pub fn set_stake(env: &Env, pool_id: u32, user: &Address, stake: &UserStake) {
    let key = DataKey::Stake(pool_id, user.clone());
    env.storage().persistent().set(&key, stake);
    extend_persistent(env, &key);
}

fn extend_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

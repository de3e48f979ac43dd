//! Per (pool, user) stake bookkeeping.
//!
//! Every mutation settles the pool first, folds whatever the user earned since
//! their last checkpoint into `pending_reward`, and then re-prices
//! `reward_debt` against the new amount. Token movement is left to the caller.

use soroban_sdk::{Address, Env};

use crate::errors::ContractError;
use crate::rewards;
use crate::storage::{self, FarmConfig, Pool, UserStake};

/// Result of a withdrawal: what leaves the farm for the user and what was lost.
pub struct WithdrawOutcome {
    pub remaining: i128,
    pub released_reward: i128,
    pub forfeited_reward: i128,
}

/// Settle the pool and fold the user's accrued delta into `pending_reward`.
fn checkpoint(
    env: &Env,
    config: &FarmConfig,
    pool_id: u32,
    user: &Address,
) -> Result<(Pool, UserStake), ContractError> {
    let pool = rewards::settle_pool(env, config, pool_id)?;
    let mut stake = storage::get_stake(env, pool_id, user);
    stake.pending_reward = rewards::calculate_pending(&pool, &stake)?;
    Ok((pool, stake))
}

fn commit(
    env: &Env,
    pool_id: u32,
    user: &Address,
    pool: &Pool,
    stake: &mut UserStake,
) -> Result<(), ContractError> {
    stake.reward_debt = rewards::compute_reward_debt(stake.amount, pool.acc_reward_per_share)?;
    storage::set_pool(env, pool_id, pool);
    storage::set_stake(env, pool_id, user, stake);
    Ok(())
}

/// Entitlement as of the current block, using a projected accumulator.
pub fn pending_of(
    env: &Env,
    config: &FarmConfig,
    pool_id: u32,
    user: &Address,
) -> Result<i128, ContractError> {
    let pool = rewards::project_pool(env, config, pool_id)?;
    let stake = storage::get_stake(env, pool_id, user);
    rewards::calculate_pending(&pool, &stake)
}

pub fn on_deposit(
    env: &Env,
    config: &FarmConfig,
    pool_id: u32,
    user: &Address,
    amount: i128,
) -> Result<UserStake, ContractError> {
    if amount <= 0 {
        return Err(ContractError::DepositZero);
    }

    let (mut pool, mut stake) = checkpoint(env, config, pool_id, user)?;
    stake.amount = stake
        .amount
        .checked_add(amount)
        .ok_or(ContractError::MathOverflow)?;
    pool.total_staked = pool
        .total_staked
        .checked_add(amount)
        .ok_or(ContractError::MathOverflow)?;
    commit(env, pool_id, user, &pool, &mut stake)?;

    Ok(stake)
}

/// Reduce the user's stake by `amount`.
///
/// With the reward window open the user's whole `pending_reward` is released
/// alongside the principal. With it closed, `pending_reward` is forfeited.
pub fn on_withdraw(
    env: &Env,
    config: &FarmConfig,
    pool_id: u32,
    user: &Address,
    amount: i128,
) -> Result<WithdrawOutcome, ContractError> {
    if amount < 0 {
        return Err(ContractError::InvalidAmount);
    }

    let (mut pool, mut stake) = checkpoint(env, config, pool_id, user)?;
    if amount > stake.amount {
        return Err(ContractError::InsufficientStake);
    }

    stake.amount -= amount;
    pool.total_staked -= amount;

    let reward = stake.pending_reward;
    stake.pending_reward = 0;
    commit(env, pool_id, user, &pool, &mut stake)?;

    let (released_reward, forfeited_reward) = if config.window_open {
        (reward, 0)
    } else {
        (0, reward)
    };

    Ok(WithdrawOutcome {
        remaining: stake.amount,
        released_reward,
        forfeited_reward,
    })
}

/// Take the user's whole entitlement. Fails while the window is closed, in
/// which case nothing is forfeited.
pub fn on_claim(
    env: &Env,
    config: &FarmConfig,
    pool_id: u32,
    user: &Address,
) -> Result<i128, ContractError> {
    let (pool, mut stake) = checkpoint(env, config, pool_id, user)?;
    if !config.window_open {
        return Err(ContractError::RewardsLocked);
    }

    let reward = stake.pending_reward;
    stake.pending_reward = 0;
    commit(env, pool_id, user, &pool, &mut stake)?;

    Ok(reward)
}

/// Drop the whole position. Returns `(principal, forfeited_reward)`.
///
/// The principal is released even when the forfeited reward cannot be
/// computed; the forfeit then reports only the carried `pending_reward`.
pub fn on_emergency_withdraw(
    env: &Env,
    config: &FarmConfig,
    pool_id: u32,
    user: &Address,
) -> Result<(i128, i128), ContractError> {
    let mut pool = rewards::settle_pool(env, config, pool_id)?;
    let mut stake = storage::get_stake(env, pool_id, user);

    let principal = stake.amount;
    let forfeited = rewards::calculate_pending(&pool, &stake).unwrap_or(stake.pending_reward);
    pool.total_staked -= principal;
    stake.amount = 0;
    stake.pending_reward = 0;
    commit(env, pool_id, user, &pool, &mut stake)?;

    Ok((principal, forfeited))
}

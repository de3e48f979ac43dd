use soroban_sdk::Env;

use crate::errors::ContractError;
use crate::storage::{self, FarmConfig, Pool, UserStake};

/// Precision multiplier for accumulated reward per share (1e12).
///
/// Stellar assets use 7 decimals, so with 1e12 the per-block truncation stays
/// far below one base unit for any realistic pool size. The accumulator of a
/// thinly staked pool can still grow large, so every product is checked and an
/// overflow surfaces as `MathOverflow`.
pub const SCALE: i128 = 1_000_000_000_000;

/// Reward owed to a pool for `elapsed` blocks at the current rate and weight.
/// Integer division truncates; the remainder is never attributed.
pub fn pool_reward(
    config: &FarmConfig,
    pool: &Pool,
    elapsed: u32,
) -> Result<i128, ContractError> {
    if config.total_alloc_weight == 0 {
        return Ok(0);
    }
    config
        .reward_per_block
        .checked_mul(elapsed as i128)
        .and_then(|r| r.checked_mul(pool.alloc_weight as i128))
        .map(|r| r / config.total_alloc_weight as i128)
        .ok_or(ContractError::MathOverflow)
}

/// Advance `pool` to `current_block`, clamped to the reward window end.
/// Never moves `last_settled_block` backwards and never accrues for an empty pool.
pub fn accrue(
    config: &FarmConfig,
    pool: &mut Pool,
    current_block: u32,
) -> Result<(), ContractError> {
    let effective = current_block.min(config.max_reward_block);

    if effective <= pool.last_settled_block || pool.total_staked == 0 {
        pool.last_settled_block = pool.last_settled_block.max(effective);
        return Ok(());
    }

    let elapsed = effective - pool.last_settled_block;
    let reward = pool_reward(config, pool, elapsed)?;
    pool.acc_reward_per_share = reward
        .checked_mul(SCALE)
        .map(|r| r / pool.total_staked)
        .and_then(|delta| pool.acc_reward_per_share.checked_add(delta))
        .ok_or(ContractError::MathOverflow)?;
    pool.last_settled_block = effective;
    Ok(())
}

/// Bring the pool's accumulator current and persist it.
/// Returns the settled pool.
pub fn settle_pool(env: &Env, config: &FarmConfig, pool_id: u32) -> Result<Pool, ContractError> {
    let mut pool = storage::get_pool(env, pool_id)?;
    accrue(config, &mut pool, env.ledger().sequence())?;
    storage::set_pool(env, pool_id, &pool);
    Ok(pool)
}

/// Settle every registered pool in index order.
pub fn settle_all(env: &Env, config: &FarmConfig) -> Result<(), ContractError> {
    for pool_id in 0..storage::get_pool_count(env) {
        settle_pool(env, config, pool_id)?;
    }
    Ok(())
}

/// Move every pool's checkpoint forward to `block` without accruing, so the
/// blocks in between never earn. Checkpoints already past `block` stay put.
pub fn skip_unrewarded(env: &Env, block: u32) -> Result<(), ContractError> {
    for pool_id in 0..storage::get_pool_count(env) {
        let mut pool = storage::get_pool(env, pool_id)?;
        if block > pool.last_settled_block {
            pool.last_settled_block = block;
            storage::set_pool(env, pool_id, &pool);
        }
    }
    Ok(())
}

/// View-only: the pool as it would look after settling at the current block,
/// without writing to storage.
pub fn project_pool(
    env: &Env,
    config: &FarmConfig,
    pool_id: u32,
) -> Result<Pool, ContractError> {
    let mut pool = storage::get_pool(env, pool_id)?;
    accrue(config, &mut pool, env.ledger().sequence())?;
    Ok(pool)
}

/// Reward accrued by `stake` since its last checkpoint, not counting
/// `pending_reward`.
pub fn unsettled(pool: &Pool, stake: &UserStake) -> Result<i128, ContractError> {
    Ok(compute_reward_debt(stake.amount, pool.acc_reward_per_share)? - stake.reward_debt)
}

/// Total entitlement of `stake` against the given (settled or projected) pool.
pub fn calculate_pending(pool: &Pool, stake: &UserStake) -> Result<i128, ContractError> {
    stake
        .pending_reward
        .checked_add(unsettled(pool, stake)?)
        .ok_or(ContractError::MathOverflow)
}

/// Compute the reward_debt for a staker given their staked amount and current accumulator.
///
/// Equal to `amount * acc_reward_per_share / SCALE` rounded down. The
/// accumulator is split at `SCALE` so the product only overflows when the
/// result itself does not fit in i128.
pub fn compute_reward_debt(
    amount: i128,
    acc_reward_per_share: i128,
) -> Result<i128, ContractError> {
    let whole = acc_reward_per_share / SCALE;
    let frac = acc_reward_per_share % SCALE;
    amount
        .checked_mul(whole)
        .and_then(|w| amount.checked_mul(frac).and_then(|f| w.checked_add(f / SCALE)))
        .ok_or(ContractError::MathOverflow)
}

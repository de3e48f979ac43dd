#![no_std]

mod errors;
mod events;
mod ledger;
mod rewards;
mod storage;


pub use errors::ContractError;
pub use rewards::SCALE;
pub use storage::{FarmConfig, Pool, UserStake};

use soroban_sdk::{contract, contractimpl, token, Address, Env};

#[contract]
pub struct FarmContract;

#[contractimpl]
impl FarmContract {
    // ========== Admin Functions ==========

    /// One-time initialization. The reward window starts closed.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        reward_per_block: i128,
        max_reward_block: u32,
    ) -> Result<(), ContractError> {
        if storage::has_config(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if reward_per_block < 0 {
            return Err(ContractError::InvalidAmount);
        }

        storage::set_config(
            &env,
            &FarmConfig {
                admin: admin.clone(),
                reward_token: reward_token.clone(),
                reward_per_block,
                total_alloc_weight: 0,
                max_reward_block,
                window_open: false,
            },
        );
        storage::set_pool_count(&env, 0);
        storage::extend_instance_ttl(&env);

        events::publish_initialized(&env, admin, reward_token, reward_per_block, max_reward_block);
        Ok(())
    }

    /// Register a new pool for `stake_token`. Returns its index.
    ///
    /// The new weight dilutes every other pool from this block on; pass
    /// `with_update` to settle all pools at their old share first.
    pub fn add_pool(
        env: Env,
        admin: Address,
        stake_token: Address,
        alloc_weight: u64,
        with_update: bool,
    ) -> Result<u32, ContractError> {
        let mut config = Self::require_admin(&env, &admin)?;
        storage::extend_instance_ttl(&env);

        if alloc_weight == 0 {
            return Err(ContractError::InvalidAllocation);
        }
        if stake_token == config.reward_token {
            return Err(ContractError::TokensIdentical);
        }
        if storage::has_pool_for_token(&env, &stake_token) {
            return Err(ContractError::PoolAlreadyExists);
        }

        if with_update {
            rewards::settle_all(&env, &config)?;
        }

        let index = storage::get_pool_count(&env);
        storage::set_pool(
            &env,
            index,
            &Pool {
                stake_token: stake_token.clone(),
                alloc_weight,
                last_settled_block: env.ledger().sequence(),
                acc_reward_per_share: 0,
                total_staked: 0,
            },
        );
        storage::set_pool_for_token(&env, &stake_token, index);
        storage::set_pool_count(&env, index + 1);

        config.total_alloc_weight += alloc_weight;
        storage::set_config(&env, &config);

        events::publish_pool_added(
            &env,
            index,
            stake_token,
            alloc_weight,
            config.total_alloc_weight,
        );
        Ok(index)
    }

    /// Change a pool's allocation weight. The pool is always settled at its
    /// old weight first; `with_update` settles every pool.
    pub fn set_pool_weight(
        env: Env,
        admin: Address,
        pool_id: u32,
        alloc_weight: u64,
        with_update: bool,
    ) -> Result<(), ContractError> {
        let mut config = Self::require_admin(&env, &admin)?;
        storage::extend_instance_ttl(&env);

        if alloc_weight == 0 {
            return Err(ContractError::InvalidAllocation);
        }

        if with_update {
            rewards::settle_all(&env, &config)?;
        }
        let mut pool = rewards::settle_pool(&env, &config, pool_id)?;

        let old_weight = pool.alloc_weight;
        config.total_alloc_weight = config.total_alloc_weight - old_weight + alloc_weight;
        pool.alloc_weight = alloc_weight;
        storage::set_pool(&env, pool_id, &pool);
        storage::set_config(&env, &config);

        events::publish_pool_weight_set(
            &env,
            pool_id,
            old_weight,
            alloc_weight,
            config.total_alloc_weight,
        );
        Ok(())
    }

    /// Update the farm-wide reward rate.
    /// Settles all pools at the old rate first so the change is never retroactive.
    pub fn update_reward_per_block(
        env: Env,
        admin: Address,
        new_rate: i128,
    ) -> Result<(), ContractError> {
        let mut config = Self::require_admin(&env, &admin)?;
        storage::extend_instance_ttl(&env);

        if new_rate < 0 {
            return Err(ContractError::InvalidAmount);
        }

        rewards::settle_all(&env, &config)?;

        let old_rate = config.reward_per_block;
        config.reward_per_block = new_rate;
        storage::set_config(&env, &config);

        events::publish_reward_rate_set(&env, old_rate, new_rate);
        Ok(())
    }

    /// Move the block after which nothing accrues.
    ///
    /// Pools are settled against the old bound first. Blocks that passed after
    /// an old, already reached bound do not earn when the bound is extended.
    pub fn update_max_reward_block(
        env: Env,
        admin: Address,
        new_max: u32,
    ) -> Result<(), ContractError> {
        let mut config = Self::require_admin(&env, &admin)?;
        storage::extend_instance_ttl(&env);

        rewards::settle_all(&env, &config)?;
        rewards::skip_unrewarded(&env, env.ledger().sequence().min(new_max))?;

        let old_max = config.max_reward_block;
        config.max_reward_block = new_max;
        storage::set_config(&env, &config);

        events::publish_max_reward_block_set(&env, old_max, new_max);
        Ok(())
    }

    /// Make accrued rewards claimable. One-way; a second call is a no-op.
    pub fn open_reward_window(env: Env, admin: Address) -> Result<(), ContractError> {
        let mut config = Self::require_admin(&env, &admin)?;
        storage::extend_instance_ttl(&env);

        if config.window_open {
            return Ok(());
        }
        config.window_open = true;
        storage::set_config(&env, &config);

        events::publish_reward_window_opened(&env);
        Ok(())
    }

    /// Sweep the farm's entire reward-token balance to `to`.
    ///
    /// This includes rewards still owed to stakers: whoever holds the admin
    /// role can empty the reward pot at any time.
    pub fn redeem_all_rewards(
        env: Env,
        admin: Address,
        to: Address,
    ) -> Result<i128, ContractError> {
        let config = Self::require_admin(&env, &admin)?;
        storage::extend_instance_ttl(&env);

        let farm = env.current_contract_address();
        let balance = token::Client::new(&env, &config.reward_token).balance(&farm);
        Self::transfer(&env, &config.reward_token, &farm, &to, balance)?;

        events::publish_rewards_redeemed(&env, to, balance);
        Ok(balance)
    }

    /// Transfer admin role to a new address.
    pub fn set_admin(env: Env, admin: Address, new_admin: Address) -> Result<(), ContractError> {
        let mut config = Self::require_admin(&env, &admin)?;
        storage::extend_instance_ttl(&env);

        config.admin = new_admin.clone();
        storage::set_config(&env, &config);

        events::publish_admin_set(&env, admin, new_admin);
        Ok(())
    }

    /// Transfer reward tokens into the farm.
    pub fn fund(env: Env, funder: Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        funder.require_auth();
        let config = storage::get_config(&env)?;
        storage::extend_instance_ttl(&env);

        Self::transfer(
            &env,
            &config.reward_token,
            &funder,
            &env.current_contract_address(),
            amount,
        )?;

        events::publish_funded(&env, funder, amount);
        Ok(())
    }

    // ========== User Functions ==========

    /// Stake `amount` of the pool's token.
    pub fn deposit(
        env: Env,
        user: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        user.require_auth();
        let config = storage::get_config(&env)?;
        storage::extend_instance_ttl(&env);

        let pool = storage::get_pool(&env, pool_id)?;
        let stake = ledger::on_deposit(&env, &config, pool_id, &user, amount)?;
        Self::transfer(
            &env,
            &pool.stake_token,
            &user,
            &env.current_contract_address(),
            amount,
        )?;

        events::publish_deposited(&env, user, pool_id, amount, stake.amount);
        Ok(())
    }

    /// Take `amount` of stake back. Accrued reward is paid out with it while
    /// the reward window is open and forfeited while it is closed.
    pub fn withdraw(
        env: Env,
        user: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        user.require_auth();
        storage::extend_instance_ttl(&env);
        Self::withdraw_stake(&env, &user, pool_id, amount)
    }

    /// Withdraw the whole stake. Returns the principal returned.
    pub fn withdraw_all(env: Env, user: Address, pool_id: u32) -> Result<i128, ContractError> {
        user.require_auth();
        storage::extend_instance_ttl(&env);

        let amount = storage::get_stake(&env, pool_id, &user).amount;
        Self::withdraw_stake(&env, &user, pool_id, amount)?;
        Ok(amount)
    }

    /// Claim accumulated rewards. Returns amount claimed.
    pub fn claim_reward(env: Env, user: Address, pool_id: u32) -> Result<i128, ContractError> {
        user.require_auth();
        let config = storage::get_config(&env)?;
        storage::extend_instance_ttl(&env);

        let reward = ledger::on_claim(&env, &config, pool_id, &user)?;
        Self::transfer(
            &env,
            &config.reward_token,
            &env.current_contract_address(),
            &user,
            reward,
        )?;

        events::publish_reward_claimed(&env, user, pool_id, reward);
        Ok(reward)
    }

    /// Return the whole principal without touching the reward token.
    /// Accrued reward is forfeited. Returns the principal returned.
    pub fn emergency_withdraw(
        env: Env,
        user: Address,
        pool_id: u32,
    ) -> Result<i128, ContractError> {
        user.require_auth();
        let config = storage::get_config(&env)?;
        storage::extend_instance_ttl(&env);

        let pool = storage::get_pool(&env, pool_id)?;
        let (principal, forfeited) = ledger::on_emergency_withdraw(&env, &config, pool_id, &user)?;
        Self::transfer(
            &env,
            &pool.stake_token,
            &env.current_contract_address(),
            &user,
            principal,
        )?;

        if forfeited > 0 {
            events::publish_reward_forfeited(&env, user.clone(), pool_id, forfeited);
        }
        events::publish_emergency_withdrawn(&env, user, pool_id, principal);
        Ok(principal)
    }

    /// Bring one pool's accumulator up to the current block.
    pub fn settle_pool(env: Env, pool_id: u32) -> Result<Pool, ContractError> {
        let config = storage::get_config(&env)?;
        storage::extend_instance_ttl(&env);
        rewards::settle_pool(&env, &config, pool_id)
    }

    /// Bring every pool's accumulator up to the current block.
    pub fn settle_all_pools(env: Env) -> Result<(), ContractError> {
        let config = storage::get_config(&env)?;
        storage::extend_instance_ttl(&env);
        rewards::settle_all(&env, &config)
    }

    // ========== View Functions ==========

    /// Query unclaimed rewards for a user in a pool, as of the current block.
    pub fn pending_reward(env: Env, pool_id: u32, user: Address) -> Result<i128, ContractError> {
        let config = storage::get_config(&env)?;
        ledger::pending_of(&env, &config, pool_id, &user)
    }

    /// Query pool state as last settled.
    pub fn get_pool(env: Env, pool_id: u32) -> Result<Pool, ContractError> {
        storage::get_pool(&env, pool_id)
    }

    /// Query stake details for a user. Unknown users read as an empty stake.
    pub fn get_user_stake(env: Env, pool_id: u32, user: Address) -> UserStake {
        storage::get_stake(&env, pool_id, &user)
    }

    /// Number of registered pools.
    pub fn pool_count(env: Env) -> u32 {
        storage::get_pool_count(&env)
    }

    /// Farm-wide configuration.
    pub fn get_config(env: Env) -> Result<FarmConfig, ContractError> {
        storage::get_config(&env)
    }

    /// Farm's reward-token balance.
    pub fn reward_balance(env: Env) -> Result<i128, ContractError> {
        let config = storage::get_config(&env)?;
        Ok(token::Client::new(&env, &config.reward_token).balance(&env.current_contract_address()))
    }

    // ========== Internal Helpers ==========

    fn require_admin(env: &Env, caller: &Address) -> Result<FarmConfig, ContractError> {
        caller.require_auth();
        let config = storage::get_config(env)?;
        if *caller != config.admin {
            return Err(ContractError::Unauthorized);
        }
        Ok(config)
    }

    fn withdraw_stake(
        env: &Env,
        user: &Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        let config = storage::get_config(env)?;
        let pool = storage::get_pool(env, pool_id)?;
        let outcome = ledger::on_withdraw(env, &config, pool_id, user, amount)?;

        let farm = env.current_contract_address();
        Self::transfer(env, &pool.stake_token, &farm, user, amount)?;
        Self::transfer(env, &config.reward_token, &farm, user, outcome.released_reward)?;

        if outcome.forfeited_reward > 0 {
            events::publish_reward_forfeited(env, user.clone(), pool_id, outcome.forfeited_reward);
        }
        events::publish_withdrawn(
            env,
            user.clone(),
            pool_id,
            amount,
            outcome.remaining,
            outcome.released_reward,
        );
        Ok(())
    }

    /// Token transfer that reports failure instead of trapping.
    /// An `Err` from the enclosing call rolls back every write made before it.
    fn transfer(
        env: &Env,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        if amount == 0 {
            return Ok(());
        }
        match token::Client::new(env, asset).try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }
}

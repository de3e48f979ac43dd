use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    InvalidAllocation = 4,
    PoolNotFound = 5,
    PoolAlreadyExists = 6,
    TokensIdentical = 7,
    DepositZero = 8,
    InvalidAmount = 9,
    InsufficientStake = 10,
    RewardsLocked = 11,
    TransferFailed = 12,
    MathOverflow = 13,
}

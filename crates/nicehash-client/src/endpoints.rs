/*
[INPUT]:  None (static table)
[OUTPUT]: Endpoint path templates with {placeholder} tokens
[POS]:    Endpoint table - resolved through format::format_path before use
[UPDATE]: When adding endpoints used by callers
*/

//! Path templates for the NiceHash v2 REST API.
//!
//! Only a commonly used subset is listed; any other path can be passed to the
//! client verbs directly.

/// Unauthenticated server time
pub const TIME: &str = "/api/v2/time";

pub mod public {
    pub const SERVER_STATUS: &str = "/main/api/v2/system/status";
    pub const CURRENCIES: &str = "/main/api/v2/public/currencies";
    pub const SIMPLE_MULTI_ALGO_INFO: &str = "/main/api/v2/public/simplemultialgo/info";
    pub const EXCHANGE_RATES: &str = "/main/api/v2/exchangeRate/list";
}

pub mod accounting {
    pub const ACCOUNTS: &str = "/main/api/v2/accounting/accounts2";
    /// `{currency}`: currency code, e.g. `BTC`
    pub const BALANCE: &str = "/main/api/v2/accounting/account2/{currency}";
    /// Query: `currency`
    pub const DEPOSIT_ADDRESS: &str = "/main/api/v2/accounting/depositAddresses";
    pub const TRANSACTIONS: &str = "/main/api/v2/accounting/transactions/{currency}";
    pub const WITHDRAWAL: &str = "/main/api/v2/accounting/withdrawal";
}

pub mod mining {
    pub const RIGS: &str = "/main/api/v2/mining/rigs2";
    /// `{rigId}`: rig identifier
    pub const RIG: &str = "/main/api/v2/mining/rig2/{rigId}";
    pub const RIGS_STATUS: &str = "/main/api/v2/mining/rigs/status2";
}

pub mod hashpower {
    pub const MY_ORDERS: &str = "/main/api/v2/hashpower/myOrders";
    pub const ORDER: &str = "/main/api/v2/hashpower/order";
    /// `{id}`: order id
    pub const ORDER_DETAILS: &str = "/main/api/v2/hashpower/order/{id}";
}

pub mod exchange {
    pub const STATUS: &str = "/exchange/api/v2/info/status";
    pub const MY_ORDERS: &str = "/exchange/api/v2/info/myOrders";
    pub const ORDER: &str = "/exchange/api/v2/order";
}

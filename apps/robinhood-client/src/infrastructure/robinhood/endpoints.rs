//! Endpoint paths, relative to the API base URL.

pub const LOGIN: &str = "oauth2/token/";
pub const LOGOUT: &str = "oauth2/revoke_token/";
pub const USER_MACHINE: &str = "pathfinder/user_machine/";
pub const ACCOUNTS: &str = "accounts/";
pub const USER: &str = "user/";
pub const INVESTMENT_PROFILE: &str = "user/investment_profile/";
pub const DIVIDENDS: &str = "dividends/";
pub const EARNINGS: &str = "marketdata/earnings/";
pub const INSTRUMENTS: &str = "instruments/";
pub const ORDERS: &str = "orders/";
pub const QUOTES: &str = "quotes/";
pub const POSITIONS: &str = "positions/";
pub const FUNDAMENTALS: &str = "fundamentals/";
pub const WATCHLISTS: &str = "watchlists/";
pub const SP500_MOVERS: &str = "midlands/movers/sp500/";
pub const NEWS: &str = "midlands/news/";
pub const TAG: &str = "midlands/tags/tag/";
pub const OPTIONS_CHAINS: &str = "options/chains/";
pub const OPTIONS_POSITIONS: &str = "options/aggregate_positions/";
pub const OPTIONS_ORDERS: &str = "options/orders/";
pub const OPTIONS_INSTRUMENTS: &str = "options/instruments/";
pub const CRYPTO_QUOTES: &str = "marketdata/forex/quotes/";
pub const CRYPTO_HOLDINGS: &str = "holdings/";
pub const CURRENCY_PAIRS: &str = "currency_pairs/";

/// Discovery and continuation endpoint for a machine registration.
pub fn inquiry(machine_id: &str) -> String {
    format!("pathfinder/inquiries/{machine_id}/user_view/")
}

/// SMS challenge response endpoint.
pub fn challenge_respond(challenge_id: &str) -> String {
    format!("challenge/{challenge_id}/respond/")
}

/// Push approval status endpoint.
pub fn prompt_status(challenge_id: &str) -> String {
    format!("push/{challenge_id}/get_prompts_status/")
}

/// Cancel endpoint for an order id.
pub fn cancel_order(order_id: &str) -> String {
    format!("{ORDERS}{order_id}/cancel/")
}

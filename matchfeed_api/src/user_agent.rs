/// User agent sent with every request. Both feeds reject requests without a
/// browser-looking agent.
pub const USER_AGENT: &str = "Mozilla/5.0";

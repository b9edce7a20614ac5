mod client;
mod errors;
mod user_agent;
pub use self::client::{Charset, Client};
pub use self::errors::Error;
pub use self::user_agent::USER_AGENT;

pub mod pool_state;
pub mod stake_record;
pub mod user_account;

pub use pool_state::*;
pub use stake_record::*;
pub use user_account::*;

pub mod pending_state;
pub mod token;
pub mod token_store;

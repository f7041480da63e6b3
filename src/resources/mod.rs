//! Kroger resource APIs: locations, products, cart, identity.

pub mod cart;
pub mod client;
pub mod identity;
pub mod locations;
pub mod models;
pub mod products;

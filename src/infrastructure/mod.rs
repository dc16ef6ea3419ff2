pub mod codec;
pub mod credentials;
pub mod inference;
pub mod observability;
pub mod persistence;

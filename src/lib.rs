pub mod commons;
pub mod configs;
pub mod error;
pub mod errors;
pub mod identities;
pub mod identity;
pub mod issuer;
pub mod media;
pub mod request;
pub mod servers;
pub mod signer;
pub mod signers;
pub mod state;

//! Types shared by the Musicify auth crates

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;

mod client;
mod config;
#[cfg(test)]
mod fake;
mod logging;

pub use client::*;
pub use config::*;
#[cfg(test)]
pub use fake::*;
pub use logging::*;

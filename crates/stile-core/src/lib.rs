//! Core stile library (login flow, lockout policy, auth gateway).

pub mod config;
pub mod connectivity;
pub mod credentials;
pub mod flow;
pub mod gateway;
pub mod lockout;
pub mod session;

mod clock;
mod persist;

//! The three admission-control middlewares (spec §4.4): bearer-token auth,
//! the non-blocking concurrency gate, and the token-bucket rate limiter.

pub mod auth;
pub mod concurrency;
pub mod rate;

pub use concurrency::ConcurrencyGate;
pub use rate::RateLimiter;

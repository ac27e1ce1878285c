//! # SchoolHub Cache
//!
//! Redis client and session storage for the SchoolHub API.
//!
//! This crate provides:
//! - Redis connection management ([`RedisCache`])
//! - The [`SessionStore`] seam holding short-lived per-session state, with a
//!   Redis implementation and an in-process fallback
//! - Configuration from environment variables and key builders
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_cache::{CacheConfig, connect_session_store};
//!
//! let config = CacheConfig::from_env();
//! let sessions = connect_session_store(&config).await;
//!
//! sessions.store("reset:abc", "{}".into(), Duration::from_secs(900)).await?;
//! let value = sessions.load("reset:abc").await?;
//! ```

pub mod config;
pub mod keys;
pub mod redis;
pub mod session;

pub use config::CacheConfig;
pub use crate::redis::{CacheError, RedisCache};
pub use session::{MemorySessionStore, SessionStore, connect_session_store};

#[cfg(any(test, feature = "test-utils"))]
pub use session::MockSessionStore;

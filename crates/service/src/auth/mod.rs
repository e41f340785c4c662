//! Account/credential lifecycle: three-layer architecture (domain,
//! repository, service) with the hashing, token, lockout, and session
//! mechanics split into their own modules.

pub mod domain;
pub mod errors;
pub mod hasher;
pub mod tokens;
pub mod attempts;
pub mod sessions;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::AuthService;

//! Business layer on top of `models`.
//! - `auth` holds the account/credential lifecycle: registration, login with
//!   lockout, refresh-token sessions, email verification, password reset.
//! - The remaining modules are thin validated CRUD services for the
//!   field-service domain.

pub mod errors;
pub mod pagination;
pub mod validation;
pub mod mailer;
pub mod auth;
pub mod customers;
pub mod technicians;
pub mod work_orders;
#[cfg(test)]
pub mod test_support;

//! SeaORM entities and small persistence helpers for the field-service
//! domain and the auth tables. Helpers that implement single-use or
//! state-machine semantics do so with conditional `update_many` statements
//! so concurrent callers race safely at the database.

pub mod errors;
pub mod db;

/// Result of an atomic consume attempt on a one-time token row.
#[derive(Debug)]
pub enum TokenConsumeOutcome<M> {
    Consumed(M),
    NotFound,
    AlreadyUsed,
    Expired,
}

pub mod user;
pub mod verification_token;
pub mod password_reset_token;
pub mod session;
pub mod login_attempt;
pub mod customer;
pub mod service_location;
pub mod technician;
pub mod work_order;
pub mod work_note;
pub mod work_order_line_item;

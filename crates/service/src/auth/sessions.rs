//! Refresh-token session records. Every descendant of one login shares a
//! family id, so a single reuse detection can cut the whole lineage.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::tokens;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Rotated,
    Revoked,
}

#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub family_id: Uuid,
    pub token_hash: String,
    pub state: SessionState,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Store-level result of presenting a refresh token for rotation.
#[derive(Debug)]
pub enum RotateOutcome {
    /// The conditional update won; the rotated-out session is returned.
    Rotated(SessionRecord),
    NotFound,
    /// The token belongs to an already-rotated session: possible theft.
    Reused(SessionRecord),
    Revoked,
    Expired(SessionRecord),
}

/// A freshly minted session plus the raw refresh token, which exists only
/// here until it is handed to the caller.
pub struct NewSession {
    pub record: SessionRecord,
    pub raw_token: String,
}

pub fn mint(user_id: Uuid, family_id: Uuid, now: DateTime<Utc>, ttl: Duration) -> NewSession {
    let raw_token = tokens::generate_raw();
    let record = SessionRecord {
        id: Uuid::new_v4(),
        user_id,
        family_id,
        token_hash: tokens::digest(&raw_token),
        state: SessionState::Active,
        issued_at: now,
        expires_at: now + ttl,
    };
    NewSession { record, raw_token }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_stores_digest_not_raw() {
        let now = Utc::now();
        let s = mint(Uuid::new_v4(), Uuid::new_v4(), now, Duration::days(30));
        assert_ne!(s.record.token_hash, s.raw_token);
        assert_eq!(s.record.token_hash, tokens::digest(&s.raw_token));
        assert_eq!(s.record.state, SessionState::Active);
        assert_eq!(s.record.expires_at, now + Duration::days(30));
    }
}

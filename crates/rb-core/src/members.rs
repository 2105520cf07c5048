use crate::error::RetroError;
use crate::types::{RetrospectiveId, UserId};

pub trait MemberRepository {
    fn is_member(&self, retro_id: RetrospectiveId, user_id: UserId) -> Result<bool, RetroError>;
}

use kernel::id::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserMarker;
pub type UserId = Id<UserMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionTokenMarker;
/// Row identifier of a session token (not the bearer value itself)
pub type SessionTokenId = Id<SessionTokenMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResetTokenMarker;
/// Identifier handed out by "forgot password" and redeemed by "reset password"
pub type ResetTokenId = Id<ResetTokenMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_new() {
        let user_id = UserId::new();
        let uuid = user_id.as_uuid();
        assert_eq!(uuid.get_version_num(), 4); // UUIDv4
    }

    #[test]
    fn test_from_uuid() {
        let uuid = uuid::Uuid::new_v4();
        let user_id = UserId::from_uuid(uuid);
        assert_eq!(user_id.as_uuid(), &uuid);
    }

    #[test]
    fn test_reset_token_id_parse() {
        let id = ResetTokenId::new();
        assert_eq!(ResetTokenId::parse(&id.to_string()).unwrap(), id);
        assert!(ResetTokenId::parse("not-a-uuid").is_err());
    }
}

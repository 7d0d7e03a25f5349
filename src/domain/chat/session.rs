//! Per-message session context supplied by the surrounding UI/auth layer.

/// Who is speaking and what they are allowed to do.
///
/// Identity here is a display name: the surrounding app signs users in by
/// name only, and that pre-existing choice is out of scope. Visitors get
/// `can_update_stats = false` and can never trigger a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Display name the author claims.
    pub author_name: String,
    /// True for users matched to a registered player record.
    pub is_registered_player: bool,
    /// True if this session may mutate statistics.
    pub can_update_stats: bool,
}

impl SessionContext {
    /// Context for a registered player who may update their own stats.
    pub fn registered_player(author_name: impl Into<String>) -> Self {
        Self {
            author_name: author_name.into(),
            is_registered_player: true,
            can_update_stats: true,
        }
    }

    /// Context for an anonymous visitor; never allowed to mutate.
    pub fn visitor(author_name: impl Into<String>) -> Self {
        Self {
            author_name: author_name.into(),
            is_registered_player: false,
            can_update_stats: false,
        }
    }
}

use log::debug;

use crate::{
    domain::error::ValidationError,
    session::SessionContext,
    workflow::error::WorkflowError,
};

pub const MAX_NICKNAME_LEN: usize = 6;

/// A nickname that passed the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub nickname: String,
}

/// Holds the nickname being typed and decides whether it may be submitted
#[derive(Debug, Clone, Default)]
pub struct IdentityGate {
    nickname: String,
}

impl IdentityGate {
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
        }
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }

    /// Checks the nickname without persisting it.
    ///
    /// A nickname longer than six characters is rejected and the field is
    /// reset to an empty string.
    pub fn check(&mut self) -> Result<Identity, ValidationError> {
        if self.nickname.trim().is_empty() {
            return Err(ValidationError::EmptyNickname);
        }

        let len = self.nickname.chars().count();
        if len > MAX_NICKNAME_LEN {
            self.nickname.clear();
            return Err(ValidationError::NicknameTooLong {
                len,
                max: MAX_NICKNAME_LEN,
            });
        }

        Ok(Identity {
            nickname: self.nickname.clone(),
        })
    }

    /// `check`, then saves the nickname to the session, overwriting any previous one
    pub fn validate(&mut self, session: &mut SessionContext) -> Result<Identity, WorkflowError> {
        let identity = self.check()?;
        session.save_nickname(&identity.nickname)?;
        debug!("nickname saved");
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::memory::MemoryStore;

    #[test]
    fn test_empty_nickname() {
        let mut gate = IdentityGate::new("");
        assert_eq!(gate.check(), Err(ValidationError::EmptyNickname));

        let mut gate = IdentityGate::new("   ");
        assert_eq!(gate.check(), Err(ValidationError::EmptyNickname));
        // whitespace is left untouched
        assert_eq!(gate.nickname(), "   ");
    }

    #[test]
    fn test_too_long_nickname_is_cleared() {
        let mut gate = IdentityGate::new("superlongname");

        assert_eq!(
            gate.check(),
            Err(ValidationError::NicknameTooLong { len: 13, max: 6 })
        );
        assert_eq!(gate.nickname(), "");
    }

    #[test]
    fn test_six_hangul_characters_fit() {
        let mut gate = IdentityGate::new("가나다라마바");

        assert_eq!(gate.check().map(|i| i.nickname), Ok("가나다라마바".to_string()));
    }

    #[test]
    fn test_validate_persists_nickname() -> anyhow::Result<()> {
        let mut session = SessionContext::new(MemoryStore::new());
        session.save_nickname("old")?;

        let identity = IdentityGate::new("민지").validate(&mut session)?;

        assert_eq!(identity.nickname, "민지");
        assert_eq!(session.nickname()?, Some("민지".to_string()));

        Ok(())
    }

    #[test]
    fn test_failed_validate_keeps_stored_nickname() -> anyhow::Result<()> {
        let mut session = SessionContext::new(MemoryStore::new());
        session.save_nickname("민지")?;

        let result = IdentityGate::new("").validate(&mut session);

        assert!(matches!(
            result,
            Err(WorkflowError::Validation(ValidationError::EmptyNickname))
        ));
        assert_eq!(session.nickname()?, Some("민지".to_string()));

        Ok(())
    }
}

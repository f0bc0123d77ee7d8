use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::user::ActingUser;

/// Supplies the user on whose behalf store operations run.
pub trait Identity: Send + Sync {
    fn current_user(&self) -> Option<ActingUser>;
}

/// The signed-in user of this session. Clones share the same slot.
#[derive(Clone)]
pub struct Session {
    user: Arc<watch::Sender<Option<ActingUser>>>,
}

impl Session {
    pub fn new() -> Self {
        let (user, _) = watch::channel(None);
        Self {
            user: Arc::new(user),
        }
    }

    pub fn sign_in(&self, user: ActingUser) {
        tracing::info!(user_id = %user.id, "session signed in");
        self.user.send_replace(Some(user));
    }

    pub fn sign_out(&self) {
        if let Some(previous) = self.user.send_replace(None) {
            tracing::info!(user_id = %previous.id, "session signed out");
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Identity for Session {
    fn current_user(&self) -> Option<ActingUser> {
        self.user.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_signed_in_user() {
        let session = Session::new();
        assert!(session.current_user().is_none());

        let other = session.clone();
        other.sign_in(ActingUser::new("u1", "Ursula"));
        assert_eq!(session.current_user().map(|u| u.id), Some("u1".to_string()));

        session.sign_out();
        assert!(other.current_user().is_none());
    }
}

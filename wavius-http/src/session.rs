//! Per-client credential and instance state.

use crate::ClientConfig;

/// Current bearer token and instance id of one client.
///
/// The two fields are independent and every combination is valid. Empty
/// strings are stored as "unset". No token format validation is done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    instance_id: Option<String>,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session seeded with the configured defaults.
    pub fn seeded(config: &ClientConfig) -> Self {
        Self {
            token: config.token.clone().and_then(non_empty),
            instance_id: config.instance_id.clone().and_then(non_empty),
        }
    }

    /// Set the bearer token.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = non_empty(token.into());
    }

    /// Get the current bearer token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Forget the bearer token.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Set the instance id used to scope paths.
    pub fn set_instance_id(&mut self, instance_id: impl Into<String>) {
        self.instance_id = non_empty(instance_id.into());
    }

    /// Get the current instance id.
    pub fn instance_id(&self) -> Option<&str> {
        self.instance_id.as_deref()
    }

    /// Forget the instance id.
    pub fn clear_instance_id(&mut self) {
        self.instance_id = None;
    }

    /// Copy of this session with a per-call instance override applied.
    pub fn scoped(&self, instance_id: Option<&str>) -> Session {
        let mut session = self.clone();
        if let Some(id) = instance_id {
            session.set_instance_id(id);
        }
        session
    }
}

use std::fmt::Debug;

use serde::Deserialize;

/// The request body for `/register` and `/login`.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credentials {{ username: {}, password: **** }}", self.username)
    }
}

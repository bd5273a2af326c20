//! Public types for the OAuth registration API
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginQuery {
    pub doctor_id: String,
}

/// Google's redirect carries the authorization code plus our
/// `state`, which round-trips the doctor id.
#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

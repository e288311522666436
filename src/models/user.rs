use serde::{Deserialize, Serialize};

/// The authenticated caller, as resolved by the identity verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,           // user ID
    pub email: Option<String>, // optional, echoed into the subject
    pub exp: usize,            // expiration time
}

#[derive(Debug, Deserialize)]
pub struct CredentialsPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub uid: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
    pub local_id: String,
}

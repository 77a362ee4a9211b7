use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SIGNUP_ENDPOINT: &str = "/auth/signup-face";
pub const LOGIN_ENDPOINT: &str = "/auth/login-face";

pub const API_KEY_HEADER: &str = "X-API-KEY";

pub type CustomFields = Map<String, Value>;

// Request types
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FaceAuthRequest {
    pub image_base64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<CustomFields>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SignupOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<CustomFields>,
}

impl SignupOptions {
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_fields
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

// Response types

/// Body of a successful login or signup, kept exactly as the server sent it.
///
/// Any well-formed JSON is accepted; the accessors read the usual fields and
/// return `None` when the server sent something else.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct AuthResult(Value);

impl AuthResult {
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.get("user_id").and_then(Value::as_i64)
    }

    pub fn is_new_user(&self) -> Option<bool> {
        self.get("is_new_user").and_then(Value::as_bool)
    }

    pub fn custom_fields(&self) -> Option<&CustomFields> {
        self.get("custom_fields").and_then(Value::as_object)
    }

    /// A top-level field of an object body.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_object().and_then(|body| body.get(key))
    }

    pub fn body(&self) -> &Value {
        &self.0
    }

    pub fn into_body(self) -> Value {
        self.0
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

/// Which API call a pending capture performs once its photo is ready.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthCall {
    Login,
    Signup { custom_fields: Option<CustomFields> },
}

impl AuthCall {
    pub fn endpoint(&self) -> &'static str {
        match self {
            AuthCall::Login => LOGIN_ENDPOINT,
            AuthCall::Signup { .. } => SIGNUP_ENDPOINT,
        }
    }

    pub fn into_request(self, image_base64: String) -> FaceAuthRequest {
        match self {
            AuthCall::Login => FaceAuthRequest { image_base64, custom_fields: None },
            AuthCall::Signup { custom_fields } => FaceAuthRequest { image_base64, custom_fields },
        }
    }
}

impl From<Option<SignupOptions>> for AuthCall {
    fn from(options: Option<SignupOptions>) -> Self {
        AuthCall::Signup {
            custom_fields: options.and_then(|o| o.custom_fields),
        }
    }
}

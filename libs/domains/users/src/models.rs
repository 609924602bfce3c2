use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Classification tag forced onto every user created through the API
pub const DEFAULT_USER_TYPE: &str = "user";

/// Keys owned by the store; never accepted as profile data on create
const RESERVED_KEYS: [&str; 2] = ["id", "version"];

pub const EMAIL_REGISTERED: &str = "Email already registered.";
pub const EMAIL_UNIQUE: &str = "Email is unique.";

/// Profile fields opaque to this domain, carried through as JSON
pub type Profile = Map<String, Value>;

/// A registered user
///
/// `version` is the optimistic concurrency token: `1` after insert, bumped on
/// every successful replace. Any top-level JSON key not listed here lands in
/// `profile` and is written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,

    #[validate(email)]
    pub email: String,

    #[serde(default = "default_user_type")]
    pub user_type: String,

    pub version: i32,

    #[serde(flatten)]
    pub profile: Profile,
}

fn default_user_type() -> String {
    DEFAULT_USER_TYPE.to_string()
}

/// DTO for creating a new user
///
/// `user_type` is accepted for wire compatibility and ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(email)]
    pub email: String,

    #[serde(default)]
    pub user_type: Option<String>,

    #[serde(flatten)]
    pub profile: Profile,
}

/// Insert payload handed to the store; the store assigns `id` and `version`
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub user_type: String,
    pub profile: Profile,
}

impl From<CreateUser> for NewUser {
    fn from(input: CreateUser) -> Self {
        let mut profile = input.profile;
        for key in RESERVED_KEYS {
            profile.remove(key);
        }

        Self {
            email: input.email,
            user_type: DEFAULT_USER_TYPE.to_string(),
            profile,
        }
    }
}

/// Result of an email availability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAvailability {
    pub exists: bool,
    pub message: String,
}

impl EmailAvailability {
    pub fn new(exists: bool) -> Self {
        let message = if exists { EMAIL_REGISTERED } else { EMAIL_UNIQUE };
        Self {
            exists,
            message: message.to_string(),
        }
    }
}

/// Existence predicate evaluated by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserPredicate {
    Id(i32),
    /// Case-insensitive match on the stored address
    Email(String),
}

impl UserPredicate {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserPredicate::Id(id) => user.id == *id,
            UserPredicate::Email(email) => user.email.eq_ignore_ascii_case(email),
        }
    }
}

use serde::{Deserialize, Serialize};

use medprocure_core::{Entity, Field, Labels};

/// Operator identity.
///
/// Users are provided by the identity collaborator; records elsewhere only
/// keep a reference to them (`owner`), cleared when the user goes away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            full_name: None,
        }
    }
}

impl Entity for User {
    const NAME: &'static str = "user";
    const VERBOSE_NAME: &'static str = "User";
    const FIELDS: &'static [Field] = &[
        Field::text("username", 150).required(),
        Field::text("full_name", 150),
    ];

    fn label(&self, _labels: &dyn Labels) -> String {
        self.username.clone()
    }
}

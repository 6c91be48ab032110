use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::core::error::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    #[default]
    Creator,
    Brand,
}

impl Role {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Role::Creator => "creator",
            Role::Brand => "brand",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creator" => Ok(Role::Creator),
            "brand" => Ok(Role::Brand),
            _ => Err(Error::Validation("role must be 'creator' or 'brand'".into())),
        }
    }
}

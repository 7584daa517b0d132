mod batch;
pub use batch::*;

mod classifier;
pub use classifier::*;

mod credentials;
pub use credentials::*;

mod download;
pub use download::*;

mod search;
pub use search::*;

mod traits;
pub use traits::*;

mod types;
pub use types::*;

#[cfg(test)]
mod batch_tests;



use serde::{Deserialize, Serialize};
use std::ops::Deref;

// ItemId
#[derive(Eq, PartialEq, Clone, Hash, Debug, Serialize, Deserialize)]
pub struct ItemId(pub(crate) String);

impl Deref for ItemId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        ItemId(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        ItemId(value)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

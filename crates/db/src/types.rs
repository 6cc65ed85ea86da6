use std::{fmt, str::FromStr};

use diesel_derive_newtype::DieselNewType;
use serde::{Deserialize, Serialize};

#[derive(
    DieselNewType,
    Serialize,
    Deserialize,
    Debug,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Clone,
    Copy,
    Default,
)]
#[serde(transparent)]
pub struct DbId(i64);

impl DbId {
    pub fn new(id: i64) -> Self {
        DbId(id)
    }
}

impl fmt::Display for DbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for DbId {
    fn from(id: i64) -> Self {
        DbId(id)
    }
}

/// Route ids are non-negative decimal integers.
impl FromStr for DbId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().parse::<u64>()?;
        Ok(DbId(i64::try_from(id)?))
    }
}

/// Denormalized counters stored on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Likes,
    Messages,
}

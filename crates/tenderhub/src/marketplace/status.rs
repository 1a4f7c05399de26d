//! Tender lifecycle: `active` is the only initial state and the only state with exits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenderStatus {
    #[default]
    Active,
    Closed,
    Cancelled,
}

impl TenderStatus {
    pub const INITIAL: Self = Self::Active;

    pub const fn ordered() -> [Self; 3] {
        [Self::Active, Self::Closed, Self::Cancelled]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }

    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Active, Self::Closed) | (Self::Active, Self::Cancelled)
        )
    }

    pub fn transition_to(self, target: Self) -> Result<Self, StatusTransitionError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(StatusTransitionError {
                from: self,
                to: target,
            })
        }
    }
}

impl fmt::Display for TenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TenderStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|status| status.label() == normalized)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("tender status cannot move from {from} to {to}")]
pub struct StatusTransitionError {
    pub from: TenderStatus,
    pub to: TenderStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tender status '{0}'")]
pub struct UnknownStatus(pub String);

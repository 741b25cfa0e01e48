use serde::{Deserialize, Serialize};

/// Presence of a user-selected API credential.
///
/// The check for a previously selected credential is itself asynchronous,
/// so "still checking" is a first-class value rather than an overloaded
/// null: sessions start at `Unknown` until the check resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialPresence {
    /// The asynchronous presence check has not resolved yet
    #[default]
    Unknown,
    /// No credential has been selected
    Absent,
    /// A credential is selected and available
    Present,
}

impl CredentialPresence {
    /// Get string representation of the presence state.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialPresence::Unknown => "unknown",
            CredentialPresence::Absent => "absent",
            CredentialPresence::Present => "present",
        }
    }

    /// Check whether a credential is known to be selected.
    pub fn is_present(&self) -> bool {
        matches!(self, CredentialPresence::Present)
    }
}

impl From<bool> for CredentialPresence {
    fn from(selected: bool) -> Self {
        if selected {
            CredentialPresence::Present
        } else {
            CredentialPresence::Absent
        }
    }
}

impl std::fmt::Display for CredentialPresence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

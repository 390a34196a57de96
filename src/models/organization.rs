// src/models/organization.rs

//! Organization records and their API representation.

use serde::{Deserialize, Serialize};

/// Store-assigned identity of an organization registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(pub u64);

impl std::fmt::Display for OrgId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An organization registered for one contest year.
///
/// `name` is only unique together with `year`: the same organization
/// re-registers every year under the same short name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrgId,

    /// Short name, e.g. "brlcad"
    pub name: String,

    /// Display name, e.g. "BRL-CAD" (may be empty)
    #[serde(default)]
    pub full_name: String,

    pub year: i32,
}

/// An organization that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrganization {
    pub name: String,
    pub full_name: String,
    pub year: i32,
}

impl NewOrganization {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>, year: i32) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            year,
        }
    }

    /// Attach the identity assigned by the store.
    pub fn with_id(self, id: OrgId) -> Organization {
        Organization {
            id,
            name: self.name,
            full_name: self.full_name,
            year: self.year,
        }
    }
}

/// Organization as returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationView {
    pub name: String,
    pub full_name: String,
    pub year: i32,
}

impl From<&Organization> for OrganizationView {
    fn from(org: &Organization) -> Self {
        Self {
            name: org.name.clone(),
            full_name: org.full_name.clone(),
            year: org.year,
        }
    }
}

/// Organizations of a single contest year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearOrganizations {
    pub year: i32,
    pub orgs: Vec<OrganizationView>,
}

//! Attached profiles and the page destinations the routers resolve to.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kinds of role profile a user can own.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Student,
    Staff,
    Driver,
    Parent,
}

/// The set of profiles linked to one user, loaded from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachedProfiles(BTreeSet<ProfileKind>);

impl AttachedProfiles {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn contains(&self, kind: ProfileKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn insert(&mut self, kind: ProfileKind) {
        self.0.insert(kind);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Kinds in a stable order.
    pub fn kinds(&self) -> Vec<ProfileKind> {
        self.0.iter().copied().collect()
    }
}

impl FromIterator<ProfileKind> for AttachedProfiles {
    fn from_iter<I: IntoIterator<Item = ProfileKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Landing and profile pages rendered by the surrounding UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    AdminDashboard,
    StudentDashboard,
    DriverDashboard,
    StaffDashboard,
    TransportDashboard,
    AdminProfile,
    StudentProfile,
    DriverProfile,
    StaffProfile,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::AdminDashboard => "/admin-dashboard/",
            Destination::StudentDashboard => "/students/dashboard/",
            Destination::DriverDashboard => "/transport/driver-dashboard/",
            Destination::StaffDashboard => "/staff/dashboard/",
            Destination::TransportDashboard => "/transport/dashboard/",
            Destination::AdminProfile => "/admin-profile/",
            Destination::StudentProfile => "/students/profile/",
            Destination::DriverProfile => "/transport/driver-profile/",
            Destination::StaffProfile => "/staff/profile/",
        }
    }
}

/// Body sent with a `303 See Other` from the dashboard and profile routers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NavigationResponse {
    pub destination: Destination,
    #[schema(example = "/staff/dashboard/")]
    pub location: String,
}

impl From<Destination> for NavigationResponse {
    fn from(destination: Destination) -> Self {
        Self {
            destination,
            location: destination.path().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attached_profiles_set_semantics() {
        let profiles: AttachedProfiles =
            [ProfileKind::Driver, ProfileKind::Staff, ProfileKind::Driver]
                .into_iter()
                .collect();
        assert!(profiles.contains(ProfileKind::Driver));
        assert!(!profiles.contains(ProfileKind::Student));
        assert_eq!(profiles.kinds(), vec![ProfileKind::Staff, ProfileKind::Driver]);
        assert!(AttachedProfiles::none().is_empty());
    }

    #[test]
    fn test_navigation_response_carries_path() {
        let body = NavigationResponse::from(Destination::DriverDashboard);
        assert_eq!(body.location, "/transport/driver-dashboard/");
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""destination":"driver_dashboard""#));
    }
}

//! Landing and profile page resolution.
//!
//! Both functions are pure over the role tag and the set of attached
//! profiles. A TEACHER or STAFF user who also owns a driver profile is
//! treated as a driver. Roles outside the routed set yield `None`, which
//! callers surface as access denied.

use schoolhub_models::users::UserRole;
use schoolhub_models::{AttachedProfiles, Destination, ProfileKind};

pub fn route_dashboard(role: Option<UserRole>, profiles: &AttachedProfiles) -> Option<Destination> {
    match role? {
        UserRole::Admin => Some(Destination::AdminDashboard),
        UserRole::Student => Some(Destination::StudentDashboard),
        UserRole::Teacher | UserRole::Staff if profiles.contains(ProfileKind::Driver) => {
            Some(Destination::DriverDashboard)
        }
        UserRole::Teacher | UserRole::Staff => Some(Destination::StaffDashboard),
        UserRole::TransportManager => Some(Destination::TransportDashboard),
    }
}

pub fn route_profile(role: Option<UserRole>, profiles: &AttachedProfiles) -> Option<Destination> {
    match role? {
        UserRole::Admin => Some(Destination::AdminProfile),
        UserRole::Student => Some(Destination::StudentProfile),
        UserRole::Teacher | UserRole::Staff if profiles.contains(ProfileKind::Driver) => {
            Some(Destination::DriverProfile)
        }
        UserRole::Teacher | UserRole::Staff => Some(Destination::StaffProfile),
        UserRole::TransportManager => Some(Destination::DriverProfile),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(kinds: &[ProfileKind]) -> AttachedProfiles {
        kinds.iter().copied().collect()
    }

    #[test]
    fn test_dashboard_table() {
        let none = AttachedProfiles::none();
        let cases = [
            (UserRole::Admin, "/admin-dashboard/"),
            (UserRole::Student, "/students/dashboard/"),
            (UserRole::Teacher, "/staff/dashboard/"),
            (UserRole::Staff, "/staff/dashboard/"),
            (UserRole::TransportManager, "/transport/dashboard/"),
        ];
        for (role, path) in cases {
            assert_eq!(route_dashboard(Some(role), &none).map(|d| d.path()), Some(path));
        }
    }

    #[test]
    fn test_profile_table() {
        let none = AttachedProfiles::none();
        let cases = [
            (UserRole::Admin, "/admin-profile/"),
            (UserRole::Student, "/students/profile/"),
            (UserRole::Teacher, "/staff/profile/"),
            (UserRole::Staff, "/staff/profile/"),
            (UserRole::TransportManager, "/transport/driver-profile/"),
        ];
        for (role, path) in cases {
            assert_eq!(route_profile(Some(role), &none).map(|d| d.path()), Some(path));
        }
    }

    #[test]
    fn test_teacher_with_driver_profile_goes_to_driver_pages() {
        let profiles = with(&[ProfileKind::Staff, ProfileKind::Driver]);
        assert_eq!(
            route_dashboard(Some(UserRole::Teacher), &profiles),
            Some(Destination::DriverDashboard)
        );
        assert_eq!(
            route_profile(Some(UserRole::Staff), &profiles),
            Some(Destination::DriverProfile)
        );
    }

    #[test]
    fn test_driver_profile_does_not_override_other_roles() {
        let profiles = with(&[ProfileKind::Driver]);
        assert_eq!(
            route_dashboard(Some(UserRole::Admin), &profiles),
            Some(Destination::AdminDashboard)
        );
        assert_eq!(
            route_dashboard(Some(UserRole::Student), &profiles),
            Some(Destination::StudentDashboard)
        );
    }

    #[test]
    fn test_unknown_role_is_denied() {
        let profiles = with(&[ProfileKind::Parent]);
        assert_eq!(route_dashboard(None, &profiles), None);
        assert_eq!(route_profile(None, &profiles), None);
    }
}

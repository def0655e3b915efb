//! Roles, capabilities, and admin navigation gating.
//!
//! Each role maps to a fixed capability set through one exhaustive match;
//! sidebar sections declare the capability they require. There is no
//! string matching anywhere in the gating path.

use serde::{Deserialize, Serialize};

/// Closed set of platform roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Donor,
    Partner,
    EventManager,
    Admin,
    SuperAdmin,
}

/// Things a role is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ViewDonations,
    ManageCampaigns,
    ManageEvents,
    IssueCoupons,
    ManagePartners,
    ManageUsers,
    ExportReports,
}

impl Role {
    /// The capability set for this role. The single authority for
    /// permission checks.
    pub fn capabilities(self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Role::Donor => &[ViewDonations],
            Role::Partner => &[ViewDonations, IssueCoupons],
            Role::EventManager => &[ViewDonations, ManageEvents, ExportReports],
            Role::Admin => &[
                ViewDonations,
                ManageCampaigns,
                ManageEvents,
                IssueCoupons,
                ManagePartners,
                ExportReports,
            ],
            Role::SuperAdmin => &[
                ViewDonations,
                ManageCampaigns,
                ManageEvents,
                IssueCoupons,
                ManagePartners,
                ManageUsers,
                ExportReports,
            ],
        }
    }

    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

/// Admin sidebar sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSection {
    Dashboard,
    Campaigns,
    Events,
    Coupons,
    Partners,
    Users,
    Reports,
}

impl NavSection {
    /// Every section in display order.
    pub const ALL: [NavSection; 7] = [
        NavSection::Dashboard,
        NavSection::Campaigns,
        NavSection::Events,
        NavSection::Coupons,
        NavSection::Partners,
        NavSection::Users,
        NavSection::Reports,
    ];

    /// Capability required to see this section.
    pub fn required_capability(self) -> Capability {
        match self {
            NavSection::Dashboard => Capability::ViewDonations,
            NavSection::Campaigns => Capability::ManageCampaigns,
            NavSection::Events => Capability::ManageEvents,
            NavSection::Coupons => Capability::IssueCoupons,
            NavSection::Partners => Capability::ManagePartners,
            NavSection::Users => Capability::ManageUsers,
            NavSection::Reports => Capability::ExportReports,
        }
    }
}

/// Sidebar sections visible to `role`, in display order.
pub fn visible_sections(role: Role) -> Vec<NavSection> {
    NavSection::ALL
        .into_iter()
        .filter(|section| role.can(section.required_capability()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_admin_sees_every_section() {
        assert_eq!(visible_sections(Role::SuperAdmin), NavSection::ALL.to_vec());
    }

    #[test]
    fn donor_only_sees_dashboard() {
        assert_eq!(visible_sections(Role::Donor), vec![NavSection::Dashboard]);
    }

    #[test]
    fn partner_sees_coupons_but_not_users() {
        let sections = visible_sections(Role::Partner);
        assert!(sections.contains(&NavSection::Coupons));
        assert!(!sections.contains(&NavSection::Users));
    }

    #[test]
    fn only_super_admin_manages_users() {
        for role in [
            Role::Donor,
            Role::Partner,
            Role::EventManager,
            Role::Admin,
        ] {
            assert!(!role.can(Capability::ManageUsers), "{role:?}");
        }
        assert!(Role::SuperAdmin.can(Capability::ManageUsers));
    }

    #[test]
    fn role_round_trips_through_serde() {
        let json = serde_json::to_string(&Role::EventManager).unwrap();
        assert_eq!(json, "\"event_manager\"");
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Role::EventManager);
    }
}

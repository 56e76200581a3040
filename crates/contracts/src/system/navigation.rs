//! Role-gated navigation.
//!
//! A static role -> menu mapping. It decides what the dashboard shows, not
//! what the API allows.

use serde::Serialize;

use crate::enums::UserRole;
use crate::system::auth::UserInfo;

/// One entry of the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Screen id the UI routes on
    pub id: &'static str,
    pub label: &'static str,
    /// Heading the entry is grouped under
    pub section: &'static str,
}

const fn item(section: &'static str, id: &'static str, label: &'static str) -> NavItem {
    NavItem { id, label, section }
}

const ADMIN_MENU: &[NavItem] = &[
    item("Overview", "dashboard", "Dashboard"),
    item("Management", "users", "User Management"),
    item("Management", "fleet", "Fleet Management"),
    item("Management", "patients", "Patient Records"),
    item("Operations", "tracking", "Live Tracking"),
    item("Inspections", "vehicle-inspections", "Vehicle Inspections"),
    item("Inspections", "medical-inspections", "Medical Inspections"),
];

const DISPATCHER_MENU: &[NavItem] = &[
    item("Dispatch", "calls", "Emergency Dispatch"),
    item("Dispatch", "tracking", "Unit Tracking"),
    item("Records", "patients", "Patient Info"),
];

const DRIVER_MENU: &[NavItem] = &[
    item("Assignments", "calls", "My Assignments"),
    item("Assignments", "tracking", "Navigation"),
    item("Checks", "vehicle-inspection", "Vehicle Inspection"),
];

const PARAMEDIC_MENU: &[NavItem] = &[
    item("Care", "patients", "Patient Care"),
    item("Checks", "medical-inspection", "Equipment Inspection"),
];

/// Ordered menu for `role`
pub fn menu_for(role: UserRole) -> &'static [NavItem] {
    match role {
        UserRole::Admin => ADMIN_MENU,
        UserRole::Dispatcher => DISPATCHER_MENU,
        UserRole::Driver => DRIVER_MENU,
        UserRole::Paramedic => PARAMEDIC_MENU,
    }
}

/// Menu entries grouped by section, keeping the menu order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavSection {
    pub label: &'static str,
    pub items: Vec<NavItem>,
}

pub fn sections_for(role: UserRole) -> Vec<NavSection> {
    let mut sections: Vec<NavSection> = Vec::new();
    for entry in menu_for(role) {
        match sections.last_mut() {
            Some(last) if last.label == entry.section => last.items.push(*entry),
            _ => sections.push(NavSection {
                label: entry.section,
                items: vec![*entry],
            }),
        }
    }
    sections
}

/// Signed-in user plus what they may navigate to.
///
/// Built per request from the bearer token, handed to whoever needs it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionContext {
    pub user: UserInfo,
    pub sections: Vec<NavSection>,
}

impl SessionContext {
    pub fn new(user: UserInfo) -> Self {
        let sections = sections_for(user.role);
        Self { user, sections }
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    /// Whether the sidebar offers screen `id`
    pub fn can_open(&self, id: &str) -> bool {
        menu_for(self.user.role).iter().any(|entry| entry.id == id)
    }

    /// Screen shown right after sign-in
    pub fn landing_screen(&self) -> Option<&'static str> {
        menu_for(self.user.role).first().map(|entry| entry.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> UserInfo {
        UserInfo {
            id: "u1".into(),
            username: role.as_str().into(),
            full_name: None,
            email: None,
            role,
        }
    }

    #[test]
    fn test_every_role_has_a_menu() {
        for role in UserRole::all() {
            assert!(!menu_for(*role).is_empty(), "{} has no menu", role);
        }
    }

    #[test]
    fn test_dispatcher_menu_order() {
        let ids: Vec<_> = menu_for(UserRole::Dispatcher).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["calls", "tracking", "patients"]);
    }

    #[test]
    fn test_sections_group_consecutive_items() {
        let sections = sections_for(UserRole::Admin);
        let labels: Vec<_> = sections.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["Overview", "Management", "Operations", "Inspections"]);
        assert_eq!(sections[1].items.len(), 3);
    }

    #[test]
    fn test_session_context() {
        let session = SessionContext::new(user(UserRole::Paramedic));
        assert_eq!(session.landing_screen(), Some("patients"));
        assert!(session.can_open("medical-inspection"));
        assert!(!session.can_open("users"));

        let admin = SessionContext::new(user(UserRole::Admin));
        assert!(admin.can_open("users"));
        assert_eq!(admin.role(), UserRole::Admin);
    }
}

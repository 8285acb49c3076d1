//! Transportation system type.

use super::SystemId;

/// One operator's deployment: a university shuttle network, a city service,
/// an airport. The root scope for every other query.
#[derive(Debug, Clone, PartialEq)]
pub struct System {
    pub id: SystemId,
    /// Display name; never empty.
    pub name: String,
    pub homepage: Option<String>,
    /// Rider support contact (`goSupportEmail`).
    pub support_email: Option<String>,
    /// Administrative contact (`email`).
    pub email: Option<String>,
    pub username: Option<String>,
    pub agency_name: Option<String>,
    /// Brand color, usually a hex code.
    pub color: Option<String>,
    pub shared_code: Option<i64>,
    pub test_mode: Option<bool>,
    pub route_planner_enabled: Option<bool>,
    pub has_logo: Option<bool>,
    pub requires_authentication: Option<bool>,
}

impl System {
    /// Create a system with only the required fields set.
    pub fn new(id: SystemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            homepage: None,
            support_email: None,
            email: None,
            username: None,
            agency_name: None,
            color: None,
            shared_code: None,
            test_mode: None,
            route_planner_enabled: None,
            has_logo: None,
            requires_authentication: None,
        }
    }
}

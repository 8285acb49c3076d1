//! Service alert type.

use chrono::NaiveDateTime;

use super::{AlertId, RouteId, SystemId};

/// An operator notice with an optional active window.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub id: AlertId,
    pub system_id: SystemId,
    pub name: String,
    pub important: Option<bool>,
    /// Start of the active window, operator local time.
    pub active_from: Option<NaiveDateTime>,
    /// End of the active window; never before `active_from`.
    pub active_to: Option<NaiveDateTime>,
    /// Body as authored, HTML.
    pub html: Option<String>,
    /// Plain-text body from the GTFS feed, when the operator publishes one.
    pub description: Option<String>,
    pub header: Option<String>,
    pub url: Option<String>,
    pub route_id: Option<RouteId>,
    pub archived: Option<bool>,
    pub created: Option<NaiveDateTime>,
    pub cause_id: Option<i64>,
    pub effect_id: Option<i64>,
    pub author: Option<String>,
}

impl Alert {
    /// Create an alert with only the required fields set.
    pub fn new(id: impl Into<AlertId>, system_id: SystemId, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            system_id,
            name: name.into(),
            important: None,
            active_from: None,
            active_to: None,
            html: None,
            description: None,
            header: None,
            url: None,
            route_id: None,
            archived: None,
            created: None,
            cause_id: None,
            effect_id: None,
            author: None,
        }
    }

    pub fn is_important(&self) -> bool {
        self.important == Some(true)
    }

    /// Whether the alert applies at the given instant.
    ///
    /// An open end of the window is unbounded.
    pub fn is_active_at(&self, at: NaiveDateTime) -> bool {
        self.active_from.is_none_or(|from| from <= at) && self.active_to.is_none_or(|to| at <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let mut alert = Alert::new("5", SystemId::new(1270), "Detour");
        alert.active_from = Some(at(2, 8));
        alert.active_to = Some(at(4, 18));

        assert!(!alert.is_active_at(at(2, 7)));
        assert!(alert.is_active_at(at(2, 8)));
        assert!(alert.is_active_at(at(4, 18)));
        assert!(!alert.is_active_at(at(4, 19)));
    }

    #[test]
    fn open_window_is_unbounded() {
        let alert = Alert::new("5", SystemId::new(1270), "Detour");
        assert!(alert.is_active_at(at(1, 0)));
    }

    #[test]
    fn importance_defaults_to_false() {
        let mut alert = Alert::new("5", SystemId::new(1270), "Detour");
        assert!(!alert.is_important());
        alert.important = Some(true);
        assert!(alert.is_important());
    }
}

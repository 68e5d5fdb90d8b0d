//! Screens of the console and the paths that address them.

/// Every screen the console can show
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Services,
    ServiceNew,
    ServiceEdit(String),
    Trainings,
    TrainingNew,
    TrainingEdit(String),
    Bookings,
    Reviews,
    ReviewDetail(String),
    Contacts,
    ContactDetail(String),
    Users,
    UserNew,
    UserEdit(String),
    MenuItems,
    MenuItemNew,
    MenuItemEdit(String),
}

/// Navigation entries, in sidebar order
static SIDEBAR: [Route; 8] = [
    Route::Dashboard,
    Route::Trainings,
    Route::Bookings,
    Route::Contacts,
    Route::Users,
    Route::MenuItems,
    Route::Services,
    Route::Reviews,
];

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/".to_string(),
            Route::Services => "/services".to_string(),
            Route::ServiceNew => "/services/new".to_string(),
            Route::ServiceEdit(id) => format!("/services/edit/{}", id),
            Route::Trainings => "/trainings".to_string(),
            Route::TrainingNew => "/trainings/new".to_string(),
            Route::TrainingEdit(id) => format!("/trainings/edit/{}", id),
            Route::Bookings => "/bookings".to_string(),
            Route::Reviews => "/reviews".to_string(),
            Route::ReviewDetail(id) => format!("/reviews/{}", id),
            Route::Contacts => "/contacts".to_string(),
            Route::ContactDetail(id) => format!("/contacts/{}", id),
            Route::Users => "/users".to_string(),
            Route::UserNew => "/users/new".to_string(),
            Route::UserEdit(id) => format!("/users/edit/{}", id),
            Route::MenuItems => "/menu-items".to_string(),
            Route::MenuItemNew => "/menu-items/new".to_string(),
            Route::MenuItemEdit(id) => format!("/menu-items/edit/{}", id),
        }
    }

    /// Resolve a path. Anything unrecognised lands on the dashboard.
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path
            .split('?')
            .next()
            .unwrap_or("")
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            ["login"] => Route::Login,
            ["services"] => Route::Services,
            ["services", "new"] => Route::ServiceNew,
            ["services", "edit", id] => Route::ServiceEdit(id.to_string()),
            ["trainings"] => Route::Trainings,
            ["trainings", "new"] => Route::TrainingNew,
            ["trainings", "edit", id] => Route::TrainingEdit(id.to_string()),
            ["bookings"] => Route::Bookings,
            ["reviews"] => Route::Reviews,
            ["reviews", id] => Route::ReviewDetail(id.to_string()),
            ["contacts"] => Route::Contacts,
            ["contacts", id] => Route::ContactDetail(id.to_string()),
            ["users"] => Route::Users,
            ["users", "new"] => Route::UserNew,
            ["users", "edit", id] => Route::UserEdit(id.to_string()),
            ["menu-items"] => Route::MenuItems,
            ["menu-items", "new"] => Route::MenuItemNew,
            ["menu-items", "edit", id] => Route::MenuItemEdit(id.to_string()),
            _ => Route::Dashboard,
        }
    }

    /// Get the display title for this screen.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign In",
            Route::Dashboard => "Dashboard",
            Route::Services => "Services",
            Route::ServiceNew => "Add Service",
            Route::ServiceEdit(_) => "Edit Service",
            Route::Trainings => "Trainings",
            Route::TrainingNew => "Add Training",
            Route::TrainingEdit(_) => "Edit Training",
            Route::Bookings => "Bookings",
            Route::Reviews => "Reviews",
            Route::ReviewDetail(_) => "Review",
            Route::Contacts => "Contact Messages",
            Route::ContactDetail(_) => "Message",
            Route::Users => "Users",
            Route::UserNew => "Add User",
            Route::UserEdit(_) => "Edit User",
            Route::MenuItems => "Menu Items",
            Route::MenuItemNew => "Add Menu Item",
            Route::MenuItemEdit(_) => "Edit Menu Item",
        }
    }

    /// Everything except the login screen needs an admin session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }

    pub fn sidebar() -> &'static [Route] {
        &SIDEBAR
    }

    /// The sidebar entry this screen belongs under
    pub fn section(&self) -> Route {
        match self {
            Route::ServiceNew | Route::ServiceEdit(_) => Route::Services,
            Route::TrainingNew | Route::TrainingEdit(_) => Route::Trainings,
            Route::ReviewDetail(_) => Route::Reviews,
            Route::ContactDetail(_) => Route::Contacts,
            Route::UserNew | Route::UserEdit(_) => Route::Users,
            Route::MenuItemNew | Route::MenuItemEdit(_) => Route::MenuItems,
            other => other.clone(),
        }
    }

    /// Where "back" goes from a form or detail screen
    pub fn parent(&self) -> Option<Route> {
        let section = self.section();
        if &section == self {
            None
        } else {
            Some(section)
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_parse_back() {
        let routes = [
            Route::Dashboard,
            Route::ServiceEdit("s1".to_string()),
            Route::TrainingNew,
            Route::ReviewDetail("r9".to_string()),
            Route::ContactDetail("c3".to_string()),
            Route::UserEdit("u2".to_string()),
            Route::MenuItemEdit("m7".to_string()),
            Route::Login,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_unknown_paths_fall_back_to_dashboard() {
        assert_eq!(Route::parse("/nope"), Route::Dashboard);
        assert_eq!(Route::parse("/services/edit"), Route::Dashboard);
        assert_eq!(Route::parse(""), Route::Dashboard);
        assert_eq!(Route::parse("/bookings?page=2"), Route::Bookings);
    }

    #[test]
    fn test_only_login_is_public() {
        assert!(!Route::Login.is_protected());
        assert!(Route::Dashboard.is_protected());
        assert!(Route::sidebar().iter().all(Route::is_protected));
    }

    #[test]
    fn test_sidebar_order() {
        let titles: Vec<&str> = Route::sidebar().iter().map(Route::title).collect();
        assert_eq!(
            titles,
            ["Dashboard", "Trainings", "Bookings", "Contact Messages", "Users", "Menu Items", "Services", "Reviews"]
        );
    }

    #[test]
    fn test_parent() {
        assert_eq!(Route::UserNew.parent(), Some(Route::Users));
        assert_eq!(Route::ContactDetail("c".into()).parent(), Some(Route::Contacts));
        assert_eq!(Route::Bookings.parent(), None);
    }
}

/// Screens of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Services,
}

impl Route {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/admin/dashboard",
            Self::Services => "/admin/services",
        }
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        [Self::Login, Self::Dashboard, Self::Services]
            .into_iter()
            .find(|route| route.path() == path.trim_end_matches('/'))
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Dashboard => "Dashboard",
            Self::Services => "Services",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Route),
}

impl RouteDecision {
    /// The route that ends up on screen
    #[must_use]
    pub const fn resolve(self, requested: Route) -> Route {
        match self {
            Self::Allow => requested,
            Self::Redirect(route) => route,
        }
    }
}

/// Sends visitors without a session to the login screen and signed-in users
/// away from it.
#[must_use]
pub const fn guard(route: Route, has_token: bool) -> RouteDecision {
    match (route, has_token) {
        (Route::Login, true) => RouteDecision::Redirect(Route::Dashboard),
        (Route::Login, false) | (Route::Dashboard | Route::Services, true) => {
            RouteDecision::Allow
        }
        (Route::Dashboard | Route::Services, false) => {
            RouteDecision::Redirect(Route::Login)
        }
    }
}

use std::fmt;

use serde::Serialize;
use voyant_core::RoleFlags;

use crate::error::LOGIN_ROUTE;
use crate::session::SessionSnapshot;

pub const UNAUTHORIZED_ROUTE: &str = "/unauthorized";

// ============================================================================
// Routes
// ============================================================================

/// Client-side routes of the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Destinations,
    Destination(String),
    Hotels,
    Hotel(String),
    Cars,
    Car(String),
    Flights,
    Flight(String),
    Packages,
    Package(String),
    BookHotel(String),
    BookCar(String),
    BookFlight(String),
    BookPackage(String),
    Payment,
    Receipt,
    /// Customer dashboard with the user's own bookings.
    Dashboard,
    Organizer,
    Admin,
    Login,
    Register,
    Unauthorized,
    NotFound(String),
}

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    /// Organizers, and admins who can see everything.
    OrganizerOrAdmin,
    Admin,
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["destinations"] => Route::Destinations,
            ["destinations", id] => Route::Destination(id.to_string()),
            ["hotels"] => Route::Hotels,
            ["hotels", id] => Route::Hotel(id.to_string()),
            ["hotels", id, "book"] => Route::BookHotel(id.to_string()),
            ["cars"] => Route::Cars,
            ["cars", id] => Route::Car(id.to_string()),
            ["cars", id, "book"] => Route::BookCar(id.to_string()),
            ["flights"] => Route::Flights,
            ["flights", id] => Route::Flight(id.to_string()),
            ["flights", id, "book"] => Route::BookFlight(id.to_string()),
            ["packages"] => Route::Packages,
            ["packages", id] => Route::Package(id.to_string()),
            ["packages", id, "book"] => Route::BookPackage(id.to_string()),
            ["payment"] => Route::Payment,
            ["receipt"] => Route::Receipt,
            ["dashboard"] => Route::Dashboard,
            ["organizer"] => Route::Organizer,
            ["admin"] => Route::Admin,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["unauthorized"] => Route::Unauthorized,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Destinations => "/destinations".to_string(),
            Route::Destination(id) => format!("/destinations/{}", id),
            Route::Hotels => "/hotels".to_string(),
            Route::Hotel(id) => format!("/hotels/{}", id),
            Route::Cars => "/cars".to_string(),
            Route::Car(id) => format!("/cars/{}", id),
            Route::Flights => "/flights".to_string(),
            Route::Flight(id) => format!("/flights/{}", id),
            Route::Packages => "/packages".to_string(),
            Route::Package(id) => format!("/packages/{}", id),
            Route::BookHotel(id) => format!("/hotels/{}/book", id),
            Route::BookCar(id) => format!("/cars/{}/book", id),
            Route::BookFlight(id) => format!("/flights/{}/book", id),
            Route::BookPackage(id) => format!("/packages/{}/book", id),
            Route::Payment => "/payment".to_string(),
            Route::Receipt => "/receipt".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Organizer => "/organizer".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::Login => LOGIN_ROUTE.to_string(),
            Route::Register => "/register".to_string(),
            Route::Unauthorized => UNAUTHORIZED_ROUTE.to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::BookHotel(_)
            | Route::BookCar(_)
            | Route::BookFlight(_)
            | Route::BookPackage(_)
            | Route::Payment
            | Route::Receipt
            | Route::Dashboard => Access::Authenticated,
            Route::Organizer => Access::OrganizerOrAdmin,
            Route::Admin => Access::Admin,
            _ => Access::Public,
        }
    }

    /// Routes that only make sense with navigation state handed over from the previous view.
    pub fn expects_state(&self) -> bool {
        matches!(self, Route::Payment | Route::Receipt)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// ============================================================================
// Guard
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Start-up session validation still running; render nothing yet.
    Pending,
    Allow,
    Redirect(&'static str),
}

fn role_allows(access: Access, flags: RoleFlags) -> bool {
    match access {
        Access::Public | Access::Authenticated => true,
        Access::OrganizerOrAdmin => flags.is_organizer || flags.is_admin,
        Access::Admin => flags.is_admin,
    }
}

pub fn guard(route: &Route, session: &SessionSnapshot) -> GuardDecision {
    let access = route.access();
    if access == Access::Public {
        return GuardDecision::Allow;
    }
    if session.loading {
        return GuardDecision::Pending;
    }
    if !session.is_authenticated() {
        return GuardDecision::Redirect(LOGIN_ROUTE);
    }
    if !role_allows(access, session.flags()) {
        return GuardDecision::Redirect(UNAUTHORIZED_ROUTE);
    }
    GuardDecision::Allow
}

// ============================================================================
// Navigation links
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub path: String,
}

fn link(label: &'static str, route: Route) -> NavLink {
    NavLink {
        label,
        path: route.path(),
    }
}

/// Where "My dashboard" points for the current user.
pub fn dashboard_for(flags: RoleFlags) -> Route {
    if flags.is_admin {
        Route::Admin
    } else if flags.is_organizer {
        Route::Organizer
    } else {
        Route::Dashboard
    }
}

pub fn nav_links(flags: RoleFlags, authenticated: bool) -> Vec<NavLink> {
    let mut links = vec![
        link("Home", Route::Home),
        link("Destinations", Route::Destinations),
        link("Hotels", Route::Hotels),
        link("Flights", Route::Flights),
        link("Cars", Route::Cars),
        link("Tours", Route::Packages),
    ];

    if !authenticated {
        links.push(link("Login", Route::Login));
        links.push(link("Register", Route::Register));
        return links;
    }

    if flags.is_customer || !(flags.is_admin || flags.is_organizer) {
        links.push(link("My Bookings", Route::Dashboard));
    }
    if flags.is_organizer || flags.is_admin {
        links.push(link("Organizer", Route::Organizer));
    }
    if flags.is_admin {
        links.push(link("Admin", Route::Admin));
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use voyant_core::User;
    use voyant_shared::Masked;

    fn signed_in(user: serde_json::Value) -> SessionSnapshot {
        SessionSnapshot {
            access_token: Some(Masked::from("a1")),
            refresh_token: Some(Masked::from("r1")),
            user: Some(serde_json::from_value::<User>(user).unwrap()),
            loading: false,
        }
    }

    #[test]
    fn test_parse_round_trips_known_paths() {
        for path in ["/", "/hotels/7", "/cars/3/book", "/payment", "/admin", "/packages"] {
            assert_eq!(Route::parse(path).path(), path);
        }
        assert_eq!(Route::parse("/receipt?x=1"), Route::Receipt);
        assert_eq!(Route::parse("/nope/1/2/3"), Route::NotFound("/nope/1/2/3".to_string()));
    }

    #[test]
    fn test_customer_is_kept_out_of_admin() {
        let session = signed_in(serde_json::json!({
            "id": 5, "username": "cust", "role": "CUSTOMER", "is_staff": false
        }));
        assert_eq!(guard(&Route::Admin, &session), GuardDecision::Redirect("/unauthorized"));
        assert_eq!(guard(&Route::Organizer, &session), GuardDecision::Redirect("/unauthorized"));
        assert_eq!(guard(&Route::Dashboard, &session), GuardDecision::Allow);
    }

    #[test]
    fn test_staff_flag_grants_admin() {
        let session = signed_in(serde_json::json!({
            "id": 6, "username": "ops", "role": "CUSTOMER", "is_staff": true
        }));
        assert_eq!(guard(&Route::Admin, &session), GuardDecision::Allow);
        assert_eq!(dashboard_for(session.flags()), Route::Admin);
    }

    #[test]
    fn test_loading_and_anonymous() {
        let loading = SessionSnapshot {
            access_token: Some(Masked::from("a1")),
            loading: true,
            ..Default::default()
        };
        assert_eq!(guard(&Route::Payment, &loading), GuardDecision::Pending);
        assert_eq!(guard(&Route::Hotels, &loading), GuardDecision::Allow);

        let anonymous = SessionSnapshot::default();
        assert_eq!(guard(&Route::BookCar("1".into()), &anonymous), GuardDecision::Redirect("/login"));
    }

    #[test]
    fn test_nav_links_by_role() {
        let paths = |links: Vec<NavLink>| links.into_iter().map(|l| l.path).collect::<Vec<_>>();

        let anon = paths(nav_links(RoleFlags::default(), false));
        assert!(anon.contains(&"/login".to_string()));
        assert!(!anon.contains(&"/dashboard".to_string()));

        let organizer = RoleFlags {
            is_organizer: true,
            ..Default::default()
        };
        let links = paths(nav_links(organizer, true));
        assert!(links.contains(&"/organizer".to_string()));
        assert!(!links.contains(&"/admin".to_string()));
        assert_eq!(dashboard_for(organizer), Route::Organizer);
    }
}

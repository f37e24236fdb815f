//! Stateless navigation guard: a decision table over three permission
//! flags per route, evaluated against the current session before a view
//! is served.

use crate::auth::UserSession;

#[derive(Debug, Clone, Copy)]
pub struct RouteMeta {
    pub path: &'static str,
    pub view: &'static str,
    pub requires_auth: bool,
    pub requires_admin: bool,
    pub requires_trainer: bool,
}

const fn public(path: &'static str, view: &'static str) -> RouteMeta {
    RouteMeta {
        path,
        view,
        requires_auth: false,
        requires_admin: false,
        requires_trainer: false,
    }
}

const fn authed(path: &'static str, view: &'static str) -> RouteMeta {
    RouteMeta {
        path,
        view,
        requires_auth: true,
        requires_admin: false,
        requires_trainer: false,
    }
}

const fn admin(path: &'static str, view: &'static str) -> RouteMeta {
    RouteMeta {
        path,
        view,
        requires_auth: true,
        requires_admin: true,
        requires_trainer: false,
    }
}

const fn trainer(path: &'static str, view: &'static str) -> RouteMeta {
    RouteMeta {
        path,
        view,
        requires_auth: true,
        requires_admin: false,
        requires_trainer: true,
    }
}

pub const ROUTES: &[RouteMeta] = &[
    public("/", "Home"),
    public("/login", "Login"),
    public("/register", "Register"),
    authed("/dashboard", "Dashboard"),
    authed("/training", "Training"),
    authed("/training/:day_id", "ActiveTraining"),
    authed("/history", "History"),
    admin("/admin/exercises", "AdminExercises"),
    trainer("/trainer/templates", "TrainerTemplates"),
    trainer("/trainer/templates/:template_id", "TrainerTemplateEdit"),
    trainer("/trainer/students", "TrainerStudents"),
];

pub const DASHBOARD_PATH: &str = "/dashboard";
pub const LOGIN_PATH: &str = "/login";

pub const ADMIN_NOTICE: &str = "Administrator access is required for this page";
pub const TRAINER_NOTICE: &str = "Trainer access is required for this page";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Send to login, preserving the intended destination
    RedirectToLogin { redirect: String },
    /// Send to the landing page, optionally with a blocking notice
    RedirectToDashboard { notice: Option<&'static str> },
}

/// Look up the route table entry matching a concrete path. Segments
/// starting with `:` match any single segment.
pub fn route_meta(path: &str) -> Option<&'static RouteMeta> {
    ROUTES.iter().find(|meta| pattern_matches(meta.path, path))
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.trim_matches('/').split('/');
    let mut path_segments = path.trim_matches('/').split('/');

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(p), Some(s)) if p.starts_with(':') && !s.is_empty() => continue,
            (Some(p), Some(s)) if p == s => continue,
            _ => return false,
        }
    }
}

/// The guard proper. Checked in the same order the source checks them:
/// auth, admin tier, trainer tier, then the login/register bounce.
pub fn evaluate(
    meta: &RouteMeta,
    session: Option<&UserSession>,
    requested: &str,
) -> GuardDecision {
    if meta.requires_auth && session.is_none() {
        return GuardDecision::RedirectToLogin {
            redirect: requested.to_string(),
        };
    }

    if meta.requires_admin && !session.map_or(false, |s| s.role.is_admin()) {
        return GuardDecision::RedirectToDashboard {
            notice: Some(ADMIN_NOTICE),
        };
    }

    if meta.requires_trainer && !session.map_or(false, |s| s.role.is_trainer_or_admin()) {
        return GuardDecision::RedirectToDashboard {
            notice: Some(TRAINER_NOTICE),
        };
    }

    if (meta.path == LOGIN_PATH || meta.path == "/register") && session.is_some() {
        return GuardDecision::RedirectToDashboard { notice: None };
    }

    GuardDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn session(role: Role) -> UserSession {
        UserSession {
            user_id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            role,
            jti: Uuid::new_v4().to_string(),
        }
    }

    #[test]
    fn route_table_lookup_matches_params() {
        assert_eq!(route_meta("/").unwrap().view, "Home");
        assert_eq!(route_meta("/training").unwrap().view, "Training");
        assert_eq!(
            route_meta("/training/4a3e2f10-0000-0000-0000-000000000000")
                .unwrap()
                .view,
            "ActiveTraining"
        );
        assert_eq!(
            route_meta("/trainer/templates/abc").unwrap().view,
            "TrainerTemplateEdit"
        );
        assert!(route_meta("/training/a/b").is_none());
        assert!(route_meta("/unknown").is_none());
    }

    #[test]
    fn unauthenticated_protected_route_redirects_to_login_with_destination() {
        let meta = route_meta("/history").unwrap();

        assert_eq!(
            evaluate(meta, None, "/history"),
            GuardDecision::RedirectToLogin {
                redirect: "/history".to_string()
            }
        );
    }

    #[test]
    fn non_admin_never_reaches_admin_view() {
        let meta = route_meta("/admin/exercises").unwrap();

        for role in [Role::User, Role::Trainer] {
            let decision = evaluate(meta, Some(&session(role)), "/admin/exercises");
            assert_eq!(
                decision,
                GuardDecision::RedirectToDashboard {
                    notice: Some(ADMIN_NOTICE)
                }
            );
        }

        assert_eq!(
            evaluate(meta, Some(&session(Role::Admin)), "/admin/exercises"),
            GuardDecision::Allow
        );
    }

    #[test]
    fn trainer_routes_admit_trainers_and_admins() {
        let meta = route_meta("/trainer/templates").unwrap();

        assert_eq!(
            evaluate(meta, Some(&session(Role::User)), meta.path),
            GuardDecision::RedirectToDashboard {
                notice: Some(TRAINER_NOTICE)
            }
        );
        assert_eq!(
            evaluate(meta, Some(&session(Role::Trainer)), meta.path),
            GuardDecision::Allow
        );
        assert_eq!(
            evaluate(meta, Some(&session(Role::Admin)), meta.path),
            GuardDecision::Allow
        );
    }

    #[test]
    fn authenticated_login_visit_bounces_to_dashboard() {
        let meta = route_meta("/login").unwrap();

        assert_eq!(
            evaluate(meta, Some(&session(Role::User)), "/login"),
            GuardDecision::RedirectToDashboard { notice: None }
        );
        assert_eq!(evaluate(meta, None, "/login"), GuardDecision::Allow);
    }
}

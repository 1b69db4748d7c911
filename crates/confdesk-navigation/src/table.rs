//! Route table and path resolution

use crate::error::NavigationError;
use crate::route::{Route, RouteTarget, View};
use crate::Result;

/// Where a path ends up after following redirects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteResolution {
    Render {
        path: String,
        view: View,
        requires_auth: bool,
    },
    NotFound(String),
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Result<Self> {
        for (i, route) in routes.iter().enumerate() {
            let path = normalize(&route.path);
            if routes[..i].iter().any(|r| normalize(&r.path) == path) {
                return Err(NavigationError::DuplicatePath(route.path.clone()));
            }
        }

        Ok(Self { routes })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn find(&self, path: &str) -> Option<&Route> {
        let path = normalize(path);
        self.routes.iter().find(|r| normalize(&r.path) == path)
    }

    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name.as_deref() == Some(name))
    }

    /// Resolve a path to a view, following redirects
    pub fn resolve(&self, path: &str) -> Result<RouteResolution> {
        let mut current = normalize(path).to_string();
        let mut visited: Vec<String> = Vec::new();

        loop {
            let Some(route) = self.find(&current) else {
                return Ok(RouteResolution::NotFound(current));
            };

            match &route.target {
                RouteTarget::View(view) => {
                    return Ok(RouteResolution::Render {
                        path: route.path.clone(),
                        view: *view,
                        requires_auth: route.requires_auth,
                    });
                }
                RouteTarget::Redirect(to) => {
                    if visited.contains(&current) {
                        return Err(NavigationError::RedirectLoop(current));
                    }
                    tracing::debug!(from = %current, to = %to, "Following redirect");
                    visited.push(current);
                    current = normalize(to).to_string();
                }
            }
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            routes: vec![
                Route::view("/login", View::Login),
                Route::view("/register", View::Register),
                Route::view("/dashboard", View::Dashboard).with_auth(),
                Route::redirect("/", "/login"),
            ],
        }
    }
}

/// Strip a trailing slash, keeping `/` itself
fn normalize(path: &str) -> &str {
    let trimmed = path.trim();
    if trimmed.len() > 1 {
        trimmed.trim_end_matches('/')
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_redirects_to_login() {
        let table = RouteTable::default();
        assert_eq!(
            table.resolve("/").unwrap(),
            RouteResolution::Render {
                path: "/login".to_string(),
                view: View::Login,
                requires_auth: false,
            }
        );
    }

    #[test]
    fn test_only_dashboard_requires_auth() {
        let table = RouteTable::default();
        let flagged: Vec<&str> = table
            .routes()
            .iter()
            .filter(|r| r.requires_auth)
            .map(|r| r.path.as_str())
            .collect();
        assert_eq!(flagged, vec!["/dashboard"]);

        match table.resolve("/dashboard/").unwrap() {
            RouteResolution::Render {
                view,
                requires_auth,
                ..
            } => {
                assert_eq!(view, View::Dashboard);
                assert!(requires_auth);
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_path() {
        let table = RouteTable::default();
        assert_eq!(
            table.resolve("/settings").unwrap(),
            RouteResolution::NotFound("/settings".to_string())
        );
    }

    #[test]
    fn test_lookup_by_name() {
        let table = RouteTable::default();
        assert_eq!(table.by_name("Register").unwrap().path, "/register");
        assert!(table.by_name("Missing").is_none());
    }

    #[test]
    fn test_redirect_loop_detected() {
        let table = RouteTable::new(vec![
            Route::redirect("/a", "/b"),
            Route::redirect("/b", "/a"),
        ])
        .unwrap();
        assert!(matches!(
            table.resolve("/a"),
            Err(NavigationError::RedirectLoop(_))
        ));
    }

    #[test]
    fn test_duplicate_paths_rejected() {
        let result = RouteTable::new(vec![
            Route::view("/login", View::Login),
            Route::view("/login/", View::Register),
        ]);
        assert!(matches!(result, Err(NavigationError::DuplicatePath(_))));
    }
}

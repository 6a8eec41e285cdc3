//! Integration tests for route groups

use keel_core::route_registry::{with_summary, with_tags};
use keel_core::*;

fn noop() -> HandlerFn {
    handler(|_req| async { Ok(HttpResponse::ok()) })
}

#[test]
fn test_group_prefixes_routes() {
    let mut registry = RouteRegistry::new();
    {
        let mut users = registry.group("/users");
        users.get("", noop(), []);
        users.get("/:id", noop(), [with_summary("Get user")]);
        users.post("/", noop(), []);
        users.put("/:id", noop(), []);
        users.patch("/:id", noop(), []);
        users.delete("/:id", noop(), []);
    }

    let paths: Vec<_> = registry
        .routes()
        .iter()
        .map(|r| format!("{} {}", r.method, r.path))
        .collect();
    assert_eq!(
        paths,
        vec![
            "GET /users",
            "GET /users/:id",
            "POST /users/",
            "PUT /users/:id",
            "PATCH /users/:id",
            "DELETE /users/:id",
        ]
    );
    assert_eq!(registry.routes()[1].summary, "Get user");
}

#[test]
fn test_nested_groups_compose_prefixes() {
    let mut registry = RouteRegistry::new();
    {
        let mut api = registry.group("/api");
        let mut v1 = api.group("/v1");
        let mut admin = v1.group("/admin");
        admin.get("/stats", noop(), [with_tags(["admin"])]);
        assert_eq!(admin.prefix(), "/api/v1/admin");
    }
    assert_eq!(registry.routes()[0].path, "/api/v1/admin/stats");
}

#[test]
fn test_duplicate_separators_are_collapsed() {
    let mut registry = RouteRegistry::new();
    {
        let mut b = registry.group("/b/");
        let mut a = b.group("/a/");
        a.get("/x", noop(), []);
    }
    assert_eq!(registry.routes()[0].path, "/b/a/x");
}

#[test]
fn test_group_and_registry_share_order() {
    let mut registry = RouteRegistry::new();
    registry.get("/first", noop(), []);
    registry.group("/g").get("/second", noop(), []);
    registry.get("/third", noop(), []);

    let paths: Vec<_> = registry.routes().iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["/first", "/g/second", "/third"]);
}

//! Route table listing through the plugin, end to end.

use colored::Colorize;
use routes_list::http::ServerError;
use routes_list::lifecycle::ServerEvent;
use routes_list::plugin::{ListOptions, RoutesList};
use routes_list::style::Theme;

mod common;

const PLAIN_TABLE: &str = "\
Method  Path              Strategy  Mode      Scopes
------  ----------------  --------  --------  -----------------
POST    /first/path/{id}
PATCH   /second           session   required  admin
GET     /third/path       session   optional  !not, +req, admin";

fn plain_options(captured: &common::Captured) -> ListOptions {
    ListOptions::new()
        .out(captured.sink())
        .theme(Theme::plain())
        .columns(["method", "path", "strategy", "mode", "scopes"])
}

#[test]
fn test_lists_sample_routes_in_table_order() {
    let captured = common::Captured::default();
    let mut server = common::sample_server();
    server.register(RoutesList, plain_options(&captured)).unwrap();

    RoutesList::lister(&server).unwrap().list_routes().unwrap();
    assert_eq!(captured.blocks(), vec![PLAIN_TABLE.to_string()]);
}

#[test]
fn test_colored_cells() {
    colored::control::set_override(true);
    let mut server = common::sample_server();
    server
        .register(RoutesList, ListOptions::new().out(common::Captured::default().sink()))
        .unwrap();

    let rows = RoutesList::lister(&server).unwrap().render_rows().unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].get("Method"), Some("POST".blue().to_string().as_str()));
    assert_eq!(rows[0].get("Path"), Some("/first/path/{id}"));
    assert_eq!(rows[0].get("Strategy"), Some(""));
    assert_eq!(rows[0].get("Scopes"), Some(""));

    assert_eq!(rows[1].get("Method"), Some("PATCH".blue().to_string().as_str()));
    assert_eq!(rows[1].get("Mode"), Some("required".bright_green().to_string().as_str()));
    assert_eq!(rows[1].get("Scopes"), Some("admin".green().to_string().as_str()));

    let scopes = format!("{}, {}, {}", "!not".red(), "+req".magenta(), "admin".green());
    assert_eq!(rows[2].get("Strategy"), Some("session".green().to_string().as_str()));
    assert_eq!(rows[2].get("Mode"), Some("optional".bright_black().to_string().as_str()));
    assert_eq!(rows[2].get("Scopes"), Some(scopes.as_str()));
}

#[test]
fn test_restricted_columns() {
    let captured = common::Captured::default();
    let mut server = common::sample_server();
    server
        .register(
            RoutesList,
            ListOptions::new()
                .out(captured.sink())
                .theme(Theme::plain())
                .columns(["method", "path"]),
        )
        .unwrap();

    let lister = RoutesList::lister(&server).unwrap();
    for row in lister.render_rows().unwrap() {
        assert_eq!(row.headers().collect::<Vec<_>>(), vec!["Method", "Path"]);
    }
    lister.list_routes().unwrap();
    assert_eq!(
        captured.blocks()[0].lines().nth(2),
        Some("POST    /first/path/{id}")
    );
}

#[test]
fn test_repeated_listing_writes_identical_blocks() {
    let captured = common::Captured::default();
    let mut server = common::sample_server();
    server.register(RoutesList, plain_options(&captured)).unwrap();

    server.events().emit(ServerEvent::Start);
    let lister = RoutesList::lister(&server).unwrap();
    lister.list_routes().unwrap();

    let blocks = captured.blocks();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0], blocks[1]);
}

#[test]
fn test_routes_added_after_registration_are_listed() {
    let captured = common::Captured::default();
    let mut server = common::sample_server();
    server.register(RoutesList, plain_options(&captured)).unwrap();

    server
        .route(
            routes_list::routing::Route::new(axum::http::Method::DELETE, "/fourth"),
            || async {},
        )
        .unwrap();

    RoutesList::lister(&server).unwrap().list_routes().unwrap();
    assert_eq!(captured.blocks()[0].lines().last(), Some("DELETE  /fourth"));
}

#[test]
fn test_second_registration_conflicts() {
    let mut server = common::sample_server();
    server
        .register(RoutesList, ListOptions::new().out(common::Captured::default().sink()))
        .unwrap();

    let err = server.register(RoutesList, ListOptions::new()).unwrap_err();
    assert!(matches!(err, ServerError::RegistrationConflict(ref name) if name == "routes-list"));
    assert_eq!(server.plugins().len(), 1);
}

#[test]
fn test_sorted_descending_by_path() {
    let captured = common::Captured::default();
    let mut server = common::sample_server();
    server
        .register(
            RoutesList,
            ListOptions::new()
                .out(captured.sink())
                .theme(Theme::plain())
                .columns(["path"])
                .sort("-path"),
        )
        .unwrap();

    RoutesList::lister(&server).unwrap().list_routes().unwrap();
    let lines: Vec<String> = captured.blocks()[0].lines().skip(2).map(String::from).collect();
    assert_eq!(lines, vec!["/third/path", "/second", "/first/path/{id}"]);
}

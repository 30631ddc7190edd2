use admin_crud::lifecycle::AdminSystem;
use admin_crud::model::{Flange, FlangeCreate};
use crud_framework::{
    AdminConfig, AdminRouter, CrudController, CrudError, ResourceDescriptor, Site, SiteDirectory,
    Views, FLASH_NOTICE_HEADER,
};
use std::sync::Arc;
use http::{header, Method, Request, Response, StatusCode};
use serde_json::{json, Value};

fn form(method: Method, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "example.com")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    form(Method::GET, uri, "")
}

fn location(response: &Response<String>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

fn notice(response: &Response<String>) -> Option<&str> {
    response
        .headers()
        .get(FLASH_NOTICE_HEADER)
        .map(|value| value.to_str().unwrap())
}

fn json_body(response: &Response<String>) -> Value {
    serde_json::from_str(response.body()).unwrap()
}

/// Full end-to-end run with real stores behind the router.
#[tokio::test]
async fn test_html_form_workflow() {
    let system = AdminSystem::new(&AdminConfig::default()).unwrap();
    let router = &system.router;
    assert_eq!(router.resources(), vec!["flanges", "strange_rabbits"]);

    // New form
    let response = router.handle(get("/admin/strange_rabbits/new")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body().contains("<form method=\"post\" action=\"/admin/strange_rabbits\">"));

    // Create
    let response = router
        .handle(form(
            Method::POST,
            "/admin/strange_rabbits",
            "strange_rabbit[name]=Harvey&strange_rabbit[ear_count]=3&strange_rabbit[fluffy]=on",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/admin/strange_rabbits/edit/1");
    assert_eq!(notice(&response), Some("Strange rabbit was successfully created."));

    let rabbit = system.strange_rabbits.find(1).await.unwrap();
    assert_eq!((rabbit.name.as_str(), rabbit.ear_count, rabbit.fluffy), ("Harvey", 3, true));
    assert_eq!(rabbit.site_id, Some(1));

    // Invalid create re-renders the form with the errors
    let response = router
        .handle(form(Method::POST, "/admin/strange_rabbits", "strange_rabbit[name]=+"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body().contains("Name can"), "{}", response.body());
    assert_eq!(system.strange_rabbits.count().await.unwrap(), 1);

    // Edit + update through the method override
    let response = router.handle(get("/admin/strange_rabbits/1/edit")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body().contains("Harvey"));

    let response = router
        .handle(form(
            Method::POST,
            "/admin/strange_rabbits/1",
            "_method=put&strange_rabbit[ear_count]=4",
        ))
        .await;
    assert_eq!(location(&response), "/admin/strange_rabbits");
    assert_eq!(notice(&response), Some("Strange rabbit was successfully updated."));
    assert_eq!(system.strange_rabbits.find(1).await.unwrap().ear_count, 4);

    // Index and show
    let response = router.handle(get("/admin/strange_rabbits")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body().contains("Strange rabbits"));
    assert!(response.body().contains("/admin/strange_rabbits/edit/1"));

    // Delete, then the record is gone
    let response = router.handle(form(Method::DELETE, "/admin/strange_rabbits/1", "")).await;
    assert_eq!(location(&response), "/admin/strange_rabbits");
    assert_eq!(notice(&response), Some("Strange rabbit was successfully deleted."));

    let response = router.handle(get("/admin/strange_rabbits/1")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/admin/strange_rabbits");
    assert_eq!(notice(&response), None);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_xml_workflow() {
    let system = AdminSystem::new(&AdminConfig::default()).unwrap();
    let router = &system.router;

    let response = router
        .handle(form(Method::POST, "/admin/flanges.xml", "flange[title]=Wide&flange[key]=W-1"))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml; charset=utf-8");
    assert!(response.body().contains("<title>Wide</title>"));
    assert!(response.body().contains("<site-id type=\"integer\">1</site-id>"));

    let response = router.handle(get("/admin/flanges.xml")).await;
    assert!(response.body().contains("<flanges type=\"array\">"));

    let response = router
        .handle(form(Method::POST, "/admin/flanges.xml", "flange[title]="))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body().contains("<errors>"));

    let response = router.handle(get("/admin/flanges/new.xml")).await;
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);

    let response = router.handle(form(Method::DELETE, "/admin/flanges/1.xml", "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = router.handle(form(Method::DELETE, "/admin/flanges/1.xml", "")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = router.handle(get("/admin/flanges/-1.xml")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_ext_json_workflow() {
    let system = AdminSystem::new(&AdminConfig::default()).unwrap();
    let router = &system.router;

    let request = Request::post("/admin/flanges.ext_json")
        .header(header::HOST, "example.com")
        .header(header::CONTENT_TYPE, "application/json")
        .body(json!({"flange": {"title": "Wide"}}).to_string())
        .unwrap();
    let response = router.handle(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(&response),
        json!({
            "success": true,
            "data": {"flange[id]": 1, "flange[title]": "Wide", "flange[key]": null, "flange[site_id]": 1}
        })
    );

    let response = router.handle(get("/admin/flanges?format=ext_json")).await;
    let payload = json_body(&response);
    assert_eq!(payload["results"], 1);
    assert_eq!(payload["rows"][0]["title"], "Wide");

    let response = router
        .handle(form(Method::POST, "/admin/flanges.ext_json", "flange[title]="))
        .await;
    assert_eq!(
        json_body(&response),
        json!({"success": false, "errors": {"flange[title]": "can't be blank"}})
    );

    let response = router.handle(get("/admin/flanges/42.ext_json")).await;
    assert_eq!(json_body(&response), json!({"success": false}));

    let response = router.handle(form(Method::DELETE, "/admin/flanges/1.ext_json", "")).await;
    assert_eq!(json_body(&response), json!({"success": true}));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unknown_routes_and_formats() {
    let system = AdminSystem::new(&AdminConfig::default()).unwrap();
    let router = &system.router;

    assert_eq!(router.handle(get("/admin/gizmos")).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(router.handle(get("/public/flanges")).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        router.handle(get("/admin/flanges.yaml")).await.status(),
        StatusCode::NOT_ACCEPTABLE
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_sites_and_custom_prefix() {
    let config = AdminConfig::from_toml_str(
        r#"
        route_prefix = "/backstage"

        [[sites]]
        id = 4
        name = "Main"
        hostname = "example.com"
        "#,
    )
    .unwrap();
    let system = AdminSystem::new(&config).unwrap();

    let response = system
        .router
        .handle(form(Method::POST, "/backstage/flanges", "flange[title]=Wide"))
        .await;
    assert_eq!(location(&response), "/backstage/flanges/edit/1");
    assert_eq!(system.flanges.find(1).await.unwrap().site_id, Some(4));

    // Redirects and page links follow the configured prefix
    let response = system.router.handle(get("/backstage/flanges/999")).await;
    assert_eq!(location(&response), "/backstage/flanges");
    let response = system
        .router
        .handle(form(Method::PUT, "/backstage/flanges/1", "flange[title]=Narrow"))
        .await;
    assert_eq!(location(&response), "/backstage/flanges");
    let response = system.router.handle(get("/backstage/flanges")).await;
    assert!(response.body().contains("href=\"/backstage/flanges/new\""));
    assert!(!response.body().contains("/admin/"));

    // No site serves this host
    let request = Request::post("/backstage/flanges")
        .header(header::HOST, "elsewhere.org")
        .body("flange[title]=Other".to_string())
        .unwrap();
    assert_eq!(system.router.handle(request).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(system.flanges.count().await.unwrap(), 1);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_direct_store_access() {
    let system = AdminSystem::new(&AdminConfig::default()).unwrap();
    assert_eq!(system.registry().names(), vec!["Flange", "StrangeRabbit"]);

    let params = FlangeCreate {
        title: "Seeded".into(),
        key: None,
    };
    let flange: Flange = system
        .flanges
        .create(params, Site::new(1, "Default", "*"))
        .await
        .unwrap();

    let response = system.router.handle(get("/admin/flanges/1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body().contains(&flange.title));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_router_rejects_controllers_for_another_prefix() {
    let system = AdminSystem::new(&AdminConfig::default()).unwrap();
    let sites = Arc::new(SiteDirectory::new(vec![Site::new(1, "Default", "*")]));
    let mut router = AdminRouter::new("/backstage", Views::new());

    let stray = CrudController::new(ResourceDescriptor::new("Flange"), system.flanges.clone(), sites.clone());
    assert!(matches!(router.mount(stray), Err(CrudError::Config(_))));
    assert!(router.resources().is_empty());

    let matching = CrudController::new(ResourceDescriptor::new("Flange"), system.flanges.clone(), sites)
        .with_route_prefix("/backstage/");
    router.mount(matching).unwrap();
    assert_eq!(router.resources(), vec!["flanges"]);

    drop(router);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let system = AdminSystem::new(&AdminConfig::default()).unwrap();

    for body in ["{not json", "[1,2]"] {
        let request = Request::post("/admin/flanges.ext_json")
            .header(header::HOST, "example.com")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .unwrap();
        let response = system.router.handle(request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }
    assert_eq!(system.flanges.count().await.unwrap(), 0);

    system.shutdown().await.unwrap();
}

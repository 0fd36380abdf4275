use crate::common::{TestApp, routes};

#[tokio::test]
async fn healthcheck_reports_ok() {
    let app = TestApp::spawn().await;
    let res = app.get(routes::HEALTHCHECK).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::spawn().await;
    let res = app.get(routes::OPENAPI).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["info"]["title"], "Moviebox API");

    let paths = res.body["paths"].as_object().expect("paths object");
    assert!(paths.keys().any(|p| p.ends_with("/summary")), "{:?}", paths.keys());
    assert!(paths.contains_key("/healthcheck"), "{:?}", paths.keys());
}

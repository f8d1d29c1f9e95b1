//! End-to-end behaviour of the `/api/v1` collections over the in-memory store.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, test, web};
use backend::Trace;
use backend::domain::TRACE_ID_HEADER;
use backend::inbound::http::api::api_scope;
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryBlogStore;
use rstest::rstest;
use serde_json::{Value, json};

async fn blog_app() -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    let state = HttpState::from_store(Arc::new(InMemoryBlogStore::new()));
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(api_scope()),
    )
    .await
}

async fn send<S, B>(app: &S, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut req = test::TestRequest::default().method(method).uri(uri);
    if let Some(body) = body {
        req = req.set_json(body);
    }
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn create<S, B>(app: &S, uri: &str, body: Value) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, value) = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create {uri}: {value}");
    value
}

fn id_of(value: &Value) -> i64 {
    value.get("id").and_then(Value::as_i64).expect("id")
}

#[actix_web::test]
async fn article_without_type_or_categories_gets_defaults() {
    let app = blog_app().await;
    let author = create(&app, "/api/v1/users", json!({"username": "ada"})).await;
    assert_eq!(id_of(&author), 1);

    let article = create(
        &app,
        "/api/v1/articles",
        json!({"title": "Intro", "content": "hello", "author": 1}),
    )
    .await;

    assert_eq!(article.get("type"), Some(&json!("UN")));
    assert_eq!(article.get("categories"), Some(&json!([])));
    assert_eq!(article.pointer("/author/username"), Some(&json!("ada")));
    let created = article
        .get("created_at")
        .and_then(Value::as_str)
        .expect("created_at");
    let updated = article
        .get("updated_at")
        .and_then(Value::as_str)
        .expect("updated_at");
    assert!(updated >= created);
}

#[actix_web::test]
async fn create_sets_location_header() {
    let app = blog_app().await;
    let req = test::TestRequest::post()
        .uri("/api/v1/categories")
        .set_json(json!({"name": "rust"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header");
    assert_eq!(location, "/api/v1/categories/1");
}

#[rstest]
#[case("TU")]
#[case("RS")]
#[case("RW")]
#[case("UN")]
#[actix_web::test]
async fn known_type_codes_are_stored(#[case] code: &str) {
    let app = blog_app().await;
    create(&app, "/api/v1/users", json!({"username": "ada"})).await;
    let article = create(
        &app,
        "/api/v1/articles",
        json!({"title": "T", "content": "c", "author": 1, "type": code}),
    )
    .await;
    assert_eq!(article.get("type"), Some(&json!(code)));
}

#[rstest]
#[case(json!({"title": "T", "content": "c", "author": 1, "type": "XX"}), "type", "invalid_choice")]
#[case(json!({"content": "c", "author": 1}), "title", "missing_field")]
#[case(json!({"title": "T", "content": "c", "author": "x"}), "author", "invalid_type")]
#[case(json!({"title": "  ", "content": "c", "author": 1}), "title", "blank")]
#[case(json!({"title": "T", "content": "", "author": 1}), "content", "blank")]
#[case(json!({"title": "T", "content": "c", "author": 99}), "author", "does_not_exist")]
#[case(json!({"title": "T", "content": "c", "author": 1, "categories": [42]}), "categories", "does_not_exist")]
#[actix_web::test]
async fn invalid_articles_are_rejected(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = blog_app().await;
    create(&app, "/api/v1/users", json!({"username": "ada"})).await;

    let (status, error) = send(&app, Method::POST, "/api/v1/articles", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.get("code"), Some(&json!("invalid_request")));
    assert_eq!(error.pointer("/details/field"), Some(&json!(field)));
    assert_eq!(error.pointer("/details/code"), Some(&json!(code)));
    let (_, articles) = send(&app, Method::GET, "/api/v1/articles", None).await;
    assert_eq!(articles, json!([]));
}

#[actix_web::test]
async fn malformed_json_is_an_invalid_request() {
    let app = blog_app().await;
    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error.pointer("/details/code"), Some(&json!("malformed_body")));
}

#[actix_web::test]
async fn duplicate_usernames_are_rejected() {
    let app = blog_app().await;
    create(&app, "/api/v1/users", json!({"username": "ada"})).await;

    let (status, error) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"username": "ada"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.pointer("/details/field"), Some(&json!("username")));
    assert_eq!(error.pointer("/details/code"), Some(&json!("unique")));
}

#[actix_web::test]
async fn passwords_never_appear_in_representations() {
    let app = blog_app().await;
    let user = create(
        &app,
        "/api/v1/users",
        json!({"username": "ada", "first_name": "Ada", "password": "s3cret"}),
    )
    .await;
    assert_eq!(
        user,
        json!({"id": 1, "username": "ada", "first_name": "Ada", "last_name": ""})
    );

    let article = create(
        &app,
        "/api/v1/articles",
        json!({"title": "T", "content": "c", "author": 1}),
    )
    .await;
    let (_, listed) = send(&app, Method::GET, "/api/v1/users", None).await;
    for rendered in [user, article, listed] {
        let text = rendered.to_string();
        assert!(!text.contains("password"), "{text}");
        assert!(!text.contains("s3cret"), "{text}");
        assert!(!text.contains("sha256$"), "{text}");
    }
}

#[actix_web::test]
async fn deleting_a_user_removes_their_articles() {
    let app = blog_app().await;
    create(&app, "/api/v1/users", json!({"username": "ada"})).await;
    create(&app, "/api/v1/users", json!({"username": "grace"})).await;
    let doomed = create(
        &app,
        "/api/v1/articles",
        json!({"title": "A", "content": "a", "author": 1}),
    )
    .await;
    let kept = create(
        &app,
        "/api/v1/articles",
        json!({"title": "B", "content": "b", "author": 2}),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, "/api/v1/users/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/articles/{}", id_of(&doomed)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, articles) = send(&app, Method::GET, "/api/v1/articles", None).await;
    assert_eq!(articles, json!([kept]));
}

#[actix_web::test]
async fn deleting_a_category_keeps_articles() {
    let app = blog_app().await;
    create(&app, "/api/v1/users", json!({"username": "ada"})).await;
    create(&app, "/api/v1/categories", json!({"name": "rust"})).await;
    create(&app, "/api/v1/categories", json!({"name": "web", "description": null})).await;
    let article = create(
        &app,
        "/api/v1/articles",
        json!({"title": "T", "content": "c", "author": 1, "categories": [2, 1]}),
    )
    .await;
    let names: Vec<&str> = article
        .get("categories")
        .and_then(Value::as_array)
        .expect("categories")
        .iter()
        .filter_map(|c| c.get("name").and_then(Value::as_str))
        .collect();
    assert_eq!(names, ["rust", "web"]);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/categories/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, fetched) = send(&app, Method::GET, "/api/v1/articles/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        fetched.get("categories"),
        Some(&json!([{"id": 2, "name": "web", "description": null}]))
    );
}

#[rstest]
#[case(Method::GET, "/api/v1/users/7")]
#[case(Method::GET, "/api/v1/categories/7")]
#[case(Method::GET, "/api/v1/articles/7")]
#[case(Method::DELETE, "/api/v1/users/7")]
#[case(Method::DELETE, "/api/v1/categories/7")]
#[case(Method::DELETE, "/api/v1/articles/7")]
#[case(Method::GET, "/api/v1/users/abc")]
#[case(Method::GET, "/api/v1/articles/7/")]
#[actix_web::test]
async fn missing_records_are_not_found(#[case] method: Method, #[case] uri: &str) {
    let app = blog_app().await;
    let (status, error) = send(&app, method, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error.get("code"), Some(&json!("not_found")));
}

#[rstest]
#[case(Method::PUT)]
#[case(Method::PATCH)]
#[actix_web::test]
async fn updating_missing_records_is_not_found(#[case] method: Method) {
    let app = blog_app().await;
    let (status, _) = send(
        &app,
        method,
        "/api/v1/categories/3",
        Some(json!({"name": "rust"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn partial_update_keeps_unspecified_fields() {
    let app = blog_app().await;
    create(&app, "/api/v1/users", json!({"username": "ada"})).await;
    create(&app, "/api/v1/categories", json!({"name": "rust"})).await;
    let article = create(
        &app,
        "/api/v1/articles",
        json!({"title": "T", "content": "c", "author": 1, "type": "TU", "categories": [1]}),
    )
    .await;

    let (status, patched) = send(
        &app,
        Method::PATCH,
        "/api/v1/articles/1",
        Some(json!({"title": "Renamed"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched.get("title"), Some(&json!("Renamed")));
    for field in ["content", "type", "author", "categories", "created_at"] {
        assert_eq!(patched.get(field), article.get(field), "{field} changed");
    }
}

#[actix_web::test]
async fn partial_update_of_a_user_keeps_names() {
    let app = blog_app().await;
    create(
        &app,
        "/api/v1/users",
        json!({"username": "ada", "first_name": "Ada", "last_name": "Lovelace"}),
    )
    .await;

    let (status, patched) = send(
        &app,
        Method::PATCH,
        "/api/v1/users/1/",
        Some(json!({"last_name": "King"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        patched,
        json!({"id": 1, "username": "ada", "first_name": "Ada", "last_name": "King"})
    );
}

#[actix_web::test]
async fn replace_requires_a_full_payload() {
    let app = blog_app().await;
    create(&app, "/api/v1/categories", json!({"name": "rust", "description": "d"})).await;

    let (status, error) = send(
        &app,
        Method::PUT,
        "/api/v1/categories/1",
        Some(json!({"description": "only"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.pointer("/details/field"), Some(&json!("name")));

    let (status, replaced) = send(
        &app,
        Method::PUT,
        "/api/v1/categories/1",
        Some(json!({"name": "systems"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        replaced,
        json!({"id": 1, "name": "systems", "description": null})
    );
}

#[actix_web::test]
async fn lists_are_ordered_by_identifier() {
    let app = blog_app().await;
    for name in ["c", "a", "b"] {
        create(&app, "/api/v1/categories/", json!({"name": name})).await;
    }
    let (status, listed) = send(&app, Method::GET, "/api/v1/categories/", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = listed
        .as_array()
        .expect("array")
        .iter()
        .map(id_of)
        .collect();
    assert_eq!(ids, [1, 2, 3]);
}

#[actix_web::test]
async fn api_root_links_every_collection() {
    let app = blog_app().await;
    let (status, root) = send(&app, Method::GET, "/api/v1", None).await;
    assert_eq!(status, StatusCode::OK);
    for name in ["users", "categories", "articles"] {
        let link = root.get(name).and_then(Value::as_str).expect("link");
        assert!(link.ends_with(&format!("/api/v1/{name}")), "{link}");
    }
}

#[actix_web::test]
async fn every_response_carries_a_trace_id() {
    let app = blog_app().await;
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/users/9").to_request(),
    )
    .await;
    let header_value = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error.get("traceId"), Some(&json!(header_value)));
}

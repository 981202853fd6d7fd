use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};
use uuid::Uuid;

use blog_api::handlers::configure_routes;
use blog_api::state::AppState;
use blog_core::PostStore;
use blog_core::domain::{Post, PostChanges};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

/// Repository whose every call fails as if the database were unreachable.
struct UnreachableRepository;

fn refused() -> RepoError {
    RepoError::Connection("connection refused".to_string())
}

#[async_trait]
impl BaseRepository<Post, Uuid> for UnreachableRepository {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Post>, RepoError> {
        Err(refused())
    }

    async fn insert(&self, _post: Post) -> Result<Post, RepoError> {
        Err(refused())
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        Err(refused())
    }
}

#[async_trait]
impl PostRepository for UnreachableRepository {
    async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        Err(refused())
    }

    async fn update(&self, _id: Uuid, _changes: PostChanges) -> Result<Option<Post>, RepoError> {
        Err(refused())
    }

    fn backend(&self) -> &'static str {
        "unreachable"
    }
}

#[actix_web::test]
async fn root_reports_api_is_working() {
    let app = init_app!(AppState::in_memory());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Blog API is working!" }));
}

#[actix_web::test]
async fn health_names_the_store() {
    let app = init_app!(AppState::in_memory());

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}

#[actix_web::test]
async fn create_defaults_author() {
    let app = init_app!(AppState::in_memory());

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "title": "A", "content": "B" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "A");
    assert_eq!(body["content"], "B");
    assert_eq!(body["author"], "Anonymous");
    assert!(body["id"].is_string());
    assert!(body["createdAt"].is_string());
}

#[actix_web::test]
async fn create_without_content_is_rejected() {
    let app = init_app!(AppState::in_memory());

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "title": "A", "content": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Post validation failed: content is required");

    let req = test::TestRequest::get().uri("/posts").to_request();
    let posts: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(posts.is_empty());
}

#[actix_web::test]
async fn malformed_body_is_rejected_with_envelope() {
    let app = init_app!(AppState::in_memory());

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(ContentType::json())
        .set_payload("{\"title\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn list_is_newest_first() {
    let app = init_app!(AppState::in_memory());

    for title in ["first", "second", "third"] {
        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({ "title": title, "content": "body" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        // distinct creation times
        actix_web::rt::time::sleep(Duration::from_millis(2)).await;
    }

    let req = test::TestRequest::get().uri("/posts").to_request();
    let posts: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    let titles: Vec<_> = posts.iter().map(|p| p["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["third", "second", "first"]);
}

#[actix_web::test]
async fn unknown_id_is_not_found() {
    let app = init_app!(AppState::in_memory());

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Post not found" }));
}

#[actix_web::test]
async fn malformed_id_status_depends_on_route() {
    let app = init_app!(AppState::in_memory());
    let uri = "/posts/not-an-id";

    let requests = [
        (
            test::TestRequest::get().uri(uri).to_request(),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            test::TestRequest::delete().uri(uri).to_request(),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            test::TestRequest::put()
                .uri(uri)
                .set_json(json!({ "title": "X", "content": "Y" }))
                .to_request(),
            StatusCode::BAD_REQUEST,
        ),
    ];

    for (req, expected) in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);

        let body: Value = test::read_body_json(resp).await;
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("Invalid post id \"not-an-id\""), "{error}");
    }
}

#[actix_web::test]
async fn update_replaces_fields_and_keeps_created_at() {
    let app = init_app!(AppState::in_memory());

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "title": "A", "content": "B" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{id}"))
        .set_json(json!({ "title": "X", "content": "Y", "author": "Z" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["title"], "X");
    assert_eq!(updated["content"], "Y");
    assert_eq!(updated["author"], "Z");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{id}"))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, updated);
}

#[actix_web::test]
async fn update_failures() {
    let app = init_app!(AppState::in_memory());

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", Uuid::new_v4()))
        .set_json(json!({ "title": "X", "content": "Y" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "title": "A", "content": "B" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{id}"))
        .set_json(json!({ "content": "Y" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Post validation failed: title is required");
}

#[actix_web::test]
async fn update_without_author_keeps_stored_author() {
    let app = init_app!(AppState::in_memory());

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "title": "A", "content": "B", "author": "Ann" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/posts/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "title": "X", "content": "Y" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["title"], "X");
    assert_eq!(updated["author"], "Ann");

    let req = test::TestRequest::get().uri(&uri).to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["author"], "Ann");
}

#[actix_web::test]
async fn delete_twice() {
    let app = init_app!(AppState::in_memory());

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "title": "A", "content": "B" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/posts/{}", created["id"].as_str().unwrap());

    let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Post deleted successfully" }));

    let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn store_faults_surface_as_500() {
    let state = AppState::new(PostStore::new(Arc::new(UnreachableRepository)));
    let app = init_app!(state);
    let uri = format!("/posts/{}", Uuid::new_v4());

    let requests = [
        test::TestRequest::get().uri("/posts").to_request(),
        test::TestRequest::get().uri(&uri).to_request(),
        test::TestRequest::delete().uri(&uri).to_request(),
        test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({ "title": "A", "content": "B" }))
            .to_request(),
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "title": "X", "content": "Y" }))
            .to_request(),
    ];

    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["error"],
            "Database connection failed: connection refused"
        );
    }
}

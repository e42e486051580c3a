use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use notekeep_auth::AuthClaims;
use notekeep_core::UserId;
use reqwest::StatusCode;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = notekeep_api::app::build_app(jwt_secret.to_string()).await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, user: UserId, username: &str) -> String {
    let now = Utc::now();
    let claims = AuthClaims {
        sub: user,
        username: username.to_string(),
        iat: now.timestamp(),
        exp: (now + ChronoDuration::minutes(10)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

/// Redirects are asserted on, never followed.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn location(res: &reqwest::Response) -> &str {
    res.headers()
        .get(reqwest::header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
}

async fn create_note(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    title: &str,
    text: &str,
    slug: Option<&str>,
) -> reqwest::Response {
    let mut fields = vec![("title", title), ("text", text)];
    if let Some(slug) = slug {
        fields.push(("slug", slug));
    }
    client
        .post(format!("{}/notes/add/", base_url))
        .bearer_auth(token)
        .form(&fields)
        .send()
        .await
        .unwrap()
}

async fn list_notes(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
) -> serde_json::Value {
    let res = client
        .get(format!("{}/notes/", base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn("test-secret").await;

    let res = client()
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn anonymous_requests_redirect_to_login_with_next() {
    let srv = TestServer::spawn("test-secret").await;
    let client = client();

    let res = client
        .get(format!("{}/notes/", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/users/login/?next=/notes/");

    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/users/login/?next=/whoami");

    // The query string is part of the return target.
    let res = client
        .get(format!("{}/notes/?page=2", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/users/login/?next=/notes/?page=2");
}

#[tokio::test]
async fn identity_is_derived_from_token() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;

    let user = UserId::new();
    let token = mint_jwt(jwt_secret, user, "author");

    let res = client()
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["user_id"].as_str().unwrap(), user.to_string());
    assert_eq!(body["username"].as_str().unwrap(), "author");
}

#[tokio::test]
async fn user_can_create_note_with_slug() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = client();
    let token = mint_jwt(jwt_secret, UserId::new(), "author");

    let res = create_note(
        &client,
        &srv.base_url,
        &token,
        "A new note",
        "Text of the new note",
        Some("test_slug"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/notes/success/");

    let body = list_notes(&client, &srv.base_url, &token).await;
    assert_eq!(body["count"].as_u64().unwrap(), 1);
    assert_eq!(body["object_list"][0]["slug"].as_str().unwrap(), "test_slug");
}

#[tokio::test]
async fn user_can_create_note_without_slug() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = client();
    let token = mint_jwt(jwt_secret, UserId::new(), "author");

    let res = create_note(
        &client,
        &srv.base_url,
        &token,
        "A Brand New Note",
        "Text of the new note",
        None,
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/notes/success/");

    // The slug is derived from the title.
    let body = list_notes(&client, &srv.base_url, &token).await;
    assert_eq!(body["count"].as_u64().unwrap(), 1);
    assert_eq!(
        body["object_list"][0]["slug"].as_str().unwrap(),
        "a-brand-new-note"
    );
    assert_eq!(
        body["object_list"][0]["title"].as_str().unwrap(),
        "A Brand New Note"
    );
}

#[tokio::test]
async fn note_slug_is_unique() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = client();
    let token = mint_jwt(jwt_secret, UserId::new(), "author");

    let res1 = create_note(
        &client,
        &srv.base_url,
        &token,
        "A new note",
        "Text",
        Some("test_slug"),
    )
    .await;
    assert_eq!(res1.status(), StatusCode::FOUND);
    assert_eq!(location(&res1), "/notes/success/");

    let res2 = create_note(
        &client,
        &srv.base_url,
        &token,
        "Another note",
        "Other text",
        Some("test_slug"),
    )
    .await;

    // Re-rendered form, field error on slug, no redirect.
    assert_eq!(res2.status(), StatusCode::OK);
    let body: serde_json::Value = res2.json().await.unwrap();
    assert_eq!(
        body["errors"]["slug"][0].as_str().unwrap(),
        "test_slug — already in use, choose another"
    );
    assert_eq!(body["form"]["title"].as_str().unwrap(), "Another note");

    // Still exactly one note stored for that slug.
    let listed = list_notes(&client, &srv.base_url, &token).await;
    assert_eq!(listed["count"].as_u64().unwrap(), 1);
}

#[tokio::test]
async fn duplicate_slug_is_rejected_across_users() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = client();
    let author = mint_jwt(jwt_secret, UserId::new(), "author");
    let other = mint_jwt(jwt_secret, UserId::new(), "reader");

    let res = create_note(&client, &srv.base_url, &author, "Mine", "Text", Some("shared")).await;
    assert_eq!(res.status(), StatusCode::FOUND);

    // Uniqueness is global, not per-user.
    let res = create_note(&client, &srv.base_url, &other, "Theirs", "Text", Some("shared")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["errors"]["slug"][0].as_str().unwrap(),
        "shared — already in use, choose another"
    );

    let listed = list_notes(&client, &srv.base_url, &other).await;
    assert_eq!(listed["count"].as_u64().unwrap(), 0);
}

#[tokio::test]
async fn anonymous_user_cannot_create_note() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = client();

    let res = client
        .post(format!("{}/notes/add/", srv.base_url))
        .form(&[("title", "A new note"), ("text", "Text")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/users/login/?next=/notes/add/");

    // Nothing was created.
    let token = mint_jwt(jwt_secret, UserId::new(), "author");
    let listed = list_notes(&client, &srv.base_url, &token).await;
    assert_eq!(listed["count"].as_u64().unwrap(), 0);
}

#[tokio::test]
async fn blank_fields_are_field_errors() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = client();
    let token = mint_jwt(jwt_secret, UserId::new(), "author");

    let res = create_note(&client, &srv.base_url, &token, "", "", None).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["errors"]["title"][0].as_str().is_some());
    assert!(body["errors"]["text"][0].as_str().is_some());

    let listed = list_notes(&client, &srv.base_url, &token).await;
    assert_eq!(listed["count"].as_u64().unwrap(), 0);
}

#[tokio::test]
async fn add_page_contains_form() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, UserId::new(), "author");

    let res = client()
        .get(format!("{}/notes/add/", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["form"].is_object());
}

#[tokio::test]
async fn edit_page_contains_bound_form() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = client();
    let token = mint_jwt(jwt_secret, UserId::new(), "author");

    let res =
        create_note(&client, &srv.base_url, &token, "A new note", "Text", Some("new_note")).await;
    assert_eq!(res.status(), StatusCode::FOUND);

    let res = client
        .get(format!("{}/notes/new_note/edit/", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["form"]["title"].as_str().unwrap(), "A new note");
    assert_eq!(body["form"]["text"].as_str().unwrap(), "Text");
    assert_eq!(body["form"]["slug"].as_str().unwrap(), "new_note");
}

#[tokio::test]
async fn list_is_scoped_to_requester_and_ordered() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = client();
    let author = mint_jwt(jwt_secret, UserId::new(), "author-1");
    let other = mint_jwt(jwt_secret, UserId::new(), "author-2");

    for i in 0..10 {
        let res = create_note(
            &client,
            &srv.base_url,
            &author,
            &format!("Note {i}"),
            "Text",
            Some(&format!("mynote-{i}")),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
    }
    create_note(
        &client,
        &srv.base_url,
        &other,
        "Someone else's note",
        "Text",
        Some("someones_note"),
    )
    .await;

    let body = list_notes(&client, &srv.base_url, &author).await;
    assert_eq!(body["count"].as_u64().unwrap(), 10);

    let items = body["object_list"].as_array().unwrap();
    assert_eq!(items.len(), 10);
    assert!(
        items
            .iter()
            .all(|n| n["slug"].as_str().unwrap() != "someones_note")
    );

    let ids: Vec<i64> = items.iter().map(|n| n["id"].as_i64().unwrap()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);

    let body = list_notes(&client, &srv.base_url, &other).await;
    assert_eq!(body["count"].as_u64().unwrap(), 1);
}

#[tokio::test]
async fn author_can_edit_note() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = client();
    let token = mint_jwt(jwt_secret, UserId::new(), "author");

    let res =
        create_note(&client, &srv.base_url, &token, "A new note", "Note text", Some("new_note"))
            .await;
    assert_eq!(res.status(), StatusCode::FOUND);

    let res = client
        .post(format!("{}/notes/new_note/edit/", srv.base_url))
        .bearer_auth(&token)
        .form(&[("title", "A new note"), ("text", "Updated text")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/notes/success/");

    let body = list_notes(&client, &srv.base_url, &token).await;
    assert_eq!(body["object_list"][0]["text"].as_str().unwrap(), "Updated text");
    assert_eq!(body["object_list"][0]["slug"].as_str().unwrap(), "new_note");
}

#[tokio::test]
async fn blank_fields_on_edit_are_field_errors() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = client();
    let token = mint_jwt(jwt_secret, UserId::new(), "author");

    let res =
        create_note(&client, &srv.base_url, &token, "A new note", "Note text", Some("new_note"))
            .await;
    assert_eq!(res.status(), StatusCode::FOUND);

    let res = client
        .post(format!("{}/notes/new_note/edit/", srv.base_url))
        .bearer_auth(&token)
        .form(&[("title", ""), ("text", "  ")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["errors"]["title"][0].as_str().is_some());
    assert!(body["errors"]["text"][0].as_str().is_some());

    // The note was not touched.
    let body = list_notes(&client, &srv.base_url, &token).await;
    assert_eq!(body["object_list"][0]["title"].as_str().unwrap(), "A new note");
    assert_eq!(body["object_list"][0]["text"].as_str().unwrap(), "Note text");
}

#[tokio::test]
async fn other_user_cannot_edit_note() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = client();
    let author = mint_jwt(jwt_secret, UserId::new(), "author");
    let other = mint_jwt(jwt_secret, UserId::new(), "reader");

    let res =
        create_note(&client, &srv.base_url, &author, "A new note", "Note text", Some("new_note"))
            .await;
    assert_eq!(res.status(), StatusCode::FOUND);

    // Not the author: not-found, never forbidden.
    let res = client
        .post(format!("{}/notes/new_note/edit/", srv.base_url))
        .bearer_auth(&other)
        .form(&[("title", "A new note"), ("text", "Hijacked text")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/notes/new_note/edit/", srv.base_url))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The note is unchanged.
    let body = list_notes(&client, &srv.base_url, &author).await;
    assert_eq!(body["object_list"][0]["text"].as_str().unwrap(), "Note text");
}

#[tokio::test]
async fn author_can_delete_note() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = client();
    let token = mint_jwt(jwt_secret, UserId::new(), "author");

    let res = create_note(&client, &srv.base_url, &token, "Keep", "Text", Some("keep")).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    let res = create_note(&client, &srv.base_url, &token, "Drop", "Text", Some("drop")).await;
    assert_eq!(res.status(), StatusCode::FOUND);

    let res = client
        .delete(format!("{}/notes/drop/delete/", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/notes/success/");

    let body = list_notes(&client, &srv.base_url, &token).await;
    assert_eq!(body["count"].as_u64().unwrap(), 1);
    assert_eq!(body["object_list"][0]["slug"].as_str().unwrap(), "keep");
}

#[tokio::test]
async fn other_user_cannot_delete_note() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = client();
    let author = mint_jwt(jwt_secret, UserId::new(), "author");
    let other = mint_jwt(jwt_secret, UserId::new(), "reader");

    let res =
        create_note(&client, &srv.base_url, &author, "A new note", "Text", Some("new_note")).await;
    assert_eq!(res.status(), StatusCode::FOUND);

    let res = client
        .delete(format!("{}/notes/new_note/delete/", srv.base_url))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = list_notes(&client, &srv.base_url, &author).await;
    assert_eq!(body["count"].as_u64().unwrap(), 1);
}

#[tokio::test]
async fn success_page_is_reachable() {
    let srv = TestServer::spawn("test-secret").await;

    let res = client()
        .get(format!("{}/notes/success/", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_echoes_next_target() {
    let srv = TestServer::spawn("test-secret").await;

    let res = client()
        .get(format!("{}/users/login/?next=/notes/add/", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["next"].as_str().unwrap(), "/notes/add/");
}

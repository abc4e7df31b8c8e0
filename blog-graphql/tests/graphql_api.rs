use async_graphql::Value;
use blog_core::storage::{DatabaseStorage, InMemoryStorage, Storage};
use blog_core::{DatabaseManager, DatabaseTarget};
use blog_graphql::graphql::{create_schema, GraphQLSchema};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

/// One schema per storage backend; the temp dir keeps the database file alive
struct Backend {
    name: &'static str,
    schema: GraphQLSchema,
    _dir: Option<TempDir>,
}

async fn backends() -> Vec<Backend> {
    let dir = tempfile::tempdir().unwrap();
    let target = DatabaseTarget::Local(dir.path().join("blog.db"));
    let manager = DatabaseManager::new(&target).await.unwrap();
    manager.ensure_schema().await.unwrap();
    let database: Arc<dyn Storage> = Arc::new(DatabaseStorage::new(Arc::new(manager)));

    vec![
        Backend {
            name: "in-memory",
            schema: create_schema(Arc::new(InMemoryStorage::new())),
            _dir: None,
        },
        Backend {
            name: "database",
            schema: create_schema(database),
            _dir: Some(dir),
        },
    ]
}

async fn run_ok(schema: &GraphQLSchema, query: &str) -> serde_json::Value {
    let response = schema.execute(query).await;
    assert!(response.errors.is_empty(), "{query}: {:?}", response.errors);
    response.data.into_json().unwrap()
}

#[tokio::test]
async fn create_user_then_get_user_returns_empty_posts() {
    for backend in backends().await {
        let created = run_ok(
            &backend.schema,
            r#"mutation { createUser(name: "Ada", email: "ada@example.com") { id name email posts { id } } }"#,
        )
        .await;
        assert_eq!(
            created,
            json!({"createUser": {"id": 1, "name": "Ada", "email": "ada@example.com", "posts": []}}),
            "{}",
            backend.name
        );

        let fetched = run_ok(
            &backend.schema,
            "{ getUser(id: 1) { id name email posts { id title content } } }",
        )
        .await;
        assert_eq!(
            fetched,
            json!({"getUser": {"id": 1, "name": "Ada", "email": "ada@example.com", "posts": []}}),
            "{}",
            backend.name
        );
    }
}

#[tokio::test]
async fn post_round_trip_and_appears_under_author() {
    for backend in backends().await {
        run_ok(
            &backend.schema,
            r#"mutation { createUser(name: "Ada", email: "ada@example.com") { id } }"#,
        )
        .await;

        let created = run_ok(
            &backend.schema,
            r#"mutation { createPost(title: "Hi", content: "Hello world", authorId: 1) { id title content } }"#,
        )
        .await;
        assert_eq!(
            created,
            json!({"createPost": {"id": 1, "title": "Hi", "content": "Hello world"}}),
            "{}",
            backend.name
        );

        let post = run_ok(&backend.schema, "{ getPost(id: 1) { id title content } }").await;
        assert_eq!(
            post,
            json!({"getPost": {"id": 1, "title": "Hi", "content": "Hello world"}}),
            "{}",
            backend.name
        );

        let user = run_ok(
            &backend.schema,
            "{ getUser(id: 1) { id name email posts { id title content } } }",
        )
        .await;
        assert_eq!(
            user,
            json!({"getUser": {
                "id": 1,
                "name": "Ada",
                "email": "ada@example.com",
                "posts": [{"id": 1, "title": "Hi", "content": "Hello world"}]
            }}),
            "{}",
            backend.name
        );
    }
}

#[tokio::test]
async fn missing_user_is_not_found() {
    for backend in backends().await {
        let response = backend
            .schema
            .execute("{ getUser(id: 404) { id } }")
            .await;

        assert_eq!(
            response.data.into_json().unwrap(),
            json!({"getUser": null}),
            "{}",
            backend.name
        );
        assert_eq!(response.errors.len(), 1);
        let error = &response.errors[0];
        assert_eq!(error.message, "User not found");
        let extensions = error.extensions.as_ref().unwrap();
        assert_eq!(extensions.get("code"), Some(&Value::from("NOT_FOUND")));
        assert_eq!(extensions.get("status"), Some(&Value::from(404)));
    }
}

#[tokio::test]
async fn missing_post_is_not_found() {
    for backend in backends().await {
        let response = backend
            .schema
            .execute("{ getPost(id: 404) { id } }")
            .await;

        assert_eq!(response.errors.len(), 1, "{}", backend.name);
        let error = &response.errors[0];
        assert_eq!(error.message, "Post not found");
        let extensions = error.extensions.as_ref().unwrap();
        assert_eq!(extensions.get("status"), Some(&Value::from(404)));
    }
}

#[tokio::test]
async fn post_with_unknown_author_fails_without_creating_a_row() {
    for backend in backends().await {
        let response = backend
            .schema
            .execute(r#"mutation { createPost(title: "Orphan", content: "x", authorId: 7) { id } }"#)
            .await;

        assert_eq!(response.errors.len(), 1, "{}", backend.name);
        let extensions = response.errors[0].extensions.as_ref().unwrap();
        assert_eq!(
            extensions.get("code"),
            Some(&Value::from("INTEGRITY_VIOLATION")),
            "{}",
            backend.name
        );
        assert_eq!(extensions.get("status"), Some(&Value::from(500)));

        let lookup = backend
            .schema
            .execute("{ getPost(id: 1) { id } }")
            .await;
        assert_eq!(lookup.errors[0].message, "Post not found", "{}", backend.name);
    }
}

#[tokio::test]
async fn duplicate_emails_are_accepted() {
    for backend in backends().await {
        let first = run_ok(
            &backend.schema,
            r#"mutation { createUser(name: "Ada", email: "same@example.com") { id } }"#,
        )
        .await;
        let second = run_ok(
            &backend.schema,
            r#"mutation { createUser(name: "Grace", email: "same@example.com") { id } }"#,
        )
        .await;

        assert_eq!(first, json!({"createUser": {"id": 1}}), "{}", backend.name);
        assert_eq!(second, json!({"createUser": {"id": 2}}), "{}", backend.name);
    }
}

#[tokio::test]
async fn variables_are_coerced() {
    for backend in backends().await {
        let request = async_graphql::Request::new(
            "mutation Create($name: String!, $email: String!) { createUser(name: $name, email: $email) { id name } }",
        )
        .variables(async_graphql::Variables::from_json(
            json!({"name": "Ada", "email": "ada@example.com"}),
        ));

        let response = backend.schema.execute(request).await;
        assert!(response.errors.is_empty(), "{}: {:?}", backend.name, response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({"createUser": {"id": 1, "name": "Ada"}})
        );
    }
}

#[tokio::test]
async fn wrong_argument_type_is_rejected() {
    let schema = create_schema(Arc::new(InMemoryStorage::new()));
    let response = schema.execute(r#"{ getUser(id: "one") { id } }"#).await;
    assert!(!response.errors.is_empty());
}

#[tokio::test]
async fn each_failed_root_field_reports_its_own_error() {
    for backend in backends().await {
        let response = backend
            .schema
            .execute("{ getUser(id: 1) { id } getPost(id: 1) { id } }")
            .await;

        let mut messages: Vec<_> = response.errors.iter().map(|e| e.message.clone()).collect();
        messages.sort();
        assert_eq!(messages, vec!["Post not found", "User not found"], "{}", backend.name);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({"getUser": null, "getPost": null}),
            "{}",
            backend.name
        );
    }
}

#[tokio::test]
async fn root_fields_are_nullable_in_the_schema() {
    let schema = create_schema(Arc::new(InMemoryStorage::new()));
    let sdl = schema.sdl();

    assert!(sdl.contains("getUser(id: Int!): UserView\n"), "{sdl}");
    assert!(sdl.contains("getPost(id: Int!): PostSummary\n"), "{sdl}");
    assert!(sdl.contains("createUser(name: String!, email: String!): UserView\n"), "{sdl}");
    assert!(
        sdl.contains("createPost(title: String!, content: String!, authorId: Int!): PostSummary\n"),
        "{sdl}"
    );
}

//! Router tests for the catalogue and order resources

#[cfg(test)]
mod tests {
    use crate::auth::PasswordService;
    use crate::routes::create_router;
    use crate::state::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn token_for(app: &Router, path: &str, email: &str) -> (Uuid, String) {
        let (status, body) = send(
            app,
            "POST",
            path,
            None,
            Some(json!({
                "first_name": "Test",
                "last_name": "Account",
                "email": email,
                "password": "secret1"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "registration failed: {}", body);
        (
            body["id"].as_str().unwrap().parse().unwrap(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    async fn admin(app: &Router) -> String {
        token_for(app, "/api/admin/register", "admin@example.com").await.1
    }

    fn jollof() -> Value {
        json!({
            "name": "Jollof Rice",
            "description": "Party jollof",
            "price": 400,
            "category": "Big man Size",
            "count_in_stock": 7
        })
    }

    fn order_body(meal_id: &str) -> Value {
        json!({
            "order_item": { "meal_id": meal_id, "name": "Jollof Rice", "quantity": 2, "price": 400 },
            "shipping_address": { "address": "12 Ahmadu Bello Way", "city": "Kaduna", "postal_code": "800104" },
            "payment_method": "card",
            "tax_price": 10,
            "shipping_price": 50
        })
    }

    #[tokio::test]
    async fn test_empty_collections_are_empty_arrays() {
        let app = create_router(AppState::for_tests());

        for uri in ["/api/meals", "/api/review", "/api/vendor"] {
            let (status, body) = send(&app, "GET", uri, None, None).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert_eq!(body, json!([]), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_meal_create_get_and_delete() {
        let app = create_router(AppState::for_tests());
        let token = admin(&app).await;

        let (status, created) = send(&app, "POST", "/api/meals", Some(&token), Some(jollof())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["name"], "Jollof Rice");
        assert_eq!(created["price"], "400.00");
        assert_eq!(created["count_in_stock"], 7);

        let id = created["id"].as_str().unwrap();
        let (status, fetched) = send(&app, "GET", &format!("/api/meals/{}", id), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, body) = send(&app, "DELETE", &format!("/api/meals/{}", id), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);

        let (status, body) = send(&app, "GET", &format!("/api/meals/{}", id), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = send(&app, "DELETE", &format!("/api/meals/{}", id), Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_meal_write_requires_token() {
        let app = create_router(AppState::for_tests());
        let (status, _) = send(&app, "POST", "/api/meals", None, Some(jollof())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_meal_partial_update_keeps_other_fields() {
        let app = create_router(AppState::for_tests());
        let token = admin(&app).await;
        let (_, created) = send(&app, "POST", "/api/meals", Some(&token), Some(jollof())).await;
        let id = created["id"].as_str().unwrap();

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/meals/{}", id),
            Some(&token),
            Some(json!({ "price": 450 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["price"], "450.00");
        assert_eq!(updated["name"], "Jollof Rice");
        assert_eq!(updated["count_in_stock"], 7);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let app = create_router(AppState::for_tests());

        for uri in ["/api/meals/not-an-id", "/api/review/123", "/api/vendor/abc"] {
            let (status, body) = send(&app, "GET", uri, None, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["code"], "INVALID_ID", "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_meals_by_category() {
        let app = create_router(AppState::for_tests());
        let token = admin(&app).await;
        send(&app, "POST", "/api/meals", Some(&token), Some(jollof())).await;
        send(
            &app,
            "POST",
            "/api/meals",
            Some(&token),
            Some(json!({ "name": "Puff Puff", "price": 100, "category": "Snacks" })),
        )
        .await;

        let (status, body) = send(&app, "GET", "/api/meals/aggregate", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "Jollof Rice");

        let (_, body) = send(&app, "GET", "/api/meals/aggregate?category=Snacks", None, None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "Puff Puff");

        let (_, body) = send(&app, "GET", "/api/meals/aggregate?category=snacks", None, None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_order_flow_and_ownership() {
        let app = create_router(AppState::for_tests());
        let admin_token = admin(&app).await;
        let (owner_id, owner) = token_for(&app, "/api/user/register", "owner@example.com").await;
        let (_, stranger) = token_for(&app, "/api/user/register", "stranger@example.com").await;

        let meal_id = Uuid::new_v4().to_string();
        let (status, order) = send(&app, "POST", "/api/order", Some(&owner), Some(order_body(&meal_id))).await;
        assert_eq!(status, StatusCode::OK, "{}", order);
        assert_eq!(order["user_id"], owner_id.to_string());
        assert_eq!(order["total_price"], "860.00");
        assert_eq!(order["is_paid"], false);

        let uri = format!("/api/order/{}", order["id"].as_str().unwrap());

        let (status, _) = send(&app, "GET", &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "GET", &uri, Some(&stranger), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, "GET", &uri, Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "GET", "/api/order", Some(&owner), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, all) = send(&app, "GET", "/api/order", Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 1);

        let (status, mine) =
            send(&app, "GET", &format!("/api/order/aggregate/{}", owner_id), Some(&owner), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mine.as_array().unwrap().len(), 1);
        let (status, _) =
            send(&app, "GET", &format!("/api/order/aggregate/{}", owner_id), Some(&stranger), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, paid) = send(&app, "PUT", &uri, Some(&owner), Some(json!({ "is_paid": true }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(paid["is_paid"], true);
        assert!(paid["paid_at"].is_string());

        let (status, unpaid) = send(&app, "PUT", &uri, Some(&owner), Some(json!({ "is_paid": false }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(unpaid["is_paid"], false);
        assert!(unpaid["paid_at"].is_null());

        let (status, _) = send(&app, "DELETE", &uri, Some(&stranger), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, "DELETE", &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "GET", &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_order_with_inconsistent_total_is_rejected() {
        let app = create_router(AppState::for_tests());
        let (_, owner) = token_for(&app, "/api/user/register", "owner@example.com").await;

        let mut body = order_body(&Uuid::new_v4().to_string());
        body["total_price"] = json!(1);

        let (status, rejected) = send(&app, "POST", "/api/order", Some(&owner), Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(rejected["code"], "VALIDATION_ERROR");

        body["total_price"] = json!("860.009");
        let (status, _) = send(&app, "POST", "/api/order", Some(&owner), Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        body["total_price"] = json!(860);
        let (status, order) = send(&app, "POST", "/api/order", Some(&owner), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(order["total_price"], "860.00");
    }

    #[tokio::test]
    async fn test_review_write_needs_token_and_author() {
        let state = AppState::for_tests();
        let app = create_router(state.clone());
        let (author_id, author) = token_for(&app, "/api/user/register", "author@example.com").await;
        let (_, other) = token_for(&app, "/api/user/register", "other@example.com").await;

        let review = json!({ "comments": "Great", "ratings": 4.5 });
        let (status, _) = send(&app, "POST", "/api/review", None, Some(review.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, created) = send(&app, "POST", "/api/review", Some(&author), Some(review)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["user_id"], author_id.to_string());

        let uri = format!("/api/review/{}", created["id"].as_str().unwrap());
        let (status, _) = send(&app, "PUT", &uri, Some(&other), Some(json!({ "ratings": 1 }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, by_author) =
            send(&app, "GET", &format!("/api/review/aggregate/{}", author_id), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(by_author.as_array().unwrap().len(), 1);

        let (status, _) = send(
            &app,
            "POST",
            "/api/review",
            Some(&author),
            Some(json!({ "ratings": 9 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(state.repos().reviews.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_vendor_manager_password_is_hashed() {
        let state = AppState::for_tests();
        let app = create_router(state.clone());
        let token = admin(&app).await;

        let (_, review) = send(
            &app,
            "POST",
            "/api/review",
            Some(&token),
            Some(json!({ "comments": "Tasty", "ratings": 5 })),
        )
        .await;

        let (status, vendor) = send(
            &app,
            "POST",
            "/api/vendor",
            Some(&token),
            Some(json!({
                "name": "Mr Biggs",
                "address": "Tsaunin Kura 800104, Kaduna",
                "location": { "lat": 10.5105, "lon": 7.4165 },
                "manager": { "name": "Manager", "password": "1234" },
                "reviews": [review["id"]]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", vendor);
        assert_eq!(vendor["manager"]["name"], "Manager");
        assert!(vendor["manager"].get("password").is_none());
        assert!(vendor["manager"].get("password_hash").is_none());
        assert_eq!(vendor["phone_no"], afrofood_shared::models::DEFAULT_VENDOR_PHONE);

        let id: Uuid = vendor["id"].as_str().unwrap().parse().unwrap();
        let stored = state.repos().vendors.find_by_id(id).await.unwrap().unwrap();
        assert_ne!(stored.manager.password_hash, "1234");
        assert!(PasswordService::verify("1234", &stored.manager.password_hash).unwrap());

        let (status, detail) =
            send(&app, "GET", &format!("/api/vendor/aggregate/{}", id), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["reviews"][0]["comments"], "Tasty");
    }

    #[tokio::test]
    async fn test_seed_requires_admin() {
        let app = create_router(AppState::for_tests());
        let (_, user) = token_for(&app, "/api/user/register", "user@example.com").await;

        let (status, _) = send(&app, "POST", "/api/admin/seed", Some(&user), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let token = admin(&app).await;
        let (status, summary) = send(&app, "POST", "/api/admin/seed", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary, json!({ "meals": 5, "reviews": 3, "vendors": 1 }));

        let (_, meals) = send(&app, "GET", "/api/meals", None, None).await;
        assert_eq!(meals.as_array().unwrap().len(), 5);
    }
}

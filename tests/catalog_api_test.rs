mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn category_tree_nests_children_in_position_order() {
    let app = TestApp::new().await;
    let root = app
        .post("/api/v1/categories", json!({ "code": "apparel" }))
        .await;
    assert_eq!(root.status, StatusCode::CREATED, "{}", root.raw);
    let root_id = root.id();

    let shoes = app
        .post(
            "/api/v1/categories",
            json!({ "code": "shoes", "parentId": root_id, "position": 2 }),
        )
        .await
        .id();
    let shirts = app
        .post(
            "/api/v1/categories",
            json!({ "code": "shirts", "parentId": root_id, "position": 1 }),
        )
        .await
        .id();

    let roots = app.get("/api/v1/categories/root").await;
    assert_eq!(roots.status, StatusCode::OK);
    assert_eq!(roots.data().as_array().unwrap().len(), 1);

    let children = app
        .get(&format!("/api/v1/categories/parent/{}", root_id))
        .await;
    let ids: Vec<i64> = children
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![shirts, shoes]);

    let tree = app.get("/api/v1/categories/tree").await;
    assert_eq!(tree.status, StatusCode::OK, "{}", tree.raw);
    let top = tree.data().as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["code"], "apparel");
    let nested: Vec<&str> = top[0]["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["code"].as_str().unwrap())
        .collect();
    assert_eq!(nested, vec!["shirts", "shoes"]);
}

#[tokio::test]
async fn category_hierarchy_rules() {
    let app = TestApp::new().await;
    let parent = app
        .post("/api/v1/categories", json!({ "code": "home" }))
        .await
        .id();
    let child = app
        .post(
            "/api/v1/categories",
            json!({ "code": "kitchen", "parentId": parent }),
        )
        .await
        .id();

    let cycle = app
        .put(
            &format!("/api/v1/categories/{}", parent),
            json!({ "parentId": child }),
        )
        .await;
    assert_eq!(cycle.status, StatusCode::BAD_REQUEST, "{}", cycle.raw);

    let own_parent = app
        .put(
            &format!("/api/v1/categories/{}", parent),
            json!({ "parentId": parent }),
        )
        .await;
    assert_eq!(own_parent.status, StatusCode::BAD_REQUEST);

    let blocked = app.delete(&format!("/api/v1/categories/{}", parent)).await;
    assert_eq!(blocked.status, StatusCode::CONFLICT, "{}", blocked.raw);

    let detached = app
        .put(
            &format!("/api/v1/categories/{}", child),
            json!({ "parentId": null }),
        )
        .await;
    assert_eq!(detached.status, StatusCode::OK, "{}", detached.raw);
    assert_eq!(detached.data()["parentId"], Value::Null);

    let deleted = app.delete(&format!("/api/v1/categories/{}", parent)).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let duplicate = app
        .post("/api/v1/categories", json!({ "code": "kitchen" }))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn translations_are_unique_per_store_view() {
    let app = TestApp::new().await;
    let view = app.create_store_view("eu", "fr_FR").await;
    let category = app
        .post("/api/v1/categories", json!({ "code": "sale" }))
        .await
        .id();

    let created = app
        .post(
            "/api/v1/category-translations",
            json!({ "categoryId": category, "storeViewId": view, "name": "Soldes d'été" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.raw);
    assert_eq!(created.data()["slug"], "soldes-d-t");

    let again = app
        .post(
            "/api/v1/category-translations",
            json!({ "categoryId": category, "storeViewId": view, "name": "Promo" }),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let updated = app
        .put(
            &format!("/api/v1/category-translations/{}", created.id()),
            json!({ "name": "Promotions", "slug": "promotions" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.raw);
    assert_eq!(updated.data()["slug"], "promotions");

    let listed = app
        .get(&format!(
            "/api/v1/category-translations?categoryId={}",
            category
        ))
        .await;
    assert_eq!(listed.body["meta"]["total"], 1);

    let unknown_view = app
        .post(
            "/api/v1/category-translations",
            json!({ "categoryId": category, "storeViewId": 999, "name": "Nope" }),
        )
        .await;
    assert_eq!(unknown_view.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stores_views_and_locales() {
    let app = TestApp::new().await;

    let bad_locale = app
        .post("/api/v1/locales", json!({ "code": "english", "name": "English" }))
        .await;
    assert_eq!(bad_locale.status, StatusCode::BAD_REQUEST);

    let view = app.create_store_view("main", "en_GB").await;
    let store = app.get("/api/v1/stores/code/main").await;
    assert_eq!(store.status, StatusCode::OK, "{}", store.raw);
    assert_eq!(store.data()["isActive"], true);

    let duplicate = app
        .post("/api/v1/stores", json!({ "code": "main", "name": "Again" }))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let views = app.get("/api/v1/store-views").await;
    assert_eq!(views.status, StatusCode::OK);
    assert_eq!(views.data()[0]["id"], view);

    let locale_id = views.data()[0]["localeId"].as_i64().unwrap();
    let in_use = app.delete(&format!("/api/v1/locales/{}", locale_id)).await;
    assert_eq!(in_use.status, StatusCode::CONFLICT, "{}", in_use.raw);

    let removed = app
        .delete(&format!("/api/v1/stores/{}", store.id()))
        .await;
    assert_eq!(removed.status, StatusCode::OK, "{}", removed.raw);
    let gone = app.get(&format!("/api/v1/store-views/{}", view)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let freed = app.delete(&format!("/api/v1/locales/{}", locale_id)).await;
    assert_eq!(freed.status, StatusCode::OK);
}

#[tokio::test]
async fn assets_attach_to_products() {
    let app = TestApp::new().await;
    let product = app.create_product("SOFA-1", "Sofa").await;

    let invalid = app
        .post(
            "/api/v1/assets",
            json!({ "fileName": "sofa.jpg", "url": "not a url", "mimeType": "image/jpeg" }),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let asset = app
        .post(
            "/api/v1/assets",
            json!({
                "fileName": "sofa.jpg",
                "url": "https://cdn.example.com/sofa.jpg",
                "mimeType": "image/jpeg",
                "size": 20480
            }),
        )
        .await;
    assert_eq!(asset.status, StatusCode::CREATED, "{}", asset.raw);

    let attached = app
        .post(
            "/api/v1/product-assets",
            json!({ "productId": product, "assetId": asset.id(), "role": "THUMBNAIL" }),
        )
        .await;
    assert_eq!(attached.status, StatusCode::CREATED, "{}", attached.raw);
    assert_eq!(attached.data()["role"], "THUMBNAIL");

    let listed = app
        .get(&format!("/api/v1/product-assets?productId={}", product))
        .await;
    assert_eq!(listed.data().as_array().unwrap().len(), 1);

    let deleted = app
        .delete(&format!("/api/v1/assets/{}", asset.id()))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    let listed = app
        .get(&format!("/api/v1/product-assets?productId={}", product))
        .await;
    assert!(listed.data().as_array().unwrap().is_empty());

    let detach_missing = app
        .delete(&format!(
            "/api/v1/product-assets/product/{}/asset/{}",
            product,
            asset.id()
        ))
        .await;
    assert_eq!(detach_missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_counts_the_catalog() {
    let app = TestApp::new().await;
    app.create_product("A-1", "A").await;
    let b = app.create_product("B-1", "B").await;
    app.patch(
        &format!("/api/v1/products/{}/status", b),
        json!({ "status": "PUBLISHING" }),
    )
    .await;
    app.create_attribute("color", "STRING").await;

    let dashboard = app.get("/api/v1/analytics/dashboard").await;
    assert_eq!(dashboard.status, StatusCode::OK, "{}", dashboard.raw);
    assert_eq!(dashboard.data()["totals"]["products"], 2);
    assert_eq!(dashboard.data()["totals"]["attributes"], 1);
    let publishing = dashboard.data()["productsByStatus"]
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["status"] == "PUBLISHING")
        .map(|entry| entry["count"].clone());
    assert_eq!(publishing, Some(json!(1)));
}

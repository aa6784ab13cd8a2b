mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn product_crud_flow() {
    let app = TestApp::new().await;

    let created = app
        .post(
            "/api/v1/products",
            json!({ "sku": "LAMP-001", "name": "Desk lamp", "productType": "SIMPLE" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.raw);
    assert_eq!(created.body["statusCode"], 201);
    assert_eq!(created.data()["status"], "DRAFT");
    let id = created.id();

    let fetched = app.get(&format!("/api/v1/products/{}", id)).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.data()["sku"], "LAMP-001");

    let by_sku = app.get("/api/v1/products/sku/LAMP-001").await;
    assert_eq!(by_sku.status, StatusCode::OK);
    assert_eq!(by_sku.id(), id);

    let updated = app
        .put(
            &format!("/api/v1/products/{}", id),
            json!({ "name": "Brass desk lamp" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.raw);
    assert_eq!(updated.data()["name"], "Brass desk lamp");
    assert_eq!(updated.data()["sku"], "LAMP-001");

    let deleted = app.delete(&format!("/api/v1/products/{}", id)).await;
    assert_eq!(deleted.status, StatusCode::OK, "{}", deleted.raw);
    assert!(deleted.data().is_null());

    let missing = app.get(&format!("/api/v1/products/{}", id)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["success"], false);
    assert_eq!(missing.body["statusCode"], 404);
}

#[tokio::test]
async fn duplicate_sku_is_a_conflict() {
    let app = TestApp::new().await;
    app.create_product("DUP-1", "First").await;

    let second = app
        .post(
            "/api/v1/products",
            json!({ "sku": "DUP-1", "name": "Second", "productType": "SIMPLE" }),
        )
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT, "{}", second.raw);
    assert_eq!(second.body["success"], false);

    let other = app.create_product("DUP-2", "Other").await;
    let renamed = app
        .put(
            &format!("/api/v1/products/{}", other),
            json!({ "sku": "DUP-1" }),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_product_input_is_rejected() {
    let app = TestApp::new().await;

    let empty_sku = app
        .post(
            "/api/v1/products",
            json!({ "sku": "", "name": "Nameless", "productType": "SIMPLE" }),
        )
        .await;
    assert_eq!(empty_sku.status, StatusCode::BAD_REQUEST);

    let bad_type = app
        .post(
            "/api/v1/products",
            json!({ "sku": "X-1", "name": "X", "productType": "GADGET" }),
        )
        .await;
    assert!(bad_type.status.is_client_error(), "{}", bad_type.status);
}

#[tokio::test]
async fn status_can_be_patched() {
    let app = TestApp::new().await;
    let id = app.create_product("FLOW-1", "Workflow item").await;

    let patched = app
        .patch(
            &format!("/api/v1/products/{}/status", id),
            json!({ "status": "ENRICHMENT" }),
        )
        .await;
    assert_eq!(patched.status, StatusCode::OK, "{}", patched.raw);
    assert_eq!(patched.data()["status"], "ENRICHMENT");

    let back = app
        .patch(
            &format!("/api/v1/products/{}/status", id),
            json!({ "status": "DRAFT" }),
        )
        .await;
    assert_eq!(back.status, StatusCode::OK);
    assert_eq!(back.data()["status"], "DRAFT");
}

#[tokio::test]
async fn list_filters_and_paginates() {
    let app = TestApp::new().await;
    for i in 0..5 {
        app.create_product(&format!("CHAIR-{}", i), &format!("Chair {}", i))
            .await;
    }
    let table = app.create_product("TABLE-1", "Oak table").await;
    app.patch(
        &format!("/api/v1/products/{}/status", table),
        json!({ "status": "APPROVAL" }),
    )
    .await;

    let page = app.get("/api/v1/products?page=2&limit=2").await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.data().as_array().unwrap().len(), 2);
    assert_eq!(page.body["meta"]["total"], 6);
    assert_eq!(page.body["meta"]["page"], 2);
    assert_eq!(page.body["meta"]["limit"], 2);
    assert_eq!(page.body["meta"]["totalPages"], 3);

    let search = app.get("/api/v1/products?search=Chair").await;
    assert_eq!(search.body["meta"]["total"], 5);

    let approved = app.get("/api/v1/products?status=APPROVAL").await;
    let items = approved.data().as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["sku"], "TABLE-1");

    let clamped = app.get("/api/v1/products?limit=1000").await;
    assert_eq!(clamped.body["meta"]["limit"], 100);
}

#[tokio::test]
async fn list_filters_by_category_and_attribute_value() {
    let app = TestApp::new().await;
    let red = app.create_product("SHIRT-R", "Red shirt").await;
    let blue = app.create_product("SHIRT-B", "Blue shirt").await;
    let color = app.create_attribute("color", "STRING").await;

    for (product, value) in [(red, "red"), (blue, "blue")] {
        let saved = app
            .post(
                "/api/v1/product-attributes",
                json!({ "productId": product, "attributeId": color, "value": value }),
            )
            .await;
        assert_eq!(saved.status, StatusCode::OK, "{}", saved.raw);
    }

    let reds = app
        .get("/api/v1/products?attributeCode=color&attributeValue=red")
        .await;
    assert_eq!(reds.status, StatusCode::OK, "{}", reds.raw);
    let items = reds.data().as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["sku"], "SHIRT-R");

    let category = app
        .post("/api/v1/categories", json!({ "code": "shirts" }))
        .await;
    assert_eq!(category.status, StatusCode::CREATED, "{}", category.raw);
    let linked = app
        .post(
            "/api/v1/product-categories",
            json!({ "productId": blue, "categoryId": category.id() }),
        )
        .await;
    assert_eq!(linked.status, StatusCode::CREATED, "{}", linked.raw);

    let in_category = app
        .get(&format!("/api/v1/products?categoryId={}", category.id()))
        .await;
    let items = in_category.data().as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["sku"], "SHIRT-B");
}

#[tokio::test]
async fn deleting_a_product_removes_its_values() {
    let app = TestApp::new().await;
    let product = app.create_product("GONE-1", "Temporary").await;
    let weight = app.create_attribute("weight", "DECIMAL").await;
    app.post(
        "/api/v1/product-attributes",
        json!({ "productId": product, "attributeId": weight, "value": "1.25" }),
    )
    .await;

    let deleted = app.delete(&format!("/api/v1/products/{}", product)).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let values = app
        .get(&format!("/api/v1/product-attributes?productId={}", product))
        .await;
    assert_eq!(values.body["meta"]["total"], 0);
}

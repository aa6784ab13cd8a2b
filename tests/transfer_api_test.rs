mod common;

use axum::http::{header, StatusCode};
use common::TestApp;
use serde_json::{json, Value};

/// A product with a typed value and a category link.
async fn seed_catalog(app: &TestApp) -> (i64, i64) {
    let product = app.create_product("KETTLE-1", "Kettle").await;
    let capacity = app.create_attribute("capacity_ml", "INT").await;
    let category = app
        .post("/api/v1/categories", json!({ "code": "kitchen" }))
        .await
        .id();
    app.post(
        "/api/v1/product-attributes",
        json!({ "productId": product, "attributeId": capacity, "value": 1700 }),
    )
    .await;
    app.post(
        "/api/v1/product-categories",
        json!({ "productId": product, "categoryId": category, "position": 3 }),
    )
    .await;
    (product, category)
}

#[tokio::test]
async fn json_import_creates_then_updates() {
    let app = TestApp::new().await;
    app.create_attribute("color", "STRING").await;
    let content = json!({
        "products": [
            {
                "sku": "IMP-1",
                "name": "Imported one",
                "productType": "SIMPLE",
                "attributes": [{ "attributeCode": "color", "value": "green" }]
            },
            { "sku": "IMP-2", "name": "Imported two", "productType": "VIRTUAL", "status": "ENRICHMENT" }
        ]
    })
    .to_string();

    let first = app
        .post(
            "/api/v1/products/import",
            json!({ "filename": "catalog.json", "content": content }),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.raw);
    assert_eq!(first.body["message"], "Imported 2 of 2 products");
    assert_eq!(first.data()["format"], "json");
    assert_eq!(first.data()["created"], 2);
    assert_eq!(first.data()["updated"], 0);

    let two = app.get("/api/v1/products/sku/IMP-2").await;
    assert_eq!(two.data()["status"], "ENRICHMENT");
    assert_eq!(two.data()["productType"], "VIRTUAL");

    let greens = app
        .get("/api/v1/products?attributeCode=color&attributeValue=green")
        .await;
    assert_eq!(greens.body["meta"]["total"], 1);

    let second = app
        .post(
            "/api/v1/products/import",
            json!({ "format": "json", "content": content }),
        )
        .await;
    assert_eq!(second.data()["created"], 0);
    assert_eq!(second.data()["updated"], 2);

    let all = app.get("/api/v1/products").await;
    assert_eq!(all.body["meta"]["total"], 2);
}

#[tokio::test]
async fn bad_records_fail_alone() {
    let app = TestApp::new().await;
    let content = json!({
        "products": [
            { "sku": "OK-1", "name": "Fine", "productType": "SIMPLE" },
            { "sku": "BAD-1", "productType": "SIMPLE" },
            {
                "sku": "BAD-2",
                "name": "Unknown attribute",
                "productType": "SIMPLE",
                "attributes": [{ "attributeCode": "missing", "value": 1 }]
            },
            { "sku": "BAD-3", "name": "Bad type", "productType": "WIDGET" }
        ]
    })
    .to_string();

    let response = app
        .post("/api/v1/products/import", json!({ "content": content }))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.raw);
    let summary = response.data();
    assert_eq!(summary["total"], 4);
    assert_eq!(summary["created"], 1);
    assert_eq!(summary["failed"], 3);

    let errors = summary["errors"].as_array().unwrap();
    let indexes: Vec<i64> = errors.iter().map(|e| e["index"].as_i64().unwrap()).collect();
    assert_eq!(indexes, vec![1, 2, 3]);
    assert_eq!(errors[0]["errors"][0], "Name is required and must be a string");
    assert_eq!(errors[1]["sku"], "BAD-2");
    assert_eq!(errors[2]["errors"][0], "Invalid product type: WIDGET");

    let rolled_back = app.get("/api/v1/products/sku/BAD-2").await;
    assert_eq!(rolled_back.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn codes_take_precedence_over_ids_on_import() {
    let app = TestApp::new().await;
    let weight = app.create_attribute("weight", "INT").await;
    let color = app.create_attribute("color", "STRING").await;
    let outlet = app
        .post("/api/v1/categories", json!({ "code": "outlet" }))
        .await
        .id();
    let garden = app
        .post("/api/v1/categories", json!({ "code": "garden" }))
        .await
        .id();

    let content = json!({
        "products": [{
            "sku": "MOVED-1",
            "name": "From another database",
            "productType": "SIMPLE",
            "categories": [
                { "categoryId": outlet, "code": "garden", "position": 1 },
                { "code": "outlet" }
            ],
            "attributes": [{ "attributeId": weight, "attributeCode": "color", "value": "red" }]
        }]
    })
    .to_string();

    let response = app
        .post("/api/v1/products/import", json!({ "content": content }))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.raw);
    assert_eq!(response.data()["created"], 1, "{}", response.raw);
    assert_eq!(response.data()["failed"], 0);

    let product = app.get("/api/v1/products/sku/MOVED-1").await.id();
    let values = app
        .get(&format!("/api/v1/product-attributes?productId={}", product))
        .await;
    let stored = values.data().as_array().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["attributeId"], color);
    assert_eq!(stored[0]["value"], "red");

    let links = app
        .get(&format!("/api/v1/product-categories?productId={}", product))
        .await;
    let mut linked: Vec<i64> = links
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|link| link["categoryId"].as_i64().unwrap())
        .collect();
    linked.sort_unstable();
    let mut expected = vec![outlet, garden];
    expected.sort_unstable();
    assert_eq!(linked, expected);
}

#[tokio::test]
async fn unknown_category_code_fails_the_record() {
    let app = TestApp::new().await;
    let content = json!({
        "products": [{
            "sku": "LOST-1",
            "name": "Lost",
            "productType": "SIMPLE",
            "categories": [{ "code": "nowhere" }]
        }]
    })
    .to_string();

    let response = app
        .post("/api/v1/products/import", json!({ "content": content }))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.raw);
    assert_eq!(response.data()["failed"], 1);
    assert_eq!(
        response.data()["errors"][0]["errors"][0],
        "Category nowhere does not exist"
    );
}

#[tokio::test]
async fn unparseable_files_are_bad_requests() {
    let app = TestApp::new().await;

    let malformed = app
        .post(
            "/api/v1/products/import",
            json!({ "format": "json", "content": "{ not json" }),
        )
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST, "{}", malformed.raw);
    assert_eq!(malformed.body["success"], false);

    let no_products = app
        .post(
            "/api/v1/products/import",
            json!({ "format": "xml", "content": "<products></products>" }),
        )
        .await;
    assert_eq!(no_products.status, StatusCode::BAD_REQUEST);

    let empty = app
        .post("/api/v1/products/import", json!({ "content": "" }))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn csv_import_detects_format_from_filename() {
    let app = TestApp::new().await;
    let csv = "sku,name,productType,status\nCSV-1,Chair,SIMPLE,\nCSV-2,Table,BUNDLE,APPROVAL\n";

    let response = app
        .post(
            "/api/v1/products/import",
            json!({ "filename": "upload.CSV", "content": csv }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.raw);
    assert_eq!(response.data()["format"], "csv");
    assert_eq!(response.data()["created"], 2);

    let table = app.get("/api/v1/products/sku/CSV-2").await;
    assert_eq!(table.data()["status"], "APPROVAL");
    let chair = app.get("/api/v1/products/sku/CSV-1").await;
    assert_eq!(chair.data()["status"], "DRAFT");
}

#[tokio::test]
async fn validate_import_reports_each_record() {
    let app = TestApp::new().await;
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<products>
  <product><sku>X-1</sku><name>Good</name><productType>SIMPLE</productType></product>
  <product><sku>X-2</sku><productType>SIMPLE</productType></product>
</products>"#;

    let response = app
        .post("/api/v1/products/import/validate", json!({ "content": xml }))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.raw);
    let results = response.data().as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["valid"], true);
    assert_eq!(results[1]["valid"], false);
    assert_eq!(results[1]["sku"], "X-2");

    let nothing_written = app.get("/api/v1/products").await;
    assert_eq!(nothing_written.body["meta"]["total"], 0);
}

#[tokio::test]
async fn json_export_carries_relations() {
    let app = TestApp::new().await;
    let (product, category) = seed_catalog(&app).await;

    let response = app.get("/api/v1/products/export?format=json").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers[header::CONTENT_TYPE],
        "application/json"
    );
    let disposition = response.headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment; filename=\"products-export-"));
    assert!(disposition.ends_with(".json\""));

    let exported = &response.body["products"][0];
    assert_eq!(exported["id"], product);
    assert_eq!(exported["sku"], "KETTLE-1");
    assert_eq!(exported["attributeSetId"], Value::Null);
    assert_eq!(exported["categories"][0]["categoryId"], category);
    assert_eq!(exported["categories"][0]["position"], 3);
    assert_eq!(exported["attributes"][0]["attributeCode"], "capacity_ml");
    assert_eq!(exported["attributes"][0]["value"], 1700);
}

#[tokio::test]
async fn export_filters_by_ids() {
    let app = TestApp::new().await;
    let first = app.create_product("A-1", "First").await;
    let second = app.create_product("B-1", "Second").await;
    app.create_product("C-1", "Third").await;

    let response = app
        .get(&format!("/api/v1/products/export?ids={},{}", first, second))
        .await;
    let products = response.body["products"].as_array().unwrap();
    let skus: Vec<&str> = products.iter().map(|p| p["sku"].as_str().unwrap()).collect();
    assert_eq!(skus, vec!["A-1", "B-1"]);

    let bad_ids = app.get("/api/v1/products/export?ids=1,x").await;
    assert_eq!(bad_ids.status, StatusCode::BAD_REQUEST);

    let bad_format = app.get("/api/v1/products/export?format=yaml").await;
    assert_eq!(bad_format.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_format.body["success"], false);
}

#[tokio::test]
async fn csv_export_reimports_with_relations() {
    let app = TestApp::new().await;
    let (product, category) = seed_catalog(&app).await;

    let export = app.get("/api/v1/products/export?format=csv").await;
    assert_eq!(export.status, StatusCode::OK);
    assert_eq!(export.headers[header::CONTENT_TYPE], "text/csv");
    assert!(export.raw.starts_with("id,sku,name,productType,status"));

    let deleted = app.delete(&format!("/api/v1/products/{}", product)).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let reimport = app
        .post(
            "/api/v1/products/import",
            json!({ "format": "csv", "content": export.raw }),
        )
        .await;
    assert_eq!(reimport.status, StatusCode::OK, "{}", reimport.raw);
    assert_eq!(reimport.data()["created"], 1, "{}", reimport.raw);
    assert_eq!(reimport.data()["failed"], 0);

    let restored = app.get("/api/v1/products/sku/KETTLE-1").await;
    let restored_id = restored.id();
    let in_category = app
        .get(&format!("/api/v1/products?categoryId={}", category))
        .await;
    assert_eq!(in_category.data()[0]["id"], restored_id);

    let values = app
        .get(&format!("/api/v1/product-attributes?productId={}", restored_id))
        .await;
    assert_eq!(values.data()[0]["value"], 1700);
}

#[tokio::test]
async fn xml_export_reimports_as_update() {
    let app = TestApp::new().await;
    seed_catalog(&app).await;

    let export = app.get("/api/v1/products/export?format=xml").await;
    assert_eq!(export.status, StatusCode::OK);
    assert_eq!(export.headers[header::CONTENT_TYPE], "application/xml");
    assert!(export.raw.contains("<sku>KETTLE-1</sku>"));
    assert!(!export.raw.contains("<attributeSetId"));

    let reimport = app
        .post(
            "/api/v1/products/import",
            json!({ "filename": "export.xml", "content": export.raw }),
        )
        .await;
    assert_eq!(reimport.status, StatusCode::OK, "{}", reimport.raw);
    assert_eq!(reimport.data()["format"], "xml");
    assert_eq!(reimport.data()["updated"], 1, "{}", reimport.raw);
}

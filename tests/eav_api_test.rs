mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn attribute_codes_are_unique_and_immutable() {
    let app = TestApp::new().await;
    let id = app.create_attribute("material", "STRING").await;

    let duplicate = app
        .post(
            "/api/v1/attributes",
            json!({ "code": "material", "label": "Again", "dataType": "TEXT" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let bad_code = app
        .post(
            "/api/v1/attributes",
            json!({ "code": "Bad-Code", "label": "Bad", "dataType": "STRING" }),
        )
        .await;
    assert_eq!(bad_code.status, StatusCode::BAD_REQUEST);

    let by_code = app.get("/api/v1/attributes/code/material").await;
    assert_eq!(by_code.status, StatusCode::OK);
    assert_eq!(by_code.id(), id);
    assert_eq!(by_code.data()["inputType"], "TEXT");

    let renamed = app
        .put(
            &format!("/api/v1/attributes/{}", id),
            json!({ "code": "fabric" }),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::BAD_REQUEST);

    let relabeled = app
        .put(
            &format!("/api/v1/attributes/{}", id),
            json!({ "label": "Material", "isFilterable": true }),
        )
        .await;
    assert_eq!(relabeled.status, StatusCode::OK, "{}", relabeled.raw);
    assert_eq!(relabeled.data()["label"], "Material");
    assert_eq!(relabeled.data()["isFilterable"], true);
}

#[tokio::test]
async fn set_layout_groups_attributes() {
    let app = TestApp::new().await;
    let color = app.create_attribute("color", "STRING").await;
    let size = app.create_attribute("size", "INT").await;
    let notes = app.create_attribute("notes", "TEXT").await;

    let set = app
        .post(
            "/api/v1/attribute-sets",
            json!({ "code": "apparel", "label": "Apparel", "productType": "SIMPLE" }),
        )
        .await;
    assert_eq!(set.status, StatusCode::CREATED, "{}", set.raw);
    let set_id = set.id();

    let group = app
        .post(
            "/api/v1/attribute-groups",
            json!({ "attributeSetId": set_id, "code": "general", "label": "General" }),
        )
        .await;
    assert_eq!(group.status, StatusCode::CREATED, "{}", group.raw);
    let group_id = group.id();

    for (attribute, order) in [(size, 2), (color, 1)] {
        let assigned = app
            .post(
                &format!("/api/v1/attribute-sets/{}/groups/{}/attributes", set_id, group_id),
                json!({ "attributeId": attribute, "sortOrder": order }),
            )
            .await;
        assert_eq!(assigned.status, StatusCode::CREATED, "{}", assigned.raw);
    }
    let ungrouped = app
        .post(
            &format!("/api/v1/attribute-sets/{}/attributes", set_id),
            json!({ "attributeId": notes }),
        )
        .await;
    assert_eq!(ungrouped.status, StatusCode::CREATED, "{}", ungrouped.raw);

    let layout = app
        .get(&format!("/api/v1/attribute-sets/{}/attributes", set_id))
        .await;
    assert_eq!(layout.status, StatusCode::OK, "{}", layout.raw);
    let groups = layout.data()["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    let grouped = groups[0]["attributes"].as_array().unwrap();
    let codes: Vec<&str> = grouped.iter().map(|a| a["code"].as_str().unwrap()).collect();
    assert_eq!(codes, vec!["color", "size"]);
    assert_eq!(layout.data()["ungrouped"][0]["code"], "notes");

    let in_group = app
        .get(&format!(
            "/api/v1/attribute-sets/{}/groups/{}/attributes",
            set_id, group_id
        ))
        .await;
    assert_eq!(in_group.data().as_array().unwrap().len(), 2);

    let removed = app
        .delete(&format!("/api/v1/attribute-sets/{}/attributes/{}", set_id, size))
        .await;
    assert_eq!(removed.status, StatusCode::OK, "{}", removed.raw);
    let layout = app
        .get(&format!("/api/v1/attribute-sets/{}/attributes", set_id))
        .await;
    assert_eq!(layout.data()["groups"][0]["attributes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn group_from_another_set_is_rejected() {
    let app = TestApp::new().await;
    let color = app.create_attribute("color", "STRING").await;
    let first = app
        .post("/api/v1/attribute-sets", json!({ "code": "a", "label": "A" }))
        .await
        .id();
    let second = app
        .post("/api/v1/attribute-sets", json!({ "code": "b", "label": "B" }))
        .await
        .id();
    let group = app
        .post(
            "/api/v1/attribute-groups",
            json!({ "attributeSetId": first, "code": "main", "label": "Main" }),
        )
        .await
        .id();

    let response = app
        .post(
            &format!("/api/v1/attribute-sets/{}/attributes", second),
            json!({ "attributeId": color, "attributeGroupId": group }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", response.raw);
}

#[tokio::test]
async fn values_are_typed_by_attribute() {
    let app = TestApp::new().await;
    let product = app.create_product("TEE-1", "T-shirt").await;
    let weight = app.create_attribute("weight", "DECIMAL").await;
    let in_stock = app.create_attribute("in_stock", "BOOLEAN").await;
    let pieces = app.create_attribute("pieces", "INT").await;

    let decimal = app
        .post(
            "/api/v1/product-attributes",
            json!({ "productId": product, "attributeId": weight, "value": "0.35" }),
        )
        .await;
    assert_eq!(decimal.status, StatusCode::OK, "{}", decimal.raw);
    assert_eq!(decimal.data()["dataType"], "DECIMAL");
    assert_eq!(decimal.data()["value"], json!(0.35));
    assert_eq!(decimal.data()["attributeCode"], "weight");

    let boolean = app
        .post(
            "/api/v1/product-attributes",
            json!({ "productId": product, "attributeId": in_stock, "value": "yes" }),
        )
        .await;
    assert_eq!(boolean.status, StatusCode::OK, "{}", boolean.raw);
    assert_eq!(boolean.data()["value"], true);

    let mismatch = app
        .post(
            "/api/v1/product-attributes",
            json!({ "productId": product, "attributeId": pieces, "value": "many" }),
        )
        .await;
    assert_eq!(mismatch.status, StatusCode::BAD_REQUEST, "{}", mismatch.raw);
    assert_eq!(mismatch.body["success"], false);

    let missing = app
        .post(
            "/api/v1/product-attributes",
            json!({ "productId": product, "attributeId": pieces }),
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let unknown_product = app
        .post(
            "/api/v1/product-attributes",
            json!({ "productId": 9999, "attributeId": pieces, "value": 1 }),
        )
        .await;
    assert_eq!(unknown_product.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn setting_a_value_twice_updates_in_place() {
    let app = TestApp::new().await;
    let product = app.create_product("MUG-1", "Mug").await;
    let volume = app.create_attribute("volume", "INT").await;

    let first = app
        .post(
            "/api/v1/product-attributes",
            json!({ "productId": product, "attributeId": volume, "value": 300 }),
        )
        .await;
    let second = app
        .post(
            "/api/v1/product-attributes",
            json!({ "productId": product, "attributeId": volume, "value": "350" }),
        )
        .await;
    assert_eq!(second.status, StatusCode::OK, "{}", second.raw);
    assert_eq!(first.id(), second.id());
    assert_eq!(second.data()["value"], 350);

    let fetched = app
        .get(&format!("/api/v1/product-attributes/{}", second.id()))
        .await;
    assert_eq!(fetched.data()["value"], 350);
}

#[tokio::test]
async fn store_view_values_live_beside_the_global_one() {
    let app = TestApp::new().await;
    let view = app.create_store_view("eu", "de_DE").await;
    let product = app.create_product("BOOK-1", "Book").await;
    let title = app.create_attribute("title", "STRING").await;

    let global = app
        .post(
            "/api/v1/product-attributes",
            json!({ "productId": product, "attributeId": title, "value": "Book" }),
        )
        .await;
    assert_eq!(global.status, StatusCode::OK);
    let localized = app
        .post(
            "/api/v1/product-attributes",
            json!({
                "productId": product,
                "attributeId": title,
                "storeViewId": view,
                "value": "Buch"
            }),
        )
        .await;
    assert_eq!(localized.status, StatusCode::OK, "{}", localized.raw);
    assert_ne!(global.id(), localized.id());

    let listed = app
        .get(&format!("/api/v1/product-attributes?productId={}", product))
        .await;
    assert_eq!(listed.body["meta"]["total"], 2);

    let removed = app
        .delete(&format!(
            "/api/v1/product-attributes/product/{}/attribute/{}/store-view/{}",
            product, title, view
        ))
        .await;
    assert_eq!(removed.status, StatusCode::OK, "{}", removed.raw);

    let remaining = app
        .get(&format!("/api/v1/product-attributes?productId={}", product))
        .await;
    assert_eq!(remaining.body["meta"]["total"], 1);
    assert_eq!(remaining.data()[0]["storeViewId"], serde_json::Value::Null);

    let cleared = app
        .delete(&format!(
            "/api/v1/product-attributes/product/{}/attribute/{}",
            product, title
        ))
        .await;
    assert_eq!(cleared.status, StatusCode::OK);
    assert_eq!(cleared.data()["removed"], 1);
}

#[tokio::test]
async fn global_attributes_reject_store_view_values() {
    let app = TestApp::new().await;
    let view = app.create_store_view("us", "en_US").await;
    let product = app.create_product("PEN-1", "Pen").await;
    let ean = app
        .post(
            "/api/v1/attributes",
            json!({ "code": "ean", "label": "EAN", "dataType": "STRING", "isGlobal": true }),
        )
        .await
        .id();

    let response = app
        .post(
            "/api/v1/product-attributes",
            json!({ "productId": product, "attributeId": ean, "storeViewId": view, "value": "4006381333931" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", response.raw);
}

#[tokio::test]
async fn data_type_is_locked_once_values_exist() {
    let app = TestApp::new().await;
    let product = app.create_product("CUP-1", "Cup").await;
    let height = app.create_attribute("height", "INT").await;
    app.post(
        "/api/v1/product-attributes",
        json!({ "productId": product, "attributeId": height, "value": 12 }),
    )
    .await;

    let changed = app
        .put(
            &format!("/api/v1/attributes/{}", height),
            json!({ "dataType": "STRING" }),
        )
        .await;
    assert_eq!(changed.status, StatusCode::CONFLICT, "{}", changed.raw);
}

#![allow(clippy::unwrap_used)]
// Integration tests for `WapiClient` using wiremock.

use std::collections::BTreeMap;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{basic_auth, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ipamsync_api::{Error, ExtAttrValue, ExtensibleAttributeDef, WapiClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, WapiClient) {
    let server = MockServer::start().await;
    let client = WapiClient::with_client(
        reqwest::Client::new(),
        &server.uri(),
        "2.13.1",
        "admin",
        SecretString::from("infoblox"),
    )
    .unwrap();
    (server, client)
}

fn wapi(suffix: &str) -> String {
    format!("/wapi/v2.13.1/{suffix}")
}

// ── Network lookup ──────────────────────────────────────────────────

#[tokio::test]
async fn test_get_network_exact_match() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(wapi("network")))
        .and(query_param("network", "10.0.0.0/24"))
        .and(query_param("network_view", "default"))
        .and(basic_auth("admin", "infoblox"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_ref": "network/ZG5z:10.0.0.0/24/default",
            "network": "10.0.0.0/24",
            "network_view": "default",
            "comment": "prod vpc",
            "extattrs": { "Environment": { "value": "prod" } }
        }])))
        .mount(&server)
        .await;

    let net = client
        .get_network("10.0.0.0/24", "default")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(net.reference, "network/ZG5z:10.0.0.0/24/default");
    assert_eq!(net.comment, "prod vpc");
    assert_eq!(net.extattrs["Environment"].as_text(), "prod");
}

#[tokio::test]
async fn test_get_network_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(wapi("network")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let net = client.get_network("10.9.0.0/16", "default").await.unwrap();
    assert!(net.is_none());
}

#[tokio::test]
async fn test_overlapping_networks_filters_locally() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(wapi("network")))
        .and(query_param("_max_results", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_ref": "network/a:10.0.0.0/23/default", "network": "10.0.0.0/23" },
            { "_ref": "network/b:10.1.0.0/24/default", "network": "10.1.0.0/24" },
            { "_ref": "network/c:bogus/default", "network": "bogus" }
        ])))
        .mount(&server)
        .await;

    let hits = client
        .overlapping_networks("10.0.1.0/24", "default")
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].network, "10.0.0.0/23");
}

// ── Network writes ──────────────────────────────────────────────────

#[tokio::test]
async fn test_create_network_returns_ref() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(wapi("network")))
        .and(body_partial_json(json!({
            "network": "10.2.0.0/24",
            "network_view": "default",
            "comment": "new",
            "extattrs": { "Import_Source": { "value": "aws" } }
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!("network/new:10.2.0.0/24/default")),
        )
        .mount(&server)
        .await;

    let mut attrs = BTreeMap::new();
    attrs.insert("Import_Source".to_owned(), ExtAttrValue::text("aws"));

    let reference = client
        .create_network("10.2.0.0/24", "default", "new", attrs)
        .await
        .unwrap();
    assert_eq!(reference, "network/new:10.2.0.0/24/default");
}

#[tokio::test]
async fn test_update_network_puts_to_ref() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(wapi("network/ZG5z:10.0.0.0/24/default")))
        .and(body_partial_json(json!({ "comment": "updated" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!("network/ZG5z:10.0.0.0/24/default")),
        )
        .mount(&server)
        .await;

    let reference = client
        .update_network("network/ZG5z:10.0.0.0/24/default", "updated", BTreeMap::new())
        .await
        .unwrap();
    assert_eq!(reference, "network/ZG5z:10.0.0.0/24/default");
}

#[tokio::test]
async fn test_conflict_error_is_decoded() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(wapi("network")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "Error": "AdmConDataError: None (IBDataConflictError: IB.Data.Conflict:The network 10.2.0.0/24 already exists.)",
            "code": "Client.Ibap.Data.Conflict",
            "text": "The network 10.2.0.0/24 already exists."
        })))
        .mount(&server)
        .await;

    let err = client
        .create_network("10.2.0.0/24", "default", "", BTreeMap::new())
        .await
        .unwrap_err();

    assert!(err.is_conflict(), "expected conflict, got: {err:?}");
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn test_unauthorized_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(wapi("grid")))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authorization Required"))
        .mount(&server)
        .await;

    let result = client.verify_connection().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_non_json_success_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(wapi("networkview")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client.list_network_views().await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

// ── Extensible attributes ───────────────────────────────────────────

#[tokio::test]
async fn test_create_ea_definition_skips_existing() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(wapi("extensibleattributedef")))
        .and(query_param("name", "Environment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_ref": "extensibleattributedef/env:Environment",
            "name": "Environment",
            "type": "STRING"
        }])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(wapi("extensibleattributedef")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!("never")))
        .expect(0)
        .mount(&server)
        .await;

    let def = ExtensibleAttributeDef {
        reference: String::new(),
        name: "Environment".into(),
        attr_type: "STRING".into(),
        comment: String::new(),
        flags: None,
        list_values: None,
    };
    assert!(client.create_ea_definition(&def).await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_ea_definition_posts_when_missing() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(wapi("extensibleattributedef")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(wapi("extensibleattributedef")))
        .and(body_partial_json(json!({ "name": "Owner", "type": "STRING" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!("extensibleattributedef/own:Owner")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let def = ExtensibleAttributeDef {
        reference: String::new(),
        name: "Owner".into(),
        attr_type: "STRING".into(),
        comment: "Auto-created by ipamsync".into(),
        flags: None,
        list_values: None,
    };
    let reference = client.create_ea_definition(&def).await.unwrap();
    assert_eq!(reference.as_deref(), Some("extensibleattributedef/own:Owner"));
}

// ── Grid ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_network_views() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(wapi("networkview")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_ref": "networkview/a:default/true", "name": "default", "is_default": true },
            { "_ref": "networkview/b:lab/false", "name": "lab", "comment": "lab view" }
        ])))
        .mount(&server)
        .await;

    let views = client.list_network_views().await.unwrap();
    assert_eq!(views.len(), 2);
    assert!(views[0].is_default);
    assert_eq!(views[1].comment, "lab view");
}

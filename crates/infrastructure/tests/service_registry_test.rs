use dnsprobe_application::ports::ServiceRegistry;
use dnsprobe_domain::{ProbeError, ServiceKind, ServiceSpec};
use dnsprobe_infrastructure::{KubeApiClient, KubeServiceRegistry};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

mod helpers;
use helpers::{cluster_config, MockApiServer};

async fn registry() -> (MockApiServer, KubeServiceRegistry, tokio::sync::oneshot::Sender<()>) {
    let api = MockApiServer::new();
    let (addr, shutdown) = api.start().await;
    let client = Arc::new(KubeApiClient::from_config(&cluster_config(addr)).unwrap());
    (api, KubeServiceRegistry::new(client), shutdown)
}

fn selector() -> BTreeMap<String, String> {
    BTreeMap::from([("dns-test".to_string(), "true".to_string())])
}

// ============================================================================
// Tests: KubeServiceRegistry
// ============================================================================

#[tokio::test]
async fn test_create_cluster_ip_service_reports_ip() {
    // Arrange
    let (api, registry, _shutdown) = registry().await;

    // Act
    let info = registry
        .create_service("dns-4821", &ServiceSpec::cluster_ip("dns-test-service-2", selector()))
        .await
        .unwrap();

    // Assert
    assert_eq!(info.spec.kind, ServiceKind::ClusterIp);
    assert_eq!(info.cluster_ip.as_deref(), Some("10.96.0.1"));
    assert!(api.service("dns-test-service-2").await.is_some());
}

#[tokio::test]
async fn test_create_headless_service() {
    let (_api, registry, _shutdown) = registry().await;

    let info = registry
        .create_service("dns-4821", &ServiceSpec::headless("dns-test-service", selector()))
        .await
        .unwrap();

    assert_eq!(info.spec.kind, ServiceKind::Headless);
    assert_eq!(info.cluster_ip, None);
}

#[tokio::test]
async fn test_update_retries_on_conflict() {
    // Arrange
    let (api, registry, _shutdown) = registry().await;
    api.insert_service(json!({
        "metadata": { "name": "dns-test-service-3", "resourceVersion": "7" },
        "spec": { "type": "ExternalName", "externalName": "foo.example.com" },
    }))
    .await;
    api.set_put_conflicts(2).await;
    let mut calls = 0;

    // Act
    let info = registry
        .update_service("dns-4821", "dns-test-service-3", &mut |spec: &mut ServiceSpec| {
            calls += 1;
            spec.kind = ServiceKind::ExternalName("bar.example.com".to_string());
        })
        .await
        .unwrap();

    // Assert
    assert_eq!(calls, 3);
    assert_eq!(
        info.spec.kind,
        ServiceKind::ExternalName("bar.example.com".to_string())
    );
    let stored = api.service("dns-test-service-3").await.unwrap();
    assert_eq!(stored["metadata"]["resourceVersion"], "7");
}

#[tokio::test]
async fn test_update_gives_up_after_three_conflicts() {
    let (api, registry, _shutdown) = registry().await;
    api.insert_service(json!({
        "metadata": { "name": "svc" },
        "spec": { "type": "ExternalName", "externalName": "foo.example.com" },
    }))
    .await;
    api.set_put_conflicts(5).await;

    let result = registry
        .update_service("dns-4821", "svc", &mut |_spec: &mut ServiceSpec| {})
        .await;

    match result {
        Err(ProbeError::Resource(message)) => assert!(message.contains("HTTP 409")),
        other => panic!("expected resource error, got {other:?}"),
    }
    let puts = api
        .requests()
        .await
        .iter()
        .filter(|r| r.starts_with("PUT"))
        .count();
    assert_eq!(puts, 3);
}

#[tokio::test]
async fn test_external_name_to_cluster_ip() {
    let (api, registry, _shutdown) = registry().await;
    api.insert_service(json!({
        "metadata": { "name": "svc" },
        "spec": { "type": "ExternalName", "externalName": "foo.example.com" },
    }))
    .await;

    let info = registry
        .update_service("dns-4821", "svc", &mut |spec: &mut ServiceSpec| {
            *spec = ServiceSpec::cluster_ip("svc", selector());
        })
        .await
        .unwrap();

    assert_eq!(info.spec.kind, ServiceKind::ClusterIp);
    assert!(info.cluster_ip.is_some());
    let stored = api.service("svc").await.unwrap();
    assert!(stored["spec"].get("externalName").is_none());
}

#[tokio::test]
async fn test_missing_service_is_resource_error() {
    let (_api, registry, _shutdown) = registry().await;

    assert!(matches!(
        registry.get_service("dns-4821", "nope").await,
        Err(ProbeError::Resource(_))
    ));
    assert!(matches!(
        registry.delete_service("dns-4821", "nope").await,
        Err(ProbeError::Resource(_))
    ));
}

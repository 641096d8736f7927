use async_trait::async_trait;
use dnsprobe_application::ports::ServiceRegistry;
use dnsprobe_domain::{ProbeError, ServiceInfo, ServiceKind, ServicePort, ServiceSpec};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::KubeApiClient;

const MAX_UPDATE_ATTEMPTS: u32 = 3;

/// Services through the core/v1 API.
pub struct KubeServiceRegistry {
    client: Arc<KubeApiClient>,
}

impl KubeServiceRegistry {
    pub fn new(client: Arc<KubeApiClient>) -> Self {
        Self { client }
    }

    fn service_path(namespace: &str, name: Option<&str>) -> Vec<String> {
        let mut path = vec![
            "api".to_string(),
            "v1".to_string(),
            "namespaces".to_string(),
            namespace.to_string(),
            "services".to_string(),
        ];
        if let Some(name) = name {
            path.push(name.to_string());
        }
        path
    }

    async fn call(
        &self,
        method: Method,
        namespace: &str,
        name: Option<&str>,
        body: Option<&Value>,
    ) -> Result<super::ApiResponse, ProbeError> {
        let url = self
            .client
            .url(&Self::service_path(namespace, name))
            .map_err(ProbeError::Resource)?;
        self.client
            .send(method, url, body)
            .await
            .map_err(ProbeError::Resource)
    }

    async fn fetch(&self, namespace: &str, name: &str) -> Result<Value, ProbeError> {
        let response = self.call(Method::GET, namespace, Some(name), None).await?;
        if !response.is_success() {
            return Err(api_error("get", name, &response));
        }
        parse_json(&response.body)
    }
}

#[async_trait]
impl ServiceRegistry for KubeServiceRegistry {
    async fn create_service(
        &self,
        namespace: &str,
        spec: &ServiceSpec,
    ) -> Result<ServiceInfo, ProbeError> {
        let manifest = service_manifest(spec);
        let response = self
            .call(Method::POST, namespace, None, Some(&manifest))
            .await?;
        if !response.is_success() {
            return Err(api_error("create", &spec.name, &response));
        }
        parse_service(&parse_json(&response.body)?)
    }

    async fn get_service(&self, namespace: &str, name: &str) -> Result<ServiceInfo, ProbeError> {
        parse_service(&self.fetch(namespace, name).await?)
    }

    async fn update_service(
        &self,
        namespace: &str,
        name: &str,
        mutate: &mut (dyn for<'s> FnMut(&'s mut ServiceSpec) + Send),
    ) -> Result<ServiceInfo, ProbeError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut current = self.fetch(namespace, name).await?;
            let mut spec = parse_service(&current)?.spec;
            mutate(&mut spec);
            apply_spec(&mut current, &spec);

            let response = self
                .call(Method::PUT, namespace, Some(name), Some(&current))
                .await?;
            if response.is_success() {
                debug!(service = %name, attempt, "Service updated");
                return parse_service(&parse_json(&response.body)?);
            }
            if response.status == StatusCode::CONFLICT && attempt < MAX_UPDATE_ATTEMPTS {
                warn!(service = %name, attempt, "Service update conflicted, retrying");
                continue;
            }
            return Err(api_error("update", name, &response));
        }
    }

    async fn delete_service(&self, namespace: &str, name: &str) -> Result<(), ProbeError> {
        let response = self.call(Method::DELETE, namespace, Some(name), None).await?;
        if !response.is_success() {
            return Err(api_error("delete", name, &response));
        }
        Ok(())
    }
}

fn api_error(action: &str, name: &str, response: &super::ApiResponse) -> ProbeError {
    ProbeError::Resource(format!(
        "Failed to {} service {} (HTTP {}): {}",
        action,
        name,
        response.status.as_u16(),
        response.message()
    ))
}

fn parse_json(body: &str) -> Result<Value, ProbeError> {
    serde_json::from_str(body)
        .map_err(|e| ProbeError::Resource(format!("Invalid service JSON: {}", e)))
}

fn ports_json(ports: &[ServicePort]) -> Value {
    Value::Array(
        ports
            .iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "port": p.port,
                    "protocol": p.protocol,
                    "targetPort": p.port,
                })
            })
            .collect(),
    )
}

pub fn service_manifest(spec: &ServiceSpec) -> Value {
    let mut manifest = json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": { "name": spec.name },
        "spec": {},
    });
    apply_spec(&mut manifest, spec);
    manifest
}

/// Writes `spec` into a Service object, keeping server-owned fields such as
/// `resourceVersion`. Allocated cluster IPs are dropped only when the type
/// stops being ClusterIP.
pub fn apply_spec(service: &mut Value, spec: &ServiceSpec) {
    if !service.is_object() {
        return;
    }
    let body = &mut service["spec"];
    if !body.is_object() {
        *body = json!({});
    }
    let Some(fields) = body.as_object_mut() else {
        return;
    };

    let was_cluster_ip = fields
        .get("clusterIP")
        .and_then(Value::as_str)
        .is_some_and(|ip| !ip.is_empty() && ip != "None");

    fields.insert("selector".to_string(), json!(spec.selector));
    fields.insert("ports".to_string(), ports_json(&spec.ports));

    match &spec.kind {
        ServiceKind::Headless => {
            fields.insert("type".to_string(), json!("ClusterIP"));
            fields.insert("clusterIP".to_string(), json!("None"));
            fields.remove("clusterIPs");
            fields.remove("externalName");
        }
        ServiceKind::ClusterIp => {
            fields.insert("type".to_string(), json!("ClusterIP"));
            if !was_cluster_ip {
                fields.remove("clusterIP");
                fields.remove("clusterIPs");
            }
            fields.remove("externalName");
        }
        ServiceKind::ExternalName(target) => {
            fields.insert("type".to_string(), json!("ExternalName"));
            fields.insert("externalName".to_string(), json!(target));
            fields.remove("clusterIP");
            fields.remove("clusterIPs");
            if spec.selector.is_empty() {
                fields.remove("selector");
            }
        }
    }
}

pub fn parse_service(service: &Value) -> Result<ServiceInfo, ProbeError> {
    let name = service["metadata"]["name"]
        .as_str()
        .ok_or_else(|| ProbeError::Resource("Service without metadata.name".to_string()))?
        .to_string();
    let body = &service["spec"];
    let cluster_ip = body["clusterIP"].as_str().filter(|ip| !ip.is_empty());

    let kind = match body["type"].as_str().unwrap_or("ClusterIP") {
        "ExternalName" => ServiceKind::ExternalName(
            body["externalName"].as_str().unwrap_or_default().to_string(),
        ),
        _ if cluster_ip == Some("None") => ServiceKind::Headless,
        _ => ServiceKind::ClusterIp,
    };

    let selector: BTreeMap<String, String> = body["selector"]
        .as_object()
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                .collect()
        })
        .unwrap_or_default();

    let ports = body["ports"]
        .as_array()
        .map(|ports| {
            ports
                .iter()
                .filter_map(|p| {
                    Some(ServicePort {
                        name: p["name"].as_str().unwrap_or_default().to_string(),
                        port: u16::try_from(p["port"].as_u64()?).ok()?,
                        protocol: p["protocol"].as_str().unwrap_or("TCP").to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let cluster_ip = match &kind {
        ServiceKind::ClusterIp => cluster_ip.map(str::to_string),
        _ => None,
    };

    Ok(ServiceInfo {
        spec: ServiceSpec {
            name,
            kind,
            selector,
            ports,
        },
        cluster_ip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> BTreeMap<String, String> {
        BTreeMap::from([("dns-test".to_string(), "true".to_string())])
    }

    #[test]
    fn test_headless_manifest() {
        let manifest = service_manifest(&ServiceSpec::headless("dns-test-service", selector()));

        assert_eq!(manifest["spec"]["clusterIP"], "None");
        assert_eq!(manifest["spec"]["ports"][0]["port"], 80);
        assert_eq!(manifest["spec"]["selector"]["dns-test"], "true");
    }

    #[test]
    fn test_external_name_round_trip() {
        let spec = ServiceSpec::external_name("dns-test-service-3", "foo.example.com");
        let info = parse_service(&service_manifest(&spec)).unwrap();

        assert_eq!(info.spec, spec);
        assert_eq!(info.cluster_ip, None);
    }

    #[test]
    fn test_switch_to_cluster_ip_drops_external_name() {
        let mut service = json!({
            "metadata": { "name": "svc", "resourceVersion": "42" },
            "spec": { "type": "ExternalName", "externalName": "foo.example.com" },
        });

        apply_spec(&mut service, &ServiceSpec::cluster_ip("svc", selector()));

        assert_eq!(service["metadata"]["resourceVersion"], "42");
        assert_eq!(service["spec"]["type"], "ClusterIP");
        assert!(service["spec"].get("externalName").is_none());
        assert!(service["spec"].get("clusterIP").is_none());
    }

    #[test]
    fn test_allocated_cluster_ip_is_kept() {
        let mut service = json!({
            "metadata": { "name": "svc" },
            "spec": { "type": "ClusterIP", "clusterIP": "10.96.0.42" },
        });

        apply_spec(&mut service, &ServiceSpec::cluster_ip("svc", selector()));
        let info = parse_service(&service).unwrap();

        assert_eq!(info.cluster_ip.as_deref(), Some("10.96.0.42"));
    }
}

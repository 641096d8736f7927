use dnsprobe_domain::config::SandboxConfig;
use dnsprobe_domain::{ProbeError, SandboxSpec};
use serde_json::{json, Value};

const RESULTS_VOLUME: &str = "results";
pub const WEBSERVER_CONTAINER: &str = "webserver";

/// Renders a [`SandboxSpec`] as a Pod: a web server exposing the results
/// volume on port 80 plus one querier container per variant, all sharing the
/// same `emptyDir`.
pub struct PodManifestBuilder {
    config: SandboxConfig,
}

impl PodManifestBuilder {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    /// # Errors
    ///
    /// * `ProbeError::Deployment` - If a variant has no configured image
    pub fn build(&self, spec: &SandboxSpec) -> Result<Value, ProbeError> {
        let mount = json!([{ "name": RESULTS_VOLUME, "mountPath": self.config.results_dir }]);

        let mut containers = vec![json!({
            "name": WEBSERVER_CONTAINER,
            "image": self.config.webserver_image,
            "args": self.config.webserver_args,
            "ports": [{ "containerPort": 80, "protocol": "TCP" }],
            "volumeMounts": mount,
        })];

        for variant_script in &spec.scripts {
            let variant = variant_script.variant.as_str();
            let image = self.config.image_for(variant).ok_or_else(|| {
                ProbeError::Deployment(format!("No image configured for variant '{}'", variant))
            })?;
            containers.push(json!({
                "name": format!("{}-querier", variant),
                "image": image,
                "command": ["sh", "-c", variant_script.script],
                "volumeMounts": mount,
            }));
        }

        let identity = &spec.identity;
        let mut pod_spec = json!({
            "volumes": [{ "name": RESULTS_VOLUME, "emptyDir": {} }],
            "containers": containers,
        });
        if let Some(hostname) = &identity.hostname {
            pod_spec["hostname"] = json!(hostname);
        }
        if let Some(subdomain) = &identity.subdomain {
            pod_spec["subdomain"] = json!(subdomain);
        }

        Ok(json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {
                "name": identity.name,
                "namespace": identity.namespace,
                "labels": identity.labels,
            },
            "spec": pod_spec,
        }))
    }
}

pub mod artifact_reader;
pub mod client;
pub mod exec;
pub mod pod_manifest;
pub mod sandbox_runtime;
pub mod service_registry;

pub use artifact_reader::ExecArtifactSource;
pub use client::{ApiResponse, KubeApiClient};
pub use exec::KubectlExecutor;
pub use pod_manifest::PodManifestBuilder;
pub use sandbox_runtime::PodSandboxRuntime;
pub use service_registry::KubeServiceRegistry;

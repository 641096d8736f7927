pub mod clock;
pub mod kube;

pub use clock::TokioClock;
pub use kube::{
    ExecArtifactSource, KubeApiClient, KubeServiceRegistry, KubectlExecutor, PodSandboxRuntime,
};

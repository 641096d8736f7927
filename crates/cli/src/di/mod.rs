use dnsprobe_application::ports::{ArtifactSource, Clock, CommandExecutor, SandboxRuntime};
use dnsprobe_application::services::{ProbeScriptCompiler, TargetedProbeCompiler};
use dnsprobe_application::use_cases::{
    ManageServicesUseCase, RunAndValidateUseCase, VerifyDnsConfigUseCase,
};
use dnsprobe_domain::Config;
use dnsprobe_infrastructure::{
    ExecArtifactSource, KubeApiClient, KubeServiceRegistry, KubectlExecutor, PodSandboxRuntime,
    TokioClock,
};
use std::sync::Arc;
use tracing::info;

/// Compilers need no cluster access, so `compile` commands build only these.
pub struct Compilers {
    pub presence: ProbeScriptCompiler,
    pub targeted: TargetedProbeCompiler,
}

impl Compilers {
    pub fn new(config: &Config) -> Self {
        let results_dir = &config.sandbox.results_dir;
        Self {
            presence: ProbeScriptCompiler::new(&config.compiler, results_dir),
            targeted: TargetedProbeCompiler::new(&config.targeted, results_dir),
        }
    }
}

pub struct UseCases {
    pub run_and_validate: RunAndValidateUseCase,
    pub manage_services: ManageServicesUseCase,
    pub verify_dns_config: VerifyDnsConfigUseCase,
}

impl UseCases {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Arc::new(KubeApiClient::from_config(&config.cluster)?);
        info!(api_server = %client.base_url(), "Kubernetes API client initialized");

        let runtime: Arc<dyn SandboxRuntime> = Arc::new(PodSandboxRuntime::new(
            client.clone(),
            config.sandbox.clone(),
        ));
        let clock: Arc<dyn Clock> = Arc::new(TokioClock);
        let executor: Arc<dyn CommandExecutor> = Arc::new(
            KubectlExecutor::new(config.cluster.kubectl.clone())
                .with_server(Some(config.cluster.api_server.clone())),
        );
        let source: Arc<dyn ArtifactSource> = Arc::new(ExecArtifactSource::new(
            executor.clone(),
            config.sandbox.results_dir.clone(),
        ));

        Ok(Self {
            run_and_validate: RunAndValidateUseCase::new(
                runtime,
                source,
                clock.clone(),
                &config.poll,
                config.sandbox.start_timeout(),
            )
            .with_wait_for_expected(config.targeted.wait_for_expected),
            manage_services: ManageServicesUseCase::new(
                Arc::new(KubeServiceRegistry::new(client)),
                config.cluster.namespace.clone(),
            ),
            verify_dns_config: VerifyDnsConfigUseCase::new(executor, clock, &config.poll),
        })
    }
}

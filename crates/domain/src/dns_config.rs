use std::net::IpAddr;

/// Container to run commands in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecTarget {
    pub namespace: String,
    pub pod: String,
    pub container: String,
}

impl ExecTarget {
    pub fn new(
        namespace: impl Into<String>,
        pod: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            pod: pod.into(),
            container: container.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Injected name the pod's custom nameserver answers for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedLookup {
    /// Unqualified name; the search path must complete it.
    pub short_name: String,
    pub expected_ip: IpAddr,
}

/// What a pod with `dnsPolicy: None` and a custom `dnsConfig` must observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsConfigExpectation {
    pub search_path: String,
    pub nameserver: IpAddr,
    pub ndots: Option<u8>,
    pub lookup: Option<InjectedLookup>,
}

use dnsprobe_domain::config::CompilerConfig;
use dnsprobe_domain::{
    ExecutionVariant, HostAlias, LookupTransport, NameQuery, ProbeArtifact, ProbeBatch,
    ProbeContext, ProbeError, RecordType,
};
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;

/// Compiles name-resolution checks into one looping shell script.
///
/// Every check writes its artifact into the results directory once the lookup
/// succeeds. `$$` is how a literal `$` is written in a container command, so
/// the script is ready to be placed in a pod spec as-is.
pub struct ProbeScriptCompiler {
    transports: Vec<LookupTransport>,
    include_pod_a_record: bool,
    iterations: u32,
    results_dir: Arc<str>,
}

impl ProbeScriptCompiler {
    pub fn new(config: &CompilerConfig, results_dir: &str) -> Self {
        Self {
            transports: config.transports.clone(),
            include_pod_a_record: config.include_pod_a_record,
            iterations: config.iterations,
            results_dir: Arc::from(results_dir),
        }
    }

    /// Produces the script for `variant` and the artifacts it will write, in
    /// a deterministic order: names (per transport), host aliases, the pod's
    /// own A record, then the reverse lookup of `server_ip`.
    ///
    /// # Errors
    ///
    /// * `ProbeError::Compilation` - If a name, alias or IP is malformed, or
    ///   two checks would write the same artifact
    pub fn compile<S: AsRef<str>>(
        &self,
        ctx: &ProbeContext,
        names: &[S],
        host_entries: &[HostAlias],
        server_ip: Option<&str>,
        variant: &ExecutionVariant,
    ) -> Result<ProbeBatch, ProbeError> {
        let mut script = format!("for i in `seq 1 {}`; do ", self.iterations);
        let mut artifacts = Vec::new();

        for name in names {
            let query = NameQuery::parse(name.as_ref())?;
            let record_type = query.default_record_type();
            for &transport in &self.transports {
                let artifact =
                    ProbeArtifact::lookup(variant.as_str(), query.clone(), record_type, transport);
                script.push_str(&self.lookup_check(
                    transport,
                    query.as_str(),
                    record_type,
                    &artifact.id,
                ));
                artifacts.push(artifact);
            }
        }

        for entry in host_entries {
            entry.validate()?;
            let artifact = ProbeArtifact::host_alias(variant.as_str(), entry.clone());
            script.push_str(&format!(
                r#"hosts="$$(getent hosts {} | awk 'NR==1 {{print $$2}}')" && test -n "$$hosts" && echo "$$hosts" > {}/{};"#,
                entry.alias, self.results_dir, artifact.id
            ));
            artifacts.push(artifact);
        }

        if self.include_pod_a_record {
            script.push_str(&format!(
                r#"podARec=$$(hostname -i| awk -F. '{{print $$1"-"$$2"-"$$3"-"$$4".{}.pod.{}"}}');"#,
                ctx.namespace, ctx.cluster_domain
            ));
            for &transport in &self.transports {
                let artifact = ProbeArtifact::pod_a_record(variant.as_str(), transport);
                script.push_str(&self.lookup_check(
                    transport,
                    "$${podARec}",
                    RecordType::A,
                    &artifact.id,
                ));
                artifacts.push(artifact);
            }
        }

        if let Some(raw_ip) = server_ip {
            let ip: IpAddr = raw_ip.trim().parse().map_err(|_| {
                ProbeError::Compilation(format!("Server IP '{}' is not an IP address", raw_ip))
            })?;
            let ptr_name = reverse_lookup_name(ip);
            for &transport in &self.transports {
                let artifact = ProbeArtifact::reverse_lookup(variant.as_str(), ip, transport);
                script.push_str(&self.lookup_check(
                    transport,
                    &ptr_name,
                    RecordType::PTR,
                    &artifact.id,
                ));
                artifacts.push(artifact);
            }
        }

        script.push_str("sleep 1; done");

        ensure_unique(&artifacts)?;

        Ok(ProbeBatch {
            variant: variant.clone(),
            script,
            artifacts,
        })
    }

    fn lookup_check(
        &self,
        transport: LookupTransport,
        name: &str,
        record_type: RecordType,
        artifact_id: &str,
    ) -> String {
        format!(
            r#"check="$$(dig {} +noall +answer +search {} {})" && test -n "$$check" && echo OK > {}/{};"#,
            transport.dig_flag(),
            name,
            record_type,
            self.results_dir,
            artifact_id
        )
    }
}

/// `in-addr.arpa.` / `ip6.arpa.` name for a PTR lookup of `ip`.
pub fn reverse_lookup_name(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            format!("{}.{}.{}.{}.in-addr.arpa.", o[3], o[2], o[1], o[0])
        }
        IpAddr::V6(v6) => {
            let mut name = String::with_capacity(73);
            for byte in v6.octets().iter().rev() {
                name.push_str(&format!("{:x}.{:x}.", byte & 0x0f, byte >> 4));
            }
            name.push_str("ip6.arpa.");
            name
        }
    }
}

pub(crate) fn ensure_unique(artifacts: &[ProbeArtifact]) -> Result<(), ProbeError> {
    let mut seen = HashSet::with_capacity(artifacts.len());
    for artifact in artifacts {
        if !seen.insert(artifact.id.as_str()) {
            return Err(ProbeError::Compilation(format!(
                "Artifact '{}' would be written by more than one check",
                artifact.id
            )));
        }
    }
    Ok(())
}

pub mod poll_state;
pub mod probe_compiler;
pub mod result_poller;
pub mod targeted_compiler;
pub mod validator;

pub use poll_state::PollState;
pub use probe_compiler::{reverse_lookup_name, ProbeScriptCompiler};
pub use result_poller::ResultPoller;
pub use targeted_compiler::TargetedProbeCompiler;
pub use validator::{ProbeValidator, ValidationMode, ValidationReport};

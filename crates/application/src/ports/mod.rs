mod clock;
mod command_executor;
mod sandbox_runtime;
mod service_registry;

pub use clock::Clock;
pub use command_executor::CommandExecutor;
pub use sandbox_runtime::{ArtifactPayloads, ArtifactSource, SandboxRuntime};
pub use service_registry::ServiceRegistry;

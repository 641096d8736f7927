mod verify_dns_config;

pub use verify_dns_config::VerifyDnsConfigUseCase;

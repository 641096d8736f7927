mod manage_services;

pub use manage_services::ManageServicesUseCase;

use tracing::{info, warn};

use super::domain::{CompanyRef, ProjectScope, TenantRef};
use super::error::{PlatformError, ProviderError, ProviderOperation, StateError, ValidationError};
use super::provider::JobSearchProvider;

/// Tenant and company created for this platform instance.
///
/// Holds at most one of each. Registration order is enforced here; after
/// registration the refs are read-only and passed explicitly to job and
/// search calls.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    project: ProjectScope,
    tenant: Option<TenantRef>,
    company: Option<CompanyRef>,
}

impl EntityRegistry {
    pub fn new(project: ProjectScope) -> Self {
        Self {
            project,
            tenant: None,
            company: None,
        }
    }

    pub fn project(&self) -> &ProjectScope {
        &self.project
    }

    pub fn tenant(&self) -> Result<&TenantRef, StateError> {
        self.tenant.as_ref().ok_or(StateError::TenantNotRegistered)
    }

    pub fn company(&self) -> Result<&CompanyRef, StateError> {
        self.company.as_ref().ok_or(StateError::CompanyNotRegistered)
    }

    pub fn register_tenant<P>(
        &mut self,
        provider: &P,
        external_id: &str,
    ) -> Result<TenantRef, PlatformError>
    where
        P: JobSearchProvider + ?Sized,
    {
        let external_id = required("tenant external id", external_id)?;
        if self.tenant.is_some() {
            return Err(StateError::TenantAlreadyRegistered.into());
        }

        let provider_path = provider
            .create_tenant(&self.project, &external_id)
            .map_err(|source| {
                warn!(external_id = %external_id, error = %source, "tenant creation failed");
                ProviderError::new(ProviderOperation::CreateTenant, self.project.path(), source)
            })?;

        info!(tenant = %provider_path, "created tenant");
        let tenant = TenantRef {
            external_id,
            provider_path,
        };
        self.tenant = Some(tenant.clone());
        Ok(tenant)
    }

    pub fn register_company<P>(
        &mut self,
        provider: &P,
        display_name: &str,
        external_id: &str,
    ) -> Result<CompanyRef, PlatformError>
    where
        P: JobSearchProvider + ?Sized,
    {
        let tenant_path = self.tenant()?.provider_path.clone();
        if self.company.is_some() {
            return Err(StateError::CompanyAlreadyRegistered.into());
        }
        let display_name = required("company display name", display_name)?;
        let external_id = required("company external id", external_id)?;

        let provider_path = provider
            .create_company(&tenant_path, &display_name, &external_id)
            .map_err(|source| {
                warn!(tenant = %tenant_path, external_id = %external_id, error = %source, "company creation failed");
                ProviderError::new(ProviderOperation::CreateCompany, tenant_path.as_str(), source)
            })?;

        info!(company = %provider_path, "created company");
        let company = CompanyRef {
            display_name,
            external_id,
            provider_path,
            tenant_path,
        };
        self.company = Some(company.clone());
        Ok(company)
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField { field })
    } else {
        Ok(trimmed.to_string())
    }
}

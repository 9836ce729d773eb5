use anyhow::Context as _;
use tracing::debug;

use fitfusion_domain::id::OwnerId;
use fitfusion_domain::owner::OwnerRole;

use crate::domain::repository::StoreGateway;
use crate::domain::types::{Collection, OwnerRecord, ProfileRecord};
use crate::error::{CascadeServiceError, DenialReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Authorized { caller: OwnerId },
    Denied(DenialReason),
}

impl Authorization {
    pub fn into_result(self) -> Result<OwnerId, CascadeServiceError> {
        match self {
            Self::Authorized { caller } => Ok(caller),
            Self::Denied(reason) => Err(reason.into()),
        }
    }
}

/// Gates caller-requested operations. Performs reads only.
pub struct PermissionGuard<S: StoreGateway> {
    pub store: S,
}

impl<S: StoreGateway> PermissionGuard<S> {
    /// The caller must be authenticated and hold the trainer role.
    pub async fn authorize_trainer(
        &self,
        caller: Option<&OwnerId>,
    ) -> Result<Authorization, CascadeServiceError> {
        let Some(caller) = caller else {
            return Ok(Authorization::Denied(DenialReason::Unauthenticated));
        };
        let record = self
            .store
            .get_document(Collection::Users, caller.as_str())
            .await
            .context("read caller owner record")?;
        let role = record.and_then(|doc| OwnerRecord::from_fields(&doc.fields).role);
        if role != Some(OwnerRole::Trainer) {
            debug!(caller = %caller, ?role, "caller is not a trainer");
            return Ok(Authorization::Denied(DenialReason::NotATrainer));
        }
        Ok(Authorization::Authorized {
            caller: caller.clone(),
        })
    }

    /// The caller must be a trainer and the target's profile must name the
    /// caller as its trainer. A missing profile is denied the same way.
    pub async fn authorize_client_deletion(
        &self,
        caller: Option<&OwnerId>,
        target: &OwnerId,
    ) -> Result<Authorization, CascadeServiceError> {
        let caller = match self.authorize_trainer(caller).await? {
            Authorization::Authorized { caller } => caller,
            denied => return Ok(denied),
        };
        let profile = self
            .store
            .get_document(Collection::Clients, target.as_str())
            .await
            .context("read target client profile")?;
        let trainer_id = profile.and_then(|doc| ProfileRecord::from_document(&doc).trainer_id);
        if trainer_id.as_deref() != Some(caller.as_str()) {
            debug!(caller = %caller, target = %target, "client does not belong to caller");
            return Ok(Authorization::Denied(DenialReason::NotYourClient));
        }
        Ok(Authorization::Authorized { caller })
    }
}

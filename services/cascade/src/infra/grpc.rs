use tonic::Code;
use tonic::transport::Channel;

use fitfusion_domain::id::OwnerId;
use fitfusion_proto::identity::{
    DeleteCredentialRequest, identity_service_client::IdentityServiceClient,
};

use crate::domain::repository::IdentityGateway;
use crate::error::IdentityError;

/// gRPC client implementing `IdentityGateway` via `identity.IdentityService`.
#[derive(Clone)]
pub struct GrpcIdentityGateway {
    client: IdentityServiceClient<Channel>,
}

impl GrpcIdentityGateway {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: IdentityServiceClient::new(channel),
        }
    }
}

impl IdentityGateway for GrpcIdentityGateway {
    async fn delete_credential(&self, owner_id: &OwnerId) -> Result<(), IdentityError> {
        let result = self
            .client
            .clone()
            .delete_credential(DeleteCredentialRequest {
                owner_id: owner_id.to_string(),
            })
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(status) => status_to_error(status).map_or(Ok(()), Err),
        }
    }
}

/// `None` when the credential is already gone.
fn status_to_error(status: tonic::Status) -> Option<IdentityError> {
    match status.code() {
        Code::NotFound => None,
        Code::Unavailable | Code::DeadlineExceeded => {
            Some(IdentityError::Unavailable(status.message().to_owned()))
        }
        _ => Some(IdentityError::Rejected(format!(
            "{:?}: {}",
            status.code(),
            status.message()
        ))),
    }
}

use crate::domain::repository::{IdentityGateway, StoreGateway};
use crate::usecase::analytics::TrainerAnalyticsUseCase;
use crate::usecase::cascade::{DeleteClientUseCase, OwnerDeletedUseCase};
use crate::usecase::executor::CascadeExecutor;
use crate::usecase::guard::PermissionGuard;
use crate::usecase::planner::CascadePlanner;
use crate::usecase::sweeper::ExpirySweeper;

/// Shared application state passed to every handler via axum `State` and to
/// the gRPC server. Generic over the gateways so tests run against in-memory
/// fakes.
#[derive(Clone)]
pub struct AppState<S: StoreGateway, I: IdentityGateway> {
    pub store: S,
    pub identity: I,
    pub max_batch_ops: usize,
}

impl<S: StoreGateway, I: IdentityGateway> AppState<S, I> {
    pub fn planner(&self) -> CascadePlanner<S> {
        CascadePlanner {
            store: self.store.clone(),
            max_batch_ops: self.max_batch_ops,
        }
    }

    pub fn executor(&self) -> CascadeExecutor<S, I> {
        CascadeExecutor {
            store: self.store.clone(),
            identity: self.identity.clone(),
        }
    }

    pub fn guard(&self) -> PermissionGuard<S> {
        PermissionGuard {
            store: self.store.clone(),
        }
    }

    pub fn owner_deleted(&self) -> OwnerDeletedUseCase<S, I> {
        OwnerDeletedUseCase {
            planner: self.planner(),
            executor: self.executor(),
        }
    }

    pub fn delete_client(&self) -> DeleteClientUseCase<S, I> {
        DeleteClientUseCase {
            guard: self.guard(),
            planner: self.planner(),
            executor: self.executor(),
        }
    }

    pub fn sweeper(&self) -> ExpirySweeper<S, I> {
        ExpirySweeper {
            planner: self.planner(),
            executor: self.executor(),
        }
    }

    pub fn trainer_analytics(&self) -> TrainerAnalyticsUseCase<S> {
        TrainerAnalyticsUseCase {
            guard: self.guard(),
            store: self.store.clone(),
        }
    }
}

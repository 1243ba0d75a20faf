//! Shared world state for change request workflow BDD scenarios.

use std::sync::Arc;

use changeflow::access::adapters::memory::InMemoryMetaStore;
use changeflow::identity::domain::{
    AppUser, EmailAddress, PersistedUserData, Role, UserId, UserStatus,
};
use changeflow::workflow::{
    adapters::memory::InMemoryTaskStore,
    domain::ProjectTask,
    services::{WorkflowService, WorkflowServiceError},
};
use mockable::{Clock, DefaultClock};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestWorkflowService = WorkflowService<InMemoryTaskStore, InMemoryMetaStore, DefaultClock>;

/// Scenario world for workflow behaviour tests.
pub struct WorkflowWorld {
    pub service: TestWorkflowService,
    pub metas: InMemoryMetaStore,
    pub manager: AppUser,
    pub client: AppUser,
    pub task: Option<ProjectTask>,
    pub last_error: Option<WorkflowServiceError>,
}

impl WorkflowWorld {
    /// Creates a world with a manager, a client, and empty stores.
    #[must_use]
    pub fn new() -> Self {
        let metas = InMemoryMetaStore::new();
        let service = WorkflowService::new(
            Arc::new(InMemoryTaskStore::new()),
            Arc::new(metas.clone()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            metas,
            manager: approved_user("Ann", Role::Admin),
            client: approved_user("Carla", Role::Client),
            task: None,
            last_error: None,
        }
    }

    /// Returns the current scenario task.
    pub fn current_task(&self) -> Result<&ProjectTask, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for WorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> WorkflowWorld {
    WorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds an approved user for scenario casts.
fn approved_user(name: &str, role: Role) -> AppUser {
    let clock = DefaultClock;
    AppUser::from_persisted(PersistedUserData {
        id: UserId::new(),
        name: name.to_owned(),
        email: EmailAddress::new(format!("{}@example.com", name.to_ascii_lowercase()))
            .expect("valid scenario email"),
        role,
        status: UserStatus::Approved,
        created_at: clock.utc(),
        approved_by_user_id: None,
        approved_at: None,
        rejection_reason: None,
    })
}

//! Application services for workflow orchestration.

mod engine;

pub use engine::{
    EditTaskRequest, NewTaskRequest, TransitionRequest, UpdateHoursRequest, WorkflowService,
    WorkflowServiceError, WorkflowServiceResult,
};

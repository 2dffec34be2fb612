//! Domain model for task lifecycle management.

mod error;
mod filter;
mod ids;
mod priority;
mod status;
mod task;

pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use filter::{TaskFilter, TaskScope};
pub use ids::TaskId;
pub use priority::TaskPriority;
pub use status::TaskStatus;
pub use task::{NewTask, PersistedTaskData, Task, TaskChanges};

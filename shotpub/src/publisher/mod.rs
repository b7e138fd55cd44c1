//! Publish items, plugins and their orchestration.
//!
//! Collected items flow through a per-task state machine:
//!
//! ```text
//! Collected -> Accepted -> Validated -> Published -> Finalized
//! ```
//!
//! Plugins implement [`PublishPlugin`]; a [`PublishSession`] drives them and
//! reports the outcome of every task. Records are persisted through a
//! [`Registrar`].

mod error;
pub mod item;
pub mod plugin;
pub mod plugins;
pub mod registrar;
mod session;
mod task;

pub use error::{PublishError, PublishResult};
pub use item::{ItemId, ItemTree, PublishItem, PublishedFile};
pub use plugin::{
    filters_match, Acceptance, PublishEnv, PublishOutcome, PublishPlan, PublishPlugin,
};
pub use plugins::{
    default_plugins, CachePublisher, InPlaceFilePublisher, ReviewVersionPlugin, VersionUpPlugin,
    VersionedFilePublisher,
};
pub use registrar::{
    InMemoryRegistrar, LedgerRegistrar, PublishRecord, RecordHandle, Registrar, RegistrarError,
    ReviewVersion, StoredRecord, StoredReviewVersion,
};
pub use session::{PublishErrorPolicy, PublishReport, PublishSession, PublishTask, TaskReport};
pub use task::{TaskProgress, TaskState};

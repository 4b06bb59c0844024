//! Launcher Icons Library
//!
//! Per-item façade over the icon retrieval subsystem. Rendering code creates
//! one [`IconBinding`] per visible grid item and reads its reactive
//! [`IconState`]; the binding handles cache consultation, fetch scheduling,
//! visibility gating, and teardown.

mod binding;

pub use binding::{IconBinding, IconState, ICON_FETCH_PRIORITY};

// Re-export the subsystem types consumers need alongside the binding.
pub use launcher_icon_cache::{CacheStats, IconCache, IconKey, IconPayload};
pub use launcher_icon_scheduler::{
    FetchError, FetchScheduler, IconFetcher, ItemBounds, SchedulerConfig, SchedulerStats, Viewport,
};

//! CSS transition builder with positional containment.
//!
//! This crate provides:
//! - **Animation**: fluent builder that collects properties and transforms for
//!   one element and commits them as a single transition
//! - **Containment**: per-edge bounds that clamp pending `top`/`left`/`right`/`bottom`
//!   moves before they are applied
//! - **Host**: the seam to whatever renders the element (a browser binding,
//!   a native scene, or the in-memory [`HeadlessHost`])
//! - **Scheduler**: injectable one-shot timers driving completion
//!
//! # Architecture
//!
//! ```text
//! Animator (host + scheduler + defaults)
//!   └── Animation (shared handle)
//!         ├── PropertySet / TransitionProperties / TransformStack
//!         ├── ContainmentPolicy (runs on `start`)
//!         └── EventBus (`start`, `end`) -> chained animations
//! ```

pub mod animation;
pub mod animator;
pub mod completion;
pub mod containment;
pub mod easing;
pub mod error;
pub mod events;
pub mod headless;
pub mod host;
pub mod properties;
pub mod scheduler;
pub mod timing;
pub mod transform;

pub use animation::{Animation, Phase};
pub use animator::{Animator, Defaults};
pub use completion::Completion;
pub use containment::{
    AxisMetrics, Bound, Clamp, ContainmentPolicy, Edge, EdgeConstraint, Operator,
};
pub use easing::{EasingFunction, StepPosition};
pub use error::{GlideError, Result};
pub use events::{EventBus, LifecycleEvent, Listener};
pub use headless::{HeadlessHost, NodeId, StyleWrite};
pub use host::{Host, Measured, Rect, Size, Target};
pub use properties::{PropertySet, StyleValue, TransitionProperties, VENDOR_PREFIXES};
pub use scheduler::{Scheduler, Task, TaskId, VirtualScheduler};
pub use timing::TimeValue;
pub use transform::{TransformFunction, TransformStack};

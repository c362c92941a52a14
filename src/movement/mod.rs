/// Movement orders for ships
///
/// Order queue, the three order variants and the steering math that keeps a
/// directional move's translation and rotation in step.

pub mod agent;
pub mod events;
pub mod feedback;
pub mod order;
pub mod steering;
pub mod target;

pub use agent::{Agent, Kinematics, Motion, TickReport};
pub use events::{OrderEvent, OrderEventLog};
pub use feedback::{Arrow, Feedback, FeedbackSlot};
pub use order::{Order, OrderKind, OrderRequest, OrderState, SyncedSpeeds};
pub use target::{OrderTarget, PositionSnapshot, TargetLookup};

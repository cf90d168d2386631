// ABOUTME: Delivery pipeline turning polled batches into alerts and popups

pub mod center;
pub mod dedup;
pub mod priority;
pub mod queue;
pub mod sink;

pub use center::{DeliveryReport, NotificationCenter};
pub use dedup::{Deduplicator, Verdict};
pub use priority::{highest_priority, AlertGate, AlertPlan, Arbitration, PriorityArbitrator};
pub use queue::PresentationQueue;
pub use sink::{AlertSink, SilentSink, TerminalBell};

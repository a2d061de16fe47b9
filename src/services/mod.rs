pub mod aggregator;
pub mod armed_state;
pub mod baseline;
pub mod monitor;
pub mod notifier;
pub mod reporter;
pub mod view;

pub use aggregator::{categorize, Categorized};
pub use armed_state::{ArmedStateRecord, StateStore};
pub use baseline::DailyBaselineTracker;
pub use monitor::PositionMonitor;
pub use notifier::ThresholdNotifier;
pub use reporter::DailyReporter;
pub use view::LatestView;

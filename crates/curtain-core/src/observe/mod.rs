mod capabilities;
mod growth;
mod tracker;

pub use capabilities::Capabilities;
pub use growth::GrowthWatcher;
pub use tracker::ViewportTracker;

pub mod consent;
pub mod controller;
pub mod features;
pub mod filter;
pub mod isolation;
pub mod logging;
pub mod overlay;
pub mod page;
pub mod prefs;
pub mod report;
pub mod shortcut;
pub mod widget;

pub use consent::{ConsentDecision, ConsentRecord};
pub use features::FeatureValue;
pub use overlay::Surface;
pub use page::{HostPage, MemoryPage};
pub use shortcut::{Key, KeyEvent};
pub use widget::{init, Widget, WidgetConfig};

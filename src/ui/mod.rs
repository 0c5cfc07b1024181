pub mod locale;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod signals;

pub use locale::{Catalog, Language};
pub use output::{OutputFormatter, OutputMode};
pub use progress::ProgressManager;
pub use signals::GracefulShutdown;

pub mod payload_extractor;
pub mod target;

pub use payload_extractor::{
    ExtractionResult, ExtractionRun, PayloadExtractor, ProgressEvent, RunState,
};
pub use target::ExtractionTarget;

pub mod commands;
pub mod header;
pub mod json;
pub mod reader;
pub mod vlq;
pub mod writer;

pub use commands::{SmfEvent, TimedEvent};
pub use json::SmfJson;
pub use reader::{SmfHeader, SmfReader};
pub use writer::SmfWriter;

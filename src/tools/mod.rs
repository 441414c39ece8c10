pub mod search;

pub use search::{SearchOutcome, SearchPhotosInput, SearchTool, TOOL_NAME};

pub mod codec;
pub mod content;
pub mod content_part;
pub mod event;

pub use content::{Content, Role};
pub use content_part::{ContentPart, Data, DataSource, FunctionCall, FunctionResponse};
pub use event::ExecutionEvent;

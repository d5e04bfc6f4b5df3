//! Runtime sessions and their resolution from A2A context identifiers.

pub mod in_memory_session_service;
pub mod resolver;
pub mod session;
pub mod session_service;

pub use in_memory_session_service::InMemorySessionService;
pub use resolver::SessionResolver;
pub use session::Session;
pub use session_service::SessionService;

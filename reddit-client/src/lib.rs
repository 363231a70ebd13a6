pub mod api;
pub mod endpoint;
pub mod models;
pub mod paginator;
pub mod poller;
pub mod query;
pub mod registry;
pub mod session;
pub mod transport;

#[cfg(test)]
mod tests;

pub use api::{RedditClient, Sort, TimeRange};
pub use endpoint::{Endpoint, Host};
pub use models::*;
pub use paginator::{Direction, Paginator};
pub use poller::Poller;
pub use query::Query;
pub use registry::{Listener, ListenerRegistry, PollTarget};
pub use session::{Session, SessionState, SessionToken};
pub use transport::{RawRequest, RawResponse, ReqwestTransport, Transport};

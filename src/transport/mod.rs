//! WebSocket transport between the scraper and the extension.
//!
//! ```text
//! PendingServer::bind ──► Firefox starts ──► PendingServer::accept
//!                                                 │
//!                                       (Connection, ReadyData)
//! ```

pub mod connection;
pub mod server;

pub use connection::{Connection, EventHandler, ReadyData};
pub use server::PendingServer;

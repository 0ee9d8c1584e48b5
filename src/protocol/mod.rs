//! Messages exchanged with the browser extension.
//!
//! | Message | Direction | Purpose |
//! |---------|-----------|---------|
//! | [`Request`] | scraper → extension | Command for one tab/frame |
//! | [`Response`] | extension → scraper | Result or error, matched by id |
//! | [`Event`] | extension → scraper | Unsolicited notification |
//!
//! Methods are named `module.methodName`, e.g. `element.subscribe`.

pub mod command;
pub mod event;
pub mod request;

pub use command::{
    BrowsingContextCommand, Command, ElementCommand, InputCommand, ProxyCommand, ScriptCommand,
};
pub use event::{Event, ParsedEvent};
pub use request::{Request, Response, ResponseType};

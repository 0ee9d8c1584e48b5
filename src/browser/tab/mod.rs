//! Browser tab.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Tab handle and command routing |
//! | `navigation` | Navigate, URL, page source, close |
//! | `elements` | Immediate lookup and waiting for elements |
//! | `script` | Script evaluation |

mod core;
mod elements;
mod navigation;
mod script;

pub use core::Tab;

//! Session layer: an explicit context value object and the handlers the
//! UI driver calls.
//!
//! Every handler consumes a [`SessionContext`] snapshot plus the store and
//! assistant client, and returns a new snapshot. There is no ambient
//! mutable session state; the driver owns exactly one context at a time
//! and renders from it.

pub mod context;
pub mod handlers;
pub mod title;

pub use context::SessionContext;
pub use handlers::{
    delete_chat, init_session, new_chat, select_chat, send_prompt, upload_file,
};
pub use title::derive_title;

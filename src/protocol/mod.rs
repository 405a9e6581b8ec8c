//! Protocol Module
//!
//! Defines the line-oriented wire protocol for client-server communication.
//!
//! ## Request Format
//! ```text
//! <token> [<token> ...] \r\n
//! ```
//! Tokens are separated by spaces/tabs and may be bare, `"double quoted"`
//! (with `\n \r \t \b \a \\ \" \xHH` escapes) or `'single quoted'` (only
//! `\'` is special).
//!
//! ## Response Format
//! ```text
//! <value bytes | decimal status> \r\n
//! ```
//!
//! ### Status Codes
//! - `0`:  OK
//! - `-1`: ERROR (unknown command, bad quoting, missing key, full store)

mod escape;
mod frame;
mod reply;
mod tokenizer;

pub use escape::{encode_request, escape};
pub use frame::{is_complete_frame, FrameReader, TERMINATOR};
pub use reply::Reply;
pub use tokenizer::split_args;

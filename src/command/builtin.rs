//! Built-in commands
//!
//! Argument counts are checked by the dispatcher before these run.

use bytes::Bytes;

use crate::buffer::Buffer;
use crate::error::{HashbaseError, Result};
use crate::protocol::Reply;
use crate::store::KeyValueStore;

/// `inf`: server banner
pub(super) fn inf(_args: &[Buffer], _store: &dyn KeyValueStore) -> Result<Reply> {
    Ok(Reply::Text(format!("hashbase {}", crate::VERSION)))
}

/// `set <key> <value>`
pub(super) fn set(args: &[Buffer], store: &dyn KeyValueStore) -> Result<Reply> {
    store.put(&args[0], Bytes::copy_from_slice(&args[1]))?;
    Ok(Reply::OK)
}

/// `get <key>`
pub(super) fn get(args: &[Buffer], store: &dyn KeyValueStore) -> Result<Reply> {
    match store.get(&args[0]) {
        Ok(value) => Ok(Reply::Value(value)),
        Err(HashbaseError::KeyNotFound) => Ok(Reply::ERR),
        Err(e) => Err(e),
    }
}

/// `del <key>`: succeeds whether or not the key existed
pub(super) fn del(args: &[Buffer], store: &dyn KeyValueStore) -> Result<Reply> {
    match store.remove(&args[0]) {
        Ok(()) | Err(HashbaseError::KeyNotFound) => Ok(Reply::OK),
        Err(e) => Err(e),
    }
}

/// `len`: number of stored keys
pub(super) fn len(_args: &[Buffer], store: &dyn KeyValueStore) -> Result<Reply> {
    Ok(Reply::integer(store.len() as i64))
}

/// `clr`: drop every key
pub(super) fn clr(_args: &[Buffer], store: &dyn KeyValueStore) -> Result<Reply> {
    store.clear();
    Ok(Reply::OK)
}

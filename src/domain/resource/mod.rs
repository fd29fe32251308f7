//! Resource engine - a REST surface derived from one JSON document
//!
//! Top-level keys of the document are resources. Arrays are collections
//! whose object elements are addressed by the string form of their `id`
//! field; objects and scalars are singletons. Every operation here is
//! pure: callers load the document, apply an operation, then persist the
//! whole value again.

mod engine;
mod routes;

pub use engine::{
    create_item, delete_item, get_item, get_resource, item_id, merge_item, merge_resource,
    replace_item, replace_resource,
};
pub use routes::{discover_routes, Route};

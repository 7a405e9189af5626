//! HTTP transport for the census record manager.
//!
//! Thin request-handling layer: decode the JSON payload, run it through the
//! validation engine, and forward accepted records to the person store. A
//! rejected candidate is answered with the complete field-tagged error list
//! so a client can render every problem at once.

mod routes;
mod server;

pub use routes::{
    ApiError, PersonsState, create_person, delete_person, get_person, list_persons, person_routes,
    update_person,
};
pub use server::{build_router, serve};

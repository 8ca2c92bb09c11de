//! # Student Marks
//!
//! Browser front-end for a student-records service. A user signs in through an
//! external identity provider, then lists, adds, edits and deletes students
//! (name, email, marks) against a remote backend.
//!
//! The crate is split the way the page is driven:
//!
//! - [`features::session`] owns the authentication client and the signed-in
//!   session.
//! - [`features::transport`] binds the caller's identity to the backend handle
//!   used for every remote call.
//! - [`features::records`] talks to the backend and keeps the local student list.
//! - [`features::view`] decides which of the list, the add form or the edit form
//!   is showing and turns user actions into controller calls.
//!
//! Everything above compiles natively and is tested without a browser. The
//! Leptos user interface (`app`, `routes`, `components`) only exists on
//! `wasm32`, and the `marks-dev` harness (`cli`, `dev`) only exists off it.

#[path = "lib/mod.rs"]
pub mod app_lib;
pub mod features;

#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
mod components;
#[cfg(target_arch = "wasm32")]
mod routes;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod dev;

#[cfg(test)]
mod test_support;

//! # userdesk-server
//!
//! A user-record backend speaking newline-delimited JSON-RPC 2.0 over stdio.
//!
//! It offers two tools (`create-user`, `create-random-user`), three resources
//! (`users://all`, `users://{userId}/profile` and the raw `users.json` file
//! under the data directory) and one prompt (`generate-fake-user`).

pub mod config;
pub mod errors;
pub mod prompts;
pub mod protocol;
pub mod randomuser;
pub mod resources;
pub mod service;
pub mod store;
pub mod tools;
pub mod transport;

pub use config::ServerSettings;
pub use errors::{RequestError, StoreError, TransportError};
pub use service::UserDeskService;
pub use store::{NewUser, User, UserStore};
pub use transport::serve;

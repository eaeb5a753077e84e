//! HTTP front end for the Domain Intel lookups.
//!
//! 只有一个业务接口 `POST /api/lookup`，外加 `GET /api/health`。

pub mod config;
pub mod error;
pub mod logging;
pub mod request;
pub mod routes;
pub mod server;

pub use config::AppConfig;
pub use server::AppState;

//! Transport: the reqwest-backed [`HttpGateway`](scout_application::HttpGateway).

mod gateway;

pub use gateway::{GatewayError, MAX_BODY_SIZE, ReqwestGateway};

//! api：与DSB服务器对接的部分

/// HTTP transport and the reqwest based client
pub mod client;

/// Walk the menu tree to find document references
pub mod menu;

/// Build the auth request and its envelope
pub mod request;

/// Decode and decompress the server response
pub mod response;

/// The fixed data endpoint
pub const DATA_URL: &str = "https://app.dsbcontrol.de/JsonHandler.ashx/GetData";

//! 网络传输实现

pub mod recording;
pub mod reqwest_transport;

pub use recording::RecordingTransport;
pub use reqwest_transport::ReqwestTransport;

//! 请求执行器实现

pub mod data;
pub mod invoker;
pub mod rest;
pub mod soap;

pub use data::DataExecutor;
pub use invoker::HttpInvoker;
pub use rest::RestExecutor;
pub use soap::SoapExecutor;

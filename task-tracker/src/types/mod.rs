pub mod datetime;
pub mod response;
pub mod service_result;

pub use response::{EnvelopeError, ErrorEnvelope, SuccessEnvelope};
pub use service_result::{ServiceProcess, ServiceResult};

mod error;
mod record_sink;
mod sensor_record;
mod uplink_event;
mod uplink_service;

pub use error::*;
pub use record_sink::*;
pub use sensor_record::*;
pub use uplink_event::*;
pub use uplink_service::*;

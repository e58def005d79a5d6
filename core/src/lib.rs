pub mod config;
pub mod errors;
pub mod greeting;
pub mod telemetry;

pub use config::{GreeterConfig, GreetingDefaults};
pub use errors::{GreeterError, Result};
pub use greeting::{GreetingEvent, GreetingResponse, greet};

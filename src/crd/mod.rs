//! Resource kinds validated by the admission policies.
//!
//! - `Trigger`: event subscription on a RabbitMQ-backed broker
//! - `RabbitmqSource`: adapter consuming a RabbitMQ exchange into a sink

mod duck;
mod rabbitmq_source;
mod trigger;

pub use duck::*;
pub use rabbitmq_source::*;
pub use trigger::*;

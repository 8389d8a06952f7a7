// Domain layer modules
pub mod decoded_payload;
pub mod inbound_event;
pub mod outbound_result;

// Re-exports
pub use decoded_payload::{DecodeError, DecodedPayload, PayloadDecoder};
pub use inbound_event::InboundEvent;
pub use outbound_result::{ErrorBody, HandlerMessage, OutboundResult};

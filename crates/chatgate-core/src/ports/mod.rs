//! Port definitions (interfaces to the outside world).

mod completion;

pub use completion::{CompletionTransport, TransportError, WireResponse};

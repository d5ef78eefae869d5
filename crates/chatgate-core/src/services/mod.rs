//! Services built on the domain types and ports.

mod completion;

pub use completion::{
    COMPLETIONS_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, complete,
};

//! Backend-specific adapters behind the [`ChatProvider`](crate::ChatProvider) trait.

pub mod anthropic;
pub mod openai;

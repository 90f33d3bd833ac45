//! Conversation messages
//!
//! An ordered sequence of [`entities::Message`]s is the conversational
//! context every provider invocation receives. Order is significant.

pub mod entities;

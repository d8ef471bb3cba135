//! Language-model basket generation for the Basket Terminal
//!
//! One chat-completion exchange proposes candidate legs for a user-stated
//! trend; the reply is untrusted input and goes through the same validation
//! any theme does before it reaches the pricing engine.

pub mod generator;

pub use generator::BasketGenerator;

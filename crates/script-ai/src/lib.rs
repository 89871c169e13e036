//! Vidprompt Script Intelligence
//!
//! The scene-suggestion boundary between the editor and a generative
//! scriptwriting model:
//! - **Generator contract:** the [`SceneGenerator`] trait and request
//!   validation
//! - **Prompt assembly:** building the instruction text sent to the model
//! - **Payload validation:** strict checking of the model's JSON response
//!   before anything reaches the scene store

pub mod generator;
pub mod payload;
pub mod prompt;

pub use generator::*;
pub use payload::*;
pub use prompt::*;

pub mod engine;
mod prompts;

pub use engine::DialogueEngine;

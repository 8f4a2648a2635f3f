// Cover letter generation pipeline.
// Implements: input normalization, prompt compilation, generation, output parsing.
// All model calls go through llm_client; no direct provider calls here.

pub mod compiler;
pub mod extractor;
pub mod generator;
pub mod handlers;
pub mod normalizer;
pub mod parser;
pub mod prompts;
pub mod tone;

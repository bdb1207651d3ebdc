// Report generation: prompt construction, one text-generation call, cleanup.
// All chat-completion calls go through llm_client via the ReportWriter trait.

pub mod generator;
pub mod handlers;
pub mod prompts;

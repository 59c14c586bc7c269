//! Prompt composition for the downstream language model.
//!
//! Pure string templating: retrieved chunks, live editor code, and the
//! user's instruction are merged into the fixed templates the model is
//! prompted with. No I/O, no state.

use crate::models::ScoredChunk;

/// Substituted for the context section when nothing has been indexed, so
/// the model sees an explicit statement instead of an empty section it
/// could misread as "no relevant code exists".
pub const NO_CONTEXT_PLACEHOLDER: &str = "No project files indexed yet.";

/// Separator between retrieved chunks in the context section.
const CHUNK_SEPARATOR: &str = "\n---\n";

/// Compose the question-answering prompt from retrieved context, the live
/// editor content, and the user's question.
pub fn compose_query_prompt(retrieved: &[ScoredChunk], live_code: &str, question: &str) -> String {
    let context = if retrieved.is_empty() {
        NO_CONTEXT_PLACEHOLDER.to_string()
    } else {
        retrieved
            .iter()
            .map(|chunk| format!("File: {}\nContent: {}", chunk.source_file, chunk.text))
            .collect::<Vec<_>>()
            .join(CHUNK_SEPARATOR)
    };

    format!(
        "You are SourceMind AI, a specialized coding assistant.\n\
         Use the context below from the user's project to answer.\n\
         \n\
         PROJECT CONTEXT:\n\
         {context}\n\
         \n\
         CURRENT EDITOR CODE:\n\
         {live_code}\n\
         \n\
         USER QUESTION:\n\
         {question}\n"
    )
}

/// Compose the inline-edit prompt from an instruction, the selected code,
/// and the surrounding file for reference.
pub fn compose_edit_prompt(instruction: &str, selected_code: &str, file_context: &str) -> String {
    format!(
        "You are an expert refactoring engine.\n\
         INSTRUCTION: {instruction}\n\
         \n\
         ORIGINAL CODE TO MODIFY:\n\
         ```\n\
         {selected_code}\n\
         ```\n\
         \n\
         FILE CONTEXT FOR REFERENCE:\n\
         {file_context}\n\
         \n\
         TASK: Rewrite the ORIGINAL CODE TO MODIFY based on the instruction.\n\
         CRITICAL: Output ONLY the new code. No explanations, no markdown backticks, no preamble.\n"
    )
}

//! Keyword prompt classifier used by the simulated gateway.
//!
//! This is a placeholder, not a router: it only decides which label the
//! simulated gateway reports as the model that answered.

/// Pick a simulated model label from keywords in the prompt.
///
/// Checks are case-insensitive substring matches, evaluated in order.
#[must_use]
pub fn classify_prompt(prompt: &str) -> &'static str {
    let prompt = prompt.to_lowercase();
    if prompt.contains("image") || prompt.contains("draw") {
        "Image Generation (Simulated)"
    } else if prompt.contains("code") || prompt.contains("function") {
        "DeepSeek (Simulated)"
    } else if prompt.contains("why") || prompt.contains("analyze") {
        "GPT-4o (Simulated)"
    } else {
        "Mistral (Simulated)"
    }
}

//! Fixed prompt text used by the core.

use crate::model::MAX_MESSAGE_CHARS;

/// Acknowledgment appended locally after a document session is seeded.
pub const SEED_ACKNOWLEDGMENT: &str =
    "I've reviewed the document you shared. What would you like to know about it?";

/// Default title for seeded sessions.
pub const SEED_DOCUMENT_TITLE: &str = "Document Q&A";

/// Prompt submitted as the single backend turn of a seeded session.
pub const SEED_PROMPT_TEMPLATE: &str = "The following text was extracted from a legal document I want to discuss:

---
{{DOCUMENT}}
---

Please acknowledge that you have received this document. I will ask questions about it next.";

const TRUNCATION_MARKER: &str = "\n[…document truncated…]";

/// Builds the seeding prompt, truncating the document so the whole prompt
/// stays within the backend's message limit.
pub fn build_seed_prompt(document: &str) -> String {
    let overhead = SEED_PROMPT_TEMPLATE.chars().count() - "{{DOCUMENT}}".chars().count();
    let budget = MAX_MESSAGE_CHARS.saturating_sub(overhead);
    let document = document.trim();

    let body = if document.chars().count() > budget {
        let keep = budget.saturating_sub(TRUNCATION_MARKER.chars().count());
        let mut truncated: String = document.chars().take(keep).collect();
        truncated.push_str(TRUNCATION_MARKER);
        truncated
    } else {
        document.to_string()
    };

    SEED_PROMPT_TEMPLATE.replace("{{DOCUMENT}}", &body)
}

//! All prompt constants for the Expansion Controller's generative calls.

/// System instruction for code expansion.
pub const EXPANSION_SYSTEM: &str = "You are an expert polyglot programmer, proficient in \
    multiple programming languages. \
    Your task is to expand a codebase for documentation purposes by generating high-quality, \
    realistic source code. \
    You must follow all constraints precisely. You must generate a large volume of code.";

/// User instruction template.
/// Replace `{lines_to_generate}` and `{context_code}` before sending.
pub const EXPANSION_PROMPT_TEMPLATE: &str = r#"**Context:**
The existing code is a mix of web technologies. Your task is to generate new, self-contained code modules that would complement a project of this nature.

**Constraints:**
1. **Primary Goal - Quantity:** Your most important task is to generate a large volume of code. You MUST generate **at least {lines_to_generate}** new lines of source code. Do not stop early.
2. **Language Choice:** You can generate code in any of the following languages: Python, Java, C, C++, C#, PHP. Choose a language and stick to it for the generated block.
3. **Code Content:** The generated code must be different from previous generations and the provided context. Create new, unique functionality.
4. **Style:** The code must be well-formatted, include comments where appropriate, and look professional.
5. **CRITICAL: Only output the raw, new source code.** Do not include any explanations or markdown formatting.

**Example of Existing Code (for style reference only):**
---
{context_code}
---
**New Source Code (in Python, Java, C, C++, C#, or PHP):**"#;

/// Builds the user instruction for one generation attempt.
pub fn build_expansion_prompt(lines_to_generate: usize, context_code: &str) -> String {
    EXPANSION_PROMPT_TEMPLATE
        .replace("{lines_to_generate}", &lines_to_generate.to_string())
        .replace("{context_code}", context_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_quantity_and_context() {
        let prompt = build_expansion_prompt(1234, "let a = 1;");
        assert!(prompt.contains("at least 1234"), "prompt should carry the line quantity");
        assert!(prompt.contains("let a = 1;"), "prompt should carry the context sample");
    }

    #[test]
    fn test_prompt_forbids_prose() {
        let prompt = build_expansion_prompt(10, "");
        assert!(prompt.contains("Only output the raw, new source code"));
    }
}

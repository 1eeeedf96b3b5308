const SUGGESTION_INSTRUCTIONS: &str = "\
Analyze the following Python code for errors, inefficiencies, and improvements.
Provide a corrected version with explanations.";

/// Build the prompt asking for fixes and improvements to `code`.
///
/// The source is embedded verbatim in a fenced `python` block.
///
/// # Examples
///
/// ```
/// use codemedic_review::prompt::build_suggestion_prompt;
///
/// let prompt = build_suggestion_prompt("print('hi')");
/// assert!(prompt.contains("```python\nprint('hi')\n```"));
/// assert!(prompt.contains("corrected version"));
/// ```
pub fn build_suggestion_prompt(code: &str) -> String {
    format!("\n{SUGGESTION_INSTRUCTIONS}\n\n```python\n{code}\n```")
}

/*!
 * Prompt templates for transcript cleanup.
 *
 * The semantic cleanup itself is delegated to the model; these templates
 * only define the contract: numbered statement markers in, the same
 * markers back out.
 */

/// Prompt template for the cleanup request
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string
    template: String,
}

impl PromptTemplate {
    /// The default system prompt for transcript cleanup.
    pub const TRANSCRIPT_EDITOR: &'static str = "\
You are an expert transcript editor. You clean up raw meeting transcripts \
while preserving the speaker's meaning, tone and all factual content. You \
never summarize, never reorder statements and never merge statements \
together. You return the cleaned statements using exactly the same markers \
the input used.";

    /// The default per-request cleaning instructions.
    pub const CLEANING_INSTRUCTIONS: &'static str = "\
Clean up the following meeting transcript statements:
- Remove filler words (um, uh, you know, like, sort of, I mean)
- Remove false starts and repeated words
- Fix obvious grammar mistakes without changing the wording style
- Keep every fact, name and number exactly as spoken
- Keep each statement separate and in order
- Reply with each statement under its original [STATEMENT N] marker
- Do not add commentary, headers or anything outside the markers
- If a statement contains no content worth keeping, leave its marker empty";

    /// Create a new prompt template
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// The default system prompt template
    pub fn transcript_editor() -> Self {
        Self::new(Self::TRANSCRIPT_EDITOR)
    }

    /// The default cleaning instructions template
    pub fn cleaning_instructions() -> Self {
        Self::new(Self::CLEANING_INSTRUCTIONS)
    }

    /// The rendered template text
    pub fn render(&self) -> &str {
        &self.template
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::transcript_editor()
    }
}

//! LLM prompt templates for map-phase extraction

use crate::config::ExtractionType;
use synapse_domain::SourceKind;

const FILENAME_PLACEHOLDER: &str = "{source_name}";
const TEXT_PLACEHOLDER: &str = "{source_text}";

/// Reply the person-profiles prompt asks for when nobody stands out
pub const NO_KEY_PERSONS: &str = "No key persons identified in this transcript.";

/// System instructions plus a user-message template for one extraction function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    /// System instructions sent with every call
    pub system: &'static str,
    user: &'static str,
    nothing_found: Option<&'static str>,
}

impl PromptTemplate {
    /// Template for an extraction type and source kind
    pub fn for_kind(extraction_type: ExtractionType, kind: SourceKind) -> Self {
        match (extraction_type, kind) {
            (ExtractionType::Newsletter, SourceKind::Meeting) => Self {
                system: NEWSLETTER_MEETING_SYSTEM,
                user: NEWSLETTER_MEETING_USER,
                nothing_found: None,
            },
            (ExtractionType::Newsletter, SourceKind::Chat) => Self {
                system: NEWSLETTER_CHAT_SYSTEM,
                user: NEWSLETTER_CHAT_USER,
                nothing_found: None,
            },
            (ExtractionType::PersonProfiles, _) => Self {
                system: PERSON_PROFILES_SYSTEM,
                user: PERSON_PROFILES_USER,
                nothing_found: Some(NO_KEY_PERSONS),
            },
        }
    }

    /// Whether a reply is the template's "nothing to report" answer
    pub fn is_nothing_found(&self, reply: &str) -> bool {
        self.nothing_found.is_some_and(|marker| reply.trim() == marker)
    }

    /// Render the user message for one document
    pub fn render(&self, source_name: &str, text: &str) -> String {
        // Substitute the name first so a transcript containing the literal
        // placeholder text is left untouched.
        self.user
            .replace(FILENAME_PLACEHOLDER, source_name)
            .replacen(TEXT_PLACEHOLDER, text, 1)
    }
}

const NEWSLETTER_MEETING_SYSTEM: &str = r#"You analyse meeting transcripts and pull out what belongs in a weekly team newsletter.
Look for decisions and their consequences, project progress, technical insights, blockers, action items, and memorable moments.
Write for colleagues who missed the meeting. Be concise and concrete."#;

const NEWSLETTER_MEETING_USER: &str = r#"Extract newsletter material from this meeting transcript.

Meeting: {source_name}

<transcript>
{source_text}
</transcript>

Answer in markdown with these sections (write "None identified" when a section is empty):

## Key Decisions & Outcomes
## Project Updates
## Technical Discussions
## Challenges & Blockers
## Action Items
## Notable Moments"#;

const NEWSLETTER_CHAT_SYSTEM: &str = r#"You analyse team chat logs and pull out what belongs in a weekly team newsletter.
Look for announcements, technical problem solving, questions with their answers, shared resources, and community highlights.
Skip small talk. Write for colleagues who missed the conversation."#;

const NEWSLETTER_CHAT_USER: &str = r#"Extract newsletter material from this chat log.

Source: {source_name}

<transcript>
{source_text}
</transcript>

Answer in markdown with these sections (write "None identified" when a section is empty):

## Announcements & Updates
## Technical Discussions
## Resources Shared
## Questions & Answers
## Community Highlights"#;

const PERSON_PROFILES_SYSTEM: &str = r#"You identify the key people in a conversation and describe what the conversation reveals about them.
Record each name variation you see, the person's likely role, and the topics they drove or were involved in."#;

const PERSON_PROFILES_USER: &str = r#"Identify the key people in this transcript.

Source: {source_name}

<transcript>
{source_text}
</transcript>

For each person write a markdown section:

## <Name>
- Aliases: <other names used>
- Role: <inferred role>
- Topics: <topics they discussed>
- Notes: <what this transcript says about them, citing {source_name}>

If nobody in the transcript stands out, reply with exactly:
No key persons identified in this transcript."#;

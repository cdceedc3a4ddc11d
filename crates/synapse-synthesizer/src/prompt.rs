//! Reduce prompts

const INPUT_PLACEHOLDER: &str = "{extracted_content}";

pub(crate) const NEWSLETTER_SYSTEM: &str = r#"You edit a weekly team newsletter. You receive notes extracted from the week's meetings and chats and turn them into one engaging, well-organised issue.
Lead with what matters most to the whole team, keep it scannable, and aim for a five to ten minute read."#;

const NEWSLETTER_USER: &str = r###"Write this week's newsletter from the extracted notes below. Each block starts with a "## Source:" line naming the file it came from; cite sources where useful.

<extracted_content>
{extracted_content}
</extracted_content>

Use this structure:

# Weekly Team Newsletter
## The Week's Highlights
## Progress & Momentum
## Interesting Discussions
## Heads Up
## The Human Side
## Resources to Check Out

Keep every section short and use bullet points."###;

pub(crate) const PROFILES_SYSTEM: &str = r#"You consolidate notes about people gathered from many transcripts into one profile per person.
Merge name variations that clearly refer to the same person. Never invent facts that are not in the notes."#;

const PROFILES_USER: &str = r###"Build one profile per person from the notes below. Each block starts with a "## Source:" line naming the transcript it came from.

<extracted_content>
{extracted_content}
</extracted_content>

Respond with a JSON array only, no additional text:
[
  {
    "metadata": {
      "name": "canonical name",
      "aliases": ["other names used"],
      "role": "inferred role",
      "mentioned_in_sources": ["source file names"],
      "topics": ["key topics"]
    },
    "content": "full markdown profile"
  }
]"###;

pub(crate) fn newsletter_prompt(input: &str) -> String {
    NEWSLETTER_USER.replacen(INPUT_PLACEHOLDER, input, 1)
}

pub(crate) fn profiles_prompt(input: &str) -> String {
    PROFILES_USER.replacen(INPUT_PLACEHOLDER, input, 1)
}

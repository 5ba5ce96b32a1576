// User-message templates and expected output shapes for the generation stages.
// System prompts live in the prompt store; see llm_client::prompts for their names.

/// Substitutes `{key}` placeholders in a single left-to-right pass over the
/// template. Values are copied as-is and never scanned, so stage output that
/// happens to contain `{resume}` or `{alignment}` reaches the model verbatim.
/// Braces that do not name a known key are left untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let hit = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match hit {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Validator user message. Placeholders: `{response}`, `{expected_shape}`.
pub const VALIDATION_REQUEST_TEMPLATE: &str = r#"Please validate this response:

Response to validate:
{response}

Expected format (if any):
{expected_shape}

Is this a valid, helpful response? Reply with exactly VALID or INVALID."#;

/// Profile extraction. Placeholders: `{resume}`, `{letters}`, `{preferences}`.
pub const PROFILE_REQUEST_TEMPLATE: &str = r#"Please analyze the following information and provide a candidate profile:

Resume:
{resume}

Previous Cover Letters:
{letters}
{preferences}"#;

pub const PROFILE_SHAPE: &str = r#"# Professional Profile
[Profile content]

# Key Qualifications
* [Qualifications]

# Experience Highlights
* [Highlights]

# Education & Certifications
* [Education details]"#;

/// Job analysis. Placeholder: `{job_description}`.
pub const JOB_ANALYSIS_REQUEST_TEMPLATE: &str = r#"Please analyze the following job description:

{job_description}"#;

pub const JOB_ANALYSIS_SHAPE: &str = r#"# Core Requirements
* [Requirements]

# Preferred Qualifications
* [Qualifications]

# Key Responsibilities
* [Responsibilities]"#;

/// Alignment. Placeholders: `{profile}`, `{job_analysis}`.
pub const ALIGNMENT_REQUEST_TEMPLATE: &str = r#"Please analyze how well the candidate matches the job requirements:

Candidate Profile:
{profile}

Job Analysis:
{job_analysis}"#;

pub const ALIGNMENT_SHAPE: &str = r#"# Key Matches
* [Matches]

# Areas to Address
* [Areas]

# Recommended Focus Points
* [Points]"#;

/// Drafting. Sent as a single user turn with no system prompt.
/// Placeholders: `{alignment}`, `{sample_letter}`.
pub const DRAFT_REQUEST_TEMPLATE: &str = r#"You are a skilled professional writer. Generate a compelling, natural-sounding cover letter (about 300 words) that:
1. Uses the sample letter as a style guide for tone and format
2. Focuses on the key points identified in the alignment analysis
3. Tells a coherent story about why the candidate is an excellent fit
4. Addresses any potential concerns identified
5. Maintains a confident but humble tone

Alignment Analysis:
{alignment}

Sample Letter for Style:
{sample_letter}"#;

pub const DRAFT_SHAPE: &str =
    "[Professional letter format with clear paragraphs and standard business letter structure]";

/// Biography merge. Placeholders: `{new_content}`, `{current_content}`, `{notes}`, `{instruction}`.
pub const BIOGRAPHY_REQUEST_TEMPLATE: &str = r#"Please process this biographical information update:

New Content:
{new_content}

Current Content:
{current_content}

Notes:
{notes}

Please create a comprehensive, well-organized biography that:
1. {instruction}
2. Maintains a professional and consistent tone
3. Organizes information logically by topic/chronology
4. Preserves specific details, achievements, and metrics
5. Removes any redundant information
6. Formats the text in Markdown for readability"#;

pub const BIOGRAPHY_REPLACE_INSTRUCTION: &str =
    "Replaces the existing content entirely with information from the new content";
pub const BIOGRAPHY_MERGE_INSTRUCTION: &str = "Merges the new information with existing content";
pub const BIOGRAPHY_NO_CURRENT: &str = "No existing content";

pub const BIOGRAPHY_SHAPE: &str =
    "[Well-formatted markdown biography with clear sections and professional tone]";

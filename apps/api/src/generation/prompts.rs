// All LLM prompt templates for cover letter generation.
// Placeholders are `{name}` tokens filled in a single pass by the compiler,
// so text supplied by the candidate is never re-scanned for placeholders.

/// Candidate-summary dialect: describes the job and the candidate, then asks
/// for a letter.
pub const DESCRIPTIVE_PROMPT_TEMPLATE: &str = "\
Generate a compelling cover letter with the following context:

Job Details:
- Position: {title} at {company}
- Key Requirements: {requirements}{responsibilities}

Candidate Profile:
{candidate}

{guidelines}";

/// Résumé-reproduction dialect: embeds the full résumé verbatim and asks the
/// model to tailor it to the job. `{fence}` is a tag absent from the résumé.
pub const RESUME_TAILORING_PROMPT_TEMPLATE: &str = "\
Below is my resume, followed by the job I am applying for. Tailor my resume \
into a cover letter for this job. Use only facts stated in the resume; do not \
invent employers, titles, dates or achievements.

Resume:
<<<{fence}
{resume}
{fence}>>>

Job Details:
- Position: {title} at {company}
- Requirements: {requirements}{responsibilities}

{guidelines}";

/// Optional line appended after the requirements line.
pub const RESPONSIBILITIES_LINE: &str = "\n- Responsibilities: {responsibilities}";

/// Raw résumé text inside the descriptive dialect.
pub const RAW_CANDIDATE_TEMPLATE: &str = "- Resume: {resume}";

/// Structured profile summary. `{experience}` is already a newline-joined
/// list of indented bullets.
pub const STRUCTURED_CANDIDATE_TEMPLATE: &str = "\
- Name: {fullname}
- Email: {email}
- Phone: {phone}
- Education: {education}
- Professional Skills: {skills}
- Recent Experience:
{experience}";

pub const EXPERIENCE_LINE_TEMPLATE: &str =
    "  - {role} at {company} ({duration}), Achievements: {achievements}";

pub const EDUCATION_ITEM_TEMPLATE: &str = "{degree} from {institution} ({year})";

/// Formatting instructions shared by both dialects.
pub const GUIDELINES_TEMPLATE: &str = "\
Tone: {tone}
Length Preference: {length}

Cover Letter Guidelines:
1. Personalize content to job description
2. Highlight matching skills
3. Show company/role understanding
4. Use {tone} writing style
5. Aim for {length} length

Highlighting Guidelines:
- Use **bold** for critical technical skills
- Use *italic* for unique or standout qualifications
- Combine ***bold and italic*** for key achievements
- Be consistent with highlighting
- Don't overuse bold or italic formatting
- Ensure the highlighting adds clarity, not confusion

Desired Outcome:
- Professional, engaging cover letter
- Clear alignment with job requirements
- Showcase the candidate's unique value proposition
- Create a compelling call-to-action

Final Instructions:
- Start with the salutation \"Dear Hiring Manager\" and end with \"Sincerely\" or \"Best Regards\" followed by the candidate's full name
- Include the candidate's name, email, and phone number
- Incorporate relevant keywords from the requirements to pass applicant tracking systems (ATS)
- Make every word count towards securing an interview
";

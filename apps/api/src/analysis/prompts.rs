// Keyword extraction prompt sent as the Gemini system instruction.

pub const KEYWORD_EXTRACTION_SYSTEM: &str = "\
Analyze the attached resume PDF and extract the keywords that matter for job matching. \
Respond with ONLY a JSON object of exactly this shape:
{
  \"keywords\": [\"keyword\"]
}

Consider:
- skills and education
- job titles and roles held
- industry experience
- certifications and qualifications
- seniority, judged from years of experience

Return at most 1 keyword: the single most important core term for finding matching jobs. \
Do NOT add any text, explanation or markdown outside the JSON object.";

// Prompt builders for the AI endpoints. Every prompt asks for a single JSON
// object so replies can go through `parse_json_reply`.

use crate::models::ai::Tone;

pub fn ats_optimize(resume_text: &str, job_description: Option<&str>) -> String {
    let job = job_description
        .map(|jd| format!("Job description:\n{jd}\n\n"))
        .unwrap_or_default();

    format!(
        "Review the resume below for Applicant Tracking System compatibility.\n\n\
         Resume:\n{resume_text}\n\n{job}\
         Respond with one JSON object and nothing else:\n\
         {{\n  \"score\": <integer 0-100>,\n  \"missingKeywords\": [string],\n  \
         \"recommendations\": [string],\n  \"issues\": [string],\n  \"strengths\": [string]\n}}\n\n\
         Score 90 and above only for resumes that need no changes. Weigh keyword coverage, \
         section headings, plain formatting and standard industry terms."
    )
}

pub fn tone_adjust(text: &str, tone: Tone) -> String {
    let style = match tone {
        Tone::Formal => "Use professional wording, expand contractions and prefer industry terms.",
        Tone::Casual => "Use conversational wording while staying professional.",
    };

    format!(
        "Rewrite the following resume text in a more {tone} tone.\n\n\
         Text:\n{text}\n\n\
         {style} Keep every fact and achievement, keep the bullet or paragraph \
         structure, and add nothing new.\n\n\
         Respond with one JSON object and nothing else:\n\
         {{\n  \"adjustedText\": string,\n  \"summary\": string,\n  \
         \"originalTone\": string,\n  \"targetTone\": \"{tone}\"\n}}",
        tone = tone.as_str(),
    )
}

pub fn action_verbs(text: &str) -> String {
    format!(
        "Strengthen the action verbs in this resume text. Replace weak or generic verbs \
         with specific, high-impact ones and leave everything else unchanged.\n\n\
         Text:\n{text}\n\n\
         Respond with one JSON object and nothing else:\n\
         {{\n  \"enhancedText\": string,\n  \
         \"changedVerbs\": [{{\"original\": string, \"enhanced\": string, \"context\": string}}],\n  \
         \"totalChanges\": integer\n}}"
    )
}

pub fn cover_letter(resume: &str, job_description: &str, company_name: Option<&str>) -> String {
    let company = company_name
        .map(|name| format!("Company: {name}\n\n"))
        .unwrap_or_default();

    format!(
        "Write a cover letter for the candidate below, aimed at the job description.\n\n\
         Candidate:\n{resume}\n\n\
         Job description:\n{job_description}\n\n{company}\
         Three or four paragraphs in a professional voice. Lead with the most relevant \
         experience and close with a call to action. Sign with the candidate's real name; \
         never leave placeholders such as [Your Name].\n\n\
         Respond with one JSON object and nothing else:\n\
         {{\n  \"coverLetter\": string,\n  \"wordCount\": integer\n}}"
    )
}

//! Local reply synthesis for when the chat backend is unavailable.
//!
//! An ordered list of keyword rules; the first rule whose keywords appear in
//! the lowercased message produces the reply. No rule ever yields an empty
//! string.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct ChatContext<'a> {
    pub career: Option<&'a str>,
    pub gpa: Option<f64>,
    pub subject_grades: Option<&'a BTreeMap<String, f64>>,
}

struct Rule {
    keywords: &'static [&'static str],
    /// Only applies when a career is known.
    needs_career: bool,
    respond: fn(&ChatContext<'_>) -> String,
}

const RULES: &[Rule] = &[
    Rule {
        keywords: &["university", "college", "recommend"],
        needs_career: false,
        respond: university_reply,
    },
    Rule {
        keywords: &["similar", "alternative", "other career"],
        needs_career: false,
        respond: similar_careers_reply,
    },
    Rule {
        keywords: &["about"],
        needs_career: true,
        respond: career_details_reply,
    },
    Rule {
        keywords: &["detail", "tell me more"],
        needs_career: false,
        respond: career_details_reply,
    },
    Rule {
        keywords: &["grade", "gpa", "score"],
        needs_career: false,
        respond: grades_reply,
    },
];

const TOP_UNIVERSITIES: &[(&str, &str)] = &[
    ("Stanford University", "Top 1"),
    ("Harvard University", "Top 5"),
    ("MIT", "Top 5"),
    ("UC Berkeley", "Top 15"),
    ("Yale University", "Top 25"),
    ("Carnegie Mellon University", "Top 15"),
    ("Princeton University", "Top 5"),
];

const SUGGESTED_UNIVERSITIES: usize = 3;

const SIMILAR_CAREERS: &[(&str, [&str; 5])] = &[
    (
        "Software Engineer",
        [
            "Full Stack Developer",
            "Backend Developer",
            "Frontend Developer",
            "DevOps Engineer",
            "Machine Learning Engineer",
        ],
    ),
    (
        "Doctor",
        [
            "Surgeon",
            "Dentist",
            "Pharmacist",
            "Psychiatrist",
            "Physician Assistant",
        ],
    ),
    (
        "Lawyer",
        [
            "Corporate Lawyer",
            "Legal Analyst",
            "Paralegal",
            "Judge",
            "Mediator",
        ],
    ),
    (
        "Teacher",
        [
            "Professor",
            "Tutor",
            "Curriculum Developer",
            "Education Consultant",
            "Special Education Teacher",
        ],
    ),
    (
        "Scientist",
        [
            "Research Scientist",
            "Data Scientist",
            "Environmental Scientist",
            "Chemist",
            "Biologist",
        ],
    ),
];

const GENERIC_SIMILAR: [&str; 5] = [
    "Related Profession 1",
    "Related Profession 2",
    "Related Profession 3",
    "Related Profession 4",
    "Related Profession 5",
];

pub const DEFAULT_REPLY: &str = "I'm here to help with your career exploration and university planning. I can provide information about universities, career options, or answer questions about your academic profile. What would you like to know more about?";

pub fn synthesize_reply(message: &str, ctx: &ChatContext<'_>) -> String {
    let lowered = message.to_lowercase();

    let rule = RULES.iter().find(|rule| {
        (!rule.needs_career || ctx.career.is_some())
            && rule.keywords.iter().any(|k| lowered.contains(k))
    });

    match (rule, ctx.career) {
        (Some(rule), _) => (rule.respond)(ctx),
        (None, Some(career)) => format!(
            "A career as a {career} can be very rewarding. I can help you explore university options, similar careers, or provide more details about this field. What would you like to know?"
        ),
        (None, None) => DEFAULT_REPLY.to_string(),
    }
}

fn university_reply(ctx: &ChatContext<'_>) -> String {
    let (Some(career), Some(gpa)) = (ctx.career, ctx.gpa.filter(|g| *g > 0.0)) else {
        return "To recommend universities, I need to know your GPA and career interest. Could you provide that information?".to_string();
    };

    let mut reply = format!(
        "Based on your interest in {career} and GPA of {gpa}/100, here are some university recommendations:\n\n"
    );
    for (index, (name, tier)) in TOP_UNIVERSITIES
        .iter()
        .take(SUGGESTED_UNIVERSITIES)
        .enumerate()
    {
        reply.push_str(&format!("{}. {name} ({tier})\n", index + 1));
    }
    reply.push_str(&format!(
        "\nThese universities have strong programs in fields related to {career}. Would you like more specific information about any of these universities?"
    ));
    reply
}

fn similar_careers_reply(ctx: &ChatContext<'_>) -> String {
    let Some(career) = ctx.career else {
        return "To suggest similar careers, I need to know what career you're interested in. Could you tell me which career field you'd like to explore?".to_string();
    };

    let similar = SIMILAR_CAREERS
        .iter()
        .find(|(name, _)| *name == career)
        .map(|(_, list)| list)
        .unwrap_or(&GENERIC_SIMILAR);

    format!(
        "Careers similar to {career} include: {}. Would you like more details about any of these alternatives?",
        similar.join(", ")
    )
}

fn career_details_reply(ctx: &ChatContext<'_>) -> String {
    let Some(career) = ctx.career else {
        return "Which career would you like to know more about?".to_string();
    };

    format!(
        "A career as a {career} typically requires specialized education and training. Professionals in this field generally need strong analytical skills, problem-solving abilities, and excellent communication. The job outlook for {career}s is positive, with growing demand in many regions. Would you like to know about the educational requirements, typical work environment, or salary expectations for this career?"
    )
}

fn grades_reply(ctx: &ChatContext<'_>) -> String {
    let Some(gpa) = ctx.gpa.filter(|g| *g > 0.0) else {
        return "I don't have information about your grades. Could you share your GPA and any specific subject grades?".to_string();
    };

    let mut reply = format!("Your overall GPA is {gpa}/100");
    match ctx.subject_grades.filter(|grades| !grades.is_empty()) {
        Some(grades) => {
            reply.push_str(". Here are your subject grades:\n\n");
            for (subject, grade) in grades {
                reply.push_str(&format!("- {subject}: {grade}/100\n"));
            }
            reply.push_str("\nBased on these grades, I can recommend suitable career paths or universities. Would you like some recommendations?");
        }
        None => reply.push_str(". If you share your specific subject grades, I can provide more tailored recommendations for your academic strengths."),
    }
    reply
}

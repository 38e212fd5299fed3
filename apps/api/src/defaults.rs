//! Fills blank optional fields of backend payloads with fixed bullet lists, so
//! no section is ever rendered empty. Applied once, where backend responses
//! enter the service.

use serde_json::{Map, Value};

/// `(field, default bullets)` pairs.
pub type DefaultsTable = &'static [(&'static str, &'static [&'static str])];

pub const ROADMAP_DEFAULTS: DefaultsTable = &[
    (
        "education_requirements",
        &[
            "Bachelor's degree in relevant field",
            "Consider graduate studies for specialization",
            "Continuous learning and professional development",
        ],
    ),
    (
        "experience_needed",
        &[
            "Research assistant positions",
            "Internships in related fields",
            "Laboratory or fieldwork experience",
            "Project-based experience",
        ],
    ),
    (
        "industry_certifications",
        &[
            "Specialized certifications in your field",
            "Software and tools proficiency certificates",
            "Professional association memberships",
        ],
    ),
    (
        "personal_development",
        &[
            "Time management and organization skills",
            "Resilience and adaptability",
            "Ethical judgment",
            "Curiosity and continuous learning",
        ],
    ),
    (
        "networking_suggestions",
        &[
            "Join professional associations in your field",
            "Attend conferences and seminars",
            "Connect with professors and mentors",
            "Participate in online communities and forums",
        ],
    ),
    (
        "timeline_milestones",
        &[
            "Complete undergraduate degree",
            "Secure first professional position",
            "Publish research or contribute to projects",
            "Achieve professional recognition",
            "Mentor others in your field",
        ],
    ),
];

pub const CAREER_DETAIL_DEFAULTS: DefaultsTable = &[
    (
        "skills",
        &[
            "Analytical thinking",
            "Problem solving",
            "Communication",
            "Teamwork",
        ],
    ),
    (
        "pros",
        &[
            "Opportunities for growth",
            "Meaningful work",
            "Transferable skills",
        ],
    ),
    (
        "cons",
        &[
            "Competitive entry",
            "Ongoing training required",
            "Demanding workload at times",
        ],
    ),
];

/// Fills every field in `table` that is absent, null, an empty string or an
/// empty array. Returns the number of fields filled.
pub fn fill_defaults(partial: &mut Map<String, Value>, table: DefaultsTable) -> usize {
    let mut filled = 0;
    for (field, bullets) in table {
        let blank = partial.get(*field).map_or(true, is_blank);
        if blank {
            let list = bullets.iter().map(|b| Value::from(*b)).collect();
            partial.insert((*field).to_string(), Value::Array(list));
            filled += 1;
        }
    }
    filled
}

/// Object-or-nothing convenience: non-object payloads pass through untouched.
pub fn with_defaults(mut value: Value, table: DefaultsTable) -> Value {
    if let Value::Object(map) = &mut value {
        fill_defaults(map, table);
    }
    value
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

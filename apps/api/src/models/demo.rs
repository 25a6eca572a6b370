use serde::Serialize;

/// Canned parse result served to front ends for demos.
#[derive(Debug, Clone, Serialize)]
pub struct DemoResume {
    pub name: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub skills: &'static [&'static str],
    pub experience: &'static [&'static str],
    pub education: &'static [&'static str],
    /// Percentage of fields the parser got right on this sample.
    pub accuracy: u8,
}

pub const DEMO_RESUMES: &[DemoResume] = &[
    DemoResume {
        name: "Jane Doe",
        email: "jane.doe@example.com",
        phone: "+1 (555) 123-4567",
        skills: &["JavaScript", "React", "Node.js"],
        experience: &["Senior Developer at TechCorp"],
        education: &["B.S. Computer Science"],
        accuracy: 92,
    },
    DemoResume {
        name: "John Smith",
        email: "john.smith@example.com",
        phone: "+1 (555) 987-6543",
        skills: &["Python", "Django", "PostgreSQL"],
        experience: &["Backend Engineer at DataWorks"],
        education: &["M.S. Software Engineering"],
        accuracy: 88,
    },
];

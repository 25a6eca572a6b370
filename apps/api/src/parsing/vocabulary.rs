//! Recognised skill tags.
//!
//! Order is significant: extracted skills are reported in this order, not
//! in the order they appear in the resume.

pub const SKILL_VOCABULARY: &[&str] = &[
    "Python",
    "JavaScript",
    "TypeScript",
    "Java",
    "C++",
    "C#",
    "PHP",
    "Ruby",
    "Go",
    "Rust",
    "React",
    "Vue.js",
    "Vue",
    "Angular",
    "Node.js",
    "Express",
    "Django",
    "Flask",
    "Spring",
    "FastAPI",
    "MongoDB",
    "PostgreSQL",
    "MySQL",
    "Redis",
    "Elasticsearch",
    "Docker",
    "Kubernetes",
    "AWS",
    "Azure",
    "GCP",
    "Jenkins",
    "Git",
    "GraphQL",
    "REST",
    "SOAP",
    "Machine Learning",
    "TensorFlow",
    "PyTorch",
    "Data Analysis",
    "Pandas",
    "NumPy",
    "HTML",
    "CSS",
    "SCSS",
    "Tailwind",
    "Bootstrap",
    "SQL",
    "NoSQL",
    "Agile",
    "Scrum",
    "CI/CD",
];

//! Preview derivation
//!
//! The preview is recomputed from the whole form on every change. It is a
//! pure function of [`FormState`], so the order of edits never matters.

use super::form::FormState;
use super::profile::{academics_line, split_comma_list, split_line_list};

pub const NAME_PLACEHOLDER: &str = "Full Name";
pub const CONTACT_PLACEHOLDER: &str = "Contact information";
pub const BIO_PLACEHOLDER: &str = "Short bio appears here.";
pub const SKILLS_PLACEHOLDER: &str = "—";
pub const COMPANY_PLACEHOLDER: &str = "Company";
pub const NO_RESPONSIBILITIES: &str = "No responsibilities provided.";

/// Read-only presentation of the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    pub name: String,
    pub contact: String,
    pub bio: String,
    pub soft_skills: String,
    pub tech_skills: String,
    /// Photo data URI, `None` shows the placeholder background
    pub photo: Option<String>,
    /// Hidden when every academic field is empty
    pub academics: Option<String>,
    pub company: String,
    /// Never empty, falls back to a single placeholder item
    pub responsibilities: Vec<String>,
    /// Hidden when there are no projects
    pub projects: Option<Vec<String>>,
}

/// Derive the full preview from the current form
pub fn derive_preview(form: &FormState) -> Preview {
    let responsibilities = split_line_list(&form.responsibilities);
    let projects = split_line_list(&form.projects);

    Preview {
        name: text_or(&form.full_name, NAME_PLACEHOLDER),
        contact: text_or(&form.contact_info, CONTACT_PLACEHOLDER),
        bio: text_or(&form.bio, BIO_PLACEHOLDER),
        soft_skills: skills_line(&form.soft_skills),
        tech_skills: skills_line(&form.tech_skills),
        photo: (!form.photo.is_empty()).then(|| form.photo.clone()),
        academics: academics_line([
            form.institute.as_str(),
            form.degree.as_str(),
            form.year.as_str(),
            form.grade.as_str(),
        ]),
        company: company_line(&form.company, &form.duration, COMPANY_PLACEHOLDER),
        responsibilities: if responsibilities.is_empty() {
            vec![NO_RESPONSIBILITIES.to_string()]
        } else {
            responsibilities
        },
        projects: (!projects.is_empty()).then_some(projects),
    }
}

fn text_or(value: &str, placeholder: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn skills_line(raw: &str) -> String {
    let skills = split_comma_list(raw);
    if skills.is_empty() {
        SKILLS_PLACEHOLDER.to_string()
    } else {
        skills.join(", ")
    }
}

/// Company with the duration in parentheses when one is given
pub fn company_line(company: &str, duration: &str, placeholder: &str) -> String {
    let company = text_or(company, placeholder);
    let duration = duration.trim();
    match (company.is_empty(), duration.is_empty()) {
        (_, true) => company,
        (true, false) => format!("({duration})"),
        (false, false) => format!("{company} ({duration})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::form::Field;

    #[test]
    fn test_empty_form_shows_placeholders() {
        let preview = derive_preview(&FormState::default());
        assert_eq!(preview.name, NAME_PLACEHOLDER);
        assert_eq!(preview.contact, CONTACT_PLACEHOLDER);
        assert_eq!(preview.bio, BIO_PLACEHOLDER);
        assert_eq!(preview.soft_skills, SKILLS_PLACEHOLDER);
        assert_eq!(preview.company, COMPANY_PLACEHOLDER);
        assert_eq!(preview.responsibilities, vec![NO_RESPONSIBILITIES]);
        assert_eq!(preview.photo, None);
        assert_eq!(preview.academics, None);
        assert_eq!(preview.projects, None);
    }

    #[test]
    fn test_preview_is_idempotent() {
        let mut form = FormState::default();
        form.set(Field::FullName, "Grace");
        form.set(Field::Projects, "COBOL\n\nA-0");
        assert_eq!(derive_preview(&form), derive_preview(&form));
    }

    #[test]
    fn test_edit_order_does_not_matter() {
        let mut first = FormState::default();
        first.set(Field::TechSkills, "rust, go");
        first.set(Field::Degree, "BSc");

        let mut second = FormState::default();
        second.set(Field::Degree, "BSc");
        second.set(Field::TechSkills, "rust, go");

        assert_eq!(derive_preview(&first), derive_preview(&second));
    }

    #[test]
    fn test_skills_blank_segments_fall_back_to_placeholder() {
        let mut form = FormState::default();
        form.set(Field::SoftSkills, " , , ");
        form.set(Field::TechSkills, " a , ,b");
        let preview = derive_preview(&form);
        assert_eq!(preview.soft_skills, SKILLS_PLACEHOLDER);
        assert_eq!(preview.tech_skills, "a, b");
    }

    #[test]
    fn test_academics_show_only_filled_parts() {
        let mut form = FormState::default();
        form.set(Field::Grade, " A ");
        assert_eq!(derive_preview(&form).academics.as_deref(), Some("A"));

        form.set(Field::Institute, "Cambridge");
        assert_eq!(
            derive_preview(&form).academics.as_deref(),
            Some("Cambridge — A")
        );
    }

    #[test]
    fn test_company_line_with_duration() {
        let mut form = FormState::default();
        form.set(Field::Duration, "2 years");
        assert_eq!(derive_preview(&form).company, "Company (2 years)");
        form.set(Field::Company, "Analytical Engines");
        assert_eq!(
            derive_preview(&form).company,
            "Analytical Engines (2 years)"
        );
    }

    #[test]
    fn test_projects_listed_in_order() {
        let mut form = FormState::default();
        form.set(Field::Projects, " one \n two\n");
        assert_eq!(
            derive_preview(&form).projects,
            Some(vec!["one".to_string(), "two".to_string()])
        );
    }
}

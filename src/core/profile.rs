//! Profile schema and the list derivation rules shared by form, preview and export

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One saved portfolio entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    /// Creation timestamp in milliseconds, unique per save
    pub id: i64,
    pub full_name: String,
    pub contact_info: String,
    /// Embedded image as a `data:` URI, empty when no photo was chosen
    pub photo: String,
    pub bio: String,
    pub soft_skills: Vec<String>,
    pub tech_skills: Vec<String>,
    pub institute: String,
    pub degree: String,
    pub year: String,
    pub grade: String,
    pub company: String,
    pub duration: String,
    pub responsibilities: Vec<String>,
    pub projects: Vec<String>,
}

/// A required field was missing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please provide at least Full name and Contact info.")]
    MissingRequired,
}

impl Profile {
    /// Check the fields a profile needs before it can be saved
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() || self.contact_info.trim().is_empty() {
            return Err(ValidationError::MissingRequired);
        }
        Ok(())
    }

    /// Name shown in lists, falling back for legacy entries without one
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            "Unnamed"
        } else {
            &self.full_name
        }
    }
}

/// Separator between academic parts
pub const ACADEMICS_SEPARATOR: &str = " — ";

/// Split comma separated input into trimmed, non-empty items
pub fn split_comma_list(input: &str) -> Vec<String> {
    split_list(input, ',')
}

/// Split newline separated input into trimmed, non-empty items
pub fn split_line_list(input: &str) -> Vec<String> {
    split_list(input, '\n')
}

fn split_list(input: &str, separator: char) -> Vec<String> {
    input
        .split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trimmed academic parts that are non-empty
fn academic_parts<'a>(parts: [&'a str; 4]) -> Vec<&'a str> {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Join the academic parts, or `None` when the section should be hidden
pub fn academics_line(parts: [&str; 4]) -> Option<String> {
    let visible = academic_parts(parts);
    if visible.is_empty() {
        None
    } else {
        Some(visible.join(ACADEMICS_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_list_drops_blank_segments() {
        assert_eq!(split_comma_list(" a , ,b"), vec!["a", "b"]);
        assert!(split_comma_list(" , ,").is_empty());
    }

    #[test]
    fn test_line_list_trims_lines() {
        let items = split_line_list("  first\n\n second  \r\n");
        assert_eq!(items, vec!["first", "second"]);
    }

    #[test]
    fn test_validate_requires_name_and_contact() {
        let mut profile = Profile {
            full_name: "Ada".into(),
            ..Default::default()
        };
        assert_eq!(profile.validate(), Err(ValidationError::MissingRequired));

        profile.contact_info = "   ".into();
        assert!(profile.validate().is_err());

        profile.contact_info = "ada@example.com".into();
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_academics_hidden_when_all_empty() {
        assert_eq!(academics_line(["", " ", "", ""]), None);
        assert_eq!(
            academics_line(["MIT", "", "2020", ""]),
            Some("MIT — 2020".to_string())
        );
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let profile: Profile =
            serde_json::from_str(r#"{"id": 7, "fullName": "Ada", "softSkills": ["x"]}"#).unwrap();
        assert_eq!(profile.id, 7);
        assert_eq!(profile.full_name, "Ada");
        assert_eq!(profile.soft_skills, vec!["x"]);
        assert!(profile.projects.is_empty());
        assert_eq!(profile.contact_info, "");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(Profile::default()).unwrap();
        assert!(json.get("fullName").is_some());
        assert!(json.get("techSkills").is_some());
        assert!(json.get("full_name").is_none());
    }
}

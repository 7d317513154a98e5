//! Live form state: the raw text of every field plus the in-memory photo

use super::profile::{split_comma_list, split_line_list, Profile};

/// Editable form fields, named after the profile schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FullName,
    ContactInfo,
    Bio,
    SoftSkills,
    TechSkills,
    Institute,
    Degree,
    Year,
    Grade,
    Company,
    Duration,
    Responsibilities,
    Projects,
}

impl Field {
    /// All fields in form order
    pub const ALL: [Field; 13] = [
        Field::FullName,
        Field::ContactInfo,
        Field::Bio,
        Field::SoftSkills,
        Field::TechSkills,
        Field::Institute,
        Field::Degree,
        Field::Year,
        Field::Grade,
        Field::Company,
        Field::Duration,
        Field::Responsibilities,
        Field::Projects,
    ];

    /// Schema name of the field
    pub fn name(self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::ContactInfo => "contactInfo",
            Field::Bio => "bio",
            Field::SoftSkills => "softSkills",
            Field::TechSkills => "techSkills",
            Field::Institute => "institute",
            Field::Degree => "degree",
            Field::Year => "year",
            Field::Grade => "grade",
            Field::Company => "company",
            Field::Duration => "duration",
            Field::Responsibilities => "responsibilities",
            Field::Projects => "projects",
        }
    }

    /// Label shown next to the input
    pub fn label(self) -> &'static str {
        match self {
            Field::FullName => "Full name",
            Field::ContactInfo => "Contact info",
            Field::Bio => "Short bio",
            Field::SoftSkills => "Soft skills (comma separated)",
            Field::TechSkills => "Technical skills (comma separated)",
            Field::Institute => "Institute",
            Field::Degree => "Degree",
            Field::Year => "Year",
            Field::Grade => "Grade",
            Field::Company => "Company",
            Field::Duration => "Duration",
            Field::Responsibilities => "Responsibilities (one per line)",
            Field::Projects => "Projects / Publications (one per line)",
        }
    }

    /// Whether the input spans multiple lines
    pub fn is_multiline(self) -> bool {
        matches!(self, Field::Bio | Field::Responsibilities | Field::Projects)
    }
}

/// The profile currently being edited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub full_name: String,
    pub contact_info: String,
    pub bio: String,
    pub soft_skills: String,
    pub tech_skills: String,
    pub institute: String,
    pub degree: String,
    pub year: String,
    pub grade: String,
    pub company: String,
    pub duration: String,
    pub responsibilities: String,
    pub projects: String,
    /// Photo as a `data:` URI, empty when none is set
    pub photo: String,
}

impl FormState {
    /// Raw value of a field
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::ContactInfo => &self.contact_info,
            Field::Bio => &self.bio,
            Field::SoftSkills => &self.soft_skills,
            Field::TechSkills => &self.tech_skills,
            Field::Institute => &self.institute,
            Field::Degree => &self.degree,
            Field::Year => &self.year,
            Field::Grade => &self.grade,
            Field::Company => &self.company,
            Field::Duration => &self.duration,
            Field::Responsibilities => &self.responsibilities,
            Field::Projects => &self.projects,
        }
    }

    /// Mutable access to a field's raw value
    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::FullName => &mut self.full_name,
            Field::ContactInfo => &mut self.contact_info,
            Field::Bio => &mut self.bio,
            Field::SoftSkills => &mut self.soft_skills,
            Field::TechSkills => &mut self.tech_skills,
            Field::Institute => &mut self.institute,
            Field::Degree => &mut self.degree,
            Field::Year => &mut self.year,
            Field::Grade => &mut self.grade,
            Field::Company => &mut self.company,
            Field::Duration => &mut self.duration,
            Field::Responsibilities => &mut self.responsibilities,
            Field::Projects => &mut self.projects,
        }
    }

    /// Replace a field's raw value
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// Whether the fields needed for saving are filled in
    pub fn has_required(&self) -> bool {
        !self.full_name.trim().is_empty() && !self.contact_info.trim().is_empty()
    }

    /// Mirror the form into a profile with the given id
    pub fn to_profile(&self, id: i64) -> Profile {
        Profile {
            id,
            full_name: self.full_name.trim().to_string(),
            contact_info: self.contact_info.trim().to_string(),
            photo: self.photo.clone(),
            bio: self.bio.trim().to_string(),
            soft_skills: split_comma_list(&self.soft_skills),
            tech_skills: split_comma_list(&self.tech_skills),
            institute: self.institute.trim().to_string(),
            degree: self.degree.trim().to_string(),
            year: self.year.trim().to_string(),
            grade: self.grade.trim().to_string(),
            company: self.company.trim().to_string(),
            duration: self.duration.trim().to_string(),
            responsibilities: split_line_list(&self.responsibilities),
            projects: split_line_list(&self.projects),
        }
    }

    /// Fill a form from a stored profile
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            contact_info: profile.contact_info.clone(),
            bio: profile.bio.clone(),
            soft_skills: profile.soft_skills.join(", "),
            tech_skills: profile.tech_skills.join(", "),
            institute: profile.institute.clone(),
            degree: profile.degree.clone(),
            year: profile.year.clone(),
            grade: profile.grade.clone(),
            company: profile.company.clone(),
            duration: profile.duration.clone(),
            responsibilities: profile.responsibilities.join("\n"),
            projects: profile.projects.join("\n"),
            photo: profile.photo.clone(),
        }
    }

    /// Reset every field and the photo
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

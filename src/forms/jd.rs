//! Job-description generator form.

use crate::api::{ExperienceLevel, JdRequest, JdResponse};

use super::submission::{Submission, Ticket};

#[derive(Debug, Default)]
pub struct JdForm {
    pub role: String,
    /// Text box the next skill is typed into.
    pub skill_input: String,
    pub(crate) skills: Vec<String>,
    pub experience_level: ExperienceLevel,
    pub company_type: String,
    pub submission: Submission<JdResponse>,
}

impl JdForm {
    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    /// Append a trimmed skill.  Blank and duplicate skills are rejected.
    pub fn add_skill(&mut self, raw: &str) -> bool {
        let skill = raw.trim();
        if skill.is_empty() || self.skills.iter().any(|s| s == skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    /// Add whatever is in [`skill_input`](Self::skill_input); the box is
    /// cleared only when the skill was accepted.
    pub fn commit_skill_input(&mut self) -> bool {
        let raw = std::mem::take(&mut self.skill_input);
        if self.add_skill(&raw) {
            true
        } else {
            self.skill_input = raw;
            false
        }
    }

    pub fn remove_skill(&mut self, skill: &str) {
        self.skills.retain(|s| s != skill);
    }

    pub fn can_submit(&self) -> bool {
        !self.skills.is_empty() && !self.submission.is_submitting()
    }

    pub fn build_request(&self) -> JdRequest {
        let company_type = self.company_type.trim();
        JdRequest {
            role: self.role.clone(),
            skills: self.skills.clone(),
            experience_level: self.experience_level,
            company_type: (!company_type.is_empty()).then(|| company_type.to_string()),
        }
    }

    /// Issue a ticket and the request to send, or `None` when submission is
    /// currently disabled.
    pub fn submit(&mut self) -> Option<(Ticket, JdRequest)> {
        if !self.can_submit() {
            return None;
        }
        let request = self.build_request();
        let ticket = self.submission.begin()?;
        Some((ticket, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skills_are_trimmed_and_deduplicated() {
        let mut form = JdForm::default();
        assert!(form.add_skill("  Rust "));
        assert!(!form.add_skill("Rust"));
        assert!(!form.add_skill("   "));
        assert!(form.add_skill("SQL"));
        assert_eq!(form.skills(), &["Rust".to_string(), "SQL".to_string()]);

        form.remove_skill("Rust");
        assert_eq!(form.skills(), &["SQL".to_string()]);
    }

    #[test]
    fn skill_input_cleared_only_on_accept() {
        let mut form = JdForm::default();
        form.skill_input = "Go".into();
        assert!(form.commit_skill_input());
        assert!(form.skill_input.is_empty());

        form.skill_input = " Go ".into();
        assert!(!form.commit_skill_input());
        assert_eq!(form.skill_input, " Go ");
    }

    #[test]
    fn submission_needs_a_skill() {
        let mut form = JdForm {
            role: "Backend Engineer".into(),
            company_type: "Startup".into(),
            ..Default::default()
        };
        assert!(!form.can_submit());
        assert!(form.submit().is_none());

        form.add_skill("Rust");
        assert!(form.can_submit());
        let (_, request) = form.submit().unwrap();
        assert_eq!(request.skills, vec!["Rust".to_string()]);
        assert!(!form.can_submit());
    }

    #[test]
    fn empty_company_type_is_absent() {
        let mut form = JdForm::default();
        form.add_skill("Rust");
        form.company_type = "   ".into();
        assert_eq!(form.build_request().company_type, None);

        form.company_type = "Enterprise".into();
        assert_eq!(
            form.build_request().company_type.as_deref(),
            Some("Enterprise")
        );
    }

    #[test]
    fn server_failure_clears_submitting_and_sets_only_error() {
        let mut form = JdForm::default();
        form.add_skill("Rust");
        let (ticket, _) = form.submit().unwrap();
        form.submission.complete(
            ticket,
            Err("Failed to generate JD. Please try again.".into()),
        );
        assert!(!form.submission.is_submitting());
        assert!(form.submission.result().is_none());
        assert_eq!(
            form.submission.error(),
            Some("Failed to generate JD. Please try again.")
        );
        assert!(form.can_submit());
    }
}

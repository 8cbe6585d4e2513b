//! CV screener form.

use std::path::Path;

use crate::api::{file_name_of, CvFile, CvScreenResponse};

use super::submission::{Submission, Ticket};

pub const UNSUPPORTED_FILE: &str = "Please upload a PDF or DOCX file";
pub const MISSING_FILE: &str = "Please upload a CV file";

#[derive(Debug, Default)]
pub struct CvForm {
    file: Option<CvFile>,
    pub jd_text: String,
    pub submission: Submission<CvScreenResponse>,
}

impl CvForm {
    pub fn file(&self) -> Option<&CvFile> {
        self.file.as_ref()
    }

    /// Accept `file` if its name ends in `.pdf` or `.docx`.
    ///
    /// An unsupported name clears the current selection and shows an error;
    /// a supported one clears any error.
    pub fn select_file(&mut self, file: CvFile) -> bool {
        if !CvFile::is_supported_name(&file.name) {
            log::debug!("cv: rejected {}", file.name);
            self.file = None;
            self.submission.fail_validation(UNSUPPORTED_FILE);
            return false;
        }
        self.file = Some(file);
        self.submission.clear_error();
        true
    }

    /// Check the name, then read the file from disk.
    pub fn select_path(&mut self, path: &Path) -> std::io::Result<bool> {
        let name = file_name_of(path);
        if !CvFile::is_supported_name(&name) {
            self.file = None;
            self.submission.fail_validation(UNSUPPORTED_FILE);
            return Ok(false);
        }
        let file = CvFile::read(path)?;
        Ok(self.select_file(file))
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.submission.is_submitting()
    }

    /// Issue a ticket with a copy of the file and JD text.
    ///
    /// Without a selected file the form shows [`MISSING_FILE`] and nothing is
    /// sent.
    pub fn submit(&mut self) -> Option<(Ticket, CvFile, String)> {
        if self.submission.is_submitting() {
            return None;
        }
        let Some(file) = self.file.clone() else {
            self.submission.fail_validation(MISSING_FILE);
            return None;
        };
        let ticket = self.submission.begin()?;
        Some((ticket, file, self.jd_text.clone()))
    }
}

//! Error-message templates.
//!
//! Each template carries `{0}` (the subject, usually a file name or count)
//! and `{1}` (the limit or failure detail). Hosts may override any of them
//! via [`UploadOptions`](crate::UploadOptions).

pub const DEFAULT_FILE_LIMIT_MESSAGE: &str = "Cannot select {0} files, the limit is {1}.";
pub const DEFAULT_SIZE_LIMIT_MESSAGE: &str =
    "{0}: Invalid file size, files must be smaller than {1}.";
pub const DEFAULT_TYPE_MESSAGE: &str = "{0}: Invalid file type, accepted types are {1}.";
pub const DEFAULT_ENDPOINT_MESSAGE: &str = "{0}: Upload failed. {1}";

/// Substitutes `{0}` and `{1}` in a message template.
pub fn render(template: &str, subject: &str, detail: &str) -> String {
    template.replace("{0}", subject).replace("{1}", detail)
}

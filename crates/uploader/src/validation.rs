//! Candidate-file validation.
//!
//! Three independent predicates. Each returns whether the candidate (or
//! batch) passes and, on failure, records one rendered message into the
//! corresponding [`ErrorBag`] slot. Nothing here raises.

use airlift_protocol::{RawFile, UploadOptions, format_size, render};
use tracing::debug;

use crate::errors::{ErrorBag, ErrorSlot};

/// Validates candidates against the session options.
pub struct Validator<'a> {
    options: &'a UploadOptions,
    errors: &'a ErrorBag,
}

impl<'a> Validator<'a> {
    pub fn new(options: &'a UploadOptions, errors: &'a ErrorBag) -> Self {
        Self { options, errors }
    }

    /// Passes unless a size limit is configured and the file exceeds it.
    pub fn check_size(&self, file: &RawFile) -> bool {
        let Some(limit) = self.options.size_limit else {
            return true;
        };
        if file.size <= limit {
            return true;
        }
        let limit_text = format_size(limit, self.options.format_size);
        debug!(file = %file.name, size = file.size, limit, "file over size limit");
        self.errors.set(
            ErrorSlot::SizeLimit,
            render(&self.options.size_limit_message, &file.name, &limit_text),
        );
        false
    }

    /// Passes unless an accept pattern is configured and no token matches.
    pub fn check_type(&self, file: &RawFile) -> bool {
        let Some(accepts) = self.options.accepts.as_deref() else {
            return true;
        };
        if accepts
            .split(',')
            .map(str::trim)
            .any(|token| token_matches(token, file))
        {
            return true;
        }
        debug!(file = %file.name, content_type = %file.content_type, accepts, "file type rejected");
        self.errors.set(
            ErrorSlot::Type,
            render(&self.options.type_message, &file.name, accepts),
        );
        false
    }

    /// Checks that an incoming batch fits alongside the current collection.
    ///
    /// The effective limit is 1 in single-file mode, otherwise the configured
    /// file limit; no limit means the check always passes.
    pub fn check_count(&self, batch_len: usize, current_len: usize) -> bool {
        let limit = if self.options.multiple {
            match self.options.file_limit {
                Some(limit) => limit,
                None => return true,
            }
        } else {
            1
        };
        let attempted = batch_len + current_len;
        if attempted <= limit {
            return true;
        }
        debug!(attempted, limit, "file count over limit");
        self.errors.set(
            ErrorSlot::FileLimit,
            render(
                &self.options.file_limit_message,
                &attempted.to_string(),
                &limit.to_string(),
            ),
        );
        false
    }
}

/// Matches one accept token against a file.
///
/// `*` matches everything. A token without `/` is a case-insensitive
/// filename-suffix match. A token with `/` is a group/subtype pattern
/// where `*` on either side matches anything; a file MIME type without
/// `/` matches no such token.
fn token_matches(token: &str, file: &RawFile) -> bool {
    if token == "*" {
        return true;
    }

    match token.split_once('/') {
        None => {
            if token.is_empty() {
                return false;
            }
            file.name.to_lowercase().ends_with(&token.to_lowercase())
        }
        Some((group, subtype)) => {
            let Some((file_group, file_subtype)) = file.content_type.split_once('/') else {
                return false;
            };
            (group == "*" || group.eq_ignore_ascii_case(file_group))
                && (subtype == "*" || subtype.eq_ignore_ascii_case(file_subtype))
        }
    }
}

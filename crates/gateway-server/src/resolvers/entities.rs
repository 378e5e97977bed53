//! Field name tables of the upstream entities. Bump the version when an entry changes meaning.

use std::sync::OnceLock;

use field_transcoder::{FieldMapping, TranscodeError};

type Table = Result<FieldMapping, TranscodeError>;

pub(crate) fn tags() -> Result<&'static FieldMapping, TranscodeError> {
    static TAGS: OnceLock<Table> = OnceLock::new();

    TAGS.get_or_init(|| {
        FieldMapping::new(
            1,
            [
                ("id", "id"),
                ("name", "name"),
                ("userId", "user_id"),
                ("groupId", "group_id"),
            ],
        )
    })
    .as_ref()
    .map_err(Clone::clone)
}

pub(crate) fn sessions() -> Result<&'static FieldMapping, TranscodeError> {
    static SESSIONS: OnceLock<Table> = OnceLock::new();

    SESSIONS
        .get_or_init(|| FieldMapping::new(1, [("userId", "user_id"), ("token", "cbrain_api_token")]))
        .as_ref()
        .map_err(Clone::clone)
}

/// Fails when one of the tables is inconsistent, so a broken table stops the server at startup
/// instead of failing every request.
pub(crate) fn validate() -> Result<(), TranscodeError> {
    tags()?;
    sessions()?;

    Ok(())
}

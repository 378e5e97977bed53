//! Field names are camelCase on the GraphQL side and snake_case in the upstream API. Every record
//! crossing the boundary goes through a [`FieldMapping`], which converts keys recursively and
//! refuses keys it cannot convert back without loss.

mod mapping;

pub use mapping::FieldMapping;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Convention {
    #[strum(serialize = "camelCase")]
    External,
    #[strum(serialize = "snake_case")]
    Upstream,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscodeError {
    #[error("field `{key}` has no lossless {target} form")]
    Ambiguous { key: String, target: Convention },
    #[error("field `{0}` is mapped more than once")]
    DuplicateMapping(String),
}

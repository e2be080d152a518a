use thiserror::Error;

use crate::audit::InputKind;

#[derive(Debug, Error)]
pub enum VigencyError {
    /// A required input has no data rows at all.
    #[error("required input '{input}' is empty")]
    EmptyInput { input: InputKind },

    /// Every row of a required input was dropped during normalization.
    #[error(
        "required input '{input}' has no usable rows: {total} read, \
         {missing_fields} missing required fields, {unparseable_dates} unparseable dates, \
         {invalid_ids} invalid identifiers"
    )]
    NoUsableRows {
        input: InputKind,
        total: usize,
        missing_fields: usize,
        unparseable_dates: usize,
        invalid_ids: usize,
    },

    #[error("invalid patient identifier: '{0}'")]
    InvalidPatientId(String),
}

pub type Result<T> = std::result::Result<T, VigencyError>;

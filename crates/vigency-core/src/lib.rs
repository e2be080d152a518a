//! Diagnosis vigency engine.
//!
//! The engine runs in three steps over in-memory record sets:
//!
//! 1. **Normalize** raw evaluations and visits into typed records, dropping
//!    unusable rows and resolving same-day evaluation ties
//!    ([`normalize_evaluations`], [`normalize_visits`]).
//! 2. **Build** a flat, patient-indexed table of validity intervals from the
//!    clean evaluations ([`VigencyIndex::build`]).
//! 3. **Resolve** every visit against its patient's intervals with a binary
//!    search over interval starts ([`resolve_visits`]).
//!
//! [`summarize`] then projects the resolved visits into count tables.
//! Patients are independent units of work; with
//! [`ExecutionMode::Parallel`](vigency_model::ExecutionMode) steps 2 and 3
//! run on the rayon pool and produce the same output as a sequential run.

pub mod datetime;
pub mod normalize;
pub mod resolve;
pub mod summary;
pub mod text;
pub mod vigency;

pub use datetime::{format_date, parse_date};
pub use normalize::{
    NormalizedEvaluations, NormalizedVisits, normalize_evaluations, normalize_visits,
};
pub use resolve::{resolve_date, resolve_visit, resolve_visits};
pub use summary::summarize;
pub use text::{clean_text, title_case};
pub use vigency::{VigencyIndex, build_patient_intervals};

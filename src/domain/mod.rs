//! Domain layer containing the interview logic and its types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, errors, state machine trait)
//! - `interview` - Questions, answers and the interview session state machine
//! - `analysis` - Preliminary assessment and the follow-up question merger
//! - `report` - Final report content and its assembly
//! - `payload` - Lenient decoding of language model responses

pub mod analysis;
pub mod foundation;
pub mod interview;
pub mod payload;
pub mod report;

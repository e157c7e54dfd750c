//! Bank statement extraction: profile registry, bank identification, field
//! rules and transaction grammar, plus the document decoders that feed them.

pub mod decode;
pub mod engine;
pub mod fields;
pub mod hash;
pub mod identify;
pub mod pipeline;
pub mod profile;
pub mod registry;
pub mod transactions;

pub use decode::{AutoDecoder, DecodeError, DocumentDecoder, DocumentKind, MockDecoder, PlainTextDecoder};
#[cfg(feature = "pdf")]
pub use decode::PdfTextDecoder;
pub use engine::StatementEngine;
pub use fields::{FieldExtractor, StatementFields};
pub use hash::{fingerprint, short_fingerprint};
pub use identify::{identify, Identification};
pub use pipeline::{DocumentPipeline, PipelineError, PipelineResult};
pub use profile::{builtin_defs, FieldRules, Profile, ProfileDef, ProfileKind, GENERIC_PROFILE_ID};
pub use registry::{ProfileRegistry, RegistryError};
pub use transactions::TransactionParser;

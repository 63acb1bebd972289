//! Author-name deduplication: fold each spelling to ASCII tokens, key it by
//! sound, group spellings that share a key and pick one name per group.

mod canonicalizer;
mod clusterer;
mod encoder;
pub mod literal;
mod normalizer;
mod pipeline;
pub mod reader;
mod writer;

pub use canonicalizer::{canonicalize, representative, CanonicalEntry};
pub use clusterer::{cluster, Cluster, PhoneticClusters};
pub use encoder::{NameEncoder, PhoneticKey};
pub use normalizer::{fold_to_ascii, normalize, NormalizationMode, NormalizedName};
pub use pipeline::{deduplicate, process, run, Deduplication, PipelineError, RunSummary};
pub use reader::{MalformedCellPolicy, RawNames, ReadError, ReadStats};
pub use writer::{write_entries, WriteError};

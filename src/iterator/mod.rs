// 凭据枚举相关模块
pub mod chunk_sequencer;
pub mod chunked_file;
pub mod counter;
pub mod credential_iterator;
pub mod host;
pub mod line_reader;
pub mod line_source;
pub mod source;

pub use chunk_sequencer::ChunkSequencer;
pub use chunked_file::{ChunkedFile, count_lines_in_chunked_file, read_lines_from_chunked_file};
pub use counter::{count_credentials, count_lines};
pub use credential_iterator::{Credential, CredentialIterator, IterationMode, IteratorConfig, Pull};
pub use host::Host;
pub use line_reader::{FileLineReader, LineReader};
pub use line_source::FileLines;
pub use source::{CredentialSource, SourceCursor};

use serde::{Deserialize, Serialize};

/// One record of a JSON Compilation Database.
///
/// Field order is the serialization order: `directory`, `command`, `file`,
/// `output`. All four are plain strings, as clangd and friends expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileEntry {
    /// Working directory the command runs in (absolute).
    pub directory: String,
    /// Full compiler invocation as one shell string.
    pub command: String,
    /// Source file, relative to `directory` unless absolute.
    pub file: String,
    /// Object file produced by `command`.
    pub output: String,
}

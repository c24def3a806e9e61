//! Built-in filesystem tools

mod delete_lines;
mod list_directory;
mod make_directory;
mod read_file;
mod write_file;

pub use delete_lines::{delete_lines, DeleteLinesArgs, DeleteLinesTool};
pub use list_directory::{list_directory, ListDirectoryArgs, ListDirectoryTool};
pub use make_directory::{make_directory, MakeDirectoryArgs, MakeDirectoryTool};
pub use read_file::{read_file, ReadFileArgs, ReadFileTool};
pub use write_file::{write_file, WriteFileArgs, WriteFileTool, WriteMode};

use super::{Tool, ToolDescriptor};

/// Catalog of every builtin tool, in the order the prompt lists them
pub fn catalog() -> Vec<ToolDescriptor> {
    vec![
        ListDirectoryTool.describe(),
        ReadFileTool.describe(),
        WriteFileTool.describe(),
        DeleteLinesTool.describe(),
        MakeDirectoryTool.describe(),
    ]
}

/// Split into lines, keeping each line's terminator
pub(crate) fn split_lines(content: &str) -> Vec<&str> {
    content.split_inclusive('\n').collect()
}

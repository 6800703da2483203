//! Reading user input from the command line, stdin and image files.

/// Image files to attachments.
pub mod attachment;
mod reader;

pub use attachment::load_image;
pub use reader::InputReader;

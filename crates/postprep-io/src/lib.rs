//! postprep io: reading raw posts from CSV and writing author documents.

pub mod reader;
pub mod writer;

pub use reader::{decode_with_fallback, load_posts, parse_posts};
pub use writer::{write_documents, write_documents_to, FINAL_TEXT_COLUMN};

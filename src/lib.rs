pub mod boxes;
pub mod cursor;
pub mod error;
pub mod known_boxes;
pub mod leaves;
pub mod parser;
pub mod reader;
pub mod sample_desc;
pub mod scalars;

pub use boxes::{BoxHeader, FourCC, FullBoxHeader, RootBox};
pub use error::{DecodeError, Result};
pub use parser::{decode_root, read_box_header, walk_children};
pub use reader::{decode_next, decode_stream};

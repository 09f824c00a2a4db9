pub mod block;
pub mod clock;
pub mod geometry;
pub mod stroke;

pub use block::{Alignment, Block, BlockId, CodeBlock, HeadingType, TextBlock, TextProperties};
pub use clock::Timestamp;
pub use geometry::{Point, path_data};
pub use stroke::{Stroke, StrokeTool, ToolPalette, ToolSettings};

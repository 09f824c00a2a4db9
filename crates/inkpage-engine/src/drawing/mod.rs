/*!
 * # Ink Engine
 *
 * Freehand strokes layered over the block document.
 *
 * ## Model
 *
 * - A stroke is a polyline of canvas-space points plus the colour and width
 *   the tool had when the stroke began. Later palette changes never touch
 *   committed strokes.
 * - Pen strokes are opaque and permanent until erased.
 * - Highlighter strokes render at half opacity and start fading once the
 *   user stops highlighting. A faded stroke is removed from the model.
 * - The eraser deletes whole strokes, never splits them.
 *
 * ## Canvas
 *
 * The surface starts at viewport height and grows as ink approaches the
 * bottom, then shrinks back after erasing (see [`canvas`]).
 *
 * ## Time
 *
 * Nothing here reads a clock. Hosts pass a [`Timestamp`](crate::models::Timestamp)
 * into every time-dependent call and drive fades through a
 * [`FrameScheduler`].
 */

pub mod canvas;
pub mod capture;
pub mod engine;
pub mod fade;

pub use canvas::{CanvasGeometry, shrink_target};
pub use capture::{Capture, PointerEvent, PointerId};
pub use engine::{CanvasChange, DrawContext, StrokeEngine, StrokeView};
pub use fade::{FadeLoop, FrameScheduler};

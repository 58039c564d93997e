//! 绘制：后端接口、上下文栈、每帧遍历、记录型后端

pub mod context;
pub mod recorder;
pub mod surface;
pub mod traverse;

pub use context::{ChildPass, ChildScope, ContextScope, Entered, RenderContext};
pub use recorder::{DrawCommand, FrameRecorder, StackDepths};
pub use surface::{AxisKind, Backend, DrawSurface, ItemInteraction, SeriesSurface, UiSurface};
pub use traverse::{render_frame, FrameStats, NodeFault};

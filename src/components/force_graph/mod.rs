mod component;
pub mod encode;
pub mod interaction;
pub mod model;
pub mod options;
pub mod render;
pub mod scale;
pub mod simulation;
mod tooltip;
mod types;

pub use component::{ForceGraphSvg, LoadedGraph};
pub use options::{ForceGraphOptions, LinkStyle, NodeStyle};
pub use tooltip::{Tooltip, TooltipState};
pub use types::{GraphData, GroupKey, GroupingMode, RawLink, RawNode};

pub mod plotly_format;
pub mod plotly_renderer;
pub mod recording_renderer;

pub use plotly_renderer::PlotlyRenderer;
pub use recording_renderer::{RecordingRenderer, RenderCall};

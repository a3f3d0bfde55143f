pub mod measure;
pub mod probe;

pub use measure::{
    FixedAdvanceMeasurer, FontSpec, MeasureError, TextMeasurer, TextMetrics, wrap_advances,
};
pub use probe::{ImageProbe, InMemoryImageProbe};

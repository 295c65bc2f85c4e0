pub mod annotation;
pub mod dataset;
pub mod sampling;

pub use annotation::{AnnotationError, Annotations, VideoRecord};
pub use dataset::{DatasetError, VideoDataset};
pub use sampling::sample_indices;

use std::fmt;
use std::path::Path;

use ndarray::Array4;
use rand::Rng;

use crate::annotation::{AnnotationError, Annotations};
use crate::sampling::sample_indices;

/// Errors raised while opening the dataset or looking up a video.
#[derive(Debug)]
pub enum DatasetError {
    /// The requested index is outside `[0, len)`.
    IndexOutOfRange { index: usize, len: usize },
    /// The dataset was opened with zero clips per video.
    NoClips,
    Annotation(AnnotationError),
    Hdf5(hdf5::Error),
    Decode(image::ImageError),
    /// A decoded frame's dimensions differ from the first frame of the clip.
    FrameShapeMismatch {
        key: String,
        expected: (u32, u32),
        got: (u32, u32),
    },
    Shape(ndarray::ShapeError),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::IndexOutOfRange { index, len } => {
                write!(f, "index {} is out of range for {} videos", index, len)
            }
            DatasetError::NoClips => write!(f, "clips per video must be at least 1"),
            DatasetError::Annotation(e) => write!(f, "{}", e),
            DatasetError::Hdf5(e) => write!(f, "container lookup failed: {}", e),
            DatasetError::Decode(e) => write!(f, "frame decode failed: {}", e),
            DatasetError::FrameShapeMismatch { key, expected, got } => write!(
                f,
                "frame {} is {}x{} but the clip started with {}x{}",
                key, got.0, got.1, expected.0, expected.1
            ),
            DatasetError::Shape(e) => write!(f, "frame stacking failed: {}", e),
        }
    }
}

impl std::error::Error for DatasetError {}

impl From<AnnotationError> for DatasetError {
    fn from(e: AnnotationError) -> Self {
        DatasetError::Annotation(e)
    }
}

impl From<hdf5::Error> for DatasetError {
    fn from(e: hdf5::Error) -> Self {
        DatasetError::Hdf5(e)
    }
}

impl From<image::ImageError> for DatasetError {
    fn from(e: image::ImageError) -> Self {
        DatasetError::Decode(e)
    }
}

impl From<ndarray::ShapeError> for DatasetError {
    fn from(e: ndarray::ShapeError) -> Self {
        DatasetError::Shape(e)
    }
}

type Transform = Box<dyn Fn(Array4<u8>) -> Array4<u8>>;

/// Random-access video dataset backed by an HDF5 clip container and a JSON
/// annotation file.
///
/// The container stores one group per `"<video_id>/<clip_index:03>"` pair
/// and, inside it, one `u8` dataset per encoded frame named
/// `"<frame_index:08>"`. Every lookup draws a clip uniformly at random,
/// decodes a sampled subset of its frames and stacks them into an
/// `(frames, height, width, 3)` RGB array.
pub struct VideoDataset {
    annotations: Annotations,
    database: hdf5::File,
    num_clips: usize,
    frames_per_clip: usize,
    transform: Option<Transform>,
}

impl VideoDataset {
    /// Open the annotation file and the clip container.
    ///
    /// `clips` is the number of candidate clips stored per video and must be
    /// at least 1. `frames` is the target frame count per lookup; 0 keeps
    /// every native frame.
    pub fn open(
        annotation: impl AsRef<Path>,
        database: impl AsRef<Path>,
        clips: usize,
        frames: usize,
    ) -> Result<Self, DatasetError> {
        if clips == 0 {
            return Err(DatasetError::NoClips);
        }
        let annotations = Annotations::from_path(annotation)?;
        let database = hdf5::File::open(database)?;
        log::info!(
            "opened dataset with {} videos and {} classes",
            annotations.len(),
            annotations.class_num()
        );
        Ok(Self {
            annotations,
            database,
            num_clips: clips,
            frames_per_clip: frames,
            transform: None,
        })
    }

    /// Install a hook applied to the decoded frame array of every lookup.
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Array4<u8>) -> Array4<u8> + 'static,
    {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Number of videos in the dataset.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Number of classes declared by the annotation file.
    pub fn num_classes(&self) -> usize {
        self.annotations.class_num()
    }

    pub fn num_clips(&self) -> usize {
        self.num_clips
    }

    pub fn frames_per_clip(&self) -> usize {
        self.frames_per_clip
    }

    /// Look up the video at `index`, drawing the clip with thread-local
    /// randomness. Repeated calls for the same index may return frames from
    /// different clips.
    pub fn get(&self, index: usize) -> Result<(Array4<u8>, i64), DatasetError> {
        self.get_with_rng(index, &mut rand::thread_rng())
    }

    /// Look up the video at `index` with a caller-supplied random source.
    ///
    /// Seeding the source makes the clip choice, and therefore the returned
    /// frames, reproducible.
    pub fn get_with_rng<R: Rng + ?Sized>(
        &self,
        index: usize,
        rng: &mut R,
    ) -> Result<(Array4<u8>, i64), DatasetError> {
        let (video_id, record) =
            self.annotations
                .get(index)
                .ok_or(DatasetError::IndexOutOfRange {
                    index,
                    len: self.annotations.len(),
                })?;

        let clip = rng.gen_range(0..self.num_clips);
        let key = format!("{}/{:03}", video_id, clip);
        let group = self.database.group(&key)?;
        let native_len = group.len() as usize;

        let mut frames = Vec::new();
        let mut dims: Option<(u32, u32)> = None;
        for frame_index in sample_indices(native_len, self.frames_per_clip) {
            let name = format!("{:08}", frame_index);
            let bytes = group.dataset(&name)?.read_raw::<u8>()?;
            let frame = image::load_from_memory(&bytes)?.to_rgb8();
            let got = frame.dimensions();
            match dims {
                None => dims = Some(got),
                Some(expected) if expected != got => {
                    return Err(DatasetError::FrameShapeMismatch {
                        key: format!("{}/{}", key, name),
                        expected,
                        got,
                    });
                }
                Some(_) => {}
            }
            frames.push(frame);
        }

        let (width, height) = dims.unwrap_or((0, 0));
        let (width, height) = (width as usize, height as usize);
        let mut buf = Vec::with_capacity(frames.len() * width * height * 3);
        for frame in &frames {
            buf.extend_from_slice(frame.as_raw());
        }
        let video = Array4::from_shape_vec((frames.len(), height, width, 3), buf)?;

        let video = match &self.transform {
            Some(f) => f(video),
            None => video,
        };
        Ok((video, record.class))
    }
}

impl fmt::Display for VideoDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VideoDataset: {} videos, {} clips per video, {}",
            self.len(),
            self.num_clips,
            if self.frames_per_clip > 0 {
                format!("sample to {} frames", self.frames_per_clip)
            } else {
                "not sampled".to_string()
            }
        )
    }
}

pub mod sample_index;

pub use sample_index::{MAX_RESERVE, Sample, SampleIndex, SampledEntry, SlotId};

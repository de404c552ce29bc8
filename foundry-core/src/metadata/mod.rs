//! Metadata derived for each discovered file: naming decomposition, kit and
//! group classification, and probed stream attributes.

pub mod ffprobe;
pub mod filename_parser;
pub mod kit;
pub mod paths;
pub mod probe;

pub use ffprobe::FfprobeProbe;
pub use filename_parser::{
    FilenameParts, TitleYear, core_title_segment, decompose, extract_title_year,
};
pub use kit::{group, is_kit};
pub use paths::{PathCache, PathParts};
pub use probe::{MediaAttributeProber, MediaProbe, ProbeOutput, ProbeStream};

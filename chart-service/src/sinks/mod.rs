pub mod svg_file;

pub use svg_file::SvgFileSink;

//! Version control implementations

mod svn;

pub use svn::SvnClient;

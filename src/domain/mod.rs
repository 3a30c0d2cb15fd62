//! Domain Layer
//!
//! Value types and the ports through which the watch core talks to the
//! outside world (VCS, mirror, plugin API, live reload, compiler).
//!
//! This layer never touches the file system or network directly.

pub mod ports;
pub mod value_objects;

pub mod cancel;
pub mod directories;
pub mod logging;

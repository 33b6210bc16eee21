//! Command implementations.

pub mod once;
pub mod run;
pub mod scan;
pub mod show;

pub use self::once::execute_once;
pub use self::run::execute_run;
pub use self::scan::execute_scan;
pub use self::show::execute_show;

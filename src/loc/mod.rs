pub mod aggregate;
pub mod exec;
pub mod output;
pub mod sync;

pub use aggregate::{aggregate, authored_by};
pub use exec::{connect, exec, loc_output};
pub use output::{output_json, output_summary};
pub use sync::{check_record, sync, sync_with_progress, RecordState, SyncReport};

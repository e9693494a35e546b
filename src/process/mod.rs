pub mod cancel;
pub mod result;
pub mod runner;
pub mod sink;

pub use cancel::CancellationToken;
pub use result::ProcessResult;
pub use runner::{run_command, CommandRunner, RunControl, SystemRunner};
pub use sink::{LineSink, LogSink, MemorySink, NullSink};

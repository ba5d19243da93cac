#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! In-process output capture for xscan
//!
//! Commands print through [`stdout`] (or any [`OutputHandle`]) instead of
//! touching the process's standard output directly. The harness can then run
//! a command in-process with [`run_capturing`] and get back the exact bytes it
//! printed, while normal runs keep writing to the terminal.

mod pipe;
mod router;
mod run;
mod sink;

pub use pipe::{pipe, CloseOnDrop, PipeReader, PipeWriter};
pub use router::{stdout, OutputHandle, OutputRouter, RedirectGuard};
pub use run::{run_capturing, run_capturing_with, CaptureOptions, Captured, CapturedOutput};
pub use sink::{MemorySink, OutputSink, SharedSink, StdoutSink};

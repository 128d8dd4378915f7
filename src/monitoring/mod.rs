/*!
 * Monitoring
 * Structured tracing for the kernel
 */

mod tracer;

pub use tracer::{generate_trace_id, init_tracing, SyscallSpan};

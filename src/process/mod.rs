/*!
 * Process Module
 * Process identity and descriptor table lifecycle
 */

pub mod types;

pub use types::{Process, ProcessInfo};

// In: src/session/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Marshaling Session
// ====================================================================================
//
// A `MarshalSession` owns one invocation's ordered inputs, the outputs built so
// far, and the `ArgumentCursor` over both. A command handler pulls its N typed
// arguments and pushes its M typed results through it:
//
//   1. [Importer (import.rs)]   -> `classify` peeks at the next input's kind,
//         |                        `read_*` consumes it and returns an owned buffer.
//         |
//   2. [Command handler]        -> runs the toolkit operation (outside this crate).
//         |
//   3. [Exporter (export.rs)]   -> `write_*` builds a host value from a buffer
//                                  and appends it at the write cursor.
//
// The session is single-threaded and non-reentrant: one invocation runs to
// completion before `reset` starts the next one. Nothing is caught inside the
// routines; the first error aborts the invocation and travels to the gateway.
//
// ====================================================================================

mod classify;
mod cursor;
mod export;
mod import;

pub use classify::classify_value;
pub use cursor::ArgumentCursor;

use std::sync::Arc;

use crate::buffer;
use crate::config::MarshalConfig;
use crate::error::MarshalError;
use crate::report::Reporter;
use crate::value::DynamicValue;

pub struct MarshalSession {
    inputs: Vec<DynamicValue>,
    outputs: Vec<DynamicValue>,
    expected_outputs: usize,
    cursor: ArgumentCursor,
    config: Arc<MarshalConfig>,
    reporter: Arc<dyn Reporter>,
}

impl MarshalSession {
    pub fn new(
        inputs: Vec<DynamicValue>,
        expected_outputs: usize,
        config: Arc<MarshalConfig>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            inputs,
            outputs: Vec::new(),
            expected_outputs,
            cursor: ArgumentCursor::new(),
            config,
            reporter,
        }
    }

    /// Starts a new invocation: replaces the inputs, drops any outputs and
    /// rewinds the cursor.
    pub fn reset(&mut self, inputs: Vec<DynamicValue>, expected_outputs: usize) {
        self.inputs = inputs;
        self.outputs.clear();
        self.expected_outputs = expected_outputs;
        self.cursor.reset();
    }

    pub fn cursor(&self) -> ArgumentCursor {
        self.cursor
    }

    pub fn config(&self) -> &MarshalConfig {
        &self.config
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len().saturating_sub(self.cursor.read_index())
    }

    pub fn expected_outputs(&self) -> usize {
        self.expected_outputs
    }

    pub fn outputs(&self) -> &[DynamicValue] {
        &self.outputs
    }

    /// Hands the finished outputs to the caller, checking that exactly the
    /// expected number was produced.
    pub fn take_outputs(&mut self) -> Result<Vec<DynamicValue>, MarshalError> {
        if self.outputs.len() != self.expected_outputs {
            return Err(MarshalError::OutputCountMismatch {
                expected: self.expected_outputs,
                actual: self.outputs.len(),
            });
        }
        Ok(std::mem::take(&mut self.outputs))
    }

    //==============================================================================
    // Cursor-Bound Helpers
    //==============================================================================

    /// Consumes the next input, returning its index.
    fn next_input(&mut self) -> Result<usize, MarshalError> {
        self.cursor.advance_read(self.inputs.len())
    }

    /// Appends `value` at the write cursor.
    fn push_output(&mut self, value: DynamicValue) -> Result<(), MarshalError> {
        let index = self.cursor.advance_write(self.expected_outputs)?;
        log::debug!("output {}: {}", index + 1, value.describe());
        self.outputs.push(value);
        Ok(())
    }

    fn allocate<T>(&self, len: usize) -> Result<Vec<T>, MarshalError> {
        buffer::try_allocate(len, self.config.max_elements)
    }
}

// In: src/gateway.rs

//! The outermost boundary between the host runtime and a command handler.
//!
//! A `Gateway` owns the one marshaling session of the process. The first
//! invocation performs the one-time setup (logging, then the secondary
//! runtime's `initialize`); every later invocation only rewinds the session.
//! Whatever happens inside the handler, the host gets back either all of the
//! outputs or a single `HostReport`, never a partial result and never an
//! unwinding panic.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::config::MarshalConfig;
use crate::error::MarshalError;
use crate::logging;
use crate::report::{HostReport, Reporter};
use crate::session::MarshalSession;
use crate::value::DynamicValue;

/// An embedded secondary runtime whose lifetime brackets every session.
pub trait Runtime {
    fn initialize(&mut self) -> Result<(), MarshalError>;
    fn shutdown(&mut self);
}

/// For hosts with nothing to embed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRuntime;

impl Runtime for NoopRuntime {
    fn initialize(&mut self) -> Result<(), MarshalError> {
        Ok(())
    }

    fn shutdown(&mut self) {}
}

/// Pulls a command's arguments from the session, runs it and pushes its
/// results. Returns `Ok(false)` when it does not recognize the command.
pub trait CommandHandler {
    fn handle(&mut self, session: &mut MarshalSession) -> Result<bool, MarshalError>;
}

impl<F> CommandHandler for F
where
    F: FnMut(&mut MarshalSession) -> Result<bool, MarshalError>,
{
    fn handle(&mut self, session: &mut MarshalSession) -> Result<bool, MarshalError> {
        self(session)
    }
}

/// The result of one invocation as the host sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed(Vec<DynamicValue>),
    Failed(HostReport),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn into_result(self) -> Result<Vec<DynamicValue>, HostReport> {
        match self {
            Self::Completed(outputs) => Ok(outputs),
            Self::Failed(report) => Err(report),
        }
    }
}

pub struct Gateway {
    runtime: Box<dyn Runtime>,
    config: Arc<MarshalConfig>,
    reporter: Arc<dyn Reporter>,
    session: Option<MarshalSession>,
    initialized: bool,
}

impl Gateway {
    /// Creates the gateway. Nothing is initialized until the first `invoke`.
    pub fn new(
        runtime: Box<dyn Runtime>,
        config: MarshalConfig,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            runtime,
            config: Arc::new(config),
            reporter,
            session: None,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &MarshalConfig {
        &self.config
    }

    /// Runs `handler` over `inputs`, expecting it to produce `nlhs` outputs.
    /// Failures are passed to the reporter and returned as `Outcome::Failed`.
    pub fn invoke<H>(&mut self, inputs: Vec<DynamicValue>, nlhs: usize, handler: &mut H) -> Outcome
    where
        H: CommandHandler + ?Sized,
    {
        match self.run(inputs, nlhs, handler) {
            Ok(outputs) => Outcome::Completed(outputs),
            Err(report) => {
                self.reporter.error(&report);
                Outcome::Failed(report)
            }
        }
    }

    fn run<H>(&mut self, inputs: Vec<DynamicValue>, nlhs: usize, handler: &mut H) -> Result<Vec<DynamicValue>, HostReport>
    where
        H: CommandHandler + ?Sized,
    {
        let session = self
            .prepare(inputs, nlhs)
            .map_err(|e| HostReport::from_error(&e))?;

        let result = panic::catch_unwind(AssertUnwindSafe(|| -> Result<Vec<DynamicValue>, MarshalError> {
            if !handler.handle(session)? {
                return Err(MarshalError::UnknownCommand);
            }
            session.take_outputs()
        }));

        match result {
            Ok(Ok(outputs)) => Ok(outputs),
            Ok(Err(err)) => {
                log::debug!("invocation failed: {}", err);
                Err(HostReport::from_error(&err))
            }
            Err(payload) => {
                log::error!("handler panicked: {}", panic_message(payload.as_ref()));
                Err(HostReport::panic())
            }
        }
    }

    /// Performs the one-time setup if it has not succeeded yet, then hands
    /// out the session rewound for `inputs`.
    fn prepare(&mut self, inputs: Vec<DynamicValue>, nlhs: usize) -> Result<&mut MarshalSession, MarshalError> {
        if !self.initialized {
            if self.config.verbose_logging {
                logging::enable_verbose_logging(self.config.log_file.as_deref())?;
            }
            self.runtime.initialize()?;
            self.initialized = true;
            self.reporter.message("marshaling gateway initialized");
        }

        let config = self.config.clone();
        let reporter = self.reporter.clone();
        let session = self
            .session
            .get_or_insert_with(|| MarshalSession::new(Vec::new(), 0, config, reporter));
        session.reset(inputs, nlhs);
        Ok(session)
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        if self.initialized {
            self.runtime.shutdown();
            self.initialized = false;
            self.reporter.message("marshaling gateway shut down");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        *text
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.as_str()
    } else {
        "unknown panic payload"
    }
}
